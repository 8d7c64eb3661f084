//! Rendering of a single `.htaccess` file as a `<Directory>` block.

use crate::rule::RuleBox;
use crate::types::Finding;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// One raw input line and the findings raised against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine<'a> {
    /// Raw bytes, including the line terminator if present.
    pub text: &'a [u8],
    /// Findings for this line, in rule order.
    pub findings: Vec<Finding>,
}

/// A `<Directory>` block ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock<'a> {
    /// Directory the block applies to.
    pub directory: PathBuf,
    /// Lines of the source file, in order.
    pub lines: Vec<RenderedLine<'a>>,
}

impl<'a> RenderedBlock<'a> {
    /// Splits `contents` into lines and runs every rule over each one.
    ///
    /// `file` is only recorded in findings; it is not read.
    #[must_use]
    pub fn build(directory: &Path, file: &Path, contents: &'a [u8], rules: &[RuleBox]) -> Self {
        let lines = contents
            .split_inclusive(|b| *b == b'\n')
            .enumerate()
            .map(|(idx, text)| RenderedLine {
                text,
                findings: rules
                    .iter()
                    .filter(|rule| rule.matches(text))
                    .map(|rule| Finding {
                        code: rule.code(),
                        directive: rule.directive().to_string(),
                        file: file.to_path_buf(),
                        line: idx + 1,
                    })
                    .collect(),
            })
            .collect();

        Self {
            directory: directory.to_path_buf(),
            lines,
        }
    }

    /// Returns every finding in the block, in line order.
    #[must_use]
    pub fn findings(&self) -> Vec<&Finding> {
        self.lines.iter().flat_map(|line| &line.findings).collect()
    }

    /// Writes the block, followed by one blank separator line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Path bytes verbatim, directory names need not be UTF-8
        out.write_all(b"<Directory ")?;
        out.write_all(self.directory.as_os_str().as_encoded_bytes())?;
        out.write_all(b">\n")?;

        // Empty file: keep the stub
        let Some(last_line) = self.lines.last() else {
            return out.write_all(b"\n</Directory>\n\n");
        };

        for line in &self.lines {
            out.write_all(b"\t")?;
            out.write_all(line.text)?;
            for (i, finding) in line.findings.iter().enumerate() {
                if i == 0 && !ends_with_terminator(line.text) {
                    out.write_all(b"\n")?;
                }
                writeln!(out, "{}", finding.comment())?;
            }
        }

        let on_fresh_line = ends_with_terminator(last_line.text) || !last_line.findings.is_empty();
        if !on_fresh_line {
            out.write_all(b"\n")?;
        }
        out.write_all(b"</Directory>\n\n")
    }
}

fn ends_with_terminator(text: &[u8]) -> bool {
    matches!(text.last(), Some(b'\n' | b'\r'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{FlaggedDirective, RedirectBase};

    fn rules() -> Vec<RuleBox> {
        vec![Box::new(RedirectBase::new())]
    }

    fn render(contents: &[u8], rules: &[RuleBox]) -> String {
        let block = RenderedBlock::build(
            Path::new("/var/www/site"),
            Path::new("/var/www/site/.htaccess"),
            contents,
            rules,
        );
        let mut out = Vec::new();
        block.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    const WARNING: &str = "# WARNING The above line contains RedirectBase which may not convert directly to a conf file. Please check manually\n";

    #[test]
    fn test_lines_are_tab_indented() {
        let out = render(b"Options -Indexes\nDirectoryIndex index.php\n", &rules());
        assert_eq!(
            out,
            "<Directory /var/www/site>\n\tOptions -Indexes\n\tDirectoryIndex index.php\n</Directory>\n\n"
        );
    }

    #[test]
    fn test_empty_file_keeps_stub() {
        let out = render(b"", &rules());
        assert_eq!(out, "<Directory /var/www/site>\n\n</Directory>\n\n");
    }

    #[test]
    fn test_missing_final_newline() {
        let out = render(b"Options -Indexes\nAllow from all", &rules());
        assert_eq!(
            out,
            "<Directory /var/www/site>\n\tOptions -Indexes\n\tAllow from all\n</Directory>\n\n"
        );
    }

    #[test]
    fn test_crlf_lines_are_preserved() {
        let out = render(b"Options -Indexes\r\nAllow from all\r\n", &rules());
        assert_eq!(
            out,
            "<Directory /var/www/site>\n\tOptions -Indexes\r\n\tAllow from all\r\n</Directory>\n\n"
        );
    }

    #[test]
    fn test_trailing_carriage_return_counts_as_terminator() {
        let out = render(b"Allow from all\r", &rules());
        assert_eq!(out, "<Directory /var/www/site>\n\tAllow from all\r</Directory>\n\n");
    }

    #[test]
    fn test_warning_follows_flagged_line() {
        let out = render(b"RewriteEngine On\nredirectbase /app\nOptions None\n", &rules());
        let expected = format!(
            "<Directory /var/www/site>\n\tRewriteEngine On\n\tredirectbase /app\n{WARNING}\tOptions None\n</Directory>\n\n"
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_warning_on_unterminated_last_line() {
        let out = render(b"RedirectBase /app", &rules());
        let expected = format!("<Directory /var/www/site>\n\tRedirectBase /app\n{WARNING}</Directory>\n\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_findings_record_line_numbers() {
        let contents = b"a\nRedirectBase /x\nb\nREDIRECTBASE /y\n";
        let rules = rules();
        let block = RenderedBlock::build(
            Path::new("/w"),
            Path::new("/w/.htaccess"),
            contents,
            &rules,
        );
        let lines: Vec<_> = block.findings().iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![2, 4]);
        assert!(block.findings().iter().all(|f| f.code == "HT001"));
    }

    #[test]
    fn test_line_matching_two_rules_gets_two_comments() {
        let rules: Vec<RuleBox> = vec![
            Box::new(RedirectBase::new()),
            Box::new(FlaggedDirective::new("Redirect")),
        ];
        let out = render(b"RedirectBase /app\n", &rules);
        assert_eq!(out.matches("# WARNING").count(), 2);
        assert!(out.contains("contains Redirect which"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_directory_is_written_verbatim() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let directory = Path::new(OsStr::from_bytes(b"/srv/caf\xe9"));
        let rules = rules();
        let block = RenderedBlock::build(directory, &directory.join(".htaccess"), b"", &rules);
        let mut out = Vec::new();
        block.write_to(&mut out).unwrap();

        assert!(out.starts_with(b"<Directory /srv/caf\xe9>\n"));
    }

    #[test]
    fn test_content_fidelity() {
        let contents = b"# comment\n\nOrder deny,allow\n  Deny from all  \n";
        let out = render(contents, &rules());
        let body: Vec<&str> = out.lines().skip(1).take(4).collect();
        assert_eq!(
            body,
            vec!["\t# comment", "\t", "\tOrder deny,allow", "\t  Deny from all  "]
        );
    }
}
