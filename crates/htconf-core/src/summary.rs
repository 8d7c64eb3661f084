//! Trailing comment block of the generated configuration.

use crate::types::ConversionSummary;
use std::io::{self, Write};

/// Writes the warning total and the closing disclaimer.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_summary<W: Write>(out: &mut W, summary: &ConversionSummary) -> io::Result<()> {
    if summary.has_warnings() {
        writeln!(
            out,
            "# A total of {} warnings were encountered. Please read through the file and correct any noted problems",
            summary.warnings()
        )?;
    } else {
        writeln!(out, "# No warnings detected")?;
    }
    writeln!(out, "# Please test before going live, no guarantees!")
}
