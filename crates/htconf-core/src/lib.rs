//! # htconf-core
//!
//! Converts a tree of Apache `.htaccess` files into `httpd.conf`
//! `<Directory>` blocks.
//!
//! The conversion is a single linear pass:
//!
//! - [`walk`] lazily discovers `.htaccess` files, skipping any path that
//!   contains a [`FilterSet`] substring
//! - [`sort_by_depth`] orders them shallow to deep so deeper blocks override
//!   shallower ones when Apache reads the config top to bottom
//! - [`RenderedBlock`] wraps each file in a `<Directory>` block and annotates
//!   lines matched by a [`DirectiveRule`]
//! - [`write_summary`] closes the output with the warning total
//!
//! [`Converter`] wires these together.
//!
//! ## Example
//!
//! ```ignore
//! use htconf_core::Converter;
//!
//! let converter = Converter::builder()
//!     .root("/var/www/example.com")
//!     .exclude("cache")
//!     .build()?;
//!
//! let summary = converter.convert(&mut std::io::stdout().lock())?;
//! eprintln!("{} warning(s)", summary.warnings());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod converter;
mod order;
mod render;
mod rule;
mod summary;
mod types;
mod walker;

pub use config::{Config, ConfigError, LintConfig, WalkerConfig};
pub use converter::{ConvertError, Converter, ConverterBuilder};
pub use order::{depth, sort_by_depth};
pub use render::{RenderedBlock, RenderedLine};
pub use rule::{contains_token, DirectiveRule, FlaggedDirective, RedirectBase, RuleBox};
pub use summary::write_summary;
pub use types::{ConversionSummary, Finding, HtaccessFile};
pub use walker::{is_htaccess, walk, FilterSet, DEFAULT_FILTERS, HTACCESS_FILE_NAME};
