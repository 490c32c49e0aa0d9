//! Seam to the front-end: everything the core asks of Go syntax goes through
//! [`SyntaxService`].

use go125_syntax::{ParsedFile, SyntaxError};

pub trait SyntaxService: Send + Sync {
    /// Parses a whole file.
    fn parse_file<'t>(&self, name: &str, text: &'t str) -> Result<ParsedFile<'t>, SyntaxError>;

    /// Checks a raw snippet: a value expression, an array length or a function
    /// body.
    fn parse_fragment(&self, text: &str) -> Result<(), SyntaxError>;

    /// Re-parses synthesized file text and returns it in canonical layout.
    fn format_and_check(&self, name: &str, text: &str) -> Result<String, SyntaxError>;
}

/// [`SyntaxService`] backed by `go125_syntax`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoSyntax;

impl SyntaxService for GoSyntax {
    fn parse_file<'t>(&self, name: &str, text: &'t str) -> Result<ParsedFile<'t>, SyntaxError> {
        go125_syntax::parse_file(name, text)
    }

    fn parse_fragment(&self, text: &str) -> Result<(), SyntaxError> {
        go125_syntax::parse_fragment(text).map(drop)
    }

    fn format_and_check(&self, name: &str, text: &str) -> Result<String, SyntaxError> {
        go125_syntax::format_source(name, text)
    }
}
