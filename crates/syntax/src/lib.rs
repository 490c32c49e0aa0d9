//! Go declaration front-end (Logos lexer + recursive-descent parser).
//!
//! - Lexer uses Logos and implements Go semicolon insertion; comments are
//!   collected on the side.
//! - Parser builds an arena tree of declarations and type expressions.
//! - `format_source` canonicalizes the layout of a parsed file.

pub mod ast;
pub mod error;
mod format;
pub mod lexer;
mod parser;

use smallvec::SmallVec;

pub use error::{Diag, DiagKind, LexErrorKind, LineIndex, LocatedDiag, SyntaxError};
pub use lexer::{tokenize, Keyword, Lexer, Spanned, Tok, Tokens};

use ast::{AstArena, CommentGroupId, CommentKind, Ident, Interner, SourceFile, Span};

/// A parsed file borrowing its source text.
#[derive(Debug)]
pub struct ParsedFile<'src> {
    source: &'src str,
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
}

impl<'src> ParsedFile<'src> {
    pub fn source(&self) -> &'src str {
        self.source
    }

    #[inline]
    pub fn text(&self, span: Span) -> &'src str {
        span.text(self.source)
    }

    #[inline]
    pub fn sym(&self, ident: Ident) -> &str {
        self.interner.resolve(ident)
    }

    /// Text of a comment group with the comment markers removed.
    ///
    /// One space after `//` is dropped, trailing whitespace is trimmed, and
    /// leading or trailing empty lines are removed. Lines are joined by `\n`.
    pub fn comment_text(&self, group: CommentGroupId) -> String {
        let group = self.arena.comment_groups[group];
        let mut lines: Vec<&str> = Vec::new();

        for &id in self.arena.comment_ids(group.comments) {
            let raw = self.text(self.arena.comments.span(id));
            match self.arena.comments[id].kind {
                CommentKind::Line => {
                    let body = &raw[2..];
                    lines.push(body.strip_prefix(' ').unwrap_or(body).trim_end());
                }
                CommentKind::Block => {
                    let body = &raw[2..raw.len() - 2];
                    lines.extend(body.lines().map(str::trim_end));
                }
            }
        }

        let first = lines.iter().position(|l| !l.is_empty());
        let last = lines.iter().rposition(|l| !l.is_empty());
        match (first, last) {
            (Some(first), Some(last)) => lines[first..=last].join("\n"),
            _ => String::new(),
        }
    }
}

/// Parses a whole Go file.
pub fn parse_file<'src>(name: &str, source: &'src str) -> Result<ParsedFile<'src>, SyntaxError> {
    let out = parser::parse(source).map_err(|diags| SyntaxError::new(name, source, diags))?;
    Ok(ParsedFile {
        source,
        arena: out.arena,
        interner: out.interner,
        file: out.file,
    })
}

/// A checked snippet of raw Go text (an expression, length or statement list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment<'src> {
    pub toks: Vec<Spanned<'src>>,
}

/// Checks that `text` lexes cleanly and that its delimiters are balanced.
pub fn parse_fragment(text: &str) -> Result<Fragment<'_>, SyntaxError> {
    const NAME: &str = "<fragment>";

    let Tokens { toks, diags, .. } = tokenize(text);
    if !diags.is_empty() {
        return Err(SyntaxError::new(NAME, text, diags));
    }

    let mut open: SmallVec<[(Tok<'_>, usize, usize); 8]> = SmallVec::new();
    for &(start, tok, end) in &toks {
        if tok.is_open_delim() {
            open.push((tok, start, end));
        } else if tok.is_close_delim() {
            match open.pop() {
                Some((opener, ..)) if opener.closer() == Some(tok) => {}
                _ => {
                    let diag = Diag::parse(Span::new(start, end), format!("unexpected '{tok}'"));
                    return Err(SyntaxError::new(NAME, text, vec![diag]));
                }
            }
        }
    }
    if let Some((tok, start, end)) = open.pop() {
        let diag = Diag::parse(Span::new(start, end), format!("unclosed '{tok}'"));
        return Err(SyntaxError::new(NAME, text, vec![diag]));
    }

    Ok(Fragment { toks })
}

/// Parses `source` as a file and returns its canonical layout.
pub fn format_source(name: &str, source: &str) -> Result<String, SyntaxError> {
    parse_file(name, source)?;
    Ok(format::format_tokens(source, &tokenize(source)))
}
