use thiserror::Error;

use crate::ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

/// A single diagnostic produced while lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub message: String,
}

impl Diag {
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagKind::Parse,
            span,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("invalid escape")]
    InvalidEscape,
    #[error("invalid rune literal")]
    InvalidRune,
    #[error("unterminated comment")]
    UnterminatedComment,
}

impl LexErrorKind {
    #[inline]
    pub fn diag(self, span: Span) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            span,
            message: self.to_string(),
        }
    }
}

// =============================================================================
// Line index
// =============================================================================

/// Maps byte offsets to 1-based line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => line_starts.push(i + 1),
                _ => {}
            }
            i += 1;
        }
        Self { line_starts }
    }

    /// Zero-based line containing `offset`.
    #[inline]
    pub fn line(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    /// Byte offset where the zero-based `line` starts.
    #[inline]
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts[line]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based `(line, column)`; the column counts bytes.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.line(offset);
        (line + 1, offset - self.line_starts[line] + 1)
    }
}

// =============================================================================
// Syntax error surfaced to callers
// =============================================================================

/// A diagnostic resolved to a line/column position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedDiag {
    pub diag: Diag,
    pub line: usize,
    pub column: usize,
}

/// Failure of any front-end operation. Every diagnostic keeps its byte span and
/// resolved position; `Display` reports the first one as `file:line:col: message`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{summary}")]
pub struct SyntaxError {
    pub file: String,
    pub diags: Vec<LocatedDiag>,
    summary: String,
}

impl SyntaxError {
    pub fn new(file: &str, source: &str, diags: Vec<Diag>) -> Self {
        let index = LineIndex::new(source);
        let diags: Vec<LocatedDiag> = diags
            .into_iter()
            .map(|diag| {
                let (line, column) = index.position((diag.span.start as usize).min(source.len()));
                LocatedDiag { diag, line, column }
            })
            .collect();

        let summary = match diags.first() {
            Some(first) => {
                let mut s = format!(
                    "{}:{}:{}: {}",
                    file, first.line, first.column, first.diag.message
                );
                if diags.len() > 1 {
                    s.push_str(&format!(" (and {} more)", diags.len() - 1));
                }
                s
            }
            None => format!("{file}: syntax error"),
        };

        Self {
            file: file.to_string(),
            diags,
            summary,
        }
    }

    pub fn first(&self) -> Option<&LocatedDiag> {
        self.diags.first()
    }
}
