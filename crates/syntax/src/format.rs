//! Canonical layout for Go source that already parses.
//!
//! Indentation is recomputed from delimiter depth, so the output does not
//! depend on how the input was indented. Lines starting inside a multi-line
//! raw string or block comment are copied verbatim; a line opening one keeps
//! its tail untouched.

use crate::ast::CommentKind;
use crate::lexer::{Keyword, Tokens, Tok};

#[derive(Debug, Clone, Copy)]
struct LineInfo<'a> {
    text: &'a str,
    start: usize,
}

fn split_lines(src: &str) -> Vec<LineInfo<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    for chunk in src.split_inclusive('\n') {
        let text = chunk.strip_suffix('\n').unwrap_or(chunk);
        let text = text.strip_suffix('\r').unwrap_or(text);
        out.push(LineInfo { text, start });
        start += chunk.len();
    }
    out
}

#[inline]
fn opens_block(line: &str) -> bool {
    line.ends_with(['{', '(', '['])
}

#[inline]
fn closes_block(line: &str) -> bool {
    line.starts_with(['}', ')', ']'])
}

/// Re-lays out `src` given its tokens. Assumes `src` lexes cleanly.
pub(crate) fn format_tokens(src: &str, tokens: &Tokens<'_>) -> String {
    // Spans that may cross line boundaries.
    let mut multiline: Vec<(usize, usize)> = tokens
        .toks
        .iter()
        .filter(|t| matches!(t.1, Tok::RawStringLit(_)))
        .map(|t| (t.0, t.2))
        .chain(
            tokens
                .comments
                .iter()
                .filter(|c| c.kind == CommentKind::Block)
                .map(|c| (c.span.start as usize, c.span.end as usize)),
        )
        .collect();
    multiline.sort_unstable();

    let toks: Vec<_> = tokens.toks.iter().filter(|t| t.2 > t.0).collect();

    let mut out = String::with_capacity(src.len() + src.len() / 8);
    let mut tok_idx = 0;
    let mut ml_idx = 0;
    let mut depth: isize = 0;
    let mut pending_blank = false;
    let mut last_emitted: Option<String> = None;

    for line in split_lines(src) {
        let line_end = line.start + line.text.len();

        while ml_idx < multiline.len() && multiline[ml_idx].1 <= line.start {
            ml_idx += 1;
        }
        let verbatim = multiline
            .get(ml_idx)
            .is_some_and(|&(s, e)| s < line.start && line.start < e);
        let opens_multiline = multiline[ml_idx..]
            .iter()
            .take_while(|&&(s, _)| s < line_end)
            .any(|&(s, e)| s >= line.start && e > line_end);

        // Depth at line start, then the first token on this line.
        let depth_at_start = depth;
        let mut first_tok = None;
        while tok_idx < toks.len() && toks[tok_idx].0 < line_end {
            let tok = toks[tok_idx].1;
            if first_tok.is_none() && toks[tok_idx].0 >= line.start {
                first_tok = Some(tok);
            }
            if tok.is_open_delim() {
                depth += 1;
            } else if tok.is_close_delim() {
                depth -= 1;
            }
            tok_idx += 1;
        }

        if verbatim {
            if pending_blank {
                out.push('\n');
                pending_blank = false;
            }
            out.push_str(line.text);
            out.push('\n');
            last_emitted = Some(line.text.to_string());
            continue;
        }

        let text = if opens_multiline {
            line.text.trim_start()
        } else {
            line.text.trim()
        };
        if text.is_empty() {
            pending_blank = last_emitted.is_some();
            continue;
        }

        if pending_blank {
            let after_opener = last_emitted.as_deref().is_some_and(opens_block);
            if !after_opener && !closes_block(text) {
                out.push('\n');
            }
            pending_blank = false;
        }

        let outdent = matches!(
            first_tok,
            Some(Tok::RParen | Tok::RBrack | Tok::RBrace | Tok::Kw(Keyword::Case | Keyword::Default))
        );
        let level = (depth_at_start - isize::from(outdent)).max(0) as usize;
        for _ in 0..level {
            out.push('\t');
        }
        out.push_str(text);
        out.push('\n');
        last_emitted = Some(text.to_string());
    }

    out
}
