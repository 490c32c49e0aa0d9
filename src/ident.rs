use go125_syntax::{Keyword, Tok, Tokens, tokenize};

/// Go identifier: a letter or `_` followed by letters and digits, not a
/// reserved word.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first == '_' || unicode_ident::is_xid_start(first))
        && chars.all(unicode_ident::is_xid_continue)
        && Keyword::lookup(s).is_none()
}

/// Last path segment of an import path: `"ns/pkg"` -> `"pkg"`.
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// A single interpreted or raw string literal, as used for struct tags.
pub fn is_string_literal(s: &str) -> bool {
    let Tokens { toks, diags, .. } = tokenize(s);
    let mut real = toks.iter().filter(|(start, _, end)| start != end);
    diags.is_empty()
        && matches!(real.next(), Some((_, Tok::StringLit(_) | Tok::RawStringLit(_), _)))
        && real.next().is_none()
}
