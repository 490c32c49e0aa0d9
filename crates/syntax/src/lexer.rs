use logos::{Lexer as LogosLexer, Logos};
use memchr::memchr;
use std::ops::Range;

use crate::ast::{BasicLitKind, CommentKind, Span};
use crate::error::{Diag, LexErrorKind};

// =============================================================================
// 1. Keywords
// =============================================================================

/// Go reserved words. The lexer scans them as identifiers and maps them here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

impl Keyword {
    pub fn lookup(s: &str) -> Option<Self> {
        let kw = match s {
            "break" => Self::Break,
            "case" => Self::Case,
            "chan" => Self::Chan,
            "const" => Self::Const,
            "continue" => Self::Continue,
            "default" => Self::Default,
            "defer" => Self::Defer,
            "else" => Self::Else,
            "fallthrough" => Self::Fallthrough,
            "for" => Self::For,
            "func" => Self::Func,
            "go" => Self::Go,
            "goto" => Self::Goto,
            "if" => Self::If,
            "import" => Self::Import,
            "interface" => Self::Interface,
            "map" => Self::Map,
            "package" => Self::Package,
            "range" => Self::Range,
            "return" => Self::Return,
            "select" => Self::Select,
            "struct" => Self::Struct,
            "switch" => Self::Switch,
            "type" => Self::Type,
            "var" => Self::Var,
            _ => return None,
        };
        Some(kw)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Break => "break",
            Self::Case => "case",
            Self::Chan => "chan",
            Self::Const => "const",
            Self::Continue => "continue",
            Self::Default => "default",
            Self::Defer => "defer",
            Self::Else => "else",
            Self::Fallthrough => "fallthrough",
            Self::For => "for",
            Self::Func => "func",
            Self::Go => "go",
            Self::Goto => "goto",
            Self::If => "if",
            Self::Import => "import",
            Self::Interface => "interface",
            Self::Map => "map",
            Self::Package => "package",
            Self::Range => "range",
            Self::Return => "return",
            Self::Select => "select",
            Self::Struct => "struct",
            Self::Switch => "switch",
            Self::Type => "type",
            Self::Var => "var",
        }
    }
}

// =============================================================================
// 2. Literal validation callbacks
// =============================================================================

#[inline]
fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let mut from = 0;

    while let Some(off) = memchr(b'*', &rem[from..]) {
        let star = from + off;
        if rem.get(star + 1) == Some(&b'/') {
            lex.bump(star + 2);
            return Ok(());
        }
        from = star + 1;
    }

    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

#[inline(always)]
const fn utf8_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}

#[inline(always)]
const fn digit_value(b: u8) -> u32 {
    match b {
        b'0'..=b'9' => (b - b'0') as u32,
        b'a'..=b'f' => (b - b'a') as u32 + 10,
        b'A'..=b'F' => (b - b'A') as u32 + 10,
        _ => u32::MAX,
    }
}

/// Length of the escape sequence whose first byte after `\` is at `at`.
fn escape_len(body: &[u8], at: usize, quote: u8) -> Result<usize, LexErrorKind> {
    let Some(&c) = body.get(at) else {
        return Err(LexErrorKind::InvalidEscape);
    };

    let (digits, base) = match c {
        b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => return Ok(1),
        _ if c == quote => return Ok(1),
        b'x' => (2, 16),
        b'u' => (4, 16),
        b'U' => (8, 16),
        b'0'..=b'7' => (3, 8),
        _ => return Err(LexErrorKind::InvalidEscape),
    };

    // Octal escapes count the leading digit; the others skip the prefix letter.
    let start = if base == 8 { at } else { at + 1 };
    let end = start + digits;
    if end > body.len() {
        return Err(LexErrorKind::InvalidEscape);
    }

    let mut value = 0u32;
    for &b in &body[start..end] {
        let d = digit_value(b);
        if d >= base {
            return Err(LexErrorKind::InvalidEscape);
        }
        value = value * base + d;
    }

    let valid = match c {
        b'u' | b'U' => char::from_u32(value).is_some(),
        b'0'..=b'7' => value <= 0xFF,
        _ => true,
    };
    if !valid {
        return Err(LexErrorKind::InvalidEscape);
    }

    Ok(end - at)
}

/// Validates escapes in a quoted body and returns the number of encoded units.
fn scan_quoted_body(body: &[u8], quote: u8) -> Result<usize, LexErrorKind> {
    let mut i = 0;
    let mut units = 0;
    while i < body.len() {
        if body[i] == b'\\' {
            i += 1 + escape_len(body, i + 1, quote)?;
        } else {
            i += utf8_width(body[i]);
        }
        units += 1;
    }
    Ok(units)
}

fn validate_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice().as_bytes();
    scan_quoted_body(&s[1..s.len() - 1], b'"').map(|_| ())
}

fn validate_rune(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice().as_bytes();
    match scan_quoted_body(&s[1..s.len() - 1], b'\'') {
        Ok(1) => Ok(()),
        Ok(_) => Err(LexErrorKind::InvalidRune),
        Err(e) => Err(e),
    }
}

// =============================================================================
// 3. Numbers: maximal munch in the callback, classification afterwards
// =============================================================================

mod num {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum NumKind {
        Int,
        Float,
        Imag,
    }

    /// Extends a number token to its maximal munch. Invalid shapes like `0b2`
    /// stay one token and are rejected by [`classify`].
    pub fn lex_number(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
        let src = lex.source().as_bytes();
        let start = lex.span().start;
        let hex = src.get(start) == Some(&b'0') && matches!(src.get(start + 1), Some(b'x' | b'X'));

        let mut i = start;
        let mut seen_dot = false;
        while i < src.len() {
            let b = src[i];
            match b {
                b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'_' => i += 1,
                b'.' if !seen_dot && src.get(i + 1) != Some(&b'.') => {
                    seen_dot = true;
                    i += 1;
                }
                b'+' | b'-' => {
                    let prev = src[i - 1] | 0x20;
                    let is_exp = if hex { prev == b'p' } else { prev == b'e' || prev == b'p' };
                    if !is_exp {
                        break;
                    }
                    i += 1;
                }
                _ => break,
            }
        }

        let already = lex.span().end;
        if i > already {
            lex.bump(i - already);
        }
        Ok(())
    }

    pub fn classify(lit: &[u8]) -> Result<NumKind, LexErrorKind> {
        let (body, imag) = match lit.split_last() {
            Some((b'i', rest)) => (rest, true),
            _ => (lit, false),
        };
        if body.is_empty() {
            return Err(LexErrorKind::InvalidNumber);
        }

        let is_float = if body.len() >= 2 && body[0] == b'0' {
            match body[1] | 0x20 {
                b'x' => scan_hex(&body[2..])?,
                b'o' => scan_radix(&body[2..], 8)?,
                b'b' => scan_radix(&body[2..], 2)?,
                _ => scan_decimal(body)?,
            }
        } else {
            scan_decimal(body)?
        };

        Ok(match (imag, is_float) {
            (true, _) => NumKind::Imag,
            (false, true) => NumKind::Float,
            (false, false) => NumKind::Int,
        })
    }

    /// Digits of `base` with single underscores between digits. A leading
    /// underscore is accepted right after a base prefix.
    fn digits_ok(s: &[u8], base: u32, after_prefix: bool) -> bool {
        let mut prev_digit = after_prefix;
        for (i, &b) in s.iter().enumerate() {
            if b == b'_' {
                let next_digit = s.get(i + 1).is_some_and(|&n| digit_value(n) < base);
                if !prev_digit || !next_digit {
                    return false;
                }
                prev_digit = false;
            } else if digit_value(b) < base {
                prev_digit = true;
            } else {
                return false;
            }
        }
        true
    }

    fn split_at_any<'a>(s: &'a [u8], set: &[u8]) -> (&'a [u8], Option<&'a [u8]>) {
        match s.iter().position(|b| set.contains(b)) {
            Some(i) => (&s[..i], Some(&s[i + 1..])),
            None => (s, None),
        }
    }

    fn exponent_ok(exp: &[u8]) -> bool {
        let digits = match exp.first() {
            Some(b'+' | b'-') => &exp[1..],
            _ => exp,
        };
        !digits.is_empty() && digits[0] != b'_' && digits_ok(digits, 10, false)
    }

    fn scan_radix(rest: &[u8], base: u32) -> Result<bool, LexErrorKind> {
        if rest.is_empty() || !digits_ok(rest, base, true) {
            return Err(LexErrorKind::InvalidNumber);
        }
        Ok(false)
    }

    fn scan_hex(rest: &[u8]) -> Result<bool, LexErrorKind> {
        let (mantissa, exp) = split_at_any(rest, b"pP");
        let (int, frac) = split_at_any(mantissa, b".");
        let frac_digits = frac.unwrap_or(&[]);

        let ok = (!int.is_empty() || !frac_digits.is_empty())
            && digits_ok(int, 16, true)
            && (frac_digits.is_empty() || digits_ok(frac_digits, 16, false))
            && (frac.is_none() || exp.is_some())
            && exp.map_or(true, exponent_ok);
        if !ok {
            return Err(LexErrorKind::InvalidNumber);
        }
        Ok(exp.is_some())
    }

    fn scan_decimal(body: &[u8]) -> Result<bool, LexErrorKind> {
        let (mantissa, exp) = split_at_any(body, b"eE");
        let (int, frac) = split_at_any(mantissa, b".");
        let frac_digits = frac.unwrap_or(&[]);
        let is_float = frac.is_some() || exp.is_some();

        let ok = (!int.is_empty() || !frac_digits.is_empty())
            && digits_ok(int, 10, false)
            && (frac_digits.is_empty() || (frac_digits[0] != b'_' && digits_ok(frac_digits, 10, false)))
            && exp.map_or(true, exponent_ok);
        if !ok {
            return Err(LexErrorKind::InvalidNumber);
        }

        // Legacy octal: `0755`.
        if !is_float && int.len() > 1 && int[0] == b'0' && !digits_ok(&int[1..], 8, true) {
            return Err(LexErrorKind::InvalidNumber);
        }
        Ok(is_float)
    }
}

pub use num::NumKind;

/// Classifies a numeric literal, rejecting malformed ones.
pub fn classify_number(lit: &str) -> Result<NumKind, LexErrorKind> {
    num::classify(lit.as_bytes())
}

// =============================================================================
// 4. Raw token definition (logos DFA)
// =============================================================================

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\x0C]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[regex(r"\r\n|\n|\r")] Newline,
    #[regex(r"//[^\n\r]*", allow_greedy = true)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Identifiers and keywords (keywords are mapped in the wrapper)
    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    #[regex(r"[0-9]|\.[0-9]", num::lex_number)] Number,

    #[regex(r"`[^`]*`")] RawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#, validate_string)] String,
    #[regex(r"'([^'\\\n\r]|\\.)+'", validate_rune)] Rune,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    #[regex(r".", priority = 0)] Error,
}

// =============================================================================
// 5. Public token definition (zero-copy)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'src> {
    Ident(&'src str),
    Kw(Keyword),
    IntLit(&'src str),
    FloatLit(&'src str),
    ImagLit(&'src str),
    RuneLit(&'src str),
    StringLit(&'src str),
    RawStringLit(&'src str),

    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    Error,
}

impl<'src> Tok<'src> {
    /// Whether a newline after this token inserts a semicolon.
    #[inline]
    pub const fn ends_statement(&self) -> bool {
        matches!(
            self,
            Tok::Ident(_)
                | Tok::IntLit(_)
                | Tok::FloatLit(_)
                | Tok::ImagLit(_)
                | Tok::RuneLit(_)
                | Tok::StringLit(_)
                | Tok::RawStringLit(_)
                | Tok::Kw(Keyword::Break | Keyword::Continue | Keyword::Fallthrough | Keyword::Return)
                | Tok::Inc
                | Tok::Dec
                | Tok::RParen
                | Tok::RBrack
                | Tok::RBrace
        )
    }

    #[inline]
    pub const fn basic_lit_kind(&self) -> Option<BasicLitKind> {
        match self {
            Tok::IntLit(_) => Some(BasicLitKind::Int),
            Tok::FloatLit(_) => Some(BasicLitKind::Float),
            Tok::ImagLit(_) => Some(BasicLitKind::Imag),
            Tok::RuneLit(_) => Some(BasicLitKind::Rune),
            Tok::StringLit(_) | Tok::RawStringLit(_) => Some(BasicLitKind::String),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_open_delim(&self) -> bool {
        matches!(self, Tok::LParen | Tok::LBrack | Tok::LBrace)
    }

    #[inline]
    pub const fn is_close_delim(&self) -> bool {
        matches!(self, Tok::RParen | Tok::RBrack | Tok::RBrace)
    }

    /// The closer matching an opening delimiter.
    #[inline]
    pub const fn closer(&self) -> Option<Tok<'static>> {
        match self {
            Tok::LParen => Some(Tok::RParen),
            Tok::LBrack => Some(Tok::RBrack),
            Tok::LBrace => Some(Tok::RBrace),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::Ident(s)
            | Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::ImagLit(s)
            | Tok::RuneLit(s)
            | Tok::StringLit(s)
            | Tok::RawStringLit(s) => f.write_str(s),
            Tok::Kw(kw) => f.write_str(kw.as_str()),
            other => f.write_str(other.punct()),
        }
    }
}

impl Tok<'_> {
    /// Source spelling of an operator or delimiter.
    pub const fn punct(&self) -> &'static str {
        match self {
            Tok::Ellipsis => "...",
            Tok::ShlAssign => "<<=",
            Tok::ShrAssign => ">>=",
            Tok::AndNotAssign => "&^=",
            Tok::AddAssign => "+=",
            Tok::SubAssign => "-=",
            Tok::MulAssign => "*=",
            Tok::DivAssign => "/=",
            Tok::ModAssign => "%=",
            Tok::AndAssign => "&=",
            Tok::OrAssign => "|=",
            Tok::XorAssign => "^=",
            Tok::Shl => "<<",
            Tok::Shr => ">>",
            Tok::AndNot => "&^",
            Tok::LAnd => "&&",
            Tok::LOr => "||",
            Tok::EqEq => "==",
            Tok::NotEq => "!=",
            Tok::Le => "<=",
            Tok::Ge => ">=",
            Tok::Inc => "++",
            Tok::Dec => "--",
            Tok::Define => ":=",
            Tok::Arrow => "<-",
            Tok::Assign => "=",
            Tok::Plus => "+",
            Tok::Minus => "-",
            Tok::Star => "*",
            Tok::Slash => "/",
            Tok::Percent => "%",
            Tok::Amp => "&",
            Tok::Pipe => "|",
            Tok::Caret => "^",
            Tok::Tilde => "~",
            Tok::Bang => "!",
            Tok::Lt => "<",
            Tok::Gt => ">",
            Tok::LParen => "(",
            Tok::RParen => ")",
            Tok::LBrack => "[",
            Tok::RBrack => "]",
            Tok::LBrace => "{",
            Tok::RBrace => "}",
            Tok::Comma => ",",
            Tok::Semi => ";",
            Tok::Colon => ":",
            Tok::Dot => ".",
            _ => "<invalid>",
        }
    }
}

impl RawTok {
    fn to_token(self, slice: &str) -> Tok<'_> {
        match self {
            Self::Ident => match Keyword::lookup(slice) {
                Some(kw) => Tok::Kw(kw),
                None => Tok::Ident(slice),
            },
            Self::Rune => Tok::RuneLit(slice),
            Self::String => Tok::StringLit(slice),
            Self::RawString => Tok::RawStringLit(slice),

            Self::Ellipsis => Tok::Ellipsis,
            Self::ShlAssign => Tok::ShlAssign,
            Self::ShrAssign => Tok::ShrAssign,
            Self::AndNotAssign => Tok::AndNotAssign,
            Self::AddAssign => Tok::AddAssign,
            Self::SubAssign => Tok::SubAssign,
            Self::MulAssign => Tok::MulAssign,
            Self::DivAssign => Tok::DivAssign,
            Self::ModAssign => Tok::ModAssign,
            Self::AndAssign => Tok::AndAssign,
            Self::OrAssign => Tok::OrAssign,
            Self::XorAssign => Tok::XorAssign,
            Self::Shl => Tok::Shl,
            Self::Shr => Tok::Shr,
            Self::AndNot => Tok::AndNot,
            Self::LAnd => Tok::LAnd,
            Self::LOr => Tok::LOr,
            Self::EqEq => Tok::EqEq,
            Self::NotEq => Tok::NotEq,
            Self::Le => Tok::Le,
            Self::Ge => Tok::Ge,
            Self::Inc => Tok::Inc,
            Self::Dec => Tok::Dec,
            Self::Define => Tok::Define,
            Self::Arrow => Tok::Arrow,
            Self::Assign => Tok::Assign,
            Self::Plus => Tok::Plus,
            Self::Minus => Tok::Minus,
            Self::Star => Tok::Star,
            Self::Slash => Tok::Slash,
            Self::Percent => Tok::Percent,
            Self::Amp => Tok::Amp,
            Self::Pipe => Tok::Pipe,
            Self::Caret => Tok::Caret,
            Self::Tilde => Tok::Tilde,
            Self::Bang => Tok::Bang,
            Self::Lt => Tok::Lt,
            Self::Gt => Tok::Gt,
            Self::LParen => Tok::LParen,
            Self::RParen => Tok::RParen,
            Self::LBrack => Tok::LBrack,
            Self::RBrack => Tok::RBrack,
            Self::LBrace => Tok::LBrace,
            Self::RBrace => Tok::RBrace,
            Self::Comma => Tok::Comma,
            Self::Semi => Tok::Semi,
            Self::Colon => Tok::Colon,
            Self::Dot => Tok::Dot,

            // Trivia, numbers and BOM never reach here.
            Self::Bom
            | Self::Newline
            | Self::LineComment
            | Self::BlockComment
            | Self::Number
            | Self::Error => Tok::Error,
        }
    }
}

// =============================================================================
// 6. Lexer wrapper: semicolon insertion + comment collection + diags
// =============================================================================

/// `(start, token, end)` byte-offset triple.
pub type Spanned<'src> = (usize, Tok<'src>, usize);

/// A comment seen by the lexer; its text is recovered from the source via `span`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawComment {
    pub kind: CommentKind,
    pub span: Span,
}

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<Spanned<'src>>,
    diags: Vec<Diag>,
    comments: Vec<RawComment>,
    last_can_insert_semi: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::new(),
            comments: Vec::new(),
            last_can_insert_semi: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    pub fn take_comments(&mut self) -> Vec<RawComment> {
        std::mem::take(&mut self.comments)
    }

    #[inline]
    fn push_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        self.diags.push(kind.diag(Span::new(span.start, span.end)));
        self.last_can_insert_semi = false;
    }

    #[inline]
    fn insert_semi_at(&mut self, pos: usize) {
        if self.last_can_insert_semi {
            self.last_can_insert_semi = false;
            self.pending = Some((pos, Tok::Semi, pos));
        }
    }

    fn handle_raw(&mut self, raw: RawTok) -> Option<Spanned<'src>> {
        let span = self.logos.span();
        let slice = self.logos.slice();

        match raw {
            RawTok::Bom if span.start == 0 => None,
            RawTok::Bom | RawTok::Error => {
                self.push_diag(LexErrorKind::InvalidToken, span.clone());
                Some((span.start, Tok::Error, span.end))
            }
            RawTok::Newline => {
                self.insert_semi_at(span.start);
                None
            }
            RawTok::LineComment => {
                self.comments.push(RawComment {
                    kind: CommentKind::Line,
                    span: Span::new(span.start, span.end),
                });
                None
            }
            RawTok::BlockComment => {
                self.comments.push(RawComment {
                    kind: CommentKind::Block,
                    span: Span::new(span.start, span.end),
                });
                // A block comment spanning lines acts like a newline.
                if let Some(off) = slice.find(['\n', '\r']) {
                    self.insert_semi_at(span.start + off);
                }
                None
            }
            RawTok::Number => Some(self.number_token(span, slice)),
            _ => {
                let tok = raw.to_token(slice);
                self.last_can_insert_semi = tok.ends_statement();
                Some((span.start, tok, span.end))
            }
        }
    }

    fn number_token(&mut self, span: Range<usize>, slice: &'src str) -> Spanned<'src> {
        match classify_number(slice) {
            Ok(kind) => {
                self.last_can_insert_semi = true;
                let tok = match kind {
                    NumKind::Int => Tok::IntLit(slice),
                    NumKind::Float => Tok::FloatLit(slice),
                    NumKind::Imag => Tok::ImagLit(slice),
                };
                (span.start, tok, span.end)
            }
            Err(kind) => {
                self.push_diag(kind, span.clone());
                (span.start, Tok::Error, span.end)
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Spanned<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }
            if self.eof_done {
                return None;
            }

            match self.logos.next() {
                None => {
                    // Leave room for a final injected ';' on the next turn.
                    self.eof_done = true;
                    self.insert_semi_at(self.src_len);
                }
                Some(Err(kind)) => {
                    let span = self.logos.span();
                    self.push_diag(kind, span.clone());
                    if kind != LexErrorKind::UnterminatedComment {
                        return Some((span.start, Tok::Error, span.end));
                    }
                }
                Some(Ok(raw)) => {
                    if let Some(item) = self.handle_raw(raw) {
                        return Some(item);
                    }
                }
            }
        }
    }
}

/// Output of a full lexing pass.
#[derive(Debug, Default)]
pub struct Tokens<'src> {
    pub toks: Vec<Spanned<'src>>,
    pub comments: Vec<RawComment>,
    pub diags: Vec<Diag>,
}

/// Lexes `input` to completion.
pub fn tokenize(input: &str) -> Tokens<'_> {
    let mut lx = Lexer::new(input);
    let toks: Vec<_> = lx.by_ref().collect();
    Tokens {
        toks,
        comments: lx.take_comments(),
        diags: lx.take_diags(),
    }
}
