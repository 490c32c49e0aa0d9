//! Recursive-descent parser producing the declaration-level tree.
//!
//! The parser stops at the first error. Expressions and function bodies are
//! scanned as token-balanced spans instead of being parsed.

use crate::ast::{
    self, ArrayLen, AstArena, Block, ChanDir, CommentGroupId, DeclId, Expr, ExprId, Field,
    FieldId, FieldList, FuncDecl, FuncDeclId, GenDecl, GenDeclKind, IdentName, ImportName,
    ImportSpec, Interner, ListRef, Receiver, Results, Signature, SignatureId, SourceFile, Span,
    StringLit, TopLevelDecl, Type, TypeId, TypeSpec, TypeTerm, ValueSpec,
};
use crate::error::{Diag, LineIndex};
use crate::lexer::{tokenize, Keyword, RawComment, Spanned, Tok, Tokens};

type PResult<T> = Result<T, Diag>;

/// Everything produced by a successful parse.
#[derive(Debug)]
pub struct ParseOutput {
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
}

/// Lexes and parses a whole file. Lexer diagnostics are reported all at once;
/// parsing stops at the first error.
pub fn parse(src: &str) -> Result<ParseOutput, Vec<Diag>> {
    let Tokens {
        toks,
        comments,
        diags,
    } = tokenize(src);
    if !diags.is_empty() {
        return Err(diags);
    }

    let mut p = Parser::new(src, toks, &comments);
    let file = p.parse_source_file().map_err(|d| vec![d])?;
    Ok(ParseOutput {
        arena: p.arena,
        interner: p.interner,
        file,
    })
}

// =============================================================================
// 1. Parameter list resolution
// =============================================================================

/// One comma-separated entry of a parameter list before grouping.
#[derive(Clone, Debug)]
struct ParamDecl {
    names: Vec<IdentName>,
    ellipsis_pos: Option<Span>,
    typ: Option<TypeId>,
    span: Span,
}

/// Groups `a, b int` into one field and turns a list of bare identifiers
/// (`(int, string)`) into unnamed fields.
fn resolve_param_list(arena: &mut AstArena, params: Vec<ParamDecl>) -> Vec<FieldId> {
    let mut out = Vec::new();
    let mut pending: Vec<IdentName> = Vec::new();
    let mut pending_start: Option<u32> = None;

    for param in params {
        let Some(typ) = param.typ else {
            if pending.is_empty() {
                pending_start = Some(param.span.start);
            }
            pending.extend(param.names);
            continue;
        };

        if param.names.is_empty() {
            // `(a, []int)`: the bare names were types too.
            flush_as_types(arena, &mut pending, &mut out);
            pending_start = None;
            out.push(alloc_param(arena, ListRef::EMPTY, param.ellipsis_pos, typ, param.span));
            continue;
        }

        let mut names = std::mem::take(&mut pending);
        names.extend(param.names);
        let names = arena.list_ident_names(names);
        let span = Span {
            start: pending_start.take().unwrap_or(param.span.start),
            end: param.span.end,
        };
        out.push(alloc_param(arena, names, param.ellipsis_pos, typ, span));
    }

    flush_as_types(arena, &mut pending, &mut out);
    out
}

fn flush_as_types(arena: &mut AstArena, pending: &mut Vec<IdentName>, out: &mut Vec<FieldId>) {
    for name in pending.drain(..) {
        let typ = arena.types.alloc(
            Type::Named {
                pkg: None,
                pkg_pos: None,
                name: name.sym,
                name_pos: name.pos,
                args: ListRef::EMPTY,
            },
            name.pos,
        );
        out.push(alloc_param(arena, ListRef::EMPTY, None, typ, name.pos));
    }
}

fn alloc_param(
    arena: &mut AstArena,
    names: ListRef<IdentName>,
    ellipsis_pos: Option<Span>,
    typ: TypeId,
    span: Span,
) -> FieldId {
    arena.fields.alloc(
        Field {
            names,
            ellipsis_pos,
            typ,
            tag: None,
            is_embed: false,
            doc: None,
            comment: None,
        },
        span,
    )
}

// =============================================================================
// 2. Comment groups
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct GroupInfo {
    id: CommentGroupId,
    span: Span,
    last_line: usize,
    /// First comment is the first thing on its line
    own_line: bool,
}

#[inline]
fn starts_type(tok: Tok<'_>) -> bool {
    matches!(
        tok,
        Tok::Ident(_)
            | Tok::Star
            | Tok::LBrack
            | Tok::LParen
            | Tok::Arrow
            | Tok::Kw(
                Keyword::Map | Keyword::Chan | Keyword::Struct | Keyword::Interface | Keyword::Func
            )
    )
}

// =============================================================================
// 3. Parser state
// =============================================================================

struct Parser<'src> {
    src: &'src str,
    toks: Vec<Spanned<'src>>,
    pos: usize,
    arena: AstArena,
    interner: Interner,
    lines: LineIndex,
    groups: Vec<GroupInfo>,
}

impl<'src> Parser<'src> {
    fn new(src: &'src str, toks: Vec<Spanned<'src>>, comments: &[RawComment]) -> Self {
        let mut p = Self {
            src,
            toks,
            pos: 0,
            arena: AstArena::new(),
            interner: Interner::new(),
            lines: LineIndex::new(src),
            groups: Vec::new(),
        };
        p.build_comment_groups(comments);
        p
    }

    // ----- token cursor -----

    #[inline]
    fn peek(&self) -> Option<Tok<'src>> {
        self.toks.get(self.pos).map(|t| t.1)
    }

    #[inline]
    fn peek_at(&self, n: usize) -> Option<Tok<'src>> {
        self.toks.get(self.pos + n).map(|t| t.1)
    }

    #[inline]
    fn cur_start(&self) -> usize {
        self.toks.get(self.pos).map_or(self.src.len(), |t| t.0)
    }

    #[inline]
    fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1) {
            Some(i) => self.toks[i].2,
            None => 0,
        }
    }

    #[inline]
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    #[inline]
    fn bump(&mut self) -> Span {
        let (s, _, e) = self.toks[self.pos];
        self.pos += 1;
        Span::new(s, e)
    }

    fn eat(&mut self, tok: Tok<'src>) -> Option<Span> {
        if self.peek() == Some(tok) {
            Some(self.bump())
        } else {
            None
        }
    }

    fn err_here(&self, expected: &str) -> Diag {
        match self.toks.get(self.pos) {
            Some(&(s, tok, e)) => {
                let found = match tok {
                    Tok::Semi if s == e => "newline".to_string(),
                    _ => format!("'{tok}'"),
                };
                Diag::parse(Span::new(s, e), format!("expected {expected}, found {found}"))
            }
            None => Diag::parse(
                Span::new(self.src.len(), self.src.len()),
                format!("expected {expected}, found end of file"),
            ),
        }
    }

    fn expect(&mut self, tok: Tok<'src>, what: &str) -> PResult<Span> {
        self.eat(tok).ok_or_else(|| self.err_here(what))
    }

    fn expect_ident(&mut self) -> PResult<IdentName> {
        match self.peek() {
            Some(Tok::Ident(name)) => {
                let pos = self.bump();
                Ok(IdentName {
                    sym: self.interner.intern(name),
                    pos,
                })
            }
            _ => Err(self.err_here("identifier")),
        }
    }

    /// Statement terminator; end of file also terminates.
    fn expect_semi(&mut self) -> PResult<()> {
        if self.peek().is_none() {
            return Ok(());
        }
        self.expect(Tok::Semi, "';'").map(|_| ())
    }

    /// Index of the delimiter closing the one at `open`.
    fn matching_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for (i, t) in self.toks.iter().enumerate().skip(open) {
            if t.1.is_open_delim() {
                depth += 1;
            } else if t.1.is_close_delim() {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Skips a balanced bracket group starting at the cursor.
    fn skip_balanced(&mut self) -> PResult<Span> {
        let start = self.cur_start();
        let close = self
            .matching_close(self.pos)
            .ok_or_else(|| self.err_here("closing delimiter"))?;
        self.pos = close + 1;
        Ok(self.span_from(start))
    }

    // ----- comments -----

    fn starts_line(&self, offset: usize) -> bool {
        let line_start = self.lines.line_start(self.lines.line(offset));
        self.src[line_start..offset]
            .bytes()
            .all(|b| matches!(b, b' ' | b'\t' | b'\x0C' | b'\r'))
    }

    fn build_comment_groups(&mut self, comments: &[RawComment]) {
        let mut current: Vec<RawComment> = Vec::new();
        let mut last_line = 0;

        for &c in comments {
            let start = c.span.start as usize;
            let start_line = self.lines.line(start);
            let own_line = self.starts_line(start);

            let split = match current.first() {
                None => false,
                Some(first) => {
                    !own_line
                        || !self.starts_line(first.span.start as usize)
                        || start_line > last_line + 1
                }
            };
            if split {
                self.flush_group(&mut current, last_line);
            }

            last_line = self.lines.line((c.span.end as usize).saturating_sub(1).max(start));
            current.push(c);
        }
        self.flush_group(&mut current, last_line);
    }

    fn flush_group(&mut self, current: &mut Vec<RawComment>, last_line: usize) {
        let (Some(first), Some(last)) = (current.first().copied(), current.last().copied()) else {
            return;
        };
        let ids: Vec<_> = current
            .drain(..)
            .map(|c| self.arena.comments.alloc(ast::Comment { kind: c.kind }, c.span))
            .collect();
        let comments = self.arena.list_comment_ids(ids);
        let span = first.span.to(last.span);
        let id = self
            .arena
            .comment_groups
            .alloc(ast::CommentGroup { comments }, span);
        self.groups.push(GroupInfo {
            id,
            span,
            last_line,
            own_line: self.starts_line(first.span.start as usize),
        });
    }

    /// Doc group for the token at `index`: ends on the line just above it with
    /// no token in between.
    fn doc_at(&self, index: usize) -> Option<CommentGroupId> {
        let start = self.toks.get(index).map_or(self.src.len(), |t| t.0);
        let floor = match index.checked_sub(1) {
            Some(i) => self.toks[i].2,
            None => 0,
        };
        let k = self.groups.partition_point(|g| g.span.end as usize <= start);
        let g = self.groups.get(k.checked_sub(1)?)?;
        let adjacent = g.last_line + 1 == self.lines.line(start);
        (g.own_line && adjacent && g.span.start as usize >= floor).then_some(g.id)
    }

    /// Line comment group starting on the same line right after `end`.
    fn trailing_after(&self, end: usize) -> Option<CommentGroupId> {
        let k = self.groups.partition_point(|g| (g.span.start as usize) < end);
        let g = self.groups.get(k)?;
        let same_line = self.lines.line(g.span.start as usize) == self.lines.line(end);
        let next_tok = self.toks[self.pos..].iter().find(|t| t.2 > t.0);
        let nothing_between = next_tok.map_or(true, |t| t.0 >= g.span.end as usize);
        (!g.own_line && same_line && nothing_between).then_some(g.id)
    }

    // =========================================================================
    // 4. Declarations
    // =========================================================================

    fn parse_source_file(&mut self) -> PResult<SourceFile> {
        let doc = self.doc_at(self.pos);
        let package_pos = self.expect(Tok::Kw(Keyword::Package), "'package'")?;
        let name = self.expect_ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        while let Some(tok) = self.peek() {
            let decl = match tok {
                Tok::Kw(Keyword::Import) => TopLevelDecl::Gen(self.parse_gen_decl(GenDeclKind::Import)?),
                Tok::Kw(Keyword::Const) => TopLevelDecl::Gen(self.parse_gen_decl(GenDeclKind::Const)?),
                Tok::Kw(Keyword::Var) => TopLevelDecl::Gen(self.parse_gen_decl(GenDeclKind::Var)?),
                Tok::Kw(Keyword::Type) => TopLevelDecl::Gen(self.parse_gen_decl(GenDeclKind::Type)?),
                Tok::Kw(Keyword::Func) => TopLevelDecl::Func(self.parse_func_decl()?),
                Tok::Semi => {
                    self.pos += 1;
                    continue;
                }
                _ => return Err(self.err_here("declaration")),
            };
            decls.push(decl);
            self.expect_semi()?;
        }

        let group_ids: Vec<_> = self.groups.iter().map(|g| g.id).collect();
        Ok(SourceFile {
            package_pos,
            name: name.sym,
            name_pos: name.pos,
            decls: self.arena.list_top_decls(decls),
            comments: self.arena.list_comment_group_ids(group_ids),
            doc,
        })
    }

    fn parse_gen_decl(&mut self, kind: GenDeclKind) -> PResult<DeclId> {
        let doc = self.doc_at(self.pos);
        let kw_pos = self.bump();
        let mut specs = Vec::new();

        let (l_paren, r_paren) = match self.eat(Tok::LParen) {
            Some(l) => loop {
                if let Some(r) = self.eat(Tok::RParen) {
                    break (Some(l), Some(r));
                }
                let spec_doc = self.doc_at(self.pos);
                specs.push(self.parse_spec(kind, spec_doc)?);
                if self.eat(Tok::Semi).is_none() && self.peek() != Some(Tok::RParen) {
                    return Err(self.err_here("';' or ')'"));
                }
            },
            None => {
                specs.push(self.parse_spec(kind, None)?);
                (None, None)
            }
        };

        let specs = self.arena.list_specs(specs);
        let span = self.span_from(kw_pos.start as usize);
        Ok(self.arena.decls.alloc(
            GenDecl {
                doc,
                kw_pos,
                kind,
                l_paren,
                specs,
                r_paren,
            },
            span,
        ))
    }

    fn parse_spec(&mut self, kind: GenDeclKind, doc: Option<CommentGroupId>) -> PResult<ast::Spec> {
        match kind {
            GenDeclKind::Import => self.parse_import_spec(doc),
            GenDeclKind::Const | GenDeclKind::Var => self.parse_value_spec(doc),
            GenDeclKind::Type => self.parse_type_spec(doc),
        }
    }

    fn parse_import_spec(&mut self, doc: Option<CommentGroupId>) -> PResult<ast::Spec> {
        let name = match self.peek() {
            Some(Tok::Dot) => Some(ImportName::Dot(self.bump())),
            Some(Tok::Ident("_")) => Some(ImportName::Blank(self.bump())),
            Some(Tok::Ident(_)) => {
                let n = self.expect_ident()?;
                Some(ImportName::Name(n.sym, n.pos))
            }
            _ => None,
        };
        let path = match self.peek() {
            Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => StringLit { raw: self.bump() },
            _ => return Err(self.err_here("import path")),
        };
        let comment = self.trailing_after(self.prev_end());
        Ok(ast::Spec::Import(ImportSpec {
            doc,
            name,
            path,
            comment,
        }))
    }

    fn parse_value_spec(&mut self, doc: Option<CommentGroupId>) -> PResult<ast::Spec> {
        let names = self.parse_ident_list()?;
        let typ = match self.peek() {
            Some(t) if starts_type(t) => Some(self.parse_type()?),
            _ => None,
        };
        let values = if self.eat(Tok::Assign).is_some() {
            self.parse_expr_list()?
        } else {
            ListRef::EMPTY
        };
        let comment = self.trailing_after(self.prev_end());
        Ok(ast::Spec::Value(ValueSpec {
            doc,
            names,
            typ,
            values,
            comment,
        }))
    }

    fn parse_type_spec(&mut self, doc: Option<CommentGroupId>) -> PResult<ast::Spec> {
        let name = self.expect_ident()?;
        let type_params = if self.looks_like_type_params() {
            Some(self.skip_balanced()?)
        } else {
            None
        };
        let alias = self.eat(Tok::Assign).is_some();
        let typ = self.parse_type()?;
        let comment = self.trailing_after(self.prev_end());
        Ok(ast::Spec::Type(TypeSpec {
            doc,
            name: name.sym,
            name_pos: name.pos,
            type_params,
            typ,
            alias,
            comment,
        }))
    }

    /// `type A[T any] ...` versus `type A [N]int`.
    fn looks_like_type_params(&self) -> bool {
        self.peek() == Some(Tok::LBrack)
            && matches!(self.peek_at(1), Some(Tok::Ident(_)))
            && matches!(
                self.peek_at(2),
                Some(
                    Tok::Ident(_)
                        | Tok::Comma
                        | Tok::Tilde
                        | Tok::LBrack
                        | Tok::Kw(
                            Keyword::Interface
                                | Keyword::Func
                                | Keyword::Map
                                | Keyword::Chan
                                | Keyword::Struct
                        )
                )
            )
    }

    fn parse_func_decl(&mut self) -> PResult<FuncDeclId> {
        let doc = self.doc_at(self.pos);
        let func_pos = self.bump();
        let recv = if self.peek() == Some(Tok::LParen) {
            Some(self.parse_receiver()?)
        } else {
            None
        };
        let name = self.expect_ident()?;
        let type_params = if self.peek() == Some(Tok::LBrack) {
            Some(self.skip_balanced()?)
        } else {
            None
        };
        let signature = self.parse_signature()?;
        let body = if self.peek() == Some(Tok::LBrace) {
            Some(self.parse_block()?)
        } else {
            None
        };

        let span = self.span_from(func_pos.start as usize);
        Ok(self.arena.funcs.alloc(
            FuncDecl {
                doc,
                func_pos,
                recv,
                name: name.sym,
                name_pos: name.pos,
                type_params,
                signature,
                body,
            },
            span,
        ))
    }

    fn parse_receiver(&mut self) -> PResult<Receiver> {
        let l_paren = self.bump();
        let name = match (self.peek(), self.peek_at(1)) {
            (Some(Tok::Ident(_)), Some(Tok::Ident(_) | Tok::Star)) => Some(self.expect_ident()?),
            _ => None,
        };
        let typ = self.parse_type()?;
        let r_paren = self.expect(Tok::RParen, "')'")?;
        Ok(Receiver {
            l_paren,
            name,
            typ,
            r_paren,
        })
    }

    fn parse_block(&mut self) -> PResult<Block> {
        let l_brace = self.bump();
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => return Err(self.err_here("'}'")),
                Some(Tok::RBrace) if depth == 0 => {
                    let r_brace = self.bump();
                    return Ok(Block { l_brace, r_brace });
                }
                Some(t) if t.is_open_delim() => depth += 1,
                Some(t) if t.is_close_delim() => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => return Err(self.err_here("'}'")),
                },
                _ => {}
            }
            self.pos += 1;
        }
    }

    fn parse_ident_list(&mut self) -> PResult<ListRef<IdentName>> {
        let mut names = vec![self.expect_ident()?];
        while self.eat(Tok::Comma).is_some() {
            names.push(self.expect_ident()?);
        }
        Ok(self.arena.list_ident_names(names))
    }

    // =========================================================================
    // 5. Opaque expressions
    // =========================================================================

    fn parse_expr_list(&mut self) -> PResult<ListRef<ExprId>> {
        let mut exprs = vec![self.parse_raw_expr(&[Tok::Comma, Tok::RParen])?];
        while self.eat(Tok::Comma).is_some() {
            exprs.push(self.parse_raw_expr(&[Tok::Comma, Tok::RParen])?);
        }
        Ok(self.arena.list_exprs(exprs))
    }

    /// Consumes a token-balanced run up to a `stops` token or `;` at depth zero.
    fn parse_raw_expr(&mut self, stops: &[Tok<'src>]) -> PResult<ExprId> {
        let first = self.pos;
        let mut depth = 0usize;

        while let Some(tok) = self.peek() {
            if depth == 0 && (tok == Tok::Semi || stops.contains(&tok)) {
                break;
            }
            if tok.is_open_delim() {
                depth += 1;
            } else if tok.is_close_delim() {
                match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => break,
                }
            }
            self.pos += 1;
        }

        if depth != 0 {
            return Err(self.err_here("closing delimiter"));
        }
        if self.pos == first {
            return Err(self.err_here("expression"));
        }

        let kind = match self.pos - first {
            1 => self.toks[first].1.basic_lit_kind(),
            _ => None,
        };
        let span = self.span_from(self.toks[first].0);
        Ok(self.arena.exprs.alloc(Expr { kind }, span))
    }

    // =========================================================================
    // 6. Types
    // =========================================================================

    fn parse_type(&mut self) -> PResult<TypeId> {
        let start = self.cur_start();
        let typ = match self.peek() {
            Some(Tok::Ident(_)) => return self.parse_named_type(),
            Some(Tok::Star) => {
                let star_pos = self.bump();
                let elem = self.parse_type()?;
                Type::Pointer { star_pos, elem }
            }
            Some(Tok::LBrack) => {
                let l_brack = self.bump();
                if self.eat(Tok::RBrack).is_some() {
                    let elem = self.parse_type()?;
                    Type::Slice { l_brack, elem }
                } else {
                    let len = match self.eat(Tok::Ellipsis) {
                        Some(e) => ArrayLen::Ellipsis(e),
                        None => ArrayLen::Expr(self.parse_raw_expr(&[Tok::RBrack])?),
                    };
                    self.expect(Tok::RBrack, "']'")?;
                    let elem = self.parse_type()?;
                    Type::Array { l_brack, len, elem }
                }
            }
            Some(Tok::Kw(Keyword::Map)) => {
                let map_pos = self.bump();
                self.expect(Tok::LBrack, "'['")?;
                let key = self.parse_type()?;
                self.expect(Tok::RBrack, "']'")?;
                let val = self.parse_type()?;
                Type::Map { map_pos, key, val }
            }
            Some(Tok::Kw(Keyword::Chan)) => {
                let chan_pos = self.bump();
                let dir = match self.eat(Tok::Arrow) {
                    Some(_) => ChanDir::Send,
                    None => ChanDir::Both,
                };
                let elem = self.parse_type()?;
                Type::Chan { dir, chan_pos, elem }
            }
            Some(Tok::Arrow) => {
                self.bump();
                let chan_pos = self.expect(Tok::Kw(Keyword::Chan), "'chan'")?;
                let elem = self.parse_type()?;
                Type::Chan {
                    dir: ChanDir::Recv,
                    chan_pos,
                    elem,
                }
            }
            Some(Tok::Kw(Keyword::Struct)) => self.parse_struct_type()?,
            Some(Tok::Kw(Keyword::Interface)) => self.parse_interface_type()?,
            Some(Tok::Kw(Keyword::Func)) => {
                let func_pos = self.bump();
                let sig = self.parse_signature()?;
                Type::Func { func_pos, sig }
            }
            Some(Tok::LParen) => {
                let l_paren = self.bump();
                let typ = self.parse_type()?;
                self.expect(Tok::RParen, "')'")?;
                Type::Paren { l_paren, typ }
            }
            _ => return Err(self.err_here("type")),
        };
        let span = self.span_from(start);
        Ok(self.arena.types.alloc(typ, span))
    }

    fn parse_named_type(&mut self) -> PResult<TypeId> {
        let first = self.expect_ident()?;
        let (pkg, pkg_pos, name) = if self.eat(Tok::Dot).is_some() {
            (Some(first.sym), Some(first.pos), self.expect_ident()?)
        } else {
            (None, None, first)
        };

        let args = if self.eat(Tok::LBrack).is_some() {
            let mut args = Vec::new();
            while self.peek() != Some(Tok::RBrack) {
                args.push(self.parse_type()?);
                if self.eat(Tok::Comma).is_none() {
                    break;
                }
            }
            self.expect(Tok::RBrack, "']'")?;
            self.arena.list_types(args)
        } else {
            ListRef::EMPTY
        };

        let span = self.span_from(first.pos.start as usize);
        Ok(self.arena.types.alloc(
            Type::Named {
                pkg,
                pkg_pos,
                name: name.sym,
                name_pos: name.pos,
                args,
            },
            span,
        ))
    }

    fn parse_signature(&mut self) -> PResult<SignatureId> {
        let start = self.cur_start();
        let params = self.parse_params()?;
        let results = match self.peek() {
            Some(Tok::LParen) => Some(Results::Params(self.parse_params()?)),
            Some(t) if starts_type(t) => Some(Results::Type(self.parse_type()?)),
            _ => None,
        };
        let span = self.span_from(start);
        Ok(self
            .arena
            .signatures
            .alloc(Signature { params, results }, span))
    }

    fn parse_params(&mut self) -> PResult<FieldList> {
        let l_paren = self.expect(Tok::LParen, "'('")?;
        let mut decls = Vec::new();
        while self.peek() != Some(Tok::RParen) {
            decls.push(self.parse_param_decl()?);
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        let r_paren = self.expect(Tok::RParen, "')'")?;

        let ids = resolve_param_list(&mut self.arena, decls);
        Ok(FieldList {
            l_paren,
            fields: self.arena.list_fields(ids),
            r_paren,
        })
    }

    fn parse_param_decl(&mut self) -> PResult<ParamDecl> {
        let start = self.cur_start();

        if let Some(Tok::Ident(_)) = self.peek() {
            let named = match self.peek_at(1) {
                Some(Tok::Comma | Tok::RParen) => {
                    let name = self.expect_ident()?;
                    return Ok(ParamDecl {
                        names: vec![name],
                        ellipsis_pos: None,
                        typ: None,
                        span: name.pos,
                    });
                }
                Some(Tok::Dot) => false,
                Some(Tok::Ellipsis) => true,
                Some(Tok::LBrack) => self.bracket_starts_param_type(),
                Some(t) => starts_type(t),
                None => false,
            };
            if named {
                let name = self.expect_ident()?;
                let ellipsis_pos = self.eat(Tok::Ellipsis);
                let typ = self.parse_type()?;
                return Ok(ParamDecl {
                    names: vec![name],
                    ellipsis_pos,
                    typ: Some(typ),
                    span: self.span_from(start),
                });
            }
        }

        let ellipsis_pos = self.eat(Tok::Ellipsis);
        let typ = self.parse_type()?;
        Ok(ParamDecl {
            names: Vec::new(),
            ellipsis_pos,
            typ: Some(typ),
            span: self.span_from(start),
        })
    }

    /// For `x [` in a parameter list: `x []T` / `x [N]T` versus `List[T]`.
    fn bracket_starts_param_type(&self) -> bool {
        if self.peek_at(2) == Some(Tok::RBrack) {
            return true;
        }
        match self.matching_close(self.pos + 1) {
            Some(close) => self.toks.get(close + 1).is_some_and(|t| starts_type(t.1)),
            None => false,
        }
    }

    fn parse_struct_type(&mut self) -> PResult<Type> {
        let struct_pos = self.bump();
        self.expect(Tok::LBrace, "'{'")?;
        let mut fields = Vec::new();
        loop {
            if self.eat(Tok::RBrace).is_some() {
                break;
            }
            fields.push(self.parse_struct_field()?);
            if self.eat(Tok::Semi).is_none() && self.peek() != Some(Tok::RBrace) {
                return Err(self.err_here("';' or '}'"));
            }
        }
        Ok(Type::Struct {
            struct_pos,
            fields: self.arena.list_fields(fields),
        })
    }

    fn parse_struct_field(&mut self) -> PResult<FieldId> {
        let start = self.cur_start();
        let doc = self.doc_at(self.pos);

        let is_embed = match (self.peek(), self.peek_at(1)) {
            (Some(Tok::Star), _) => true,
            (
                Some(Tok::Ident(_)),
                None
                | Some(
                    Tok::Dot | Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_),
                ),
            ) => true,
            (Some(Tok::Ident(_)), Some(Tok::LBrack)) => self.is_generic_embed(),
            (Some(Tok::Ident(_)), _) => false,
            _ => return Err(self.err_here("field name or embedded type")),
        };

        let (names, typ) = if is_embed {
            (ListRef::EMPTY, self.parse_type()?)
        } else {
            let names = self.parse_ident_list()?;
            (names, self.parse_type()?)
        };
        let tag = match self.peek() {
            Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => Some(StringLit { raw: self.bump() }),
            _ => None,
        };
        let comment = self.trailing_after(self.prev_end());

        let span = self.span_from(start);
        Ok(self.arena.fields.alloc(
            Field {
                names,
                ellipsis_pos: None,
                typ,
                tag,
                is_embed,
                doc,
                comment,
            },
            span,
        ))
    }

    /// `List[T]` embedded in a struct versus `Items [N]T`.
    fn is_generic_embed(&self) -> bool {
        if self.peek_at(2) == Some(Tok::RBrack) {
            return false;
        }
        match self.matching_close(self.pos + 1) {
            Some(close) => matches!(
                self.toks.get(close + 1).map(|t| t.1),
                None | Some(Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_))
            ),
            None => false,
        }
    }

    fn parse_interface_type(&mut self) -> PResult<Type> {
        let interface_pos = self.bump();
        self.expect(Tok::LBrace, "'{'")?;
        let mut elems = Vec::new();
        loop {
            if self.eat(Tok::RBrace).is_some() {
                break;
            }
            elems.push(self.parse_interface_elem()?);
            if self.eat(Tok::Semi).is_none() && self.peek() != Some(Tok::RBrace) {
                return Err(self.err_here("';' or '}'"));
            }
        }
        Ok(Type::Interface {
            interface_pos,
            elems: self.arena.list_fields(elems),
        })
    }

    fn parse_interface_elem(&mut self) -> PResult<FieldId> {
        let start = self.cur_start();
        let doc = self.doc_at(self.pos);

        let (names, typ) = match (self.peek(), self.peek_at(1)) {
            (Some(Tok::Ident(_)), Some(Tok::LParen)) => {
                let name = self.expect_ident()?;
                let sig = self.parse_signature()?;
                let typ = self.arena.types.alloc(
                    Type::Func {
                        func_pos: name.pos,
                        sig,
                    },
                    self.arena.signatures.span(sig),
                );
                (self.arena.list_ident_names([name]), typ)
            }
            _ => (ListRef::EMPTY, self.parse_union()?),
        };
        let comment = self.trailing_after(self.prev_end());

        let span = self.span_from(start);
        Ok(self.arena.fields.alloc(
            Field {
                is_embed: names.is_empty(),
                names,
                ellipsis_pos: None,
                typ,
                tag: None,
                doc,
                comment,
            },
            span,
        ))
    }

    fn parse_union(&mut self) -> PResult<TypeId> {
        let start = self.cur_start();
        let mut terms = Vec::new();
        loop {
            let term = match self.eat(Tok::Tilde) {
                Some(tilde_pos) => TypeTerm::Tilde {
                    tilde_pos,
                    typ: self.parse_type()?,
                },
                None => TypeTerm::Type {
                    typ: self.parse_type()?,
                },
            };
            terms.push(term);
            if self.eat(Tok::Pipe).is_none() {
                break;
            }
        }

        if let [TypeTerm::Type { typ }] = terms[..] {
            return Ok(typ);
        }
        let terms = self.arena.list_type_terms(terms);
        let span = self.span_from(start);
        Ok(self.arena.types.alloc(Type::Union { terms }, span))
    }
}
