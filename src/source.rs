//! Mapping a parsed Go file onto the declaration model.
//!
//! Multi-name specs (`var a, b int`) expand to one entity per name, each
//! carrying the shared type and comment. An untyped literal value gets the
//! default type of its kind. Comments are the doc comment followed by the
//! trailing line comment; a grouped declaration keeps its own doc comment on
//! the group. Constructs the model cannot express fail with
//! [`Error::Unsupported`].

use go125_syntax::ParsedFile;
use go125_syntax::ast::{self, ArrayLen, BasicLitKind, CommentGroupId, GenDeclKind, TopLevelDecl, TypeId};
use tracing::debug;

use crate::annotation::{AnnotationDecoder, Annotations};
use crate::entity::*;
use crate::error::{Error, Result};
use crate::syntax::SyntaxService;

pub struct SourceParser<'s> {
    syntax: &'s dyn SyntaxService,
    decoder: &'s dyn AnnotationDecoder,
}

impl<'s> SourceParser<'s> {
    pub fn new(syntax: &'s dyn SyntaxService, decoder: &'s dyn AnnotationDecoder) -> Self {
        Self { syntax, decoder }
    }

    pub fn parse(&self, name: &str, text: &str) -> Result<File> {
        let parsed = self.syntax.parse_file(name, text)?;
        let mapper = Mapper {
            parsed: &parsed,
            decoder: self.decoder,
        };
        let file = mapper.file(name)?;

        debug!(
            file = name,
            imports = file.import_groups.len(),
            consts = file.const_groups.len(),
            vars = file.var_groups.len(),
            types = file.type_groups.len(),
            funcs = file.funcs.len(),
            "file parsed"
        );
        Ok(file)
    }
}

/// Default type of an untyped literal.
pub fn literal_type(kind: BasicLitKind) -> &'static str {
    match kind {
        BasicLitKind::Int => "int",
        BasicLitKind::Float => "float64",
        BasicLitKind::Imag => "complex128",
        BasicLitKind::Rune => "rune",
        BasicLitKind::String => "string",
    }
}

struct Mapper<'p, 't> {
    parsed: &'p ParsedFile<'t>,
    decoder: &'p dyn AnnotationDecoder,
}

impl<'p, 't> Mapper<'p, 't> {
    #[inline]
    fn arena(&self) -> &'p ast::AstArena {
        &self.parsed.arena
    }

    fn sym(&self, ident: ast::Ident) -> String {
        self.parsed.sym(ident).to_string()
    }

    fn comment(&self, doc: Option<CommentGroupId>, trailing: Option<CommentGroupId>) -> String {
        let parts: Vec<String> = [doc, trailing]
            .into_iter()
            .flatten()
            .map(|g| self.parsed.comment_text(g))
            .filter(|t| !t.is_empty())
            .collect();
        parts.join("\n")
    }

    fn annotations(&self, comment: &str) -> Result<Annotations> {
        Ok(self.decoder.decode(comment)?)
    }

    // =========================================================================
    // File and declarations
    // =========================================================================

    fn file(&self, name: &str) -> Result<File> {
        let src = &self.parsed.file;
        let mut file = File::new(name, self.sym(src.name));
        file.comment = self.comment(src.doc, None);
        file.annotations = self.annotations(&file.comment)?;

        for decl in self.arena().top_decls(src.decls) {
            match *decl {
                TopLevelDecl::Gen(id) => self.gen_decl(&mut file, self.arena().decls[id])?,
                TopLevelDecl::Func(id) => file.funcs.push(self.func(&self.arena().funcs[id])?),
            }
        }
        Ok(file)
    }

    fn gen_decl(&self, file: &mut File, decl: ast::GenDecl) -> Result<()> {
        // The doc of an ungrouped declaration belongs to its only member.
        let (group_comment, lead_doc) = if decl.is_grouped() {
            (self.comment(decl.doc, None), None)
        } else {
            (String::new(), decl.doc)
        };
        let group_annotations = self.annotations(&group_comment)?;
        let specs = self.arena().specs(decl.specs);

        match decl.kind {
            GenDeclKind::Import => {
                let mut imports = Vec::with_capacity(specs.len());
                for spec in specs {
                    if let ast::Spec::Import(s) = spec {
                        imports.push(self.import(s, lead_doc.or(s.doc))?);
                    }
                }
                file.import_groups.push(ImportGroup {
                    comment: group_comment,
                    annotations: group_annotations,
                    imports,
                });
            }
            GenDeclKind::Const => {
                let mut consts = Vec::new();
                for spec in specs {
                    if let ast::Spec::Value(s) = spec {
                        for v in self.values(s, lead_doc.or(s.doc))? {
                            consts.push(Const {
                                name: v.name,
                                value: v.value,
                                spec: v.spec,
                                comment: v.comment,
                                annotations: v.annotations,
                            });
                        }
                    }
                }
                file.const_groups.push(ConstGroup {
                    comment: group_comment,
                    annotations: group_annotations,
                    consts,
                });
            }
            GenDeclKind::Var => {
                let mut vars = Vec::new();
                for spec in specs {
                    if let ast::Spec::Value(s) = spec {
                        for v in self.values(s, lead_doc.or(s.doc))? {
                            vars.push(Var {
                                name: v.name,
                                value: v.value,
                                spec: v.spec,
                                comment: v.comment,
                                annotations: v.annotations,
                            });
                        }
                    }
                }
                file.var_groups.push(VarGroup {
                    comment: group_comment,
                    annotations: group_annotations,
                    vars,
                });
            }
            GenDeclKind::Type => {
                let mut types = Vec::with_capacity(specs.len());
                for spec in specs {
                    if let ast::Spec::Type(s) = spec {
                        types.push(self.type_spec(s, lead_doc.or(s.doc))?);
                    }
                }
                file.type_groups.push(TypeGroup {
                    comment: group_comment,
                    annotations: group_annotations,
                    types,
                });
            }
        }
        Ok(())
    }

    fn import(&self, s: &ast::ImportSpec, doc: Option<CommentGroupId>) -> Result<Import> {
        let alias = match s.name {
            None => String::new(),
            Some(ast::ImportName::Dot(_)) => ".".to_string(),
            Some(ast::ImportName::Blank(_)) => "_".to_string(),
            Some(ast::ImportName::Name(sym, _)) => self.sym(sym),
        };
        let raw = self.parsed.text(s.path.raw);
        let namespace = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
        let comment = self.comment(doc, s.comment);
        Ok(Import {
            alias,
            namespace: namespace.to_string(),
            annotations: self.annotations(&comment)?,
            comment,
        })
    }

    fn values(&self, s: &ast::ValueSpec, doc: Option<CommentGroupId>) -> Result<Vec<ValueEntry>> {
        let names = self.arena().ident_names(s.names);
        let values = self.arena().exprs_list(s.values);
        if !values.is_empty() && values.len() != names.len() {
            return Err(Error::unsupported(format!(
                "assignment of {} values to {} names",
                values.len(),
                names.len()
            )));
        }

        let comment = self.comment(doc, s.comment);
        let mut out = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let (value, kind) = match values.get(i) {
                Some(&expr) => (
                    self.parsed.text(self.arena().exprs.span(expr)).to_string(),
                    self.arena().exprs[expr].kind,
                ),
                None => (String::new(), None),
            };
            let spec = match (s.typ, kind) {
                (Some(typ), _) => Some(self.spec(typ)?),
                (None, Some(kind)) => Some(Spec::simple(literal_type(kind))),
                (None, None) => None,
            };
            out.push(ValueEntry {
                name: self.sym(name.sym),
                value,
                spec,
                annotations: self.annotations(&comment)?,
                comment: comment.clone(),
            });
        }
        Ok(out)
    }

    fn type_spec(&self, s: &ast::TypeSpec, doc: Option<CommentGroupId>) -> Result<Type> {
        let name = self.sym(s.name);
        if s.type_params.is_some() {
            return Err(Error::unsupported(format!("generic type '{name}'")));
        }
        let comment = self.comment(doc, s.comment);
        Ok(Type {
            name,
            spec: self.spec(s.typ)?,
            is_alias: s.alias,
            annotations: self.annotations(&comment)?,
            comment,
        })
    }

    fn func(&self, f: &ast::FuncDecl) -> Result<Func> {
        let name = self.sym(f.name);
        if f.type_params.is_some() {
            return Err(Error::unsupported(format!("generic function '{name}'")));
        }
        let Some(body) = f.body else {
            return Err(Error::unsupported(format!("function '{name}' without body")));
        };

        let related = match f.recv {
            Some(recv) => Some(Field {
                name: recv.name.map(|n| self.sym(n.sym)).unwrap_or_default(),
                spec: self.spec(recv.typ)?,
                ..Field::default()
            }),
            None => None,
        };
        let signature = self.signature(f.signature)?;
        let spec = (!signature.params.is_empty() || !signature.results.is_empty())
            .then_some(signature);
        let comment = self.comment(f.doc, None);

        Ok(Func {
            name,
            content: self.parsed.text(body.inner()).trim().to_string(),
            spec,
            related,
            annotations: self.annotations(&comment)?,
            comment,
        })
    }

    // =========================================================================
    // Type expressions
    // =========================================================================

    fn spec(&self, id: TypeId) -> Result<Spec> {
        let a = self.arena();
        Ok(match a.types[id] {
            ast::Type::Named { pkg, name, args, .. } => {
                let name = self.sym(name);
                if !args.is_empty() {
                    return Err(Error::unsupported(format!("generic instantiation of '{name}'")));
                }
                Spec::Simple(SimpleSpec::new(pkg.map(|p| self.sym(p)).unwrap_or_default(), name))
            }
            ast::Type::Pointer { elem, .. } => match self.spec(self.unparen(elem))? {
                Spec::Simple(mut s) if !s.is_pointer => {
                    s.is_pointer = true;
                    Spec::Simple(s)
                }
                other => {
                    return Err(Error::unsupported(format!(
                        "pointer to {}",
                        other.kind()
                    )));
                }
            },
            ast::Type::Array { len, elem, .. } => {
                let length = match len {
                    ArrayLen::Expr(expr) => self.parsed.text(a.exprs.span(expr)).to_string(),
                    ArrayLen::Ellipsis(_) => "...".to_string(),
                };
                Spec::array(self.spec(elem)?, length)
            }
            ast::Type::Slice { elem, .. } => Spec::slice(self.spec(elem)?),
            ast::Type::Map { key, val, .. } => Spec::map(self.spec(key)?, self.spec(val)?),
            ast::Type::Chan { .. } => return Err(Error::unsupported("channel type")),
            ast::Type::Struct { fields, .. } => Spec::Struct(StructSpec {
                fields: self.fields(a.fields_list(fields))?,
            }),
            ast::Type::Interface { elems, .. } => Spec::Interface(InterfaceSpec {
                fields: self.fields(a.fields_list(elems))?,
            }),
            ast::Type::Func { sig, .. } => Spec::Func(self.signature(sig)?),
            ast::Type::Paren { typ, .. } => self.spec(typ)?,
            ast::Type::Union { .. } => return Err(Error::unsupported("type union")),
        })
    }

    fn unparen(&self, mut id: TypeId) -> TypeId {
        while let ast::Type::Paren { typ, .. } = self.arena().types[id] {
            id = typ;
        }
        id
    }

    /// One model field per declared name; embedded and unnamed fields map to
    /// a single field without a name.
    fn fields(&self, ids: &[ast::FieldId]) -> Result<Vec<Field>> {
        let mut out = Vec::with_capacity(ids.len());
        for &id in ids {
            let f = self.arena().fields[id];
            let comment = self.comment(f.doc, f.comment);
            let tag = f
                .tag
                .map(|t| self.parsed.text(t.raw).to_string())
                .unwrap_or_default();

            let mut emit = |name: String| -> Result<()> {
                let spec = self.spec(f.typ)?;
                let spec = if f.ellipsis_pos.is_some() { Spec::slice(spec) } else { spec };
                out.push(Field {
                    name,
                    tag: tag.clone(),
                    annotations: self.annotations(&comment)?,
                    comment: comment.clone(),
                    spec,
                });
                Ok(())
            };

            let names = self.arena().ident_names(f.names);
            if names.is_empty() {
                emit(String::new())?;
            } else {
                for n in names {
                    emit(self.sym(n.sym))?;
                }
            }
        }
        Ok(out)
    }

    fn signature(&self, id: ast::SignatureId) -> Result<FuncSpec> {
        let a = self.arena();
        let sig = a.signatures[id];
        let params = self.fields(a.fields_list(sig.params.fields))?;
        let is_variadic = a
            .fields_list(sig.params.fields)
            .last()
            .is_some_and(|&f| a.fields[f].ellipsis_pos.is_some());
        let results = match sig.results {
            None => Vec::new(),
            Some(ast::Results::Params(list)) => self.fields(a.fields_list(list.fields))?,
            Some(ast::Results::Type(typ)) => vec![Field::unnamed(self.spec(typ)?)],
        };
        Ok(FuncSpec {
            params,
            results,
            is_variadic,
        })
    }
}

/// A const or var before it is given its final type.
struct ValueEntry {
    name: String,
    value: String,
    spec: Option<Spec>,
    comment: String,
    annotations: Annotations,
}
