//! Rendering entities back to Go source.
//!
//! [`SpecRenderer`] writes type expressions and is infallible; it also backs
//! `Display` for [`Spec`]. [`EntityRenderer`] renders declarations and files.
//! Only whole files go through the syntax service for canonical layout, so a
//! rendered group is flat:
//!
//! ```text
//! // comment
//! const (
//! A = 1
//! B
//! )
//! ```

use std::fmt::{self, Write};

use tracing::debug;

use crate::annotation::{self, GENERATED_MARKER, GeneratedAnnotation};
use crate::entity::*;
use crate::error::Result;
use crate::syntax::SyntaxService;

pub trait Render {
    fn render_with(&self, r: &EntityRenderer<'_>) -> Result<String>;
}

pub struct EntityRenderer<'s> {
    syntax: &'s dyn SyntaxService,
}

impl<'s> EntityRenderer<'s> {
    pub fn new(syntax: &'s dyn SyntaxService) -> Self {
        Self { syntax }
    }

    pub fn render<E: Render + ?Sized>(&self, entity: &E) -> Result<String> {
        entity.render_with(self)
    }
}

/// Writes `comment` as line comments, one per source line.
fn push_comment(out: &mut String, comment: &str) {
    for line in comment.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            out.push_str("//\n");
        } else {
            out.push_str("// ");
            out.push_str(line);
            out.push('\n');
        }
    }
}

// =============================================================================
// 1. Type expressions
// =============================================================================

/// Writer for the type expression grammar.
pub struct SpecRenderer;

impl SpecRenderer {
    pub fn render(spec: &Spec) -> String {
        spec.to_string()
    }

    pub fn spec<W: Write + ?Sized>(out: &mut W, spec: &Spec) -> fmt::Result {
        match spec {
            Spec::Simple(s) => Self::simple(out, s),
            Spec::Array(a) => {
                write!(out, "[{}]", a.length)?;
                Self::spec(out, &a.value)
            }
            Spec::Map(m) => {
                out.write_str("map[")?;
                Self::spec(out, &m.key)?;
                out.write_char(']')?;
                Self::spec(out, &m.value)
            }
            Spec::Struct(s) => Self::members(out, "struct", &s.fields, Self::struct_field),
            Spec::Interface(i) => {
                Self::members(out, "interface", &i.fields, Self::interface_field)
            }
            Spec::Func(f) => {
                out.write_str("func")?;
                Self::signature(out, f)
            }
        }
    }

    pub fn simple<W: Write + ?Sized>(out: &mut W, s: &SimpleSpec) -> fmt::Result {
        if s.is_pointer {
            out.write_char('*')?;
        }
        if !s.package_name.is_empty() {
            write!(out, "{}.", s.package_name)?;
        }
        out.write_str(&s.type_name)
    }

    /// `(params) results`, without the `func` keyword.
    pub fn signature<W: Write + ?Sized>(out: &mut W, f: &FuncSpec) -> fmt::Result {
        out.write_char('(')?;
        for (i, p) in f.params.iter().enumerate() {
            if i > 0 {
                out.write_str(", ")?;
            }
            if !p.name.is_empty() {
                write!(out, "{} ", p.name)?;
            }
            match &p.spec {
                Spec::Array(a) if f.is_variadic && i + 1 == f.params.len() && a.is_slice() => {
                    out.write_str("...")?;
                    Self::spec(out, &a.value)?;
                }
                spec => Self::spec(out, spec)?,
            }
        }
        out.write_char(')')?;

        match f.results.as_slice() {
            [] => Ok(()),
            [only] if only.name.is_empty() => {
                out.write_char(' ')?;
                Self::spec(out, &only.spec)
            }
            results => {
                out.write_str(" (")?;
                for (i, r) in results.iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    if !r.name.is_empty() {
                        write!(out, "{} ", r.name)?;
                    }
                    Self::spec(out, &r.spec)?;
                }
                out.write_char(')')
            }
        }
    }

    fn members<W: Write + ?Sized>(
        out: &mut W,
        keyword: &str,
        fields: &[Field],
        member: fn(&mut String, &Field) -> fmt::Result,
    ) -> fmt::Result {
        if fields.is_empty() {
            return write!(out, "{keyword}{{}}");
        }
        let mut body = String::new();
        for field in fields {
            push_comment(&mut body, &field.comment);
            member(&mut body, field)?;
            body.push('\n');
        }
        write!(out, "{keyword} {{\n{body}}}")
    }

    fn struct_field(out: &mut String, field: &Field) -> fmt::Result {
        if !field.name.is_empty() {
            write!(out, "{} ", field.name)?;
        }
        Self::spec(out, &field.spec)?;
        if !field.tag.is_empty() {
            write!(out, " {}", field.tag)?;
        }
        Ok(())
    }

    fn interface_field(out: &mut String, field: &Field) -> fmt::Result {
        match &field.spec {
            Spec::Func(f) => {
                out.write_str(&field.name)?;
                Self::signature(out, f)
            }
            spec => Self::spec(out, spec),
        }
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        SpecRenderer::spec(f, self)
    }
}

impl Render for Spec {
    fn render_with(&self, _: &EntityRenderer<'_>) -> Result<String> {
        Ok(self.to_string())
    }
}

impl Render for Field {
    fn render_with(&self, _: &EntityRenderer<'_>) -> Result<String> {
        let mut out = String::new();
        push_comment(&mut out, &self.comment);
        // Writing into a String cannot fail.
        let _ = SpecRenderer::struct_field(&mut out, self);
        Ok(out)
    }
}

// =============================================================================
// 2. Declarations
// =============================================================================

/// A declaration that can stand inside a parenthesized group.
trait Member {
    fn comment(&self) -> &str;
    fn line(&self) -> String;
}

impl Member for Import {
    fn comment(&self) -> &str {
        &self.comment
    }

    fn line(&self) -> String {
        if self.alias.is_empty() {
            format!("\"{}\"", self.namespace)
        } else {
            format!("{} \"{}\"", self.alias, self.namespace)
        }
    }
}

fn value_line(name: &str, spec: Option<&Spec>, value: &str) -> String {
    let mut line = name.to_string();
    if let Some(spec) = spec {
        let _ = write!(line, " {spec}");
    }
    if !value.is_empty() {
        let _ = write!(line, " = {value}");
    }
    line
}

impl Member for Const {
    fn comment(&self) -> &str {
        &self.comment
    }

    fn line(&self) -> String {
        value_line(&self.name, self.spec.as_ref(), &self.value)
    }
}

impl Member for Var {
    fn comment(&self) -> &str {
        &self.comment
    }

    fn line(&self) -> String {
        value_line(&self.name, self.spec.as_ref(), &self.value)
    }
}

impl Member for Type {
    fn comment(&self) -> &str {
        &self.comment
    }

    fn line(&self) -> String {
        let eq = if self.is_alias { " =" } else { "" };
        format!("{}{eq} {}", self.name, self.spec)
    }
}

fn single<M: Member>(keyword: &str, member: &M) -> String {
    let mut out = String::new();
    push_comment(&mut out, member.comment());
    out.push_str(keyword);
    out.push(' ');
    out.push_str(&member.line());
    out.push('\n');
    out
}

fn group<M: Member>(keyword: &str, comment: &str, members: &[M]) -> String {
    match members {
        [only] if comment.is_empty() && only.comment().is_empty() => {
            return single(keyword, only);
        }
        _ => {}
    }

    let mut out = String::new();
    push_comment(&mut out, comment);
    out.push_str(keyword);
    out.push_str(" (\n");
    for member in members {
        push_comment(&mut out, member.comment());
        out.push_str(&member.line());
        out.push('\n');
    }
    out.push_str(")\n");
    out
}

macro_rules! impl_render_decls {
    ($($member:ty, $group:ty => $keyword:literal, $items:ident),* $(,)?) => {
        $(
            impl Render for $member {
                fn render_with(&self, _: &EntityRenderer<'_>) -> Result<String> {
                    Ok(single($keyword, self))
                }
            }

            impl Render for $group {
                fn render_with(&self, _: &EntityRenderer<'_>) -> Result<String> {
                    Ok(group($keyword, &self.comment, &self.$items))
                }
            }
        )*
    };
}

impl_render_decls! {
    Import, ImportGroup => "import", imports,
    Const, ConstGroup => "const", consts,
    Var, VarGroup => "var", vars,
    Type, TypeGroup => "type", types,
}

impl Render for Func {
    fn render_with(&self, _: &EntityRenderer<'_>) -> Result<String> {
        let mut out = String::new();
        push_comment(&mut out, &self.comment);
        out.push_str("func ");
        if let Some(recv) = &self.related {
            out.push('(');
            if !recv.name.is_empty() {
                out.push_str(&recv.name);
                out.push(' ');
            }
            let _ = SpecRenderer::spec(&mut out, &recv.spec);
            out.push_str(") ");
        }
        out.push_str(&self.name);
        match &self.spec {
            Some(spec) => {
                let _ = SpecRenderer::signature(&mut out, spec);
            }
            None => out.push_str("()"),
        }
        out.push_str(" {\n");
        if !self.content.is_empty() {
            out.push_str(&self.content);
            out.push('\n');
        }
        out.push_str("}\n");
        Ok(out)
    }
}

// =============================================================================
// 3. Files
// =============================================================================

impl Render for File {
    fn render_with(&self, r: &EntityRenderer<'_>) -> Result<String> {
        if !self.content.is_empty() {
            return Ok(self.content.clone());
        }

        let mut text = String::new();
        push_comment(&mut text, &self.comment);
        if annotation::contains::<GeneratedAnnotation>(&self.annotations)
            && !self.comment.lines().any(|l| l.trim() == GENERATED_MARKER)
        {
            push_comment(&mut text, GENERATED_MARKER);
        }
        text.push_str("package ");
        text.push_str(&self.package_name);
        text.push('\n');

        let mut sections: Vec<String> = Vec::new();
        for g in self.import_groups.iter().filter(|g| !g.imports.is_empty()) {
            sections.push(g.render_with(r)?);
        }
        for g in self.const_groups.iter().filter(|g| !g.consts.is_empty()) {
            sections.push(g.render_with(r)?);
        }
        for g in self.var_groups.iter().filter(|g| !g.vars.is_empty()) {
            sections.push(g.render_with(r)?);
        }
        for g in self.type_groups.iter().filter(|g| !g.types.is_empty()) {
            sections.push(g.render_with(r)?);
        }
        for f in &self.funcs {
            sections.push(f.render_with(r)?);
        }
        for section in &sections {
            text.push('\n');
            text.push_str(section);
        }

        let text = r.syntax.format_and_check(&self.name, &text)?;
        debug!(file = %self.name, bytes = text.len(), "file rendered");
        Ok(text)
    }
}
