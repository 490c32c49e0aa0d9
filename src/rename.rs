//! Import alias resolution and renaming.
//!
//! Renaming touches typed fields (`SimpleSpec::package_name`, `Import::alias`)
//! and the raw text fields. In raw text only a qualified use counts: the alias
//! as a whole identifier token immediately followed by `.`. Text inside string
//! literals and comments is left alone.

use std::ptr;

use go125_syntax::{Tok, Tokens, tokenize};
use tracing::debug;

use crate::entity::*;
use crate::error::{InvalidEntity, Result};
use crate::ident;
use crate::walk::{Visitor, VisitorMut, Walk, WalkChildren};

#[derive(Debug, Clone, Copy, Default)]
pub struct EntityImportRenamer;

impl EntityImportRenamer {
    pub fn new() -> Self {
        Self
    }

    /// Replaces the package alias `old` with `new` everywhere under `entity`.
    /// Both must be identifiers; nothing is touched otherwise.
    pub fn rename<E: Walk + ?Sized>(&self, entity: &mut E, old: &str, new: &str) -> Result<()> {
        check_alias(old, "OldAlias")?;
        check_alias(new, "NewAlias")?;

        let mut renamer = Renamer {
            old,
            new,
            changed: 0,
        };
        entity.walk_mut(&mut renamer);
        debug!(old, new, changed = renamer.changed, "import alias renamed");
        Ok(())
    }

    /// Imports of `file` that qualify a type somewhere under `entity`, in
    /// discovery order without duplicates. Unresolved aliases are skipped.
    pub fn fetch_imports<'f, E: Walk + ?Sized>(
        &self,
        entity: &E,
        file: &'f File,
    ) -> Result<Vec<&'f Import>> {
        let mut names = PackageNames::default();
        entity.walk(&mut names);

        let mut found: Vec<&'f Import> = Vec::new();
        for name in &names.0 {
            check_alias(name, "PackageName")?;
            for import in file.imports() {
                if import.effective_alias() == name && !found.iter().any(|i| ptr::eq(*i, import)) {
                    found.push(import);
                }
            }
        }
        Ok(found)
    }
}

fn check_alias(alias: &str, variable: &str) -> Result<()> {
    if alias.is_empty() {
        return Err(InvalidEntity::empty(variable).into());
    }
    if !ident::is_identifier(alias) {
        return Err(InvalidEntity::not_identifier(variable).into());
    }
    Ok(())
}

/// Rewrites every `old.` qualifier in `text` to `new.`. Returns `None` when
/// there is nothing to change.
///
/// Only whole identifier tokens directly followed by `.` match, so
/// `oldExtra.F` and `someold.F` are left alone. Strings and comments are
/// never touched. Lexing errors are ignored; tokens after them are still
/// considered.
pub fn rewrite_qualified(text: &str, old: &str, new: &str) -> Option<String> {
    let Tokens { toks, .. } = tokenize(text);

    let mut out = String::new();
    let mut copied = 0;
    for (i, &(start, tok, end)) in toks.iter().enumerate() {
        if tok != Tok::Ident(old) {
            continue;
        }
        if matches!(toks.get(i + 1), Some((_, Tok::Dot, _))) {
            out.push_str(&text[copied..start]);
            out.push_str(new);
            copied = end;
        }
    }

    if copied == 0 {
        return None;
    }
    out.push_str(&text[copied..]);
    Some(out)
}

struct Renamer<'a> {
    old: &'a str,
    new: &'a str,
    changed: usize,
}

impl Renamer<'_> {
    fn text(&mut self, text: &mut String) {
        if let Some(rewritten) = rewrite_qualified(text, self.old, self.new) {
            *text = rewritten;
            self.changed += 1;
        }
    }
}

impl VisitorMut for Renamer<'_> {
    fn visit_simple_spec_mut(&mut self, node: &mut SimpleSpec) {
        if node.package_name == self.old {
            node.package_name = self.new.to_string();
            self.changed += 1;
        }
    }

    fn visit_array_spec_mut(&mut self, node: &mut ArraySpec) {
        self.text(&mut node.length);
        node.walk_children_mut(self);
    }

    fn visit_import_mut(&mut self, node: &mut Import) {
        if node.alias == self.old {
            node.alias = self.new.to_string();
            self.changed += 1;
        }
    }

    fn visit_const_mut(&mut self, node: &mut Const) {
        self.text(&mut node.value);
        node.walk_children_mut(self);
    }

    fn visit_var_mut(&mut self, node: &mut Var) {
        self.text(&mut node.value);
        node.walk_children_mut(self);
    }

    fn visit_func_mut(&mut self, node: &mut Func) {
        self.text(&mut node.content);
        node.walk_children_mut(self);
    }

    fn visit_file_mut(&mut self, node: &mut File) {
        self.text(&mut node.content);
        node.walk_children_mut(self);
    }
}

/// Qualifiers in discovery order, deduplicated.
#[derive(Default)]
struct PackageNames(Vec<String>);

impl Visitor for PackageNames {
    fn visit_simple_spec(&mut self, node: &SimpleSpec) {
        if !node.package_name.is_empty() && !self.0.contains(&node.package_name) {
            self.0.push(node.package_name.clone());
        }
    }
}
