use go125_walk_derive::Walk;

use super::decl::{ConstGroup, Func, Import, ImportGroup, TypeGroup, VarGroup};
use crate::annotation::Annotations;

/// One source file. Non-empty `content` overrides the declarations when
/// rendering.
#[derive(Debug, Default, PartialEq, Walk)]
pub struct File {
    pub name: String,
    pub package_name: String,
    pub comment: String,
    #[walk(skip)]
    pub annotations: Annotations,
    pub content: String,
    pub import_groups: Vec<ImportGroup>,
    pub const_groups: Vec<ConstGroup>,
    pub var_groups: Vec<VarGroup>,
    pub type_groups: Vec<TypeGroup>,
    pub funcs: Vec<Func>,
}

impl File {
    pub fn new(name: impl Into<String>, package_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package_name: package_name.into(),
            ..Self::default()
        }
    }

    /// Every import across all import groups, in order.
    pub fn imports(&self) -> impl Iterator<Item = &Import> {
        self.import_groups.iter().flat_map(|g| g.imports.iter())
    }

    /// No declarations and no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
            && self.import_groups.is_empty()
            && self.const_groups.is_empty()
            && self.var_groups.is_empty()
            && self.type_groups.is_empty()
            && self.funcs.is_empty()
    }
}

/// A package: files sharing one package name under one directory.
#[derive(Debug, Default, PartialEq, Walk)]
pub struct Namespace {
    pub name: String,
    /// Absolute directory
    pub path: String,
    pub is_ignored: bool,
    pub files: Vec<File>,
}

impl Namespace {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn file(&self, name: &str) -> Option<&File> {
        self.files.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct Storage {
    pub namespaces: Vec<Namespace>,
}

impl Storage {
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.namespaces.iter().find(|ns| ns.name == name)
    }

    pub fn namespace_mut(&mut self, name: &str) -> Option<&mut Namespace> {
        self.namespaces.iter_mut().find(|ns| ns.name == name)
    }
}
