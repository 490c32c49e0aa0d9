use go125_walk_derive::Walk;

use super::spec::{Field, FuncSpec, Spec};
use crate::annotation::Annotations;
use crate::ident;

// =============================================================================
// Imports
// =============================================================================

#[derive(Debug, Default, PartialEq, Walk)]
pub struct Import {
    /// Explicit alias: an identifier, `_` or `.`; empty when absent
    pub alias: String,
    /// Import path without quotes
    pub namespace: String,
    pub comment: String,
    #[walk(skip)]
    pub annotations: Annotations,
}

impl Import {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn aliased(alias: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            ..Self::new(namespace)
        }
    }

    /// Name the importing file uses to qualify this package.
    pub fn effective_alias(&self) -> &str {
        if self.alias.is_empty() {
            ident::last_segment(&self.namespace)
        } else {
            &self.alias
        }
    }
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct ImportGroup {
    pub comment: String,
    #[walk(skip)]
    pub annotations: Annotations,
    pub imports: Vec<Import>,
}

// =============================================================================
// Constants and variables
// =============================================================================

#[derive(Debug, Default, PartialEq, Walk)]
pub struct Const {
    pub name: String,
    /// Raw expression text; empty repeats the previous expression (iota style)
    pub value: String,
    pub spec: Option<Spec>,
    pub comment: String,
    #[walk(skip)]
    pub annotations: Annotations,
}

impl Const {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn typed(name: impl Into<String>, spec: Spec, value: impl Into<String>) -> Self {
        Self {
            spec: Some(spec),
            ..Self::new(name, value)
        }
    }
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct ConstGroup {
    pub comment: String,
    #[walk(skip)]
    pub annotations: Annotations,
    pub consts: Vec<Const>,
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct Var {
    pub name: String,
    pub value: String,
    pub spec: Option<Spec>,
    pub comment: String,
    #[walk(skip)]
    pub annotations: Annotations,
}

impl Var {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn typed(name: impl Into<String>, spec: Spec, value: impl Into<String>) -> Self {
        Self {
            spec: Some(spec),
            ..Self::new(name, value)
        }
    }
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct VarGroup {
    pub comment: String,
    #[walk(skip)]
    pub annotations: Annotations,
    pub vars: Vec<Var>,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Default, PartialEq, Walk)]
pub struct Type {
    pub name: String,
    pub spec: Spec,
    /// `type A = B` rather than `type A B`
    pub is_alias: bool,
    pub comment: String,
    #[walk(skip)]
    pub annotations: Annotations,
}

impl Type {
    pub fn new(name: impl Into<String>, spec: Spec) -> Self {
        Self {
            name: name.into(),
            spec,
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct TypeGroup {
    pub comment: String,
    #[walk(skip)]
    pub annotations: Annotations,
    pub types: Vec<Type>,
}

// =============================================================================
// Functions
// =============================================================================

#[derive(Debug, Default, PartialEq, Walk)]
pub struct Func {
    pub name: String,
    /// Raw statements between the braces
    pub content: String,
    /// `None` renders as `func Name()`
    pub spec: Option<FuncSpec>,
    /// Method receiver
    pub related: Option<Field>,
    pub comment: String,
    #[walk(skip)]
    pub annotations: Annotations,
}

impl Func {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            ..Self::default()
        }
    }
}
