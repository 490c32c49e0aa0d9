use go125_walk_derive::Walk;

use crate::annotation::Annotations;

/// Type expression.
#[derive(Debug, PartialEq, Walk)]
pub enum Spec {
    /// `T`, `pkg.T`, `*T`, `*pkg.T`
    Simple(SimpleSpec),
    /// `[]T`, `[N]T`, `[...]T`
    Array(Box<ArraySpec>),
    /// `map[K]V`
    Map(Box<MapSpec>),
    /// `struct { ... }`
    Struct(StructSpec),
    /// `interface { ... }`
    Interface(InterfaceSpec),
    /// `func(...) ...`
    Func(FuncSpec),
}

impl Default for Spec {
    fn default() -> Self {
        Self::Simple(SimpleSpec::default())
    }
}

impl Spec {
    pub fn simple(type_name: impl Into<String>) -> Self {
        Self::Simple(SimpleSpec::new("", type_name))
    }

    pub fn qualified(package_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::Simple(SimpleSpec::new(package_name, type_name))
    }

    pub fn pointer(type_name: impl Into<String>) -> Self {
        Self::Simple(SimpleSpec {
            is_pointer: true,
            ..SimpleSpec::new("", type_name)
        })
    }

    pub fn slice(value: Spec) -> Self {
        Self::array(value, "")
    }

    pub fn array(value: Spec, length: impl Into<String>) -> Self {
        Self::Array(Box::new(ArraySpec {
            value,
            length: length.into(),
        }))
    }

    pub fn map(key: Spec, value: Spec) -> Self {
        Self::Map(Box::new(MapSpec { key, value }))
    }

    /// Variant name as used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Spec::Simple(_) => "SimpleSpec",
            Spec::Array(_) => "ArraySpec",
            Spec::Map(_) => "MapSpec",
            Spec::Struct(_) => "StructSpec",
            Spec::Interface(_) => "InterfaceSpec",
            Spec::Func(_) => "FuncSpec",
        }
    }

    pub fn is_slice(&self) -> bool {
        matches!(self, Spec::Array(a) if a.is_slice())
    }

    pub fn as_simple(&self) -> Option<&SimpleSpec> {
        match self {
            Spec::Simple(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct SimpleSpec {
    /// Import alias qualifying the type; empty for local and builtin types
    pub package_name: String,
    pub type_name: String,
    pub is_pointer: bool,
}

impl SimpleSpec {
    pub fn new(package_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            type_name: type_name.into(),
            is_pointer: false,
        }
    }
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct ArraySpec {
    pub value: Spec,
    /// Empty for a slice, `...` for an ellipsis-sized literal, otherwise the
    /// raw length expression
    pub length: String,
}

impl ArraySpec {
    pub fn is_slice(&self) -> bool {
        self.length.is_empty()
    }
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct MapSpec {
    pub key: Spec,
    pub value: Spec,
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct StructSpec {
    pub fields: Vec<Field>,
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct InterfaceSpec {
    pub fields: Vec<Field>,
}

#[derive(Debug, Default, PartialEq, Walk)]
pub struct FuncSpec {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
    /// The last param is `...T`; its spec is the slice `[]T`
    pub is_variadic: bool,
}

/// Struct or interface member, parameter or result.
#[derive(Debug, Default, PartialEq, Walk)]
pub struct Field {
    /// Empty for embedded members and unnamed params
    pub name: String,
    /// Raw string literal, struct fields only
    pub tag: String,
    pub comment: String,
    #[walk(skip)]
    pub annotations: Annotations,
    pub spec: Spec,
}

impl Field {
    pub fn new(name: impl Into<String>, spec: Spec) -> Self {
        Self {
            name: name.into(),
            spec,
            ..Self::default()
        }
    }

    pub fn unnamed(spec: Spec) -> Self {
        Self::new("", spec)
    }
}
