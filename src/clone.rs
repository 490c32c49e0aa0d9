//! Deep copies of model trees.
//!
//! A clone owns every child, annotation payloads included. Annotations that
//! can [`duplicate`](crate::annotation::Annotation::duplicate) themselves do
//! so; the rest go through the [`AnnotationCodec`] and back. A payload the
//! codec cannot carry fails the whole clone.

use tracing::trace;

use crate::annotation::{Annotation, AnnotationCodec};
use crate::entity::*;
use crate::error::Result;

pub trait DeepClone: Sized {
    fn deep_clone(&self, c: &EntityCloner<'_>) -> Result<Self>;
}

pub struct EntityCloner<'c> {
    codec: &'c dyn AnnotationCodec,
}

impl<'c> EntityCloner<'c> {
    pub fn new(codec: &'c dyn AnnotationCodec) -> Self {
        Self { codec }
    }

    pub fn clone<E: DeepClone>(&self, entity: &E) -> Result<E> {
        entity.deep_clone(self)
    }
}

// =============================================================================
// Leaves and containers
// =============================================================================

impl DeepClone for String {
    #[inline]
    fn deep_clone(&self, _: &EntityCloner<'_>) -> Result<Self> {
        Ok(self.clone())
    }
}

impl DeepClone for bool {
    #[inline]
    fn deep_clone(&self, _: &EntityCloner<'_>) -> Result<Self> {
        Ok(*self)
    }
}

impl<T: DeepClone> DeepClone for Option<T> {
    fn deep_clone(&self, c: &EntityCloner<'_>) -> Result<Self> {
        self.as_ref().map(|x| x.deep_clone(c)).transpose()
    }
}

impl<T: DeepClone> DeepClone for Vec<T> {
    fn deep_clone(&self, c: &EntityCloner<'_>) -> Result<Self> {
        self.iter().map(|x| x.deep_clone(c)).collect()
    }
}

impl DeepClone for Box<dyn Annotation> {
    fn deep_clone(&self, c: &EntityCloner<'_>) -> Result<Self> {
        if let Some(copy) = self.duplicate() {
            return Ok(copy);
        }
        let bytes = c.codec.encode(&**self)?;
        trace!(kind = self.kind(), bytes = bytes.len(), "annotation cloned through codec");
        Ok(c.codec.decode(&bytes)?)
    }
}

// =============================================================================
// Entities
// =============================================================================

impl DeepClone for Spec {
    fn deep_clone(&self, c: &EntityCloner<'_>) -> Result<Self> {
        Ok(match self {
            Spec::Simple(s) => Spec::Simple(s.deep_clone(c)?),
            Spec::Array(s) => Spec::Array(Box::new(s.deep_clone(c)?)),
            Spec::Map(s) => Spec::Map(Box::new(s.deep_clone(c)?)),
            Spec::Struct(s) => Spec::Struct(s.deep_clone(c)?),
            Spec::Interface(s) => Spec::Interface(s.deep_clone(c)?),
            Spec::Func(s) => Spec::Func(s.deep_clone(c)?),
        })
    }
}

// Field lists are exhaustive: a struct literal without `..` rejects a
// forgotten field.
macro_rules! impl_deep_clone {
    ($($ty:ident { $($field:ident),* $(,)? }),* $(,)?) => {
        $(
            impl DeepClone for $ty {
                fn deep_clone(&self, c: &EntityCloner<'_>) -> Result<Self> {
                    Ok(Self {
                        $($field: self.$field.deep_clone(c)?,)*
                    })
                }
            }
        )*
    };
}

impl_deep_clone! {
    SimpleSpec { package_name, type_name, is_pointer },
    ArraySpec { value, length },
    MapSpec { key, value },
    StructSpec { fields },
    InterfaceSpec { fields },
    FuncSpec { params, results, is_variadic },
    Field { name, tag, comment, annotations, spec },
    Import { alias, namespace, comment, annotations },
    ImportGroup { comment, annotations, imports },
    Const { name, value, spec, comment, annotations },
    ConstGroup { comment, annotations, consts },
    Var { name, value, spec, comment, annotations },
    VarGroup { comment, annotations, vars },
    Type { name, spec, is_alias, comment, annotations },
    TypeGroup { comment, annotations, types },
    Func { name, content, spec, related, comment, annotations },
    File {
        name,
        package_name,
        comment,
        annotations,
        content,
        import_groups,
        const_groups,
        var_groups,
        type_groups,
        funcs,
    },
    Namespace { name, path, is_ignored, files },
    Storage { namespaces },
}
