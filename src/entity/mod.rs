//! # Declaration model
//!
//! Value-like trees with strict top-down ownership:
//!
//! ```text
//! Storage -> Namespace -> File -> {Import,Const,Var,Type}Group -> member
//!                              -> Func
//! member / Field -> Spec -> Field -> Spec ...
//! ```
//!
//! Entities do not implement `Clone`; copies go through
//! [`crate::clone::EntityCloner`] so annotation payloads are duplicated too.

mod decl;
mod file;
mod spec;

pub use decl::{Const, ConstGroup, Func, Import, ImportGroup, Type, TypeGroup, Var, VarGroup};
pub use file::{File, Namespace, Storage};
pub use spec::{ArraySpec, Field, FuncSpec, InterfaceSpec, MapSpec, SimpleSpec, Spec, StructSpec};
