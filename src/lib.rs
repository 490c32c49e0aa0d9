//! Go declaration model for code generation.
//!
//! - `entity`: the model (`Storage` > `Namespace` > `File` > declarations > `Spec`).
//! - `validate`, `clone`, `render`, `rename`: the four tree operations.
//! - `source`: builds a `File` from Go source through the `go125_syntax` front-end.
//! - `driver`: renders a whole `Storage` with the generated marker and disclaimer.

pub mod annotation;
pub mod clone;
pub mod config;
pub mod driver;
pub mod entity;
pub mod error;
pub mod ident;
pub mod render;
pub mod rename;
pub mod source;
pub mod syntax;
pub mod validate;
pub mod walk;

// Re-exports for convenience
pub use annotation::{
    Annotation, AnnotationCodec, AnnotationDecoder, Annotations, GeneratedAnnotation, JsonCodec,
    MarkerDecoder,
};
pub use clone::{DeepClone, EntityCloner};
pub use config::RenderConfig;
pub use driver::{RenderedFile, Renderer};
pub use entity::*;
pub use error::{Error, InvalidEntity, Result};
pub use render::{EntityRenderer, Render, SpecRenderer};
pub use rename::EntityImportRenamer;
pub use source::SourceParser;
pub use syntax::{GoSyntax, SyntaxService};
pub use validate::{EntityValidator, Validate};
