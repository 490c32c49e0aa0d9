//! Opaque annotation payloads attached to entities.
//!
//! The core never looks inside an annotation. It only needs to compare
//! them, carry them through [`crate::clone`], and recognize the
//! [`GeneratedAnnotation`] marker.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// 1. Annotation trait object
// =============================================================================

/// Object-safe plumbing for [`Annotation`], implemented for every
/// `Annotation + PartialEq` type.
pub trait AnnotationAny {
    fn as_any(&self) -> &dyn Any;
    fn eq_annotation(&self, other: &dyn Annotation) -> bool;
}

impl<T: Annotation + PartialEq> AnnotationAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_annotation(&self, other: &dyn Annotation) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

pub trait Annotation: AnnotationAny + fmt::Debug + Send + Sync + 'static {
    /// Stable name used by codecs to find the concrete type.
    fn kind(&self) -> &'static str;

    /// Independent copy without a codec round trip, when the type can make one.
    fn duplicate(&self) -> Option<Box<dyn Annotation>> {
        None
    }
}

impl dyn Annotation {
    pub fn downcast_ref<T: Annotation>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Annotation>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl PartialEq for dyn Annotation {
    fn eq(&self, other: &Self) -> bool {
        self.eq_annotation(other)
    }
}

pub type Annotations = Vec<Box<dyn Annotation>>;

/// Whether `annotations` holds a value of type `T`.
pub fn contains<T: Annotation>(annotations: &[Box<dyn Annotation>]) -> bool {
    annotations.iter().any(|a| a.as_ref().is::<T>())
}

// =============================================================================
// 2. The generated marker
// =============================================================================

/// Comment line that stands for [`GeneratedAnnotation`].
pub const GENERATED_MARKER: &str = "@Generated";

/// Flags a file produced by the generation pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAnnotation;

impl Annotation for GeneratedAnnotation {
    fn kind(&self) -> &'static str {
        "Generated"
    }

    fn duplicate(&self) -> Option<Box<dyn Annotation>> {
        Some(Box::new(*self))
    }
}

// =============================================================================
// 3. Decoding annotations from comments
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("annotation decode failed: {message}")]
pub struct AnnotationError {
    pub message: String,
}

pub trait AnnotationDecoder: Send + Sync {
    /// Annotations found in a comment; an empty comment yields none.
    fn decode(&self, comment: &str) -> Result<Annotations, AnnotationError>;
}

/// Recognizes the `@Generated` marker line and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerDecoder;

impl AnnotationDecoder for MarkerDecoder {
    fn decode(&self, comment: &str) -> Result<Annotations, AnnotationError> {
        let found = comment.lines().any(|line| line.trim() == GENERATED_MARKER);
        let mut out: Annotations = Vec::new();
        if found {
            out.push(Box::new(GeneratedAnnotation));
        }
        Ok(out)
    }
}

// =============================================================================
// 4. Interchange codec
// =============================================================================

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("annotation kind '{kind}' is not registered with the codec")]
    Unregistered { kind: String },

    #[error("annotation kind '{kind}' is registered for a different type")]
    Mismatch { kind: String },

    #[error("annotation codec: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encodes annotations to bytes and back without static knowledge of them.
pub trait AnnotationCodec: Send + Sync {
    fn encode(&self, annotation: &dyn Annotation) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, bytes: &[u8]) -> Result<Box<dyn Annotation>, CodecError>;
}

type EncodeFn = fn(&dyn Annotation) -> Option<serde_json::Result<serde_json::Value>>;
type DecodeFn = fn(serde_json::Value) -> serde_json::Result<Box<dyn Annotation>>;

fn encode_as<T: Annotation + Serialize>(
    a: &dyn Annotation,
) -> Option<serde_json::Result<serde_json::Value>> {
    a.downcast_ref::<T>().map(serde_json::to_value)
}

fn decode_as<T: Annotation + DeserializeOwned>(
    value: serde_json::Value,
) -> serde_json::Result<Box<dyn Annotation>> {
    let a: T = serde_json::from_value(value)?;
    Ok(Box::new(a))
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    kind: String,
    value: serde_json::Value,
}

/// JSON codec with a registry of annotation kinds. Payloads are framed as
/// `{"kind": ..., "value": ...}`.
#[derive(Debug, Default)]
pub struct JsonCodec {
    kinds: HashMap<&'static str, (EncodeFn, DecodeFn)>,
}

impl JsonCodec {
    /// Codec that knows [`GeneratedAnnotation`].
    pub fn new() -> Self {
        let mut codec = Self::default();
        codec.register::<GeneratedAnnotation>("Generated");
        codec
    }

    /// Registers `T` under `kind`, which must match `T::kind()`.
    pub fn register<T>(&mut self, kind: &'static str) -> &mut Self
    where
        T: Annotation + Serialize + DeserializeOwned,
    {
        self.kinds
            .insert(kind, (encode_as::<T> as EncodeFn, decode_as::<T> as DecodeFn));
        self
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }
}

impl AnnotationCodec for JsonCodec {
    fn encode(&self, annotation: &dyn Annotation) -> Result<Vec<u8>, CodecError> {
        let kind = annotation.kind();
        let (encode, _) = self.kinds.get(kind).ok_or_else(|| CodecError::Unregistered {
            kind: kind.to_string(),
        })?;
        let value = encode(annotation).ok_or_else(|| CodecError::Mismatch {
            kind: kind.to_string(),
        })??;
        Ok(serde_json::to_vec(&Envelope {
            kind: kind.to_string(),
            value,
        })?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Box<dyn Annotation>, CodecError> {
        let envelope: Envelope = serde_json::from_slice(bytes)?;
        let (_, decode) = self
            .kinds
            .get(envelope.kind.as_str())
            .ok_or(CodecError::Unregistered {
                kind: envelope.kind,
            })?;
        Ok(decode(envelope.value)?)
    }
}
