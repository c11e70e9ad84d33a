//! Model artifacts: loading, validation and the immutable in-memory form.
//!
//! An artifact is parsed into an [`ArtifactDocument`](document::ArtifactDocument),
//! its `meta` block is checked into a [`VectorizerConfig`](config::VectorizerConfig),
//! and the whole thing is frozen into a [`ModelArtifact`](artifact::ModelArtifact).
//! Every inconsistency is reported at that point; nothing downstream
//! re-validates.

pub mod artifact;
pub mod config;
pub mod document;

pub use artifact::{DecisionRule, ModelArtifact};
pub use config::{MultiClass, Norm, VectorizerConfig};
pub use document::{ArtifactDocument, ClassLabel, MetaDocument, VocabularyDocument};
