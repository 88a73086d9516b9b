//! The corpus entity graph.
//!
//! This module builds and owns the object model of the annotation corpus:
//! the input tree type handed over by the external loader, the five linked
//! entity kinds with their cross-references, the dataset root that
//! constructs the graph in a single pass, and the deterministic fold
//! sampling used by evaluation tooling.

pub mod dataset;
pub mod entities;
pub mod node;
pub mod sampling;

pub use dataset::Dataset;
pub use entities::{
    Document, DocumentId, Frame, FrameId, KeyRef, OutlierFlags, Page, PageId, Screen, Video,
};
pub use node::AnnotationNode;
pub use sampling::{evaluation_sample, DEFAULT_FOLDS, DEFAULT_SEED};
