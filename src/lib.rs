//! # screendoc
//!
//! A Rust library that reconstructs the entity graph of an annotated
//! lecture-video corpus (videos, the documents projected during them, and
//! the frame-to-page correspondences) and derives two capabilities over it:
//! outlier classification of detected on-screen regions and perspective
//! rectification of screen quadrilaterals.
//!
//! ## Components
//!
//! - **Entity graph**: one-pass construction of the linked
//!   video/document/page/frame/screen/cross-reference model from a validated
//!   annotation tree, with referential integrity enforced per video
//! - **Match derivation**: the set of pages each screen corresponds to, and
//!   the five-toggle outlier predicate used to filter screens from
//!   evaluation
//! - **Rectification**: perspective unwarping of an arbitrary screen
//!   quadrilateral into an upright rectangular image
//! - **Fold sampling**: deterministic subsetting of the video list for
//!   k-fold cross-validation
//!
//! The graph is built once and is immutable afterwards, so it can be shared
//! freely across threads; rectifying many screens in parallel is safe.
//!
//! ## Modules
//!
//! * [`core`] - Error handling and logging setup
//! * [`domain`] - Geometry primitives and closed label sets
//! * [`corpus`] - The annotation tree, the entity graph and fold sampling
//! * [`processors`] - Quadrilateral rectification
//! * [`utils`] - Image loading helpers for review tooling
//!
//! ## Quick Start
//!
//! ```rust
//! use screendoc::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // The loader/validator collaborator hands over a validated tree.
//! let root = AnnotationNode::new("dataset").with_child(
//!     AnnotationNode::new("video")
//!         .with_attr("dirname", "lecture-01")
//!         .with_attr("fps", "25")
//!         .with_attr("frames", "1500")
//!         .with_attr("width", "720")
//!         .with_attr("height", "576")
//!         .with_attr("uri", "https://example.com/lecture-01"),
//! );
//!
//! let dataset = Dataset::from_node("/corpus", &root)?;
//! for video in &dataset.videos {
//!     for screen in video.screens() {
//!         if !screen.is_outlier(OutlierFlags::default()) {
//!             // Feed `screen.bounds` and the frame image to `rectify`.
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod corpus;
pub mod domain;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use screendoc::prelude::*;
/// ```
pub mod prelude {
    // Entity graph (essential)
    pub use crate::corpus::{AnnotationNode, Dataset, OutlierFlags, Screen, Video};

    // Geometry
    pub use crate::domain::{BoundingQuadrilateral, Coordinate};

    // Rectification
    pub use crate::processors::rectify;

    // Error handling (essential)
    pub use crate::core::{CorpusError, CorpusResult};

    // Image utility (minimal)
    pub use crate::utils::load_image;
}
