//! Error types for corpus construction and screen rectification.
//!
//! This module defines the errors that can occur while building the entity
//! graph from an annotation tree, resolving cross-references, rectifying
//! screen regions, and loading images. It also provides utility constructors
//! for creating these errors with appropriate context.

use thiserror::Error;

/// Enum representing the errors raised by the corpus core.
///
/// Each failure kind is a distinct variant so that calling tooling can tell
/// a bad dataset apart from a bad single annotation region.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// A required attribute of an annotation element is missing or malformed.
    ///
    /// Fatal to graph construction; no partial graph is exposed.
    #[error("structural error in <{element}> attribute '{attribute}': {message}")]
    Structural {
        /// Name of the annotation element the error occurred in.
        element: String,
        /// Name of the offending attribute.
        attribute: String,
        /// A message describing the problem.
        message: String,
        /// The underlying parse error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A cross-reference key has no matching page within its owning video.
    ///
    /// Fatal to graph construction; no partial graph is exposed.
    #[error("unresolved page key '{key}' in video {video}")]
    Referential {
        /// The page key that failed to resolve.
        key: String,
        /// The video whose page table was consulted.
        video: String,
    },

    /// A quadrilateral is degenerate or near-degenerate and cannot be
    /// rectified.
    ///
    /// Fatal for the single rectification call only.
    #[error("geometry error: {message}")]
    Geometry {
        /// A message describing the degeneracy.
        message: String,
    },

    /// Error occurred while loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error indicating invalid caller input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },
}

/// Convenient result alias for corpus operations.
pub type CorpusResult<T> = Result<T, CorpusError>;

impl CorpusError {
    /// Creates a structural error for a required attribute that is absent.
    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        CorpusError::Structural {
            element: element.into(),
            attribute: attribute.into(),
            message: "required attribute is missing".to_string(),
            source: None,
        }
    }

    /// Creates a structural error for an attribute whose value failed to parse.
    pub fn malformed_attribute(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: &str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CorpusError::Structural {
            element: element.into(),
            attribute: attribute.into(),
            message: format!("cannot parse value '{value}'"),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a referential error for a page key that did not resolve.
    pub fn unresolved_key(key: impl Into<String>, video: impl Into<String>) -> Self {
        CorpusError::Referential {
            key: key.into(),
            video: video.into(),
        }
    }

    /// Creates a geometry error with the given message.
    pub fn geometry(message: impl Into<String>) -> Self {
        CorpusError::Geometry {
            message: message.into(),
        }
    }

    /// Creates an invalid-input error with the given message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CorpusError::InvalidInput {
            message: message.into(),
        }
    }
}
