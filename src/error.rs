//! Error types for the exercise-document boundary.
//!
//! The scoring engine itself is total and never errors: malformed or partial
//! annotations degrade to zero-credit results. Errors only arise when loading
//! or checking an authored exercise document.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrillError {
    /// The exercise document could not be parsed.
    #[error("Invalid exercise document: {0}")]
    Document(String),

    /// An annotation violates an authoring invariant.
    ///
    /// Carries the zero-based checkpoint index so the authoring UI can point
    /// at the offending timeline marker.
    #[error("Invalid annotation at checkpoint {checkpoint}: {message}")]
    Annotation { checkpoint: usize, message: String },
}
