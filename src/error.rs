// Typed pipeline errors.
//
// These are the failures the analysis core can report. Everything at the
// application edge (file I/O, CSV writing, model download) stays in anyhow;
// the core reports which document, field or capability is at fault so the
// CLI can print a precise message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A document is missing a required field, or two documents share an id.
    /// Raised at corpus-load time and rejects the whole run.
    #[error("invalid input at row {row}: field `{field}` {reason}")]
    InvalidInput {
        row: usize,
        field: String,
        reason: String,
    },

    /// A linguistic or embedding capability could not be obtained.
    /// Fatal to the branch that needs it.
    #[error("{capability} unavailable: {reason}")]
    ExternalModelUnavailable { capability: String, reason: String },

    /// Zero documents: vocabulary and similarity are undefined.
    #[error("corpus is empty: at least one document is required")]
    EmptyCorpus,

    /// The embedding capability returned a vector of the wrong dimension.
    #[error("embedding for `{document}` has dimension {actual}, expected {expected}")]
    InvalidEmbedding {
        document: String,
        expected: usize,
        actual: usize,
    },

    /// A single embed call failed. Not retried; stops the embedding branch.
    #[error("embedding failed for `{document}`: {message}")]
    EmbeddingFailed { document: String, message: String },
}

impl PipelineError {
    pub fn unavailable(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExternalModelUnavailable {
            capability: capability.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_input(row: usize, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            row,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_piece() {
        let err = PipelineError::unavailable("embedding model", "model.onnx not found");
        assert_eq!(
            err.to_string(),
            "embedding model unavailable: model.onnx not found"
        );

        let err = PipelineError::invalid_input(3, "id", "is empty");
        assert_eq!(err.to_string(), "invalid input at row 3: field `id` is empty");
    }
}
