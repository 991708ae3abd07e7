//! Error types for MDIB preprocessing and access.

use crate::segment::SegmentError;
use mdib_storage::StorageError;
use thiserror::Error;

/// Result type for preprocessing and access operations.
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Errors surfacing from a write through the processing layer.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// A chain segment rejected the batch. The batch was discarded before
    /// the registry was touched.
    #[error("preprocessing segment {segment} rejected the modifications: {source}")]
    Segment {
        /// Name of the offending segment.
        segment: String,
        /// The segment's own failure.
        #[source]
        source: SegmentError,
    },

    /// The registry rejected the (already preprocessed) batch.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProcessingError {
    /// Creates a segment failure naming the offending segment.
    pub fn segment(segment: impl Into<String>, source: SegmentError) -> Self {
        Self::Segment {
            segment: segment.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_error_names_the_segment() {
        let err = ProcessingError::segment("duplicate detector", SegmentError::new("handle reused"));
        let message = err.to_string();
        assert!(message.contains("duplicate detector"));
        assert!(message.contains("handle reused"));
    }
}
