//! Limits for codec-level encoding and decoding.

use crate::diagnostic::FieldPath;
use crate::error::{CodecError, CodecResult, PathReason};

/// Codec-specific limits enforced per value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum nesting of objects/arrays below a top-level field.
    pub max_depth: usize,
    /// Maximum number of segments in a reference path.
    pub max_reference_segments: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_reference_segments: 100,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_depth: 8,
            max_reference_segments: 8,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
            max_reference_segments: usize::MAX,
        }
    }

    /// Fails if a container at `path` would exceed `max_depth`.
    pub(crate) fn check_depth(&self, path: &FieldPath) -> CodecResult<()> {
        if path.depth() >= self.max_depth {
            return Err(CodecError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    /// Fails if the reference `path` has more than `max_reference_segments` segments.
    ///
    /// Shared by encoding and decoding so a backup never holds a reference
    /// its own restore would reject.
    pub(crate) fn check_reference_segments(
        &self,
        path: &str,
        segments: usize,
    ) -> CodecResult<()> {
        if segments > self.max_reference_segments {
            return Err(CodecError::InvalidReferencePath {
                path: path.to_string(),
                reason: PathReason::TooManySegments {
                    segments,
                    limit: self.max_reference_segments,
                },
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_are_reasonable() {
        let limits = CodecLimits::default();
        assert!(limits.max_depth >= 20);
        assert!(limits.max_reference_segments >= 2);
        assert_eq!(limits.max_reference_segments % 2, 0);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = CodecLimits::for_testing();
        let default_limits = CodecLimits::default();
        assert!(test_limits.max_depth < default_limits.max_depth);
        assert!(test_limits.max_reference_segments < default_limits.max_reference_segments);
    }

    #[test]
    fn depth_check() {
        let limits = CodecLimits {
            max_depth: 1,
            ..CodecLimits::default()
        };
        let top = FieldPath::root().key("a");
        assert!(limits.check_depth(&top).is_ok());
        assert_eq!(
            limits.check_depth(&top.index(0)),
            Err(CodecError::DepthExceeded { limit: 1 })
        );
    }

    #[test]
    fn reference_segment_check() {
        let limits = CodecLimits::for_testing();
        assert!(limits.check_reference_segments("a/b", 8).is_ok());
        assert_eq!(
            limits.check_reference_segments("a/b", 10),
            Err(CodecError::InvalidReferencePath {
                path: "a/b".into(),
                reason: PathReason::TooManySegments {
                    segments: 10,
                    limit: 8
                },
            })
        );
    }

    #[test]
    fn unlimited_limits() {
        let limits = CodecLimits::unlimited();
        assert_eq!(limits.max_depth, usize::MAX);
        assert_eq!(limits.max_reference_segments, usize::MAX);
    }
}
