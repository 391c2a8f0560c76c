//! Structural self-checks for the domain registry and the volume mesh.

use crate::mesh_error::MeshError;

/// Types that can verify their own structural invariants.
pub trait DebugInvariants {
    /// Panics on the first violated invariant when checking is enabled.
    fn debug_assert_invariants(&self);
    /// Walks every invariant and reports the first one that fails.
    fn validate_invariants(&self) -> Result<(), MeshError>;
}

/// Turns a failed condition into [`MeshError::InvariantViolation`].
#[inline]
pub(crate) fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), MeshError> {
    if condition {
        Ok(())
    } else {
        Err(MeshError::InvariantViolation(message()))
    }
}

/// Runs a fallible invariant check and panics with context when checking is
/// enabled (debug builds, or the `strict-invariants`/`check-invariants` features).
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        #[cfg(any(debug_assertions, feature = "strict-invariants", feature = "check-invariants"))]
        if let Err(e) = $expr {
            panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
        }
    };
}
