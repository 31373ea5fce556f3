#![deny(missing_docs)]

//! Error handling for Trellis.
//!
//! The rest of the workspace raises errors through the [`trellis_err`] and
//! [`trellis_bail`] macros rather than constructing [`TrellisError`] variants
//! by hand, and unwraps through [`TrellisExpect`]/[`TrellisUnwrap`] rather
//! than `unwrap`/`expect` (which the workspace lints deny).

mod ext;

use std::borrow::Cow;

pub use ext::*;

/// An owned-or-static error message.
pub type ErrString = Cow<'static, str>;

/// The workspace-wide error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TrellisError {
    /// A function was called with an argument that violates its contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(ErrString),
    /// A field selection cannot be interpreted against the base type.
    #[error("invalid selection: {0}")]
    InvalidSelection(ErrString),
    /// Two types that must agree do not.
    #[error("mismatched types: expected {0}, found {1}")]
    MismatchedTypes(ErrString, ErrString),
    /// An index fell outside the valid range `[start, stop)`.
    #[error("index {0} out of bounds from {1} to {2}")]
    OutOfBounds(usize, usize, usize),
}

/// The workspace-wide result alias.
pub type TrellisResult<T> = Result<T, TrellisError>;

impl TrellisError {
    /// A short machine-checkable name for the variant, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::InvalidSelection(_) => "invalid_selection",
            Self::MismatchedTypes(..) => "mismatched_types",
            Self::OutOfBounds(..) => "out_of_bounds",
        }
    }
}

/// Construct a [`TrellisError`].
///
/// `trellis_err!("...", ..)` builds an `InvalidArgument` from a format
/// string; a leading `Variant:` selects another variant, e.g.
/// `trellis_err!(InvalidSelection: "no field '{}'", name)` or
/// `trellis_err!(OutOfBounds: idx, 0, len)`.
#[macro_export]
macro_rules! trellis_err {
    (OutOfBounds: $idx:expr, $start:expr, $stop:expr) => {
        $crate::TrellisError::OutOfBounds($idx, $start, $stop)
    };
    (MismatchedTypes: $expected:expr, $found:expr) => {
        $crate::TrellisError::MismatchedTypes(
            $expected.to_string().into(),
            $found.to_string().into(),
        )
    };
    (InvalidSelection: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::TrellisError::InvalidSelection(format!($fmt $(, $arg)*).into())
    };
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::TrellisError::InvalidArgument(format!($fmt $(, $arg)*).into())
    };
}

/// Return early with a [`TrellisError`]; accepts the same forms as
/// [`trellis_err`].
#[macro_export]
macro_rules! trellis_bail {
    ($($tt:tt)+) => {
        return Err($crate::trellis_err!($($tt)+))
    };
}

/// Panic with a [`TrellisError`]; the single sanctioned panic path for
/// invariant violations that cannot be reported as a `Result`.
#[macro_export]
macro_rules! trellis_panic {
    ($($tt:tt)+) => {{
        #[allow(clippy::panic)]
        {
            panic!("{}", $crate::trellis_err!($($tt)+))
        }
    }};
}
