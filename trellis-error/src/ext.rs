use std::fmt::Display;

use crate::trellis_panic;

/// Extension trait replacing `expect` on results and options.
///
/// The workspace lints deny `expect_used`; this is the sanctioned
/// equivalent, panicking through [`trellis_panic`] with the caller's
/// location.
pub trait TrellisExpect {
    /// The unwrapped value type.
    type Output;

    /// Unwrap, panicking with `msg` (and the underlying error, if any).
    fn trellis_expect(self, msg: &str) -> Self::Output;
}

/// Extension trait replacing `unwrap` on results.
pub trait TrellisUnwrap {
    /// The unwrapped value type.
    type Output;

    /// Unwrap, panicking with the underlying error rendered via `Display`.
    fn trellis_unwrap(self) -> Self::Output;
}

impl<T, E: Display> TrellisExpect for Result<T, E> {
    type Output = T;

    #[track_caller]
    fn trellis_expect(self, msg: &str) -> T {
        match self {
            Ok(v) => v,
            Err(e) => trellis_panic!("{}: {}", msg, e),
        }
    }
}

impl<T> TrellisExpect for Option<T> {
    type Output = T;

    #[track_caller]
    fn trellis_expect(self, msg: &str) -> T {
        match self {
            Some(v) => v,
            None => trellis_panic!("{}", msg),
        }
    }
}

impl<T, E: Display> TrellisUnwrap for Result<T, E> {
    type Output = T;

    #[track_caller]
    fn trellis_unwrap(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => trellis_panic!("{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_ok() {
        let r: Result<u8, &str> = Ok(3);
        assert_eq!(r.trellis_expect("must be ok"), 3);
        assert_eq!(Some(5).trellis_expect("must be some"), 5);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn expect_err_panics() {
        let r: Result<u8, &str> = Err("boom");
        r.trellis_unwrap();
    }
}
