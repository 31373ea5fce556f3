#![deny(missing_docs)]

//! Field selection and request mapping for Trellis.
//!
//! A client names the parts of a provider's base structure it cares about
//! with a [`SelectionSpec`] (parsed from the request mini-language by
//! [`create_request`]). The [`RequestMapper`] turns that selection into a
//! requested view of the base type - either the base type itself with a
//! mask over it, or a freshly built sub-type - plus the offset
//! correspondence tables needed to copy field values and translate change
//! masks between the two address spaces in both directions.
//!
//! [`extract_selection_mask`] is the standalone fast path: just the
//! selected-offsets mask, for an early visibility check before a full
//! mapper is justified.

pub use extract::*;
pub use mapper::*;
pub use parse::*;
pub use selection::*;

mod extract;
mod mapper;
mod parse;
mod selection;
mod walk;
