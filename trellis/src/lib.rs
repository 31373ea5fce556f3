//! Trellis: the data and introspection layer of a control-system
//! middleware stack.
//!
//! Structured values (structures of scalars, arrays and unions) are
//! described by immutable [`introspect`] type descriptors, instantiated
//! as [`value`] trees, and tracked for change with [`bitset`] sets over
//! the depth-first field offset numbering. The [`request`] layer selects
//! a subset of a base structure and propagates partial changes between
//! the base and the requested view.

pub use {
    trellis_bitset as bitset, trellis_error as error, trellis_introspect as introspect,
    trellis_request as request, trellis_value as value,
};
