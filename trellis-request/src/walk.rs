//! The one recursive walk over `(base type, selection node)`.
//!
//! Both the full request mapper and the standalone mask extraction run on
//! this walk, parameterized by a visitor, so the wildcard and
//! recursion-bound semantics cannot diverge between the two entry points.

use trellis_introspect::{Field, FieldName, StructType};

use crate::{SelectionNode, SelectionSpec};

/// Bound on selection recursion depth, to keep pathological selection
/// trees from walking arbitrarily deep. A selection that would descend
/// further selects the whole remaining subtree instead.
pub const MAX_SELECTION_DEPTH: usize = 5;

/// What the walk reports as it interprets a selection against a base type.
///
/// `offset` arguments are field offsets in the base offset space. The
/// warning-flavored callbacks default to no-ops; a visitor overrides the
/// ones it cares about.
pub(crate) trait SelectionVisitor {
    /// The selection is the wildcard at the top level: the entire base
    /// structure is selected.
    fn select_root(&mut self);

    /// The whole base subtree of `field` at `offset` is selected, under
    /// the name `name` in the enclosing structure. Raised for selected
    /// leaves, wildcard sub-selections of structures, and selections cut
    /// off by the depth bound.
    fn select_subtree(&mut self, name: &FieldName, offset: usize, field: &Field);

    /// Descending into the named sub-structure of the base.
    fn enter_structure(&mut self, name: &FieldName, offset: usize, ty: &StructType);

    /// Done with the sub-structure opened by the matching
    /// [`Self::enter_structure`].
    fn leave_structure(&mut self);

    /// The selection names a field the base does not have.
    fn unknown_field(&mut self, _name: &FieldName) {}

    /// The selection tries to descend below a leaf field; the whole leaf
    /// is selected instead.
    fn descend_below_leaf(&mut self, _name: &FieldName) {}

    /// The depth bound cut the selection off; the whole remaining subtree
    /// is selected instead.
    fn truncated(&mut self, _name: &FieldName) {}
}

/// Interpret `selection` against the top-level `base` type, reporting to
/// `visitor`.
pub(crate) fn walk_selection<V: SelectionVisitor>(
    base: &StructType,
    selection: &SelectionSpec,
    visitor: &mut V,
) {
    if selection.is_wildcard() {
        visitor.select_root();
    } else {
        walk_node(base, 0, selection.root(), 0, visitor);
    }
}

fn walk_node<V: SelectionVisitor>(
    st: &StructType,
    offset: usize,
    node: &SelectionNode,
    depth: usize,
    visitor: &mut V,
) {
    for (name, sub) in node.fields() {
        let Some(index) = st.find(name) else {
            visitor.unknown_field(name);
            continue;
        };
        // selection order need not follow declaration order; the child's
        // offset comes from the declaration-order spans
        let child_offset = offset
            + 1
            + st.fields()[..index]
                .iter()
                .map(Field::number_fields)
                .sum::<usize>();

        let field = &st.fields()[index];
        match field {
            Field::Structure(child) if depth < MAX_SELECTION_DEPTH && !sub.is_wildcard() => {
                visitor.enter_structure(name, child_offset, child);
                walk_node(child, child_offset, sub, depth + 1, visitor);
                visitor.leave_structure();
            }
            _ => {
                if !field.is_structure() && !sub.is_wildcard() {
                    visitor.descend_below_leaf(name);
                } else if field.is_structure() && !sub.is_wildcard() {
                    visitor.truncated(name);
                }
                visitor.select_subtree(name, child_offset, field);
            }
        }
    }
}
