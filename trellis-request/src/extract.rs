use trellis_bitset::BitSet;
use trellis_introspect::{Field, FieldName, StructType};

use crate::walk::{SelectionVisitor, walk_selection};
use crate::SelectionSpec;

/// Compute only the selected-offsets mask of `selection` over `base`,
/// without building a requested type or mapping tables.
///
/// This is the cheap fast path for an early visibility check: intersect a
/// change set with the returned mask to decide whether an update touches
/// the selection at all, before a full [`crate::RequestMapper`] is
/// justified.
///
/// A missing selection is the wildcard. By convention a structure's own
/// bit implies its whole subtree (the structural-compression convention);
/// passing `expand = true` additionally sets every descendant bit so the
/// result needs no convention to interpret.
///
/// Selections of unknown fields are skipped silently here; the full
/// mapper is the path that reports warnings.
pub fn extract_selection_mask(
    base: &StructType,
    selection: Option<&SelectionSpec>,
    expand: bool,
) -> BitSet {
    let mut mask = BitSet::new();
    let wildcard = SelectionSpec::wildcard();
    let selection = selection.unwrap_or(&wildcard);
    let mut visitor = ExtractVisitor {
        mask: &mut mask,
        base,
        expand,
    };
    walk_selection(base, selection, &mut visitor);
    mask
}

struct ExtractVisitor<'a> {
    mask: &'a mut BitSet,
    base: &'a StructType,
    expand: bool,
}

impl SelectionVisitor for ExtractVisitor<'_> {
    fn select_root(&mut self) {
        self.mask.set(0);
        if self.expand {
            for i in 0..self.base.number_fields() {
                self.mask.set(i);
            }
        }
    }

    fn select_subtree(&mut self, _name: &FieldName, offset: usize, field: &Field) {
        self.mask.set(offset);
        if self.expand && field.is_structure() {
            for i in offset..offset + field.number_fields() {
                self.mask.set(i);
            }
        }
    }

    fn enter_structure(&mut self, _name: &FieldName, _offset: usize, _ty: &StructType) {
        // intermediate structures are not themselves selected
    }

    fn leave_structure(&mut self) {}

    fn unknown_field(&mut self, name: &FieldName) {
        log::debug!("selection names unknown field '{name}', skipping");
    }
}

#[cfg(test)]
mod tests {
    use trellis_introspect::{OffsetTable, ScalarType, standard};

    use super::*;
    use crate::create_request;

    fn base() -> StructType {
        standard::scalar(ScalarType::Float64, "alarm,timeStamp")
    }

    #[test]
    fn wildcard_is_root_bit() {
        let mask = extract_selection_mask(&base(), None, false);
        assert_eq!(mask, BitSet::from([0]));

        let spec = create_request("").unwrap();
        let mask = extract_selection_mask(&base(), Some(&spec), false);
        assert_eq!(mask, BitSet::from([0]));
    }

    #[test]
    fn wildcard_expanded_is_every_bit() {
        let ty = base();
        let mask = extract_selection_mask(&ty, None, true);
        assert_eq!(mask.cardinality(), ty.number_fields());
    }

    #[test]
    fn named_fields_set_their_bits_only() {
        let ty = base();
        let table = OffsetTable::new(&ty);
        let spec = create_request("value,alarm.severity").unwrap();
        let mask = extract_selection_mask(&ty, Some(&spec), false);
        assert_eq!(
            mask,
            BitSet::from([
                table.offset_of("value").unwrap(),
                table.offset_of("alarm.severity").unwrap(),
            ])
        );
    }

    #[test]
    fn wildcard_substructure_sets_own_bit() {
        let ty = base();
        let table = OffsetTable::new(&ty);
        let alarm = table.offset_of("alarm").unwrap();
        let spec = create_request("alarm").unwrap();

        let mask = extract_selection_mask(&ty, Some(&spec), false);
        assert_eq!(mask, BitSet::from([alarm]));

        let expanded = extract_selection_mask(&ty, Some(&spec), true);
        assert_eq!(expanded.cardinality(), 4);
        for offset in alarm..table.next_offset(alarm) {
            assert!(expanded.get(offset));
        }
    }

    #[test]
    fn unknown_fields_skipped() {
        let ty = base();
        let spec = create_request("value,bogus").unwrap();
        let table = OffsetTable::new(&ty);
        let mask = extract_selection_mask(&ty, Some(&spec), false);
        assert_eq!(mask, BitSet::from([table.offset_of("value").unwrap()]));
    }

    #[test]
    fn visibility_precheck() {
        // the intended use: does this change set touch the selection?
        let ty = base();
        let table = OffsetTable::new(&ty);
        let spec = create_request("alarm").unwrap();
        let mask = extract_selection_mask(&ty, Some(&spec), true);

        let mut changed = BitSet::from([table.offset_of("timeStamp.userTag").unwrap()]);
        assert!(!mask.logical_and(&changed));

        changed.set(table.offset_of("alarm.message").unwrap());
        assert!(mask.logical_and(&changed));
    }
}
