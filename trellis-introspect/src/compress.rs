use trellis_bitset::BitSet;

use crate::{Field, StructType};

/// How much of a subtree's offset range a change set covers.
///
/// This is the recursive result of [`compress`]; keeping the three cases
/// distinct avoids conflating "every child was covered but the node's own
/// bit was never set" with "nothing in the subtree was set at all".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// No bit in the subtree's range is set.
    Empty,
    /// Some bits are set, but the subtree is not fully covered.
    Partial,
    /// The whole subtree is covered; after compression this is
    /// represented by the subtree root's single bit.
    FullyCovered,
}

/// Collapse `bits` so that a fully-marked structure subtree is represented
/// by the structure's own single bit, with every descendant bit cleared.
///
/// This both shrinks wire payloads and gives change sets a canonical form
/// for equality and visibility tests. The pass only redistributes
/// "fully covered" information upward: it never sets a bit that was not
/// already implied by its input, and it is idempotent.
///
/// `bits` is interpreted against the offset numbering of `ty` (see
/// [`crate::OffsetTable`]); only the type's shape is consulted.
pub fn compress(bits: &mut BitSet, ty: &StructType) -> Coverage {
    compress_at(bits, ty, 0)
}

fn compress_at(bits: &mut BitSet, st: &StructType, offset: usize) -> Coverage {
    let nbits = st.number_fields();
    if nbits == 1 {
        // an empty structure behaves as a leaf
        return if bits.get(offset) {
            Coverage::FullyCovered
        } else {
            Coverage::Empty
        };
    }

    // fast rejection: nothing set anywhere in our range
    match bits.next_set_bit(offset) {
        None => return Coverage::Empty,
        Some(i) if i >= offset + nbits => return Coverage::Empty,
        Some(_) => {}
    }

    // our own bit already covers the subtree; canonicalize the range
    if bits.get(offset) {
        for i in offset + 1..offset + nbits {
            bits.clear(i);
        }
        return Coverage::FullyCovered;
    }

    let mut at_least_one = false;
    let mut all_covered = true;
    let mut child_offset = offset + 1;
    for field in st.fields() {
        match field {
            Field::Structure(sub) => match compress_at(bits, sub, child_offset) {
                Coverage::FullyCovered => at_least_one = true,
                Coverage::Partial => {
                    at_least_one = true;
                    all_covered = false;
                }
                Coverage::Empty => all_covered = false,
            },
            _ => {
                if bits.get(child_offset) {
                    at_least_one = true;
                } else {
                    all_covered = false;
                }
            }
        }
        child_offset += field.number_fields();
    }

    if all_covered {
        for i in offset + 1..offset + nbits {
            bits.clear(i);
        }
        bits.set(offset);
        Coverage::FullyCovered
    } else if at_least_one {
        Coverage::Partial
    } else {
        Coverage::Empty
    }
}

#[cfg(test)]
mod tests {
    use trellis_bitset::BitSet;

    use super::*;
    use crate::{OffsetTable, ScalarType, standard};

    /// timeStamp, alarm, voltage, power, current — each property-laden.
    fn powersupply() -> StructType {
        StructType::new(
            vec![
                "timeStamp".into(),
                "alarm".into(),
                "voltage".into(),
                "power".into(),
                "current".into(),
            ].into(),
            vec![
                Field::Structure(standard::time_stamp()),
                Field::Structure(standard::alarm()),
                Field::Structure(standard::scalar(ScalarType::Float64, "alarm")),
                Field::Structure(standard::scalar(ScalarType::Float64, "alarm")),
                Field::Structure(standard::scalar(ScalarType::Float64, "alarm")),
            ],
        )
    }

    #[test]
    fn all_bits_collapse_to_root() {
        let ty = powersupply();
        let mut bits = BitSet::with_capacity(ty.number_fields());
        for i in 0..ty.number_fields() {
            bits.set(i);
        }
        assert_eq!(compress(&mut bits, &ty), Coverage::FullyCovered);
        assert_eq!(bits.cardinality(), 1);
        assert!(bits.get(0));
    }

    #[test]
    fn partial_then_full_substructure() {
        let ty = powersupply();
        let table = OffsetTable::new(&ty);
        let time_stamp = table.offset_of("timeStamp").unwrap();
        let seconds = table.offset_of("timeStamp.secondsPastEpoch").unwrap();
        let nano = table.offset_of("timeStamp.nanoseconds").unwrap();
        let user_tag = table.offset_of("timeStamp.userTag").unwrap();

        let mut bits = BitSet::new();
        bits.set(seconds);
        assert_eq!(compress(&mut bits, &ty), Coverage::Partial);
        assert!(bits.get(seconds));

        bits.set(nano);
        bits.set(user_tag);
        assert_eq!(compress(&mut bits, &ty), Coverage::Partial);
        assert!(!bits.get(seconds));
        assert!(bits.get(time_stamp));
    }

    #[test]
    fn covered_nested_structure() {
        let ty = powersupply();
        let table = OffsetTable::new(&ty);
        let current = table.offset_of("current").unwrap();
        let value = table.offset_of("current.value").unwrap();
        let alarm = table.offset_of("current.alarm").unwrap();
        let severity = table.offset_of("current.alarm.severity").unwrap();
        let status = table.offset_of("current.alarm.status").unwrap();
        let message = table.offset_of("current.alarm.message").unwrap();

        // value + all of alarm's members covers all of current
        let mut bits = BitSet::from([value, severity, status, message]);
        compress(&mut bits, &ty);
        assert!(bits.get(current));
        assert_eq!(bits.cardinality(), 1);

        // alarm's members alone collapse to alarm only
        let mut bits = BitSet::from([severity, status, message]);
        compress(&mut bits, &ty);
        assert!(bits.get(alarm));
        assert_eq!(bits.cardinality(), 1);
    }

    #[test]
    fn idempotent() {
        let ty = powersupply();
        let table = OffsetTable::new(&ty);
        let mut bits = BitSet::from([
            table.offset_of("voltage.value").unwrap(),
            table.offset_of("alarm.severity").unwrap(),
            table.offset_of("alarm.status").unwrap(),
            table.offset_of("alarm.message").unwrap(),
        ]);
        compress(&mut bits, &ty);
        let once = bits.clone();
        compress(&mut bits, &ty);
        assert_eq!(bits, once);
    }

    #[test]
    fn empty_set_is_empty() {
        let ty = powersupply();
        let mut bits = BitSet::new();
        assert_eq!(compress(&mut bits, &ty), Coverage::Empty);
        assert!(bits.is_empty());
    }

    #[test]
    fn own_bit_clears_descendants() {
        let ty = powersupply();
        let table = OffsetTable::new(&ty);
        let alarm = table.offset_of("alarm").unwrap();
        let severity = table.offset_of("alarm.severity").unwrap();
        let mut bits = BitSet::from([alarm, severity]);
        assert_eq!(compress(&mut bits, &ty), Coverage::Partial);
        assert!(bits.get(alarm));
        assert!(!bits.get(severity));
    }
}
