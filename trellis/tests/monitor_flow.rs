//! End-to-end flow of a monitored subscription: a provider mutates a base
//! structure and marks change bits; a consumer-side view accumulates
//! pending changes (with overrun detection), compresses them, and pulls
//! the visible subset across through a request mapper.

use trellis::bitset::BitSet;
use trellis::introspect::{Coverage, OffsetTable, ScalarType, compress, standard};
use trellis::request::{MapMode, RequestMapper, create_request, extract_selection_mask};
use trellis::value::{ScalarValue, StructValue, Value};

fn put(v: &mut StructValue, name: &str, value: ScalarValue) {
    v.sub_field_mut(name)
        .and_then(Value::as_scalar_mut)
        .unwrap()
        .put(value)
        .unwrap();
}

#[test]
fn overrun_accumulation_and_compression() {
    let ty = standard::scalar(ScalarType::Float64, "alarm,timeStamp,display");
    let table = OffsetTable::new(&ty);
    let mut pv = StructValue::new(ty.clone());

    let value = table.offset_of("value").unwrap();
    let severity = table.offset_of("alarm.severity").unwrap();
    let message = table.offset_of("alarm.message").unwrap();
    let time_stamp = table.offset_of("timeStamp").unwrap();
    let seconds = table.offset_of("timeStamp.secondsPastEpoch").unwrap();
    let nanoseconds = table.offset_of("timeStamp.nanoseconds").unwrap();
    let user_tag = table.offset_of("timeStamp.userTag").unwrap();

    let mut change = BitSet::with_capacity(table.len());
    let mut pending = BitSet::with_capacity(table.len());
    let mut overrun = BitSet::with_capacity(table.len());

    // first update: not yet consumed
    put(&mut pv, "value", 1.0.into());
    change.set(value);
    put(&mut pv, "alarm.severity", ScalarValue::Int32(2));
    change.set(severity);
    put(&mut pv, "alarm.message", "error".into());
    change.set(message);
    put(&mut pv, "timeStamp.secondsPastEpoch", ScalarValue::Int64(1));
    change.set(seconds);
    put(&mut pv, "timeStamp.nanoseconds", ScalarValue::Int32(1_000_000));
    change.set(nanoseconds);
    put(&mut pv, "timeStamp.userTag", ScalarValue::Int32(1));
    change.set(user_tag);
    overrun.or_and(&change, &pending);
    pending |= &change;

    // second update before the first was read: every re-changed bit is
    // an overrun
    change.clear_all();
    put(&mut pv, "value", 2.0.into());
    change.set(value);
    change.set(severity);
    change.set(message);
    change.set(seconds);
    change.set(nanoseconds);
    change.set(user_tag);
    overrun.or_and(&change, &pending);
    pending |= &change;

    assert_eq!(pending.cardinality(), 6);
    assert_eq!(overrun.cardinality(), 6);

    // compression collapses the fully-changed timeStamp into one bit
    assert_eq!(compress(&mut pending, &ty), Coverage::Partial);
    assert_eq!(compress(&mut overrun, &ty), Coverage::Partial);
    for bits in [&pending, &overrun] {
        assert_eq!(bits.cardinality(), 4);
        assert!(bits.get(value));
        assert!(bits.get(severity));
        assert!(bits.get(message));
        assert!(bits.get(time_stamp));
    }

    // consumed; a fresh partial update overruns only where it overlaps
    change.clear_all();
    pending.clear_all();
    overrun.clear_all();
    put(&mut pv, "value", 1.0.into());
    change.set(value);
    change.set(seconds);
    change.set(nanoseconds);
    overrun.or_and(&change, &pending);
    pending |= &change;
    assert_eq!(pending.cardinality(), 3);
    assert!(overrun.is_empty());

    change.clear_all();
    put(&mut pv, "value", 2.0.into());
    change.set(value);
    overrun.or_and(&change, &pending);
    pending |= &change;
    assert_eq!(pending.cardinality(), 3);
    assert_eq!(overrun, BitSet::from([value]));
}

#[test]
fn subscription_sees_only_its_selection() {
    let ty = standard::scalar(ScalarType::Float64, "alarm,timeStamp");
    let table = OffsetTable::new(&ty);
    let mut pv = StructValue::new(ty.clone());

    let spec = create_request("field(value,alarm)").unwrap();

    // cheap pre-check first: is the update visible at all?
    let visible = extract_selection_mask(&ty, Some(&spec), true);
    let mut change = BitSet::from([table.offset_of("timeStamp.userTag").unwrap()]);
    assert!(!visible.logical_and(&change));

    put(&mut pv, "value", 3.25.into());
    change.set(table.offset_of("value").unwrap());
    assert!(visible.logical_and(&change));

    // worth a full mapper now
    let mut mapper = RequestMapper::try_new(&ty, &spec, MapMode::Slice).unwrap();
    let mut view = mapper.build_requested().unwrap();
    let mut view_mask = BitSet::new();
    mapper
        .copy_base_to_requested(&pv, &change, &mut view, &mut view_mask)
        .unwrap();

    assert_eq!(
        view.sub_field("value").and_then(Value::as_scalar),
        Some(&ScalarValue::Float64(3.25))
    );
    // the unselected timeStamp change did not leak into the view's mask
    let view_table = OffsetTable::new(mapper.type_requested().unwrap());
    assert_eq!(
        view_mask,
        BitSet::from([view_table.offset_of("value").unwrap()])
    );
}
