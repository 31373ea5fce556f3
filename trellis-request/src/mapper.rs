use itertools::Itertools;
use trellis_bitset::BitSet;
use trellis_error::{TrellisResult, trellis_bail, trellis_err};
use trellis_introspect::{Field, FieldName, OffsetTable, StructType, TypeBuilder};
use trellis_value::StructValue;

use crate::SelectionSpec;
use crate::walk::{SelectionVisitor, walk_selection};

/// How the requested view relates to the base type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MapMode {
    /// The requested type is the base type itself; the work product is
    /// the selected-offsets mask and operations pass values and bits
    /// through unchanged, restricted to selected offsets.
    #[default]
    Mask,
    /// The requested type is a freshly built structure containing only
    /// the selected branches, with its own offset space.
    Slice,
}

/// A field offset in the base address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BaseOffset(pub usize);

/// A field offset in the requested address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReqOffset(pub usize);

trait MappedOffset: Copy {
    fn index(self) -> usize;
}

impl MappedOffset for BaseOffset {
    fn index(self) -> usize {
        self.0
    }
}

impl MappedOffset for ReqOffset {
    fn index(self) -> usize {
        self.0
    }
}

/// The per-offset correspondence record. One table entry per offset of
/// the originating address space; `O` is the offset newtype of the other
/// space, so a base offset cannot be used where a requested offset is
/// meant.
#[derive(Debug, Clone, Default)]
enum Mapping<O> {
    /// No requested counterpart (possible only in the base-to-requested
    /// table: the base may be larger than the selection).
    #[default]
    Unmapped,
    /// A leaf field; copying it copies one value.
    Leaf {
        to: O,
    },
    /// A structure. Its descendant ranges differ in size between the two
    /// address spaces, so the full descendant sets are carried: `tomask`
    /// over the destination space, `frommask` over the source space.
    Node {
        to: O,
        tomask: BitSet,
        frommask: BitSet,
    },
}

impl<O> Mapping<O> {
    fn node(to: O) -> Self {
        Mapping::Node {
            to,
            tomask: BitSet::new(),
            frommask: BitSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
struct Computed {
    type_base: StructType,
    type_requested: StructType,
    table_base: OffsetTable,
    table_requested: OffsetTable,
}

/// Derives a requested view of a base structure type from a
/// [`SelectionSpec`] and translates values and change masks between the
/// base and requested address spaces, in both directions.
///
/// A mapper is built once per logical subscription by [`Self::compute`]
/// and then reused for every update. It is not internally synchronized
/// and the copy operations reuse a scratch set through `&mut self`; one
/// mapper per subscription, with the owner serializing access, is the
/// expected usage.
#[derive(Debug, Clone, Default)]
pub struct RequestMapper {
    computed: Option<Computed>,
    mask_requested: BitSet,
    base2req: Vec<Mapping<ReqOffset>>,
    req2base: Vec<Mapping<BaseOffset>>,
    warnings: Vec<String>,
    scratch: BitSet,
}

impl RequestMapper {
    /// A fresh mapper with no mapping computed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute a mapper in one step; see [`Self::compute`].
    pub fn try_new(
        base: &StructType,
        selection: &SelectionSpec,
        mode: MapMode,
    ) -> TrellisResult<Self> {
        let mut mapper = Self::new();
        mapper.compute(base, selection, mode)?;
        Ok(mapper)
    }

    /// Build the requested view of `base` described by `selection` and
    /// the correspondence tables between the two offset spaces.
    ///
    /// Unknown selected fields, selections below a leaf, and selections
    /// cut off by the recursion bound are soft failures: the field is
    /// skipped and a warning recorded (see [`Self::warnings`]). A
    /// selection with no usable field at all is a hard failure.
    ///
    /// The call is transactional: on failure the mapper keeps its
    /// previous state.
    pub fn compute(
        &mut self,
        base: &StructType,
        selection: &SelectionSpec,
        mode: MapMode,
    ) -> TrellisResult<()> {
        let table_base = OffsetTable::new(base);
        let mut warnings = Vec::new();
        let mut mask_requested = BitSet::with_capacity(table_base.len());

        let sliced = if selection.is_wildcard() {
            // no selection is a selection of everything; the requested
            // type is the base type itself even in Slice mode
            for i in 1..table_base.len() {
                mask_requested.set(i);
            }
            base.clone()
        } else {
            let mut visitor = BuildVisitor {
                builder: TypeBuilder::new(),
                mask: &mut mask_requested,
                warnings: &mut warnings,
                path: Vec::new(),
            };
            walk_selection(base, selection, &mut visitor);
            visitor.builder.build()
        };

        mask_requested.set(0);
        if mask_requested.next_set_bit(1).is_none() {
            warnings.push("empty field selection".to_string());
            trellis_bail!(InvalidSelection: "{}", warnings.join("; "));
        }

        let type_requested = match mode {
            MapMode::Mask => base.clone(),
            MapMode::Slice => sliced,
        };
        let table_requested = OffsetTable::new(&type_requested);

        let mut base2req: Vec<Mapping<ReqOffset>> =
            vec![Mapping::Unmapped; table_base.len()];
        let mut req2base: Vec<Mapping<BaseOffset>> =
            vec![Mapping::Unmapped; table_requested.len()];
        // the whole-structure bits always correspond
        base2req[0] = Mapping::node(ReqOffset(0));
        req2base[0] = Mapping::node(BaseOffset(0));

        // Walk the requested offsets and tie each to its base counterpart
        // by full name. Pre-order guarantees enclosing structures are
        // mapped before their members.
        for r in 1..table_requested.len() {
            let name = table_requested.full_name(r);
            let b = table_base.offset_of(&name).ok_or_else(|| {
                trellis_err!("requested field '{}' missing from base type", name)
            })?;
            if !mask_requested.get(b) {
                continue;
            }

            let leaf = !table_base.field(b).is_structure();
            if leaf {
                base2req[b] = Mapping::Leaf { to: ReqOffset(r) };
                req2base[r] = Mapping::Leaf { to: BaseOffset(b) };
            } else {
                base2req[b] = Mapping::node(ReqOffset(r));
                req2base[r] = Mapping::node(BaseOffset(b));
            }

            // enter this field into the descendant masks of every
            // enclosing structure, on both sides
            for parent in table_requested.ancestors(r).collect_vec() {
                if let Mapping::Node {
                    tomask, frommask, ..
                } = &mut req2base[parent]
                {
                    tomask.set(b);
                    frommask.set(r);
                }
            }
            for parent in table_base.ancestors(b).collect_vec() {
                if let Mapping::Node {
                    tomask, frommask, ..
                } = &mut base2req[parent]
                {
                    tomask.set(r);
                    frommask.set(b);
                }
            }
        }

        self.computed = Some(Computed {
            type_base: base.clone(),
            type_requested,
            table_base,
            table_requested,
        });
        self.mask_requested = mask_requested;
        self.base2req = base2req;
        self.req2base = req2base;
        self.warnings = warnings;
        self.scratch.clear_all();
        Ok(())
    }

    /// The base-offset-space mask of every field reachable from the
    /// requested view, including the enclosing-structure bits on the path
    /// to each selected leaf (bit 0 always included). Empty before
    /// [`Self::compute`].
    ///
    /// Intersecting a change set with this mask answers "is this update
    /// visible to the requested view at all" without copying anything.
    pub fn requested_mask(&self) -> &BitSet {
        &self.mask_requested
    }

    /// The base type of the computed mapping, if computed.
    pub fn type_base(&self) -> Option<&StructType> {
        self.computed.as_ref().map(|c| &c.type_base)
    }

    /// The requested type of the computed mapping, if computed.
    pub fn type_requested(&self) -> Option<&StructType> {
        self.computed.as_ref().map(|c| &c.type_requested)
    }

    /// Warnings accumulated by the last successful [`Self::compute`].
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// A default instance of the requested type.
    pub fn build_requested(&self) -> TrellisResult<StructValue> {
        Ok(StructValue::new(self.computed()?.type_requested.clone()))
    }

    /// A default instance of the base type.
    pub fn build_base(&self) -> TrellisResult<StructValue> {
        Ok(StructValue::new(self.computed()?.type_base.clone()))
    }

    /// Copy every base field marked in `base_mask` that has a requested
    /// counterpart from `base` into `requested`, marking the copied
    /// offsets in `requested_mask`.
    ///
    /// A marked structure bit stands for its whole subtree: the
    /// descendants are copied and the corresponding requested structure
    /// bit is set. `requested_mask` is only added to, never cleared.
    pub fn copy_base_to_requested(
        &mut self,
        base: &StructValue,
        base_mask: &BitSet,
        requested: &mut StructValue,
        requested_mask: &mut BitSet,
    ) -> TrellisResult<()> {
        let Self {
            computed,
            base2req,
            scratch,
            ..
        } = self;
        let c = computed
            .as_ref()
            .ok_or_else(|| trellis_err!("no mapping computed"))?;
        check_instance(&c.type_base, base)?;
        check_instance(&c.type_requested, requested)?;
        map_values(
            base2req,
            scratch,
            (&c.table_base, base),
            (&c.table_requested, requested),
            base_mask,
            requested_mask,
        )
    }

    /// The mirror of [`Self::copy_base_to_requested`]: copy the fields
    /// marked in `requested_mask` from `requested` into `base`, marking
    /// `base_mask` (additively).
    pub fn copy_base_from_requested(
        &mut self,
        base: &mut StructValue,
        base_mask: &mut BitSet,
        requested: &StructValue,
        requested_mask: &BitSet,
    ) -> TrellisResult<()> {
        let Self {
            computed,
            req2base,
            scratch,
            ..
        } = self;
        let c = computed
            .as_ref()
            .ok_or_else(|| trellis_err!("no mapping computed"))?;
        check_instance(&c.type_base, base)?;
        check_instance(&c.type_requested, requested)?;
        map_values(
            req2base,
            scratch,
            (&c.table_requested, requested),
            (&c.table_base, base),
            requested_mask,
            base_mask,
        )
    }

    /// Translate a base-space mask into the requested space without
    /// touching any field value. Additive, like the copy operations.
    pub fn mask_base_to_requested(
        &self,
        base_mask: &BitSet,
        requested_mask: &mut BitSet,
    ) -> TrellisResult<()> {
        self.computed()?;
        map_mask(&self.base2req, base_mask, requested_mask);
        Ok(())
    }

    /// Translate a requested-space mask into the base space without
    /// touching any field value. Additive, like the copy operations.
    pub fn mask_base_from_requested(
        &self,
        base_mask: &mut BitSet,
        requested_mask: &BitSet,
    ) -> TrellisResult<()> {
        self.computed()?;
        map_mask(&self.req2base, requested_mask, base_mask);
        Ok(())
    }

    /// Return to the default, uncomputed state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// O(1) exchange of all state with `other`. Never fails.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    fn computed(&self) -> TrellisResult<&Computed> {
        self.computed
            .as_ref()
            .ok_or_else(|| trellis_err!("no mapping computed"))
    }
}

fn check_instance(expected: &StructType, value: &StructValue) -> TrellisResult<()> {
    if value.struct_type() != expected {
        trellis_bail!(MismatchedTypes: expected, value.struct_type());
    }
    Ok(())
}

/// Copy the `src_mask`-marked fields of `src` into `dst` through `map`,
/// marking `dst_mask`. `scratch` accumulates the source-side expansion of
/// marked structure bits mid-scan; indices added by the expansion are
/// always above the current scan position.
fn map_values<O: MappedOffset>(
    map: &[Mapping<O>],
    scratch: &mut BitSet,
    (src_table, src): (&OffsetTable, &StructValue),
    (dst_table, dst): (&OffsetTable, &mut StructValue),
    src_mask: &BitSet,
    dst_mask: &mut BitSet,
) -> TrellisResult<()> {
    scratch.clear_all();
    *scratch |= src_mask;

    let mut next = scratch.next_set_bit(0);
    while let Some(i) = next {
        if i >= map.len() {
            break;
        }
        match &map[i] {
            // only the base-to-requested direction has holes
            Mapping::Unmapped => {}
            Mapping::Leaf { to } => {
                let src_value = src
                    .value_at(src_table, i)
                    .ok_or_else(|| trellis_err!(OutOfBounds: i, 1, src_table.len()))?;
                dst.value_at_mut(dst_table, to.index())
                    .ok_or_else(|| trellis_err!(OutOfBounds: to.index(), 1, dst_table.len()))?
                    .copy_from(src_value)?;
                dst_mask.set(to.index());
            }
            Mapping::Node { to, frommask, .. } => {
                // a marked structure bit means "everything below changed":
                // pull the descendants into the scan and set the
                // structure's own bit on the destination side
                *scratch |= frommask;
                dst_mask.set(to.index());
            }
        }
        next = scratch.next_set_bit(i + 1);
    }
    Ok(())
}

/// Pure bit translation through `map`: no values touched.
fn map_mask<O: MappedOffset>(map: &[Mapping<O>], src_mask: &BitSet, dst_mask: &mut BitSet) {
    let mut next = src_mask.next_set_bit(0);
    while let Some(i) = next {
        if i >= map.len() {
            break;
        }
        match &map[i] {
            Mapping::Unmapped => {}
            Mapping::Leaf { to } => {
                dst_mask.set(to.index());
            }
            Mapping::Node { to, tomask, .. } => {
                dst_mask.set(to.index());
                *dst_mask |= tomask;
            }
        }
        next = src_mask.next_set_bit(i + 1);
    }
}

/// The walk action of the full mapper: build the requested type, mark the
/// selected base offsets, record warnings.
struct BuildVisitor<'a> {
    builder: TypeBuilder,
    mask: &'a mut BitSet,
    warnings: &'a mut Vec<String>,
    path: Vec<FieldName>,
}

impl BuildVisitor<'_> {
    fn full_path(&self, name: &FieldName) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path.iter().join("."), name)
        }
    }
}

impl SelectionVisitor for BuildVisitor<'_> {
    fn select_root(&mut self) {
        unreachable!("the wildcard selection is handled before the walk")
    }

    fn select_subtree(&mut self, name: &FieldName, offset: usize, field: &Field) {
        self.builder.add(name.clone(), field.clone());
        for i in offset..offset + field.number_fields() {
            self.mask.set(i);
        }
    }

    fn enter_structure(&mut self, name: &FieldName, offset: usize, _ty: &StructType) {
        self.builder.nested(name.clone());
        self.mask.set(offset);
        self.path.push(name.clone());
    }

    fn leave_structure(&mut self) {
        self.builder.end_nested();
        self.path.pop();
    }

    fn unknown_field(&mut self, name: &FieldName) {
        let warning = format!("no field '{}'", self.full_path(name));
        log::debug!("{warning}");
        self.warnings.push(warning);
    }

    fn descend_below_leaf(&mut self, name: &FieldName) {
        self.warnings
            .push(format!("leaf field '{}'", self.full_path(name)));
    }

    fn truncated(&mut self, name: &FieldName) {
        self.warnings
            .push(format!("selection truncated at '{}'", self.full_path(name)));
    }
}
