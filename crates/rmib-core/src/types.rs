//! Resolved types and parent-chain resolution helpers.
//!
//! Types form chains through their `parent` handle: a textual convention
//! points at the type it refines, refinements point at the ASN.1 primitive
//! or application type they anchor. The `effective_*` functions walk those
//! chains. Every walk carries its own visited set so that a malformed chain
//! that escaped cycle detection can never hang a query.
use crate::ir::{NamedValue, Range, Status};
use crate::module::ModuleId;

// ---------------------------------------------------------------------------
// Handles and base tags
// ---------------------------------------------------------------------------

/// Handle to a type in the catalog arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// The fundamental SMI base of a type.
///
/// The application tags (`Counter32` … `Opaque`) form an inheritance
/// boundary: a chain walk that reaches one of them stops there instead of
/// continuing down to the ASN.1 primitive underneath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// Not yet known; filled in from the parent chain.
    Unknown,
    Integer,
    OctetString,
    ObjectIdentifier,
    Bits,
    Counter32,
    Counter64,
    Gauge32,
    Unsigned32,
    TimeTicks,
    IpAddress,
    Opaque,
    /// Row structure syntax.
    Sequence,
    /// Table syntax.
    SequenceOf,
}

impl BaseType {
    /// `true` for the application base types that bound chain walks.
    pub fn is_application(self) -> bool {
        match self {
            Self::Counter32
            | Self::Counter64
            | Self::Gauge32
            | Self::Unsigned32
            | Self::TimeTicks
            | Self::IpAddress
            | Self::Opaque => true,
            Self::Unknown
            | Self::Integer
            | Self::OctetString
            | Self::ObjectIdentifier
            | Self::Bits
            | Self::Sequence
            | Self::SequenceOf => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Type
// ---------------------------------------------------------------------------

/// A resolved type: a seeded primitive, an application type from a base
/// module, or a user type assignment / textual convention.
#[derive(Debug, Clone)]
pub struct Type {
    pub name: String,
    /// The defining module.
    pub module: ModuleId,
    /// The fundamental base, after inheritance has run. `Unknown` survives
    /// only on types whose parent chain never resolved.
    pub base: BaseType,
    /// The refined type, if this one is derived from another by name.
    pub parent: Option<TypeId>,
    pub is_textual_convention: bool,
    pub display_hint: Option<String>,
    pub status: Status,
    pub description: Option<String>,
    pub reference: Option<String>,
    /// Direct `SIZE` constraints declared on this type (not inherited).
    pub sizes: Vec<Range>,
    /// Direct value-range constraints declared on this type.
    pub ranges: Vec<Range>,
    /// Direct enum items declared on this type.
    pub enums: Vec<NamedValue>,
    /// Direct bit items declared on this type.
    pub bits: Vec<NamedValue>,
}

// ---------------------------------------------------------------------------
// Chain walks
//
// Free functions over the arena so both the resolver context and the frozen
// Mib can use them.
// ---------------------------------------------------------------------------

/// Iterates `id` and its ancestors, stopping on a repeat visit.
fn chain(types: &[Type], id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
    let mut visited = vec![false; types.len()];
    let mut cur = Some(id);
    std::iter::from_fn(move || {
        let id = cur?;
        if visited[id.index()] {
            return None;
        }
        visited[id.index()] = true;
        cur = types[id.index()].parent;
        Some(id)
    })
}

/// The first non-`Unknown` base visible from `id`. Application bases stop
/// the walk by virtue of being non-`Unknown` themselves.
pub fn effective_base(types: &[Type], id: TypeId) -> BaseType {
    for t in chain(types, id) {
        let base = types[t.index()].base;
        if base != BaseType::Unknown {
            return base;
        }
    }
    BaseType::Unknown
}

/// The nearest non-empty display hint on the chain.
pub fn effective_display_hint(types: &[Type], id: TypeId) -> Option<&str> {
    chain(types, id).find_map(|t| types[t.index()].display_hint.as_deref())
}

/// The nearest non-empty `SIZE` constraint list on the chain.
pub fn effective_sizes(types: &[Type], id: TypeId) -> &[Range] {
    for t in chain(types, id) {
        if !types[t.index()].sizes.is_empty() {
            return &types[t.index()].sizes;
        }
    }
    &[]
}

/// The nearest non-empty value-range list on the chain.
pub fn effective_ranges(types: &[Type], id: TypeId) -> &[Range] {
    for t in chain(types, id) {
        if !types[t.index()].ranges.is_empty() {
            return &types[t.index()].ranges;
        }
    }
    &[]
}

/// The nearest non-empty enum list on the chain.
pub fn effective_enums(types: &[Type], id: TypeId) -> &[NamedValue] {
    for t in chain(types, id) {
        if !types[t.index()].enums.is_empty() {
            return &types[t.index()].enums;
        }
    }
    &[]
}

/// The nearest non-empty bits list on the chain.
pub fn effective_bits(types: &[Type], id: TypeId) -> &[NamedValue] {
    for t in chain(types, id) {
        if !types[t.index()].bits.is_empty() {
            return &types[t.index()].bits;
        }
    }
    &[]
}
