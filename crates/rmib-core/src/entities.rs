//! Resolved definition records.
//!
//! Every record is owned by its defining module's catalog; the OID tree
//! holds back references by handle. Cross-references between records
//! (`AUGMENTS`, index entries, notification objects, group members) are
//! handles too, `None` where resolution failed — failures are reported
//! through diagnostics and the unresolved-reference list, never dropped
//! silently.
use crate::defval::DefVal;
use crate::ir::{Access, NamedValue, Range, Status, TrapClause};
use crate::module::ModuleId;
use crate::tree::{NodeId, NodeKind};
use crate::types::TypeId;

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

macro_rules! entity_handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) u32);

        impl $name {
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

entity_handle!(
    /// Handle to a resolved object.
    ObjectId
);
entity_handle!(
    /// Handle to a resolved notification.
    NotificationId
);
entity_handle!(
    /// Handle to a resolved group.
    GroupId
);
entity_handle!(
    /// Handle to a resolved compliance statement.
    ComplianceId
);
entity_handle!(
    /// Handle to a resolved agent-capabilities statement.
    CapabilityId
);

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

/// One resolved `INDEX` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// The descriptor as written.
    pub label: String,
    /// `IMPLIED` flag.
    pub implied: bool,
    /// The indexed object, once back-linking has run. `None` for bare type
    /// names and for unresolved descriptors.
    pub object: Option<ObjectId>,
}

/// A resolved `OBJECT-TYPE`.
///
/// The constraint fields at the bottom are the *effective* values: the
/// object's own inline constraints when present, otherwise the nearest
/// value found walking the type chain.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub module: ModuleId,
    /// The tree node this object resolved to.
    pub node: NodeId,
    /// Table / Row / Column / Scalar.
    pub kind: NodeKind,
    /// The resolved type; `None` when the syntax never resolved
    /// (`type-unknown`) or the object is a table.
    pub type_id: Option<TypeId>,
    pub access: Access,
    pub status: Status,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub units: Option<String>,
    pub defval: Option<DefVal>,
    /// The augmented row, for `AUGMENTS` rows.
    pub augments: Option<ObjectId>,
    /// The `INDEX` clause, in declaration order.
    pub indexes: Vec<IndexEntry>,

    pub display_hint: Option<String>,
    pub sizes: Vec<Range>,
    pub ranges: Vec<Range>,
    pub enums: Vec<NamedValue>,
    pub bits: Vec<NamedValue>,
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// One entry of a notification's `OBJECTS` (or `VARIABLES`) clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationObject {
    pub label: String,
    /// The referenced object; `None` when the name resolved to a non-object
    /// node or not at all.
    pub object: Option<ObjectId>,
}

/// A resolved `NOTIFICATION-TYPE` or synthesized SMIv1 `TRAP-TYPE`.
#[derive(Debug, Clone)]
pub struct Notification {
    pub name: String,
    pub module: ModuleId,
    pub node: NodeId,
    pub objects: Vec<NotificationObject>,
    pub status: Status,
    pub description: Option<String>,
    pub reference: Option<String>,
    /// Present only for SMIv1 traps: the original enterprise descriptor and
    /// trap number the OID was synthesized from.
    pub trap_info: Option<TrapClause>,
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// One member of an object or notification group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub label: String,
    pub node: Option<NodeId>,
}

/// A resolved `OBJECT-GROUP` or `NOTIFICATION-GROUP`.
#[derive(Debug, Clone)]
pub struct Group {
    pub name: String,
    pub module: ModuleId,
    pub node: NodeId,
    pub members: Vec<GroupMember>,
    pub is_notification_group: bool,
    pub status: Status,
    pub description: Option<String>,
    pub reference: Option<String>,
}

// ---------------------------------------------------------------------------
// Compliance
// ---------------------------------------------------------------------------

/// A `GROUP` refinement inside a compliance module clause.
#[derive(Debug, Clone)]
pub struct GroupRefinement {
    pub group: String,
    pub description: Option<String>,
}

/// An `OBJECT` refinement inside a compliance module clause.
#[derive(Debug, Clone)]
pub struct ObjectRefinement {
    pub object: String,
    /// Refined read syntax, resolved through the regular type path.
    pub syntax: Option<TypeId>,
    /// Refined write syntax.
    pub write_syntax: Option<TypeId>,
    /// `MIN-ACCESS`, preserved verbatim (including SPPI values).
    pub min_access: Option<Access>,
    pub description: Option<String>,
}

/// One `MODULE` clause of a compliance statement.
#[derive(Debug, Clone)]
pub struct ComplianceModule {
    /// The named module, or `None` for the enclosing module.
    pub module: Option<String>,
    pub mandatory_groups: Vec<String>,
    pub groups: Vec<GroupRefinement>,
    pub objects: Vec<ObjectRefinement>,
}

/// A resolved `MODULE-COMPLIANCE`.
#[derive(Debug, Clone)]
pub struct Compliance {
    pub name: String,
    pub module: ModuleId,
    pub node: NodeId,
    pub status: Status,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub modules: Vec<ComplianceModule>,
}

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// A `VARIATION` clause for an object inside a supports clause.
#[derive(Debug, Clone)]
pub struct ObjectVariation {
    pub object: String,
    pub syntax: Option<TypeId>,
    pub write_syntax: Option<TypeId>,
    /// Access override, preserved verbatim — `not-implemented` is legal
    /// here and only here.
    pub access: Option<Access>,
    pub creation_requires: Vec<String>,
    pub defval: Option<DefVal>,
    pub description: Option<String>,
}

/// A `VARIATION` clause for a notification inside a supports clause.
#[derive(Debug, Clone)]
pub struct NotificationVariation {
    pub notification: String,
    pub access: Option<Access>,
    pub description: Option<String>,
}

/// One resolved `SUPPORTS` clause of an agent-capabilities statement.
#[derive(Debug, Clone)]
pub struct CapabilitySupports {
    pub module: String,
    pub includes: Vec<String>,
    pub object_variations: Vec<ObjectVariation>,
    pub notification_variations: Vec<NotificationVariation>,
}

/// A resolved `AGENT-CAPABILITIES`.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub module: ModuleId,
    pub node: NodeId,
    pub product_release: String,
    pub status: Status,
    pub description: Option<String>,
    pub reference: Option<String>,
    pub supports: Vec<CapabilitySupports>,
}
