//! Per-module definition catalogs.
use std::collections::HashMap;

use crate::entities::{CapabilityId, ComplianceId, GroupId, NotificationId, ObjectId};
use crate::ir::{Language, Revision};
use crate::tree::NodeId;
use crate::types::TypeId;

/// Handle to a module in the catalog arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(pub(crate) u32);

impl ModuleId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A resolved module: identity metadata plus its definitions, both as
/// insertion-ordered lists and name-keyed lookups.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    /// Source path the lowering pass recorded, if any.
    pub path: Option<String>,
    pub language: Language,
    /// `true` for the synthesized well-known scaffolding modules.
    pub is_base: bool,
    /// The `MODULE-IDENTITY` node, set only when this module is the
    /// preferred claimant of it.
    pub oid: Option<NodeId>,
    pub organization: Option<String>,
    pub contact_info: Option<String>,
    pub description: Option<String>,
    /// The `LAST-UPDATED` string, verbatim. Used as the preference tiebreak
    /// between two modules claiming the same node.
    pub last_updated: Option<String>,
    pub revisions: Vec<Revision>,

    pub objects: Vec<ObjectId>,
    pub types: Vec<TypeId>,
    pub notifications: Vec<NotificationId>,
    pub groups: Vec<GroupId>,
    pub compliances: Vec<ComplianceId>,
    pub capabilities: Vec<CapabilityId>,

    pub object_names: HashMap<String, ObjectId>,
    pub type_names: HashMap<String, TypeId>,
    pub notification_names: HashMap<String, NotificationId>,
    pub group_names: HashMap<String, GroupId>,
    pub compliance_names: HashMap<String, ComplianceId>,
    pub capability_names: HashMap<String, CapabilityId>,
}

impl Module {
    /// An empty module record.
    pub(crate) fn new(name: impl Into<String>, language: Language, is_base: bool) -> Self {
        Self {
            name: name.into(),
            path: None,
            language,
            is_base,
            oid: None,
            organization: None,
            contact_info: None,
            description: None,
            last_updated: None,
            revisions: Vec::new(),
            objects: Vec::new(),
            types: Vec::new(),
            notifications: Vec::new(),
            groups: Vec::new(),
            compliances: Vec::new(),
            capabilities: Vec::new(),
            object_names: HashMap::new(),
            type_names: HashMap::new(),
            notification_names: HashMap::new(),
            group_names: HashMap::new(),
            compliance_names: HashMap::new(),
            capability_names: HashMap::new(),
        }
    }
}
