//! The immutable, query-ready result of a load.
//!
//! A [`Mib`] owns the frozen OID tree, the entity arenas, the per-module
//! catalogs and the name indexes. Nothing mutates after the freeze; every
//! accessor is a map lookup, a walk of the fixed trie, or a read of
//! pre-computed effective values, so concurrent reads need no locking.
//!
//! # Query grammar
//!
//! Every `find_*` accessor takes one string query:
//! - `MODULE::name` — scoped to the named module;
//! - a digit- or dot-leading string — parsed as a numeric OID;
//! - anything else — a bare name, disambiguated object first, then
//!   notification, then first registrant.
use std::collections::HashMap;

use crate::context::ResolverContext;
use crate::diag::{Diagnostic, Severity, UnresolvedRef};
use crate::entities::{
    Capability, CapabilityId, Compliance, ComplianceId, Group, GroupId, IndexEntry, Notification,
    NotificationId, Object, ObjectId,
};
use crate::ir::{NamedValue, Range};
use crate::module::{Module, ModuleId};
use crate::oid::Oid;
use crate::tree::{Node, NodeId, NodeKind, OidTree, Subtree};
use crate::types::{self, BaseType, Type, TypeId};

// ---------------------------------------------------------------------------
// Mib
// ---------------------------------------------------------------------------

/// An immutable, loaded MIB bundle. Construct through
/// [`Loader`](crate::loader::Loader).
#[derive(Debug)]
pub struct Mib {
    tree: OidTree,
    modules: Vec<Module>,
    objects: Vec<Object>,
    types: Vec<Type>,
    notifications: Vec<Notification>,
    groups: Vec<Group>,
    compliances: Vec<Compliance>,
    capabilities: Vec<Capability>,

    /// First-registered module wins the unqualified module name.
    module_by_name: HashMap<String, ModuleId>,
    /// Per-module symbol-to-node maps, for `MODULE::name` queries.
    module_symbols: Vec<HashMap<String, NodeId>>,
    /// One unqualified name can land on several nodes.
    name_to_nodes: HashMap<String, Vec<NodeId>>,
    /// First write wins, so base-module types shadow user redefinitions.
    type_by_name: HashMap<String, TypeId>,

    diagnostics: Vec<Diagnostic>,
    unresolved: Vec<UnresolvedRef>,
}

enum Query {
    Scoped { module: String, name: String },
    ByOid(Oid),
    Bare(String),
}

fn parse_query(query: &str) -> Option<Query> {
    if let Some((module, name)) = query.split_once("::") {
        if module.is_empty() || name.is_empty() {
            return None;
        }
        return Some(Query::Scoped { module: module.to_owned(), name: name.to_owned() });
    }
    let numeric = query.starts_with('.')
        || query.chars().next().is_some_and(|c| c.is_ascii_digit());
    if numeric {
        return query.parse::<Oid>().ok().map(Query::ByOid);
    }
    if query.is_empty() {
        return None;
    }
    Some(Query::Bare(query.to_owned()))
}

impl Mib {
    /// Freezes a finished resolver context. Diagnostic filtering (ignore
    /// globs, per-code overrides, level threshold) happens here and only
    /// here, so a different [`DiagnosticConfig`](crate::diag::DiagnosticConfig)
    /// never requires re-resolving.
    pub(crate) fn from_context(ctx: ResolverContext) -> Self {
        let ResolverContext {
            config,
            cancel: _,
            sources: _,
            modules,
            module_index: _,
            def_names: _,
            oid_names: _,
            imports: _,
            symbols,
            type_symbols: _,
            tree,
            objects,
            types,
            notifications,
            groups,
            compliances,
            capabilities,
            diagnostics: raw_diagnostics,
            unresolved,
            logger: _,
            base: _,
        } = ctx;

        let mut diagnostics = Vec::with_capacity(raw_diagnostics.len());
        for mut d in raw_diagnostics {
            if config.should_report(d.code, d.severity) {
                d.severity = config.effective_severity(d.code, d.severity);
                diagnostics.push(d);
            }
        }

        let mut module_by_name = HashMap::new();
        let mut name_to_nodes: HashMap<String, Vec<NodeId>> = HashMap::new();
        let mut type_by_name = HashMap::new();
        for (index, module) in modules.iter().enumerate() {
            let id = ModuleId(index as u32);
            module_by_name.entry(module.name.clone()).or_insert(id);
            let mut names: Vec<(&String, &NodeId)> = symbols[index].iter().collect();
            names.sort_unstable();
            for (name, &node) in names {
                let entry = name_to_nodes.entry(name.clone()).or_default();
                if !entry.contains(&node) {
                    entry.push(node);
                }
            }
            for &tid in &module.types {
                type_by_name.entry(types[tid.index()].name.clone()).or_insert(tid);
            }
        }

        Self {
            tree,
            modules,
            objects,
            types,
            notifications,
            groups,
            compliances,
            capabilities,
            module_by_name,
            module_symbols: symbols,
            name_to_nodes,
            type_by_name,
            diagnostics,
            unresolved,
        }
    }

    // -- nodes --------------------------------------------------------------

    /// The pseudo-root of the OID tree.
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Borrows a node by handle.
    pub fn node(&self, id: NodeId) -> &Node {
        self.tree.node(id)
    }

    /// A node's OID; empty for the root.
    pub fn oid(&self, id: NodeId) -> Oid {
        self.tree.oid(id)
    }

    /// Depth-first subtree walk in arc order, starting at `id`.
    pub fn subtree(&self, id: NodeId) -> Subtree<'_> {
        self.tree.subtree(id)
    }

    /// Exact node lookup by OID.
    pub fn node_by_oid(&self, oid: &Oid) -> Option<NodeId> {
        self.tree.find(oid)
    }

    /// Deepest node reachable along a prefix of `oid`.
    pub fn longest_prefix_by_oid(&self, oid: &Oid) -> Option<NodeId> {
        self.tree.longest_prefix(oid)
    }

    /// Resolves a query string (see the module docs for the grammar) to a
    /// node. Bare names prefer nodes carrying an object, then a
    /// notification, then the first registrant.
    pub fn find_node(&self, query: &str) -> Option<NodeId> {
        match parse_query(query)? {
            Query::Scoped { module, name } => {
                let m = *self.module_by_name.get(&module)?;
                self.module_symbols[m.index()].get(&name).copied()
            }
            Query::ByOid(oid) => self.tree.find(&oid),
            Query::Bare(name) => {
                let candidates = self.name_to_nodes.get(&name)?;
                candidates
                    .iter()
                    .copied()
                    .find(|&n| self.tree.node(n).object.is_some())
                    .or_else(|| {
                        candidates
                            .iter()
                            .copied()
                            .find(|&n| self.tree.node(n).notification.is_some())
                    })
                    .or_else(|| candidates.first().copied())
            }
        }
    }

    /// Total node count, excluding the anonymous pseudo-root.
    pub fn node_count(&self) -> usize {
        self.tree.len() - 1
    }

    // -- modules ------------------------------------------------------------

    /// Looks up a module by name (first-registered wins for duplicates).
    pub fn find_module(&self, name: &str) -> Option<ModuleId> {
        self.module_by_name.get(name).copied()
    }

    /// Borrows a module by handle.
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    /// All modules, base modules first, then user modules in input order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    // -- objects ------------------------------------------------------------

    pub fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    /// All objects in registration order.
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Handles for every object, in registration order.
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> + use<> {
        (0..self.objects.len() as u32).map(ObjectId)
    }

    pub fn find_object(&self, query: &str) -> Option<ObjectId> {
        match parse_query(query)? {
            Query::Scoped { module, name } => {
                let m = *self.module_by_name.get(&module)?;
                self.modules[m.index()].object_names.get(&name).copied()
            }
            Query::ByOid(oid) => self.tree.find(&oid).and_then(|n| self.tree.node(n).object),
            Query::Bare(_) => self.find_node(query).and_then(|n| self.tree.node(n).object),
        }
    }

    pub fn object_by_oid(&self, oid: &Oid) -> Option<ObjectId> {
        self.tree.find(oid).and_then(|n| self.tree.node(n).object)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn objects_of_kind(&self, kind: NodeKind) -> Vec<ObjectId> {
        (0..self.objects.len() as u32)
            .map(ObjectId)
            .filter(|id| self.objects[id.index()].kind == kind)
            .collect()
    }

    /// All table objects, in registration order.
    pub fn tables(&self) -> Vec<ObjectId> {
        self.objects_of_kind(NodeKind::Table)
    }

    pub fn rows(&self) -> Vec<ObjectId> {
        self.objects_of_kind(NodeKind::Row)
    }

    pub fn columns(&self) -> Vec<ObjectId> {
        self.objects_of_kind(NodeKind::Column)
    }

    pub fn scalars(&self) -> Vec<ObjectId> {
        self.objects_of_kind(NodeKind::Scalar)
    }

    /// The row object of a table.
    pub fn entry(&self, table: ObjectId) -> Option<ObjectId> {
        let node = self.objects[table.index()].node;
        self.tree
            .node(node)
            .children
            .values()
            .filter_map(|&child| self.tree.node(child).object)
            .find(|&o| self.objects[o.index()].kind == NodeKind::Row)
    }

    /// The row an object belongs to: itself for a row, the parent row for a
    /// column, `None` otherwise.
    pub fn row_of(&self, object: ObjectId) -> Option<ObjectId> {
        match self.objects[object.index()].kind {
            NodeKind::Row => Some(object),
            NodeKind::Column => {
                let node = self.objects[object.index()].node;
                let parent = self.tree.node(node).parent?;
                self.tree
                    .node(parent)
                    .object
                    .filter(|&o| self.objects[o.index()].kind == NodeKind::Row)
            }
            NodeKind::Internal
            | NodeKind::Scalar
            | NodeKind::Table
            | NodeKind::Notification
            | NodeKind::Group
            | NodeKind::Compliance
            | NodeKind::Capability => None,
        }
    }

    /// A row's index entries, following `AUGMENTS` to the base row when the
    /// row declares none of its own. Cycle-safe.
    pub fn effective_indexes(&self, row: ObjectId) -> &[IndexEntry] {
        let mut visited = vec![false; self.objects.len()];
        let mut cur = row;
        loop {
            if visited[cur.index()] {
                return &[];
            }
            visited[cur.index()] = true;
            let o = &self.objects[cur.index()];
            if !o.indexes.is_empty() {
                return &o.indexes;
            }
            match o.augments {
                Some(base) => cur = base,
                None => return &[],
            }
        }
    }

    // -- types --------------------------------------------------------------

    /// Borrows a type by handle.
    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    /// All types in registration order (seeded primitives first).
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// Handles for every type, in registration order.
    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> + use<> {
        (0..self.types.len() as u32).map(TypeId)
    }

    pub fn find_type(&self, query: &str) -> Option<TypeId> {
        match parse_query(query)? {
            Query::Scoped { module, name } => {
                let m = *self.module_by_name.get(&module)?;
                self.modules[m.index()].type_names.get(&name).copied()
            }
            Query::ByOid(_) => None,
            Query::Bare(name) => self.type_by_name.get(&name).copied(),
        }
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// The effective base of a type, walking the parent chain.
    pub fn effective_base(&self, id: TypeId) -> BaseType {
        types::effective_base(&self.types, id)
    }

    pub fn effective_display_hint(&self, id: TypeId) -> Option<&str> {
        types::effective_display_hint(&self.types, id)
    }

    pub fn effective_sizes(&self, id: TypeId) -> &[Range] {
        types::effective_sizes(&self.types, id)
    }

    pub fn effective_ranges(&self, id: TypeId) -> &[Range] {
        types::effective_ranges(&self.types, id)
    }

    pub fn effective_enums(&self, id: TypeId) -> &[NamedValue] {
        types::effective_enums(&self.types, id)
    }

    pub fn effective_bits(&self, id: TypeId) -> &[NamedValue] {
        types::effective_bits(&self.types, id)
    }

    // -- notifications, groups, compliances, capabilities --------------------

    pub fn notification(&self, id: NotificationId) -> &Notification {
        &self.notifications[id.index()]
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn find_notification(&self, query: &str) -> Option<NotificationId> {
        match parse_query(query)? {
            Query::Scoped { module, name } => {
                let m = *self.module_by_name.get(&module)?;
                self.modules[m.index()].notification_names.get(&name).copied()
            }
            Query::ByOid(oid) => {
                self.tree.find(&oid).and_then(|n| self.tree.node(n).notification)
            }
            Query::Bare(_) => {
                self.find_node(query).and_then(|n| self.tree.node(n).notification)
            }
        }
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.len()
    }

    pub fn group(&self, id: GroupId) -> &Group {
        &self.groups[id.index()]
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn find_group(&self, query: &str) -> Option<GroupId> {
        match parse_query(query)? {
            Query::Scoped { module, name } => {
                let m = *self.module_by_name.get(&module)?;
                self.modules[m.index()].group_names.get(&name).copied()
            }
            Query::ByOid(oid) => self.tree.find(&oid).and_then(|n| self.tree.node(n).group),
            Query::Bare(_) => self.find_node(query).and_then(|n| self.tree.node(n).group),
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn compliance(&self, id: ComplianceId) -> &Compliance {
        &self.compliances[id.index()]
    }

    pub fn compliances(&self) -> &[Compliance] {
        &self.compliances
    }

    pub fn find_compliance(&self, query: &str) -> Option<ComplianceId> {
        match parse_query(query)? {
            Query::Scoped { module, name } => {
                let m = *self.module_by_name.get(&module)?;
                self.modules[m.index()].compliance_names.get(&name).copied()
            }
            Query::ByOid(oid) => self.tree.find(&oid).and_then(|n| self.tree.node(n).compliance),
            Query::Bare(_) => self.find_node(query).and_then(|n| self.tree.node(n).compliance),
        }
    }

    pub fn compliance_count(&self) -> usize {
        self.compliances.len()
    }

    pub fn capability(&self, id: CapabilityId) -> &Capability {
        &self.capabilities[id.index()]
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn find_capability(&self, query: &str) -> Option<CapabilityId> {
        match parse_query(query)? {
            Query::Scoped { module, name } => {
                let m = *self.module_by_name.get(&module)?;
                self.modules[m.index()].capability_names.get(&name).copied()
            }
            Query::ByOid(oid) => self.tree.find(&oid).and_then(|n| self.tree.node(n).capability),
            Query::Bare(_) => self.find_node(query).and_then(|n| self.tree.node(n).capability),
        }
    }

    pub fn capability_count(&self) -> usize {
        self.capabilities.len()
    }

    // -- diagnostics --------------------------------------------------------

    /// The reported diagnostics, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The accumulated unresolved references.
    pub fn unresolved(&self) -> &[UnresolvedRef] {
        &self.unresolved
    }

    /// `true` when any reported diagnostic is at least
    /// [`Severity::Error`].
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.rank() <= Severity::Error.rank())
    }

    /// `true` when every reference resolved.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}
