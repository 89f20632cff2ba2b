//! Phase E: OID resolution.
//!
//! Every OID-bearing definition is collected into an assignment worklist,
//! a dependency graph over `(module, symbol)` pairs is built (one module's
//! OID root can be another module's leaf), and assignments are processed in
//! a stable topological order — Kahn's algorithm over a min-heap keeps
//! independent assignments in registration order. Cycles are reported once
//! each via `oid-orphan` and their members left unresolved.
//!
//! Two follow-up passes run after the main walk: SMIv1 `TRAP-TYPE` OID
//! synthesis per RFC 3584, and the SMIv2 hyphenated-descriptor check.
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;

use crate::context::ResolverContext;
use crate::diag::{Code, Severity, UnresolvedKind};
use crate::imports::{lookup_node_for_module, resolve_oid_symbol_module};
use crate::ir::{Definition, Language, OidComponent};
use crate::module::ModuleId;
use crate::oid::Oid;
use crate::tree::{NodeId, NodeKind};

/// The OID of `snmpTraps`; an SMIv1 trap whose enterprise lands here is a
/// generic trap and maps to `snmpTraps.(number + 1)` per RFC 3584.
const SNMP_TRAPS_OID: [u32; 9] = [1, 3, 6, 1, 6, 3, 1, 1, 5];

// ---------------------------------------------------------------------------
// Worklist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssignKind {
    Object,
    ModuleIdentity,
    ObjectIdentity,
    Value,
    Notification,
    ObjectGroup,
    NotificationGroup,
    Compliance,
    Capability,
}

impl AssignKind {
    fn node_kind(self) -> NodeKind {
        match self {
            // Objects start as scalars; the semantic analyser refines.
            Self::Object => NodeKind::Scalar,
            Self::ModuleIdentity | Self::ObjectIdentity | Self::Value => NodeKind::Internal,
            Self::Notification => NodeKind::Notification,
            Self::ObjectGroup | Self::NotificationGroup => NodeKind::Group,
            Self::Compliance => NodeKind::Compliance,
            Self::Capability => NodeKind::Capability,
        }
    }
}

#[derive(Debug, Clone)]
struct Assignment {
    module: ModuleId,
    name: String,
    line: u32,
    components: Vec<OidComponent>,
    kind: AssignKind,
}

fn collect(ctx: &ResolverContext) -> Vec<Assignment> {
    let mut out = Vec::new();
    for m in ctx.module_ids() {
        for def in &ctx.sources[m.index()].definitions {
            let kind = match def {
                Definition::ObjectType(_) => AssignKind::Object,
                Definition::ModuleIdentity(_) => AssignKind::ModuleIdentity,
                Definition::ObjectIdentity(_) => AssignKind::ObjectIdentity,
                Definition::Notification(_) => AssignKind::Notification,
                Definition::ValueAssignment(_) => AssignKind::Value,
                Definition::ObjectGroup(_) => AssignKind::ObjectGroup,
                Definition::NotificationGroup(_) => AssignKind::NotificationGroup,
                Definition::ModuleCompliance(_) => AssignKind::Compliance,
                Definition::AgentCapabilities(_) => AssignKind::Capability,
                Definition::TypeDef(_) => continue,
            };
            let Some(oid) = def.oid() else {
                // SMIv1 traps carry no OID expression; synthesis handles them.
                continue;
            };
            out.push(Assignment {
                module: m,
                name: def.name().to_owned(),
                line: def.line(),
                components: oid.components.clone(),
                kind,
            });
        }
    }
    out
}

/// The three well-known root arcs, instantiated on first use.
fn well_known_root_arc(name: &str) -> Option<u32> {
    match name {
        "ccitt" => Some(0),
        "iso" => Some(1),
        "joint-iso-ccitt" => Some(2),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn run(ctx: &mut ResolverContext) {
    let assignments = collect(ctx);
    let order = topo_order(ctx, &assignments);

    let mut identity_claims: HashMap<NodeId, ModuleId> = HashMap::new();
    for idx in order {
        if ctx.is_cancelled() {
            return;
        }
        process(ctx, &assignments[idx], &mut identity_claims);
    }

    synthesize_traps(ctx);
    check_smiv2_hyphens(ctx, &assignments);

    ctx.debug(&format!(
        "oid resolution: {} assignments, {} tree nodes",
        assignments.len(),
        ctx.tree.len()
    ));
}

// ---------------------------------------------------------------------------
// Topological ordering
// ---------------------------------------------------------------------------

/// Orders assignment indices so that an assignment's parent symbol is
/// processed before it. Cycles are diagnosed here (once per cycle) and
/// their members excluded; assignments downstream of a cycle stay in the
/// order and fail individually when their parent lookup comes up empty.
fn topo_order(ctx: &mut ResolverContext, assignments: &[Assignment]) -> Vec<usize> {
    // First assignment wins as the provider of a (module, symbol) key.
    let mut provider: HashMap<(ModuleId, &str), usize> = HashMap::new();
    for (idx, a) in assignments.iter().enumerate() {
        provider.entry((a.module, a.name.as_str())).or_insert(idx);
    }

    let mut graph = DiGraph::<usize, ()>::with_capacity(assignments.len(), assignments.len());
    let nodes: Vec<_> = (0..assignments.len()).map(|i| graph.add_node(i)).collect();

    for (idx, a) in assignments.iter().enumerate() {
        let dep = match a.components.first() {
            None | Some(OidComponent::Number(_)) => None,
            Some(OidComponent::Name(n)) | Some(OidComponent::NamedNumber { name: n, .. }) => {
                if well_known_root_arc(n).is_some() {
                    None
                } else {
                    resolve_oid_symbol_module(ctx, a.module, n).map(|m| (m, n.as_str()))
                }
            }
            Some(OidComponent::Qualified { module, name }) => ctx
                .module_index
                .get(module)
                .and_then(|ids| ids.first())
                .map(|&m| (m, name.as_str())),
        };
        if let Some(key) = dep {
            if let Some(&p) = provider.get(&key) {
                if p != idx {
                    graph.add_edge(nodes[p], nodes[idx], ());
                }
            }
        }
    }

    // Kahn over a min-heap: independent assignments keep registration order.
    let mut in_degree: Vec<usize> = nodes
        .iter()
        .map(|&n| graph.neighbors_directed(n, petgraph::Direction::Incoming).count())
        .collect();
    let mut heap: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(assignments.len());
    let mut done = vec![false; assignments.len()];
    while let Some(Reverse(idx)) = heap.pop() {
        order.push(idx);
        done[idx] = true;
        for succ in graph.neighbors_directed(nodes[idx], petgraph::Direction::Outgoing) {
            let s = graph[succ];
            in_degree[s] -= 1;
            if in_degree[s] == 0 {
                heap.push(Reverse(s));
            }
        }
    }

    if order.len() == assignments.len() {
        return order;
    }

    // Leftovers are cycle members plus their descendants. Report each
    // actual cycle once; descendants re-enter the order and fail on their
    // own parent lookup.
    let mut in_cycle = vec![false; assignments.len()];
    for scc in tarjan_scc(&graph) {
        let cyclic = scc.len() > 1
            || (scc.len() == 1 && graph.contains_edge(scc[0], scc[0]));
        if !cyclic {
            continue;
        }
        let mut members: Vec<usize> = scc.iter().map(|&n| graph[n]).collect();
        members.sort_unstable();
        for &m in &members {
            in_cycle[m] = true;
        }
        let names: Vec<&str> = members.iter().map(|&m| assignments[m].name.as_str()).collect();
        let first = members[0];
        ctx.emit_code_at(
            Code::OidOrphan,
            Severity::Error,
            assignments[first].module,
            assignments[first].line,
            format!("cyclic OID assignments: {}", names.join(" -> ")),
        );
        for &m in &members {
            let module = assignments[m].module;
            let symbol = assignments[m].name.clone();
            ctx.record_unresolved(UnresolvedKind::Oid, module, &symbol);
        }
    }

    for idx in 0..assignments.len() {
        if !done[idx] && !in_cycle[idx] {
            order.push(idx);
        }
    }
    order
}

// ---------------------------------------------------------------------------
// Per-assignment processing
// ---------------------------------------------------------------------------

fn process(
    ctx: &mut ResolverContext,
    a: &Assignment,
    identity_claims: &mut HashMap<NodeId, ModuleId>,
) {
    let Some(first) = a.components.first() else {
        orphan(ctx, a, "empty OID assignment");
        return;
    };

    // Locate the start node and how many components it consumed.
    let (start, consumed) = match first {
        OidComponent::Number(_) => (ctx.tree.root(), 0),
        OidComponent::Name(n) | OidComponent::NamedNumber { name: n, .. } => {
            if let Some(arc) = well_known_root_arc(n) {
                let root = ctx.tree.root();
                let node = ctx.tree.get_or_create_child(root, arc);
                if ctx.tree.node(node).name.is_none() {
                    ctx.tree.node_mut(node).name = Some(n.clone());
                }
                ctx.symbols[a.module.index()].entry(n.clone()).or_insert(node);
                (node, 1)
            } else {
                let resolved = resolve_oid_symbol_module(ctx, a.module, n)
                    .and_then(|m| ctx.symbols[m.index()].get(n.as_str()).copied());
                match resolved {
                    Some(node) => (node, 1),
                    None => {
                        orphan(ctx, a, &format!("cannot resolve parent {n:?}"));
                        return;
                    }
                }
            }
        }
        OidComponent::Qualified { module, name } => {
            let resolved = ctx
                .module_index
                .get(module)
                .and_then(|ids| ids.first())
                .and_then(|m| ctx.symbols[m.index()].get(name.as_str()).copied());
            match resolved {
                Some(node) => (node, 1),
                None => {
                    orphan(ctx, a, &format!("cannot resolve parent {module}.{name}"));
                    return;
                }
            }
        }
    };

    // Walk the remaining components down the tree.
    let mut cur = start;
    for comp in &a.components[consumed..] {
        match comp {
            OidComponent::Number(arc) => {
                cur = ctx.tree.get_or_create_child(cur, *arc);
            }
            OidComponent::NamedNumber { name, number } => {
                if let Some(child) = ctx.tree.child_named(cur, name) {
                    let registered = ctx.tree.node(child).arc;
                    if registered != *number {
                        // The registered number wins; the disagreement is
                        // reported.
                        ctx.emit_code_at(
                            Code::UnknownOidComponentType,
                            Severity::Minor,
                            a.module,
                            a.line,
                            format!(
                                "{name}({number}) disagrees with registered arc {registered}"
                            ),
                        );
                    }
                    cur = child;
                } else {
                    cur = ctx.tree.get_or_create_child(cur, *number);
                    if ctx.tree.node(cur).name.is_none() {
                        ctx.tree.node_mut(cur).name = Some(name.clone());
                    }
                    ctx.symbols[a.module.index()].entry(name.clone()).or_insert(cur);
                }
            }
            OidComponent::Name(name) | OidComponent::Qualified { name, .. } => {
                match ctx.tree.child_named(cur, name) {
                    Some(child) => cur = child,
                    None => {
                        orphan(ctx, a, &format!("unknown OID component {name:?}"));
                        return;
                    }
                }
            }
        }
    }

    claim_node(ctx, cur, a.module, &a.name, a.kind.node_kind());

    if a.kind == AssignKind::ModuleIdentity {
        claim_module_identity(ctx, cur, a.module, identity_claims);
    }
}

fn orphan(ctx: &mut ResolverContext, a: &Assignment, detail: &str) {
    ctx.emit_code_at(
        Code::OidOrphan,
        Severity::Error,
        a.module,
        a.line,
        format!("{}: {detail}", a.name),
    );
    ctx.record_unresolved(UnresolvedKind::Oid, a.module, &a.name);
}

/// Registers `name` for the module and claims the node's primary
/// attributes when the module is preferred over the current holder. A
/// non-preferred claimant still registers the name in its own symbol map.
fn claim_node(ctx: &mut ResolverContext, node: NodeId, m: ModuleId, name: &str, kind: NodeKind) {
    ctx.symbols[m.index()].insert(name.to_owned(), node);

    let claim = match ctx.tree.node(node).module {
        None => true,
        Some(existing) => ctx.module_preferred(m, existing),
    };
    if claim {
        let n = ctx.tree.node_mut(node);
        n.name = Some(name.to_owned());
        n.module = Some(m);
        n.kind = kind;
    }
}

/// `MODULE-IDENTITY` additionally sets the owning module's OID — for the
/// preferred claimant only, when several modules claim the same node.
fn claim_module_identity(
    ctx: &mut ResolverContext,
    node: NodeId,
    m: ModuleId,
    claims: &mut HashMap<NodeId, ModuleId>,
) {
    match claims.get(&node).copied() {
        None => {
            claims.insert(node, m);
            ctx.modules[m.index()].oid = Some(node);
        }
        Some(holder) => {
            if ctx.module_preferred(m, holder) {
                ctx.modules[holder.index()].oid = None;
                claims.insert(node, m);
                ctx.modules[m.index()].oid = Some(node);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SMIv1 trap synthesis (RFC 3584)
// ---------------------------------------------------------------------------

fn synthesize_traps(ctx: &mut ResolverContext) {
    let snmp_traps = Oid::new(SNMP_TRAPS_OID.to_vec());

    let mut work = Vec::new();
    for m in ctx.module_ids() {
        for def in &ctx.sources[m.index()].definitions {
            if let Definition::Notification(n) = def {
                if let Some(trap) = &n.trap {
                    work.push((m, n.name.clone(), n.line, trap.clone()));
                }
            }
        }
    }

    for (m, name, line, trap) in work {
        let Some(enterprise) = lookup_node_for_module(ctx, m, &trap.enterprise) else {
            ctx.emit_code_at(
                Code::OidOrphan,
                Severity::Error,
                m,
                line,
                format!("{name}: cannot resolve enterprise {:?}", trap.enterprise),
            );
            ctx.record_unresolved(UnresolvedKind::Oid, m, &name);
            continue;
        };
        let node = if ctx.tree.oid(enterprise) == snmp_traps {
            // Generic trap: snmpTraps.(n + 1).
            ctx.tree.get_or_create_child(enterprise, trap.number.saturating_add(1))
        } else {
            // Enterprise-specific: <enterprise>.0.<n>.
            let zero = ctx.tree.get_or_create_child(enterprise, 0);
            ctx.tree.get_or_create_child(zero, trap.number)
        };
        claim_node(ctx, node, m, &name, NodeKind::Notification);
    }
}

// ---------------------------------------------------------------------------
// SMIv2 identifier check
// ---------------------------------------------------------------------------

fn check_smiv2_hyphens(ctx: &mut ResolverContext, assignments: &[Assignment]) {
    let mut findings = Vec::new();
    for a in assignments {
        let module = &ctx.modules[a.module.index()];
        if module.is_base || module.language != Language::Smiv2 {
            continue;
        }
        if a.name.contains('-') {
            findings.push((a.module, a.name.clone(), a.line));
        }
    }
    for (m, name, line) in findings {
        ctx.emit_code_at(
            Code::IdentifierHyphenSmiv2,
            Severity::Warning,
            m,
            line,
            format!("SMIv2 descriptor {name:?} contains a hyphen"),
        );
    }
}
