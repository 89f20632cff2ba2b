//! Phase G: semantic analysis.
//!
//! Operates on the OID-resolved, type-resolved context: classifies every
//! object as table / row / column / scalar, links `INDEX` and `AUGMENTS`
//! references, flattens constraint inheritance into effective values,
//! interprets `DEFVAL` clauses, and builds the resolved notification,
//! group, compliance and capability records. Like every phase, it reports
//! and continues — nothing here aborts resolution.
use crate::base;
use crate::context::ResolverContext;
use crate::defval::{self, DefVal, DefValValue};
use crate::diag::{Code, Severity, UnresolvedKind};
use crate::entities::{
    Capability, CapabilitySupports, Compliance, ComplianceModule, Group, GroupMember,
    GroupRefinement, IndexEntry, Notification, NotificationObject, NotificationVariation, Object,
    ObjectId, ObjectRefinement, ObjectVariation,
};
use crate::imports::{lookup_node_for_module, lookup_type_for_module};
use crate::ir::{
    CapabilitiesDef, ComplianceDef, DefValExpr, Definition, GroupDef, IndexItem, NotificationDef,
    ObjectTypeDef, OidComponent, SyntaxExpr,
};
use crate::module::ModuleId;
use crate::oid::Oid;
use crate::tree::{NodeId, NodeKind};
use crate::type_resolve::decompose_syntax;
use crate::types::{self, BaseType, TypeId};

pub(crate) fn run(ctx: &mut ResolverContext) {
    let rows = build_objects(ctx);
    reclassify_columns(ctx);
    link_rows(ctx, rows);
    build_notifications(ctx);
    build_groups(ctx);
    build_compliances(ctx);
    build_capabilities(ctx);

    ctx.debug(&format!(
        "semantic analysis: {} objects, {} notifications, {} groups",
        ctx.objects.len(),
        ctx.notifications.len(),
        ctx.groups.len()
    ));
}

// ---------------------------------------------------------------------------
// Syntax resolution
// ---------------------------------------------------------------------------

/// Resolves a syntax expression to a catalog type, emitting `type-unknown`
/// when the referenced name resolves nowhere. Enumerations and bits
/// constructs resolve to the seeded primitives; `SEQUENCE OF` resolves to
/// no type at all (tables carry none).
fn resolve_syntax_type(
    ctx: &mut ResolverContext,
    m: ModuleId,
    owner: &str,
    line: u32,
    syntax: &SyntaxExpr,
) -> Option<TypeId> {
    let parts = decompose_syntax(syntax);
    match parts.parent_ref {
        Some((Some(qualifier), name)) => {
            let target = ctx
                .module_index
                .get(&qualifier)
                .and_then(|ids| ids.first())
                .and_then(|t| ctx.type_symbols[t.index()].get(&name).copied());
            if target.is_none() {
                report_type_unknown(ctx, m, owner, line, &name);
            }
            target
        }
        Some((None, name)) => {
            let target = lookup_type_for_module(ctx, m, &name);
            if target.is_none() {
                report_type_unknown(ctx, m, owner, line, &name);
            }
            target
        }
        None => match parts.base {
            BaseType::Integer => primitive(ctx, "INTEGER"),
            BaseType::Bits => primitive(ctx, "BITS"),
            BaseType::Unknown
            | BaseType::OctetString
            | BaseType::ObjectIdentifier
            | BaseType::Counter32
            | BaseType::Counter64
            | BaseType::Gauge32
            | BaseType::Unsigned32
            | BaseType::TimeTicks
            | BaseType::IpAddress
            | BaseType::Opaque
            | BaseType::Sequence
            | BaseType::SequenceOf => None,
        },
    }
}

fn primitive(ctx: &ResolverContext, name: &str) -> Option<TypeId> {
    ctx.type_symbols[ctx.base.snmpv2_smi.index()].get(name).copied()
}

fn report_type_unknown(ctx: &mut ResolverContext, m: ModuleId, owner: &str, line: u32, name: &str) {
    ctx.emit_code_at(
        Code::TypeUnknown,
        Severity::Error,
        m,
        line,
        format!("{owner}: unknown type {name:?}"),
    );
    ctx.record_unresolved(UnresolvedKind::Type, m, name);
}

// ---------------------------------------------------------------------------
// Objects
// ---------------------------------------------------------------------------

/// Work left for the second pass, once every object exists.
struct PendingRow {
    object: ObjectId,
    module: ModuleId,
    line: u32,
    indexes: Vec<IndexItem>,
    augments: Option<String>,
}

fn build_objects(ctx: &mut ResolverContext) -> Vec<PendingRow> {
    let mut pending = Vec::new();

    for m in ctx.module_ids().collect::<Vec<_>>() {
        if ctx.is_cancelled() {
            break;
        }
        let defs: Vec<ObjectTypeDef> = ctx.sources[m.index()]
            .definitions
            .iter()
            .filter_map(|d| match d {
                Definition::ObjectType(o) => Some(o.clone()),
                Definition::TypeDef(_)
                | Definition::ModuleIdentity(_)
                | Definition::ObjectIdentity(_)
                | Definition::Notification(_)
                | Definition::ValueAssignment(_)
                | Definition::ObjectGroup(_)
                | Definition::NotificationGroup(_)
                | Definition::ModuleCompliance(_)
                | Definition::AgentCapabilities(_) => None,
            })
            .collect();

        for def in defs {
            // No node means the OID assignment already failed; that was
            // reported in phase E.
            let Some(&node) = ctx.symbols[m.index()].get(&def.name) else {
                continue;
            };

            let kind = if matches!(def.syntax, SyntaxExpr::SequenceOf { .. }) {
                NodeKind::Table
            } else if !def.indexes.is_empty() || def.augments.is_some() {
                NodeKind::Row
            } else {
                NodeKind::Scalar
            };

            let type_id = resolve_syntax_type(ctx, m, &def.name, def.line, &def.syntax);
            let parts = decompose_syntax(&def.syntax);

            let defval = def
                .defval
                .as_ref()
                .and_then(|expr| convert_defval(ctx, m, def.line, expr, type_id));

            // Effective-value flattening: inline constraints win, otherwise
            // the nearest ancestor on the type chain.
            let display_hint = type_id
                .and_then(|t| types::effective_display_hint(&ctx.types, t))
                .map(str::to_owned);
            let sizes = if parts.sizes.is_empty() {
                type_id.map(|t| types::effective_sizes(&ctx.types, t).to_vec()).unwrap_or_default()
            } else {
                parts.sizes
            };
            let ranges = if parts.ranges.is_empty() {
                type_id
                    .map(|t| types::effective_ranges(&ctx.types, t).to_vec())
                    .unwrap_or_default()
            } else {
                parts.ranges
            };
            let enums = if parts.enums.is_empty() {
                type_id.map(|t| types::effective_enums(&ctx.types, t).to_vec()).unwrap_or_default()
            } else {
                parts.enums
            };
            let bits = if parts.bits.is_empty() {
                type_id.map(|t| types::effective_bits(&ctx.types, t).to_vec()).unwrap_or_default()
            } else {
                parts.bits
            };

            let indexes = def
                .indexes
                .iter()
                .map(|item| IndexEntry {
                    label: item.name.clone(),
                    implied: item.implied,
                    object: None,
                })
                .collect();

            let id = ObjectId(ctx.objects.len() as u32);
            ctx.objects.push(Object {
                name: def.name.clone(),
                module: m,
                node,
                kind,
                type_id,
                access: def.access,
                status: def.status,
                description: def.description.clone(),
                reference: def.reference.clone(),
                units: def.units.clone(),
                defval,
                augments: None,
                indexes,
                display_hint,
                sizes,
                ranges,
                enums,
                bits,
            });
            ctx.modules[m.index()].objects.push(id);
            ctx.modules[m.index()].object_names.entry(def.name.clone()).or_insert(id);

            associate_object(ctx, node, id, kind);

            if kind == NodeKind::Row {
                pending.push(PendingRow {
                    object: id,
                    module: m,
                    line: def.line,
                    indexes: def.indexes.clone(),
                    augments: def.augments.clone(),
                });
            }
        }
    }
    pending
}

/// Links an object to its node. An existing association is overwritten only
/// when the new module is preferred; a node with no current object always
/// yields.
fn associate_object(ctx: &mut ResolverContext, node: NodeId, id: ObjectId, kind: NodeKind) {
    let replace = match ctx.tree.node(node).object {
        None => true,
        Some(existing) => {
            let incumbent = ctx.objects[existing.index()].module;
            ctx.module_preferred(ctx.objects[id.index()].module, incumbent)
        }
    };
    if replace {
        let n = ctx.tree.node_mut(node);
        n.object = Some(id);
        n.kind = kind;
    }
}

/// Children of a row that came out of the first pass as scalars are
/// columns.
fn reclassify_columns(ctx: &mut ResolverContext) {
    for index in 0..ctx.objects.len() {
        if ctx.objects[index].kind != NodeKind::Row {
            continue;
        }
        let row_node = ctx.objects[index].node;
        let children: Vec<NodeId> = ctx.tree.node(row_node).children.values().copied().collect();
        for child in children {
            let Some(child_obj) = ctx.tree.node(child).object else { continue };
            if ctx.objects[child_obj.index()].kind == NodeKind::Scalar {
                ctx.objects[child_obj.index()].kind = NodeKind::Column;
                ctx.tree.node_mut(child).kind = NodeKind::Column;
            }
        }
    }
}

/// Second pass over rows: resolve `INDEX` descriptors to objects and
/// `AUGMENTS` to the augmented row. Every object exists by now.
fn link_rows(ctx: &mut ResolverContext, pending: Vec<PendingRow>) {
    for row in pending {
        for (position, item) in row.indexes.iter().enumerate() {
            match lookup_node_for_module(ctx, row.module, &item.name) {
                Some(node) => {
                    let target = ctx.tree.node(node).object;
                    ctx.objects[row.object.index()].indexes[position].object = target;
                }
                None => {
                    // Bare primitive and application type names are legal
                    // index items; OBJECT IDENTIFIER is not.
                    if base::BARE_INDEX_TYPE_NAMES.contains(&item.name.as_str()) {
                        continue;
                    }
                    ctx.emit_code_at(
                        Code::IndexUnresolved,
                        Severity::Error,
                        row.module,
                        row.line,
                        format!("cannot resolve index item {:?}", item.name),
                    );
                    ctx.record_unresolved(UnresolvedKind::Index, row.module, &item.name);
                }
            }
        }

        if let Some(label) = &row.augments {
            let target = lookup_node_for_module(ctx, row.module, label)
                .and_then(|node| ctx.tree.node(node).object)
                .filter(|o| ctx.objects[o.index()].kind == NodeKind::Row);
            match target {
                Some(augmented) => ctx.objects[row.object.index()].augments = Some(augmented),
                None => {
                    ctx.emit_code_at(
                        Code::OidOrphan,
                        Severity::Error,
                        row.module,
                        row.line,
                        format!("AUGMENTS target {label:?} is not a resolvable row"),
                    );
                    ctx.record_unresolved(UnresolvedKind::Index, row.module, label);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

fn build_notifications(ctx: &mut ResolverContext) {
    for m in ctx.module_ids().collect::<Vec<_>>() {
        let defs: Vec<NotificationDef> = ctx.sources[m.index()]
            .definitions
            .iter()
            .filter_map(|d| match d {
                Definition::Notification(n) => Some(n.clone()),
                Definition::ObjectType(_)
                | Definition::TypeDef(_)
                | Definition::ModuleIdentity(_)
                | Definition::ObjectIdentity(_)
                | Definition::ValueAssignment(_)
                | Definition::ObjectGroup(_)
                | Definition::NotificationGroup(_)
                | Definition::ModuleCompliance(_)
                | Definition::AgentCapabilities(_) => None,
            })
            .collect();

        for def in defs {
            let Some(&node) = ctx.symbols[m.index()].get(&def.name) else {
                continue;
            };

            let mut objects = Vec::with_capacity(def.objects.len());
            for label in &def.objects {
                match lookup_node_for_module(ctx, m, label) {
                    Some(target) => {
                        let object = ctx.tree.node(target).object;
                        if object.is_none() {
                            ctx.emit_code_at(
                                Code::NotificationObjectNotObject,
                                Severity::Minor,
                                m,
                                def.line,
                                format!("{}: {label:?} does not name an object", def.name),
                            );
                        }
                        objects.push(NotificationObject { label: label.clone(), object });
                    }
                    None => {
                        ctx.emit_code_at(
                            Code::ObjectsUnresolved,
                            Severity::Error,
                            m,
                            def.line,
                            format!("{}: cannot resolve {label:?}", def.name),
                        );
                        ctx.record_unresolved(UnresolvedKind::NotificationObject, m, label);
                        objects.push(NotificationObject { label: label.clone(), object: None });
                    }
                }
            }

            let id = crate::entities::NotificationId(ctx.notifications.len() as u32);
            ctx.notifications.push(Notification {
                name: def.name.clone(),
                module: m,
                node,
                objects,
                status: def.status,
                description: def.description.clone(),
                reference: def.reference.clone(),
                trap_info: def.trap.clone(),
            });
            ctx.modules[m.index()].notifications.push(id);
            ctx.modules[m.index()]
                .notification_names
                .entry(def.name.clone())
                .or_insert(id);

            let replace = match ctx.tree.node(node).notification {
                None => true,
                Some(existing) => {
                    let incumbent = ctx.notifications[existing.index()].module;
                    ctx.module_preferred(m, incumbent)
                }
            };
            if replace {
                ctx.tree.node_mut(node).notification = Some(id);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

fn build_groups(ctx: &mut ResolverContext) {
    for m in ctx.module_ids().collect::<Vec<_>>() {
        let defs: Vec<(GroupDef, bool)> = ctx.sources[m.index()]
            .definitions
            .iter()
            .filter_map(|d| match d {
                Definition::ObjectGroup(g) => Some((g.clone(), false)),
                Definition::NotificationGroup(g) => Some((g.clone(), true)),
                Definition::ObjectType(_)
                | Definition::TypeDef(_)
                | Definition::ModuleIdentity(_)
                | Definition::ObjectIdentity(_)
                | Definition::Notification(_)
                | Definition::ValueAssignment(_)
                | Definition::ModuleCompliance(_)
                | Definition::AgentCapabilities(_) => None,
            })
            .collect();

        for (def, is_notification_group) in defs {
            let Some(&node) = ctx.symbols[m.index()].get(&def.name) else {
                continue;
            };

            let mut members = Vec::with_capacity(def.members.len());
            for label in &def.members {
                match lookup_node_for_module(ctx, m, label) {
                    Some(target) => {
                        if !is_notification_group {
                            let inaccessible = ctx
                                .tree
                                .node(target)
                                .object
                                .map(|o| {
                                    ctx.objects[o.index()].access
                                        == crate::ir::Access::NotAccessible
                                })
                                .unwrap_or(false);
                            if inaccessible {
                                ctx.emit_code_at(
                                    Code::GroupNotAccessible,
                                    Severity::Minor,
                                    m,
                                    def.line,
                                    format!(
                                        "{}: member {label:?} is not-accessible",
                                        def.name
                                    ),
                                );
                            }
                        }
                        members.push(GroupMember { label: label.clone(), node: Some(target) });
                    }
                    None => {
                        ctx.emit_code_at(
                            Code::ObjectsUnresolved,
                            Severity::Error,
                            m,
                            def.line,
                            format!("{}: cannot resolve member {label:?}", def.name),
                        );
                        ctx.record_unresolved(UnresolvedKind::NotificationObject, m, label);
                        members.push(GroupMember { label: label.clone(), node: None });
                    }
                }
            }

            let id = crate::entities::GroupId(ctx.groups.len() as u32);
            ctx.groups.push(Group {
                name: def.name.clone(),
                module: m,
                node,
                members,
                is_notification_group,
                status: def.status,
                description: def.description.clone(),
                reference: def.reference.clone(),
            });
            ctx.modules[m.index()].groups.push(id);
            ctx.modules[m.index()].group_names.entry(def.name.clone()).or_insert(id);

            if ctx.tree.node(node).group.is_none() {
                ctx.tree.node_mut(node).group = Some(id);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Compliances
// ---------------------------------------------------------------------------

fn build_compliances(ctx: &mut ResolverContext) {
    for m in ctx.module_ids().collect::<Vec<_>>() {
        let defs: Vec<ComplianceDef> = ctx.sources[m.index()]
            .definitions
            .iter()
            .filter_map(|d| match d {
                Definition::ModuleCompliance(c) => Some(c.clone()),
                Definition::ObjectType(_)
                | Definition::TypeDef(_)
                | Definition::ModuleIdentity(_)
                | Definition::ObjectIdentity(_)
                | Definition::Notification(_)
                | Definition::ValueAssignment(_)
                | Definition::ObjectGroup(_)
                | Definition::NotificationGroup(_)
                | Definition::AgentCapabilities(_) => None,
            })
            .collect();

        for def in defs {
            let Some(&node) = ctx.symbols[m.index()].get(&def.name) else {
                continue;
            };

            let mut modules = Vec::with_capacity(def.modules.len());
            for clause in &def.modules {
                let objects = clause
                    .objects
                    .iter()
                    .map(|o| ObjectRefinement {
                        object: o.object.clone(),
                        syntax: o.syntax.as_ref().and_then(|s| {
                            resolve_syntax_type(ctx, m, &def.name, def.line, s)
                        }),
                        write_syntax: o.write_syntax.as_ref().and_then(|s| {
                            resolve_syntax_type(ctx, m, &def.name, def.line, s)
                        }),
                        min_access: o.min_access,
                        description: o.description.clone(),
                    })
                    .collect();
                modules.push(ComplianceModule {
                    module: clause.module.clone(),
                    mandatory_groups: clause.mandatory_groups.clone(),
                    groups: clause
                        .groups
                        .iter()
                        .map(|g| GroupRefinement {
                            group: g.group.clone(),
                            description: g.description.clone(),
                        })
                        .collect(),
                    objects,
                });
            }

            let id = crate::entities::ComplianceId(ctx.compliances.len() as u32);
            ctx.compliances.push(Compliance {
                name: def.name.clone(),
                module: m,
                node,
                status: def.status,
                description: def.description.clone(),
                reference: def.reference.clone(),
                modules,
            });
            ctx.modules[m.index()].compliances.push(id);
            ctx.modules[m.index()].compliance_names.entry(def.name.clone()).or_insert(id);

            if ctx.tree.node(node).compliance.is_none() {
                ctx.tree.node_mut(node).compliance = Some(id);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

fn build_capabilities(ctx: &mut ResolverContext) {
    for m in ctx.module_ids().collect::<Vec<_>>() {
        let defs: Vec<CapabilitiesDef> = ctx.sources[m.index()]
            .definitions
            .iter()
            .filter_map(|d| match d {
                Definition::AgentCapabilities(c) => Some(c.clone()),
                Definition::ObjectType(_)
                | Definition::TypeDef(_)
                | Definition::ModuleIdentity(_)
                | Definition::ObjectIdentity(_)
                | Definition::Notification(_)
                | Definition::ValueAssignment(_)
                | Definition::ObjectGroup(_)
                | Definition::NotificationGroup(_)
                | Definition::ModuleCompliance(_) => None,
            })
            .collect();

        for def in defs {
            let Some(&node) = ctx.symbols[m.index()].get(&def.name) else {
                continue;
            };

            let mut supports = Vec::with_capacity(def.supports.len());
            for clause in &def.supports {
                let object_variations = clause
                    .object_variations
                    .iter()
                    .map(|v| {
                        let syntax = v.syntax.as_ref().and_then(|s| {
                            resolve_syntax_type(ctx, m, &def.name, def.line, s)
                        });
                        let write_syntax = v.write_syntax.as_ref().and_then(|s| {
                            resolve_syntax_type(ctx, m, &def.name, def.line, s)
                        });
                        let defval = v.defval.as_ref().and_then(|expr| {
                            convert_defval(ctx, m, def.line, expr, syntax)
                        });
                        ObjectVariation {
                            object: v.object.clone(),
                            syntax,
                            write_syntax,
                            access: v.access,
                            creation_requires: v.creation_requires.clone(),
                            defval,
                            description: v.description.clone(),
                        }
                    })
                    .collect();
                supports.push(CapabilitySupports {
                    module: clause.module.clone(),
                    includes: clause.includes.clone(),
                    object_variations,
                    notification_variations: clause
                        .notification_variations
                        .iter()
                        .map(|v| NotificationVariation {
                            notification: v.notification.clone(),
                            access: v.access,
                            description: v.description.clone(),
                        })
                        .collect(),
                });
            }

            let id = crate::entities::CapabilityId(ctx.capabilities.len() as u32);
            ctx.capabilities.push(Capability {
                name: def.name.clone(),
                module: m,
                node,
                product_release: def.product_release.clone(),
                status: def.status,
                description: def.description.clone(),
                reference: def.reference.clone(),
                supports,
            });
            ctx.modules[m.index()].capabilities.push(id);
            ctx.modules[m.index()].capability_names.entry(def.name.clone()).or_insert(id);

            if ctx.tree.node(node).capability.is_none() {
                ctx.tree.node_mut(node).capability = Some(id);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DEFVAL conversion
// ---------------------------------------------------------------------------

/// Interprets a lowered `DEFVAL` against the resolved type of its object.
/// Returns `None` (after reporting) for malformed hex and unresolvable OID
/// references.
fn convert_defval(
    ctx: &mut ResolverContext,
    m: ModuleId,
    line: u32,
    expr: &DefValExpr,
    type_id: Option<TypeId>,
) -> Option<DefVal> {
    match expr {
        DefValExpr::Int(v) => Some(DefVal::int(*v)),
        DefValExpr::Uint(v) => Some(DefVal::uint(*v)),
        DefValExpr::Text(s) => Some(DefVal::text(s.clone())),
        DefValExpr::Hex { digits, raw } => match defval::decode_hex(digits) {
            Some(bytes) => Some(DefVal::bytes_raw(bytes, raw.clone())),
            None => {
                ctx.emit_code_at(
                    Code::MalformedHexDefval,
                    Severity::Warning,
                    m,
                    line,
                    format!("invalid hex string {raw:?}"),
                );
                None
            }
        },
        DefValExpr::Binary { bits, raw } => match defval::decode_binary(bits) {
            Some(bytes) => Some(DefVal::bytes_raw(bytes, raw.clone())),
            None => {
                ctx.emit_code_at(
                    Code::MalformedHexDefval,
                    Severity::Warning,
                    m,
                    line,
                    format!("invalid binary string {raw:?}"),
                );
                None
            }
        },
        DefValExpr::Name(name) => {
            let oid_typed = type_id
                .map(|t| types::effective_base(&ctx.types, t) == BaseType::ObjectIdentifier)
                .unwrap_or(false);
            if oid_typed {
                match lookup_node_for_module(ctx, m, name) {
                    Some(node) => Some(DefVal {
                        value: DefValValue::Oid(ctx.tree.oid(node)),
                        raw: name.clone(),
                    }),
                    None => {
                        defval_unresolved(ctx, m, line, name);
                        None
                    }
                }
            } else {
                Some(DefVal::enum_label(name.clone()))
            }
        }
        DefValExpr::Bits(labels) => Some(DefVal::bits(labels.clone())),
        DefValExpr::Oid(components) => convert_oid_defval(ctx, m, line, components),
    }
}

fn defval_unresolved(ctx: &mut ResolverContext, m: ModuleId, line: u32, name: &str) {
    ctx.emit_code_at(
        Code::DefvalUnresolved,
        Severity::Warning,
        m,
        line,
        format!("cannot resolve DEFVAL reference {name:?}"),
    );
}

/// Resolves `{ name arc arc … }` / `{ arc arc … }` OID default values: the
/// first named component anchors the OID, trailing numeric and
/// named-number components append arcs.
fn convert_oid_defval(
    ctx: &mut ResolverContext,
    m: ModuleId,
    line: u32,
    components: &[OidComponent],
) -> Option<DefVal> {
    let raw = render_oid_components(components);
    let mut iter = components.iter();
    let mut arcs: Vec<u32> = match iter.next() {
        None => Vec::new(),
        Some(OidComponent::Number(n)) => vec![*n],
        Some(OidComponent::Name(name))
        | Some(OidComponent::NamedNumber { name, .. }) => {
            match lookup_node_for_module(ctx, m, name) {
                Some(node) => ctx.tree.oid(node).arcs().to_vec(),
                None => {
                    defval_unresolved(ctx, m, line, name);
                    return None;
                }
            }
        }
        Some(OidComponent::Qualified { module, name }) => {
            let node = ctx
                .module_index
                .get(module)
                .and_then(|ids| ids.first())
                .and_then(|t| ctx.symbols[t.index()].get(name).copied());
            match node {
                Some(node) => ctx.tree.oid(node).arcs().to_vec(),
                None => {
                    defval_unresolved(ctx, m, line, name);
                    return None;
                }
            }
        }
    };
    for comp in iter {
        match comp {
            OidComponent::Number(n) => arcs.push(*n),
            OidComponent::NamedNumber { number, .. } => arcs.push(*number),
            OidComponent::Name(name) | OidComponent::Qualified { name, .. } => {
                defval_unresolved(ctx, m, line, name);
                return None;
            }
        }
    }
    Some(DefVal { value: DefValValue::Oid(Oid::new(arcs)), raw })
}

fn render_oid_components(components: &[OidComponent]) -> String {
    let parts: Vec<String> = components
        .iter()
        .map(|c| match c {
            OidComponent::Number(n) => n.to_string(),
            OidComponent::Name(name) => name.clone(),
            OidComponent::NamedNumber { name, number } => format!("{name}({number})"),
            OidComponent::Qualified { module, name } => format!("{module}.{name}"),
        })
        .collect();
    format!("{{ {} }}", parts.join(" "))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::diag::DiagnosticConfig;
    use crate::ir::{Definition, GroupDef, Range};
    use crate::test_helpers::{
        augmenting_row, foo_table_module, notification, oid_under, run_pipeline, scalar,
        smiv2_module, value_assignment,
    };

    fn object_named(ctx: &ResolverContext, name: &str) -> ObjectId {
        let node = ctx
            .module_ids()
            .find_map(|m| ctx.symbols[m.index()].get(name).copied())
            .expect("symbol");
        ctx.tree.node(node).object.expect("object")
    }

    #[test]
    fn kind_inference_classifies_the_table_family() {
        let ctx = run_pipeline(vec![foo_table_module()], DiagnosticConfig::default());
        assert_eq!(ctx.objects[object_named(&ctx, "fooTable").index()].kind, NodeKind::Table);
        assert_eq!(ctx.objects[object_named(&ctx, "fooEntry").index()].kind, NodeKind::Row);
        assert_eq!(ctx.objects[object_named(&ctx, "fooIndex").index()].kind, NodeKind::Column);
        assert_eq!(ctx.objects[object_named(&ctx, "fooDescr").index()].kind, NodeKind::Column);
    }

    #[test]
    fn index_entries_link_to_their_objects() {
        let ctx = run_pipeline(vec![foo_table_module()], DiagnosticConfig::default());
        let entry = object_named(&ctx, "fooEntry");
        let index = object_named(&ctx, "fooIndex");
        assert_eq!(ctx.objects[entry.index()].indexes.len(), 1);
        assert_eq!(ctx.objects[entry.index()].indexes[0].object, Some(index));
    }

    #[test]
    fn augments_links_to_the_base_row() {
        let mut m = foo_table_module();
        m.definitions.push(Definition::ObjectType(crate::test_helpers::table(
            "fooXTable",
            "FooXEntry",
            "fooBase",
            2,
        )));
        m.definitions.push(Definition::TypeDef(crate::ir::TypeDef {
            name: "FooXEntry".to_owned(),
            line: 0,
            syntax: SyntaxExpr::Sequence,
            display_hint: None,
            status: crate::ir::Status::Current,
            description: None,
            reference: None,
            is_textual_convention: false,
        }));
        m.definitions.push(Definition::ObjectType(augmenting_row(
            "fooXEntry",
            "FooXEntry",
            "fooEntry",
            "fooXTable",
            1,
        )));
        let ctx = run_pipeline(vec![m], DiagnosticConfig::default());
        let x_entry = object_named(&ctx, "fooXEntry");
        let entry = object_named(&ctx, "fooEntry");
        assert_eq!(ctx.objects[x_entry.index()].augments, Some(entry));
        assert!(ctx.objects[x_entry.index()].indexes.is_empty());
    }

    #[test]
    fn bare_type_index_items_are_accepted_but_not_oid() {
        let mut m = foo_table_module();
        // A second table indexed by bare INTEGER and BITS plus a bare
        // OBJECT IDENTIFIER; only the last is diagnosed.
        m.definitions.push(Definition::ObjectType(crate::test_helpers::table(
            "barTable",
            "BarEntry",
            "fooBase",
            3,
        )));
        m.definitions.push(Definition::TypeDef(crate::ir::TypeDef {
            name: "BarEntry".to_owned(),
            line: 0,
            syntax: SyntaxExpr::Sequence,
            display_hint: None,
            status: crate::ir::Status::Current,
            description: None,
            reference: None,
            is_textual_convention: false,
        }));
        m.definitions.push(Definition::ObjectType(crate::test_helpers::row(
            "barEntry",
            "BarEntry",
            &["INTEGER", "BITS", "OBJECT IDENTIFIER"],
            "barTable",
            1,
        )));
        let ctx = run_pipeline(vec![m], DiagnosticConfig::default());
        let unresolved_indexes =
            ctx.diagnostics.iter().filter(|d| d.code == Code::IndexUnresolved).count();
        assert_eq!(unresolved_indexes, 1);
        assert!(ctx.unresolved.iter().any(|u| u.symbol == "OBJECT IDENTIFIER"));
    }

    #[test]
    fn effective_constraints_flatten_from_the_type_chain() {
        let mut m = smiv2_module("EFF-MIB", &["enterprises", "OBJECT-TYPE"]);
        m.imports.push(crate::ir::ImportClause {
            symbols: vec!["DisplayString".to_owned()],
            from: "SNMPv2-TC".to_owned(),
            line: 2,
        });
        m.definitions.push(value_assignment("effBase", "enterprises", 9998));
        // Inherits SIZE (0..255) and the display hint from DisplayString.
        m.definitions.push(Definition::ObjectType(scalar(
            "effName",
            SyntaxExpr::reference("DisplayString"),
            "effBase",
            1,
        )));
        // Inline SIZE wins over the chain.
        m.definitions.push(Definition::ObjectType(scalar(
            "effShort",
            SyntaxExpr::sized("DisplayString", vec![Range::new(0, 31)]),
            "effBase",
            2,
        )));
        let ctx = run_pipeline(vec![m], DiagnosticConfig::default());
        let name = object_named(&ctx, "effName");
        assert_eq!(ctx.objects[name.index()].sizes, vec![Range::new(0, 255)]);
        assert_eq!(ctx.objects[name.index()].display_hint.as_deref(), Some("255a"));
        let short = object_named(&ctx, "effShort");
        assert_eq!(ctx.objects[short.index()].sizes, vec![Range::new(0, 31)]);
        assert_eq!(ctx.objects[short.index()].display_hint.as_deref(), Some("255a"));
    }

    #[test]
    fn notification_objects_resolve_with_diagnostics() {
        let mut m = foo_table_module();
        m.definitions.push(value_assignment("fooEvents", "fooBase", 9));
        m.definitions.push(notification(
            "fooChanged",
            &["fooDescr", "fooBase", "noSuchThing"],
            "fooEvents",
            1,
        ));
        let ctx = run_pipeline(vec![m], DiagnosticConfig::default());
        let n = &ctx.notifications[0];
        assert_eq!(n.name, "fooChanged");
        assert_eq!(n.objects.len(), 3);
        assert!(n.objects[0].object.is_some());
        // fooBase names a node with no object behind it.
        assert!(n.objects[1].object.is_none());
        assert!(
            ctx.diagnostics.iter().any(|d| d.code == Code::NotificationObjectNotObject)
        );
        assert!(ctx.diagnostics.iter().any(|d| d.code == Code::ObjectsUnresolved));
        assert!(ctx.unresolved.iter().any(|u| {
            u.kind == UnresolvedKind::NotificationObject && u.symbol == "noSuchThing"
        }));
    }

    #[test]
    fn not_accessible_group_members_are_flagged() {
        let mut m = foo_table_module();
        m.definitions.push(Definition::ObjectGroup(GroupDef {
            name: "fooGroup".to_owned(),
            line: 0,
            members: vec!["fooIndex".to_owned(), "fooDescr".to_owned()],
            status: crate::ir::Status::Current,
            description: None,
            reference: None,
            oid: oid_under("fooBase", 10),
        }));
        let ctx = run_pipeline(vec![m], DiagnosticConfig::default());
        // fooIndex is not-accessible; fooDescr is read-only.
        let flagged =
            ctx.diagnostics.iter().filter(|d| d.code == Code::GroupNotAccessible).count();
        assert_eq!(flagged, 1);
        assert_eq!(ctx.groups.len(), 1);
        assert!(ctx.groups[0].members.iter().all(|member| member.node.is_some()));
    }

    #[test]
    fn defval_hex_and_enum_conversion() {
        let mut m = foo_table_module();
        let mut with_hex = scalar(
            "fooMac",
            SyntaxExpr::sized("OCTET STRING", vec![Range::point(6)]),
            "fooBase",
            20,
        );
        with_hex.defval = Some(DefValExpr::Hex {
            digits: "00005E005301".to_owned(),
            raw: "'00005E005301'H".to_owned(),
        });
        m.definitions.push(Definition::ObjectType(with_hex));

        let mut with_bad_hex = scalar(
            "fooBadHex",
            SyntaxExpr::reference("OCTET STRING"),
            "fooBase",
            21,
        );
        with_bad_hex.defval =
            Some(DefValExpr::Hex { digits: "XYZ".to_owned(), raw: "'XYZ'H".to_owned() });
        m.definitions.push(Definition::ObjectType(with_bad_hex));

        let mut with_enum = scalar(
            "fooState",
            SyntaxExpr::Enumerated {
                items: vec![
                    crate::ir::NamedValue::new("up", 1),
                    crate::ir::NamedValue::new("down", 2),
                ],
            },
            "fooBase",
            22,
        );
        with_enum.defval = Some(DefValExpr::Name("up".to_owned()));
        m.definitions.push(Definition::ObjectType(with_enum));

        let ctx = run_pipeline(vec![m], DiagnosticConfig::default());

        let mac = object_named(&ctx, "fooMac");
        let defval = ctx.objects[mac.index()].defval.as_ref().expect("defval");
        assert_eq!(defval.value, DefValValue::Bytes(vec![0x00, 0x00, 0x5E, 0x00, 0x53, 0x01]));
        assert_eq!(defval.raw, "'00005E005301'H");

        let bad = object_named(&ctx, "fooBadHex");
        assert!(ctx.objects[bad.index()].defval.is_none());
        assert!(ctx.diagnostics.iter().any(|d| d.code == Code::MalformedHexDefval));

        let state = object_named(&ctx, "fooState");
        let defval = ctx.objects[state.index()].defval.as_ref().expect("defval");
        assert_eq!(defval.value, DefValValue::Enum("up".to_owned()));
    }

    #[test]
    fn defval_oid_name_resolves_for_oid_typed_syntax() {
        let mut m = foo_table_module();
        let mut pointer = scalar(
            "fooPointer",
            SyntaxExpr::reference("OBJECT IDENTIFIER"),
            "fooBase",
            30,
        );
        pointer.defval = Some(DefValExpr::Name("fooBase".to_owned()));
        m.definitions.push(Definition::ObjectType(pointer));

        let mut dangling = scalar(
            "fooDangling",
            SyntaxExpr::reference("OBJECT IDENTIFIER"),
            "fooBase",
            31,
        );
        dangling.defval = Some(DefValExpr::Name("noSuchNode".to_owned()));
        m.definitions.push(Definition::ObjectType(dangling));

        let ctx = run_pipeline(vec![m], DiagnosticConfig::default());

        let pointer = object_named(&ctx, "fooPointer");
        let defval = ctx.objects[pointer.index()].defval.as_ref().expect("defval");
        match &defval.value {
            DefValValue::Oid(oid) => assert_eq!(oid.to_string(), "1.3.6.1.4.1.9999"),
            DefValValue::Int(_)
            | DefValValue::Uint(_)
            | DefValValue::Text(_)
            | DefValValue::Bytes(_)
            | DefValValue::Enum(_)
            | DefValValue::Bits(_) => unreachable!("expected an OID defval"),
        }

        let dangling = object_named(&ctx, "fooDangling");
        assert!(ctx.objects[dangling.index()].defval.is_none());
        assert!(ctx.diagnostics.iter().any(|d| d.code == Code::DefvalUnresolved));
    }

    #[test]
    fn defval_oid_components_append_trailing_arcs() {
        let mut m = foo_table_module();
        let mut pointer = scalar(
            "fooRef",
            SyntaxExpr::reference("OBJECT IDENTIFIER"),
            "fooBase",
            32,
        );
        pointer.defval = Some(DefValExpr::Oid(vec![
            OidComponent::Name("fooBase".to_owned()),
            OidComponent::Number(1),
            OidComponent::NamedNumber { name: "x".to_owned(), number: 5 },
        ]));
        m.definitions.push(Definition::ObjectType(pointer));
        let ctx = run_pipeline(vec![m], DiagnosticConfig::default());
        let obj = object_named(&ctx, "fooRef");
        let defval = ctx.objects[obj.index()].defval.as_ref().expect("defval");
        match &defval.value {
            DefValValue::Oid(oid) => assert_eq!(oid.to_string(), "1.3.6.1.4.1.9999.1.5"),
            DefValValue::Int(_)
            | DefValValue::Uint(_)
            | DefValValue::Text(_)
            | DefValValue::Bytes(_)
            | DefValValue::Enum(_)
            | DefValValue::Bits(_) => unreachable!("expected an OID defval"),
        }
        assert_eq!(defval.raw, "{ fooBase 1 x(5) }");
    }
}
