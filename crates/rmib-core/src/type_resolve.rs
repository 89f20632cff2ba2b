//! Phase F: type catalog creation and parent-chain resolution.
//!
//! Runs in six steps: seed the ASN.1 primitives on `SNMPv2-SMI`, create
//! user types from every `TypeDef`, link parent chains through a dependency
//! graph (cycles reported as `type-unknown`), anchor primitive-shaped
//! syntaxes to the seeded primitives, relink the RFC1213 copies of
//! `DisplayString`/`PhysAddress` onto the canonical SNMPv2-TC conventions,
//! and inherit base tags up the chain.
use std::collections::HashSet;

use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;

use crate::base;
use crate::context::ResolverContext;
use crate::diag::{Code, Severity, UnresolvedKind};
use crate::imports::lookup_type_for_module;
use crate::ir::{Definition, NamedValue, Range, Status, SyntaxExpr, TypeDef};
use crate::module::ModuleId;
use crate::types::{self, BaseType, Type, TypeId};

// ---------------------------------------------------------------------------
// Syntax decomposition
// ---------------------------------------------------------------------------

/// What a syntax expression contributes to a new type: its initial base,
/// its direct constraints, and the name of the type it refines (if any).
pub(crate) struct SyntaxParts {
    pub base: BaseType,
    pub sizes: Vec<Range>,
    pub ranges: Vec<Range>,
    pub enums: Vec<NamedValue>,
    pub bits: Vec<NamedValue>,
    /// `(qualifier, name)` of the referenced type; `None` for enumerations,
    /// bits constructs and sequence syntaxes.
    pub parent_ref: Option<(Option<String>, String)>,
}

fn base_for_primitive(name: &str) -> Option<BaseType> {
    match name {
        "INTEGER" => Some(BaseType::Integer),
        "OCTET STRING" => Some(BaseType::OctetString),
        "OBJECT IDENTIFIER" => Some(BaseType::ObjectIdentifier),
        "BITS" => Some(BaseType::Bits),
        _ => None,
    }
}

/// Flattens a syntax expression. Constraint wrappers accumulate; the
/// innermost reference decides the base and the parent.
pub(crate) fn decompose_syntax(syntax: &SyntaxExpr) -> SyntaxParts {
    match syntax {
        SyntaxExpr::Ref { module, name } => SyntaxParts {
            base: base_for_primitive(name).unwrap_or(BaseType::Unknown),
            sizes: Vec::new(),
            ranges: Vec::new(),
            enums: Vec::new(),
            bits: Vec::new(),
            parent_ref: Some((module.clone(), name.clone())),
        },
        SyntaxExpr::Constrained { base, sizes, ranges } => {
            let mut parts = decompose_syntax(base);
            parts.sizes.extend(sizes.iter().copied());
            parts.ranges.extend(ranges.iter().copied());
            parts
        }
        SyntaxExpr::Enumerated { items } => SyntaxParts {
            base: BaseType::Integer,
            sizes: Vec::new(),
            ranges: Vec::new(),
            enums: items.clone(),
            bits: Vec::new(),
            parent_ref: None,
        },
        SyntaxExpr::Bits { items } => SyntaxParts {
            base: BaseType::Bits,
            sizes: Vec::new(),
            ranges: Vec::new(),
            enums: Vec::new(),
            bits: items.clone(),
            parent_ref: None,
        },
        SyntaxExpr::SequenceOf { .. } => SyntaxParts {
            base: BaseType::SequenceOf,
            sizes: Vec::new(),
            ranges: Vec::new(),
            enums: Vec::new(),
            bits: Vec::new(),
            parent_ref: None,
        },
        SyntaxExpr::Sequence => SyntaxParts {
            base: BaseType::Sequence,
            sizes: Vec::new(),
            ranges: Vec::new(),
            enums: Vec::new(),
            bits: Vec::new(),
            parent_ref: None,
        },
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub(crate) fn run(ctx: &mut ResolverContext) {
    let seeds = seed_primitives(ctx);
    let parent_refs = create_user_types(ctx);
    link_parents(ctx, &parent_refs);
    anchor_primitives(ctx, &seeds);
    relink_rfc1213(ctx);
    inherit_bases(ctx);

    ctx.debug(&format!("type resolution: {} types", ctx.types.len()));
}

/// The four seeded primitives, in [`base::PRIMITIVE_TYPE_NAMES`] order.
struct Seeds {
    integer: TypeId,
    octet_string: TypeId,
    object_identifier: TypeId,
    bits: TypeId,
    all: HashSet<TypeId>,
}

fn add_type(ctx: &mut ResolverContext, m: ModuleId, t: Type) -> TypeId {
    let id = TypeId(ctx.types.len() as u32);
    let name = t.name.clone();
    ctx.types.push(t);
    ctx.modules[m.index()].types.push(id);
    ctx.modules[m.index()].type_names.entry(name.clone()).or_insert(id);
    ctx.type_symbols[m.index()].entry(name).or_insert(id);
    id
}

fn seed_primitives(ctx: &mut ResolverContext) -> Seeds {
    let m = ctx.base.snmpv2_smi;
    let mut seeded = Vec::with_capacity(4);
    for name in base::PRIMITIVE_TYPE_NAMES {
        let base = base_for_primitive(name).unwrap_or(BaseType::Unknown);
        let id = add_type(
            ctx,
            m,
            Type {
                name: name.to_owned(),
                module: m,
                base,
                parent: None,
                is_textual_convention: false,
                display_hint: None,
                status: Status::Current,
                description: None,
                reference: None,
                sizes: Vec::new(),
                ranges: Vec::new(),
                enums: Vec::new(),
                bits: Vec::new(),
            },
        );
        seeded.push(id);
    }
    Seeds {
        integer: seeded[0],
        octet_string: seeded[1],
        object_identifier: seeded[2],
        bits: seeded[3],
        all: seeded.into_iter().collect(),
    }
}

/// Creates one [`Type`] per `TypeDef`, returning the parent references
/// aligned with the arena (seeds get `None`).
fn create_user_types(ctx: &mut ResolverContext) -> Vec<Option<(Option<String>, String)>> {
    let mut parent_refs: Vec<Option<(Option<String>, String)>> = vec![None; ctx.types.len()];

    for m in ctx.module_ids().collect::<Vec<_>>() {
        if ctx.is_cancelled() {
            break;
        }
        let defs: Vec<TypeDef> = ctx.sources[m.index()]
            .definitions
            .iter()
            .filter_map(|d| match d {
                Definition::TypeDef(t) => Some(t.clone()),
                Definition::ObjectType(_)
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
        let module_name = ctx.modules[m.index()].name.clone();
        let is_base = ctx.modules[m.index()].is_base;

        for def in defs {
            let parts = decompose_syntax(&def.syntax);
            // Application types read as plain refinements; their tag comes
            // from the table.
            let initial = if is_base {
                base::application_base(&module_name, &def.name).unwrap_or(parts.base)
            } else {
                parts.base
            };
            add_type(
                ctx,
                m,
                Type {
                    name: def.name.clone(),
                    module: m,
                    base: initial,
                    parent: None,
                    is_textual_convention: def.is_textual_convention,
                    display_hint: def.display_hint.clone(),
                    status: def.status,
                    description: def.description.clone(),
                    reference: def.reference.clone(),
                    sizes: parts.sizes,
                    ranges: parts.ranges,
                    enums: parts.enums,
                    bits: parts.bits,
                },
            );
            parent_refs.push(parts.parent_ref);
        }
    }
    parent_refs
}

/// Resolves every parent reference, orders the links topologically, and
/// reports cycles and dead references as `type-unknown`.
fn link_parents(ctx: &mut ResolverContext, parent_refs: &[Option<(Option<String>, String)>]) {
    // Resolve targets first; the full catalog exists at this point.
    let mut targets: Vec<Option<TypeId>> = vec![None; ctx.types.len()];
    let mut dead: Vec<(TypeId, String)> = Vec::new();

    for (index, parent_ref) in parent_refs.iter().enumerate() {
        let Some((qualifier, name)) = parent_ref else { continue };
        let tid = TypeId(index as u32);
        let m = ctx.types[tid.index()].module;
        let target = match qualifier {
            Some(q) => ctx
                .module_index
                .get(q)
                .and_then(|ids| ids.first())
                .and_then(|t| ctx.type_symbols[t.index()].get(name).copied()),
            None => lookup_type_for_module(ctx, m, name),
        };
        match target {
            Some(t) => targets[index] = Some(t),
            None => dead.push((tid, name.clone())),
        }
    }

    for (tid, name) in dead {
        let m = ctx.types[tid.index()].module;
        ctx.emit_code_at(
            Code::TypeUnknown,
            Severity::Error,
            m,
            0,
            format!("{}: unknown base type {name:?}", ctx.types[tid.index()].name),
        );
        ctx.record_unresolved(UnresolvedKind::Type, m, &name);
    }

    // Dependency graph, parent -> child.
    let mut graph = DiGraph::<u32, ()>::with_capacity(ctx.types.len(), ctx.types.len());
    let nodes: Vec<_> = (0..ctx.types.len()).map(|i| graph.add_node(i as u32)).collect();
    for (index, target) in targets.iter().enumerate() {
        if let Some(t) = target {
            graph.add_edge(nodes[t.index()], nodes[index], ());
        }
    }

    // Cyclic members keep a `None` parent and are reported; everyone else
    // links. tarjan_scc emits components in reverse topological order, so
    // walking it backwards links parents before children.
    let mut cyclic = vec![false; ctx.types.len()];
    let sccs = tarjan_scc(&graph);
    for scc in &sccs {
        if scc.len() > 1 || (scc.len() == 1 && graph.contains_edge(scc[0], scc[0])) {
            for &n in scc {
                cyclic[graph[n] as usize] = true;
            }
        }
    }
    for scc in sccs.iter().rev() {
        for &n in scc {
            let index = graph[n] as usize;
            if cyclic[index] {
                continue;
            }
            if let Some(target) = targets[index] {
                ctx.types[index].parent = Some(target);
            }
        }
    }

    let cyclic_ids: Vec<TypeId> = (0..ctx.types.len() as u32)
        .map(TypeId)
        .filter(|t| cyclic[t.index()])
        .collect();
    for tid in cyclic_ids {
        let m = ctx.types[tid.index()].module;
        let name = ctx.types[tid.index()].name.clone();
        ctx.emit_code_at(
            Code::TypeUnknown,
            Severity::Error,
            m,
            0,
            format!("{name}: cyclic type derivation"),
        );
        ctx.record_unresolved(UnresolvedKind::Type, m, &name);
    }
}

/// Points enum, bits and direct-primitive syntaxes at the seeded
/// primitives when linking left them parentless.
fn anchor_primitives(ctx: &mut ResolverContext, seeds: &Seeds) {
    for index in 0..ctx.types.len() {
        let tid = TypeId(index as u32);
        if seeds.all.contains(&tid) || ctx.types[index].parent.is_some() {
            continue;
        }
        let t = &ctx.types[index];
        let anchor = match t.base {
            BaseType::Integer if !t.enums.is_empty() => Some(seeds.integer),
            BaseType::Bits => Some(seeds.bits),
            BaseType::OctetString => Some(seeds.octet_string),
            BaseType::ObjectIdentifier => Some(seeds.object_identifier),
            BaseType::Unknown
            | BaseType::Integer
            | BaseType::Counter32
            | BaseType::Counter64
            | BaseType::Gauge32
            | BaseType::Unsigned32
            | BaseType::TimeTicks
            | BaseType::IpAddress
            | BaseType::Opaque
            | BaseType::Sequence
            | BaseType::SequenceOf => None,
        };
        if let Some(parent) = anchor {
            ctx.types[index].parent = Some(parent);
        }
    }
}

/// The modern SNMPv2-TC conventions are canonical: the RFC1213 copies of
/// `DisplayString` and `PhysAddress` re-parent onto them.
fn relink_rfc1213(ctx: &mut ResolverContext) {
    let Some(&rfc1213) = ctx.module_index.get("RFC1213-MIB").and_then(|ids| ids.first()) else {
        return;
    };
    let tc = ctx.base.snmpv2_tc;
    for name in ["DisplayString", "PhysAddress"] {
        let old = ctx.type_symbols[rfc1213.index()].get(name).copied();
        let new = ctx.type_symbols[tc.index()].get(name).copied();
        if let (Some(old), Some(new)) = (old, new) {
            if old != new {
                ctx.types[old.index()].parent = Some(new);
            }
        }
    }
}

/// Fills `Unknown` bases from the parent chain, stopping at application
/// base types.
fn inherit_bases(ctx: &mut ResolverContext) {
    for index in 0..ctx.types.len() {
        if ctx.types[index].base != BaseType::Unknown {
            continue;
        }
        let Some(parent) = ctx.types[index].parent else { continue };
        let inherited = types::effective_base(&ctx.types, parent);
        if inherited != BaseType::Unknown {
            ctx.types[index].base = inherited;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::diag::DiagnosticConfig;
    use crate::imports;
    use crate::ir::{ImportClause, Language, SourceModule};
    use crate::registrar;

    fn resolve(user: Vec<SourceModule>, config: DiagnosticConfig) -> ResolverContext {
        let mut ctx = ResolverContext::new(config, None);
        registrar::register(&mut ctx, user);
        imports::bind(&mut ctx);
        run(&mut ctx);
        ctx
    }

    fn type_named(ctx: &ResolverContext, module: &str, name: &str) -> TypeId {
        let m = *ctx.module_index.get(module).and_then(|v| v.first()).expect("module");
        *ctx.type_symbols[m.index()].get(name).expect("type")
    }

    fn user_type(name: &str, syntax: SyntaxExpr) -> Definition {
        Definition::TypeDef(TypeDef {
            name: name.to_owned(),
            line: 0,
            syntax,
            display_hint: None,
            status: Status::Current,
            description: None,
            reference: None,
            is_textual_convention: false,
        })
    }

    #[test]
    fn primitives_are_seeded_on_snmpv2_smi() {
        let ctx = resolve(Vec::new(), DiagnosticConfig::default());
        for name in base::PRIMITIVE_TYPE_NAMES {
            let tid = type_named(&ctx, "SNMPv2-SMI", name);
            assert!(ctx.types[tid.index()].parent.is_none(), "{name} is a root");
        }
    }

    #[test]
    fn application_types_carry_their_tags() {
        let ctx = resolve(Vec::new(), DiagnosticConfig::default());
        let counter64 = type_named(&ctx, "SNMPv2-SMI", "Counter64");
        assert_eq!(ctx.types[counter64.index()].base, BaseType::Counter64);
        let counter = type_named(&ctx, "RFC1155-SMI", "Counter");
        assert_eq!(ctx.types[counter.index()].base, BaseType::Counter32);
        // And they anchor on the INTEGER primitive.
        let integer = type_named(&ctx, "SNMPv2-SMI", "INTEGER");
        assert_eq!(ctx.types[counter64.index()].parent, Some(integer));
    }

    #[test]
    fn standard_tcs_resolve_their_chains() {
        let ctx = resolve(Vec::new(), DiagnosticConfig::strict());
        let stamp = type_named(&ctx, "SNMPv2-TC", "TimeStamp");
        // TimeStamp -> TimeTicks (imported from SNMPv2-SMI), an application
        // boundary.
        assert_eq!(types::effective_base(&ctx.types, stamp), BaseType::TimeTicks);
        let truth = type_named(&ctx, "SNMPv2-TC", "TruthValue");
        assert_eq!(ctx.types[truth.index()].base, BaseType::Integer);
        assert_eq!(ctx.types[truth.index()].enums.len(), 2);
        let display = type_named(&ctx, "SNMPv2-TC", "DisplayString");
        assert_eq!(types::effective_base(&ctx.types, display), BaseType::OctetString);
        assert_eq!(
            types::effective_display_hint(&ctx.types, display),
            Some("255a")
        );
    }

    #[test]
    fn rfc1213_display_string_relinks_onto_the_tc() {
        let ctx = resolve(Vec::new(), DiagnosticConfig::default());
        let old = type_named(&ctx, "RFC1213-MIB", "DisplayString");
        let new = type_named(&ctx, "SNMPv2-TC", "DisplayString");
        assert_eq!(ctx.types[old.index()].parent, Some(new));
    }

    #[test]
    fn user_refinement_inherits_through_the_chain() {
        let mut m = SourceModule::new("U-MIB", Language::Smiv2);
        m.imports.push(ImportClause {
            symbols: vec!["Counter32".to_owned()],
            from: "SNMPv2-SMI".to_owned(),
            line: 1,
        });
        m.definitions.push(user_type(
            "SmallCounter",
            SyntaxExpr::ranged("Counter32", vec![Range::new(0, 999)]),
        ));
        let ctx = resolve(vec![m], DiagnosticConfig::default());
        let t = type_named(&ctx, "U-MIB", "SmallCounter");
        assert_eq!(ctx.types[t.index()].base, BaseType::Counter32);
        assert_eq!(ctx.types[t.index()].ranges, vec![Range::new(0, 999)]);
    }

    #[test]
    fn unknown_parent_is_reported_in_strict_mode() {
        let mut m = SourceModule::new("U-MIB", Language::Smiv2);
        m.definitions.push(user_type("Mystery", SyntaxExpr::reference("NoSuchType")));
        let ctx = resolve(vec![m], DiagnosticConfig::strict());
        assert!(ctx.diagnostics.iter().any(|d| d.code == Code::TypeUnknown));
        let t = type_named(&ctx, "U-MIB", "Mystery");
        assert_eq!(ctx.types[t.index()].base, BaseType::Unknown);
    }

    #[test]
    fn tc_fallback_resolves_in_permissive_mode() {
        let mut m = SourceModule::new("U-MIB", Language::Smiv2);
        m.definitions.push(user_type(
            "Label",
            SyntaxExpr::sized("DisplayString", vec![Range::new(0, 32)]),
        ));
        let ctx = resolve(vec![m], DiagnosticConfig::permissive());
        assert!(!ctx.diagnostics.iter().any(|d| d.code == Code::TypeUnknown));
        let t = type_named(&ctx, "U-MIB", "Label");
        assert_eq!(types::effective_base(&ctx.types, t), BaseType::OctetString);
        assert_eq!(types::effective_sizes(&ctx.types, t), &[Range::new(0, 32)]);
    }

    #[test]
    fn type_cycles_are_broken_and_reported() {
        let mut m = SourceModule::new("CYC-MIB", Language::Smiv2);
        m.definitions.push(user_type("A", SyntaxExpr::reference("B")));
        m.definitions.push(user_type("B", SyntaxExpr::reference("A")));
        let ctx = resolve(vec![m], DiagnosticConfig::default());
        let cycle_reports =
            ctx.diagnostics.iter().filter(|d| d.code == Code::TypeUnknown).count();
        assert_eq!(cycle_reports, 2);
        let a = type_named(&ctx, "CYC-MIB", "A");
        assert!(ctx.types[a.index()].parent.is_none());
    }

    #[test]
    fn enum_types_anchor_on_integer() {
        let mut m = SourceModule::new("E-MIB", Language::Smiv2);
        m.definitions.push(user_type(
            "Switch",
            SyntaxExpr::Enumerated {
                items: vec![NamedValue::new("on", 1), NamedValue::new("off", 2)],
            },
        ));
        let ctx = resolve(vec![m], DiagnosticConfig::default());
        let t = type_named(&ctx, "E-MIB", "Switch");
        let integer = type_named(&ctx, "SNMPv2-SMI", "INTEGER");
        assert_eq!(ctx.types[t.index()].parent, Some(integer));
    }
}
