//! Phase D: import binding, plus the module-scoped lookup helpers used by
//! every later phase.
//!
//! Binding records, for every `(symbol, from-module)` pair of every module,
//! which registered module provides the symbol. Lookups consult the
//! module's own symbols first, then its bound imports, and then — only when
//! the diagnostic config allows it — a chain of fallbacks. Each fallback
//! hit produces a trace log entry, never a diagnostic: the caller opted
//! into permissive mode.
use crate::base;
use crate::context::ResolverContext;
use crate::diag::{Code, Severity, UnresolvedKind};
use crate::module::ModuleId;
use crate::tree::NodeId;
use crate::types::TypeId;

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// Binds every import clause of every registered module.
///
/// Base modules are bound too, but silently: their imports are synthesized
/// and a failure there would be a bug, not a user problem.
pub(crate) fn bind(ctx: &mut ResolverContext) {
    for m in ctx.module_ids().collect::<Vec<_>>() {
        if ctx.is_cancelled() {
            return;
        }
        let clauses = ctx.sources[m.index()].imports.clone();
        let is_base = ctx.modules[m.index()].is_base;

        for clause in clauses {
            let Some(&target) = ctx
                .module_index
                .get(&clause.from)
                .and_then(|ids| ids.first())
            else {
                if !is_base {
                    ctx.emit_code_at(
                        Code::ImportModuleNotFound,
                        Severity::Error,
                        m,
                        clause.line,
                        format!("cannot find module {:?}", clause.from),
                    );
                    ctx.record_unresolved(UnresolvedKind::Import, m, &clause.from);
                }
                continue;
            };

            for symbol in clause.symbols {
                if !ctx.def_names[target.index()].contains(&symbol) {
                    if !is_base {
                        ctx.emit_code_at(
                            Code::ImportNotFound,
                            Severity::Error,
                            m,
                            clause.line,
                            format!("{:?} does not define {symbol:?}", clause.from),
                        );
                        ctx.record_unresolved(UnresolvedKind::Import, m, &symbol);
                    }
                    continue;
                }
                // Last write wins within a module.
                ctx.imports[m.index()].insert(symbol, target);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Resolves a symbol to the tree node registered for it, as seen from
/// module `m`: own symbols, then imports, then (permissive only) a global
/// scan across all modules in registration order.
pub(crate) fn lookup_node_for_module(
    ctx: &ResolverContext,
    m: ModuleId,
    name: &str,
) -> Option<NodeId> {
    if let Some(&node) = ctx.symbols[m.index()].get(name) {
        return Some(node);
    }
    if let Some(&target) = ctx.imports[m.index()].get(name) {
        if let Some(&node) = ctx.symbols[target.index()].get(name) {
            return Some(node);
        }
    }
    if ctx.config.allow_best_guess_fallbacks() {
        for other in ctx.module_ids() {
            if let Some(&node) = ctx.symbols[other.index()].get(name) {
                ctx.trace(&format!(
                    "node fallback: {name:?} for {} found in {}",
                    ctx.modules[m.index()].name,
                    ctx.modules[other.index()].name
                ));
                return Some(node);
            }
        }
    }
    None
}

/// Resolves a type name as seen from module `m`.
///
/// The chain: own types, bound imports, the ASN.1 primitives (always —
/// that much is RFC-compliant), then in permissive mode the SMIv2
/// application types on `SNMPv2-SMI`, the SMIv1 application types on
/// `RFC1155-SMI`, the standard textual conventions on `SNMPv2-TC`, and
/// finally a global scan in registration order.
pub(crate) fn lookup_type_for_module(
    ctx: &ResolverContext,
    m: ModuleId,
    name: &str,
) -> Option<TypeId> {
    if let Some(&t) = ctx.type_symbols[m.index()].get(name) {
        return Some(t);
    }
    if let Some(&target) = ctx.imports[m.index()].get(name) {
        if let Some(&t) = ctx.type_symbols[target.index()].get(name) {
            return Some(t);
        }
    }
    if base::PRIMITIVE_TYPE_NAMES.contains(&name) {
        return ctx.type_symbols[ctx.base.snmpv2_smi.index()].get(name).copied();
    }
    if !ctx.config.allow_best_guess_fallbacks() {
        return None;
    }
    let fallback = if base::SMIV2_TYPE_FALLBACK.contains(&name) {
        Some(ctx.base.snmpv2_smi)
    } else if base::RFC1155_TYPE_FALLBACK.contains(&name) {
        Some(ctx.base.rfc1155_smi)
    } else if base::SNMPV2_TC_FALLBACK.contains(&name) {
        Some(ctx.base.snmpv2_tc)
    } else {
        None
    };
    if let Some(target) = fallback {
        if let Some(&t) = ctx.type_symbols[target.index()].get(name) {
            ctx.trace(&format!(
                "type fallback: {name:?} for {} resolved to {}",
                ctx.modules[m.index()].name,
                ctx.modules[target.index()].name
            ));
            return Some(t);
        }
    }
    for other in ctx.module_ids() {
        if let Some(&t) = ctx.type_symbols[other.index()].get(name) {
            ctx.trace(&format!(
                "type fallback: {name:?} for {} found by global scan in {}",
                ctx.modules[m.index()].name,
                ctx.modules[other.index()].name
            ));
            return Some(t);
        }
    }
    None
}

/// Determines which module will register the OID-bearing symbol `name` as
/// seen from module `m`. Used by the OID resolver to build its dependency
/// graph before any node exists.
pub(crate) fn resolve_oid_symbol_module(
    ctx: &ResolverContext,
    m: ModuleId,
    name: &str,
) -> Option<ModuleId> {
    if ctx.oid_names[m.index()].contains(name) {
        return Some(m);
    }
    if let Some(&target) = ctx.imports[m.index()].get(name) {
        return Some(target);
    }
    if ctx.config.allow_best_guess_fallbacks() && base::GLOBAL_OID_ROOTS.contains(&name) {
        ctx.trace(&format!(
            "oid fallback: global root {name:?} for {} resolved to SNMPv2-SMI",
            ctx.modules[m.index()].name
        ));
        return Some(ctx.base.snmpv2_smi);
    }
    None
}
