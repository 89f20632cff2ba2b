//! Phase C: module registration.
//!
//! Synthesizes the base modules, filters user modules that collide with
//! them, creates the resolved [`Module`](crate::module::Module) records, and
//! builds the name indexes every later phase leans on.
use std::collections::HashSet;

use crate::base;
use crate::context::{BaseHandles, ResolverContext};
use crate::diag::{Code, Diagnostic, Severity};
use crate::ir::{Definition, SourceModule};
use crate::module::{Module, ModuleId};

/// Registers base and user modules into the context.
///
/// Registration order is observable: base modules first, then user modules
/// in input order. Every per-module vector in the context is allocated
/// here, so later phases can index without checking.
pub(crate) fn register(ctx: &mut ResolverContext, user_modules: Vec<SourceModule>) {
    let mut all = base::base_modules();

    for user in user_modules {
        if base::is_base_module_name(&user.name) {
            // The synthesized version wins; only strict mode hears about it.
            if ctx.config.is_strict() {
                ctx.emit(
                    Diagnostic::new(
                        Code::KeywordReserved,
                        user.name.clone(),
                        format!("module name {:?} is reserved for a base module", user.name),
                    )
                    .with_severity(Severity::Minor),
                );
            }
            continue;
        }
        all.push(user);
    }

    for source in all {
        register_one(ctx, source);
    }

    ctx.base = BaseHandles {
        snmpv2_smi: find_module(ctx, "SNMPv2-SMI"),
        rfc1155_smi: find_module(ctx, "RFC1155-SMI"),
        snmpv2_tc: find_module(ctx, "SNMPv2-TC"),
    };

    ctx.debug(&format!("registered {} modules", ctx.modules.len()));
}

fn register_one(ctx: &mut ResolverContext, source: SourceModule) {
    let id = ModuleId(ctx.modules.len() as u32);
    let is_base = base::is_base_module_name(&source.name);

    let mut module = Module::new(source.name.clone(), source.language, is_base);
    module.path = source.path.clone();

    // MODULE-IDENTITY metadata comes from the first such definition.
    if let Some(identity) = source.definitions.iter().find_map(|d| match d {
        Definition::ModuleIdentity(mi) => Some(mi),
        Definition::ObjectType(_)
        | Definition::TypeDef(_)
        | Definition::ObjectIdentity(_)
        | Definition::Notification(_)
        | Definition::ValueAssignment(_)
        | Definition::ObjectGroup(_)
        | Definition::NotificationGroup(_)
        | Definition::ModuleCompliance(_)
        | Definition::AgentCapabilities(_) => None,
    }) {
        module.organization = identity.organization.clone();
        module.contact_info = identity.contact_info.clone();
        module.description = identity.description.clone();
        module.last_updated = identity.last_updated.clone();
        module.revisions = identity.revisions.clone();
    }

    // Parser and lowering diagnostics ride along unchanged.
    ctx.diagnostics.extend(source.diagnostics.iter().cloned());

    let mut def_names: HashSet<String> =
        source.definitions.iter().map(|d| d.name().to_owned()).collect();
    def_names.extend(source.macros.iter().cloned());
    let oid_names: HashSet<String> = source
        .definitions
        .iter()
        .filter(|d| d.oid().is_some())
        .map(|d| d.name().to_owned())
        .collect();

    ctx.module_index.entry(source.name.clone()).or_default().push(id);
    ctx.def_names.push(def_names);
    ctx.oid_names.push(oid_names);
    ctx.imports.push(Default::default());
    ctx.symbols.push(Default::default());
    ctx.type_symbols.push(Default::default());
    ctx.modules.push(module);
    ctx.sources.push(source);
}

/// Looks up a base module registered by [`register`]. Falls back to module
/// 0 (`SNMPv2-SMI`), which is always present.
fn find_module(ctx: &ResolverContext, name: &str) -> ModuleId {
    ctx.module_index
        .get(name)
        .and_then(|ids| ids.first().copied())
        .unwrap_or(ModuleId(0))
}
