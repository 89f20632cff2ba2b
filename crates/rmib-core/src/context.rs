//! The mutable state shared by every resolver phase.
//!
//! One [`ResolverContext`] is created per load, threaded through the phases
//! in order, and frozen into a [`Mib`](crate::mib::Mib) at the end. It is
//! the sole owner of the working OID tree, the entity arenas, the
//! per-module symbol maps, the import maps, and the accumulated diagnostic
//! and unresolved-reference streams.
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::diag::{Code, Diagnostic, DiagnosticConfig, Severity, UnresolvedKind, UnresolvedRef};
use crate::entities::{Capability, Compliance, Group, Notification, Object};
use crate::ir::SourceModule;
use crate::loader::CancelToken;
use crate::logging::{self, LogLevel, LogSink};
use crate::module::{Module, ModuleId};
use crate::tree::{NodeId, OidTree};
use crate::types::{Type, TypeId};

/// Cached handles to the three most-consulted base modules.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BaseHandles {
    pub snmpv2_smi: ModuleId,
    pub rfc1155_smi: ModuleId,
    pub snmpv2_tc: ModuleId,
}

/// Mutable resolver state. Discarded after finalize.
pub(crate) struct ResolverContext {
    pub config: DiagnosticConfig,
    pub logger: Option<Arc<dyn LogSink>>,
    /// Checked between per-module loops inside the phases; the loader turns
    /// a fired token into [`LoadError::Cancelled`](crate::loader::LoadError)
    /// between phases and discards this context.
    pub cancel: CancelToken,

    /// Source modules in registration order: base modules first, then user
    /// modules in input order. Parallel to `modules`.
    pub sources: Vec<SourceModule>,
    /// Resolved module records, parallel to `sources`.
    pub modules: Vec<Module>,
    /// Module name to module ids; duplicates allowed across the corpus.
    pub module_index: HashMap<String, Vec<ModuleId>>,
    /// Per module: every definition and macro name.
    pub def_names: Vec<HashSet<String>>,
    /// Per module: the subset of definition names that carry an OID.
    pub oid_names: Vec<HashSet<String>>,
    /// Per module: imported symbol to the module that provides it.
    pub imports: Vec<HashMap<String, ModuleId>>,
    /// Per module: symbol to the tree node its assignment produced.
    pub symbols: Vec<HashMap<String, NodeId>>,
    /// Per module: type name to catalog handle.
    pub type_symbols: Vec<HashMap<String, TypeId>>,

    pub tree: OidTree,
    pub objects: Vec<Object>,
    pub types: Vec<Type>,
    pub notifications: Vec<Notification>,
    pub groups: Vec<Group>,
    pub compliances: Vec<Compliance>,
    pub capabilities: Vec<Capability>,

    pub diagnostics: Vec<Diagnostic>,
    pub unresolved: Vec<UnresolvedRef>,

    pub base: BaseHandles,
}

impl ResolverContext {
    pub fn new(config: DiagnosticConfig, logger: Option<Arc<dyn LogSink>>) -> Self {
        Self {
            config,
            logger,
            cancel: CancelToken::new(),
            sources: Vec::new(),
            modules: Vec::new(),
            module_index: HashMap::new(),
            def_names: Vec::new(),
            oid_names: Vec::new(),
            imports: Vec::new(),
            symbols: Vec::new(),
            type_symbols: Vec::new(),
            tree: OidTree::new(),
            objects: Vec::new(),
            types: Vec::new(),
            notifications: Vec::new(),
            groups: Vec::new(),
            compliances: Vec::new(),
            capabilities: Vec::new(),
            diagnostics: Vec::new(),
            unresolved: Vec::new(),
            base: BaseHandles {
                snmpv2_smi: ModuleId(0),
                rfc1155_smi: ModuleId(0),
                snmpv2_tc: ModuleId(0),
            },
        }
    }

    /// Records a diagnostic. Filtering happens at finalize, not here.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Records a diagnostic with an explicit severity and source line.
    pub fn emit_code_at(
        &mut self,
        code: Code,
        severity: Severity,
        module: ModuleId,
        line: u32,
        message: impl Into<String>,
    ) {
        let module_name = self.modules[module.index()].name.clone();
        self.emit(Diagnostic::new(code, module_name, message).with_severity(severity).at(line, 0));
    }

    /// Records an unresolved reference. The matching diagnostic is the
    /// caller's responsibility.
    pub fn record_unresolved(&mut self, kind: UnresolvedKind, module: ModuleId, symbol: &str) {
        let module_name = self.modules[module.index()].name.clone();
        self.unresolved.push(UnresolvedRef {
            kind,
            symbol: symbol.to_owned(),
            module: module_name,
        });
    }

    /// Emits a trace entry through the configured sink or the log facade.
    pub fn trace(&self, message: &str) {
        logging::dispatch(self.logger.as_ref(), LogLevel::Trace, message);
    }

    /// Emits a debug entry.
    pub fn debug(&self, message: &str) {
        logging::dispatch(self.logger.as_ref(), LogLevel::Debug, message);
    }

    /// `true` once the caller's cancellation token fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// All module ids, in registration order.
    pub fn module_ids(&self) -> impl Iterator<Item = ModuleId> + use<> {
        (0..self.modules.len() as u32).map(ModuleId)
    }

    /// Decides whether `candidate` is preferred over `incumbent` for
    /// claiming a contested node: higher language rank wins; on a tie the
    /// lexicographically later `LAST-UPDATED` wins.
    pub fn module_preferred(&self, candidate: ModuleId, incumbent: ModuleId) -> bool {
        let cand = &self.modules[candidate.index()];
        let inc = &self.modules[incumbent.index()];
        let (cr, ir) = (cand.language.rank(), inc.language.rank());
        if cr != ir {
            return cr > ir;
        }
        match (&cand.last_updated, &inc.last_updated) {
            (Some(c), Some(i)) => c > i,
            (Some(_), None) => true,
            (None, Some(_) | None) => false,
        }
    }
}
