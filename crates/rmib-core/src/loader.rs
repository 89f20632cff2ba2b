//! The top-level `Loader`: options, module discovery, phase sequencing,
//! cancellation, and the final freeze.
//!
//! Loading runs the resolver pipeline over one
//! [`ResolverContext`](crate::context::ResolverContext): registration,
//! import binding, OID resolution, type resolution, semantic analysis,
//! finalize. The cancellation token is checked between phases and inside
//! per-module loops; a cancelled load discards all partial work.
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::context::ResolverContext;
use crate::diag::{Diagnostic, DiagnosticConfig, StrictnessLevel, UnresolvedRef};
use crate::imports;
use crate::ir::SourceModule;
use crate::logging::LogSink;
use crate::mib::Mib;
use crate::oid_resolve;
use crate::registrar;
use crate::semantic;
use crate::source::{DirSource, ModuleSource, SourceError, system_paths};
use crate::type_resolve;

// ---------------------------------------------------------------------------
// CancelToken
// ---------------------------------------------------------------------------

/// Cooperative cancellation handle. Clones share the flag; any clone may
/// cancel.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. The in-flight load returns
    /// [`LoadError::Cancelled`] at its next check point.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// LoadError
// ---------------------------------------------------------------------------

/// Why a load did not produce a usable [`Mib`].
#[derive(Debug)]
pub enum LoadError {
    /// The cancellation token fired. Partial work was discarded.
    Cancelled,
    /// A module source failed (I/O or decode).
    Source(SourceError),
    /// Resolution finished but a reported diagnostic met the
    /// [`fail_at`](DiagnosticConfig::fail_at) threshold. The incomplete
    /// `Mib` rides along for post-mortem inspection.
    Failed {
        /// The diagnostics that met the threshold come first in severity
        /// rank; the full report is on the [`Mib`].
        diagnostics: Vec<Diagnostic>,
        unresolved: Vec<UnresolvedRef>,
        mib: Box<Mib>,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => f.write_str("load cancelled"),
            Self::Source(e) => write!(f, "module source error: {e}"),
            Self::Failed { diagnostics, .. } => {
                write!(f, "load failed with {} diagnostics at or above the fail threshold", diagnostics.len())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(e) => Some(e),
            Self::Cancelled | Self::Failed { .. } => None,
        }
    }
}

impl From<SourceError> for LoadError {
    fn from(e: SourceError) -> Self {
        Self::Source(e)
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Builder for a load. Construct, chain options, call
/// [`load`](Loader::load).
///
/// ```no_run
/// use rmib_core::{DirSource, Loader, StrictnessLevel};
///
/// let mib = Loader::new()
///     .with_source(Box::new(DirSource::new(["./mibs"])))
///     .with_modules(["IF-MIB"])
///     .with_strictness(StrictnessLevel::Normal)
///     .load()?;
/// # Ok::<(), rmib_core::LoadError>(())
/// ```
#[derive(Default)]
pub struct Loader {
    modules: Vec<SourceModule>,
    roots: Vec<String>,
    sources: Vec<Box<dyn ModuleSource>>,
    config: DiagnosticConfig,
    logger: Option<Arc<dyn LogSink>>,
    cancel: CancelToken,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a discovery source. Sources are consulted in the order added.
    pub fn with_source(mut self, source: Box<dyn ModuleSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Appends the conventional system IR directories as a lowest-priority
    /// source.
    pub fn with_system_paths(mut self) -> Self {
        self.sources.push(Box::new(DirSource::new(system_paths())));
        self
    }

    /// Names the root modules to load; their transitive `IMPORTS` closure
    /// is discovered through the sources.
    pub fn with_modules<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roots.extend(names.into_iter().map(Into::into));
        self
    }

    /// Supplies an already-lowered module directly.
    pub fn add_module(mut self, module: SourceModule) -> Self {
        self.modules.push(module);
        self
    }

    /// Sets the strictness preset, keeping any other config at its default.
    pub fn with_strictness(mut self, level: StrictnessLevel) -> Self {
        self.config = match level {
            StrictnessLevel::Strict => DiagnosticConfig::strict(),
            StrictnessLevel::Normal => DiagnosticConfig::default(),
            StrictnessLevel::Permissive => DiagnosticConfig::permissive(),
            StrictnessLevel::Silent => DiagnosticConfig {
                level: StrictnessLevel::Silent,
                ..DiagnosticConfig::default()
            },
        };
        self
    }

    /// Replaces the diagnostic config wholesale.
    pub fn with_diagnostic_config(mut self, config: DiagnosticConfig) -> Self {
        self.config = config;
        self
    }

    /// Installs a structured log sink; without one, entries go to the
    /// [`log`] facade.
    pub fn with_logger(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.logger = Some(sink);
        self
    }

    /// Installs a cancellation token shared with the caller.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Runs discovery and the resolver pipeline, returning the frozen
    /// [`Mib`].
    pub fn load(self) -> Result<Mib, LoadError> {
        let Self { modules, roots, sources, config, logger, cancel } = self;

        let modules = discover(modules, &roots, &sources, &cancel)?;

        let mut ctx = ResolverContext::new(config.clone(), logger);
        ctx.cancel = cancel.clone();

        registrar::register(&mut ctx, modules);
        check(&cancel)?;
        imports::bind(&mut ctx);
        check(&cancel)?;
        oid_resolve::run(&mut ctx);
        check(&cancel)?;
        type_resolve::run(&mut ctx);
        check(&cancel)?;
        semantic::run(&mut ctx);
        check(&cancel)?;

        let mib = Mib::from_context(ctx);
        let mut failing: Vec<Diagnostic> = mib
            .diagnostics()
            .iter()
            .filter(|d| config.should_fail(d.severity))
            .cloned()
            .collect();
        if failing.is_empty() {
            Ok(mib)
        } else {
            failing.sort_by_key(|d| d.severity.rank());
            Err(LoadError::Failed {
                diagnostics: failing,
                unresolved: mib.unresolved().to_vec(),
                mib: Box::new(mib),
            })
        }
    }
}

fn check(cancel: &CancelToken) -> Result<(), LoadError> {
    if cancel.is_cancelled() {
        Err(LoadError::Cancelled)
    } else {
        Ok(())
    }
}

/// Pulls the named roots and the transitive import closure out of the
/// sources. Modules supplied directly are never refetched; unknown names
/// are left for the binder to report.
fn discover(
    mut modules: Vec<SourceModule>,
    roots: &[String],
    sources: &[Box<dyn ModuleSource>],
    cancel: &CancelToken,
) -> Result<Vec<SourceModule>, LoadError> {
    let mut attempted: HashSet<String> = modules.iter().map(|m| m.name.clone()).collect();
    attempted.extend(crate::base::BASE_MODULE_NAMES.iter().map(|s| (*s).to_owned()));

    let mut queue: VecDeque<String> = VecDeque::new();
    queue.extend(roots.iter().cloned());
    for module in &modules {
        queue.extend(module.imports.iter().map(|i| i.from.clone()));
    }

    while let Some(name) = queue.pop_front() {
        check(cancel)?;
        if !attempted.insert(name.clone()) {
            continue;
        }
        let mut fetched = None;
        for source in sources {
            if let Some(module) = source.load(&name)? {
                fetched = Some(module);
                break;
            }
        }
        if let Some(module) = fetched {
            queue.extend(module.imports.iter().map(|i| i.from.clone()));
            modules.push(module);
        }
    }
    Ok(modules)
}
