#![deny(clippy::print_stdout, clippy::print_stderr)]
//! Loading and resolving SMI (Structure of Management Information) modules
//! into an immutable, query-ready [`Mib`]: a global numeric OID tree,
//! per-module definition catalogs, and a diagnostic report.
//!
//! The SMI text parser is an external collaborator; this crate consumes the
//! lowered module representation in [`ir`] and runs the multi-phase
//! resolver over it: module registration (with synthesized base modules),
//! import binding, topologically-ordered OID resolution (with RFC 3584
//! trap synthesis), type-chain resolution, and semantic analysis. See
//! [`Loader`] for the entry point.

pub mod base;
pub mod defval;
pub mod diag;
pub mod entities;
pub mod ir;
pub mod loader;
pub mod logging;
pub mod mib;
pub mod module;
pub mod oid;
pub mod source;
pub mod tree;
pub mod types;

mod context;
mod imports;
mod oid_resolve;
mod registrar;
mod semantic;
mod type_resolve;

#[cfg(test)]
mod test_helpers;

pub use defval::{DefVal, DefValValue, decode_binary, decode_hex};
pub use diag::{
    ALL_CODES, Code, Diagnostic, DiagnosticConfig, Severity, StrictnessLevel, UnresolvedKind,
    UnresolvedRef, glob_matches,
};
pub use entities::{
    Capability, CapabilityId, CapabilitySupports, Compliance, ComplianceId, ComplianceModule,
    Group, GroupId, GroupMember, GroupRefinement, IndexEntry, Notification, NotificationId,
    NotificationObject, NotificationVariation, Object, ObjectId, ObjectRefinement,
    ObjectVariation,
};
pub use ir::{
    Access, CapabilitiesDef, ComplianceDef, ComplianceModuleClause, DefValExpr, Definition,
    GroupDef, GroupRefinementClause, ImportClause, IndexItem, Language, ModuleIdentityDef,
    NamedValue, NotificationDef, NotificationVariationClause, ObjectIdentityDef,
    ObjectRefinementClause, ObjectTypeDef, ObjectVariationClause, OidComponent, OidExpr, Range,
    Revision, SourceModule, Status, SupportsClause, SyntaxExpr, TrapClause, TypeDef,
    ValueAssignmentDef,
};
pub use loader::{CancelToken, LoadError, Loader};
pub use logging::{LogLevel, LogSink};
pub use mib::Mib;
pub use module::{Module, ModuleId};
pub use oid::{Oid, ParseOidError};
pub use source::{DirSource, ModuleSource, SourceError, system_paths};
pub use tree::{Node, NodeId, NodeKind, OidTree, Subtree};
pub use types::{BaseType, Type, TypeId};

/// Returns the current version of the rmib-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
