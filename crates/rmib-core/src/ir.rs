//! The lowered-module input contract.
//!
//! This is the interface between the external SMI lexer/lowering subsystem
//! and the resolver: a [`SourceModule`] is a partially parsed module whose
//! definitions still reference everything by name. The types here derive
//! serde so a lowered corpus can be stored as JSON and fed back in (the
//! `rmib` CLI does exactly that), but nothing in the resolver depends on the
//! serialized form.
//!
//! # Unknown field tolerance
//!
//! The lowering subsystem is versioned independently of this crate. Do not
//! add `#[serde(deny_unknown_fields)]` to any type in this module.
use serde::{Deserialize, Serialize};

use crate::diag::Diagnostic;

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// The SMI dialect a module is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Smiv1,
    Smiv2,
    Sppi,
    Unknown,
}

impl Language {
    /// Rank used when two modules claim the same OID node: SMIv2 beats
    /// SMIv1 beats everything else. SPPI deliberately ranks 0.
    pub fn rank(self) -> u8 {
        match self {
            Self::Smiv2 => 2,
            Self::Smiv1 => 1,
            Self::Sppi | Self::Unknown => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Access and Status
// ---------------------------------------------------------------------------

/// The access clause of an object, covering SMIv1 (`write-only`), SMIv2,
/// and SPPI (`install`, `install-notify`, `report-only`) values, plus the
/// `not-implemented` value that only appears in capability variations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Access {
    NotAccessible,
    AccessibleForNotify,
    ReadOnly,
    ReadWrite,
    ReadCreate,
    WriteOnly,
    NotImplemented,
    Install,
    InstallNotify,
    ReportOnly,
}

/// The status clause of a definition. `mandatory` and `optional` are SMIv1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Current,
    Deprecated,
    Obsolete,
    Mandatory,
    Optional,
}

// ---------------------------------------------------------------------------
// OID expressions
// ---------------------------------------------------------------------------

/// One component of an OID assignment's right-hand side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OidComponent {
    /// A bare numeric arc.
    Number(u32),
    /// A bare name, resolved against the defining module's scope.
    Name(String),
    /// A `name(number)` pair.
    NamedNumber { name: String, number: u32 },
    /// A `Module.name` reference.
    Qualified { module: String, name: String },
}

/// The right-hand side of an OID assignment, e.g. `{ iso org(3) dod(6) 1 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidExpr {
    pub components: Vec<OidComponent>,
}

impl OidExpr {
    pub fn new(components: Vec<OidComponent>) -> Self {
        Self { components }
    }
}

// ---------------------------------------------------------------------------
// Syntax expressions
// ---------------------------------------------------------------------------

/// An integer range or size constraint endpoint pair.
///
/// Endpoints are `i128` so that the full span of `Counter64`
/// (0..18446744073709551615) and negative `Integer32` bounds share one
/// representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: i128,
    pub max: i128,
}

impl Range {
    pub fn new(min: i128, max: i128) -> Self {
        Self { min, max }
    }

    /// A single-point range, as produced by `SIZE (4)`.
    pub fn point(value: i128) -> Self {
        Self { min: value, max: value }
    }
}

/// A named integer value: an enum item or a bit position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedValue {
    pub label: String,
    pub value: i64,
}

impl NamedValue {
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self { label: label.into(), value }
    }
}

/// The lowered form of a definition's SYNTAX clause (or of a type's
/// right-hand side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxExpr {
    /// A reference to a named type, optionally module-qualified. ASN.1
    /// primitives arrive as references to `INTEGER`, `OCTET STRING`,
    /// `OBJECT IDENTIFIER`, or `BITS`.
    Ref {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        module: Option<String>,
        name: String,
    },
    /// A subtyped syntax: `base (SIZE (0..255))` or `base (0..100)`.
    Constrained {
        base: Box<SyntaxExpr>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        sizes: Vec<Range>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        ranges: Vec<Range>,
    },
    /// `INTEGER { a(1), b(2) }`.
    Enumerated { items: Vec<NamedValue> },
    /// `BITS { a(0), b(1) }`.
    Bits { items: Vec<NamedValue> },
    /// `SEQUENCE OF Entry` — table syntax.
    SequenceOf { entry: String },
    /// `SEQUENCE { ... }` — row structure syntax. The members are not kept;
    /// column typing comes from the column objects themselves.
    Sequence,
}

impl SyntaxExpr {
    /// Shorthand for an unqualified type reference.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Ref { module: None, name: name.into() }
    }

    /// Wraps a reference in size constraints.
    pub fn sized(name: impl Into<String>, sizes: Vec<Range>) -> Self {
        Self::Constrained {
            base: Box::new(Self::reference(name)),
            sizes,
            ranges: Vec::new(),
        }
    }

    /// Wraps a reference in value-range constraints.
    pub fn ranged(name: impl Into<String>, ranges: Vec<Range>) -> Self {
        Self::Constrained {
            base: Box::new(Self::reference(name)),
            sizes: Vec::new(),
            ranges,
        }
    }
}

// ---------------------------------------------------------------------------
// DEFVAL expressions
// ---------------------------------------------------------------------------

/// The lowered form of a `DEFVAL` clause. Interpretation (enum label vs OID
/// name, hex decoding, etc.) is the resolver's job; the lowering pass only
/// classifies the surface form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefValExpr {
    /// A negative or signed decimal literal.
    Int(i64),
    /// A non-negative decimal literal.
    Uint(u64),
    /// A double-quoted string literal (quotes stripped).
    Text(String),
    /// A hex string `'ABCD'H`; `digits` is the inner text, `raw` the full
    /// original token.
    Hex { digits: String, raw: String },
    /// A binary string `'1010'B`; `bits` is the inner text, `raw` the full
    /// original token.
    Binary { bits: String, raw: String },
    /// A bare identifier — an enum label or an OID-valued name.
    Name(String),
    /// A `{ a, b }` BITS list.
    Bits(Vec<String>),
    /// An OID value `{ iso 3 6 }`.
    Oid(Vec<OidComponent>),
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// An `IMPORTS` clause: a group of symbols pulled from one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportClause {
    pub symbols: Vec<String>,
    pub from: String,
    #[serde(default)]
    pub line: u32,
}

/// One `REVISION` entry of a `MODULE-IDENTITY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// The revision date string, verbatim (`"199311082155Z"` style).
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An `OBJECT-TYPE` definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTypeDef {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    pub syntax: SyntaxExpr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    pub access: Access,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indexes: Vec<IndexItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub augments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defval: Option<DefValExpr>,
    pub oid: OidExpr,
}

/// One `INDEX` clause item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexItem {
    pub name: String,
    #[serde(default)]
    pub implied: bool,
}

/// A type assignment, `TEXTUAL-CONVENTION` or plain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    pub syntax: SyntaxExpr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_hint: Option<String>,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default)]
    pub is_textual_convention: bool,
}

fn default_status() -> Status {
    Status::Current
}

/// A `MODULE-IDENTITY` definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleIdentityDef {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub revisions: Vec<Revision>,
    pub oid: OidExpr,
}

/// An `OBJECT-IDENTITY` definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectIdentityDef {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub oid: OidExpr,
}

/// A plain value assignment: `name OBJECT IDENTIFIER ::= { ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueAssignmentDef {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    pub oid: OidExpr,
}

/// A `NOTIFICATION-TYPE` (SMIv2) or `TRAP-TYPE` (SMIv1) definition.
///
/// SMIv2 notifications carry `oid` and no `trap`; SMIv1 traps carry `trap`
/// and no `oid` — their OID is synthesized per RFC 3584.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDef {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<String>,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oid: Option<OidExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trap: Option<TrapClause>,
}

/// The `ENTERPRISE`/trap-number pair of an SMIv1 `TRAP-TYPE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrapClause {
    pub enterprise: String,
    pub number: u32,
}

/// An `OBJECT-GROUP` or `NOTIFICATION-GROUP` definition. Which of the two it
/// is comes from the [`Definition`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDef {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub oid: OidExpr,
}

/// A `MODULE-COMPLIANCE` definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceDef {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<ComplianceModuleClause>,
    pub oid: OidExpr,
}

/// One `MODULE` clause of a compliance statement. `module` is `None` for the
/// "this module" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceModuleClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mandatory_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupRefinementClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<ObjectRefinementClause>,
}

/// A conditional `GROUP` refinement inside a compliance module clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRefinementClause {
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An `OBJECT` refinement inside a compliance module clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRefinementClause {
    pub object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<SyntaxExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_syntax: Option<SyntaxExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_access: Option<Access>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An `AGENT-CAPABILITIES` definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitiesDef {
    pub name: String,
    #[serde(default)]
    pub line: u32,
    pub product_release: String,
    #[serde(default = "default_status")]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supports: Vec<SupportsClause>,
    pub oid: OidExpr,
}

/// One `SUPPORTS` clause of an `AGENT-CAPABILITIES` definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportsClause {
    pub module: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object_variations: Vec<ObjectVariationClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notification_variations: Vec<NotificationVariationClause>,
}

/// A `VARIATION` clause for an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectVariationClause {
    pub object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syntax: Option<SyntaxExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_syntax: Option<SyntaxExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creation_requires: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defval: Option<DefValExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A `VARIATION` clause for a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationVariationClause {
    pub notification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<Access>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A lowered top-level definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Definition {
    ObjectType(ObjectTypeDef),
    TypeDef(TypeDef),
    ModuleIdentity(ModuleIdentityDef),
    ObjectIdentity(ObjectIdentityDef),
    Notification(NotificationDef),
    ValueAssignment(ValueAssignmentDef),
    ObjectGroup(GroupDef),
    NotificationGroup(GroupDef),
    ModuleCompliance(ComplianceDef),
    AgentCapabilities(CapabilitiesDef),
}

impl Definition {
    /// The defined name.
    pub fn name(&self) -> &str {
        match self {
            Self::ObjectType(d) => &d.name,
            Self::TypeDef(d) => &d.name,
            Self::ModuleIdentity(d) => &d.name,
            Self::ObjectIdentity(d) => &d.name,
            Self::Notification(d) => &d.name,
            Self::ValueAssignment(d) => &d.name,
            Self::ObjectGroup(d) | Self::NotificationGroup(d) => &d.name,
            Self::ModuleCompliance(d) => &d.name,
            Self::AgentCapabilities(d) => &d.name,
        }
    }

    /// The OID assignment, when the definition carries one. SMIv1
    /// `TRAP-TYPE`s and type assignments do not.
    pub fn oid(&self) -> Option<&OidExpr> {
        match self {
            Self::ObjectType(d) => Some(&d.oid),
            Self::TypeDef(_) => None,
            Self::ModuleIdentity(d) => Some(&d.oid),
            Self::ObjectIdentity(d) => Some(&d.oid),
            Self::Notification(d) => d.oid.as_ref(),
            Self::ValueAssignment(d) => Some(&d.oid),
            Self::ObjectGroup(d) | Self::NotificationGroup(d) => Some(&d.oid),
            Self::ModuleCompliance(d) => Some(&d.oid),
            Self::AgentCapabilities(d) => Some(&d.oid),
        }
    }

    /// The 1-based source line of the definition (0 when unknown).
    pub fn line(&self) -> u32 {
        match self {
            Self::ObjectType(d) => d.line,
            Self::TypeDef(d) => d.line,
            Self::ModuleIdentity(d) => d.line,
            Self::ObjectIdentity(d) => d.line,
            Self::Notification(d) => d.line,
            Self::ValueAssignment(d) => d.line,
            Self::ObjectGroup(d) | Self::NotificationGroup(d) => d.line,
            Self::ModuleCompliance(d) => d.line,
            Self::AgentCapabilities(d) => d.line,
        }
    }
}

// ---------------------------------------------------------------------------
// SourceModule
// ---------------------------------------------------------------------------

/// A partially parsed module as delivered by the lowering pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceModule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub language: Language,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ImportClause>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub definitions: Vec<Definition>,
    /// Names of MACROs the module defines. Needed so that importing
    /// `OBJECT-TYPE FROM SNMPv2-SMI` binds cleanly.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub macros: Vec<String>,
    /// Diagnostics produced while parsing and lowering this module.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl SourceModule {
    /// An empty module shell in the given language.
    pub fn new(name: impl Into<String>, language: Language) -> Self {
        Self {
            name: name.into(),
            path: None,
            language,
            imports: Vec::new(),
            definitions: Vec::new(),
            macros: Vec::new(),
            diagnostics: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn language_rank_prefers_smiv2() {
        assert!(Language::Smiv2.rank() > Language::Smiv1.rank());
        assert!(Language::Smiv1.rank() > Language::Sppi.rank());
        assert_eq!(Language::Sppi.rank(), Language::Unknown.rank());
    }

    #[test]
    fn definition_accessors() {
        let def = Definition::ValueAssignment(ValueAssignmentDef {
            name: "internet".to_owned(),
            line: 7,
            oid: OidExpr::new(vec![
                OidComponent::Name("iso".to_owned()),
                OidComponent::NamedNumber { name: "org".to_owned(), number: 3 },
                OidComponent::NamedNumber { name: "dod".to_owned(), number: 6 },
                OidComponent::Number(1),
            ]),
        });
        assert_eq!(def.name(), "internet");
        assert_eq!(def.line(), 7);
        assert_eq!(def.oid().map(|o| o.components.len()), Some(4));
    }

    #[test]
    fn trap_type_has_no_oid() {
        let def = Definition::Notification(NotificationDef {
            name: "linkDown".to_owned(),
            line: 0,
            objects: vec!["ifIndex".to_owned()],
            status: Status::Current,
            description: None,
            reference: None,
            oid: None,
            trap: Some(TrapClause { enterprise: "snmp".to_owned(), number: 2 }),
        });
        assert!(def.oid().is_none());
    }

    #[test]
    fn source_module_json_roundtrip() {
        let mut module = SourceModule::new("TEST-MIB", Language::Smiv2);
        module.imports.push(ImportClause {
            symbols: vec!["OBJECT-TYPE".to_owned(), "Integer32".to_owned()],
            from: "SNMPv2-SMI".to_owned(),
            line: 3,
        });
        module.definitions.push(Definition::TypeDef(TypeDef {
            name: "TestString".to_owned(),
            line: 9,
            syntax: SyntaxExpr::sized("OCTET STRING", vec![Range::new(0, 255)]),
            display_hint: Some("255a".to_owned()),
            status: Status::Current,
            description: None,
            reference: None,
            is_textual_convention: true,
        }));
        let json = serde_json::to_string(&module).expect("serialize");
        let back: SourceModule = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, module);
    }
}
