//! Diagnostic engine: severity lattice, strictness presets, coded findings,
//! and the filtering configuration applied at finalize time.
//!
//! Severities form an integer lattice where a *lower* rank is *more* severe.
//! Filtering happens once, when a resolved context is frozen into a
//! [`Mib`](crate::mib::Mib) — never at emission time — so a caller can swap
//! the [`DiagnosticConfig`] without rerunning the resolver.
use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// The severity of a diagnostic. Lower rank is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Pre-resolution failure (unreadable source, malformed encoding). The
    /// resolver itself never emits this.
    Fatal,
    /// Resolution had to rewrite the user's intent. Reserved.
    Severe,
    /// A definition could not be resolved or is structurally wrong.
    Error,
    /// A real defect that does not prevent resolution.
    Minor,
    /// A style finding.
    Style,
    /// A warning.
    Warning,
    /// Informational.
    Info,
}

impl Severity {
    /// Numeric rank: `fatal` is 0, `info` is 6.
    pub fn rank(self) -> u8 {
        match self {
            Self::Fatal => 0,
            Self::Severe => 1,
            Self::Error => 2,
            Self::Minor => 3,
            Self::Style => 4,
            Self::Warning => 5,
            Self::Info => 6,
        }
    }

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fatal => "fatal",
            Self::Severe => "severe",
            Self::Error => "error",
            Self::Minor => "minor",
            Self::Style => "style",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// StrictnessLevel
// ---------------------------------------------------------------------------

/// How much of the diagnostic stream the caller wants to see, and how eager
/// the resolver's fallback chains may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrictnessLevel {
    /// Report everything; no fallbacks.
    Strict,
    /// Report up to [`Severity::Minor`]; safe fallbacks allowed.
    Normal,
    /// Report up to [`Severity::Warning`]; best-guess fallbacks allowed.
    Permissive,
    /// Report nothing.
    Silent,
}

impl StrictnessLevel {
    /// Numeric rank on the same scale as [`Severity::rank`]: strict is 0,
    /// normal 3, permissive 5, silent 6.
    pub fn rank(self) -> u8 {
        match self {
            Self::Strict => 0,
            Self::Normal => 3,
            Self::Permissive => 5,
            Self::Silent => 6,
        }
    }
}

// ---------------------------------------------------------------------------
// Code
// ---------------------------------------------------------------------------

/// The closed set of diagnostic codes emitted across the parser, the
/// lowering pass, and the resolver.
///
/// [`Code::as_str`] returns the stable hyphenated form used in reports and
/// in [`DiagnosticConfig::ignore`] globs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    IdentifierUnderscore,
    IdentifierHyphenEnd,
    IdentifierLength64,
    IdentifierLength32,
    BadIdentifierCase,
    ParseError,
    InvalidU32,
    InvalidI64,
    KeywordReserved,
    InvalidHexRange,
    MissingModuleIdentity,
    RevisionLastUpdated,
    UnknownDefinitionType,
    UnknownTypeSyntax,
    UnknownConstraintType,
    UnknownRangeValue,
    UnknownOidComponentType,
    UnknownDefvalType,
    ImportNotFound,
    ImportModuleNotFound,
    TypeUnknown,
    OidOrphan,
    IndexUnresolved,
    ObjectsUnresolved,
    IdentifierHyphenSmiv2,
    GroupNotAccessible,
    NotificationObjectNotObject,
    MalformedHexDefval,
    DefvalUnresolved,
}

/// Every code, in a fixed order. Used by the CLI to list known codes and by
/// tests to sweep the closed set.
pub const ALL_CODES: [Code; 29] = [
    Code::IdentifierUnderscore,
    Code::IdentifierHyphenEnd,
    Code::IdentifierLength64,
    Code::IdentifierLength32,
    Code::BadIdentifierCase,
    Code::ParseError,
    Code::InvalidU32,
    Code::InvalidI64,
    Code::KeywordReserved,
    Code::InvalidHexRange,
    Code::MissingModuleIdentity,
    Code::RevisionLastUpdated,
    Code::UnknownDefinitionType,
    Code::UnknownTypeSyntax,
    Code::UnknownConstraintType,
    Code::UnknownRangeValue,
    Code::UnknownOidComponentType,
    Code::UnknownDefvalType,
    Code::ImportNotFound,
    Code::ImportModuleNotFound,
    Code::TypeUnknown,
    Code::OidOrphan,
    Code::IndexUnresolved,
    Code::ObjectsUnresolved,
    Code::IdentifierHyphenSmiv2,
    Code::GroupNotAccessible,
    Code::NotificationObjectNotObject,
    Code::MalformedHexDefval,
    Code::DefvalUnresolved,
];

impl Code {
    /// Returns the stable hyphenated code string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IdentifierUnderscore => "identifier-underscore",
            Self::IdentifierHyphenEnd => "identifier-hyphen-end",
            Self::IdentifierLength64 => "identifier-length-64",
            Self::IdentifierLength32 => "identifier-length-32",
            Self::BadIdentifierCase => "bad-identifier-case",
            Self::ParseError => "parse-error",
            Self::InvalidU32 => "invalid-u32",
            Self::InvalidI64 => "invalid-i64",
            Self::KeywordReserved => "keyword-reserved",
            Self::InvalidHexRange => "invalid-hex-range",
            Self::MissingModuleIdentity => "missing-module-identity",
            Self::RevisionLastUpdated => "revision-last-updated",
            Self::UnknownDefinitionType => "unknown-definition-type",
            Self::UnknownTypeSyntax => "unknown-type-syntax",
            Self::UnknownConstraintType => "unknown-constraint-type",
            Self::UnknownRangeValue => "unknown-range-value",
            Self::UnknownOidComponentType => "unknown-oid-component-type",
            Self::UnknownDefvalType => "unknown-defval-type",
            Self::ImportNotFound => "import-not-found",
            Self::ImportModuleNotFound => "import-module-not-found",
            Self::TypeUnknown => "type-unknown",
            Self::OidOrphan => "oid-orphan",
            Self::IndexUnresolved => "index-unresolved",
            Self::ObjectsUnresolved => "objects-unresolved",
            Self::IdentifierHyphenSmiv2 => "identifier-hyphen-smiv2",
            Self::GroupNotAccessible => "group-not-accessible",
            Self::NotificationObjectNotObject => "notification-object-not-object",
            Self::MalformedHexDefval => "malformed-hex-defval",
            Self::DefvalUnresolved => "defval-unresolved",
        }
    }

    /// Parses the stable code string back into a [`Code`].
    pub fn parse(s: &str) -> Option<Self> {
        ALL_CODES.iter().copied().find(|c| c.as_str() == s)
    }

    /// The severity a code carries when the emission site does not choose a
    /// more specific one.
    pub fn default_severity(self) -> Severity {
        match self {
            Self::IdentifierUnderscore
            | Self::IdentifierHyphenEnd
            | Self::IdentifierLength32
            | Self::BadIdentifierCase
            | Self::RevisionLastUpdated => Severity::Style,
            Self::IdentifierLength64
            | Self::KeywordReserved
            | Self::MissingModuleIdentity
            | Self::GroupNotAccessible
            | Self::NotificationObjectNotObject => Severity::Minor,
            Self::ParseError
            | Self::InvalidU32
            | Self::InvalidI64
            | Self::InvalidHexRange
            | Self::UnknownDefinitionType
            | Self::UnknownTypeSyntax
            | Self::UnknownConstraintType
            | Self::UnknownRangeValue
            | Self::UnknownOidComponentType
            | Self::UnknownDefvalType
            | Self::ImportNotFound
            | Self::ImportModuleNotFound
            | Self::TypeUnknown
            | Self::OidOrphan
            | Self::IndexUnresolved
            | Self::ObjectsUnresolved => Severity::Error,
            Self::IdentifierHyphenSmiv2
            | Self::MalformedHexDefval
            | Self::DefvalUnresolved => Severity::Warning,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Code {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CodeVisitor;

        impl Visitor<'_> for CodeVisitor {
            type Value = Code;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a known diagnostic code string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Code, E> {
                Code::parse(v)
                    .ok_or_else(|| E::custom(format!("unknown diagnostic code {v:?}")))
            }
        }

        deserializer.deserialize_str(CodeVisitor)
    }
}

// ---------------------------------------------------------------------------
// Diagnostic
// ---------------------------------------------------------------------------

/// A single finding produced by the parser, the lowering pass, or the
/// resolver.
///
/// `line` and `col` are 1-based; `0` means the position is unknown (most
/// resolver findings attach to a definition, not a token).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The code identifying the anomaly.
    pub code: Code,
    /// The severity of this finding.
    pub severity: Severity,
    /// A human-readable explanation.
    pub message: String,
    /// The module the finding belongs to.
    pub module: String,
    /// 1-based source line, or 0 when unknown.
    #[serde(default)]
    pub line: u32,
    /// 1-based source column, or 0 when unknown.
    #[serde(default)]
    pub col: u32,
}

impl Diagnostic {
    /// Constructs a diagnostic with the code's default severity and no
    /// source position.
    pub fn new(code: Code, module: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            module: module.into(),
            line: 0,
            col: 0,
        }
    }

    /// Overrides the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attaches a 1-based source position.
    pub fn at(mut self, line: u32, col: u32) -> Self {
        self.line = line;
        self.col = col;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(
                f,
                "{}:{}:{}: {}: {}: {}",
                self.module, self.line, self.col, self.severity, self.code, self.message
            )
        } else {
            write!(
                f,
                "{}: {}: {}: {}",
                self.module, self.severity, self.code, self.message
            )
        }
    }
}

// ---------------------------------------------------------------------------
// UnresolvedRef
// ---------------------------------------------------------------------------

/// What a dangling reference was trying to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedKind {
    /// An imported symbol or import source module.
    Import,
    /// A type reference.
    Type,
    /// An OID assignment component.
    Oid,
    /// An `INDEX` or `AUGMENTS` item.
    Index,
    /// A member of a notification's `OBJECTS` clause or of a group.
    NotificationObject,
}

/// A structured record of a reference that never resolved.
///
/// Every record has a matching [`Diagnostic`]; the list exists as a typed
/// view for tooling. Accumulated across all phases, never silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedRef {
    /// What kind of reference failed.
    pub kind: UnresolvedKind,
    /// The symbol that could not be resolved.
    pub symbol: String,
    /// The module the reference appeared in.
    pub module: String,
}

// ---------------------------------------------------------------------------
// Glob matching
// ---------------------------------------------------------------------------

/// Matches an ignore glob against a code string.
///
/// Only the `*` wildcard is supported, and only as the whole pattern, a
/// prefix (`*-foo`), or a suffix (`identifier-*`). Anything else is an exact
/// string comparison.
pub fn glob_matches(pattern: &str, code: &str) -> bool {
    if pattern == "*" {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return code.starts_with(prefix);
    }
    if let Some(suffix) = pattern.strip_prefix('*') {
        return code.ends_with(suffix);
    }
    pattern == code
}

// ---------------------------------------------------------------------------
// DiagnosticConfig
// ---------------------------------------------------------------------------

/// Filtering and failure policy for the diagnostic stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticConfig {
    /// Reporting threshold.
    pub level: StrictnessLevel,
    /// Loading fails iff a reported diagnostic is at least this severe.
    pub fail_at: Severity,
    /// Per-code severity substitutions, applied before filtering.
    pub overrides: HashMap<Code, Severity>,
    /// Ignore globs matched against the code string (see [`glob_matches`]).
    pub ignore: Vec<String>,
}

impl DiagnosticConfig {
    /// The strict preset: report everything, fail at `severe`.
    pub fn strict() -> Self {
        Self {
            level: StrictnessLevel::Strict,
            fail_at: Severity::Severe,
            overrides: HashMap::new(),
            ignore: Vec::new(),
        }
    }

    /// The permissive preset: report up to `warning`, fail only at `fatal`,
    /// and ignore the chattiest identifier-style codes.
    pub fn permissive() -> Self {
        Self {
            level: StrictnessLevel::Permissive,
            fail_at: Severity::Fatal,
            overrides: HashMap::new(),
            ignore: vec![
                "identifier-underscore".to_owned(),
                "identifier-length-32".to_owned(),
                "bad-identifier-case".to_owned(),
            ],
        }
    }

    /// Returns the severity to use for `code`, applying any override.
    pub fn effective_severity(&self, code: Code, severity: Severity) -> Severity {
        self.overrides.get(&code).copied().unwrap_or(severity)
    }

    /// Decides whether a diagnostic with the given code and severity belongs
    /// in the report.
    ///
    /// Ignore globs are consulted first, then per-code overrides substitute
    /// the severity, then the level threshold applies.
    pub fn should_report(&self, code: Code, severity: Severity) -> bool {
        let code_str = code.as_str();
        if self.ignore.iter().any(|p| glob_matches(p, code_str)) {
            return false;
        }
        let severity = self.effective_severity(code, severity);
        match self.level {
            StrictnessLevel::Silent => false,
            StrictnessLevel::Strict => true,
            StrictnessLevel::Normal | StrictnessLevel::Permissive => {
                severity.rank() <= self.level.rank()
            }
        }
    }

    /// Decides whether a reported diagnostic of this severity fails the load.
    pub fn should_fail(&self, severity: Severity) -> bool {
        severity.rank() <= self.fail_at.rank()
    }

    /// `true` below normal: no fallbacks at all.
    pub fn is_strict(&self) -> bool {
        self.level.rank() < StrictnessLevel::Normal.rank()
    }

    /// `true` at normal and above: RFC-compliant fallbacks allowed.
    pub fn allow_safe_fallbacks(&self) -> bool {
        self.level.rank() >= StrictnessLevel::Normal.rank()
    }

    /// `true` at permissive and above: best-guess fallbacks allowed.
    pub fn allow_best_guess_fallbacks(&self) -> bool {
        self.level.rank() >= StrictnessLevel::Permissive.rank()
    }
}

impl Default for DiagnosticConfig {
    /// The default preset: report up to `minor`, fail at `severe`.
    fn default() -> Self {
        Self {
            level: StrictnessLevel::Normal,
            fail_at: Severity::Severe,
            overrides: HashMap::new(),
            ignore: Vec::new(),
        }
    }
}
