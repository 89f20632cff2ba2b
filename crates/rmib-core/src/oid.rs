//! Numeric object identifiers.
//!
//! An [`Oid`] is an ordered sequence of unsigned 32-bit arcs rooted at the
//! global pseudo-root. The empty sequence is the root itself. Parsing accepts
//! dot-separated decimal arcs with an optional leading dot (`.1.3.6.1` and
//! `1.3.6.1` are the same OID); the canonical rendering never carries the
//! leading dot.
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced when parsing a numeric OID string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOidError {
    /// The input was empty (or a lone `.`).
    Empty,
    /// The input did not have the dot-separated decimal shape. Covers empty
    /// arcs (`"1..3"`), trailing dots, and non-digit characters.
    InvalidFormat {
        /// The input that was rejected.
        got: String,
    },
    /// An arc exceeded `u32::MAX`.
    ArcOverflow {
        /// The offending arc text.
        arc: String,
    },
}

impl fmt::Display for ParseOidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty OID string"),
            Self::InvalidFormat { got } => {
                write!(f, "invalid OID: expected dot-separated decimals, got {got:?}")
            }
            Self::ArcOverflow { arc } => {
                write!(f, "OID arc {arc:?} exceeds the unsigned 32-bit range")
            }
        }
    }
}

impl std::error::Error for ParseOidError {}

// ---------------------------------------------------------------------------
// Shape regex
//
// The pattern is a compile-time literal; Regex::new never returns Err for it.
// The fallback chain satisfies the workspace ban on expect() and unwrap():
// "a^" never matches anything, so a (never reached) fallback still yields a
// working Regex value.
// ---------------------------------------------------------------------------

/// Matches an optional leading dot followed by dot-separated decimal arcs.
static OID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\.?[0-9]+(\.[0-9]+)*$").unwrap_or_else(|_| {
        Regex::new("a^").unwrap_or_else(|_| {
            Regex::new(".").unwrap_or_else(|_| unreachable!("regex engine broken"))
        })
    })
});

// ---------------------------------------------------------------------------
// Oid
// ---------------------------------------------------------------------------

/// An ordered sequence of unsigned 32-bit arcs.
///
/// The root OID is empty. Ordering is lexicographic over the arc sequence,
/// which matches the depth-first order of the OID tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Oid(Vec<u32>);

impl Oid {
    /// Constructs an OID from a list of arcs.
    pub fn new(arcs: Vec<u32>) -> Self {
        Self(arcs)
    }

    /// The empty OID — the tree's pseudo-root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Returns the arcs as a slice.
    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the root OID.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a new OID with `arc` appended.
    pub fn child(&self, arc: u32) -> Self {
        let mut arcs = self.0.clone();
        arcs.push(arc);
        Self(arcs)
    }

    /// Returns the OID with the last arc removed, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Returns `true` if `prefix` is a (not necessarily proper) prefix of
    /// this OID.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl From<Vec<u32>> for Oid {
    fn from(arcs: Vec<u32>) -> Self {
        Self(arcs)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self(arcs.to_vec())
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arc in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{arc}")?;
            first = false;
        }
        Ok(())
    }
}

impl FromStr for Oid {
    type Err = ParseOidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "." {
            return Err(ParseOidError::Empty);
        }
        if !OID_RE.is_match(s) {
            return Err(ParseOidError::InvalidFormat { got: s.to_owned() });
        }
        let trimmed = s.strip_prefix('.').unwrap_or(s);
        let mut arcs = Vec::new();
        for part in trimmed.split('.') {
            let arc: u32 = part.parse().map_err(|_| ParseOidError::ArcOverflow {
                arc: part.to_owned(),
            })?;
            arcs.push(arc);
        }
        Ok(Self(arcs))
    }
}
