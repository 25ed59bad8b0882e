//! Index types.

use bytes::Bytes;
use std::collections::HashSet;
use std::fmt;

/// Opaque, case-sensitive package identifier.
///
/// Any byte sequence is legal, UTF-8 or not.
pub type PackageName = Bytes;

/// Packages that must be indexed before the owning package can be.
pub type DependencySet = HashSet<PackageName>;

/// Outcome of a request, as sent back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    /// The operation succeeded.
    Ok,
    /// Well-formed request that would break an index invariant.
    Fail,
    /// Malformed request.
    Error,
}

impl ResultCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultCode::Ok => "OK",
            ResultCode::Fail => "FAIL",
            ResultCode::Error => "ERROR",
        }
    }

    /// Parse a response line (terminator and surrounding whitespace ignored).
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "OK" => Some(ResultCode::Ok),
            "FAIL" => Some(ResultCode::Fail),
            "ERROR" => Some(ResultCode::Error),
            _ => None,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
