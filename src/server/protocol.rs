//! Wire protocol — one request per line, one result code per line.
//!
//! ```text
//! Request:  <COMMAND>|<PACKAGE>|<DEP1>,<DEP2>,...\n
//! Response: OK\n | FAIL\n | ERROR\n
//! ```

use bytes::Bytes;
use std::fmt;
use thiserror::Error;

use crate::index::types::{PackageName, ResultCode};

const FIELD_SEPARATOR: u8 = b'|';
const DEPENDENCY_SEPARATOR: u8 = b',';

/// Request command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Register a package with its dependencies.
    Index,
    /// Deregister a package.
    Remove,
    /// Check whether a package is registered.
    Query,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Index => "INDEX",
            Command::Remove => "REMOVE",
            Command::Query => "QUERY",
        }
    }

    /// Parse a command token. Matching is case-sensitive.
    pub fn parse(token: &[u8]) -> Option<Self> {
        match token {
            b"INDEX" => Some(Command::Index),
            b"REMOVE" => Some(Command::Remove),
            b"QUERY" => Some(Command::Query),
            _ => None,
        }
    }

    /// True for commands that mutate the index.
    pub fn is_write(self) -> bool {
        matches!(self, Command::Index | Command::Remove)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded request line.
///
/// `dependencies` keeps the order and duplicates of the wire form; the
/// index collapses it into a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub package: PackageName,
    pub dependencies: Vec<PackageName>,
}

impl Request {
    pub fn new(command: Command, package: impl Into<PackageName>) -> Self {
        Self {
            command,
            package: package.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies<I>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PackageName>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Wire form of the request, including the line terminator.
    pub fn encode(&self) -> Vec<u8> {
        let mut line = Vec::with_capacity(self.package.len() + 16);
        line.extend_from_slice(self.command.as_str().as_bytes());
        line.push(FIELD_SEPARATOR);
        line.extend_from_slice(&self.package);
        line.push(FIELD_SEPARATOR);
        for (i, dep) in self.dependencies.iter().enumerate() {
            if i > 0 {
                line.push(DEPENDENCY_SEPARATOR);
            }
            line.extend_from_slice(dep);
        }
        line.push(b'\n');
        line
    }
}

/// Why a request line could not be decoded. Reported to the client as `ERROR`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed message: expected 3 fields, found {segments}")]
    Malformed { segments: usize },

    #[error("unknown operation: {0:?}")]
    UnknownOperation(String),

    #[error("missing package identifier")]
    MissingPackage,
}

/// Decode one request line.
///
/// The line terminator and any trailing whitespace are ignored. Package
/// names are raw bytes and are not validated beyond being non-empty. Empty
/// entries in the dependency list are dropped.
pub fn decode(line: &[u8]) -> Result<Request, DecodeError> {
    let fields: Vec<&[u8]> = trim_end(line).split(|b| *b == FIELD_SEPARATOR).collect();

    let [command, package, dependencies] = fields.as_slice() else {
        return Err(DecodeError::Malformed {
            segments: fields.len(),
        });
    };

    let command = Command::parse(command).ok_or_else(|| {
        DecodeError::UnknownOperation(String::from_utf8_lossy(command).into_owned())
    })?;

    if package.is_empty() {
        return Err(DecodeError::MissingPackage);
    }

    Ok(Request {
        command,
        package: Bytes::copy_from_slice(package),
        dependencies: decode_dependencies(dependencies),
    })
}

fn decode_dependencies(field: &[u8]) -> Vec<PackageName> {
    field
        .split(|b| *b == DEPENDENCY_SEPARATOR)
        .filter(|dep| !dep.is_empty())
        .map(Bytes::copy_from_slice)
        .collect()
}

/// Strip the line terminator and trailing ASCII whitespace.
pub(crate) fn trim_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &line[..end]
}

/// Wire form of a result code, including the line terminator.
pub fn encode(code: ResultCode) -> &'static str {
    match code {
        ResultCode::Ok => "OK\n",
        ResultCode::Fail => "FAIL\n",
        ResultCode::Error => "ERROR\n",
    }
}
