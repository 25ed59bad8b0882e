//! Dependency index — package name to dependency set.
//!
//! Every successful mutation keeps the index closed: each dependency of
//! each indexed package is itself indexed. The index has no locking of
//! its own; see [`IndexGuard`](super::IndexGuard) for shared use.

use bytes::Bytes;
use std::collections::HashMap;

use super::types::{DependencySet, PackageName, ResultCode};

/// In-memory package dependency index.
#[derive(Debug, Default, Clone)]
pub struct DependencyIndex {
    packages: HashMap<PackageName, DependencySet>,
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `package` with the given dependencies.
    ///
    /// Fails, leaving the index untouched, if any dependency is not indexed
    /// yet or names the package itself, including on re-indexing. Re-indexing
    /// replaces the previous dependency set.
    pub fn register<P, I>(&mut self, package: P, dependencies: I) -> ResultCode
    where
        P: AsRef<[u8]>,
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        let package = package.as_ref();
        let mut resolved = DependencySet::new();
        for dep in dependencies {
            let dep = dep.as_ref();
            if dep == package || !self.packages.contains_key(dep) {
                return ResultCode::Fail;
            }
            resolved.insert(Bytes::copy_from_slice(dep));
        }

        self.packages.insert(Bytes::copy_from_slice(package), resolved);
        ResultCode::Ok
    }

    /// Remove `package` unless another indexed package depends on it.
    ///
    /// Removing a package that is not indexed succeeds.
    pub fn remove(&mut self, package: impl AsRef<[u8]>) -> ResultCode {
        let package = package.as_ref();
        if !self.packages.contains_key(package) {
            return ResultCode::Ok;
        }

        let required = self
            .packages
            .iter()
            .any(|(name, deps)| &name[..] != package && deps.contains(package));
        if required {
            return ResultCode::Fail;
        }

        self.packages.remove(package);
        ResultCode::Ok
    }

    /// `Ok` if `package` is indexed, `Fail` otherwise.
    pub fn query(&self, package: impl AsRef<[u8]>) -> ResultCode {
        if self.contains(package) {
            ResultCode::Ok
        } else {
            ResultCode::Fail
        }
    }

    pub fn contains(&self, package: impl AsRef<[u8]>) -> bool {
        self.packages.contains_key(package.as_ref())
    }

    /// Dependency set of an indexed package.
    pub fn dependencies(&self, package: impl AsRef<[u8]>) -> Option<&DependencySet> {
        self.packages.get(package.as_ref())
    }

    /// Number of indexed packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// True if every dependency of every package is itself indexed.
    pub fn is_closed(&self) -> bool {
        self.packages
            .values()
            .flat_map(|deps| deps.iter())
            .all(|dep| self.packages.contains_key(dep))
    }
}
