//! Index guard — serializes access to the shared dependency index.
//!
//! Mutations take the write lock, queries take the read lock. Each lock
//! is held for exactly one operation and never across socket I/O.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

use super::store::DependencyIndex;
use super::types::{DependencySet, ResultCode};

/// Process-wide owner of the dependency index.
///
/// Construct once and share through an `Arc` with every connection.
#[derive(Debug, Default)]
pub struct IndexGuard {
    index: RwLock<DependencyIndex>,
}

impl IndexGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P, I>(&self, package: P, dependencies: I) -> ResultCode
    where
        P: AsRef<[u8]>,
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        self.write().register(package, dependencies)
    }

    pub fn remove(&self, package: impl AsRef<[u8]>) -> ResultCode {
        self.write().remove(package)
    }

    pub fn query(&self, package: impl AsRef<[u8]>) -> ResultCode {
        self.read().query(package)
    }

    /// Number of indexed packages.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Copy of a package's dependency set, taken under the read lock.
    pub fn snapshot_dependencies(&self, package: impl AsRef<[u8]>) -> Option<DependencySet> {
        self.read().dependencies(package).cloned()
    }

    /// Copy of the whole index, taken under the read lock.
    pub fn snapshot(&self) -> DependencyIndex {
        self.read().clone()
    }

    // Index operations never leave a half-applied update behind, so a lock
    // poisoned by a panicking holder still guards a consistent index.
    fn read(&self) -> RwLockReadGuard<'_, DependencyIndex> {
        self.index.read().unwrap_or_else(|e| {
            warn!("index lock poisoned, recovering");
            PoisonError::into_inner(e)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, DependencyIndex> {
        self.index.write().unwrap_or_else(|e| {
            warn!("index lock poisoned, recovering");
            PoisonError::into_inner(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    const NONE: [&str; 0] = [];

    #[test]
    fn test_snapshot_dependencies() {
        let guard = IndexGuard::new();
        guard.register("a", NONE);
        guard.register("b", ["a"]);

        let deps = guard.snapshot_dependencies("b").unwrap();
        assert!(deps.contains(&b"a"[..]));
        assert_eq!(deps.len(), 1);
        assert!(guard.snapshot_dependencies("c").is_none());
    }

    #[test]
    fn test_fresh_guards_are_independent() {
        let first = IndexGuard::new();
        let second = IndexGuard::new();
        first.register("only-here", NONE);
        assert_eq!(first.query("only-here"), ResultCode::Ok);
        assert_eq!(second.query("only-here"), ResultCode::Fail);
    }

    #[test]
    fn test_concurrent_mutations_keep_index_closed() {
        let guard = Arc::new(IndexGuard::new());
        guard.register("base", NONE);

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let guard = Arc::clone(&guard);
                thread::spawn(move || {
                    for round in 0..200 {
                        let name = format!("pkg-{}", (worker + round) % 5);
                        let dep = format!("pkg-{}", (worker + round + 1) % 5);
                        match round % 4 {
                            0 => {
                                guard.register(&name, ["base"]);
                            }
                            1 => {
                                guard.register(&name, [dep.as_str(), "base"]);
                            }
                            2 => {
                                guard.remove(&name);
                            }
                            _ => {
                                guard.query(&name);
                            }
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let index = guard.snapshot();
        assert!(index.is_closed());
        assert!(index.contains("base"));
    }

    #[test]
    fn test_concurrent_readers_and_writer() {
        let guard = Arc::new(IndexGuard::new());
        guard.register("root", NONE);
        guard.register("pinned", ["root"]);

        let writer = {
            let guard = Arc::clone(&guard);
            thread::spawn(move || {
                for i in 0..500 {
                    assert_eq!(guard.register(&format!("leaf-{}", i), ["root"]), ResultCode::Ok);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let guard = Arc::clone(&guard);
                thread::spawn(move || {
                    for _ in 0..500 {
                        assert_eq!(guard.query("root"), ResultCode::Ok);
                        assert_eq!(guard.remove("root"), ResultCode::Fail);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(guard.len(), 502);
    }

    #[test]
    fn test_racing_index_and_remove_match_a_serial_order() {
        // Index holds only "b". One thread indexes "a" on top of "b", the
        // other removes "b". Either order is fine; a mix of both is not.
        for _ in 0..200 {
            let guard = Arc::new(IndexGuard::new());
            guard.register("b", NONE);
            let start = Arc::new(Barrier::new(2));

            let indexer = {
                let (guard, start) = (Arc::clone(&guard), Arc::clone(&start));
                thread::spawn(move || {
                    start.wait();
                    guard.register("a", ["b"])
                })
            };
            let remover = {
                let (guard, start) = (Arc::clone(&guard), Arc::clone(&start));
                thread::spawn(move || {
                    start.wait();
                    guard.remove("b")
                })
            };

            let indexed = indexer.join().unwrap();
            let removed = remover.join().unwrap();
            let index = guard.snapshot();

            match (indexed, removed) {
                // index first, then remove is refused
                (ResultCode::Ok, ResultCode::Fail) => {
                    assert!(index.contains("a") && index.contains("b"));
                    assert_eq!(index.len(), 2);
                }
                // remove first, then index is refused
                (ResultCode::Fail, ResultCode::Ok) => assert!(index.is_empty()),
                other => panic!("no serial order produces {:?}", other),
            }
        }
    }
}
