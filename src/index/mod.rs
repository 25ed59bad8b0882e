//! Index module — the package dependency index and its lock guard.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  IndexGuard                             │
//! │  - one RwLock, shared by all clients    │
//! │  - register/remove: write lock          │
//! │  - query: read lock                     │
//! └─────────────────────────────────────────┘
//!           │
//!           ▼
//! ┌─────────────────────────────────────────┐
//! │  DependencyIndex                        │
//! │  - package -> dependency set            │
//! │  - no dangling dependency references    │
//! └─────────────────────────────────────────┘
//! ```

pub mod guard;
pub mod store;
pub mod types;

pub use guard::IndexGuard;
pub use store::DependencyIndex;
pub use types::{DependencySet, PackageName, ResultCode};
