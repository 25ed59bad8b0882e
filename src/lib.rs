//! # pkg-index
//!
//! A network-accessible index of software packages and their dependencies.
//!
//! Clients speak a one-line text protocol over TCP to register a package
//! with its dependencies, ask whether a package is registered, or remove
//! it. The index never holds a dependency on an unregistered package, no
//! matter how many clients mutate it at once.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pkgindex::{send_request, start_server, ResultCode, ServerConfig};
//!
//! // In one process: serve forever on the configured address.
//! start_server(&ServerConfig::default())?;
//!
//! // In another: register a package with no dependencies.
//! let code = send_request("127.0.0.1:8080", "INDEX|bar|")?;
//! assert_eq!(code, ResultCode::Ok);
//! # Ok::<(), pkgindex::IndexError>(())
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod server;

// Re-exports for convenience
pub use config::ServerConfig;
pub use error::{IndexError, Result};
pub use index::{DependencyIndex, DependencySet, IndexGuard, PackageName, ResultCode};
pub use server::{
    decode, encode, send_request, serve, start_server, Client, Command, DecodeError, Request,
};
