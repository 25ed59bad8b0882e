//! Server module — TCP front end for the dependency index.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           pkgindex serve                │
//! │  - one IndexGuard in memory             │
//! │  - TCP listener, thread per client      │
//! └─────────────────────────────────────────┘
//!           ▲
//!           │ INDEX|foo|bar,baz\n  ->  OK\n
//!           ▼
//! ┌─────────────────────────────────────────┐
//! │           clients                       │
//! │  - one request line at a time           │
//! │  - OK / FAIL / ERROR per line           │
//! └─────────────────────────────────────────┘
//! ```

pub mod listener;
pub mod protocol;
pub mod worker;

pub use listener::{bind, send_request, serve, start_server, Client};
pub use protocol::{decode, encode, Command, DecodeError, Request};
pub use worker::{dispatch, handle_client, serve_connection};
