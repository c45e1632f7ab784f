//! Orchestration library behind the `unify` binary.
//!
//! [`pipeline`] wires the loader, reader, merge engine, audit checks and
//! SQLite sink together; [`logging`] installs the tracing subscriber.

#![allow(missing_docs)]

pub mod logging;
pub mod pipeline;
pub mod types;
