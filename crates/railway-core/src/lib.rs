//! # railway-core
//!
//! Disjoint success/failure container with short-circuit composition.
//!
//! An [`Either<V, E>`](Either) holds a value or an error. Producer steps
//! written as `async` blocks compose other Eithers through their [`Scope`]:
//! a successful nested Either yields its value, a failed one ends the
//! enclosing step with the same error. Later steps never run.
//!
//! This crate is platform-agnostic and has no dependencies. Executors and
//! timers for Eithers suspended on foreign futures live in
//! `railway-runtime`.
//!
//! ## Modules
//!
//! - `either` - The container and its production driver
//! - `state` - Container state enum
//! - `borrow` - Null-checkable borrowed views
//! - `production` - Pending production and the composition scope
//! - `compose` - Propagating and pass-through composition
//! - `interop` - Awaiting an Either from foreign async code
//! - `error` - Tagged error payload and `Outcome` alias
//! - `waker` - No-op waker for eager starts
//! - `kprint` - Kernel-style debug printing macros
//! - `env` - Environment variable utilities

pub mod either;
pub mod state;
pub mod borrow;
pub mod production;
pub mod compose;
pub mod interop;
pub mod error;
pub mod waker;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use either::Either;
pub use state::EitherState;
pub use borrow::{Borrowed, BorrowedMut};
pub use production::Scope;
pub use compose::{foreign, Compose, Foreign, Propagate, PropagateRef};
pub use interop::{Interop, InteropRef};
pub use error::{Error, ErrorTag, Outcome};
pub use waker::noop_waker;
pub use env::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set};
