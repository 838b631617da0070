//! Task lifecycle and query engine.
//!
//! Tasks are created `ONGOING` with a feedback date, may be postponed with a
//! recorded reason (becoming `DELAYED`), and are finished by completion,
//! which is terminal. Overdue status is derived on every read from the
//! feedback date, the status and the current calendar day. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - The caller-facing boundary in [`api`]

pub mod adapters;
pub mod api;
pub mod domain;
pub mod ports;
pub mod services;
