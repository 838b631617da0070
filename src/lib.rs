//! Followup: task lifecycle and query engine.
//!
//! This crate tracks units of work that carry a feedback date, may be
//! postponed with a recorded reason, and become overdue once that date has
//! passed without completion.
//!
//! # Architecture
//!
//! Followup follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, identity)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, overdue evaluation and listings

pub mod task;
