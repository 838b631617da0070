//! In-memory adapters for task lifecycle tests and single-process embedding.

mod identity;
mod task;

pub use identity::StaticIdentityProvider;
pub use task::InMemoryTaskRepository;
