//! In-memory adapter for tests.

mod store;

pub use store::InMemoryDonorStore;
