//! Data-store adapter for the hosted REST backend.
//!
//! The five source tables live in a hosted document store exposed over
//! REST. This adapter owns the wire format: raw records come back as
//! loosely-typed JSON and are normalized exactly once, here, into the
//! domain's closed enums.

mod raw;
mod rest;

pub use rest::{DatastoreConfig, DatastoreRestAdapter};
