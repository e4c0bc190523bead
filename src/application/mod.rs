//! Application layer - use-case handlers composing ports and domain logic.

pub mod handlers;
