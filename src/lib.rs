//! Hemotrack - Donation Status Resolution & Eligibility Engine
//!
//! Reconciles the independently-written records of a blood donation cycle
//! (donations, status history, clinical eligibility, blood bank inventory,
//! blood collection) into one authoritative pipeline position per donor,
//! and computes when that donor may donate again.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
