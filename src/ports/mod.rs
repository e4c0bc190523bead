//! Ports - contracts between the core and its external collaborators.
//!
//! The data store is a hosted REST service exposing generic filtered reads
//! and updates over named collections; these traits are the only shape of
//! it the core depends on.

mod donation_status_writer;
mod donor_record_reader;

pub use donation_status_writer::DonationStatusWriter;
pub use donor_record_reader::DonorRecordReader;
