//! Domain records for the hotel schema.
//!
//! # Invariants
//! - Records are plain data; persistence lives in `repo`.
//! - Every write path runs the record's `validate()` first.

pub mod hotel;
