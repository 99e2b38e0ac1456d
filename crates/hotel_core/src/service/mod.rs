//! Use-case services behind the menu actions.
//!
//! # Responsibility
//! - Combine repository writes, lookups and reports into one call per action.
//! - Keep the CLI free of storage details.

pub mod hotel_service;
