//! Configuration and record data models.

pub mod config;
pub mod record;
