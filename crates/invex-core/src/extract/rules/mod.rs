//! Pattern rules shared by the field extractors.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::parse_amount;
pub use dates::{normalize_english, normalize_german};
pub use patterns::*;
