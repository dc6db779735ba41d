//! Uniform Request: a terminal form for uniform orders
//!
//! Users pick an applicant, facility, uniform pattern, uniform and size from
//! cascading dropdowns backed by plain CSV master files, collect several line
//! items, then submit them as a CSV export and a plain-text summary.

pub mod cli;
pub mod core;
