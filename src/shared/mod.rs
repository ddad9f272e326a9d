//! Helpers shared by the individual checks

pub mod patterns;
