//! Terminal interaction helpers.

pub mod input;
