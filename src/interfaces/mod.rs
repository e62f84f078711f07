//! Batch interfaces for replaying captured callbacks.

pub mod csv;
