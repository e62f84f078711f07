//! Concrete logger collaborators for the notification validator.

pub mod in_memory;
pub mod logging;
