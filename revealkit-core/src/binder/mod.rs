//! Binding sessions: per-render registrations of a section's rows, heading and rule.

pub(crate) mod list;
pub(crate) mod session;
