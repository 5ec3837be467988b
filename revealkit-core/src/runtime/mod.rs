//! The page runtime tying sections, input and animation together.

pub(crate) mod page;
pub(crate) mod scenario;
