//! The floating image preview that follows the pointer over a list.

pub(crate) mod controller;
pub(crate) mod images;
