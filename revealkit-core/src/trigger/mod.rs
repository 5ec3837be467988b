//! Scroll-position triggers: window parsing, toggle actions, the registry and its stock handlers.

pub(crate) mod actions;
pub(crate) mod handlers;
pub(crate) mod registry;
pub(crate) mod window;
