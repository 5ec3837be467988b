//! Section presets, their stacked layout and link click-through.

pub(crate) mod layout;
pub(crate) mod links;
pub(crate) mod presets;
