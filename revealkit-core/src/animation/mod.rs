pub(crate) mod ease;
pub(crate) mod player;
pub(crate) mod props;
