//! Host input: pointer tracking, per-frame coalescing and listener bookkeeping.

pub(crate) mod coalesce;
pub(crate) mod listeners;
pub(crate) mod pointer;
