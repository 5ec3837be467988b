//! Pinned, scroll-scrubbed horizontal drift of alternating rows.

pub(crate) mod timeline;
