use std::collections::BTreeMap;

use crate::foundation::core::SectionId;

/// Kind of host event a listener subscribes to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ListenerKind {
    /// Document scroll.
    Scroll,
    /// Viewport resize.
    Resize,
    /// Pointer movement over the document.
    PointerMove,
}

/// Handle of one acquired listener.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ListenerId(u64);

/// Host event subscriptions, each owned by one section.
///
/// Events of a kind are routed only to sections holding a listener of that kind, so a section that
/// released its listeners stops receiving events in the same step.
#[derive(Debug, Default)]
pub struct ListenerSet {
    next_id: u64,
    live: BTreeMap<ListenerId, (ListenerKind, SectionId)>,
}

impl ListenerSet {
    /// No listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `owner` to `kind`.
    pub fn acquire(&mut self, kind: ListenerKind, owner: SectionId) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.live.insert(id, (kind, owner));
        tracing::trace!(?id, ?kind, %owner, "listener acquired");
        id
    }

    /// Unsubscribe. Releasing an unknown or already released listener is a no-op.
    pub fn release(&mut self, id: ListenerId) -> bool {
        self.live.remove(&id).is_some()
    }

    /// Sections subscribed to `kind`, in ascending order, without duplicates.
    pub fn owners(&self, kind: ListenerKind) -> Vec<SectionId> {
        let mut owners: Vec<SectionId> = self
            .live
            .values()
            .filter(|(k, _)| *k == kind)
            .map(|(_, owner)| *owner)
            .collect();
        owners.sort();
        owners.dedup();
        owners
    }

    /// Number of live listeners of `kind`.
    pub fn count(&self, kind: ListenerKind) -> usize {
        self.live.values().filter(|(k, _)| *k == kind).count()
    }

    /// Number of live listeners owned by `owner`.
    pub fn owned_by(&self, owner: SectionId) -> usize {
        self.live.values().filter(|(_, o)| *o == owner).count()
    }

    /// Number of live listeners.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no listener is live.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}
