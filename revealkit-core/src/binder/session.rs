use crate::{
    animation::player::TransitionPlayer,
    foundation::core::{SectionId, SessionId},
    input::listeners::{ListenerId, ListenerSet},
    scene::stage::Stage,
    trigger::registry::{TriggerHandle, VisibilityTriggerRegistry},
};

/// Mutable state a session needs to release what it acquired.
pub struct Teardown<'a> {
    /// Node arena.
    pub stage: &'a mut Stage,
    /// Transition player.
    pub player: &'a mut TransitionPlayer,
    /// Trigger registry.
    pub registry: &'a mut VisibilityTriggerRegistry,
    /// Host listeners.
    pub listeners: &'a mut ListenerSet,
}

/// Something a session acquired and must release on dispose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Disposable {
    /// A trigger registration; its handler reverts the transitions it bound.
    Trigger(TriggerHandle),
    /// A host event listener.
    Listener(ListenerId),
}

/// All registrations and listeners of one render of a list.
///
/// Disposing releases everything in reverse acquisition order. Dropping a session that was never
/// disposed leaks its registrations and is logged.
#[derive(Debug)]
pub struct BindingSession {
    id: SessionId,
    owner: SectionId,
    identity: u64,
    disposables: Vec<Disposable>,
    disposed: bool,
}

impl BindingSession {
    pub(crate) fn new(id: SessionId, owner: SectionId, identity: u64) -> Self {
        Self {
            id,
            owner,
            identity,
            disposables: Vec::new(),
            disposed: false,
        }
    }

    pub(crate) fn push(&mut self, disposable: Disposable) {
        self.disposables.push(disposable);
    }

    /// Release everything. A second call does nothing.
    #[tracing::instrument(level = "debug", skip_all, fields(session = self.id.0, owner = %self.owner))]
    pub fn dispose(&mut self, td: &mut Teardown<'_>) -> usize {
        if self.disposed {
            return 0;
        }
        self.disposed = true;
        let mut released = 0;
        while let Some(d) = self.disposables.pop() {
            let hit = match d {
                Disposable::Trigger(h) => td.registry.unregister(h, td.stage, td.player),
                Disposable::Listener(id) => td.listeners.release(id),
            };
            released += usize::from(hit);
        }
        tracing::debug!(released, "session disposed");
        released
    }

    /// Session id.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Owning section.
    pub fn owner(&self) -> SectionId {
        self.owner
    }

    /// Identity hash of the row collection this session was built for.
    pub fn identity(&self) -> u64 {
        self.identity
    }

    /// Outstanding registrations and listeners.
    pub fn disposables(&self) -> &[Disposable] {
        &self.disposables
    }

    /// Number of this session's registrations still held by `registry`.
    ///
    /// Registrations the registry dropped for detached nodes are not counted.
    pub fn trigger_count(&self, registry: &VisibilityTriggerRegistry) -> usize {
        self.disposables
            .iter()
            .filter(|d| matches!(d, Disposable::Trigger(h) if registry.contains(*h)))
            .count()
    }

    /// Number of outstanding listeners.
    pub fn listener_count(&self) -> usize {
        self.disposables
            .iter()
            .filter(|d| matches!(d, Disposable::Listener(_)))
            .count()
    }

    /// Whether [`dispose`](Self::dispose) ran.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for BindingSession {
    fn drop(&mut self) {
        if !self.disposed && !self.disposables.is_empty() {
            tracing::warn!(
                session = self.id.0,
                owner = %self.owner,
                outstanding = self.disposables.len(),
                "binding session dropped without dispose"
            );
        }
    }
}
