use crate::{
    animation::player::TransitionSpec,
    binder::session::{BindingSession, Disposable, Teardown},
    foundation::{
        core::{RowKey, SectionId, SessionId},
        error::{RevealError, RevealResult},
        math::Fnv1a64,
    },
    input::listeners::ListenerKind,
    marquee::timeline::{MarqueeConfig, MarqueeHandler},
    scene::stage::NodeId,
    trigger::{
        actions::TriggerMode,
        handlers::{EntranceHandler, ScrubHandler},
        registry::TriggerHandler,
        window::TriggerWindow,
    },
};

/// Nodes of one mounted section.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct SectionLayout {
    /// Section container; pinned by marquee timelines.
    pub container: Option<NodeId>,
    /// Horizontal rule above the heading.
    pub rule: Option<NodeId>,
    /// Section heading.
    pub heading: Option<NodeId>,
    /// Rows, in display order.
    pub rows: Vec<(RowKey, NodeId)>,
}

impl SectionLayout {
    /// Identity of the row collection: the ordered row keys.
    pub fn identity(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u64(self.rows.len() as u64);
        for (key, _) in &self.rows {
            h.write_str(key.as_str());
        }
        h.finish()
    }
}

/// A transition together with the trigger that drives it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EntranceSpec {
    /// What to animate.
    pub transition: TransitionSpec,
    /// When to animate it.
    pub window: TriggerWindow,
    /// Toggle actions or scrub.
    pub mode: TriggerMode,
}

impl EntranceSpec {
    /// Check the transition.
    pub fn validate(&self) -> RevealResult<()> {
        self.transition.validate()?;
        if let TriggerMode::Scrub { lag_ms } = self.mode
            && (!lag_ms.is_finite() || lag_ms < 0.0)
        {
            return Err(RevealError::validation(format!(
                "{}: scrub lag must be >= 0",
                self.transition.name
            )));
        }
        Ok(())
    }
}

/// How the rows of a section animate.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowAnimation {
    /// Each row registers individually with this entrance.
    Entrance(EntranceSpec),
    /// One pinned timeline drifts all rows.
    Marquee(MarqueeConfig),
}

/// Everything a section binds on each render of its rows.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionAnimations {
    /// Row animation.
    pub rows: RowAnimation,
    /// Heading entrance, registered once per session.
    #[serde(default)]
    pub heading: Option<EntranceSpec>,
    /// Rule entrance, registered once per session.
    #[serde(default)]
    pub rule: Option<EntranceSpec>,
    /// Host events the section listens to while bound.
    #[serde(default)]
    pub listeners: Vec<ListenerKind>,
}

impl SectionAnimations {
    /// Check every spec.
    pub fn validate(&self) -> RevealResult<()> {
        match &self.rows {
            RowAnimation::Entrance(spec) => spec.validate()?,
            RowAnimation::Marquee(config) => config.validate()?,
        }
        for spec in [&self.heading, &self.rule].into_iter().flatten() {
            spec.validate()?;
        }
        Ok(())
    }
}

/// Binds a section's animations to its current rows and rebuilds them when the rows change.
///
/// At most one session is live at a time. A new row collection disposes the live session before
/// the next one is built, and a build that fails part way disposes what it had acquired.
#[derive(Debug)]
pub struct ListAnimationBinder {
    owner: SectionId,
    animations: SectionAnimations,
    live: Option<BindingSession>,
    sessions_built: u64,
}

impl ListAnimationBinder {
    /// Binder for section `owner`.
    pub fn new(owner: SectionId, animations: SectionAnimations) -> RevealResult<Self> {
        animations.validate()?;
        Ok(Self {
            owner,
            animations,
            live: None,
            sessions_built: 0,
        })
    }

    /// Dispose the live session and bind `layout` afresh.
    ///
    /// Elements already inside their window enter immediately.
    #[tracing::instrument(level = "debug", skip_all, fields(owner = %self.owner, rows = layout.rows.len()))]
    pub fn bind(&mut self, td: &mut Teardown<'_>, layout: &SectionLayout) -> RevealResult<SessionId> {
        self.dispose(td);

        self.sessions_built += 1;
        let id = SessionId(self.sessions_built);
        let mut session = BindingSession::new(id, self.owner, layout.identity());

        if let Err(err) = self.build(td, layout, &mut session) {
            session.dispose(td);
            tracing::warn!(%err, "binding failed, partial session disposed");
            return Err(err);
        }

        let report = td.registry.sync(td.stage, td.player);
        tracing::debug!(
            triggers = session.trigger_count(td.registry),
            listeners = session.listener_count(),
            entered = report.events,
            "session bound"
        );
        self.live = Some(session);
        Ok(id)
    }

    /// Rebind only if the row collection identity differs from the live session's.
    pub fn rebind_if_changed(
        &mut self,
        td: &mut Teardown<'_>,
        layout: &SectionLayout,
    ) -> RevealResult<bool> {
        if self
            .live
            .as_ref()
            .is_some_and(|s| s.identity() == layout.identity())
        {
            return Ok(false);
        }
        self.bind(td, layout)?;
        Ok(true)
    }

    fn build(
        &self,
        td: &mut Teardown<'_>,
        layout: &SectionLayout,
        session: &mut BindingSession,
    ) -> RevealResult<()> {
        for &kind in &self.animations.listeners {
            session.push(Disposable::Listener(td.listeners.acquire(kind, self.owner)));
        }

        if let (Some(spec), Some(node)) = (&self.animations.rule, layout.rule) {
            register_entrance(td, session, format!("{}/rule", self.owner), node, spec)?;
        }
        if let (Some(spec), Some(node)) = (&self.animations.heading, layout.heading) {
            register_entrance(td, session, format!("{}/heading", self.owner), node, spec)?;
        }

        match &self.animations.rows {
            RowAnimation::Entrance(spec) => {
                for (key, node) in &layout.rows {
                    register_entrance(td, session, format!("{}/{key}", self.owner), *node, spec)?;
                }
            }
            RowAnimation::Marquee(config) => {
                let Some(container) = layout.container else {
                    return Err(RevealError::validation(format!(
                        "{}: marquee needs a container node",
                        self.owner
                    )));
                };
                td.stage.require(container)?;
                let nodes: Vec<NodeId> = layout.rows.iter().map(|(_, n)| *n).collect();
                for node in &nodes {
                    td.stage.require(*node)?;
                }
                let handler = MarqueeHandler::attach(td.stage, td.player, config, container, &nodes);
                let h = td.registry.register(
                    format!("{}/marquee", self.owner),
                    container,
                    config.window(),
                    TriggerMode::Scrub {
                        lag_ms: config.lag_ms,
                    },
                    Box::new(handler),
                );
                session.push(Disposable::Trigger(h));
            }
        }
        Ok(())
    }

    /// Dispose the live session, if any. Safe to call repeatedly.
    pub fn dispose(&mut self, td: &mut Teardown<'_>) {
        if let Some(mut session) = self.live.take() {
            session.dispose(td);
        }
    }

    /// The live session.
    pub fn session(&self) -> Option<&BindingSession> {
        self.live.as_ref()
    }

    /// Owning section.
    pub fn owner(&self) -> SectionId {
        self.owner
    }

    /// Bound animations.
    pub fn animations(&self) -> &SectionAnimations {
        &self.animations
    }

    /// Sessions built so far, including failed ones.
    pub fn sessions_built(&self) -> u64 {
        self.sessions_built
    }
}

fn register_entrance(
    td: &mut Teardown<'_>,
    session: &mut BindingSession,
    key: String,
    node: NodeId,
    spec: &EntranceSpec,
) -> RevealResult<()> {
    td.stage.require(node)?;
    let bound = td.player.attach(td.stage, node, &spec.transition);
    let handler: Box<dyn TriggerHandler> = match spec.mode {
        TriggerMode::Toggle(actions) => {
            Box::new(EntranceHandler::new(spec.transition.clone(), actions, bound))
        }
        TriggerMode::Scrub { lag_ms } => {
            Box::new(ScrubHandler::new(spec.transition.clone(), lag_ms, bound))
        }
    };
    let h = td.registry.register(key, node, spec.window, spec.mode, handler);
    session.push(Disposable::Trigger(h));
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/binder/list.rs"]
mod tests;
