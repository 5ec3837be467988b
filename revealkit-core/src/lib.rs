//! Revealkit is a headless orchestration layer for scroll- and pointer-driven reveal animations.
//!
//! A host feeds scroll, resize, pointer and hover events plus a monotonic clock into a [`Page`];
//! the page resolves which elements crossed their trigger windows, drives property transitions
//! on an in-memory node arena and keeps a floating preview panel glued to the pointer.
//!
//! # Model overview
//!
//! 1. **Stage**: a generational arena of nodes, each with a document-space layout box and a
//!    live [`Style`].
//! 2. **Transitions**: [`TransitionPlayer`] owns one track per node and property group; the last
//!    writer wins.
//! 3. **Triggers**: [`VisibilityTriggerRegistry`] maps scroll position to per-element
//!    [`TriggerEvent`]s and scrub progress, and dispatches them to [`TriggerHandler`]s.
//! 4. **Sections**: [`ListAnimationBinder`] binds a row collection to triggers and listeners as
//!    one [`BindingSession`]; [`PreviewRevealController`] and [`MarqueeTimeline`] add the
//!    hover preview and the pinned marquee.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded and deterministic**: the same event sequence and clock always produce the
//!   same styles.
//! - **Nothing leaks**: every animation, trigger and listener acquired for a section is released
//!   by disposing its session.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod animation;
mod binder;
mod config;
mod foundation;
mod input;
mod marquee;
mod preview;
mod runtime;
mod scene;
mod sections;
mod trigger;

pub use animation::ease::Ease;
pub use animation::player::{Direction, TransitionHandle, TransitionPlayer, TransitionSpec};
pub use animation::props::{Lerp, PropertyGroup, PropertySet};
pub use binder::list::{
    EntranceSpec, ListAnimationBinder, RowAnimation, SectionAnimations, SectionLayout,
};
pub use binder::session::{BindingSession, Disposable, Teardown};
pub use config::{RevealConfig, ViewportConfig};
pub use foundation::core::{Point, Rect, RowKey, SectionId, SessionId, Size, Vec2, ViewportMetrics};
pub use foundation::error::{RevealError, RevealResult};
pub use foundation::rng::Rng64;
pub use input::coalesce::{FrameInbox, FrameInput, InputEvent};
pub use input::listeners::{ListenerId, ListenerKind, ListenerSet};
pub use input::pointer::{HorizontalDirection, PointerMotion, PointerSample, PointerTracker};
pub use marquee::timeline::{MarqueeConfig, MarqueeHandler, MarqueeTimeline, RowDrift};
pub use preview::controller::{
    PreviewConfig, PreviewRevealController, PreviewState, clamp_panel_position,
};
pub use preview::images::{
    ImagePrefetcher, ImageTransform, NoopPrefetcher, PreviewImages, RecordingPrefetcher,
    resolve_image_url,
};
pub use runtime::page::{FrameReport, Page, PageSnapshot, SectionSnapshot, SectionSpec};
pub use runtime::scenario::{Replay, Scenario, ScriptAction, ScriptStep};
pub use scene::rows::RowData;
pub use scene::stage::{Node, NodeId, Stage, Style};
pub use sections::layout::{SectionRects, StackLayout};
pub use sections::links::{LinkOpener, LinkTarget, RecordingOpener};
pub use sections::presets::SectionKind;
pub use trigger::actions::{ToggleAction, ToggleActions, TriggerEvent, TriggerMode};
pub use trigger::handlers::{EntranceHandler, ScrubHandler};
pub use trigger::registry::{
    ElementState, TrackedElement, TriggerCx, TriggerHandle, TriggerHandler, TriggerReport,
    VisibilityTriggerRegistry,
};
pub use trigger::window::{Anchor, ScrollRange, TriggerPosition, TriggerWindow, Zone};
