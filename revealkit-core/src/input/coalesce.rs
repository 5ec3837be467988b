use crate::input::pointer::PointerSample;

/// Raw host event, as delivered between two frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    /// Document scrolled to `y`.
    Scroll {
        /// New scroll offset.
        y: f64,
    },
    /// Viewport or document resized.
    Resize {
        /// Viewport width.
        width: f64,
        /// Viewport height.
        height: f64,
        /// Document height.
        document_height: f64,
    },
    /// Pointer moved.
    PointerMove(PointerSample),
}

/// Latest-wins view of everything that arrived during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize)]
pub struct FrameInput {
    /// Last scroll offset, if the document scrolled.
    pub scroll_y: Option<f64>,
    /// Last `(width, height, document_height)`, if a resize happened.
    pub resize: Option<(f64, f64, f64)>,
    /// Last pointer sample.
    pub pointer: Option<PointerSample>,
    /// Number of raw events folded into this frame.
    pub coalesced: u32,
}

impl FrameInput {
    /// Whether nothing arrived.
    pub fn is_empty(&self) -> bool {
        self.coalesced == 0
    }
}

/// Collects raw events between frames so recomputation happens at most once per frame.
#[derive(Debug, Default)]
pub struct FrameInbox {
    pending: FrameInput,
}

impl FrameInbox {
    /// Empty inbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw event. Later events of the same kind replace earlier ones.
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::Scroll { y } => self.pending.scroll_y = Some(y),
            InputEvent::Resize {
                width,
                height,
                document_height,
            } => self.pending.resize = Some((width, height, document_height)),
            InputEvent::PointerMove(sample) => self.pending.pointer = Some(sample),
        }
        self.pending.coalesced += 1;
    }

    /// Take what accumulated and reset for the next frame.
    pub fn drain(&mut self) -> FrameInput {
        std::mem::take(&mut self.pending)
    }

    /// Whether any events arrived since the last drain.
    pub fn has_events(&self) -> bool {
        !self.pending.is_empty()
    }
}
