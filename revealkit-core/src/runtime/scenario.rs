use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use crate::{
    config::RevealConfig,
    foundation::{
        core::{RowKey, SectionId},
        error::{RevealError, RevealResult},
    },
    runtime::page::{FrameReport, Page, SectionSpec},
    scene::rows::RowData,
    sections::links::{LinkTarget, RecordingOpener},
};

fn default_frame_ms() -> f64 {
    16.0
}

fn default_settle_ms() -> f64 {
    2000.0
}

/// One scripted host event. `section` is the index of the section in [`Scenario::sections`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptAction {
    /// Scroll to an absolute offset.
    Scroll {
        /// Target offset.
        y: f64,
    },
    /// Resize the viewport.
    Resize {
        /// Viewport width.
        width: f64,
        /// Viewport height.
        height: f64,
    },
    /// Move the pointer, in document coordinates.
    Pointer {
        /// Document x.
        x: f64,
        /// Document y.
        y: f64,
    },
    /// Pointer entered a row.
    Hover {
        /// Section index.
        section: usize,
        /// Row key.
        row: RowKey,
    },
    /// Pointer left a list.
    Leave {
        /// Section index.
        section: usize,
    },
    /// Click-through on a row.
    Activate {
        /// Section index.
        section: usize,
        /// Row key.
        row: RowKey,
    },
    /// Replace a section's rows.
    SetRows {
        /// Section index.
        section: usize,
        /// New rows.
        rows: Vec<RowData>,
    },
    /// Unmount a section.
    Unmount {
        /// Section index.
        section: usize,
    },
}

impl ScriptAction {
    fn section(&self) -> Option<usize> {
        match self {
            Self::Hover { section, .. }
            | Self::Leave { section }
            | Self::Activate { section, .. }
            | Self::SetRows { section, .. }
            | Self::Unmount { section } => Some(*section),
            Self::Scroll { .. } | Self::Resize { .. } | Self::Pointer { .. } => None,
        }
    }
}

/// A scripted action and the time it happens at.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptStep {
    /// Time of the action. Applied before the first frame at or after it.
    pub at_ms: f64,
    /// What happens.
    #[serde(flatten)]
    pub action: ScriptAction,
}

/// A page description plus a timed event script, replayed at a fixed frame interval.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    /// Page configuration.
    #[serde(default)]
    pub config: RevealConfig,
    /// Sections mounted at time zero, top to bottom.
    pub sections: Vec<SectionSpec>,
    /// Timed events.
    #[serde(default)]
    pub script: Vec<ScriptStep>,
    /// Frame interval.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    /// How long to keep producing frames after the last scripted event.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: f64,
}

impl Scenario {
    /// Parse JSON and validate.
    pub fn from_json_str(s: &str) -> RevealResult<Self> {
        let scenario: Self = serde_json::from_str(s)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Read JSON from `reader` and validate.
    pub fn from_reader(reader: impl Read) -> RevealResult<Self> {
        let scenario: Self = serde_json::from_reader(reader)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario file.
    pub fn from_path(path: impl AsRef<Path>) -> RevealResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RevealError::validation(format!("open scenario JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Structural checks. Section contents are checked when mounted.
    pub fn validate(&self) -> RevealResult<()> {
        self.config.validate()?;
        if !self.frame_ms.is_finite() || self.frame_ms <= 0.0 {
            return Err(RevealError::validation("frame_ms must be finite and > 0"));
        }
        if !self.settle_ms.is_finite() || self.settle_ms < 0.0 {
            return Err(RevealError::validation("settle_ms must be finite and >= 0"));
        }
        for (i, step) in self.script.iter().enumerate() {
            if !step.at_ms.is_finite() || step.at_ms < 0.0 {
                return Err(RevealError::validation(format!(
                    "script[{i}]: at_ms must be finite and >= 0"
                )));
            }
            if let Some(section) = step.action.section()
                && section >= self.sections.len()
            {
                return Err(RevealError::validation(format!(
                    "script[{i}]: section {section} out of range ({} sections)",
                    self.sections.len()
                )));
            }
        }
        Ok(())
    }

    /// Time of the last frame.
    pub fn duration_ms(&self) -> f64 {
        let last = self.script.iter().map(|s| s.at_ms).fold(0.0, f64::max);
        last + self.settle_ms
    }
}

/// Drives a [`Page`] through a [`Scenario`], one frame per [`step`](Replay::step).
#[derive(Debug)]
pub struct Replay {
    page: Page,
    ids: Vec<SectionId>,
    script: Vec<ScriptStep>,
    cursor: usize,
    frame_ms: f64,
    duration_ms: f64,
    next_frame_ms: f64,
    opener: RecordingOpener,
}

impl Replay {
    /// Validate `scenario`, build its page and mount every section. No frame runs yet.
    pub fn new(scenario: &Scenario) -> RevealResult<Self> {
        scenario.validate()?;
        let mut page = Page::new(scenario.config.clone())?;
        let ids = scenario
            .sections
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                page.mount(spec.clone())
                    .map_err(|e| RevealError::validation(format!("sections[{i}]: {e}")))
            })
            .collect::<RevealResult<Vec<_>>>()?;

        let mut script = scenario.script.clone();
        script.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));

        Ok(Self {
            page,
            ids,
            script,
            cursor: 0,
            frame_ms: scenario.frame_ms,
            duration_ms: scenario.duration_ms(),
            next_frame_ms: 0.0,
            opener: RecordingOpener::default(),
        })
    }

    /// Apply the actions due by the next frame time and run that frame. `None` once the scenario
    /// is over.
    pub fn step(&mut self) -> Option<FrameReport> {
        let now_ms = self.next_frame_ms;
        if now_ms > self.duration_ms {
            return None;
        }
        while let Some(step) = self.script.get(self.cursor)
            && step.at_ms <= now_ms
        {
            let action = step.action.clone();
            self.cursor += 1;
            self.apply(action, now_ms);
        }
        self.next_frame_ms += self.frame_ms;
        Some(self.page.frame(now_ms))
    }

    /// Run every remaining frame, returning the last report.
    pub fn run_to_end(&mut self) -> Option<FrameReport> {
        let mut last = None;
        while let Some(report) = self.step() {
            last = Some(report);
        }
        last
    }

    fn apply(&mut self, action: ScriptAction, now_ms: f64) {
        let id = action.section().and_then(|i| self.ids.get(i).copied());
        match (action, id) {
            (ScriptAction::Scroll { y }, _) => self.page.scroll_to(y),
            (ScriptAction::Resize { width, height }, _) => self.page.resize(width, height),
            (ScriptAction::Pointer { x, y }, _) => self.page.pointer_move(x, y, now_ms),
            (ScriptAction::Hover { row, .. }, Some(id)) => {
                if !self.page.hover_row(id, &row) {
                    tracing::warn!(%id, %row, "hover ignored");
                }
            }
            (ScriptAction::Leave { .. }, Some(id)) => {
                self.page.leave_list(id);
            }
            (ScriptAction::Activate { row, .. }, Some(id)) => {
                self.page.activate_row(id, &row, &mut self.opener);
            }
            (ScriptAction::SetRows { rows, .. }, Some(id)) => {
                if let Err(err) = self.page.set_rows(id, rows) {
                    tracing::warn!(%id, %err, "set_rows rejected");
                }
            }
            (ScriptAction::Unmount { .. }, Some(id)) => {
                self.page.unmount(id);
            }
            (action, None) => tracing::warn!(?action, "action targets no section"),
        }
    }

    /// The page being driven.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Ids of the scenario's sections, in scenario order.
    pub fn section_ids(&self) -> &[SectionId] {
        &self.ids
    }

    /// Links opened by `activate` actions so far.
    pub fn opened(&self) -> &[(String, LinkTarget)] {
        &self.opener.opened
    }

    /// Total number of frames the scenario produces.
    pub fn frame_count(&self) -> u64 {
        (self.duration_ms / self.frame_ms).floor() as u64 + 1
    }
}
