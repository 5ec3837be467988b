use std::{fmt, str::FromStr};

use crate::foundation::error::RevealError;

/// What a trigger does to its transition when a threshold is crossed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleAction {
    /// Run forward from the current position.
    Play,
    /// Freeze.
    Pause,
    /// Lift a pause and continue in the current direction.
    Resume,
    /// Run backwards from the current position.
    Reverse,
    /// Jump to the start and run forward.
    Restart,
    /// Jump to the start and freeze.
    Reset,
    /// Jump to the end and freeze.
    Complete,
    /// Do nothing.
    None,
}

impl FromStr for ToggleAction {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "play" => Self::Play,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "reverse" => Self::Reverse,
            "restart" => Self::Restart,
            "reset" => Self::Reset,
            "complete" => Self::Complete,
            "none" => Self::None,
            other => {
                return Err(RevealError::trigger(format!(
                    "unknown toggle action '{other}'"
                )));
            }
        })
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reverse => "reverse",
            Self::Restart => "restart",
            Self::Reset => "reset",
            Self::Complete => "complete",
            Self::None => "none",
        })
    }
}

/// Threshold crossings reported by the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TriggerEvent {
    /// `start` crossed scrolling forward.
    Enter,
    /// `end` crossed scrolling forward.
    Leave,
    /// `end` crossed scrolling backward.
    EnterBack,
    /// `start` crossed scrolling backward.
    LeaveBack,
}

/// One action per crossing, written `"onEnter onLeave onEnterBack onLeaveBack"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToggleActions {
    /// Action for [`TriggerEvent::Enter`].
    pub on_enter: ToggleAction,
    /// Action for [`TriggerEvent::Leave`].
    pub on_leave: ToggleAction,
    /// Action for [`TriggerEvent::EnterBack`].
    pub on_enter_back: ToggleAction,
    /// Action for [`TriggerEvent::LeaveBack`].
    pub on_leave_back: ToggleAction,
}

impl ToggleActions {
    /// Play on entry from either side, reverse when scrolled back above the window.
    pub const REPLAY: Self = Self {
        on_enter: ToggleAction::Play,
        on_leave: ToggleAction::None,
        on_enter_back: ToggleAction::Play,
        on_leave_back: ToggleAction::Reverse,
    };

    /// Play on entry from above, reverse when scrolling back up into the window.
    ///
    /// Leaving above the window does nothing, so the next entry from above plays again.
    pub const PLAY_THEN_REVERSE: Self = Self {
        on_enter: ToggleAction::Play,
        on_leave: ToggleAction::None,
        on_enter_back: ToggleAction::Reverse,
        on_leave_back: ToggleAction::None,
    };

    /// Action configured for `event`.
    pub fn action_for(&self, event: TriggerEvent) -> ToggleAction {
        match event {
            TriggerEvent::Enter => self.on_enter,
            TriggerEvent::Leave => self.on_leave,
            TriggerEvent::EnterBack => self.on_enter_back,
            TriggerEvent::LeaveBack => self.on_leave_back,
        }
    }
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self {
            on_enter: ToggleAction::Play,
            on_leave: ToggleAction::None,
            on_enter_back: ToggleAction::None,
            on_leave_back: ToggleAction::None,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let parts: Vec<&str> = lower.split_whitespace().collect();
        let [on_enter, on_leave, on_enter_back, on_leave_back] = parts.as_slice() else {
            return Err(RevealError::trigger(format!(
                "toggle actions '{s}' must name exactly four actions"
            )));
        };
        Ok(Self {
            on_enter: on_enter.parse()?,
            on_leave: on_leave.parse()?,
            on_enter_back: on_enter_back.parse()?,
            on_leave_back: on_leave_back.parse()?,
        })
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter, self.on_leave, self.on_enter_back, self.on_leave_back
        )
    }
}

impl TryFrom<String> for ToggleActions {
    type Error = RevealError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToggleActions> for String {
    fn from(value: ToggleActions) -> Self {
        value.to_string()
    }
}

/// How a registered element reacts to scrolling.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Fire discrete actions on threshold crossings.
    Toggle(ToggleActions),
    /// Follow scroll progress through the window; the playhead catches up over `lag_ms`.
    Scrub {
        /// Catch-up time in milliseconds; `0` follows scroll exactly.
        lag_ms: f64,
    },
}
