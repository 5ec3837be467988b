use std::{fmt, str::FromStr};

use crate::{
    animation::{ease::Ease, player::TransitionSpec, props::PropertySet},
    binder::list::{EntranceSpec, RowAnimation, SectionAnimations},
    foundation::error::{RevealError, RevealResult},
    input::listeners::ListenerKind,
    marquee::timeline::MarqueeConfig,
    trigger::{
        actions::{ToggleActions, TriggerMode},
        window::TriggerWindow,
    },
};

/// Catch-up time of scrubbed headings and rules.
const SCRUB_LAG_MS: f64 = 1000.0;

/// The section types a page is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Blog posts or projects, with the hover preview.
    ContentIndex,
    /// Education entries.
    Education,
    /// Work history.
    WorkExperience,
    /// Grid of technology tiles.
    ExtraTechList,
    /// Drifting technology marquee.
    TechList,
}

impl SectionKind {
    /// Every kind, in a stable order.
    pub const ALL: [SectionKind; 5] = [
        SectionKind::ContentIndex,
        SectionKind::Education,
        SectionKind::WorkExperience,
        SectionKind::ExtraTechList,
        SectionKind::TechList,
    ];

    /// Whether the section owns the floating preview panel.
    pub fn has_preview(self) -> bool {
        matches!(self, Self::ContentIndex)
    }

    /// Label given to row nodes.
    pub fn row_label(self) -> &'static str {
        match self {
            Self::ContentIndex | Self::Education | Self::WorkExperience => "list-item",
            Self::ExtraTechList => "tech",
            Self::TechList => "tech-row",
        }
    }

    /// Animations bound on every render of the section's rows.
    pub fn animations(self, marquee: &MarqueeConfig) -> RevealResult<SectionAnimations> {
        let mut listeners = vec![ListenerKind::Scroll, ListenerKind::Resize];
        if self.has_preview() {
            listeners.push(ListenerKind::PointerMove);
        }

        let (rows, heading, rule) = match self {
            Self::ContentIndex => (
                RowAnimation::Entrance(list_item(ToggleActions::REPLAY, 50.0, "top 90%", "top 75%")?),
                None,
                None,
            ),
            Self::Education => (
                RowAnimation::Entrance(list_item(
                    ToggleActions::PLAY_THEN_REVERSE,
                    50.0,
                    "top 90%",
                    "top 75%",
                )?),
                Some(heading("top 100%", "top 80%")?),
                Some(rule()?),
            ),
            Self::WorkExperience => (
                RowAnimation::Entrance(list_item(ToggleActions::REPLAY, 50.0, "top 90%", "top 75%")?),
                Some(heading("top 100%", "top 75%")?),
                Some(rule()?),
            ),
            Self::ExtraTechList => (
                RowAnimation::Entrance(list_item(
                    ToggleActions::PLAY_THEN_REVERSE,
                    20.0,
                    "top 80%",
                    "top 60%",
                )?),
                Some(heading("top 100%", "top 80%")?),
                Some(rule()?),
            ),
            Self::TechList => (
                RowAnimation::Marquee(marquee.clone()),
                Some(heading("top 95%", "top 75%")?),
                None,
            ),
        };

        let animations = SectionAnimations {
            rows,
            heading,
            rule,
            listeners,
        };
        animations.validate()?;
        Ok(animations)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::ContentIndex => "content_index",
            Self::Education => "education",
            Self::WorkExperience => "work_experience",
            Self::ExtraTechList => "extra_tech_list",
            Self::TechList => "tech_list",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| RevealError::validation(format!("unknown section kind '{s}'")))
    }
}

fn list_item(
    actions: ToggleActions,
    rise: f64,
    start: &str,
    end: &str,
) -> RevealResult<EntranceSpec> {
    Ok(EntranceSpec {
        transition: TransitionSpec::new("list-item", PropertySet::new().opacity(1.0).y(0.0))
            .from_state(PropertySet::new().opacity(0.0).y(rise))
            .duration_ms(1000.0)
            .ease(Ease::OutQuad)
            .reversible(true),
        window: TriggerWindow::parse(start, end)?,
        mode: TriggerMode::Toggle(actions),
    })
}

fn heading(start: &str, end: &str) -> RevealResult<EntranceSpec> {
    Ok(EntranceSpec {
        transition: TransitionSpec::new("heading", PropertySet::new().opacity(1.0).y(0.0))
            .from_state(PropertySet::new().opacity(0.0).y(50.0))
            .duration_ms(1000.0)
            .ease(Ease::InCubic),
        window: TriggerWindow::parse(start, end)?,
        mode: TriggerMode::Scrub {
            lag_ms: SCRUB_LAG_MS,
        },
    })
}

fn rule() -> RevealResult<EntranceSpec> {
    Ok(EntranceSpec {
        transition: TransitionSpec::new("rule", PropertySet::new().opacity(1.0).x(0.0))
            .from_state(PropertySet::new().opacity(0.0).x(400.0))
            .duration_ms(3000.0)
            .ease(Ease::OutQuad),
        window: TriggerWindow::parse("top 100%", "top 75%")?,
        mode: TriggerMode::Scrub {
            lag_ms: SCRUB_LAG_MS,
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/sections/presets.rs"]
mod tests;
