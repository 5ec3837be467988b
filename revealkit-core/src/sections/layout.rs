use crate::{
    foundation::{
        core::Rect,
        error::{RevealError, RevealResult},
    },
    sections::presets::SectionKind,
};

/// Vertical stacking metrics used to lay out sections without a browser.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StackLayout {
    /// Space above and below each section's content.
    pub padding: f64,
    /// Height of the horizontal rule.
    pub rule_height: f64,
    /// Height of the section heading.
    pub heading_height: f64,
    /// Height of a list row.
    pub row_height: f64,
    /// Height of a marquee row.
    pub marquee_row_height: f64,
    /// Height of a tile in tile grids.
    pub tile_height: f64,
    /// Tiles per grid line.
    pub tile_columns: usize,
    /// Gap between grid lines and between heading and rows.
    pub gap: f64,
}

impl Default for StackLayout {
    fn default() -> Self {
        Self {
            padding: 40.0,
            rule_height: 2.0,
            heading_height: 96.0,
            row_height: 140.0,
            marquee_row_height: 120.0,
            tile_height: 100.0,
            tile_columns: 4,
            gap: 16.0,
        }
    }
}

/// Rectangles of one section, in document coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SectionRects {
    /// Whole section.
    pub container: Rect,
    /// Rule, for kinds that have one.
    pub rule: Option<Rect>,
    /// Heading.
    pub heading: Rect,
    /// One rectangle per row.
    pub rows: Vec<Rect>,
}

impl StackLayout {
    /// Check that every extent is positive.
    pub fn validate(&self) -> RevealResult<()> {
        let extents = [
            self.padding,
            self.rule_height,
            self.heading_height,
            self.row_height,
            self.marquee_row_height,
            self.tile_height,
            self.gap,
        ];
        if extents.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(RevealError::config("layout extents must be finite and >= 0"));
        }
        if self.tile_columns == 0 {
            return Err(RevealError::config("tile_columns must be > 0"));
        }
        Ok(())
    }

    /// Lay out a section of `kind` with `rows` rows starting at document offset `top`.
    pub fn measure(&self, kind: SectionKind, top: f64, width: f64, rows: usize) -> SectionRects {
        let mut y = top + self.padding;

        let rule = match kind {
            SectionKind::Education | SectionKind::WorkExperience | SectionKind::ExtraTechList => {
                let r = Rect::new(0.0, y, width, y + self.rule_height);
                y = r.y1 + self.gap;
                Some(r)
            }
            SectionKind::ContentIndex | SectionKind::TechList => None,
        };

        let heading = Rect::new(0.0, y, width, y + self.heading_height);
        y = heading.y1 + self.gap;

        let rows = match kind {
            SectionKind::ExtraTechList => {
                let cols = self.tile_columns;
                let tile_w = width / cols as f64;
                let rects: Vec<Rect> = (0..rows)
                    .map(|i| {
                        let (line, col) = (i / cols, i % cols);
                        let ty = y + line as f64 * (self.tile_height + self.gap);
                        Rect::new(
                            col as f64 * tile_w,
                            ty,
                            (col + 1) as f64 * tile_w,
                            ty + self.tile_height,
                        )
                    })
                    .collect();
                rects
            }
            _ => {
                let h = if kind == SectionKind::TechList {
                    self.marquee_row_height
                } else {
                    self.row_height
                };
                (0..rows)
                    .map(|i| {
                        let ry = y + i as f64 * h;
                        Rect::new(0.0, ry, width, ry + h)
                    })
                    .collect()
            }
        };
        let content_bottom = rows.iter().map(|r| r.y1).fold(y, f64::max);

        SectionRects {
            container: Rect::new(0.0, top, width, content_bottom + self.padding),
            rule,
            heading,
            rows,
        }
    }
}
