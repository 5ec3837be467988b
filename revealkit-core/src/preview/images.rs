use std::collections::BTreeMap;

use url::Url;

use crate::{
    foundation::{
        core::RowKey,
        error::{RevealError, RevealResult},
    },
    scene::rows::RowData,
};

/// Crop parameters appended to every preview image URL.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImageTransform {
    /// Resize mode understood by the image CDN.
    pub fit: String,
    /// Target width in px.
    pub width: u32,
    /// Target height in px.
    pub height: u32,
    /// Exposure adjustment.
    pub exposure: i32,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            fit: "crop".to_owned(),
            width: 220,
            height: 320,
            exposure: -10,
        }
    }
}

impl ImageTransform {
    /// Resolve `reference` to a transformed URL.
    ///
    /// Only absolute `http`/`https` references are accepted. Query parameters already present are
    /// kept, except those this transform sets.
    pub fn apply(&self, reference: &str) -> RevealResult<Url> {
        let mut url = Url::parse(reference.trim())
            .map_err(|e| RevealError::validation(format!("image '{reference}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RevealError::validation(format!(
                "image '{reference}': scheme must be http or https"
            )));
        }

        let ours = ["fit", "w", "h", "exp"];
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| !ours.contains(&k.as_ref()))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("fit", &self.fit)
            .append_pair("w", &self.width.to_string())
            .append_pair("h", &self.height.to_string())
            .append_pair("exp", &self.exposure.to_string());
        Ok(url)
    }
}

/// Resolve a row image: the row's own reference, else the section default, else nothing.
pub fn resolve_image_url(
    key: &RowKey,
    image: Option<&str>,
    default_image: Option<&str>,
    transform: &ImageTransform,
) -> Option<String> {
    if let Some(reference) = image {
        match transform.apply(reference) {
            Ok(url) => return Some(url.into()),
            Err(err) => tracing::warn!(%key, %err, "row image unusable, falling back to default"),
        }
    }
    let reference = default_image?;
    match transform.apply(reference) {
        Ok(url) => Some(url.into()),
        Err(err) => {
            tracing::warn!(%key, %err, "default image unusable, preview stays empty");
            None
        }
    }
}

/// Image URL of every row of one row collection, resolved once.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct PreviewImages {
    by_row: BTreeMap<RowKey, Option<String>>,
}

impl PreviewImages {
    /// Resolve images for `rows`.
    pub fn resolve(rows: &[RowData], default_image: Option<&str>, transform: &ImageTransform) -> Self {
        let by_row = rows
            .iter()
            .map(|row| {
                let url = resolve_image_url(&row.key, row.image.as_deref(), default_image, transform);
                (row.key.clone(), url)
            })
            .collect();
        Self { by_row }
    }

    /// URL for `key`. `None` for unknown rows and rows without any usable image.
    pub fn get(&self, key: &RowKey) -> Option<&str> {
        self.by_row.get(key).and_then(|u| u.as_deref())
    }

    /// Whether `key` belongs to the resolved collection.
    pub fn contains(&self, key: &RowKey) -> bool {
        self.by_row.contains_key(key)
    }

    /// Distinct URLs, sorted.
    pub fn urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = self.by_row.values().filter_map(|u| u.as_deref()).collect();
        urls.sort_unstable();
        urls.dedup();
        urls
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.by_row.len()
    }

    /// Whether no rows were resolved.
    pub fn is_empty(&self) -> bool {
        self.by_row.is_empty()
    }
}

/// Warms an image cache ahead of the first hover.
pub trait ImagePrefetcher {
    /// Start loading `url`. Must not block.
    fn prefetch(&mut self, url: &str);
}

/// Prefetcher that does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopPrefetcher;

impl ImagePrefetcher for NoopPrefetcher {
    fn prefetch(&mut self, _url: &str) {}
}

/// Prefetcher that records requested URLs, for headless hosts and replays.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct RecordingPrefetcher {
    /// URLs in request order.
    pub requested: Vec<String>,
}

impl ImagePrefetcher for RecordingPrefetcher {
    fn prefetch(&mut self, url: &str) {
        self.requested.push(url.to_owned());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/preview/images.rs"]
mod tests;
