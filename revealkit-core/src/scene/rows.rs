use crate::foundation::core::RowKey;

/// One entry of a section's row collection, as delivered by the content source.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RowData {
    /// Stable identity.
    pub key: RowKey,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Tag labels.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Preview image reference, if the row has one.
    #[serde(default)]
    pub image: Option<String>,
    /// External link opened on click-through.
    #[serde(default)]
    pub link: Option<String>,
}

impl RowData {
    /// Row with only a key and title.
    pub fn new(key: impl Into<RowKey>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            tags: Vec::new(),
            image: None,
            link: None,
        }
    }

    /// Set the preview image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the external link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}
