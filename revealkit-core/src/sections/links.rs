/// Where a followed link opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LinkTarget {
    /// A new browsing context without opener or referrer.
    NewContext,
}

impl LinkTarget {
    /// Window name understood by browsers.
    pub fn window_name(self) -> &'static str {
        match self {
            Self::NewContext => "_blank",
        }
    }

    /// Window features understood by browsers.
    pub fn features(self) -> &'static str {
        match self {
            Self::NewContext => "noopener,noreferrer",
        }
    }
}

/// Opens external links on behalf of the core.
pub trait LinkOpener {
    /// Open `url` in `target`.
    fn open(&mut self, url: &str, target: LinkTarget);
}

/// Opener that only records what it was asked to open.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct RecordingOpener {
    /// Opened URLs, in order.
    pub opened: Vec<(String, LinkTarget)>,
}

impl LinkOpener for RecordingOpener {
    fn open(&mut self, url: &str, target: LinkTarget) {
        self.opened.push((url.to_owned(), target));
    }
}
