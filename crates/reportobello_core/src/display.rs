use std::fmt;

/// Filename used for downloads when the user did not supply one.
pub const DEFAULT_DOWNLOAD_NAME: &str = "report.pdf";

/// How a built report is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Render inside the page's embedded frame.
    Iframe,
    /// Open in a new browsing context.
    Tab,
    /// Save to disk under a filename.
    Download,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [DisplayMode::Iframe, DisplayMode::Tab, DisplayMode::Download];

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Iframe => "iframe",
            DisplayMode::Tab => "tab",
            DisplayMode::Download => "download",
        }
    }

    /// Maps a UI tag to a mode. Only the exact tag matches; anything else
    /// (including empty, padded or differently cased) selects nothing.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == tag)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
