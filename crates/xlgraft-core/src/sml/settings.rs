use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How the style registry decides that two source styles are "the same".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleIdentity {
    /// One destination style per distinct source style slot. Two source
    /// styles that happen to be equal stay separate.
    #[default]
    Reference,
    /// One destination style per distinct formatting value. Coincidentally
    /// equal source styles collapse into one.
    Structural,
}

pub type LogCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Settings for controlling workbook and sheet copies.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CopySettings {
    pub style_identity: StyleIdentity,

    /// Rebuild cell hyperlinks on the destination.
    pub copy_hyperlinks: bool,

    pub copy_merged_regions: bool,

    /// Copy formula-based conditional formatting rules.
    pub copy_conditional_formatting: bool,

    /// Copy each sheet's drawing together with the media its pictures use.
    pub copy_drawings: bool,

    /// Receives every progress and skip message the copy produces.
    #[serde(skip)]
    pub log_callback: Option<LogCallback>,
}

impl Default for CopySettings {
    fn default() -> Self {
        Self {
            style_identity: StyleIdentity::Reference,
            copy_hyperlinks: true,
            copy_merged_regions: true,
            copy_conditional_formatting: true,
            copy_drawings: true,
            log_callback: None,
        }
    }
}

impl fmt::Debug for CopySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CopySettings")
            .field("style_identity", &self.style_identity)
            .field("copy_hyperlinks", &self.copy_hyperlinks)
            .field("copy_merged_regions", &self.copy_merged_regions)
            .field("copy_conditional_formatting", &self.copy_conditional_formatting)
            .field("copy_drawings", &self.copy_drawings)
            .field("log_callback", &self.log_callback.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl CopySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style_identity(mut self, identity: StyleIdentity) -> Self {
        self.style_identity = identity;
        self
    }

    pub fn with_hyperlinks(mut self, copy: bool) -> Self {
        self.copy_hyperlinks = copy;
        self
    }

    pub fn with_merged_regions(mut self, copy: bool) -> Self {
        self.copy_merged_regions = copy;
        self
    }

    pub fn with_conditional_formatting(mut self, copy: bool) -> Self {
        self.copy_conditional_formatting = copy;
        self
    }

    pub fn with_drawings(mut self, copy: bool) -> Self {
        self.copy_drawings = copy;
        self
    }

    pub fn with_log_callback(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.log_callback = Some(Arc::new(callback));
        self
    }

    /// Logs a message if a callback is configured.
    pub fn log(&self, message: &str) {
        if let Some(ref callback) = self.log_callback {
            callback(message);
        }
    }
}
