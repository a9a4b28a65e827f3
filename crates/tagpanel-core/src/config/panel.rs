//! Settings and persisted geometry of the main panel

use serde::{Deserialize, Serialize};

use crate::types::Rgb;

/// Default column widths: one entry per column except the last
pub const DEFAULT_VIEW_SIZES: &str = "250 40 100";

/// Complete panel configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub setting: Settings,
    pub persist: Persist,
}

/// User-facing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Foreground of edited files in the files view
    pub color_modified: Rgb,
    pub color_saved: Rgb,
    pub color_error: Rgb,
    pub color_pending: Rgb,
    /// Show the rating widget in the track context menu
    pub enable_ratings: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color_modified: Rgb::new(0, 0, 0),
            color_saved: Rgb::new(0, 128, 0),
            color_error: Rgb::new(200, 0, 0),
            color_pending: Rgb::new(128, 128, 128),
            enable_ratings: false,
        }
    }
}

/// View geometry saved at shutdown and restored at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persist {
    /// Space-separated column widths of the files view
    pub file_view_sizes: String,
    /// Space-separated column widths of the albums view
    pub album_view_sizes: String,
    /// Opaque splitter layout
    pub splitter_state: Vec<u8>,
}

impl Default for Persist {
    fn default() -> Self {
        Self {
            file_view_sizes: DEFAULT_VIEW_SIZES.to_string(),
            album_view_sizes: DEFAULT_VIEW_SIZES.to_string(),
            splitter_state: Vec::new(),
        }
    }
}
