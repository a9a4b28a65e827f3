//! Configuration for the tagpanel views
//!
//! - Generic YAML config loading/saving
//! - Standard config file location
//! - [`PanelConfig`]: user settings (state colors, ratings) and persisted
//!   view geometry (column widths, splitter layout)
//!
//! # Usage
//!
//! ```ignore
//! use tagpanel_core::config::{load_config, save_config, default_config_path, PanelConfig};
//!
//! let path = default_config_path("panel.yaml");
//! let config: PanelConfig = load_config(&path);
//! save_config(&config, &path)?;
//! ```

mod io;
mod panel;
mod paths;

pub use io::{load_config, save_config};
pub use panel::{PanelConfig, Persist, Settings, DEFAULT_VIEW_SIZES};
pub use paths::{default_config_dir, default_config_path};
