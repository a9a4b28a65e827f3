//! tagpanel - the file and album tree panel of a music tagger
//!
//! Two synchronized views over one catalog: the files view (unmatched files
//! and clusters) and the albums view (albums, tracks and their files).
//!
//! - [`panel`]: [`MainPanel`] owning both views, routing iced messages
//! - [`views`]: per-view reaction to catalog change events
//! - [`selection`]: one authoritative view for the selection set
//! - [`dnd`] / [`payload`]: drag payload encoding and drop routing
//! - [`context_menu`]: right-click actions per object variant
//! - [`geometry`]: persisted column widths and splitter layout
//!
//! The panel talks back to the application over a crossbeam channel of
//! [`PanelEvent`]s.

pub mod context_menu;
pub mod dnd;
pub mod error;
pub mod geometry;
pub mod message;
pub mod panel;
pub mod payload;
pub mod selection;
pub mod views;

pub use context_menu::{ActionId, ContextMenu, PluginAction, PluginActions};
pub use error::{PanelError, Result};
pub use message::{PanelEvent, PanelMessage};
pub use panel::MainPanel;
pub use payload::MimeData;
pub use selection::ViewSide;
