//! Messages into the panel and notifications out of it

use std::path::PathBuf;

use tagpanel_core::{AlbumId, ObjectRef, TrackId};
use tagpanel_widgets::{SelectModifiers, TreeMessage};

use crate::context_menu::ActionId;
use crate::selection::ViewSide;

/// UI messages handled by [`MainPanel::update`](crate::MainPanel::update)
#[derive(Debug, Clone)]
pub enum PanelMessage {
    /// Interaction with one of the trees
    Tree(ViewSide, TreeMessage),
    /// Keyboard modifiers changed (for Shift/Ctrl selection)
    ModifiersChanged(SelectModifiers),
    /// Files dropped onto the window from outside the application
    FilesDropped(Vec<PathBuf>),
    /// A built-in context menu action was chosen
    MenuAction(ActionId),
    /// A plugin action was chosen from the context menu
    PluginAction(String),
    /// An "Other versions" entry was chosen
    SwitchVersion { album: AlbumId, release_id: String },
    /// A star in the rating widget was clicked
    RateTrack { track: TrackId, rating: u8 },
    CloseMenu,
    /// Check for asynchronously arrived menu contents
    PollMenu,
    /// Move the splitter by a number of steps toward the albums view
    ResizeSplitter(i16),
    /// Press on the handle between the two views
    StartSplitterDrag,
    /// Cursor moved while the splitter is held; x relative to the panel
    SplitterDragged(f32),
    /// Left button released anywhere; ends splitter and column drags
    MouseReleased,
    /// The panel's width changed
    Resized(f32),
}

/// Notifications published to the application over the panel's channel
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// The selection set changed or one of its objects was updated
    SelectionChanged(Vec<ObjectRef>),
    /// A node that can show an info dialog was activated
    ViewInfo(ObjectRef),
    /// A context menu action the application carries out
    Action {
        action: ActionId,
        objects: Vec<ObjectRef>,
    },
    Plugin {
        id: String,
        objects: Vec<ObjectRef>,
    },
    RatingChanged {
        track: TrackId,
        rating: u8,
    },
}
