//! Context menu for right-click actions on tree nodes
//!
//! The entries depend on the clicked node's variant. Albums get an
//! "Other versions" submenu that may be filled in after the menu is shown:
//! the release-group lookup answers through a oneshot channel whose receiver
//! lives in the menu, so closing the menu is all it takes to abandon it.

use iced::widget::{button, column, container, row, text};
use iced::{Background, Border, Element, Length};
use tokio::sync::oneshot;

use tagpanel_core::{AlbumId, ObjectRef, ReleaseVersion, Tagger, TrackId, VersionsRequest};

use crate::message::PanelMessage;

/// Most releases requested for the "Other versions" submenu
pub const OTHER_VERSIONS_LIMIT: usize = 100;

/// Built-in actions; the application carries them out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    ViewInfo,
    OpenFile,
    OpenFolder,
    BrowserLookup,
    Refresh,
    Autotag,
    Analyze,
    Cluster,
    Save,
    Remove,
    /// Handled by the panel itself
    ExpandAll,
    /// Handled by the panel itself
    CollapseAll,
}

impl ActionId {
    pub fn label(&self) -> &'static str {
        match self {
            ActionId::ViewInfo => "Info...",
            ActionId::OpenFile => "Open File",
            ActionId::OpenFolder => "Open Containing Folder",
            ActionId::BrowserLookup => "Lookup in Browser",
            ActionId::Refresh => "Refresh",
            ActionId::Autotag => "Lookup",
            ActionId::Analyze => "Scan",
            ActionId::Cluster => "Cluster",
            ActionId::Save => "Save",
            ActionId::Remove => "Remove",
            ActionId::ExpandAll => "Expand all",
            ActionId::CollapseAll => "Collapse all",
        }
    }
}

/// An action contributed by a plugin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginAction {
    pub id: String,
    pub label: String,
}

impl PluginAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Plugin actions registered per object kind
#[derive(Debug, Clone, Default)]
pub struct PluginActions {
    pub album: Vec<PluginAction>,
    pub cluster: Vec<PluginAction>,
    pub track: Vec<PluginAction>,
    pub file: Vec<PluginAction>,
}

/// One release in the "Other versions" submenu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    pub label: String,
    pub release_id: String,
    /// The album is currently loaded from this release
    pub checked: bool,
}

/// Contents of the "Other versions" submenu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtherVersions {
    /// Disabled "Loading..." placeholder
    Loading,
    Loaded(Vec<VersionEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Action(ActionId),
    Separator,
    /// The "Other versions" submenu of the menu's album
    OtherVersions,
    Rating(TrackId),
    /// "Plugins" submenu
    Plugins(Vec<PluginAction>),
}

/// What the menu is being built for
#[derive(Debug, Clone, Copy)]
pub struct MenuRequest<'a> {
    /// Node object under the cursor; no object, no menu
    pub object: Option<ObjectRef>,
    /// Current selection set
    pub selection: &'a [ObjectRef],
    pub enable_ratings: bool,
    pub plugins: &'a PluginActions,
}

#[derive(Debug)]
struct VersionsSlot {
    album: AlbumId,
    current_release: String,
    state: OtherVersions,
    pending: Option<oneshot::Receiver<Vec<ReleaseVersion>>>,
}

impl VersionsSlot {
    fn populate(&mut self, versions: &[ReleaseVersion]) {
        let entries = versions
            .iter()
            .map(|v| VersionEntry {
                label: version_label(v),
                release_id: v.release_id.clone(),
                checked: v.release_id == self.current_release,
            })
            .collect();
        self.state = OtherVersions::Loaded(entries);
    }
}

#[derive(Debug)]
pub struct ContextMenu {
    pub object: ObjectRef,
    pub entries: Vec<MenuEntry>,
    versions: Option<VersionsSlot>,
}

impl ContextMenu {
    /// Assemble the menu for `request.object`. May dispatch a release-group
    /// lookup through `tagger`.
    pub fn build<T: Tagger + ?Sized>(tagger: &mut T, request: MenuRequest<'_>) -> Option<Self> {
        let object = request.object?;
        let can_view_info = match request.selection {
            [only] => tagger.can_view_info(*only),
            _ => false,
        };
        let plugins = request.plugins;
        let mut entries = Vec::new();
        let mut plugin_actions: Vec<PluginAction> = Vec::new();

        match object {
            ObjectRef::Track(id) => {
                // A node can outlive its track; it then gets the plain track menu
                let (single_file, non_album) = tagger
                    .track(id)
                    .map(|t| (t.num_linked_files() == 1, t.non_album))
                    .unwrap_or((false, false));
                if can_view_info {
                    entries.push(MenuEntry::Action(ActionId::ViewInfo));
                }
                plugin_actions.extend(plugins.track.iter().cloned());
                if single_file {
                    entries.push(MenuEntry::Action(ActionId::OpenFile));
                    entries.push(MenuEntry::Action(ActionId::OpenFolder));
                    plugin_actions.extend(plugins.file.iter().cloned());
                }
                entries.push(MenuEntry::Action(ActionId::BrowserLookup));
                entries.push(MenuEntry::Separator);
                if non_album {
                    entries.push(MenuEntry::Action(ActionId::Refresh));
                }
            }
            ObjectRef::Cluster(id) => {
                entries.push(MenuEntry::Action(ActionId::Autotag));
                entries.push(MenuEntry::Action(ActionId::Analyze));
                if id == tagger.unmatched_files() {
                    entries.push(MenuEntry::Action(ActionId::Cluster));
                }
                plugin_actions.extend(plugins.cluster.iter().cloned());
            }
            ObjectRef::ClusterList => {
                entries.push(MenuEntry::Action(ActionId::Autotag));
                entries.push(MenuEntry::Action(ActionId::Analyze));
                plugin_actions.extend(plugins.cluster.iter().cloned());
            }
            ObjectRef::File(_) => {
                if can_view_info {
                    entries.push(MenuEntry::Action(ActionId::ViewInfo));
                }
                entries.extend(
                    [
                        ActionId::OpenFile,
                        ActionId::OpenFolder,
                        ActionId::BrowserLookup,
                    ]
                    .map(MenuEntry::Action),
                );
                entries.push(MenuEntry::Separator);
                entries.push(MenuEntry::Action(ActionId::Autotag));
                entries.push(MenuEntry::Action(ActionId::Analyze));
                plugin_actions.extend(plugins.file.iter().cloned());
            }
            ObjectRef::Album(_) => {
                entries.push(MenuEntry::Action(ActionId::BrowserLookup));
                entries.push(MenuEntry::Separator);
                entries.push(MenuEntry::Action(ActionId::Refresh));
                plugin_actions.extend(plugins.album.iter().cloned());
            }
        }

        entries.push(MenuEntry::Action(ActionId::Save));
        entries.push(MenuEntry::Action(ActionId::Remove));

        let mut versions = None;
        if let ObjectRef::Album(id) = object {
            versions = versions_slot(tagger, id);
            if versions.is_some() {
                entries.push(MenuEntry::Separator);
                entries.push(MenuEntry::OtherVersions);
            }
        }

        if let (true, [_], ObjectRef::Track(id)) = (request.enable_ratings, request.selection, object) {
            entries.push(MenuEntry::Separator);
            entries.push(MenuEntry::Rating(id));
            entries.push(MenuEntry::Separator);
        }

        if !plugin_actions.is_empty() {
            entries.push(MenuEntry::Separator);
            entries.push(MenuEntry::Plugins(plugin_actions));
        }

        if object.is_container() {
            entries.push(MenuEntry::Action(ActionId::ExpandAll));
            entries.push(MenuEntry::Action(ActionId::CollapseAll));
        }

        Some(Self {
            object,
            entries,
            versions,
        })
    }

    /// Built-in actions in menu order
    pub fn actions(&self) -> Vec<ActionId> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                MenuEntry::Action(a) => Some(*a),
                _ => None,
            })
            .collect()
    }

    pub fn other_versions(&self) -> Option<&OtherVersions> {
        self.versions.as_ref().map(|v| &v.state)
    }

    /// Still waiting on a release-group lookup
    pub fn is_waiting(&self) -> bool {
        self.versions
            .as_ref()
            .map(|v| v.pending.is_some())
            .unwrap_or(false)
    }

    /// Fill in the "Other versions" submenu if the lookup has answered.
    /// Returns whether the menu changed.
    pub fn poll_versions(&mut self) -> bool {
        let Some(slot) = self.versions.as_mut() else {
            return false;
        };
        let Some(pending) = slot.pending.as_mut() else {
            return false;
        };
        match pending.try_recv() {
            Ok(versions) => {
                slot.pending = None;
                slot.populate(&versions);
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                log::warn!("poll_versions: release group lookup for album {} was dropped", slot.album);
                slot.pending = None;
                false
            }
        }
    }

    /// Render the menu
    pub fn view(&self) -> Element<'_, PanelMessage> {
        let mut items: Vec<Element<'_, PanelMessage>> = Vec::new();
        for entry in &self.entries {
            match entry {
                MenuEntry::Action(action) => {
                    items.push(menu_item(action.label(), Some(PanelMessage::MenuAction(*action))));
                }
                MenuEntry::Separator => items.push(menu_separator()),
                MenuEntry::OtherVersions => {
                    items.push(submenu_header("Other versions"));
                    match self.other_versions() {
                        Some(OtherVersions::Loaded(versions)) => {
                            if let Some(slot) = &self.versions {
                                for v in versions {
                                    let mark = if v.checked { "\u{2713} " } else { "   " }; // ✓
                                    items.push(menu_item(
                                        format!("  {}{}", mark, v.label),
                                        Some(PanelMessage::SwitchVersion {
                                            album: slot.album,
                                            release_id: v.release_id.clone(),
                                        }),
                                    ));
                                }
                            }
                        }
                        _ => items.push(menu_item("  Loading...", None)),
                    }
                }
                MenuEntry::Rating(track) => items.push(rating_row(*track)),
                MenuEntry::Plugins(actions) => {
                    items.push(submenu_header("Plugins"));
                    for action in actions {
                        items.push(menu_item(
                            format!("  {}", action.label),
                            Some(PanelMessage::PluginAction(action.id.clone())),
                        ));
                    }
                }
            }
        }

        container(column(items).spacing(2).padding(4))
            .style(|theme: &iced::Theme| {
                let palette = theme.extended_palette();
                container::Style {
                    background: Some(Background::Color(palette.background.strong.color)),
                    border: Border {
                        color: palette.background.weak.color,
                        width: 1.0,
                        radius: 4.0.into(),
                    },
                    ..Default::default()
                }
            })
            .width(Length::Fixed(220.0))
            .into()
    }
}

fn versions_slot<T: Tagger + ?Sized>(tagger: &mut T, id: AlbumId) -> Option<VersionsSlot> {
    let album = tagger.album(id)?;
    if album.nat || !album.loaded {
        return None;
    }
    let mut slot = VersionsSlot {
        album: id,
        current_release: album.release_id.clone(),
        state: OtherVersions::Loading,
        pending: None,
    };
    if album.release_group.loaded {
        slot.populate(&album.release_group.versions);
    } else if let Some(group) = album.release_group.id.clone() {
        let (reply, rx) = oneshot::channel();
        tagger.browse_release_group(VersionsRequest {
            release_group: group,
            limit: OTHER_VERSIONS_LIMIT,
            reply,
        });
        slot.pending = Some(rx);
    }
    Some(slot)
}

/// Label of an "Other versions" entry: the non-empty release facts joined
/// with " / ", flagged when only the track count is known
pub fn version_label(version: &ReleaseVersion) -> String {
    let label = [
        &version.date,
        &version.country,
        &version.labels,
        &version.catnums,
        &version.tracks,
        &version.format,
    ]
    .iter()
    .filter(|s| !s.is_empty())
    .map(|s| s.as_str())
    .collect::<Vec<_>>()
    .join(" / ");
    if label == version.tracks {
        format!("[no release info] / {}", label)
    } else {
        label
    }
}

/// Create a menu item button; `None` renders it disabled
fn menu_item<'a>(label: impl ToString, message: Option<PanelMessage>) -> Element<'a, PanelMessage> {
    button(text(label.to_string()).size(13))
        .on_press_maybe(message)
        .width(Length::Fill)
        .padding([6, 12])
        .style(|theme: &iced::Theme, status| {
            let palette = theme.extended_palette();
            let bg = match status {
                button::Status::Hovered => palette.primary.weak.color,
                _ => iced::Color::TRANSPARENT,
            };
            let text_color = match status {
                button::Status::Disabled => palette.background.strong.text.scale_alpha(0.5),
                _ => palette.background.base.text,
            };
            button::Style {
                background: Some(Background::Color(bg)),
                text_color,
                border: Border::default(),
                ..Default::default()
            }
        })
        .into()
}

fn submenu_header<'a>(label: &'a str) -> Element<'a, PanelMessage> {
    container(text(format!("{} \u{25B8}", label)).size(12)) // ▸
        .padding([4, 12])
        .width(Length::Fill)
        .into()
}

/// Create a separator line
fn menu_separator<'a>() -> Element<'a, PanelMessage> {
    container(iced::widget::rule::horizontal(1))
        .padding([4, 8])
        .width(Length::Fill)
        .into()
}

/// Five stars; clicking star n rates the track n
fn rating_row<'a>(track: TrackId) -> Element<'a, PanelMessage> {
    let stars: Vec<Element<'a, PanelMessage>> = (1..=5u8)
        .map(|rating| {
            button(text("\u{2606}").size(14)) // ☆
                .padding([2, 4])
                .style(|theme: &iced::Theme, status| {
                    let palette = theme.extended_palette();
                    let text_color = match status {
                        button::Status::Hovered => palette.primary.strong.color,
                        _ => palette.background.base.text,
                    };
                    button::Style {
                        background: None,
                        text_color,
                        border: Border::default(),
                        ..Default::default()
                    }
                })
                .on_press(PanelMessage::RateTrack { track, rating })
                .into()
        })
        .collect();
    container(row(stars).spacing(2)).padding([2, 12]).into()
}
