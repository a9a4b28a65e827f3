//! Main panel: the files view and the albums view side by side
//!
//! The panel owns both trees, routes UI messages, applies catalog change
//! events and keeps the selection set in sync. It never mutates the domain
//! model directly: drops and menu choices go through [`Tagger`], and the
//! effects come back as [`CatalogEvent`]s.

use crossbeam::channel::Sender;
use iced::widget::{center, container, mouse_area, opaque, row, stack, Space};
use iced::{Background, Element, Length, Point, Theme};

use tagpanel_core::config::{PanelConfig, Persist, Settings};
use tagpanel_core::{Catalog, CatalogEvent, ColumnSchema, ObjectRef, Tagger};
use tagpanel_widgets::{
    column_width_at, tree_view, NodeId, SelectModifiers, StyleContext, TreeMessage, UpdateContext,
};

use crate::context_menu::{ActionId, ContextMenu, MenuRequest, PluginActions};
use crate::dnd;
use crate::geometry::{restore_widths, save_widths, SplitterLayout};
use crate::message::{PanelEvent, PanelMessage};
use crate::payload::{encode_selection, MimeData};
use crate::selection::{SelectionCoordinator, ViewSide};
use crate::views::BrowserView;

/// Width assumed until the window reports its size
pub const DEFAULT_PANEL_WIDTH: f32 = 1200.0;

/// Grab area between the two views
const SPLITTER_HANDLE_WIDTH: f32 = 6.0;

/// A press on a row that may turn into a drag
#[derive(Debug)]
struct DragState {
    source: ViewSide,
    origin: NodeId,
    data: MimeData,
}

/// Open context menu and the view it was opened in
#[derive(Debug)]
struct OpenMenu {
    side: ViewSide,
    menu: ContextMenu,
}

pub struct MainPanel {
    files: BrowserView,
    albums: BrowserView,
    columns: ColumnSchema,
    style: StyleContext,
    settings: Settings,
    plugins: PluginActions,
    coordinator: SelectionCoordinator,
    splitter: SplitterLayout,
    splitter_drag: bool,
    width: f32,
    modifiers: SelectModifiers,
    drag: Option<DragState>,
    menu: Option<OpenMenu>,
    events: Sender<PanelEvent>,
}

impl MainPanel {
    /// Build both views from the catalog's current contents and restore the
    /// persisted geometry
    pub fn new(
        catalog: &dyn Catalog,
        config: &PanelConfig,
        columns: ColumnSchema,
        events: Sender<PanelEvent>,
    ) -> Self {
        let persist = &config.persist;
        let defaults = StyleContext::default();
        let mut panel = Self {
            files: BrowserView::new(
                ViewSide::Files,
                restore_widths(&persist.file_view_sizes, columns.len()),
            ),
            albums: BrowserView::new(
                ViewSide::Albums,
                restore_widths(&persist.album_view_sizes, columns.len()),
            ),
            style: StyleContext::new(&config.setting, defaults.base, defaults.text),
            settings: config.setting.clone(),
            columns,
            plugins: PluginActions::default(),
            coordinator: SelectionCoordinator::new(),
            splitter: SplitterLayout::restore(&persist.splitter_state),
            splitter_drag: false,
            width: DEFAULT_PANEL_WIDTH,
            modifiers: SelectModifiers::default(),
            drag: None,
            menu: None,
            events,
        };
        let ctx = UpdateContext::new(catalog, &panel.style, &panel.columns);
        panel.files.populate(&ctx);
        panel.albums.populate(&ctx);
        panel
    }

    pub fn with_plugins(mut self, plugins: PluginActions) -> Self {
        self.plugins = plugins;
        self
    }

    /// Replace the colors, e.g. after a theme change. Nodes pick them up on
    /// their next update.
    pub fn set_style(&mut self, style: StyleContext) {
        self.style = style;
    }

    pub fn view_of(&self, side: ViewSide) -> &BrowserView {
        match side {
            ViewSide::Files => &self.files,
            ViewSide::Albums => &self.albums,
        }
    }

    fn view_mut(&mut self, side: ViewSide) -> &mut BrowserView {
        match side {
            ViewSide::Files => &mut self.files,
            ViewSide::Albums => &mut self.albums,
        }
    }

    pub fn columns(&self) -> &ColumnSchema {
        &self.columns
    }

    pub fn splitter(&self) -> SplitterLayout {
        self.splitter
    }

    /// Current selection set
    pub fn selected_objects(&self) -> &[ObjectRef] {
        self.coordinator.selected_objects()
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.menu.as_ref().map(|m| &m.menu)
    }

    /// The open menu waits on a release-group lookup; poll with
    /// [`PanelMessage::PollMenu`]
    pub fn menu_waiting(&self) -> bool {
        self.menu.as_ref().map(|m| m.menu.is_waiting()).unwrap_or(false)
    }

    /// Apply a catalog change to both views
    pub fn handle_catalog_event(&mut self, catalog: &dyn Catalog, event: &CatalogEvent) {
        log::debug!("handle_catalog_event: {:?}", event);
        let ctx = UpdateContext::new(catalog, &self.style, &self.columns);
        self.files.handle_event(&ctx, event);
        self.albums.handle_event(&ctx, event);
        if let Some(drag) = &self.drag {
            if !self.view_of(drag.source).tree.contains(drag.origin) {
                self.drag = None;
            }
        }
        self.sync_selection();
    }

    /// Publish the selection set if either view's selection changed, or if
    /// selected nodes of the authoritative view were updated
    pub fn sync_selection(&mut self) {
        for side in ViewSide::BOTH {
            let changed = self.view_mut(side).tree.take_selection_changed();
            if !changed {
                continue;
            }
            let published = self.coordinator.selection_changed(
                side,
                &mut self.files.tree,
                &mut self.albums.tree,
            );
            if let Some(objects) = published {
                self.publish(PanelEvent::SelectionChanged(objects));
            }
        }

        let authoritative = self.coordinator.selected_view();
        self.view_mut(authoritative.other()).tree.take_selected_updated();
        if self.view_mut(authoritative).tree.take_selected_updated() {
            let tree = match authoritative {
                ViewSide::Files => &self.files.tree,
                ViewSide::Albums => &self.albums.tree,
            };
            let objects = self.coordinator.refresh(tree);
            self.publish(PanelEvent::SelectionChanged(objects));
        }
    }

    fn publish(&self, event: PanelEvent) {
        if self.events.send(event).is_err() {
            log::warn!("publish: panel event receiver dropped");
        }
    }

    /// Handle a UI message
    pub fn update<T: Tagger>(&mut self, tagger: &mut T, message: PanelMessage) {
        match message {
            PanelMessage::Tree(side, msg) => self.handle_tree(tagger, side, msg),
            PanelMessage::ModifiersChanged(modifiers) => self.modifiers = modifiers,
            PanelMessage::FilesDropped(paths) => {
                dnd::drop_mime_data(tagger, None, &MimeData::from_paths(&paths));
            }
            PanelMessage::MenuAction(action) => {
                let side = self.menu.take().map(|m| m.side);
                match (action, side) {
                    (ActionId::ExpandAll, Some(side)) => self.view_mut(side).tree.expand_all(),
                    (ActionId::CollapseAll, Some(side)) => self.view_mut(side).tree.collapse_all(),
                    _ => self.publish(PanelEvent::Action {
                        action,
                        objects: self.selected_objects().to_vec(),
                    }),
                }
            }
            PanelMessage::PluginAction(id) => {
                self.menu = None;
                self.publish(PanelEvent::Plugin {
                    id,
                    objects: self.selected_objects().to_vec(),
                });
            }
            PanelMessage::SwitchVersion { album, release_id } => {
                self.menu = None;
                tagger.switch_release_version(album, &release_id);
            }
            PanelMessage::RateTrack { track, rating } => {
                self.menu = None;
                self.publish(PanelEvent::RatingChanged { track, rating });
            }
            PanelMessage::CloseMenu => self.menu = None,
            PanelMessage::PollMenu => {
                if let Some(open) = self.menu.as_mut() {
                    open.menu.poll_versions();
                }
            }
            PanelMessage::ResizeSplitter(steps) => self.splitter.resize(steps),
            PanelMessage::StartSplitterDrag => self.splitter_drag = true,
            PanelMessage::SplitterDragged(x) => {
                if self.splitter_drag && self.width > 0.0 {
                    self.splitter.drag_to(x / self.width);
                }
            }
            PanelMessage::MouseReleased => {
                self.splitter_drag = false;
                self.files.tree.end_column_resize();
                self.albums.tree.end_column_resize();
            }
            PanelMessage::Resized(width) => self.width = width,
        }
    }

    fn handle_tree<T: Tagger>(&mut self, tagger: &mut T, side: ViewSide, msg: TreeMessage) {
        match msg {
            TreeMessage::Toggle(node) => self.view_mut(side).tree.toggle_expanded(node),
            TreeMessage::Select(node) => {
                self.menu = None;
                let modifiers = self.modifiers;
                self.view_mut(side).tree.handle_select(node, modifiers);
                self.sync_selection();
                let objects = self.view_of(side).tree.selected_objects();
                let data = encode_selection(&*tagger, &objects);
                self.drag = Some(DragState {
                    source: side,
                    origin: node,
                    data,
                });
            }
            TreeMessage::Activate(node) => {
                self.drag = None;
                self.activate(&*tagger, side, node);
            }
            TreeMessage::RightClick(node) => {
                self.drag = None;
                if !self.view_of(side).tree.is_selected(node) {
                    self.view_mut(side).tree.select(node);
                    self.sync_selection();
                }
                self.open_menu(tagger, side, node);
            }
            TreeMessage::DropReceived(node) => {
                let Some(drag) = self.drag.take() else {
                    return;
                };
                if drag.source == side && drag.origin == node {
                    // Released where it was pressed: a click
                    return;
                }
                let index = self.view_of(side).tree.children(node).len();
                self.drop_mime_data(tagger, side, Some(node), index, &drag.data);
            }
            TreeMessage::SortBy(column) => {
                let numeric = self
                    .columns
                    .get(column)
                    .map(|c| c.is_length())
                    .unwrap_or(false);
                self.view_mut(side).tree.set_sort(column, numeric);
            }
            TreeMessage::StartColumnResize(column) => {
                self.drag = None;
                self.view_mut(side).tree.start_column_resize(column);
            }
            TreeMessage::ColumnDragged(x) => {
                let view = self.view_mut(side);
                let Some(column) = view.tree.resizing_column() else {
                    return;
                };
                let width = column_width_at(x, &view.widths, column);
                if let Some(w) = view.widths.get_mut(column) {
                    *w = width;
                }
            }
        }
    }

    /// Double click: files and single-file tracks open their info
    pub fn activate(&mut self, catalog: &dyn Catalog, side: ViewSide, node: NodeId) {
        let Some(object) = self.view_of(side).tree.object(node) else {
            return;
        };
        if catalog.can_view_info(object) {
            self.publish(PanelEvent::ViewInfo(object));
        }
    }

    /// Open the context menu for a node
    pub fn open_menu<T: Tagger + ?Sized>(&mut self, tagger: &mut T, side: ViewSide, node: NodeId) {
        let selection = self.coordinator.selected_objects().to_vec();
        let request = MenuRequest {
            object: self.view_of(side).tree.object(node),
            selection: &selection,
            enable_ratings: self.settings.enable_ratings,
            plugins: &self.plugins,
        };
        self.menu = ContextMenu::build(tagger, request).map(|menu| OpenMenu { side, menu });
    }

    /// Apply a drop at child `index` of `parent` in one view
    pub fn drop_mime_data<T: Tagger + ?Sized>(
        &mut self,
        tagger: &mut T,
        side: ViewSide,
        parent: Option<NodeId>,
        index: usize,
        data: &MimeData,
    ) -> bool {
        let tree = &self.view_of(side).tree;
        let target = tree.drop_target(parent, index).and_then(|n| tree.object(n));
        log::debug!("drop_mime_data: {:?} view, target {:?}", side, target);
        dnd::drop_mime_data(tagger, target, data)
    }

    /// Write view geometry into the persisted settings
    pub fn save_state(&self, persist: &mut Persist) {
        persist.file_view_sizes = save_widths(&self.files.widths);
        persist.album_view_sizes = save_widths(&self.albums.widths);
        persist.splitter_state = self.splitter.encode();
    }

    pub fn view(&self) -> Element<'_, PanelMessage> {
        let files = tree_view(
            &self.files.tree,
            &self.columns,
            &self.files.widths,
            |msg| PanelMessage::Tree(ViewSide::Files, msg),
        );
        let albums = tree_view(
            &self.albums.tree,
            &self.columns,
            &self.albums.widths,
            |msg| PanelMessage::Tree(ViewSide::Albums, msg),
        );
        let dragging = self.splitter_drag;
        let handle = mouse_area(
            container(Space::new())
                .width(Length::Fixed(SPLITTER_HANDLE_WIDTH))
                .height(Length::Fill)
                .style(move |theme: &Theme| {
                    let palette = theme.extended_palette();
                    let color = if dragging {
                        palette.primary.strong.color
                    } else {
                        palette.background.weak.color
                    };
                    container::Style {
                        background: Some(Background::Color(color)),
                        ..Default::default()
                    }
                }),
        )
        .on_press(PanelMessage::StartSplitterDrag);
        let panes = row![
            container(files)
                .width(Length::FillPortion(self.splitter.files))
                .height(Length::Fill),
            handle,
            container(albums)
                .width(Length::FillPortion(self.splitter.albums))
                .height(Length::Fill),
        ];
        let mut area = mouse_area(panes);
        if dragging {
            area = area.on_move(|point: Point| PanelMessage::SplitterDragged(point.x));
        }
        let base: Element<'_, PanelMessage> = area.into();

        let Some(open) = &self.menu else {
            return base;
        };
        let backdrop = mouse_area(
            container(Space::new())
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .on_press(PanelMessage::CloseMenu)
        .on_right_press(PanelMessage::CloseMenu);
        let menu = center(opaque(open.menu.view()))
            .width(Length::Fill)
            .height(Length::Fill);
        stack![base, backdrop, menu].into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam::channel::{unbounded, Receiver};
    use tagpanel_core::{MemoryCatalog, Metadata, MoveTarget};
    use tagpanel_widgets::HEADER_LEFT;

    fn panel_for(catalog: &mut MemoryCatalog) -> (MainPanel, Receiver<PanelEvent>) {
        catalog.drain_events();
        let (tx, rx) = unbounded();
        let panel = MainPanel::new(&*catalog, &PanelConfig::default(), ColumnSchema::default(), tx);
        (panel, rx)
    }

    fn sync(panel: &mut MainPanel, catalog: &mut MemoryCatalog) {
        for event in catalog.drain_events() {
            panel.handle_catalog_event(&*catalog, &event);
        }
    }

    #[test]
    fn test_click_selects_and_publishes() {
        let mut catalog = MemoryCatalog::new();
        let unmatched = catalog.unmatched_files();
        let file = catalog.add_file(unmatched, "/a.mp3", Metadata::default());
        let (mut panel, rx) = panel_for(&mut catalog);

        let node = panel.view_of(ViewSide::Files).tree.node_for(ObjectRef::File(file)).unwrap();
        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Files, TreeMessage::Select(node)));
        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Files, TreeMessage::DropReceived(node)));

        assert_eq!(rx.try_recv().unwrap(), PanelEvent::SelectionChanged(vec![ObjectRef::File(file)]));
        assert!(rx.try_recv().is_err());
        assert!(catalog.drain_events().is_empty());
    }

    #[test]
    fn test_drag_file_onto_album_track() {
        let mut catalog = MemoryCatalog::new();
        let unmatched = catalog.unmatched_files();
        let file = catalog.add_file(unmatched, "/a.mp3", Metadata::default());
        let album = catalog.add_album("r1", Metadata::default());
        let track = catalog.add_track(album, Metadata::default()).unwrap();
        let (mut panel, _rx) = panel_for(&mut catalog);

        let source = panel.view_of(ViewSide::Files).tree.node_for(ObjectRef::File(file)).unwrap();
        let target = panel.view_of(ViewSide::Albums).tree.node_for(ObjectRef::Track(track)).unwrap();
        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Files, TreeMessage::Select(source)));
        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Albums, TreeMessage::DropReceived(target)));
        sync(&mut panel, &mut catalog);

        assert_eq!(catalog.track(track).unwrap().linked_files, vec![file]);
        assert!(panel.view_of(ViewSide::Files).tree.node_for(ObjectRef::File(file)).is_none());
    }

    #[test]
    fn test_updated_selection_is_republished() {
        let mut catalog = MemoryCatalog::new();
        let unmatched = catalog.unmatched_files();
        let file = catalog.add_file(unmatched, "/a.mp3", Metadata::default());
        let (mut panel, rx) = panel_for(&mut catalog);

        let node = panel.view_of(ViewSide::Files).tree.node_for(ObjectRef::File(file)).unwrap();
        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Files, TreeMessage::Select(node)));
        rx.try_recv().unwrap();

        catalog.set_metadata(ObjectRef::File(file), "title", "Renamed");
        sync(&mut panel, &mut catalog);
        assert_eq!(rx.try_recv().unwrap(), PanelEvent::SelectionChanged(vec![ObjectRef::File(file)]));
    }

    #[cfg(unix)]
    #[test]
    fn test_window_file_drop_adds_to_unmatched() {
        let mut catalog = MemoryCatalog::new();
        let unmatched = catalog.unmatched_files();
        let (mut panel, _rx) = panel_for(&mut catalog);

        let path = std::path::PathBuf::from("/tmp/live #2.mp3");
        panel.update(&mut catalog, PanelMessage::FilesDropped(vec![path.clone()]));
        sync(&mut panel, &mut catalog);

        let files = &catalog.cluster(unmatched).unwrap().files;
        assert_eq!(files.len(), 1);
        assert_eq!(catalog.file(files[0]).unwrap().path, path);
        assert!(panel.view_of(ViewSide::Files).tree.node_for(ObjectRef::File(files[0])).is_some());
    }

    #[test]
    fn test_activate_emits_view_info_for_files_only() {
        let mut catalog = MemoryCatalog::new();
        let unmatched = catalog.unmatched_files();
        let file = catalog.add_file(unmatched, "/a.mp3", Metadata::default());
        let (mut panel, rx) = panel_for(&mut catalog);
        let tree = &panel.view_of(ViewSide::Files).tree;
        let file_node = tree.node_for(ObjectRef::File(file)).unwrap();
        let cluster_node = tree.node_for(ObjectRef::Cluster(unmatched)).unwrap();

        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Files, TreeMessage::Activate(cluster_node)));
        assert!(rx.try_recv().is_err());
        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Files, TreeMessage::Activate(file_node)));
        assert_eq!(rx.try_recv().unwrap(), PanelEvent::ViewInfo(ObjectRef::File(file)));
    }

    #[test]
    fn test_menu_expand_and_collapse_all() {
        let mut catalog = MemoryCatalog::new();
        let cluster = catalog.add_cluster("C");
        catalog.add_file(cluster, "/c/1.mp3", Metadata::default());
        let (mut panel, rx) = panel_for(&mut catalog);
        let list = panel.view_of(ViewSide::Files).cluster_list_node().unwrap();

        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Files, TreeMessage::RightClick(list)));
        assert!(panel.context_menu().is_some());
        panel.update(&mut catalog, PanelMessage::MenuAction(ActionId::CollapseAll));
        assert!(panel.context_menu().is_none());
        assert!(!panel.view_of(ViewSide::Files).tree.is_expanded(list));

        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Files, TreeMessage::RightClick(list)));
        panel.update(&mut catalog, PanelMessage::MenuAction(ActionId::ExpandAll));
        let tree = &panel.view_of(ViewSide::Files).tree;
        assert!(tree.is_expanded(list));
        assert!(tree.is_expanded(tree.node_for(ObjectRef::Cluster(cluster)).unwrap()));

        // Only the selection from the first right click was published
        assert_eq!(rx.try_recv().unwrap(), PanelEvent::SelectionChanged(vec![ObjectRef::ClusterList]));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_menu_action_is_forwarded_with_selection() {
        let mut catalog = MemoryCatalog::new();
        let album = catalog.add_album("r1", Metadata::default());
        let (mut panel, rx) = panel_for(&mut catalog);
        let node = panel.view_of(ViewSide::Albums).tree.node_for(ObjectRef::Album(album)).unwrap();

        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Albums, TreeMessage::RightClick(node)));
        rx.try_recv().unwrap();
        panel.update(&mut catalog, PanelMessage::MenuAction(ActionId::Save));
        assert_eq!(
            rx.try_recv().unwrap(),
            PanelEvent::Action {
                action: ActionId::Save,
                objects: vec![ObjectRef::Album(album)],
            }
        );
    }

    #[test]
    fn test_sort_by_length_is_numeric() {
        let mut catalog = MemoryCatalog::new();
        let unmatched = catalog.unmatched_files();
        let long = catalog.add_file(unmatched, "/long.mp3", Metadata::default().with_length(600_000));
        let short = catalog.add_file(unmatched, "/short.mp3", Metadata::default().with_length(90_000));
        let (mut panel, _rx) = panel_for(&mut catalog);

        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Files, TreeMessage::SortBy(1)));
        let tree = &panel.view_of(ViewSide::Files).tree;
        let top = tree.node_for(ObjectRef::Cluster(unmatched)).unwrap();
        let order: Vec<Option<ObjectRef>> = tree.children(top).iter().map(|n| tree.object(*n)).collect();
        // "10:00" sorts before "1:30" as text
        assert_eq!(order, vec![Some(ObjectRef::File(short)), Some(ObjectRef::File(long))]);
        assert!(tree.sort_spec().unwrap().numeric);
    }

    #[test]
    fn test_save_state() {
        let mut catalog = MemoryCatalog::new();
        let mut config = PanelConfig::default();
        config.persist.file_view_sizes = "300 x".to_string();
        config.persist.splitter_state = vec![0, 6, 0, 4];
        let (tx, _rx) = unbounded();
        let mut panel = MainPanel::new(&catalog, &config, ColumnSchema::default(), tx);
        panel.update(&mut catalog, PanelMessage::ResizeSplitter(1));

        let mut persist = Persist::default();
        panel.save_state(&mut persist);
        assert_eq!(persist.file_view_sizes, "300 40");
        assert_eq!(persist.album_view_sizes, "250 40");
        assert_eq!(persist.splitter_state, vec![0, 7, 0, 3]);
    }

    #[test]
    fn test_column_drag_is_saved() {
        let mut catalog = MemoryCatalog::new();
        let (mut panel, _rx) = panel_for(&mut catalog);
        let files = |msg| PanelMessage::Tree(ViewSide::Files, msg);

        // Moves without a held edge change nothing
        panel.update(&mut catalog, files(TreeMessage::ColumnDragged(HEADER_LEFT + 500.0)));
        panel.update(&mut catalog, files(TreeMessage::StartColumnResize(0)));
        panel.update(&mut catalog, files(TreeMessage::ColumnDragged(HEADER_LEFT + 300.0)));
        panel.update(&mut catalog, PanelMessage::MouseReleased);
        panel.update(&mut catalog, files(TreeMessage::ColumnDragged(HEADER_LEFT + 400.0)));

        assert_eq!(panel.view_of(ViewSide::Files).widths, vec![300.0, 40.0]);
        let mut persist = Persist::default();
        panel.save_state(&mut persist);
        assert_eq!(persist.file_view_sizes, "300 40");
        assert_eq!(persist.album_view_sizes, "250 40");
    }

    #[test]
    fn test_splitter_drag_follows_cursor() {
        let mut catalog = MemoryCatalog::new();
        let (mut panel, _rx) = panel_for(&mut catalog);

        panel.update(&mut catalog, PanelMessage::Resized(1000.0));
        panel.update(&mut catalog, PanelMessage::SplitterDragged(100.0));
        assert_eq!(panel.splitter(), SplitterLayout::default());

        panel.update(&mut catalog, PanelMessage::StartSplitterDrag);
        panel.update(&mut catalog, PanelMessage::SplitterDragged(250.0));
        panel.update(&mut catalog, PanelMessage::MouseReleased);
        panel.update(&mut catalog, PanelMessage::SplitterDragged(900.0));

        assert_eq!(panel.splitter(), SplitterLayout { files: 250, albums: 750 });
        let mut persist = Persist::default();
        panel.save_state(&mut persist);
        assert_eq!(persist.splitter_state, vec![0, 250, 2, 238]);
    }

    #[test]
    fn test_dragged_node_removed_cancels_drag() {
        let mut catalog = MemoryCatalog::new();
        let unmatched = catalog.unmatched_files();
        let file = catalog.add_file(unmatched, "/a.mp3", Metadata::default());
        let cluster = catalog.add_cluster("C");
        let (mut panel, _rx) = panel_for(&mut catalog);

        let node = panel.view_of(ViewSide::Files).tree.node_for(ObjectRef::File(file)).unwrap();
        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Files, TreeMessage::Select(node)));
        catalog.move_file(file, MoveTarget::Cluster(cluster));
        sync(&mut panel, &mut catalog);

        let target = panel.view_of(ViewSide::Files).tree.node_for(ObjectRef::Cluster(unmatched)).unwrap();
        panel.update(&mut catalog, PanelMessage::Tree(ViewSide::Files, TreeMessage::DropReceived(target)));
        assert!(catalog.drain_events().is_empty());
        assert_eq!(catalog.cluster(cluster).unwrap().files, vec![file]);
    }
}
