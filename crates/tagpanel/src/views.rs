//! The two browser views
//!
//! Each view owns a [`TreeModel`] and applies catalog change events to it.
//! The files view shows the unmatched files on top and the cluster list below;
//! the albums view shows one node per album, each with its tracks and its own
//! unmatched-files cluster as the last child.

use tagpanel_core::{AlbumId, CatalogEvent, ClusterId, FileId, FileParent, ObjectRef};
use tagpanel_widgets::update::{update_album, update_cluster, update_file, update_track};
use tagpanel_widgets::{
    append_children, default_comparator, update_node, Comparator, NodeId, TreeModel,
    UpdateContext,
};

use crate::selection::ViewSide;

const SORTABLE: Option<Comparator> = Some(default_comparator);

pub struct BrowserView {
    pub side: ViewSide,
    pub tree: TreeModel,
    /// Pixel widths of every column except the last
    pub widths: Vec<f32>,
    cluster_list: Option<NodeId>,
}

impl BrowserView {
    pub fn new(side: ViewSide, widths: Vec<f32>) -> Self {
        Self {
            side,
            tree: TreeModel::new(),
            widths,
            cluster_list: None,
        }
    }

    /// Node of the cluster list (files view only)
    pub fn cluster_list_node(&self) -> Option<NodeId> {
        self.cluster_list
    }

    /// Build the initial tree from the catalog's current contents
    pub fn populate(&mut self, ctx: &UpdateContext<'_>) {
        match self.side {
            ViewSide::Files => {
                let unmatched = ctx.catalog.unmatched_files();
                let node = self.tree.add_node(None, ObjectRef::Cluster(unmatched), None);
                self.add_cluster_files(ctx, node, unmatched);
                self.tree.set_expanded(node, true);

                let list = self.tree.add_node(None, ObjectRef::ClusterList, None);
                update_node(&mut self.tree, ctx, list);
                self.tree.set_expanded(list, true);
                self.cluster_list = Some(list);

                for &cluster in ctx.catalog.clusters() {
                    self.add_cluster(ctx, cluster);
                }
            }
            ViewSide::Albums => {
                for &album in ctx.catalog.albums() {
                    self.add_album(ctx, album);
                }
            }
        }
        log::info!("populate: {:?} view has {} nodes", self.side, self.tree.len());
    }

    /// Apply one change notification
    pub fn handle_event(&mut self, ctx: &UpdateContext<'_>, event: &CatalogEvent) {
        match event {
            CatalogEvent::ClusterAdded(id) => {
                if self.side == ViewSide::Files {
                    self.add_cluster(ctx, *id);
                }
            }
            CatalogEvent::ClusterRemoved(id) => self.remove_object(ObjectRef::Cluster(*id)),
            CatalogEvent::AlbumAdded(id) => {
                if self.side == ViewSide::Albums {
                    self.add_album(ctx, *id);
                }
            }
            CatalogEvent::AlbumRemoved(id) => self.remove_object(ObjectRef::Album(*id)),
            CatalogEvent::AlbumUpdated(id) => {
                if let Some(node) = self.tree.node_for(ObjectRef::Album(*id)) {
                    update_album(&mut self.tree, ctx, node, *id, true);
                }
            }
            CatalogEvent::TrackUpdated(id) => {
                if let Some(node) = self.tree.node_for(ObjectRef::Track(*id)) {
                    update_track(&mut self.tree, ctx, node, *id, true);
                }
            }
            CatalogEvent::FileUpdated(id) => self.file_updated(ctx, *id),
            CatalogEvent::ClusterUpdated(id) => {
                if let Some(node) = self.tree.node_for(ObjectRef::Cluster(*id)) {
                    update_cluster(&mut self.tree, ctx, node, *id);
                }
            }
            CatalogEvent::FilesAdded { cluster, files } => self.files_added(ctx, *cluster, files),
            CatalogEvent::FileRemoved { cluster, file } => self.file_removed(ctx, *cluster, *file),
        }
    }

    fn add_cluster(&mut self, ctx: &UpdateContext<'_>, id: ClusterId) {
        let Some(list) = self.cluster_list else {
            return;
        };
        let Some(cluster) = ctx.catalog.cluster(id) else {
            return;
        };
        if self.tree.node_for(ObjectRef::Cluster(id)).is_some() {
            return;
        }
        let comparator = if cluster.special { None } else { SORTABLE };
        let node = self.tree.add_node(Some(list), ObjectRef::Cluster(id), comparator);
        self.add_cluster_files(ctx, node, id);
        self.tree.sort_children(list);
        log::info!("add_cluster: {} as {}", id, node);
    }

    /// Add file nodes for the cluster's files and refresh the cluster node
    fn add_cluster_files(&mut self, ctx: &UpdateContext<'_>, node: NodeId, id: ClusterId) {
        let files: Vec<ObjectRef> = ctx
            .catalog
            .cluster(id)
            .map(|c| c.files.iter().map(|f| ObjectRef::File(*f)).collect())
            .unwrap_or_default();
        append_children(&mut self.tree, node, &files, SORTABLE, |tree, child| {
            update_file(tree, ctx, child);
        });
        update_cluster(&mut self.tree, ctx, node, id);
    }

    fn add_album(&mut self, ctx: &UpdateContext<'_>, id: AlbumId) {
        let Some(album) = ctx.catalog.album(id) else {
            return;
        };
        if self.tree.node_for(ObjectRef::Album(id)).is_some() {
            return;
        }
        let node = self.tree.create_node(ObjectRef::Album(id), SORTABLE);
        self.tree.attach(None, &[node]);
        let unmatched = album.unmatched_files;
        let cluster = self.tree.add_node(Some(node), ObjectRef::Cluster(unmatched), None);
        self.add_cluster_files(ctx, cluster, unmatched);
        update_album(&mut self.tree, ctx, node, id, true);
        self.tree.sort_roots();
        log::info!("add_album: {} as {}", id, node);
    }

    fn remove_object(&mut self, object: ObjectRef) {
        if let Some(node) = self.tree.node_for(object) {
            log::info!("remove_object: {} ({})", object, node);
            self.tree.remove_node(node);
        }
    }

    fn files_added(&mut self, ctx: &UpdateContext<'_>, cluster: ClusterId, files: &[FileId]) {
        let Some(node) = self.tree.node_for(ObjectRef::Cluster(cluster)) else {
            return;
        };
        let objects: Vec<ObjectRef> = files.iter().map(|f| ObjectRef::File(*f)).collect();
        append_children(&mut self.tree, node, &objects, SORTABLE, |tree, child| {
            update_file(tree, ctx, child);
        });
        update_cluster(&mut self.tree, ctx, node, cluster);
    }

    fn file_removed(&mut self, ctx: &UpdateContext<'_>, cluster: ClusterId, file: FileId) {
        let Some(node) = self.tree.node_for(ObjectRef::Cluster(cluster)) else {
            return;
        };
        let child = self
            .tree
            .children(node)
            .iter()
            .copied()
            .find(|&c| self.tree.object(c) == Some(ObjectRef::File(file)));
        if let Some(child) = child {
            self.tree.remove_node(child);
        }
        update_cluster(&mut self.tree, ctx, node, cluster);
    }

    /// A file shown inline on its track has no node; refresh the track instead
    fn file_updated(&mut self, ctx: &UpdateContext<'_>, id: FileId) {
        if let Some(node) = self.tree.node_for(ObjectRef::File(id)) {
            update_file(&mut self.tree, ctx, node);
            return;
        }
        if let Some(FileParent::Track(track)) = ctx.catalog.file(id).map(|f| f.parent) {
            if let Some(node) = self.tree.node_for(ObjectRef::Track(track)) {
                update_track(&mut self.tree, ctx, node, track, true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagpanel_core::{
        Catalog, ColumnSchema, FileState, MemoryCatalog, Metadata, MoveTarget, Tagger,
    };
    use tagpanel_widgets::{Icon, StyleContext};

    struct Fixture {
        catalog: MemoryCatalog,
        style: StyleContext,
        columns: ColumnSchema,
        files: BrowserView,
        albums: BrowserView,
    }

    impl Fixture {
        fn new(catalog: MemoryCatalog) -> Self {
            let mut fx = Self {
                catalog,
                style: StyleContext::default(),
                columns: ColumnSchema::default(),
                files: BrowserView::new(ViewSide::Files, Vec::new()),
                albums: BrowserView::new(ViewSide::Albums, Vec::new()),
            };
            fx.catalog.drain_events();
            let ctx = UpdateContext::new(&fx.catalog, &fx.style, &fx.columns);
            fx.files.populate(&ctx);
            fx.albums.populate(&ctx);
            fx
        }

        fn sync(&mut self) {
            let events = self.catalog.drain_events();
            let ctx = UpdateContext::new(&self.catalog, &self.style, &self.columns);
            for event in &events {
                self.files.handle_event(&ctx, event);
                self.albums.handle_event(&ctx, event);
            }
        }
    }

    fn labels(tree: &TreeModel, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| tree.node(*n).unwrap().label().to_string())
            .collect()
    }

    #[test]
    fn test_files_view_layout() {
        let mut catalog = MemoryCatalog::new();
        let unmatched = catalog.unmatched_files();
        catalog.add_file(unmatched, "/loose.mp3", Metadata::default());
        let cluster = catalog.add_cluster("Beta");
        catalog.add_file(cluster, "/b/1.mp3", Metadata::default());
        let fx = Fixture::new(catalog);

        let tree = &fx.files.tree;
        assert_eq!(labels(tree, tree.roots()), vec!["Unmatched Files", "Clusters"]);
        let top = tree.roots()[0];
        assert!(tree.is_expanded(top));
        assert_eq!(tree.children(top).len(), 1);
        let list = fx.files.cluster_list_node().unwrap();
        assert!(tree.is_expanded(list));
        assert_eq!(labels(tree, tree.children(list)), vec!["Beta"]);
    }

    #[test]
    fn test_cluster_added_and_removed() {
        let mut fx = Fixture::new(MemoryCatalog::new());
        let cluster = fx.catalog.add_cluster("New");
        fx.sync();
        let node = fx.files.tree.node_for(ObjectRef::Cluster(cluster)).unwrap();
        assert!(fx.files.tree.node(node).unwrap().is_sortable());

        fx.files.tree.select(node);
        fx.files.tree.take_selection_changed();
        fx.catalog.remove_cluster(cluster);
        fx.sync();
        assert!(fx.files.tree.node_for(ObjectRef::Cluster(cluster)).is_none());
        assert!(!fx.files.tree.has_selection());
        assert!(fx.files.tree.take_selection_changed());
    }

    #[test]
    fn test_album_added_with_unmatched_cluster_last() {
        let mut fx = Fixture::new(MemoryCatalog::new());
        let album = fx.catalog.add_album("r1", Metadata::default().with_tag("title", "Album"));
        fx.catalog.add_track(album, Metadata::default());
        fx.catalog.add_track(album, Metadata::default());
        fx.sync();

        let tree = &fx.albums.tree;
        let node = tree.node_for(ObjectRef::Album(album)).unwrap();
        let album_node = tree.node(node).unwrap();
        assert!(album_node.bold);
        assert_eq!(album_node.icon, Some(Icon::Cd));
        let children = tree.children(node);
        assert_eq!(children.len(), 3);
        let unmatched = fx.catalog.album(album).unwrap().unmatched_files;
        assert_eq!(tree.object(children[2]), Some(ObjectRef::Cluster(unmatched)));
        assert!(tree.is_hidden(children[2]));
        assert!(fx.files.tree.node_for(ObjectRef::Album(album)).is_none());
    }

    #[test]
    fn test_file_moves_between_views() {
        let mut catalog = MemoryCatalog::new();
        let unmatched = catalog.unmatched_files();
        let file = catalog.add_file(unmatched, "/x.flac", Metadata::default());
        let album = catalog.add_album("r1", Metadata::default());
        let track = catalog.add_track(album, Metadata::default()).unwrap();
        let mut fx = Fixture::new(catalog);
        assert!(fx.files.tree.node_for(ObjectRef::File(file)).is_some());

        fx.catalog.move_file(file, MoveTarget::Track(track));
        fx.sync();
        assert!(fx.files.tree.node_for(ObjectRef::File(file)).is_none());
        let track_node = fx.albums.tree.node_for(ObjectRef::Track(track)).unwrap();
        assert_eq!(fx.albums.tree.node(track_node).unwrap().icon, Some(Icon::Saved));

        // Inline file: its update refreshes the track
        fx.catalog.set_file_state(file, FileState::Error, 1.0);
        fx.sync();
        assert_eq!(fx.albums.tree.node(track_node).unwrap().icon, Some(Icon::Error));
    }

    #[test]
    fn test_album_removed() {
        let mut catalog = MemoryCatalog::new();
        let album = catalog.add_album("r1", Metadata::default());
        let mut fx = Fixture::new(catalog);
        assert_eq!(fx.albums.tree.roots().len(), 1);

        fx.catalog.remove_album(album);
        fx.sync();
        assert!(fx.albums.tree.roots().is_empty());
        assert!(fx.albums.tree.is_empty());
    }

    #[test]
    fn test_nat_album_is_appended() {
        let mut catalog = MemoryCatalog::new();
        let regular = catalog.add_album("r1", Metadata::default());
        let mut fx = Fixture::new(catalog);
        fx.catalog.load_nat("rec-1");
        fx.sync();

        let roots = fx.albums.tree.roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(fx.albums.tree.object(roots[0]), Some(ObjectRef::Album(regular)));
        let Some(ObjectRef::Album(id)) = fx.albums.tree.object(roots[1]) else {
            panic!("expected an album node");
        };
        assert!(fx.catalog.album(id).unwrap().nat);
    }
}
