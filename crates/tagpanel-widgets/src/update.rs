//! Per-variant node update
//!
//! Every function here recomputes a node's icon, cells and colors strictly
//! from the current state of its backing object. They are idempotent; the only
//! side effects outside the node itself are the ancestor refreshes a linkage
//! change needs (track → album, special cluster → related album) and the
//! reconciliation of the node's own children.

use tagpanel_core::{
    AlbumId, Catalog, ClusterId, ColumnSchema, File, FileParent, FileState, ObjectRef, Rgb,
    TrackId,
};

use crate::reconcile::reconcile_children;
use crate::theme::{match_bucket, match_color, Icon, StyleContext};
use crate::tree::{Cell, NodeId, TreeModel};

/// Label of the cluster-list node
pub const CLUSTERS_LABEL: &str = "Clusters";

/// Everything a node update reads besides the tree itself
#[derive(Clone, Copy)]
pub struct UpdateContext<'a> {
    pub catalog: &'a dyn Catalog,
    pub style: &'a StyleContext,
    pub columns: &'a ColumnSchema,
}

impl<'a> UpdateContext<'a> {
    pub fn new(catalog: &'a dyn Catalog, style: &'a StyleContext, columns: &'a ColumnSchema) -> Self {
        Self {
            catalog,
            style,
            columns,
        }
    }

    fn cells(&self, obj: ObjectRef, foreground: Option<Rgb>, background: Option<Rgb>) -> Vec<Cell> {
        self.columns
            .iter()
            .map(|column| Cell {
                text: self.catalog.column(obj, &column.key),
                foreground,
                background,
            })
            .collect()
    }
}

/// Icon for a file given its state and where it lives
pub fn file_icon(file: &File) -> Icon {
    if file.state == FileState::Error {
        return Icon::Error;
    }
    match file.parent {
        FileParent::Track(_) => match file.state {
            FileState::Normal => Icon::Saved,
            FileState::Pending => Icon::MatchPending(match_bucket(file.similarity)),
            _ => Icon::Match(match_bucket(file.similarity)),
        },
        _ if file.state == FileState::Pending => Icon::FilePending,
        _ => Icon::File,
    }
}

/// Dispatch on the node's variant. Albums reconcile their tracks; tracks
/// refresh their album.
pub fn update_node(tree: &mut TreeModel, ctx: &UpdateContext<'_>, node: NodeId) {
    match tree.object(node) {
        Some(ObjectRef::Cluster(id)) => update_cluster(tree, ctx, node, id),
        Some(ObjectRef::ClusterList) => update_cluster_list(tree, ctx, node),
        Some(ObjectRef::Album(id)) => update_album(tree, ctx, node, id, true),
        Some(ObjectRef::Track(id)) => update_track(tree, ctx, node, id, true),
        Some(ObjectRef::File(_)) => update_file(tree, ctx, node),
        None => {}
    }
}

pub fn update_cluster(tree: &mut TreeModel, ctx: &UpdateContext<'_>, node: NodeId, id: ClusterId) {
    let Some(cluster) = ctx.catalog.cluster(id) else {
        return;
    };
    let obj = ObjectRef::Cluster(id);
    let cells = ctx.cells(obj, None, None);
    if let Some(n) = tree.node_mut(node) {
        n.icon = Some(Icon::Folder);
        n.cells = cells;
        n.length = ctx.catalog.length(obj);
        n.hidden = cluster.hide_if_empty && cluster.files.is_empty();
    }
    if cluster.special {
        if let Some(album) = cluster.related_album {
            let loaded = ctx.catalog.album(album).map(|a| a.loaded).unwrap_or(false);
            if loaded {
                if let Some(album_node) = tree.node_for(ObjectRef::Album(album)) {
                    update_album(tree, ctx, album_node, album, false);
                }
            }
        }
    }
    tree.mark_updated(node);
}

pub fn update_cluster_list(tree: &mut TreeModel, ctx: &UpdateContext<'_>, node: NodeId) {
    let cells: Vec<Cell> = ctx
        .columns
        .iter()
        .enumerate()
        .map(|(i, _)| Cell::new(if i == 0 { CLUSTERS_LABEL } else { "" }))
        .collect();
    if let Some(n) = tree.node_mut(node) {
        n.icon = Some(Icon::Folder);
        n.cells = cells;
    }
    tree.mark_updated(node);
}

/// Refresh an album node, reconciling its tracks when `update_tracks`
pub fn update_album(
    tree: &mut TreeModel,
    ctx: &UpdateContext<'_>,
    node: NodeId,
    id: AlbumId,
    update_tracks: bool,
) {
    let Some(album) = ctx.catalog.album(id) else {
        return;
    };
    if update_tracks {
        let unmatched = ObjectRef::Cluster(album.unmatched_files);
        let reserved = match tree.children(node).last() {
            Some(&last) if tree.object(last) == Some(unmatched) => 1,
            _ => 0,
        };
        let targets: Vec<ObjectRef> = album.tracks.iter().map(|t| ObjectRef::Track(*t)).collect();
        reconcile_children(tree, node, reserved, &targets, None, |tree, child| {
            if let Some(ObjectRef::Track(track)) = tree.object(child) {
                update_track(tree, ctx, child, track, false);
            }
        });
    }
    let obj = ObjectRef::Album(id);
    let icon = if ctx.catalog.album_is_complete(id) {
        Icon::CdSaved
    } else {
        Icon::Cd
    };
    let cells = ctx.cells(obj, None, None);
    if let Some(n) = tree.node_mut(node) {
        n.icon = Some(icon);
        n.cells = cells;
        n.bold = true;
        n.length = ctx.catalog.length(obj);
    }
    tree.mark_updated(node);
}

/// Refresh a track node and its file children. Unless called from the album's
/// own reconcile (`refresh_album == false`) the parent album is refreshed too.
pub fn update_track(
    tree: &mut TreeModel,
    ctx: &UpdateContext<'_>,
    node: NodeId,
    id: TrackId,
    refresh_album: bool,
) {
    let Some(track) = ctx.catalog.track(id) else {
        return;
    };
    let single = match track.linked_files.as_slice() {
        [only] => ctx.catalog.file(*only),
        _ => None,
    };
    let (icon, foreground, background) = match single {
        Some(file) => {
            // Shown inline: the file gets no node of its own
            tree.clear_children(node);
            (
                file_icon(file),
                ctx.style.track_color(file.state),
                match_color(file.similarity, ctx.style.base),
            )
        }
        None => {
            let targets: Vec<ObjectRef> = track
                .linked_files
                .iter()
                .map(|f| ObjectRef::File(*f))
                .collect();
            reconcile_children(tree, node, 0, &targets, None, |tree, child| {
                update_file(tree, ctx, child);
            });
            tree.set_expanded(node, true);
            (
                Icon::Note,
                ctx.style.text,
                match_color(1.0, ctx.style.base),
            )
        }
    };
    let obj = ObjectRef::Track(id);
    let cells = ctx.cells(obj, Some(foreground), Some(background));
    if let Some(n) = tree.node_mut(node) {
        n.icon = Some(icon);
        n.cells = cells;
        n.length = ctx.catalog.length(obj);
    }
    tree.mark_updated(node);

    if refresh_album {
        let parent = tree.parent(node);
        if let Some((parent, Some(ObjectRef::Album(album)))) = parent.map(|p| (p, tree.object(p))) {
            update_album(tree, ctx, parent, album, false);
        }
    }
}

pub fn update_file(tree: &mut TreeModel, ctx: &UpdateContext<'_>, node: NodeId) {
    let Some(ObjectRef::File(id)) = tree.object(node) else {
        return;
    };
    let Some(file) = ctx.catalog.file(id) else {
        return;
    };
    let obj = ObjectRef::File(id);
    let cells = ctx.cells(
        obj,
        Some(ctx.style.file_color(file.state)),
        Some(match_color(file.similarity, ctx.style.base)),
    );
    if let Some(n) = tree.node_mut(node) {
        n.icon = Some(file_icon(file));
        n.cells = cells;
        n.length = ctx.catalog.length(obj);
    }
    tree.mark_updated(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::MISMATCH_COLOR;
    use tagpanel_core::{MemoryCatalog, Metadata, MoveTarget, Tagger};

    struct Fixture {
        catalog: MemoryCatalog,
        style: StyleContext,
        columns: ColumnSchema,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                catalog: MemoryCatalog::new(),
                style: StyleContext::default(),
                columns: ColumnSchema::default(),
            }
        }

        fn ctx(&self) -> UpdateContext<'_> {
            UpdateContext::new(&self.catalog, &self.style, &self.columns)
        }
    }

    fn file_on_track(similarity: f32, state: FileState) -> File {
        File {
            id: tagpanel_core::FileId(1),
            path: "/a.flac".into(),
            state,
            similarity,
            parent: FileParent::Track(TrackId(1)),
            metadata: Metadata::default(),
        }
    }

    #[test]
    fn test_file_icons() {
        assert_eq!(file_icon(&file_on_track(0.83, FileState::Pending)), Icon::MatchPending(4));
        assert_eq!(file_icon(&file_on_track(0.83, FileState::Changed)), Icon::Match(4));
        assert_eq!(file_icon(&file_on_track(0.2, FileState::Normal)), Icon::Saved);
        assert_eq!(file_icon(&file_on_track(1.0, FileState::Error)), Icon::Error);

        let mut loose = file_on_track(1.0, FileState::Pending);
        loose.parent = FileParent::Cluster(ClusterId(1));
        assert_eq!(file_icon(&loose), Icon::FilePending);
        loose.state = FileState::Changed;
        assert_eq!(file_icon(&loose), Icon::File);
    }

    #[test]
    fn test_track_with_single_file_is_a_leaf() {
        let mut fx = Fixture::new();
        let unmatched = fx.catalog.unmatched_files();
        let album = fx.catalog.add_album("r1", Metadata::default());
        let track = fx.catalog.add_track(album, Metadata::default().with_tag("title", "One")).unwrap();
        let file = fx.catalog.add_file(unmatched, "/one.flac", Metadata::default());
        fx.catalog.move_file(file, MoveTarget::Track(track));
        fx.catalog.set_file_state(file, FileState::Pending, 0.0);

        let mut tree = TreeModel::new();
        let album_node = tree.add_node(None, ObjectRef::Album(album), None);
        update_album(&mut tree, &fx.ctx(), album_node, album, true);

        let track_node = tree.node_for(ObjectRef::Track(track)).unwrap();
        let node = tree.node(track_node).unwrap();
        assert!(node.children.is_empty());
        assert_eq!(node.icon, Some(Icon::MatchPending(0)));
        assert_eq!(node.cells[0].text, "One");
        assert_eq!(node.cells[0].background, Some(MISMATCH_COLOR));
        assert_eq!(node.cells[0].foreground, Some(fx.style.track_color(FileState::Pending)));
        assert!(tree.node_for(ObjectRef::File(file)).is_none());
    }

    #[test]
    fn test_track_with_several_files_expands() {
        let mut fx = Fixture::new();
        let unmatched = fx.catalog.unmatched_files();
        let album = fx.catalog.add_album("r1", Metadata::default());
        let track = fx.catalog.add_track(album, Metadata::default()).unwrap();
        let a = fx.catalog.add_file(unmatched, "/a.flac", Metadata::default());
        let b = fx.catalog.add_file(unmatched, "/b.flac", Metadata::default());
        fx.catalog.move_file(a, MoveTarget::Track(track));
        fx.catalog.move_file(b, MoveTarget::Track(track));

        let mut tree = TreeModel::new();
        let album_node = tree.add_node(None, ObjectRef::Album(album), None);
        update_album(&mut tree, &fx.ctx(), album_node, album, true);

        let track_node = tree.node_for(ObjectRef::Track(track)).unwrap();
        assert!(tree.is_expanded(track_node));
        assert_eq!(tree.node(track_node).unwrap().icon, Some(Icon::Note));
        let objects: Vec<_> = tree
            .children(track_node)
            .iter()
            .filter_map(|c| tree.object(*c))
            .collect();
        assert_eq!(objects, vec![ObjectRef::File(a), ObjectRef::File(b)]);
        assert_eq!(
            tree.node(track_node).unwrap().cells[0].background,
            Some(fx.style.base)
        );
    }

    #[test]
    fn test_album_icon_follows_completeness() {
        let mut fx = Fixture::new();
        let unmatched = fx.catalog.unmatched_files();
        let album = fx.catalog.add_album("r1", Metadata::default().with_tag("title", "LP"));
        let track = fx.catalog.add_track(album, Metadata::default()).unwrap();
        fx.catalog.set_album_loaded(album, true);

        let mut tree = TreeModel::new();
        let album_node = tree.add_node(None, ObjectRef::Album(album), None);
        update_album(&mut tree, &fx.ctx(), album_node, album, true);
        assert_eq!(tree.node(album_node).unwrap().icon, Some(Icon::Cd));
        assert!(tree.node(album_node).unwrap().bold);

        let file = fx.catalog.add_file(unmatched, "/a.flac", Metadata::default());
        fx.catalog.move_file(file, MoveTarget::Track(track));
        let track_node = tree.node_for(ObjectRef::Track(track)).unwrap();
        // Track refresh propagates to the album without rebuilding it
        update_node(&mut tree, &fx.ctx(), track_node);
        assert_eq!(tree.node(album_node).unwrap().icon, Some(Icon::CdSaved));
        assert_eq!(tree.node_for(ObjectRef::Track(track)), Some(track_node));
    }

    #[test]
    fn test_album_keeps_unmatched_cluster_last() {
        let mut fx = Fixture::new();
        let album = fx.catalog.add_album("r1", Metadata::default());
        fx.catalog.add_track(album, Metadata::default());
        let album_unmatched = fx.catalog.album(album).unwrap().unmatched_files;

        let mut tree = TreeModel::new();
        let album_node = tree.add_node(None, ObjectRef::Album(album), None);
        let cluster_node = tree.add_node(Some(album_node), ObjectRef::Cluster(album_unmatched), None);
        update_album(&mut tree, &fx.ctx(), album_node, album, true);
        assert_eq!(tree.children(album_node).len(), 2);

        fx.catalog.add_track(album, Metadata::default());
        update_album(&mut tree, &fx.ctx(), album_node, album, true);
        assert_eq!(tree.children(album_node).len(), 3);
        assert_eq!(tree.children(album_node).last(), Some(&cluster_node));
    }

    #[test]
    fn test_hide_if_empty_cluster() {
        let mut fx = Fixture::new();
        let album = fx.catalog.add_album("r1", Metadata::default());
        let cluster = fx.catalog.album(album).unwrap().unmatched_files;

        let mut tree = TreeModel::new();
        let node = tree.add_node(None, ObjectRef::Cluster(cluster), None);
        update_node(&mut tree, &fx.ctx(), node);
        assert!(tree.is_hidden(node));

        fx.catalog.add_file(cluster, "/x.mp3", Metadata::default());
        update_node(&mut tree, &fx.ctx(), node);
        assert!(!tree.is_hidden(node));
        assert_eq!(tree.node(node).unwrap().icon, Some(Icon::Folder));
    }

    #[test]
    fn test_updating_selected_node_flags_view() {
        let mut fx = Fixture::new();
        let unmatched = fx.catalog.unmatched_files();
        let file = fx.catalog.add_file(unmatched, "/a.mp3", Metadata::default());

        let mut tree = TreeModel::new();
        let node = tree.add_node(None, ObjectRef::File(file), None);
        tree.select(node);
        update_node(&mut tree, &fx.ctx(), node);
        assert!(tree.take_selected_updated());
        assert_eq!(tree.node(node).unwrap().cells[0].text, "a");
    }
}
