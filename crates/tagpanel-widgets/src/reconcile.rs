//! Incremental reconciliation of a node's children
//!
//! Instead of rebuilding a subtree when its backing collection changes, the
//! existing child nodes are rebound position by position to the new objects.
//! Only the difference in length creates or destroys nodes, so a node's id
//! (and with it selection, expansion and scroll anchoring) survives any update
//! that keeps the collection the same size.

use tagpanel_core::ObjectRef;

use crate::tree::{Comparator, NodeId, TreeModel};

/// What a reconcile pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Nodes created for new objects, in target order
    pub created: Vec<NodeId>,
    /// Nodes destroyed from the tail
    pub removed: usize,
    /// Existing nodes rebound in place
    pub rebound: usize,
}

/// Make the children of `parent` match `targets`.
///
/// The last `reserved_tail` children are structural placeholders (the album's
/// unmatched-files cluster) and are left alone; new nodes are inserted in
/// front of them. `update` runs for every rebound node and then for every
/// created node once the whole batch is attached.
pub fn reconcile_children<F>(
    tree: &mut TreeModel,
    parent: NodeId,
    reserved_tail: usize,
    targets: &[ObjectRef],
    comparator: Option<Comparator>,
    mut update: F,
) -> Reconciled
where
    F: FnMut(&mut TreeModel, NodeId),
{
    let mut result = Reconciled::default();
    let children = tree.children(parent).to_vec();
    let mut old = children.len().saturating_sub(reserved_tail);
    let new = targets.len();

    if old > new {
        for &node in children[new..old].iter().rev() {
            tree.remove_node(node);
        }
        result.removed = old - new;
        old = new;
    }

    for (&node, &object) in children[..old].iter().zip(targets) {
        tree.bind(node, object);
        update(tree, node);
        result.rebound += 1;
    }

    if new > old {
        let created: Vec<NodeId> = targets[old..]
            .iter()
            .map(|&object| tree.create_node(object, comparator))
            .collect();
        tree.insert_children(Some(parent), old, &created);
        for &node in &created {
            update(tree, node);
        }
        result.created = created;
    }

    log::debug!(
        "reconcile_children: {} rebound={} created={} removed={}",
        parent,
        result.rebound,
        result.created.len(),
        result.removed
    );
    result
}

/// Append nodes for `objects` under `parent`, skipping objects that already
/// have a child there.
pub fn append_children<F>(
    tree: &mut TreeModel,
    parent: NodeId,
    objects: &[ObjectRef],
    comparator: Option<Comparator>,
    mut update: F,
) -> Reconciled
where
    F: FnMut(&mut TreeModel, NodeId),
{
    let present: Vec<ObjectRef> = tree
        .children(parent)
        .iter()
        .filter_map(|&c| tree.object(c))
        .collect();
    let created: Vec<NodeId> = objects
        .iter()
        .filter(|o| !present.contains(o))
        .map(|&object| tree.create_node(object, comparator))
        .collect();
    tree.attach(Some(parent), &created);
    for &node in &created {
        update(tree, node);
    }
    tree.sort_children(parent);
    Reconciled {
        created,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagpanel_core::{AlbumId, ClusterId, FileId, TrackId};

    fn track(id: u64) -> ObjectRef {
        ObjectRef::Track(TrackId(id))
    }

    fn album_with_tracks(n: u64) -> (TreeModel, NodeId, NodeId) {
        let mut tree = TreeModel::new();
        let album = tree.add_node(None, ObjectRef::Album(AlbumId(1)), None);
        let targets: Vec<ObjectRef> = (1..=n).map(track).collect();
        reconcile_children(&mut tree, album, 0, &targets, None, |_, _| {});
        let unmatched = tree.add_node(Some(album), ObjectRef::Cluster(ClusterId(9)), None);
        (tree, album, unmatched)
    }

    #[test]
    fn test_same_length_preserves_identity() {
        let (mut tree, album, unmatched) = album_with_tracks(3);
        let before = tree.children(album).to_vec();
        let count = tree.len();

        let targets = vec![track(7), track(8), track(9)];
        let mut updated = Vec::new();
        let result = reconcile_children(&mut tree, album, 1, &targets, None, |t, n| {
            updated.push(t.object(n));
        });

        assert!(result.created.is_empty());
        assert_eq!(result.removed, 0);
        assert_eq!(tree.len(), count);
        assert_eq!(tree.children(album), before.as_slice());
        assert_eq!(tree.children(album).last(), Some(&unmatched));
        for (i, target) in targets.iter().enumerate() {
            assert_eq!(tree.object(before[i]), Some(*target));
            assert_eq!(tree.node_for(*target), Some(before[i]));
        }
        assert_eq!(updated, targets.into_iter().map(Some).collect::<Vec<_>>());
        assert!(tree.node_for(track(1)).is_none());
    }

    #[test]
    fn test_growth_appends_before_reserved_tail() {
        let (mut tree, album, unmatched) = album_with_tracks(2);
        let before = tree.children(album).to_vec();

        let targets = vec![track(1), track(2), track(3), track(4)];
        let mut updated = Vec::new();
        let result = reconcile_children(&mut tree, album, 1, &targets, None, |t, n| {
            // Created nodes are already attached when updated
            assert_eq!(t.parent(n), Some(album));
            updated.push(t.object(n));
        });

        assert_eq!(result.created.len(), 2);
        assert_eq!(result.rebound, 2);
        let children = tree.children(album);
        assert_eq!(&children[..2], &before[..2]);
        assert_eq!(&children[2..4], result.created.as_slice());
        assert_eq!(children[4], unmatched);
        assert_eq!(tree.object(children[2]), Some(track(3)));
        assert_eq!(tree.object(children[3]), Some(track(4)));
        assert_eq!(updated.len(), 4);
    }

    #[test]
    fn test_shrink_removes_from_tail_of_region() {
        let (mut tree, album, unmatched) = album_with_tracks(4);
        let before = tree.children(album).to_vec();

        let result = reconcile_children(&mut tree, album, 1, &[track(1)], None, |_, _| {});

        assert_eq!(result.removed, 3);
        assert_eq!(tree.children(album), &[before[0], unmatched]);
        assert!(tree.node_for(track(4)).is_none());
        assert!(!tree.contains(before[3]));
    }

    #[test]
    fn test_append_skips_present_objects() {
        let mut tree = TreeModel::new();
        let cluster = tree.add_node(None, ObjectRef::Cluster(ClusterId(1)), None);
        let file = |id| ObjectRef::File(FileId(id));
        append_children(&mut tree, cluster, &[file(1)], None, |_, _| {});
        let result = append_children(&mut tree, cluster, &[file(1), file(2)], None, |_, _| {});
        assert_eq!(result.created.len(), 1);
        assert_eq!(tree.children(cluster).len(), 2);
    }
}
