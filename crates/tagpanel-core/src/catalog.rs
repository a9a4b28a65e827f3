//! The contract between the domain model and the tree views
//!
//! [`Catalog`] is the read side: lookups, column text and a few derived
//! predicates with default implementations. [`Tagger`] is the write side used
//! by drag/drop and menu actions. [`CatalogEvent`] is the change feed the
//! views subscribe to.

use std::path::{Path, PathBuf};

use crate::types::*;

/// Read access to the domain model
pub trait Catalog {
    fn file(&self, id: FileId) -> Option<&File>;

    fn track(&self, id: TrackId) -> Option<&Track>;

    fn album(&self, id: AlbumId) -> Option<&Album>;

    fn cluster(&self, id: ClusterId) -> Option<&Cluster>;

    /// Contents of the cluster list, in display order
    fn clusters(&self) -> &[ClusterId];

    /// Loaded albums, in load order
    fn albums(&self) -> &[AlbumId];

    /// The global unmatched-files cluster
    fn unmatched_files(&self) -> ClusterId;

    fn metadata(&self, obj: ObjectRef) -> Option<&Metadata> {
        match obj {
            ObjectRef::Cluster(id) => self.cluster(id).map(|c| &c.metadata),
            ObjectRef::ClusterList => None,
            ObjectRef::Album(id) => self.album(id).map(|a| &a.metadata),
            ObjectRef::Track(id) => self.track(id).map(|t| &t.metadata),
            ObjectRef::File(id) => self.file(id).map(|f| &f.metadata),
        }
    }

    /// Text for one column accessor key
    fn column(&self, obj: ObjectRef, key: &str) -> String {
        self.metadata(obj).map(|m| m.column(key)).unwrap_or_default()
    }

    /// Length in milliseconds, 0 when unknown
    fn length(&self, obj: ObjectRef) -> u64 {
        self.metadata(obj).and_then(|m| m.length_ms).unwrap_or(0)
    }

    fn can_view_info(&self, obj: ObjectRef) -> bool {
        match obj {
            ObjectRef::File(id) => self.file(id).is_some(),
            ObjectRef::Track(id) => self
                .track(id)
                .map(|t| t.num_linked_files() == 1)
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Every track has exactly one file and nothing is left unmatched
    fn album_is_complete(&self, id: AlbumId) -> bool {
        let Some(album) = self.album(id) else {
            return false;
        };
        if !album.loaded {
            return false;
        }
        let unmatched_empty = self
            .cluster(album.unmatched_files)
            .map(|c| c.files.is_empty())
            .unwrap_or(true);
        unmatched_empty
            && album.tracks.iter().all(|t| {
                self.track(*t)
                    .map(|t| t.num_linked_files() == 1)
                    .unwrap_or(false)
            })
    }

    /// Flatten objects into the files they contain, in encounter order
    fn files_from_objects(&self, objs: &[ObjectRef]) -> Vec<FileId> {
        let mut files = Vec::new();
        for obj in objs {
            match *obj {
                ObjectRef::File(id) => files.push(id),
                ObjectRef::Track(id) => {
                    if let Some(track) = self.track(id) {
                        files.extend(track.linked_files.iter().copied());
                    }
                }
                ObjectRef::Cluster(id) => {
                    if let Some(cluster) = self.cluster(id) {
                        files.extend(cluster.files.iter().copied());
                    }
                }
                ObjectRef::ClusterList => {
                    for cluster in self.clusters() {
                        if let Some(cluster) = self.cluster(*cluster) {
                            files.extend(cluster.files.iter().copied());
                        }
                    }
                }
                ObjectRef::Album(id) => {
                    if let Some(album) = self.album(id) {
                        for track in &album.tracks {
                            if let Some(track) = self.track(*track) {
                                files.extend(track.linked_files.iter().copied());
                            }
                        }
                        if let Some(cluster) = self.cluster(album.unmatched_files) {
                            files.extend(cluster.files.iter().copied());
                        }
                    }
                }
            }
        }
        let mut seen = std::collections::HashSet::new();
        files.retain(|f| seen.insert(*f));
        files
    }
}

/// Destination of a direct file move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    Track(TrackId),
    Cluster(ClusterId),
}

/// Request for the releases of a release group.
///
/// The lookup service answers through `reply`. If the requester has gone away
/// the send fails and the answer is simply dropped.
#[derive(Debug)]
pub struct VersionsRequest {
    pub release_group: String,
    pub limit: usize,
    pub reply: tokio::sync::oneshot::Sender<Vec<ReleaseVersion>>,
}

/// Write access to the domain model.
///
/// Every call is fire-and-forget from the view's point of view: effects come
/// back later as [`CatalogEvent`]s.
pub trait Tagger: Catalog {
    fn move_file(&mut self, file: FileId, target: MoveTarget);

    fn move_files_to_album(&mut self, files: &[FileId], album: AlbumId);

    /// Group files into clusters
    fn cluster_files(&mut self, files: &[FileId]);

    fn add_files(&mut self, paths: Vec<PathBuf>);

    /// Recursively add a directory
    fn add_directory(&mut self, path: &Path);

    /// Load a release by MBID
    fn load_album(&mut self, release_id: &str);

    /// Load a standalone recording by MBID
    fn load_nat(&mut self, recording_id: &str);

    fn switch_release_version(&mut self, album: AlbumId, release_id: &str);

    fn browse_release_group(&mut self, request: VersionsRequest);
}

/// Change notification emitted by the domain model
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    ClusterAdded(ClusterId),
    ClusterRemoved(ClusterId),
    AlbumAdded(AlbumId),
    AlbumRemoved(AlbumId),
    /// Album fields or its track list changed
    AlbumUpdated(AlbumId),
    /// Track fields or its linked files changed
    TrackUpdated(TrackId),
    FileUpdated(FileId),
    ClusterUpdated(ClusterId),
    FilesAdded {
        cluster: ClusterId,
        files: Vec<FileId>,
    },
    FileRemoved {
        cluster: ClusterId,
        file: FileId,
    },
}
