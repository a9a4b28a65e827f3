//! Domain object variants consumed by the tree views
//!
//! These are plain data records. The owning application keeps them behind a
//! [`Catalog`](crate::Catalog); the views only ever hold [`ObjectRef`] handles.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

macro_rules! object_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

object_id!(
    /// Identifier of a loaded file
    FileId
);
object_id!(
    /// Identifier of a track inside an album
    TrackId
);
object_id!(
    /// Identifier of a loaded album (not the release MBID)
    AlbumId
);
object_id!(
    /// Identifier of a cluster, including the unmatched-files cluster
    ClusterId
);

/// Save/match state of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileState {
    /// Saved, tags on disk match the metadata
    #[default]
    Normal,
    /// Metadata edited but not saved
    Changed,
    /// Waiting on a lookup or save
    Pending,
    /// Load or save failed
    Error,
}

impl FileState {
    /// Position in per-state lookup tables
    pub fn index(self) -> usize {
        match self {
            FileState::Normal => 0,
            FileState::Changed => 1,
            FileState::Pending => 2,
            FileState::Error => 3,
        }
    }
}

/// A reference to any object a tree node can display.
///
/// Exhaustive matching on this enum is how the reconciler, the drop router and
/// the context menu decide what to do with a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectRef {
    Cluster(ClusterId),
    /// The top-level list of all clusters (there is exactly one)
    ClusterList,
    Album(AlbumId),
    Track(TrackId),
    File(FileId),
}

impl ObjectRef {
    /// Clusters, the cluster list and albums get "expand/collapse all"
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ObjectRef::Cluster(_) | ObjectRef::ClusterList | ObjectRef::Album(_)
        )
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectRef::Cluster(id) => write!(f, "cluster:{}", id),
            ObjectRef::ClusterList => write!(f, "clusters"),
            ObjectRef::Album(id) => write!(f, "album:{}", id),
            ObjectRef::Track(id) => write!(f, "track:{}", id),
            ObjectRef::File(id) => write!(f, "file:{}", id),
        }
    }
}

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Tag values keyed by field name.
///
/// Keys starting with `~` are computed fields; `~length` is derived from
/// [`Metadata::length_ms`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Duration in milliseconds
    #[serde(default)]
    pub length_ms: Option<u64>,
}

impl Metadata {
    pub fn with_tag(mut self, key: &str, value: impl Into<String>) -> Self {
        self.tags.insert(key.to_string(), value.into());
        self
    }

    pub fn with_length(mut self, length_ms: u64) -> Self {
        self.length_ms = Some(length_ms);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.tags.insert(key.to_string(), value.into());
    }

    /// Value of a column accessor key, empty when absent
    pub fn column(&self, key: &str) -> String {
        if key == "~length" {
            return self.length_ms.map(format_length).unwrap_or_default();
        }
        self.get(key).unwrap_or_default().to_string()
    }
}

/// Format milliseconds as `m:ss`
pub fn format_length(ms: u64) -> String {
    let secs = (ms + 500) / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Where a file currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileParent {
    Track(TrackId),
    Cluster(ClusterId),
    Detached,
}

#[derive(Debug, Clone)]
pub struct File {
    pub id: FileId,
    pub path: PathBuf,
    pub state: FileState,
    /// Match quality against the parent track, in [0, 1]
    pub similarity: f32,
    pub parent: FileParent,
    pub metadata: Metadata,
}

#[derive(Debug, Clone)]
pub struct Track {
    pub id: TrackId,
    pub album: AlbumId,
    pub linked_files: Vec<FileId>,
    /// Standalone recording shown under the "non-album tracks" album
    pub non_album: bool,
    pub metadata: Metadata,
}

impl Track {
    pub fn num_linked_files(&self) -> usize {
        self.linked_files.len()
    }
}

/// One release in an album's release group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseVersion {
    /// Release MBID
    pub release_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub labels: String,
    #[serde(default)]
    pub catnums: String,
    #[serde(default)]
    pub tracks: String,
    #[serde(default)]
    pub format: String,
}

/// Release group info needed by the "Other versions" menu
#[derive(Debug, Clone, Default)]
pub struct ReleaseGroup {
    pub id: Option<String>,
    /// `versions` is complete
    pub loaded: bool,
    pub versions: Vec<ReleaseVersion>,
}

#[derive(Debug, Clone)]
pub struct Album {
    pub id: AlbumId,
    /// Release MBID this album was loaded from
    pub release_id: String,
    pub tracks: Vec<TrackId>,
    /// Files assigned to the album but not to one of its tracks
    pub unmatched_files: ClusterId,
    /// Release data has arrived
    pub loaded: bool,
    /// The "non-album tracks" pseudo album
    pub nat: bool,
    pub release_group: ReleaseGroup,
    pub metadata: Metadata,
}

#[derive(Debug, Clone)]
pub struct Cluster {
    pub id: ClusterId,
    pub files: Vec<FileId>,
    pub hide_if_empty: bool,
    /// Unmatched-files cluster (global or per album)
    pub special: bool,
    pub related_album: Option<AlbumId>,
    pub metadata: Metadata,
}
