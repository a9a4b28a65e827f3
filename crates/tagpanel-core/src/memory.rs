//! In-memory reference implementation of [`Catalog`] and [`Tagger`]
//!
//! Every mutation records the [`CatalogEvent`]s a real tagger would emit, so
//! a caller can replay them into the views with [`MemoryCatalog::drain_events`].
//! Used by the `tagpanel-inspect` CLI (loaded from a YAML fixture) and as the
//! domain fake in tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::catalog::{Catalog, CatalogEvent, MoveTarget, Tagger, VersionsRequest};
use crate::types::*;

/// Title of the pseudo album holding standalone recordings
pub const NAT_ALBUM_TITLE: &str = "[non-album tracks]";

/// Errors loading a catalog fixture
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid catalog fixture: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Album #{0} has an empty release_id")]
    MissingReleaseId(usize),
}

#[derive(Debug)]
pub struct MemoryCatalog {
    files: HashMap<FileId, File>,
    tracks: HashMap<TrackId, Track>,
    albums: HashMap<AlbumId, Album>,
    clusters: HashMap<ClusterId, Cluster>,
    cluster_list: Vec<ClusterId>,
    album_order: Vec<AlbumId>,
    unmatched: ClusterId,
    nat_album: Option<AlbumId>,
    next_id: u64,
    events: Vec<CatalogEvent>,
    lookups: Vec<VersionsRequest>,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalog {
    /// Empty catalog with only the global unmatched-files cluster
    pub fn new() -> Self {
        let unmatched = ClusterId(1);
        let mut clusters = HashMap::new();
        clusters.insert(
            unmatched,
            Cluster {
                id: unmatched,
                files: Vec::new(),
                hide_if_empty: false,
                special: true,
                related_album: None,
                metadata: Metadata::default().with_tag("title", "Unmatched Files"),
            },
        );
        Self {
            files: HashMap::new(),
            tracks: HashMap::new(),
            albums: HashMap::new(),
            clusters,
            cluster_list: Vec::new(),
            album_order: Vec::new(),
            unmatched,
            nat_album: None,
            next_id: 1,
            events: Vec::new(),
            lookups: Vec::new(),
        }
    }

    fn alloc(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Take every change notification recorded since the last call
    pub fn drain_events(&mut self) -> Vec<CatalogEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take the release-group lookups issued since the last call
    pub fn take_lookups(&mut self) -> Vec<VersionsRequest> {
        std::mem::take(&mut self.lookups)
    }

    /// Create a cluster in the cluster list
    pub fn add_cluster(&mut self, title: &str) -> ClusterId {
        let id = ClusterId(self.alloc());
        self.clusters.insert(
            id,
            Cluster {
                id,
                files: Vec::new(),
                hide_if_empty: false,
                special: false,
                related_album: None,
                metadata: Metadata::default().with_tag("title", title),
            },
        );
        self.cluster_list.push(id);
        self.events.push(CatalogEvent::ClusterAdded(id));
        id
    }

    pub fn remove_cluster(&mut self, id: ClusterId) {
        if !self.cluster_list.contains(&id) {
            return;
        }
        self.cluster_list.retain(|c| *c != id);
        if let Some(cluster) = self.clusters.remove(&id) {
            for file in cluster.files {
                if let Some(file) = self.files.get_mut(&file) {
                    file.parent = FileParent::Detached;
                }
            }
        }
        self.events.push(CatalogEvent::ClusterRemoved(id));
    }

    /// Add a file to a cluster; the title defaults to the file stem
    pub fn add_file(&mut self, cluster: ClusterId, path: impl Into<PathBuf>, metadata: Metadata) -> FileId {
        let id = FileId(self.alloc());
        let path = path.into();
        let mut metadata = metadata;
        if metadata.get("title").is_none() {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            metadata.set("title", stem);
        }
        self.files.insert(
            id,
            File {
                id,
                path,
                state: FileState::Normal,
                similarity: 1.0,
                parent: FileParent::Detached,
                metadata,
            },
        );
        self.attach(id, MoveTarget::Cluster(cluster));
        id
    }

    /// Create an album (not yet loaded) with its own unmatched-files cluster
    pub fn add_album(&mut self, release_id: &str, metadata: Metadata) -> AlbumId {
        let id = AlbumId(self.alloc());
        let unmatched = ClusterId(self.alloc());
        self.clusters.insert(
            unmatched,
            Cluster {
                id: unmatched,
                files: Vec::new(),
                hide_if_empty: true,
                special: true,
                related_album: Some(id),
                metadata: Metadata::default().with_tag("title", "Unmatched Files"),
            },
        );
        self.albums.insert(
            id,
            Album {
                id,
                release_id: release_id.to_string(),
                tracks: Vec::new(),
                unmatched_files: unmatched,
                loaded: false,
                nat: false,
                release_group: ReleaseGroup::default(),
                metadata,
            },
        );
        self.album_order.push(id);
        self.events.push(CatalogEvent::AlbumAdded(id));
        id
    }

    pub fn remove_album(&mut self, id: AlbumId) {
        let Some(album) = self.albums.remove(&id) else {
            return;
        };
        self.album_order.retain(|a| *a != id);
        for track in album.tracks {
            if let Some(track) = self.tracks.remove(&track) {
                for file in track.linked_files {
                    self.files.remove(&file);
                }
            }
        }
        if let Some(cluster) = self.clusters.remove(&album.unmatched_files) {
            for file in cluster.files {
                self.files.remove(&file);
            }
        }
        if self.nat_album == Some(id) {
            self.nat_album = None;
        }
        self.events.push(CatalogEvent::AlbumRemoved(id));
    }

    /// Append a track to an album
    pub fn add_track(&mut self, album: AlbumId, metadata: Metadata) -> Option<TrackId> {
        let id = TrackId(self.alloc());
        let nat = {
            let album_rec = self.albums.get_mut(&album)?;
            album_rec.tracks.push(id);
            album_rec.nat
        };
        self.tracks.insert(
            id,
            Track {
                id,
                album,
                linked_files: Vec::new(),
                non_album: nat,
                metadata,
            },
        );
        self.events.push(CatalogEvent::AlbumUpdated(album));
        Some(id)
    }

    /// Shorten an album to `len` tracks, detaching the files of the dropped ones
    pub fn truncate_tracks(&mut self, album: AlbumId, len: usize) {
        let removed: Vec<TrackId> = match self.albums.get_mut(&album) {
            Some(a) if a.tracks.len() > len => a.tracks.split_off(len),
            _ => return,
        };
        for track in removed {
            if let Some(track) = self.tracks.remove(&track) {
                for file in track.linked_files {
                    if let Some(file) = self.files.get_mut(&file) {
                        file.parent = FileParent::Detached;
                    }
                }
            }
        }
        self.events.push(CatalogEvent::AlbumUpdated(album));
    }

    pub fn set_album_loaded(&mut self, album: AlbumId, loaded: bool) {
        if let Some(a) = self.albums.get_mut(&album) {
            a.loaded = loaded;
            self.events.push(CatalogEvent::AlbumUpdated(album));
        }
    }

    pub fn set_release_group(&mut self, album: AlbumId, group_id: &str, versions: Option<Vec<ReleaseVersion>>) {
        if let Some(a) = self.albums.get_mut(&album) {
            a.release_group.id = Some(group_id.to_string());
            a.release_group.loaded = versions.is_some();
            a.release_group.versions = versions.unwrap_or_default();
        }
    }

    /// Answer every pending release-group lookup from the albums' known
    /// versions. Returns how many answers were delivered to a live requester.
    pub fn complete_lookups(&mut self, versions: &[ReleaseVersion]) -> usize {
        let mut delivered = 0;
        for request in self.take_lookups() {
            for album in self.albums.values_mut() {
                if album.release_group.id.as_deref() == Some(request.release_group.as_str()) {
                    album.release_group.loaded = true;
                    album.release_group.versions = versions.to_vec();
                }
            }
            if request.reply.send(versions.to_vec()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    pub fn set_file_state(&mut self, file: FileId, state: FileState, similarity: f32) {
        if let Some(f) = self.files.get_mut(&file) {
            f.state = state;
            f.similarity = similarity;
            self.events.push(CatalogEvent::FileUpdated(file));
        }
    }

    pub fn set_metadata(&mut self, obj: ObjectRef, key: &str, value: &str) {
        let meta = match obj {
            ObjectRef::Cluster(id) => self.clusters.get_mut(&id).map(|c| &mut c.metadata),
            ObjectRef::Album(id) => self.albums.get_mut(&id).map(|a| &mut a.metadata),
            ObjectRef::Track(id) => self.tracks.get_mut(&id).map(|t| &mut t.metadata),
            ObjectRef::File(id) => self.files.get_mut(&id).map(|f| &mut f.metadata),
            ObjectRef::ClusterList => None,
        };
        let Some(meta) = meta else { return };
        meta.set(key, value);
        self.events.push(match obj {
            ObjectRef::Cluster(id) => CatalogEvent::ClusterUpdated(id),
            ObjectRef::Album(id) => CatalogEvent::AlbumUpdated(id),
            ObjectRef::Track(id) => CatalogEvent::TrackUpdated(id),
            ObjectRef::File(id) => CatalogEvent::FileUpdated(id),
            ObjectRef::ClusterList => return,
        });
    }

    fn detach(&mut self, file: FileId) {
        let Some(parent) = self.files.get(&file).map(|f| f.parent) else {
            return;
        };
        match parent {
            FileParent::Cluster(cluster) => {
                if let Some(c) = self.clusters.get_mut(&cluster) {
                    c.files.retain(|f| *f != file);
                    self.events.push(CatalogEvent::FileRemoved { cluster, file });
                }
            }
            FileParent::Track(track) => {
                if let Some(t) = self.tracks.get_mut(&track) {
                    t.linked_files.retain(|f| *f != file);
                    self.events.push(CatalogEvent::TrackUpdated(track));
                }
            }
            FileParent::Detached => {}
        }
        if let Some(f) = self.files.get_mut(&file) {
            f.parent = FileParent::Detached;
        }
    }

    fn attach(&mut self, file: FileId, target: MoveTarget) {
        let parent = match target {
            MoveTarget::Cluster(cluster) => match self.clusters.get_mut(&cluster) {
                Some(c) => {
                    c.files.push(file);
                    self.events.push(CatalogEvent::FilesAdded {
                        cluster,
                        files: vec![file],
                    });
                    FileParent::Cluster(cluster)
                }
                None => return,
            },
            MoveTarget::Track(track) => match self.tracks.get_mut(&track) {
                Some(t) => {
                    t.linked_files.push(file);
                    self.events.push(CatalogEvent::TrackUpdated(track));
                    FileParent::Track(track)
                }
                None => return,
            },
        };
        if let Some(f) = self.files.get_mut(&file) {
            f.parent = parent;
        }
    }

    fn target_exists(&self, target: MoveTarget) -> bool {
        match target {
            MoveTarget::Cluster(id) => self.clusters.contains_key(&id),
            MoveTarget::Track(id) => self.tracks.contains_key(&id),
        }
    }

    fn album_by_release(&self, release_id: &str) -> Option<AlbumId> {
        self.album_order
            .iter()
            .copied()
            .find(|id| self.albums.get(id).map(|a| a.release_id == release_id && !a.nat).unwrap_or(false))
    }

    /// Build a catalog from a YAML fixture.
    ///
    /// ```yaml
    /// unmatched:
    ///   - path: /music/loose.mp3
    /// clusters:
    ///   - title: Some Album
    ///     files:
    ///       - path: /music/a/01.flac
    ///         state: pending
    /// albums:
    ///   - release_id: 123e4567-e89b-12d3-a456-426614174000
    ///     metadata: { tags: { title: Album } }
    ///     tracks:
    ///       - metadata: { tags: { title: One }, length_ms: 200000 }
    ///         files:
    ///           - path: /music/b/01.flac
    ///             similarity: 0.83
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_yaml::from_str(yaml)?;
        let mut catalog = Self::new();
        let unmatched = catalog.unmatched;

        for file in fixture.unmatched {
            catalog.add_fixture_file(MoveTarget::Cluster(unmatched), file);
        }
        for cluster in fixture.clusters {
            let id = catalog.add_cluster(&cluster.title);
            for file in cluster.files {
                catalog.add_fixture_file(MoveTarget::Cluster(id), file);
            }
        }
        for (index, album) in fixture.albums.into_iter().enumerate() {
            if album.release_id.trim().is_empty() {
                return Err(CatalogError::MissingReleaseId(index));
            }
            let id = catalog.add_album(&album.release_id, album.metadata);
            for track in album.tracks {
                let Some(track_id) = catalog.add_track(id, track.metadata) else {
                    continue;
                };
                for file in track.files {
                    catalog.add_fixture_file(MoveTarget::Track(track_id), file);
                }
            }
            let album_unmatched = catalog.albums[&id].unmatched_files;
            for file in album.unmatched {
                catalog.add_fixture_file(MoveTarget::Cluster(album_unmatched), file);
            }
            if let Some(group) = album.release_group {
                catalog.set_release_group(id, &group, album.versions);
            }
            catalog.set_album_loaded(id, album.loaded);
        }
        Ok(catalog)
    }

    fn add_fixture_file(&mut self, target: MoveTarget, fixture: FileFixture) {
        let id = FileId(self.alloc());
        let mut metadata = fixture.metadata;
        if metadata.get("title").is_none() {
            let stem = fixture
                .path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            metadata.set("title", stem);
        }
        self.files.insert(
            id,
            File {
                id,
                path: fixture.path,
                state: fixture.state,
                similarity: fixture.similarity,
                parent: FileParent::Detached,
                metadata,
            },
        );
        self.attach(id, target);
    }
}

impl Catalog for MemoryCatalog {
    fn file(&self, id: FileId) -> Option<&File> {
        self.files.get(&id)
    }

    fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    fn album(&self, id: AlbumId) -> Option<&Album> {
        self.albums.get(&id)
    }

    fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(&id)
    }

    fn clusters(&self) -> &[ClusterId] {
        &self.cluster_list
    }

    fn albums(&self) -> &[AlbumId] {
        &self.album_order
    }

    fn unmatched_files(&self) -> ClusterId {
        self.unmatched
    }
}

impl Tagger for MemoryCatalog {
    fn move_file(&mut self, file: FileId, target: MoveTarget) {
        if !self.files.contains_key(&file) || !self.target_exists(target) {
            log::debug!("move_file: ignoring move of {} to {:?}", file, target);
            return;
        }
        self.detach(file);
        self.attach(file, target);
    }

    fn move_files_to_album(&mut self, files: &[FileId], album: AlbumId) {
        let Some(album_rec) = self.albums.get(&album) else {
            return;
        };
        let unmatched = album_rec.unmatched_files;
        let tracks = album_rec.tracks.clone();
        for file in files {
            let Some(title) = self.files.get(file).map(|f| f.metadata.column("title").to_lowercase()) else {
                continue;
            };
            // Same title and still free, otherwise the album's unmatched files
            let free_track = tracks.iter().copied().find(|t| {
                self.tracks
                    .get(t)
                    .map(|t| t.linked_files.is_empty() && t.metadata.column("title").to_lowercase() == title)
                    .unwrap_or(false)
            });
            let target = match free_track {
                Some(track) => MoveTarget::Track(track),
                None => MoveTarget::Cluster(unmatched),
            };
            self.move_file(*file, target);
        }
    }

    fn cluster_files(&mut self, files: &[FileId]) {
        let mut groups: Vec<(String, Vec<FileId>)> = Vec::new();
        for file in files {
            let Some(f) = self.files.get(file) else { continue };
            let key = f
                .metadata
                .get("album")
                .filter(|a| !a.is_empty())
                .unwrap_or("[unknown]")
                .to_string();
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, group)) => group.push(*file),
                None => groups.push((key, vec![*file])),
            }
        }
        for (title, group) in groups {
            let existing = self.cluster_list.iter().copied().find(|c| {
                self.clusters
                    .get(c)
                    .map(|c| c.metadata.column("title") == title)
                    .unwrap_or(false)
            });
            let cluster = match existing {
                Some(c) => c,
                None => self.add_cluster(&title),
            };
            for file in group {
                self.move_file(file, MoveTarget::Cluster(cluster));
            }
        }
    }

    fn add_files(&mut self, paths: Vec<PathBuf>) {
        let unmatched = self.unmatched;
        for path in paths {
            self.add_file(unmatched, path, Metadata::default());
        }
    }

    fn add_directory(&mut self, path: &Path) {
        let files: Vec<PathBuf> = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .collect();
        log::info!("add_directory: {} files under {:?}", files.len(), path);
        self.add_files(files);
    }

    fn load_album(&mut self, release_id: &str) {
        if self.album_by_release(release_id).is_some() {
            return;
        }
        self.add_album(release_id, Metadata::default().with_tag("title", release_id));
    }

    fn load_nat(&mut self, recording_id: &str) {
        let album = match self.nat_album {
            Some(album) => album,
            None => {
                let album = self.add_album("", Metadata::default().with_tag("title", NAT_ALBUM_TITLE));
                if let Some(a) = self.albums.get_mut(&album) {
                    a.nat = true;
                    a.loaded = true;
                }
                self.nat_album = Some(album);
                album
            }
        };
        self.add_track(album, Metadata::default().with_tag("title", recording_id));
    }

    fn switch_release_version(&mut self, album: AlbumId, release_id: &str) {
        if let Some(a) = self.albums.get_mut(&album) {
            a.release_id = release_id.to_string();
            a.loaded = false;
            self.events.push(CatalogEvent::AlbumUpdated(album));
        }
    }

    fn browse_release_group(&mut self, request: VersionsRequest) {
        log::debug!("browse_release_group: {} (limit {})", request.release_group, request.limit);
        self.lookups.push(request);
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFixture {
    unmatched: Vec<FileFixture>,
    clusters: Vec<ClusterFixture>,
    albums: Vec<AlbumFixture>,
}

#[derive(Debug, Deserialize)]
struct FileFixture {
    path: PathBuf,
    #[serde(default)]
    state: FileState,
    #[serde(default = "full_similarity")]
    similarity: f32,
    #[serde(default)]
    metadata: Metadata,
}

fn full_similarity() -> f32 {
    1.0
}

#[derive(Debug, Deserialize)]
struct ClusterFixture {
    title: String,
    #[serde(default)]
    files: Vec<FileFixture>,
}

#[derive(Debug, Deserialize)]
struct AlbumFixture {
    release_id: String,
    #[serde(default = "loaded_default")]
    loaded: bool,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    tracks: Vec<TrackFixture>,
    #[serde(default)]
    unmatched: Vec<FileFixture>,
    #[serde(default)]
    release_group: Option<String>,
    #[serde(default)]
    versions: Option<Vec<ReleaseVersion>>,
}

fn loaded_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct TrackFixture {
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    files: Vec<FileFixture>,
}
