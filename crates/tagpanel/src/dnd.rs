//! Drag/drop router
//!
//! Decides what a drop means from the payload formats present and the object
//! it landed on, then dispatches the matching [`Tagger`] mutation. Formats are
//! processed in a fixed order (URI list, file references, album references)
//! and every present one is handled.

use std::path::PathBuf;

use tagpanel_core::urls::{parse_uri_list, DropUrl};
use tagpanel_core::{AlbumId, FileId, FileParent, MoveTarget, ObjectRef, Tagger};

use crate::payload::{parse_ids, MimeData, MIME_ALBUM_LIST, MIME_FILE_LIST, MIME_URI_LIST};

/// Apply a drop onto `target`. Returns whether any payload format was handled.
pub fn drop_mime_data<T: Tagger + ?Sized>(
    tagger: &mut T,
    target: Option<ObjectRef>,
    data: &MimeData,
) -> bool {
    log::debug!("drop_mime_data: target = {:?}", target);
    let mut handled = false;

    if let Some(text) = data.get(MIME_URI_LIST) {
        let urls = parse_uri_list(text);
        drop_urls(tagger, &urls);
        handled = true;
    }

    if let Some(text) = data.get(MIME_FILE_LIST) {
        let files: Vec<FileId> = parse_ids(text, MIME_FILE_LIST)
            .into_iter()
            .map(FileId)
            .filter(|id| tagger.file(*id).is_some())
            .collect();
        drop_files(tagger, &files, target);
        handled = true;
    }

    if let Some(text) = data.get(MIME_ALBUM_LIST) {
        let albums: Vec<AlbumId> = parse_ids(text, MIME_ALBUM_LIST)
            .into_iter()
            .map(AlbumId)
            .filter(|id| tagger.album(*id).is_some())
            .collect();
        drop_albums(tagger, &albums, target);
        handled = true;
    }

    handled
}

/// Add local files/directories and load linked releases or recordings.
///
/// Local files always land in the unmatched files, whatever the drop target.
pub fn drop_urls<T: Tagger + ?Sized>(tagger: &mut T, urls: &[DropUrl]) {
    let mut files: Vec<PathBuf> = Vec::new();
    for url in urls {
        match url {
            DropUrl::Local(path) if path.is_dir() => tagger.add_directory(path),
            DropUrl::Local(path) => files.push(path.clone()),
            DropUrl::Release(mbid) => tagger.load_album(mbid),
            DropUrl::Recording(mbid) => tagger.load_nat(mbid),
            DropUrl::Ignored => {}
        }
    }
    if !files.is_empty() {
        tagger.add_files(files);
    }
}

/// Move dropped files according to what they were dropped on
pub fn drop_files<T: Tagger + ?Sized>(tagger: &mut T, files: &[FileId], target: Option<ObjectRef>) {
    match target {
        Some(ObjectRef::Track(track)) => move_all(tagger, files, MoveTarget::Track(track)),
        Some(ObjectRef::Cluster(cluster)) => move_all(tagger, files, MoveTarget::Cluster(cluster)),
        Some(ObjectRef::File(file)) => {
            let parent = tagger.file(file).map(|f| f.parent);
            match parent {
                Some(FileParent::Track(track)) => move_all(tagger, files, MoveTarget::Track(track)),
                Some(FileParent::Cluster(cluster)) => {
                    move_all(tagger, files, MoveTarget::Cluster(cluster))
                }
                Some(FileParent::Detached) | None => {
                    log::debug!("drop_files: target {} has no parent", file);
                }
            }
        }
        Some(ObjectRef::Album(album)) => tagger.move_files_to_album(files, album),
        Some(ObjectRef::ClusterList) => tagger.cluster_files(files),
        None => {}
    }
}

/// Move the files of dropped albums. Tracks and files are not album targets.
pub fn drop_albums<T: Tagger + ?Sized>(tagger: &mut T, albums: &[AlbumId], target: Option<ObjectRef>) {
    let objects: Vec<ObjectRef> = albums.iter().map(|a| ObjectRef::Album(*a)).collect();
    let files = tagger.files_from_objects(&objects);
    match target {
        Some(ObjectRef::Cluster(cluster)) => move_all(tagger, &files, MoveTarget::Cluster(cluster)),
        Some(ObjectRef::Album(album)) => tagger.move_files_to_album(&files, album),
        Some(ObjectRef::ClusterList) => tagger.cluster_files(&files),
        Some(ObjectRef::Track(_)) | Some(ObjectRef::File(_)) | None => {}
    }
}

fn move_all<T: Tagger + ?Sized>(tagger: &mut T, files: &[FileId], target: MoveTarget) {
    for file in files {
        tagger.move_file(*file, target);
    }
}
