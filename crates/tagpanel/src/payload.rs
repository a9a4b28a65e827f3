//! Drag payloads
//!
//! A payload is a set of (MIME type, text) pairs. Besides external
//! `text/uri-list` drops the views exchange two same-app formats carrying
//! newline-joined integer ids.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::PathBuf;

use tagpanel_core::urls::path_to_uri;
use tagpanel_core::{AlbumId, Catalog, FileId, ObjectRef};

use crate::error::{PanelError, Result};

pub const MIME_URI_LIST: &str = "text/uri-list";
pub const MIME_FILE_LIST: &str = "application/tagpanel.file-list";
pub const MIME_ALBUM_LIST: &str = "application/tagpanel.album-list";

/// Formats the views accept, in the order a drop processes them
pub const ACCEPTED_FORMATS: [&str; 3] = [MIME_URI_LIST, MIME_FILE_LIST, MIME_ALBUM_LIST];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeData {
    formats: BTreeMap<String, String>,
}

impl MimeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, format: &str, data: impl Into<String>) {
        self.formats.insert(format.to_string(), data.into());
    }

    pub fn with(mut self, format: &str, data: impl Into<String>) -> Self {
        self.set(format, data);
        self
    }

    /// Data of a format; an empty body counts as absent
    pub fn get(&self, format: &str) -> Option<&str> {
        self.formats
            .get(format)
            .map(String::as_str)
            .filter(|d| !d.trim().is_empty())
    }

    pub fn has(&self, format: &str) -> bool {
        self.get(format).is_some()
    }

    /// Nothing this panel could act on
    pub fn is_empty(&self) -> bool {
        !ACCEPTED_FORMATS.iter().any(|f| self.has(f))
    }

    pub fn from_uri_list<S: AsRef<str>>(urls: &[S]) -> Self {
        let body: Vec<&str> = urls.iter().map(AsRef::as_ref).collect();
        Self::new().with(MIME_URI_LIST, body.join("\n"))
    }

    /// URI list for paths dropped onto the window
    pub fn from_paths(paths: &[PathBuf]) -> Self {
        let urls: Vec<String> = paths.iter().map(|p| path_to_uri(p)).collect();
        Self::from_uri_list(&urls)
    }

    pub fn from_files(files: &[FileId]) -> Self {
        Self::new().with(MIME_FILE_LIST, encode_ids(files))
    }

    pub fn from_albums(albums: &[AlbumId]) -> Self {
        Self::new().with(MIME_ALBUM_LIST, encode_ids(albums))
    }
}

/// Newline-joined ids
pub fn encode_ids<T: Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn parse_id(value: &str, format: &'static str) -> Result<u64> {
    value.trim().parse().map_err(|_| PanelError::InvalidId {
        value: value.to_string(),
        format,
    })
}

/// Parse newline-joined ids, skipping blank and malformed entries
pub fn parse_ids(text: &str, format: &'static str) -> Vec<u64> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_id(line, format) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("parse_ids: {}", e);
                None
            }
        })
        .collect()
}

/// Encode the objects of a selection for dragging.
///
/// Albums travel as album ids; everything else is flattened to the ids of the
/// files it holds.
pub fn encode_selection(catalog: &dyn Catalog, objects: &[ObjectRef]) -> MimeData {
    let mut albums = Vec::new();
    let mut files = Vec::new();
    for obj in objects {
        match obj {
            ObjectRef::Album(id) => albums.push(*id),
            ObjectRef::ClusterList
            | ObjectRef::Track(_)
            | ObjectRef::File(_)
            | ObjectRef::Cluster(_) => {
                files.extend(catalog.files_from_objects(std::slice::from_ref(obj)));
            }
        }
    }
    let mut data = MimeData::new();
    if !albums.is_empty() {
        data.set(MIME_ALBUM_LIST, encode_ids(&albums));
    }
    if !files.is_empty() {
        data.set(MIME_FILE_LIST, encode_ids(&files));
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagpanel_core::{MemoryCatalog, Metadata};

    #[test]
    fn test_parse_ids_skips_garbage() {
        assert_eq!(parse_ids("3\n5", MIME_FILE_LIST), vec![3, 5]);
        assert_eq!(parse_ids("3\nabc\n\n 7 \n-1", MIME_FILE_LIST), vec![3, 7]);
        assert!(parse_ids("", MIME_FILE_LIST).is_empty());
    }

    #[test]
    fn test_parse_id_error_names_format() {
        let err = parse_id("x", MIME_ALBUM_LIST).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid id \"x\" in application/tagpanel.album-list payload"
        );
    }

    #[test]
    fn test_empty_body_is_absent() {
        let data = MimeData::new().with(MIME_FILE_LIST, "  ");
        assert!(!data.has(MIME_FILE_LIST));
        assert!(data.is_empty());
        assert!(!MimeData::new().with("text/plain", "hello").has(MIME_URI_LIST));
    }

    #[test]
    fn test_encode_selection() {
        let mut catalog = MemoryCatalog::new();
        let unmatched = catalog.unmatched_files();
        let loose = catalog.add_file(unmatched, "/loose.mp3", Metadata::default());
        let cluster = catalog.add_cluster("C");
        let a = catalog.add_file(cluster, "/a.mp3", Metadata::default());
        let b = catalog.add_file(cluster, "/b.mp3", Metadata::default());
        let album = catalog.add_album("r1", Metadata::default());

        let data = encode_selection(&catalog, &[ObjectRef::Album(album), ObjectRef::Cluster(cluster)]);
        assert_eq!(data.get(MIME_ALBUM_LIST), Some(album.to_string().as_str()));
        assert_eq!(data.get(MIME_FILE_LIST), Some(format!("{}\n{}", a, b).as_str()));

        // The cluster list covers clustered files, not unmatched ones
        let data = encode_selection(&catalog, &[ObjectRef::ClusterList]);
        let ids = parse_ids(data.get(MIME_FILE_LIST).unwrap(), MIME_FILE_LIST);
        assert_eq!(ids, vec![a.0, b.0]);
        assert!(!ids.contains(&loose.0));
    }
}
