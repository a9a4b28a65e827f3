//! Recognition of URLs dropped onto the views
//!
//! A `text/uri-list` payload carries one URL per line. Local entries
//! (`file:` URLs or bare paths) become files/directories to add; web links to
//! a MusicBrainz release or recording become remote loads keyed by the MBID.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static ENTITY_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(release|recording)/([0-9a-z\-]{36})").expect("entity path pattern")
});

static DRIVE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]:[\\/]").expect("drive path pattern"));

/// What a single dropped URL asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropUrl {
    /// Local file or directory
    Local(PathBuf),
    /// Release MBID
    Release(String),
    /// Recording MBID
    Recording(String),
    /// Nothing we know how to handle
    Ignored,
}

/// Classify one URI-list entry
pub fn classify(entry: &str) -> DropUrl {
    let entry = entry.trim();
    if entry.is_empty() {
        return DropUrl::Ignored;
    }
    // `C:\x` would otherwise parse as a URL with scheme `c`
    if DRIVE_PATH.is_match(entry) {
        return DropUrl::Local(PathBuf::from(entry));
    }
    match Url::parse(entry) {
        Ok(url) => classify_url(&url),
        // No scheme: treat as a plain local path
        Err(url::ParseError::RelativeUrlWithoutBase) => DropUrl::Local(PathBuf::from(entry)),
        Err(e) => {
            log::debug!("classify: unparsable drop url {:?}: {}", entry, e);
            DropUrl::Ignored
        }
    }
}

/// Classify an already parsed URL
pub fn classify_url(url: &Url) -> DropUrl {
    match url.scheme() {
        "file" => url
            .to_file_path()
            .map(DropUrl::Local)
            .unwrap_or(DropUrl::Ignored),
        "http" | "https" => entity_from_path(url.path()),
        _ => DropUrl::Ignored,
    }
}

fn entity_from_path(path: &str) -> DropUrl {
    let Some(caps) = ENTITY_PATH.captures(path) else {
        return DropUrl::Ignored;
    };
    let mbid = caps[2].to_string();
    match &caps[1] {
        "release" => DropUrl::Release(mbid),
        _ => DropUrl::Recording(mbid),
    }
}

/// URI-list entry for a path handed over by the OS
pub fn path_to_uri(path: &Path) -> String {
    match Url::from_file_path(path) {
        Ok(url) => url.to_string(),
        Err(()) => path.display().to_string(),
    }
}

/// Parse a `text/uri-list` body; `#` lines are comments
pub fn parse_uri_list(text: &str) -> Vec<DropUrl> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(classify)
        .collect()
}
