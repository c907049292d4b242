//! Playlist reference resolution
//!
//! Playlists reference each other with URIs relative to the referencing
//! playlist. Storage is addressed by bucket and key, so every URI has to be
//! turned into a key before it can be fetched.
//!
//! `../` handling is deliberately approximate: the number of `../` prefixes
//! decides how far up the base key we walk, and only the final component of
//! the URI is appended. Existing output layouts depend on this, so it is not
//! replaced with full relative-path resolution.

use std::fmt;

/// A reference from one playlist to another object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    /// URI exactly as written in the referencing playlist.
    pub relative_uri: String,
    /// Number of `../` occurrences in `relative_uri`.
    pub up_levels: usize,
    /// Storage key the URI resolves to.
    pub resolved_key: String,
}

impl PlaylistRef {
    /// Resolve `uri` against the key of the playlist that references it.
    pub fn resolve(base_key: &str, uri: &str) -> Self {
        let uri = uri.trim();
        let up_levels = uri.matches("../").count();

        let resolved_key = if let Some(absolute) = uri.strip_prefix('/') {
            absolute.to_string()
        } else if up_levels > 0 {
            // Strip the base file name plus one directory per "../".
            join(strip_components(base_key, up_levels + 1), basename(uri))
        } else {
            join(strip_components(base_key, 1), uri)
        };

        Self {
            relative_uri: uri.to_string(),
            up_levels,
            resolved_key,
        }
    }

    /// Directory part of the resolved key, without trailing slash.
    pub fn directory(&self) -> &str {
        strip_components(&self.resolved_key, 1)
    }

    /// Key of a sibling object in the same directory as this reference.
    pub fn sibling_key(&self, file_name: &str) -> String {
        join(self.directory(), file_name)
    }

    /// Final component of the referenced URI.
    pub fn file_name(&self) -> &str {
        basename(&self.relative_uri)
    }
}

impl fmt::Display for PlaylistRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.relative_uri, self.resolved_key)
    }
}

// helper.
fn basename(s: &str) -> &str {
    s.rsplit('/').next().unwrap_or(s)
}

/// Remove `count` trailing `/`-separated components from `key`.
///
/// Running out of components yields an empty directory.
pub fn strip_components(key: &str, count: usize) -> &str {
    let mut rest = key;
    for _ in 0..count {
        match rest.rfind('/') {
            Some(pos) => rest = &rest[..pos],
            None => return "",
        }
    }
    rest
}

// helper.
fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Replace the final component of a relative URI, keeping its directory.
pub fn replace_file_name(uri: &str, file_name: &str) -> String {
    match uri.rfind('/') {
        Some(pos) => format!("{}/{}", &uri[..pos], file_name),
        None => file_name.to_string(),
    }
}
