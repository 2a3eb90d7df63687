//! Resolving request targets to files under the served directory.

use std::fs::File;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// Resolve a request target to a path under `root`.
///
/// The query string is dropped, and the path is rebuilt component by
/// component: parent-directory segments and absolute-path tricks are
/// rejected outright, so a target can never escape the served root.
pub fn resolve_target(root: &Path, target: &str) -> Option<PathBuf> {
    let path = target.split_once('?').map_or(target, |(path, _)| path);

    let mut resolved = root.to_path_buf();
    for component in Path::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(segment) => resolved.push(segment),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(resolved)
}

/// A file opened for one response.
///
/// Holds the open handle plus the metadata the response headers need;
/// closed when the response completes or fails.
#[derive(Debug)]
pub struct ServedFile {
    file: File,
    len: u64,
    mime: String,
    modified: Option<SystemTime>,
    location: String,
}

impl ServedFile {
    /// Open the file a target resolves to, read-only.
    ///
    /// Targets that escape the root, miss, or name anything but a
    /// regular file all come back as errors; the caller answers 404.
    pub fn open(root: &Path, target: &str) -> io::Result<Self> {
        let path = resolve_target(root, target).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "target escapes the served directory")
        })?;

        let file = File::open(&path)?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "not a regular file"));
        }

        let mime = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            file,
            len: metadata.len(),
            mime,
            modified: metadata.modified().ok(),
            location: target.to_string(),
        })
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// The request target, echoed in the `Location` header.
    pub fn location(&self) -> &str {
        &self.location
    }
}
