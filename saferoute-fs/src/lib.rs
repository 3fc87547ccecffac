//! Capability-based access to artefact files on UTF-8 paths.
//!
//! Paths come from configuration, so every helper accepts absolute or
//! relative [`Utf8Path`]s and resolves them against an ambient anchor
//! directory before touching the filesystem through `cap-std`.
#![forbid(unsafe_code)]

use std::io;
use std::path::{Component, MAIN_SEPARATOR};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open an existing file for reading.
pub fn open_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Create or truncate a file for writing, creating missing parent
/// directories first.
pub fn create_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    ensure_parent_dir(path)?;
    let (dir, name) = parent_and_name(path)?;
    dir.create(name)
}

/// Whether `path` names an existing regular file.
///
/// A missing file or a missing parent directory yields `Ok(false)`.
pub fn is_regular_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match parent_and_name(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Create every missing directory above `path`.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (anchor, relative) = anchor_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    anchor.create_dir_all(&relative)
}

fn parent_and_name(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name.to_owned()))
}

/// Split `dir` into an ambient anchor (root, drive or current directory) and
/// the remainder relative to it.
fn anchor_and_relative(dir: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let anchor = match dir.as_std_path().components().next() {
        Some(Component::Prefix(prefix)) => {
            let drive = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(format!("{drive}{MAIN_SEPARATOR}"))
        }
        Some(Component::RootDir) => Utf8PathBuf::from(MAIN_SEPARATOR.to_string()),
        _ => Utf8PathBuf::from("."),
    };
    let relative = if anchor.as_str() == "." {
        dir.to_path_buf()
    } else {
        dir.strip_prefix(&anchor)
            .map_err(|_| io::Error::other(format!("cannot strip {anchor} from {dir}")))?
            .to_path_buf()
    };
    let handle = fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?;
    Ok((handle, relative))
}
