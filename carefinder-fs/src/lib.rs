//! Capability-based file helpers shared by the Carefinder crates.
//!
//! Paths are UTF-8 (`camino`) and every operation goes through a `cap-std`
//! directory handle opened with ambient authority. The helpers cover the
//! small set of needs the data and CLI crates have: reading a dataset,
//! probing whether a path names a regular file, and persisting the geocode
//! cache without leaving a half-written file behind.
#![forbid(unsafe_code)]

use std::io;
use std::path::Component;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Suffix appended to the file name of the staging file used by
/// [`write_utf8_atomic`].
const STAGING_SUFFIX: &str = ".partial";

/// Open a UTF-8 path for reading.
///
/// # Errors
///
/// Returns any I/O error raised while opening the file.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole file as UTF-8 text, returning `None` when it does not exist.
///
/// # Errors
///
/// Returns I/O errors other than [`io::ErrorKind::NotFound`], including
/// invalid UTF-8 content.
pub fn read_utf8_if_exists(path: &Utf8Path) -> io::Result<Option<String>> {
    let (dir, name) = match open_parent(path) {
        Ok(handle) => handle,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };
    match dir.read_to_string(name.as_str()) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Replace the contents of `path` with `contents`.
///
/// Missing parent directories are created. The bytes are first written to a
/// sibling staging file which is then renamed over the target, so readers
/// never observe a truncated file.
///
/// # Errors
///
/// Returns any I/O error raised while creating directories, writing the
/// staging file, or renaming it into place.
pub fn write_utf8_atomic(path: &Utf8Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_parent(path)?;
    let staging = format!("{name}{STAGING_SUFFIX}");
    dir.write(staging.as_str(), contents)?;
    if let Err(err) = dir.rename(staging.as_str(), &dir, name.as_str()) {
        // Best effort; the rename error is the one worth reporting.
        let _ignored = dir.remove_file(staging.as_str());
        return Err(err);
    }
    Ok(())
}

/// Ensure the parent directory of `path` exists.
///
/// Absolute paths are split into a root handle and a relative suffix because
/// `cap-std` refuses absolute paths below a directory handle.
///
/// # Errors
///
/// Returns any I/O error raised while opening the base directory or creating
/// the missing components.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_base(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Report whether the existing entry at `path` is a regular file.
///
/// # Errors
///
/// Returns [`io::ErrorKind::NotFound`] when `path` or its parent does not
/// exist, and any other error raised while reading metadata.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_parent(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Open the directory containing `path` and return it with the file name.
fn open_parent(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
        .to_owned();
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split a directory path into an ambient base handle and the remaining
/// relative components.
fn split_base(dir: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_dir = dir.as_std_path();
    let base = match std_dir.components().next() {
        // Drive letter or UNC share on Windows.
        Some(Component::Prefix(prefix)) => {
            let text = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(text).join(std::path::MAIN_SEPARATOR_STR)
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        _ => Utf8PathBuf::from("."),
    };
    let suffix = if base.as_str() == "." {
        dir.to_path_buf()
    } else {
        dir.strip_prefix(&base)
            .map_err(|_| io::Error::other("failed to strip base from directory path"))?
            .to_path_buf()
    };
    let handle = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((handle, suffix))
}
