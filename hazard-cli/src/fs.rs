//! Capability-based file access for command inputs and outputs.

use std::io::{self, BufReader};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open `path` for buffered reading.
pub(crate) fn open_utf8_reader(path: &Utf8Path) -> io::Result<BufReader<fs_utf8::File>> {
    fs_utf8::File::open_ambient(path, ambient_authority()).map(BufReader::new)
}

/// Whether `path` exists and is a regular file.
pub(crate) fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Write `contents` to `path`, creating missing parent directories.
pub(crate) fn write_utf8_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_dir_and_file(path)?;
    dir.write(name.as_str(), contents)
}

fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (base, relative) = split_at_root(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?.create_dir_all(&relative)
}

/// Split `parent` into an ambient base directory and a path relative to it.
///
/// Absolute paths are anchored at their root (including any Windows prefix);
/// relative paths resolve from the current directory.
fn split_at_root(parent: &Utf8Path) -> io::Result<(Utf8PathBuf, Utf8PathBuf)> {
    if !parent.is_absolute() {
        return Ok((Utf8PathBuf::from("."), parent.to_path_buf()));
    }
    let root = parent.ancestors().last().unwrap_or(parent);
    let relative = parent
        .strip_prefix(root)
        .map_err(|_| io::Error::other(format!("failed to strip root from {parent}")))?;
    Ok((root.to_path_buf(), relative.to_path_buf()))
}
