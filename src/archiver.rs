// src/archiver.rs

use std::{
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    path::{Component, Path, PathBuf},
};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::archive::{read_archive, ArchiveEncoder, ArchiveEntry};
use crate::error::{Error, Result};

/// Totals for one `compress_files` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub files: usize,
    pub input_bytes: u64,
    pub archive_bytes: u64,
}

/// One line of an archive listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    pub name: String,
    pub size: u64,
    pub sha256: String,
}

fn file_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

// Temp files must live beside the archive so the final rename stays on one filesystem
fn archive_dir(archive_path: &Path) -> &Path {
    match archive_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Name stored for an input path.
///
/// Leading roots and `..` components are dropped, the way tar strips a
/// leading `/`, so every stored name extracts below the output directory.
/// A `..` after the first normal component cancels the one before it.
fn entry_name(path: &Path) -> Result<String> {
    let invalid = |reason| Error::InvalidEntryName {
        name: path.to_string_lossy().into_owned(),
        reason,
    };

    let mut parts = Vec::new();
    let mut leading = true;
    for component in path.components() {
        match component {
            Component::Normal(part) => {
                leading = false;
                parts.push(part.to_str().ok_or_else(|| invalid("path is not valid UTF-8"))?);
            }
            Component::CurDir => {}
            Component::ParentDir if !leading => {
                if parts.pop().is_none() {
                    return Err(invalid("climbs above its first directory"));
                }
            }
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                warn!(path = %path.display(), "stripping leading components from stored name");
            }
        }
    }
    if parts.is_empty() {
        return Err(invalid("does not name a file"));
    }
    Ok(parts.join("/"))
}

/// Relative path an entry may be extracted to.
fn entry_path(name: &str) -> Result<PathBuf> {
    let invalid = |reason| Error::InvalidEntryName {
        name: name.to_string(),
        reason,
    };

    let mut out = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("refers to a parent directory")),
            Component::RootDir | Component::Prefix(_) => return Err(invalid("path is absolute")),
        }
    }
    if out.as_os_str().is_empty() {
        return Err(invalid("does not name a file"));
    }
    Ok(out)
}

/// Compress `inputs`, in order, into `archive_path`.
///
/// The archive is built in a uniquely named temp file next to its
/// destination and renamed into place, so a failed run never leaves a partial
/// archive behind and never touches an input.
pub fn compress_files(archive_path: &Path, inputs: &[PathBuf]) -> Result<ArchiveSummary> {
    if inputs.is_empty() {
        return Err(Error::EmptyArchive);
    }
    let names = inputs
        .iter()
        .map(|p| entry_name(p))
        .collect::<Result<Vec<_>>>()?;

    // Dropping the temp file on any error below removes it
    let temp = NamedTempFile::new_in(archive_dir(archive_path))?;
    debug!(path = %temp.path().display(), "writing temporary archive");
    let input_bytes = write_to(temp.as_file(), inputs, &names)?;
    temp.persist(archive_path).map_err(|e| e.error)?;

    let summary = ArchiveSummary {
        files: inputs.len(),
        input_bytes,
        archive_bytes: fs::metadata(archive_path)?.len(),
    };
    info!(
        archive = %archive_path.display(),
        files = summary.files,
        input_bytes = summary.input_bytes,
        archive_bytes = summary.archive_bytes,
        "archive written"
    );
    Ok(summary)
}

fn write_to(file: &File, inputs: &[PathBuf], names: &[String]) -> Result<u64> {
    let mut encoder = ArchiveEncoder::new(BufWriter::new(file));
    let mut input_bytes = 0u64;
    let last = inputs.len() - 1;

    for (i, (path, name)) in inputs.iter().zip(names).enumerate() {
        let contents = fs::read(path)?;
        input_bytes += contents.len() as u64;
        encoder.append(name, &contents, i == last)?;
        info!(file = %name, bytes = contents.len(), "added");
    }

    let mut file = encoder.finish()?.into_inner().map_err(|e| e.into_error())?;
    file.flush()?;
    file.sync_all()?;
    Ok(input_bytes)
}

fn load_entries(archive_path: &Path) -> Result<Vec<ArchiveEntry>> {
    let reader = BufReader::new(File::open(archive_path)?);
    read_archive(reader)
}

/// Recreate every file stored in `archive_path` under `output_dir`.
///
/// The whole archive is decoded and every name checked before the first
/// file is created.
pub fn extract_archive(archive_path: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = load_entries(archive_path)?;
    let targets = entries
        .iter()
        .map(|e| entry_path(&e.name).map(|rel| output_dir.join(rel)))
        .collect::<Result<Vec<_>>>()?;

    for (entry, dest) in entries.iter().zip(&targets) {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut dest_file = File::create(dest)?;
        io::copy(&mut entry.contents.as_slice(), &mut dest_file)?;
        info!(file = %dest.display(), bytes = entry.contents.len(), "extracted");
    }
    Ok(targets)
}

/// Decode `archive_path` and describe its entries without writing anything.
pub fn list_archive(archive_path: &Path) -> Result<Vec<EntryInfo>> {
    let entries = load_entries(archive_path)?;
    Ok(entries
        .into_iter()
        .map(|e| EntryInfo {
            size: e.contents.len() as u64,
            sha256: file_hash(&e.contents),
            name: e.name,
        })
        .collect())
}
