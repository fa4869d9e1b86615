//! Migration discovery from a directory of `.sql` files
//!
//! Files are named `<version>_<description>.sql`. The version is the stem up
//! to the first `_`, with an optional leading `V`.

use crate::checksum::compute_checksum;
use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;
use crate::selector::{Candidate, MigrationSelector};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Reads migrations from a directory
#[derive(Debug, Clone)]
pub struct MigrationSource {
    dir: PathBuf,
}

impl MigrationSource {
    /// Create a source rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this source scans
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All `.sql` files directly inside the directory, sorted by name
    pub fn filenames(&self) -> CoreResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| CoreError::IoWithPath {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::IoWithPath {
                path: self.dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Load the selected migrations, ordered ascending by numeric version.
    ///
    /// Every `.sql` file must carry a valid, unique version even when the
    /// selector skips it.
    pub fn migrations(&self, selector: &MigrationSelector) -> CoreResult<Vec<Migration>> {
        let mut by_version: BTreeMap<u32, (String, Option<Migration>)> = BTreeMap::new();

        for path in self.filenames()? {
            let file_name = file_name_of(&path)?;
            let stem = file_name.strip_suffix(".sql").unwrap_or(&file_name);
            let token = version_token(stem);
            let version = parse_version(&file_name, token)?;

            let selected = selector.matches(&Candidate {
                file_name: &file_name,
                stem,
                version_token: token,
                version,
            });

            if let Some((first, _)) = by_version.get(&version) {
                return Err(CoreError::DuplicateVersion {
                    version,
                    first: first.clone(),
                    second: file_name,
                });
            }

            let migration = if selected {
                Some(read_migration(&path, version, &file_name)?)
            } else {
                None
            };
            by_version.insert(version, (file_name, migration));
        }

        let migrations: Vec<Migration> = by_version
            .into_values()
            .filter_map(|(_, migration)| migration)
            .collect();
        log::debug!(
            "Loaded {} migration(s) from {}",
            migrations.len(),
            self.dir.display()
        );
        Ok(migrations)
    }
}

/// The version part of a file stem, with any leading `V` removed
pub fn version_token(stem: &str) -> &str {
    let token = stem.split('_').next().unwrap_or(stem);
    token
        .strip_prefix('V')
        .or_else(|| token.strip_prefix('v'))
        .unwrap_or(token)
}

/// Parse a version token into a positive version number
pub fn parse_version(file: &str, token: &str) -> CoreResult<u32> {
    let malformed = || CoreError::MalformedVersion {
        file: file.to_string(),
        token: token.to_string(),
    };
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    match token.parse::<u32>() {
        Ok(0) | Err(_) => Err(malformed()),
        Ok(version) => Ok(version),
    }
}

fn file_name_of(path: &Path) -> CoreResult<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| CoreError::MalformedVersion {
            file: path.display().to_string(),
            token: String::new(),
        })
}

fn read_migration(path: &Path, version: u32, file_name: &str) -> CoreResult<Migration> {
    let bytes = std::fs::read(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    let checksum = compute_checksum(&bytes);
    let script = String::from_utf8(bytes).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    Ok(Migration::with_checksum(version, checksum, script).from_file(file_name))
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
