//! Path list handling
//!
//! Inputs are `;` separated lists such as `src/**/*.csproj;!src/legacy/**;build.gradle`.
//! An entry starting with `!` removes every path collected so far that it
//! matches; later includes can add paths back.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::boundary::BoundaryWarning;
use crate::error::{RevStampError, Result};
use crate::version_file::FileKind;

/// Files collected from a path list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathCollection {
    pub files: Vec<PathBuf>,
    /// Set when the list was required but nothing matched
    pub warning: Option<BoundaryWarning>,
}

impl PathCollection {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Expands a `;` separated list of paths and glob patterns.
///
/// # Arguments
/// * `input` - The path list
/// * `required` - Whether an empty result deserves a warning
///
/// # Returns
/// * `Ok(PathCollection)` - Matched files in input order, without duplicates
/// * `Err` - If a pattern is malformed or a matched entry is a directory
///
/// Literal paths that do not exist are left out, like unmatched globs.
pub fn collect_files(input: &str, required: bool) -> Result<PathCollection> {
    let mut files: Vec<PathBuf> = Vec::new();

    for entry in input.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        if let Some(exclusion) = entry.strip_prefix('!') {
            let pattern = Pattern::new(exclusion.trim())?;
            files.retain(|path| !pattern.matches_path(path));
            continue;
        }

        for path in expand(entry)? {
            if path.is_dir() {
                return Err(RevStampError::path(format!(
                    "\"{}\" is a directory.",
                    path.display()
                )));
            }
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }

    let warning = (required && files.is_empty()).then(|| BoundaryWarning::NoFilesMatched {
        input: input.to_string(),
    });

    Ok(PathCollection { files, warning })
}

/// Paths named by one include entry; a literal path counts only if it exists.
fn expand(entry: &str) -> Result<Vec<PathBuf>> {
    if !entry.contains(['*', '?', '[']) {
        let path = PathBuf::from(entry);
        return Ok(if path.exists() { vec![path] } else { Vec::new() });
    }

    glob::glob(entry)?
        .map(|matched| matched.map_err(|e| RevStampError::path(e.to_string())))
        .collect()
}

/// Extension of the last segment of `path`, dot included.
///
/// Both `/` and `\` count as separators, so Windows style paths work on
/// every platform. A dot-file such as `.gitignore` is all extension.
pub fn get_file_extension(path: &str) -> Option<String> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    name.rfind('.').map(|dot| name[dot..].to_string())
}

/// Splits files by the kind their names suggest.
///
/// # Returns
/// The recognised files grouped per kind, and the files of unknown kind
pub fn group_by_kind(files: &[PathBuf]) -> (BTreeMap<FileKind, Vec<PathBuf>>, Vec<PathBuf>) {
    let mut grouped: BTreeMap<FileKind, Vec<PathBuf>> = BTreeMap::new();
    let mut unknown = Vec::new();

    for file in files {
        match FileKind::from_path(file) {
            Some(kind) => grouped.entry(kind).or_default().push(file.clone()),
            None => unknown.push(file.clone()),
        }
    }

    (grouped, unknown)
}

/// Joins paths back into a `;` separated list.
pub fn join_paths<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|p| p.as_ref().display().to_string())
        .collect::<Vec<_>>()
        .join(";")
}
