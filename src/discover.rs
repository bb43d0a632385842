//! Source file discovery.
//!
//! Walks the root directory with the same ignore-aware walker used for
//! repositories (`.gitignore` and hidden files are skipped), keeps files whose
//! extension matches the language table entry, and drops anything matched by
//! an exclusion glob. The result is sorted so that the section order in the
//! assembled document, and therefore the outline order in the compiled PDF,
//! is deterministic.

use crate::language::Language;
use anyhow::{anyhow, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::Walk;
use std::path::{Path, PathBuf};

/// Find all source files of `language` under `root`.
pub fn find_source_files(
    root: &Path,
    language: &Language,
    excludes: &[String],
) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(anyhow!("Path {} isn't a directory!", root.display()));
    }
    let root = std::fs::canonicalize(root)
        .with_context(|| format!("Failed to canonicalize {}", root.display()))?;

    let excludes = build_globset(excludes)?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in Walk::new(&root) {
        let entry =
            entry.with_context(|| format!("Failed to walk directory {}", root.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let ext = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or_default();
        if !language.extensions.contains(&ext) {
            continue;
        }

        // globs match against the path relative to the scan root
        let relative = path.strip_prefix(&root).unwrap_or(path);
        if excludes.is_match(relative) {
            log::debug!("excluding {}", relative.display());
            continue;
        }

        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}

fn build_globset(excludes: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for glob in excludes {
        let glob =
            Glob::new(glob).with_context(|| format!("Failed to parse exclusion glob `{glob}`"))?;
        builder.add(glob);
    }
    builder
        .build()
        .with_context(|| "Failed to build exclusion glob set")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language;

    fn fortran() -> &'static Language {
        language::lookup("fortran").expect("fortran is in the table")
    }

    #[test]
    fn finds_only_matching_extensions_in_sorted_order() {
        let dir = tempfile::tempdir().expect("can create tempdir");
        std::fs::write(dir.path().join("b.f"), "end").unwrap();
        std::fs::write(dir.path().join("a.f90"), "end").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not code").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/c.f90"), "end").unwrap();

        let files = find_source_files(dir.path(), fortran(), &[]).expect("discovery succeeds");

        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path().canonicalize().unwrap()).unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                Path::new("a.f90"),
                Path::new("b.f"),
                Path::new("sub/c.f90")
            ]
        );
    }

    #[test]
    fn exclusion_globs_drop_files() {
        let dir = tempfile::tempdir().expect("can create tempdir");
        std::fs::write(dir.path().join("keep.f90"), "end").unwrap();
        std::fs::create_dir(dir.path().join("vendor")).unwrap();
        std::fs::write(dir.path().join("vendor/skip.f90"), "end").unwrap();

        let files = find_source_files(dir.path(), fortran(), &["vendor/**".to_string()])
            .expect("discovery succeeds");

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.f90"));
    }

    #[test]
    fn a_missing_directory_is_an_error() {
        assert!(find_source_files(Path::new("/does/not/exist"), fortran(), &[]).is_err());
    }

    #[test]
    fn invalid_exclusion_globs_are_an_error() {
        let dir = tempfile::tempdir().expect("can create tempdir");
        assert!(find_source_files(dir.path(), fortran(), &["a{".to_string()]).is_err());
    }
}
