//! Changelog housekeeping around `lb generate-*` runs.
//!
//! SQLcl's Liquibase extension cannot update files it generated earlier, so
//! every generated changelog is removed before regeneration and rebuilt from
//! scratch. Regeneration of an unchanged database reproduces the same files,
//! which keeps version control quiet. SQLcl also leaves blank lines behind,
//! which [`clean`] strips afterwards.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::utils::io;

/// A changeSet tag whose author ends in `-Generated`, e.g.
/// `<changeSet id="..." author="(APP)-Generated" ...>`.
static GENERATED_CHANGESET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<changeSet\b.*author="[^"]*-Generated""#).unwrap());

/// Whether a single line declares a tool-generated changeSet.
pub fn is_generated_line(line: &str) -> bool {
    GENERATED_CHANGESET.is_match(line)
}

/// `path` without `.` components. glob reports `./schema/a.xml` as
/// `schema/a.xml`, so paths are compared in this form.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// All `*.xml` files below `dir`, recursively, in path order.
pub fn xml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let base = normalize(dir);
    let base = if base.as_os_str().is_empty() {
        ".".to_string()
    } else {
        base.display().to_string()
    };
    let pattern = format!("{}/**/*.xml", glob::Pattern::escape(&base));

    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| {
            Error::validation_invalid_argument(
                "directory",
                format!("Invalid changelog pattern '{}': {}", pattern, e),
            )
        })?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();

    files.sort();
    Ok(files)
}

fn is_controller(dir: &Path, file: &Path) -> bool {
    let file = normalize(file);
    let Ok(rest) = file.strip_prefix(normalize(dir)) else {
        return false;
    };

    rest.components().count() == 1
        && rest
            .to_str()
            .is_some_and(|n| n.starts_with("controller"))
}

/// Delete previously generated changelogs under `dir` ahead of regeneration.
///
/// A file is removed whole when any of its lines declares a generated
/// changeSet. With `remove_controller`, top-level `controller*.xml` files are
/// removed unconditionally. Returns the removed paths.
pub fn prepare(dir: &Path, remove_controller: bool) -> Result<Vec<PathBuf>> {
    info!("Cleaning up {}...", dir.display());

    let mut removed = Vec::new();
    for file in xml_files(dir)? {
        debug!("Processing {}", file.display());

        let condemned = if remove_controller && is_controller(dir, &file) {
            true
        } else {
            let content = io::read_file(&file, &format!("read {}", file.display()))?;
            content.lines().any(is_generated_line)
        };

        if condemned {
            info!("Removing {} for regeneration", file.display());
            io::remove_file(&file, &format!("remove {}", file.display()))?;
            removed.push(file);
        }
    }

    Ok(removed)
}

/// Drop whitespace-only lines, keeping every other line byte-for-byte.
pub fn strip_blank_lines(content: &str) -> String {
    content
        .split_inclusive('\n')
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Strip blank lines from every changelog under `dir`, in place.
///
/// Files that are already clean are not rewritten. Returns the rewritten paths.
pub fn clean(dir: &Path) -> Result<Vec<PathBuf>> {
    info!("Cleaning up {}...", dir.display());

    let mut rewritten = Vec::new();
    for file in xml_files(dir)? {
        debug!("Processing {}", file.display());

        let content = io::read_file(&file, &format!("read {}", file.display()))?;
        let stripped = strip_blank_lines(&content);
        if stripped != content {
            io::write_file(&file, &stripped, &format!("rewrite {}", file.display()))?;
            rewritten.push(file);
        }
    }

    Ok(rewritten)
}
