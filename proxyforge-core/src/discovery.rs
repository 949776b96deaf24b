//! Footage discovery.
//!
//! The footage root is expected to hold one sub-directory per shoot day (or
//! card, or camera). Each of those is walked recursively for camera files and
//! mirrored one level deep under the proxy root:
//! `<proxy_root>/<group>/<stem>.<extension>`.

use crate::config::FOOTAGE_EXTENSIONS;
use crate::error::{CoreError, CoreResult};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// One source file and where its proxy goes. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceItem {
    source_path: PathBuf,
    group: String,
    output_path: PathBuf,
}

impl SourceItem {
    pub fn new(source_path: PathBuf, group: impl Into<String>, output_path: PathBuf) -> Self {
        Self {
            source_path,
            group: group.into(),
            output_path,
        }
    }

    /// Builds the item for `source_path` in `group`, deriving the proxy path.
    pub fn for_group(
        source_path: PathBuf,
        group: &str,
        proxy_root: &Path,
        extension: &str,
    ) -> CoreResult<Self> {
        let stem = source_path.file_stem().ok_or_else(|| {
            CoreError::PathError(format!(
                "Failed to get filename stem for {}",
                source_path.display()
            ))
        })?;
        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(extension.trim_start_matches('.'));
        let output_path = proxy_root.join(group).join(file_name);
        Ok(Self::new(source_path, group, output_path))
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Name of the top-level footage sub-directory this file came from.
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Source file name for display and overlays.
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }
}

/// Checks whether `path` has a camera footage extension and is not a macOS
/// resource fork (`._*`).
#[must_use]
pub fn is_footage_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with("._") {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FOOTAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Discovers every footage file under the group directories of `footage_root`.
///
/// Groups are visited in name order and files within a group in path order,
/// so the batch order is stable between runs. Files sitting directly in
/// `footage_root` are not part of any group and are skipped.
///
/// # Errors
///
/// * `CoreError::Io` / `CoreError::Walkdir` - the tree could not be read
/// * `CoreError::PathError` - two sources in one group would share a proxy path
/// * `CoreError::NoFilesFound` - no footage was found at all
pub fn find_source_items(
    footage_root: &Path,
    proxy_root: &Path,
    extension: &str,
) -> CoreResult<Vec<SourceItem>> {
    let mut groups: Vec<(String, PathBuf)> = std::fs::read_dir(footage_root)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if !path.is_dir() {
                return None;
            }
            Some((entry.file_name().to_string_lossy().into_owned(), path))
        })
        .collect();
    groups.sort();

    let mut items: Vec<SourceItem> = Vec::new();
    let mut claimed: HashMap<PathBuf, usize> = HashMap::new();
    for (group, group_dir) in groups {
        let mut files = Vec::new();
        for entry in WalkDir::new(&group_dir).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && is_footage_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
        log::debug!("Group '{}': {} footage file(s)", group, files.len());
        for file in files {
            let item = SourceItem::for_group(file, &group, proxy_root, extension)?;
            if let Some(&first) = claimed.get(item.output_path()) {
                return Err(CoreError::PathError(format!(
                    "{} and {} would both be written to {}",
                    items[first].source_path().display(),
                    item.source_path().display(),
                    item.output_path().display()
                )));
            }
            claimed.insert(item.output_path().to_path_buf(), items.len());
            items.push(item);
        }
    }

    if items.is_empty() {
        Err(CoreError::NoFilesFound)
    } else {
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_footage_file() {
        assert!(is_footage_file(Path::new("/a/A001.MOV")));
        assert!(is_footage_file(Path::new("/a/clip.mp4")));
        assert!(is_footage_file(Path::new("/a/clip.Mxf")));
        assert!(!is_footage_file(Path::new("/a/._A001.MOV")));
        assert!(!is_footage_file(Path::new("/a/notes.txt")));
        assert!(!is_footage_file(Path::new("/a/clip")));
    }

    #[test]
    fn test_output_path_mirrors_group() {
        let item = SourceItem::for_group(
            PathBuf::from("/footage/day1/CARD_A/A001.MXF"),
            "day1",
            Path::new("/proxies"),
            "mov",
        )
        .unwrap();
        assert_eq!(item.output_path(), Path::new("/proxies/day1/A001.mov"));
        assert_eq!(item.group(), "day1");
        assert_eq!(item.file_name(), "A001.MXF");
    }
}
