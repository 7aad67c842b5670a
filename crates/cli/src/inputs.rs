//! Input discovery for batch mode.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clipforge_core::job::is_supported_input;

/// Lists the supported video files directly inside `dir`, sorted by name.
///
/// Subdirectories are not descended into; a batch covers one folder.
pub fn collect_inputs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_supported_input(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Default output folder for a batch: a sibling of the input folder named
/// "<folder name> <preset tag>".
pub fn batch_output_dir(input_dir: &Path, preset_tag: &str) -> PathBuf {
    let name = input_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input_dir
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{name} {preset_tag}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_collect_inputs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("b.mp4")).unwrap();
        File::create(dir.path().join("a.MKV")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        File::create(dir.path().join("nested").join("c.mp4")).unwrap();

        let files = collect_inputs(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.MKV", "b.mp4"]);
    }

    #[test]
    fn test_collect_inputs_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_inputs(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_batch_output_dir_is_tagged_sibling() {
        let out = batch_output_dir(Path::new("/media/clips"), "Remove Audio");
        assert_eq!(out, PathBuf::from("/media/clips Remove Audio"));
    }
}
