use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Files selected for parsing, plus everything that was passed over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSet {
    pub documents: Vec<PathBuf>,
    pub ignored: Vec<PathBuf>,
}

/// Expand files and directories into `.xml` inputs.
///
/// Explicit files keep their argument order; directory entries are sorted by
/// path. Non-XML files land in `ignored`.
pub fn collect_inputs(paths: &[PathBuf], recursive: bool) -> Result<InputSet> {
    let mut set = InputSet::default();
    for path in paths {
        if path.is_dir() {
            scan_directory(path, recursive, &mut set)?;
        } else if path.is_file() {
            push_file(path, &mut set);
        } else {
            return Err(CoreError::InputNotFound(path.display().to_string()));
        }
    }
    Ok(set)
}

fn scan_directory(dir: &Path, recursive: bool, set: &mut InputSet) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            if recursive {
                scan_directory(&path, true, set)?;
            }
        } else if path.is_file() {
            push_file(&path, set);
        }
    }
    Ok(())
}

fn push_file(path: &Path, set: &mut InputSet) {
    if is_xml_file(path) {
        set.documents.push(path.to_path_buf());
    } else {
        set.ignored.push(path.to_path_buf());
    }
}

/// Check if a path has an `.xml` extension.
pub fn is_xml_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("xml"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_collect_directory() {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("b.xml")).unwrap();
        File::create(dir.path().join("a.xml")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();

        let set = collect_inputs(&[dir.path().to_path_buf()], false).unwrap();
        let names: Vec<_> = set
            .documents
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.xml", "b.xml"]);
        assert_eq!(set.ignored.len(), 1);
    }

    #[test]
    fn test_collect_recursive() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("nested");
        fs::create_dir(&sub).unwrap();
        File::create(dir.path().join("root.xml")).unwrap();
        File::create(sub.join("inner.xml")).unwrap();

        let flat = collect_inputs(&[dir.path().to_path_buf()], false).unwrap();
        assert_eq!(flat.documents.len(), 1);

        let deep = collect_inputs(&[dir.path().to_path_buf()], true).unwrap();
        assert_eq!(deep.documents.len(), 2);
    }

    #[test]
    fn test_explicit_files_keep_order() {
        let dir = TempDir::new().unwrap();
        let z = dir.path().join("z.xml");
        let a = dir.path().join("a.xml");
        File::create(&z).unwrap();
        File::create(&a).unwrap();

        let set = collect_inputs(&[z.clone(), a.clone()], false).unwrap();
        assert_eq!(set.documents, vec![z, a]);
    }

    #[test]
    fn test_missing_input() {
        let err = collect_inputs(&[PathBuf::from("/nonexistent/catalogist/input.xml")], false)
            .unwrap_err();
        assert!(matches!(err, CoreError::InputNotFound(_)));
    }

    #[test]
    fn test_is_xml_file() {
        assert!(is_xml_file(Path::new("ARS-0042.xml")));
        assert!(is_xml_file(Path::new("record.XML")));
        assert!(!is_xml_file(Path::new("record.json")));
        assert!(!is_xml_file(Path::new("xml")));
    }
}
