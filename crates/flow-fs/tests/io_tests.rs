use flow_fs::{Error, NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_read_text_returns_content() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");
    fs::write(&file_path, "{\"DESIGN_NAME\": \"spm\"}").unwrap();

    let content = io::read_text(&NormalizedPath::new(&file_path)).unwrap();
    assert_eq!(content, "{\"DESIGN_NAME\": \"spm\"}");
}

#[test]
fn test_read_text_nonexistent_file_reports_path() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("missing.json"));

    let err = io::read_text(&path).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn test_read_text_refuses_directories() {
    let temp = TempDir::new().unwrap();
    let err = io::read_text(&NormalizedPath::new(temp.path())).unwrap_err();
    assert!(matches!(err, Error::IsDirectory { .. }));
}

#[test]
fn test_entries_with_prefix_is_sorted() {
    let temp = TempDir::new().unwrap();
    for name in ["b_lib", "a_lib", "other"] {
        fs::create_dir(temp.path().join(name)).unwrap();
    }
    fs::write(temp.path().join("a_file"), "").unwrap();

    let names = io::entries_with_prefix(&NormalizedPath::new(temp.path()), "a_").unwrap();
    assert_eq!(names, vec!["a_file", "a_lib"]);
}
