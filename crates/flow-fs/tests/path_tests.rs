use flow_fs::NormalizedPath;
use rstest::rstest;

#[rstest]
#[case("foo/bar/baz", "foo/bar/baz")]
#[case("foo\\bar\\baz", "foo/bar/baz")]
#[case("foo/bar\\baz", "foo/bar/baz")]
fn test_normalize_slashes(#[case] input: &str, #[case] expected: &str) {
    let path = NormalizedPath::new(input);
    assert_eq!(path.as_str(), expected);
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("pdks/sky130A");
    let joined = base.join("libs.tech");
    assert_eq!(joined.as_str(), "pdks/sky130A/libs.tech");
}

#[test]
fn test_join_with_trailing_slash() {
    let base = NormalizedPath::new("pdks/");
    assert_eq!(base.join("gf180mcuC").as_str(), "pdks/gf180mcuC");
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("designs/spm/config.json");
    let parent = path.parent().unwrap();
    assert_eq!(parent.as_str(), "designs/spm");
}

#[test]
fn test_parent_of_root_child() {
    let path = NormalizedPath::new("/config.json");
    assert_eq!(path.parent().unwrap().as_str(), "/");
}

#[rstest]
#[case("designs/spm/config.json", Some("json"))]
#[case("designs/spm/config.tcl", Some("tcl"))]
#[case("designs/spm/config.yaml", Some("yaml"))]
#[case("designs/spm/.hidden", None)]
#[case("designs/spm/Makefile", None)]
fn test_extension(#[case] input: &str, #[case] expected: Option<&str>) {
    assert_eq!(NormalizedPath::new(input).extension(), expected);
}

#[test]
fn test_file_name() {
    let path = NormalizedPath::new("designs/spm/config.json");
    assert_eq!(path.file_name(), Some("config.json"));
}

#[test]
fn test_absolute_keeps_absolute_paths() {
    let path = NormalizedPath::absolute("/opt/pdks").unwrap();
    assert_eq!(path.as_str(), "/opt/pdks");
}

#[test]
fn test_absolute_anchors_relative_paths() {
    let path = NormalizedPath::absolute("designs/spm").unwrap();
    assert!(path.as_str().ends_with("designs/spm"));
    assert!(path.to_native().is_absolute());
}
