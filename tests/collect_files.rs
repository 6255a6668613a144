use std::fs;
use std::path::Path;

use docscribe::collect::collect_files;
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn collects_only_allowed_extensions_outside_excluded_dirs() {
    let dir = tempdir().unwrap();
    let root = dir.path();

    write(root, "app.js", "console.log('app');");
    write(root, "ui/button.tsx", "export const Button = () => null;");
    write(root, "ui/style.scss", ".btn { color: red; }");
    write(root, "README.md", "# readme");
    write(root, "node_modules/lib.js", "module.exports = {};");
    write(root, "ui/coverage/cov.js", "covered();");
    write(root, ".git/config.js", "not really source");
    write(root, "dist/bundle.js", "minified");

    let files = collect_files(root).expect("collection should succeed");

    let mut rel_paths: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();
    rel_paths.sort();
    assert_eq!(
        rel_paths,
        vec!["app.js", "ui/button.tsx", "ui/style.scss"],
        "Exactly the allow-listed files outside deny-listed dirs should be collected"
    );
}

#[test]
fn rel_paths_are_relative_to_the_feature_root() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(root, "nested/deep/page.html", "<html></html>");

    let files = collect_files(root).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].rel_path, "nested/deep/page.html");
    assert!(files[0].path.is_absolute() || files[0].path.starts_with(root));
}

#[test]
fn empty_tree_yields_no_files() {
    let dir = tempdir().unwrap();
    let files = collect_files(dir.path()).unwrap();
    assert!(files.is_empty());
}

#[test]
fn missing_root_is_a_fatal_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    assert!(collect_files(&missing).is_err());
}
