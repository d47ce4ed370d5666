use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "chunkname.toml",
        r#"
        [project]
        name = "fixture"

        [entrypoints]
        main = "src/main.ts"

        [resolve.alias]
        "@" = "src"
        "#,
    );
    write(
        root,
        "src/main.ts",
        r#"
        import { debounce } from "lodash";
        const Home = () => import(/* chunkName: "home" */ "./pages/Home.vue");
        const About = () => import(/* chunkName: 'about' */ '@/pages/About.vue');
        "#,
    );
    write(root, "src/pages/Home.vue", "export default {}");
    write(root, "src/pages/About.vue", "export default {}");
    write(root, "node_modules/lodash/package.json", r#"{"main": "lodash.js"}"#);
    write(root, "node_modules/lodash/lodash.js", "export const debounce = () => {};");
    dir
}

fn chunk_name(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chunk-name").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn build_prints_named_chunks() {
    let dir = fixture();
    chunk_name(&dir)
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("home"))
        .stdout(predicate::str::contains("src/pages/Home.vue"))
        .stdout(predicate::str::contains("about"))
        .stdout(predicate::str::contains("vendor"));
}

#[test]
fn build_json_with_min_chunk() {
    let dir = fixture();
    let output = chunk_name(&dir)
        .args(["build", "--json", "--min-chunk"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let chunks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = chunks
        .as_array()
        .unwrap()
        .iter()
        .map(|chunk| chunk["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"main"));
    assert!(names.contains(&"lodash"));
    assert!(!names.contains(&"vendor"));

    let home = chunks
        .as_array()
        .unwrap()
        .iter()
        .find(|chunk| chunk["name"] == "home")
        .unwrap();
    assert_eq!(home["type"], "async");
    assert_eq!(home["modules"][0], "src/pages/Home.vue");
}

#[test]
fn scan_records_table() {
    let dir = fixture();
    let output = chunk_name(&dir)
        .args(["scan", "src", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let table: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let table = table.as_object().unwrap();
    assert_eq!(table.len(), 2);
    assert!(table
        .iter()
        .any(|(id, name)| id.ends_with("/src/pages/About.vue") && name == "about"));
    assert!(table
        .iter()
        .any(|(id, name)| id.ends_with("/src/pages/Home.vue") && name == "home"));
}

#[test]
fn build_without_config_fails() {
    let dir = TempDir::new().unwrap();
    chunk_name(&dir)
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}
