use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn command(workdir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("docs-builder"));
    cmd.current_dir(workdir.path())
        .env_remove("DOCS_BUILDER_CONFIG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn builds_docs_and_logs_each_file() {
    let workdir = TempDir::new().expect("tempdir");
    let src = workdir.path().join("src");
    fs::create_dir_all(src.join("sub")).expect("mkdir");
    fs::write(src.join("a.md"), "# Hello").expect("write");
    fs::write(src.join("sub/b.md"), "**world**").expect("write");

    command(&workdir)
        .args(["--src-dir", "src", "--build-dir", "out"])
        .assert()
        .success()
        .stdout(contains("a.html"))
        .stdout(contains("b.html"));

    assert!(workdir.path().join("out/a.html").is_file());
    assert!(workdir.path().join("out/sub/b.html").is_file());
}

#[test]
fn missing_source_fails() {
    let workdir = TempDir::new().expect("tempdir");

    command(&workdir)
        .args(["--src-dir", "does-not-exist", "--build-dir", "out"])
        .assert()
        .failure()
        .stdout(contains("source directory not found"));
}

#[test]
fn config_file_supplies_paths() {
    let workdir = TempDir::new().expect("tempdir");
    fs::create_dir_all(workdir.path().join("pages")).expect("mkdir");
    fs::write(workdir.path().join("pages/index.md"), "# Index").expect("write");
    fs::write(
        workdir.path().join("docs-builder.toml"),
        "[paths]\nsrc_dir = \"pages\"\nbuild_dir = \"site\"\n",
    )
    .expect("write config");

    command(&workdir).assert().success();

    assert!(workdir.path().join("site/index.html").is_file());
}
