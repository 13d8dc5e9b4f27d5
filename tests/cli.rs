//! Command-line behaviour of the compiled binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn lesson_site(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lesson-site"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary runs")
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn course() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "site.toml", "modules = [\"0-Base\", \"1-Mais\", \"9-Nada\"]\n");
    write(tmp.path(), "0-Base/a.md", "# Alpha\n\nTexto.\n");
    write(tmp.path(), "0-Base/b.md", "# Beta\n\nTexto.\n");
    write(tmp.path(), "1-Mais/c.md", "## Gama\n\nTexto.\n");
    tmp
}

fn root_arg(tmp: &TempDir) -> String {
    tmp.path().to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn full_build_succeeds() {
    let tmp = course();
    let output = lesson_site(&["--root", &root_arg(&tmp)]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = tmp.path().join("docs/html");
    assert!(out.join("0-Base/a.html").is_file());
    assert!(out.join("0-Base/index.html").is_file());
    assert!(out.join("1-Mais/c.html").is_file());
    assert!(out.join("1-Mais/index.html").is_file());

    let text = stdout(&output);
    assert!(text.contains("Skipped (no directory): 9-Nada"));
    assert!(text.contains("Generated 3 pages, 2 module pages, 0 failures"));
}

#[test]
fn output_flag_overrides_config() {
    let tmp = course();
    let site = tmp.path().join("site-out");
    let output = lesson_site(&[
        "--root",
        &root_arg(&tmp),
        "--output",
        &site.to_string_lossy(),
    ]);

    assert!(output.status.success());
    assert!(site.join("0-Base/index.html").is_file());
    assert!(!tmp.path().join("docs/html").exists());
}

#[test]
fn module_argument_builds_only_its_index() {
    let tmp = course();
    let output = lesson_site(&["--root", &root_arg(&tmp), "0-Base"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = tmp.path().join("docs/html");
    assert!(out.join("0-Base/index.html").is_file());
    assert!(!out.join("0-Base/a.html").exists());
    assert!(!out.join("1-Mais").exists());
}

#[test]
fn unknown_module_argument_fails() {
    let tmp = course();
    let output = lesson_site(&["--root", &root_arg(&tmp), "nao-existe"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("nao-existe"));
    assert!(!tmp.path().join("docs/html").exists());
}

#[test]
fn broken_lesson_gives_nonzero_exit_but_builds_the_rest() {
    let tmp = course();
    fs::write(tmp.path().join("1-Mais/quebrada.md"), [0xff, 0xfe]).unwrap();

    let output = lesson_site(&["--root", &root_arg(&tmp)]);

    assert!(!output.status.success());
    assert!(tmp.path().join("docs/html/0-Base/index.html").is_file());
    assert!(tmp.path().join("docs/html/1-Mais/c.html").is_file());
    assert!(stdout(&output).contains("FAILED"));
}

#[test]
fn invalid_config_fails() {
    let tmp = course();
    write(tmp.path(), "site.toml", "[page]\nnot_a_key = 1\n");

    let output = lesson_site(&["--root", &root_arg(&tmp)]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("not_a_key"));
}

#[test]
fn gen_config_prints_valid_toml() {
    let output = lesson_site(&["gen-config"]);

    assert!(output.status.success());
    let text = stdout(&output);
    let value: toml::Value = toml::from_str(&text).expect("gen-config output parses");
    assert!(value.get("modules").is_some());
    assert!(text.contains("[module_index]"));
}

#[test]
fn scan_lists_modules() {
    let tmp = course();
    let output = lesson_site(&["--root", &root_arg(&tmp), "scan"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("001 0-Base (2 lessons, 2 sections)"));
    assert!(text.contains("    a.md"));
    assert!(text.contains("Missing"));
    assert!(text.contains("Found 3 lessons in 2 modules"));
    assert!(!tmp.path().join("docs/html").exists());
}

#[test]
fn scan_json_is_machine_readable() {
    let tmp = course();
    let output = lesson_site(&["--root", &root_arg(&tmp), "scan", "--json"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["modules"][1]["name"], "1-Mais");
    assert_eq!(value["missing"][0], "9-Nada");
}

#[test]
fn verbose_logs_written_files() {
    let tmp = course();
    let output = lesson_site(&["--root", &root_arg(&tmp), "--verbose"]);

    assert!(output.status.success());
    assert!(stderr(&output).contains("wrote page"));
}
