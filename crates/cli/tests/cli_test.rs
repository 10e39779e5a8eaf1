//! End-to-end tests for the code-runner binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// The binary, isolated from the user's own config file
fn code_runner(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("code-runner").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("VIRTUAL_ENV")
        .env_remove("CONDA_PREFIX")
        .env_remove("RUST_LOG");
    cmd
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".code-runner.json"),
        r#"{ "code-runner.executorMap": { "shellscript": "sh" } }"#,
    )
    .unwrap();
    temp
}

#[test]
fn test_languages_lists_defaults() {
    let home = TempDir::new().unwrap();
    code_runner(home.path())
        .arg("languages")
        .current_dir(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("python\n"))
        .stdout(predicate::str::contains("rust\n"));
}

#[test]
fn test_resolve_prints_template_and_command() {
    let home = TempDir::new().unwrap();
    let temp = project();
    let script = temp.path().join("main.py");
    fs::write(&script, "print('hi')\n").unwrap();

    let output = code_runner(home.path())
        .args(["resolve", script.to_str().unwrap(), "--json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["languageId"], "python");
    assert_eq!(value["template"], "python -u");
    let command = value["command"].as_str().unwrap();
    assert!(command.starts_with("python -u \""));
    assert!(command.ends_with("main.py\""));
}

#[test]
fn test_run_streams_output_and_exit_code() {
    let home = TempDir::new().unwrap();
    let temp = project();
    let script = temp.path().join("hello.sh");
    fs::write(&script, "echo hello from sh\necho oops >&2\nexit 3\n").unwrap();

    code_runner(home.path())
        .args(["run", script.to_str().unwrap()])
        .current_dir(temp.path())
        .assert()
        .code(3)
        .stdout(predicate::str::contains("[Running] sh \""))
        .stdout(predicate::str::contains("hello from sh"))
        .stdout(predicate::str::contains("oops"))
        .stdout(predicate::str::contains("[Done] exited with code=3 in "));
}

#[test]
fn test_run_selected_lines_uses_scratch_file() {
    let home = TempDir::new().unwrap();
    let temp = project();
    let script = temp.path().join("steps.sh");
    fs::write(&script, "echo one\necho two\necho three\n").unwrap();

    code_runner(home.path())
        .args(["run", &format!("{}:2", script.display())])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("two"))
        .stdout(predicate::str::contains("\none\n").not())
        .stdout(predicate::str::contains("tempCodeRunnerFile.sh"));

    // The scratch copy is removed once the run finished
    assert!(!temp.path().join("tempCodeRunnerFile.sh").exists());
}

#[test]
fn test_run_stdin_buffer() {
    let home = TempDir::new().unwrap();
    let temp = project();

    code_runner(home.path())
        .args(["run", "--stdin", "--language", "shellscript", "--cwd"])
        .arg(temp.path())
        .current_dir(temp.path())
        .write_stdin("echo from stdin\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("from stdin"));
}

#[test]
fn test_unsupported_language_fails() {
    let home = TempDir::new().unwrap();
    let temp = project();
    let notes = temp.path().join("notes.xyz");
    fs::write(&notes, "nothing to run\n").unwrap();

    code_runner(home.path())
        .args(["run", notes.to_str().unwrap()])
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Code language not supported or defined."));
}

#[test]
fn test_custom_command_without_file() {
    let home = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".code-runner.json"),
        r#"{ "customCommand": "echo custom-ok" }"#,
    )
    .unwrap();

    code_runner(home.path())
        .args(["custom", "--workspace"])
        .arg(temp.path())
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("custom-ok"));
}

#[test]
fn test_init_writes_project_config() {
    let home = TempDir::new().unwrap();
    let temp = TempDir::new().unwrap();

    code_runner(home.path())
        .args(["init", "--cwd"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config"));

    assert!(temp.path().join(".code-runner.json").is_file());
}
