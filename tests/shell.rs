use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn run_script(script: &str, envs: &[(&str, &Path)]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_shell"))
        .env_remove("HISTFILE")
        .envs(envs.iter().copied())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn runs_builtins_and_externals() {
    let output = run_script("echo 'hello   world'\nprintf '%s-%s' a b\necho\n", &[]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "hello   world\na-b\n");
}

#[test]
fn exit_code_is_propagated() {
    let output = run_script("echo before\nexit 5\necho after\n", &[]);
    assert_eq!(output.status.code(), Some(5));
    assert_eq!(stdout(&output), "before\n");
}

#[test]
fn commands_read_the_script_lines_after_their_own() {
    let output = run_script(
        "sh -c 'read line; echo got: $line'\nhello from script\necho done\n",
        &[],
    );
    assert_eq!(stderr(&output), "");
    assert_eq!(stdout(&output), "got: hello from script\ndone\n");
}

#[test]
fn unknown_command_is_reported_once() {
    let output = run_script("nosuch_command_xyz arg\necho next\n", &[]);
    assert!(output.status.success());
    assert_eq!(stderr(&output), "nosuch_command_xyz: command not found\n");
    assert_eq!(stdout(&output), "next\n");
}

#[test]
fn pipelines_mix_builtins_and_externals() {
    let output = run_script("echo a b c | wc -w\nprintf 'x\\ny\\n' | cat | wc -l\n", &[]);
    let lines: Vec<String> = stdout(&output)
        .lines()
        .map(|line| line.trim().to_string())
        .collect();
    assert_eq!(lines, vec!["3", "2"]);
}

#[test]
fn redirects_write_and_append() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("out.txt");
    let script = format!(
        "echo first > {f}\necho second >> {f}\nls /nonexistent_dir_xyz 2>> {f}\n",
        f = file.display()
    );
    let output = run_script(&script, &[]);
    assert_eq!(stdout(&output), "");

    let content = std::fs::read_to_string(&file).unwrap();
    assert!(content.starts_with("first\nsecond\n"));
    assert!(content.contains("nonexistent_dir_xyz"));
}

#[test]
fn history_builtin_lists_session_lines() {
    let output = run_script("echo one\nhistory 2\n", &[]);
    assert_eq!(stdout(&output), "one\n    1  echo one\n    2  history 2\n");
}

#[test]
fn histfile_is_loaded_and_appended() {
    let dir = tempfile::tempdir().unwrap();
    let histfile = dir.path().join("history");
    std::fs::write(&histfile, "earlier command\n").unwrap();

    let output = run_script("history\n", &[("HISTFILE", histfile.as_path())]);
    assert_eq!(
        stdout(&output),
        "    1  earlier command\n    2  history\n"
    );
    assert_eq!(
        std::fs::read_to_string(&histfile).unwrap(),
        "earlier command\nhistory\n"
    );
}
