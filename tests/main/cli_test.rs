//! CLI contract tests, run in `--dry-run` mode so nothing leaves the machine.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        match tempfile::tempdir() {
            Ok(dir) => Self { dir },
            Err(err) => panic!("temp dir should be created: {err}"),
        }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        assert!(fs::write(&path, contents).is_ok());
        path
    }

    /// Command with an isolated config path and dry-run delivery.
    fn tasksms(&self, config: Option<&str>) -> Command {
        let config_path = match config {
            Some(contents) => self.write("config.toml", contents),
            None => self.dir.path().join("absent.toml"),
        };
        let mut cmd = match Command::cargo_bin("tasksms") {
            Ok(cmd) => cmd,
            Err(err) => panic!("binary should build: {err}"),
        };
        cmd.arg("--config").arg(config_path).arg("--dry-run");
        cmd
    }
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn remind_prints_formatted_reminder() {
    let fx = Fixture::new();
    let task = fx.write(
        "task.json",
        r#"{"title":"Complete project report","description":"Finish Q4 analysis","dueDate":"2024-02-22T15:00:00","priority":"high"}"#,
    );

    let output = fx
        .tasksms(None)
        .args(["--force", "remind", "--to", "+15555550123", "--task"])
        .arg(task)
        .output();
    let output = match output {
        Ok(output) => output,
        Err(err) => panic!("command should run: {err}"),
    };

    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "Task Reminder: Complete project report\nDescription: Finish Q4 analysis\nDue: February 22, 2024 at 03:00 PM\nPriority: high\n"
    );
}

#[test]
fn summary_with_unknown_priority_fails_and_prints_nothing() {
    let fx = Fixture::new();
    let tasks = fx.write(
        "tasks.json",
        r#"[{"title":"A","priority":"high"},{"title":"B","priority":"urgent"}]"#,
    );

    let output = fx
        .tasksms(None)
        .args(["--force", "summary", "--to", "+15555550123", "--tasks"])
        .arg(tasks)
        .output();
    let output = match output {
        Ok(output) => output,
        Err(err) => panic!("command should run: {err}"),
    };

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn send_reads_recipient_and_message_from_stdin() {
    let fx = Fixture::new();
    let output = fx
        .tasksms(None)
        .args(["--force", "send"])
        .write_stdin("+15555550123\nPick up groceries\nand milk\n")
        .output();
    let output = match output {
        Ok(output) => output,
        Err(err) => panic!("command should run: {err}"),
    };

    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "Pick up groceries\nand milk\n");
}

#[test]
fn recipient_falls_back_to_config_and_preferences_gate_delivery() {
    let fx = Fixture::new();
    let config = r#"
[sms]
enabled = true
phone_number = "+15555550123"

[sms.quiet_hours]
start = "00:00"
end = "00:00"
"#;

    // Daily summaries are off by default: held back, exit 0, nothing printed.
    let tasks = fx.write("tasks.json", r#"[{"title":"A","priority":"low"}]"#);
    let output = fx
        .tasksms(Some(config))
        .args(["summary", "--tasks"])
        .arg(&tasks)
        .output();
    let output = match output {
        Ok(output) => output,
        Err(err) => panic!("command should run: {err}"),
    };
    assert!(output.status.success());
    assert!(stdout_of(&output).is_empty());

    // Reminders are on by default and the quiet window is empty.
    let task = fx.write("task.json", r#"{"title":"A","priority":"low"}"#);
    let output = fx
        .tasksms(Some(config))
        .args(["remind", "--task"])
        .arg(&task)
        .output();
    let output = match output {
        Ok(output) => output,
        Err(err) => panic!("command should run: {err}"),
    };
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "Task Reminder: A\nPriority: low\n");
}

#[test]
fn missing_recipient_is_an_error() {
    let fx = Fixture::new();
    let insights = fx.write("insights.txt", "Batch your email.");
    let output = fx
        .tasksms(None)
        .args(["--force", "insights", "--file"])
        .arg(insights)
        .output();
    let output = match output {
        Ok(output) => output,
        Err(err) => panic!("command should run: {err}"),
    };
    assert!(!output.status.success());
}

#[test]
fn log_dir_writes_json_log_file() {
    let fx = Fixture::new();
    let logs_dir = fx.dir.path().join("logs");

    let output = fx
        .tasksms(None)
        .arg("--log-dir")
        .arg(&logs_dir)
        .args(["--force", "send", "--to", "+15555550123", "--text", "hello"])
        .output();
    let output = match output {
        Ok(output) => output,
        Err(err) => panic!("command should run: {err}"),
    };
    assert!(output.status.success(), "{output:?}");
    assert!(stdout_of(&output).contains("hello"));

    let entries = match fs::read_dir(&logs_dir) {
        Ok(entries) => entries,
        Err(err) => panic!("logs dir should exist: {err}"),
    };
    let log_files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("tasksms.log"))
        })
        .collect();
    assert_eq!(log_files.len(), 1, "{log_files:?}");

    let contents = match fs::read_to_string(&log_files[0]) {
        Ok(contents) => contents,
        Err(err) => panic!("log file should be readable: {err}"),
    };
    assert!(contents.contains(r#""level":"INFO""#), "{contents}");
    assert!(contents.contains("***0123"), "{contents}");
    assert!(!contents.contains("+15555550123"), "{contents}");
}
