#[cfg(unix)]
mod unix {
    use std::{
        fs,
        path::{Path, PathBuf},
        process::{Command, Stdio},
        thread,
        time::{Duration, Instant},
    };

    use tempfile::TempDir;

    fn capture_bin() -> Command {
        Command::new(env!("CARGO_BIN_EXE_command-capture"))
    }

    fn log_file(dir: &Path, prefix: &str) -> PathBuf {
        fs::read_dir(dir)
            .expect("read log dir")
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .find(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(prefix) && name.ends_with(".log"))
            })
            .unwrap_or_else(|| panic!("no {prefix}*.log in {}", dir.display()))
    }

    fn wait_for_contents(path: impl Fn() -> Option<PathBuf>, needle: &str) -> String {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(contents) = path().and_then(|path| fs::read_to_string(path).ok()) {
                if contents.contains(needle) {
                    return contents;
                }
            }
            assert!(Instant::now() < deadline, "timed out waiting for `{needle}`");
            thread::sleep(Duration::from_millis(20));
        }
    }

    #[test]
    fn echo_hello_round_trip() {
        let dir = TempDir::new().expect("temp dir");
        let output = capture_bin()
            .arg("--quiet")
            .arg("--log-dir")
            .arg(dir.path())
            .args(["echo", "hello"])
            .stdin(Stdio::null())
            .output()
            .expect("run command-capture");

        assert_eq!(output.status.code(), Some(0));
        assert_eq!(output.stdout, b"hello\n");
        assert!(output.stderr.is_empty(), "quiet run wrote to stderr");

        let transcript = fs::read_to_string(log_file(dir.path(), "mcp-capture-")).expect("read");
        let lines: Vec<&str> = transcript.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] OUT: hello"), "{}", lines[0]);

        let diagnostics =
            fs::read_to_string(log_file(dir.path(), "command-capture-")).expect("read");
        assert!(diagnostics.contains(" - INFO - Started process echo with PID "));
        assert!(diagnostics.contains(" - INFO - IO logging to "));
        assert!(diagnostics.contains(" - INFO - Script logging to "));
    }

    #[test]
    fn flags_after_the_command_reach_the_child() {
        let dir = TempDir::new().expect("temp dir");
        let output = capture_bin()
            .arg("--log-dir")
            .arg(dir.path())
            .args(["echo", "--quiet", "--log-dir", "x"])
            .stdin(Stdio::null())
            .output()
            .expect("run command-capture");

        assert_eq!(output.status.code(), Some(0));
        assert_eq!(output.stdout, b"--quiet --log-dir x\n");
        // The tool itself stayed verbose.
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Started process echo"), "{stderr}");
    }

    #[test]
    fn console_gets_diagnostics_unless_quiet() {
        let dir = TempDir::new().expect("temp dir");
        let output = capture_bin()
            .arg("--log-dir")
            .arg(dir.path())
            .arg("true")
            .stdin(Stdio::null())
            .output()
            .expect("run command-capture");

        assert_eq!(output.status.code(), Some(0));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Started process true"), "{stderr}");
    }

    #[test]
    fn child_exit_code_becomes_ours() {
        let dir = TempDir::new().expect("temp dir");
        let status = capture_bin()
            .arg("--quiet")
            .arg("--log-dir")
            .arg(dir.path())
            .args(["sh", "-c", "exit 42"])
            .stdin(Stdio::null())
            .status()
            .expect("run command-capture");
        assert_eq!(status.code(), Some(42));
    }

    #[test]
    fn missing_command_reports_spawn_failure() {
        let dir = TempDir::new().expect("temp dir");
        let output = capture_bin()
            .arg("--quiet")
            .arg("--log-dir")
            .arg(dir.path())
            .arg("/nonexistent/command-capture-missing")
            .stdin(Stdio::null())
            .output()
            .expect("run command-capture");

        assert_ne!(output.status.code(), Some(0));
        assert!(output.stdout.is_empty());

        let transcript = fs::read_to_string(log_file(dir.path(), "mcp-capture-")).expect("read");
        assert!(transcript.is_empty());
        let diagnostics =
            fs::read_to_string(log_file(dir.path(), "command-capture-")).expect("read");
        assert!(diagnostics.contains(" - ERROR - "), "{diagnostics}");
        assert!(diagnostics.contains("could not be spawned"), "{diagnostics}");
        assert!(!diagnostics.contains("Started process"));
    }

    #[test]
    fn sigint_exits_nonzero_and_is_logged() {
        let dir = TempDir::new().expect("temp dir");
        let mut child = capture_bin()
            .arg("--quiet")
            .arg("--log-dir")
            .arg(dir.path())
            .args(["sleep", "5"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn command-capture");

        let log_dir = dir.path().to_path_buf();
        let diagnostics_path = move || {
            fs::read_dir(&log_dir)
                .ok()?
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .find(|path| {
                    path.file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.starts_with("command-capture-"))
                })
        };
        wait_for_contents(&diagnostics_path, "Started process sleep");

        let killed = Command::new("kill")
            .arg("-INT")
            .arg(child.id().to_string())
            .status()
            .expect("run kill");
        assert!(killed.success());

        let deadline = Instant::now() + Duration::from_secs(10);
        let status = loop {
            if let Some(status) = child.try_wait().expect("try_wait") {
                break status;
            }
            assert!(Instant::now() < deadline, "command-capture ignored SIGINT");
            thread::sleep(Duration::from_millis(20));
        };
        assert_eq!(status.code(), Some(1));

        let diagnostics = wait_for_contents(&diagnostics_path, "Received signal SIGINT");
        assert!(diagnostics.contains(" - INFO - Received signal SIGINT, exiting..."));
    }
}
