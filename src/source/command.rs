//! Timed subprocess execution
//!
//! Every external query goes through [`run`]. The child is waited on with a
//! hard deadline; stdout and stderr are drained on reader threads so a chatty
//! child cannot fill the pipe and stall the wait. Spawn failures and timeouts
//! come back as a negative [`CommandOutcome`], never as an error.
//!
//! Non-interactive children run in their own process group, so a timeout
//! takes down everything they started. Interactive children stay in the
//! foreground group (a background group cannot read the terminal) and only the
//! child itself is signalled. Either way the kill is SIGTERM, then SIGKILL,
//! each followed by a bounded wait; a child that survives both is left behind.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// How long a signalled child gets to exit before the next step
const REAP_GRACE: Duration = Duration::from_secs(2);

/// A subprocess to run
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
    /// Let the child read the operator's terminal (sudo password prompts, pacman questions)
    pub inherit_stdin: bool,
    pub current_dir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
            inherit_stdin: false,
            current_dir: None,
        }
    }

    pub fn interactive(mut self) -> Self {
        self.inherit_stdin = true;
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Structured result of a subprocess call
///
/// Callers branch on `success`, never on the captured text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub timed_out: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn succeeded(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stderr: stderr.into(),
            ..Self::default()
        }
    }

    pub fn timed_out() -> Self {
        Self {
            timed_out: true,
            ..Self::default()
        }
    }

    fn spawn_failed(reason: String) -> Self {
        Self {
            stderr: reason,
            ..Self::default()
        }
    }

    /// Stdout followed by stderr
    pub fn combined_output(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
        }
    }
}

/// Run a subprocess to completion or until its timeout elapses
pub fn run(spec: &CommandSpec) -> CommandOutcome {
    debug!("Running: {} (timeout {:?})", spec.display(), spec.timeout);

    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .stdin(if spec.inherit_stdin {
            Stdio::inherit()
        } else {
            Stdio::null()
        });
    if let Some(dir) = &spec.current_dir {
        command.current_dir(dir);
    }
    let own_group = cfg!(unix) && !spec.inherit_stdin;
    #[cfg(unix)]
    if own_group {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) => {
            debug!("Failed to spawn {}: {}", spec.program, e);
            return CommandOutcome::spawn_failed(format!("failed to spawn {}: {e}", spec.program));
        }
    };

    let stdout_reader = child.stdout.take().map(drain);
    let stderr_reader = child.stderr.take().map(drain);

    let status = match child.wait_timeout(spec.timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            warn!(
                "{} timed out after {}s, killing it",
                spec.display(),
                spec.timeout.as_secs_f32()
            );
            reap(&mut child, own_group);
            // Grandchildren may still hold the pipes open; the readers are left detached.
            return CommandOutcome::timed_out();
        }
        Err(e) => {
            warn!("Failed to wait for {}: {}", spec.program, e);
            reap(&mut child, own_group);
            return CommandOutcome::spawn_failed(e.to_string());
        }
    };

    let outcome = CommandOutcome {
        success: status.success(),
        exit_code: status.code(),
        timed_out: false,
        stdout: collect(stdout_reader),
        stderr: collect(stderr_reader),
    };
    debug!(
        "{} exited with {:?}",
        spec.display(),
        outcome.exit_code
    );
    outcome
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

#[cfg(unix)]
fn reap(child: &mut Child, own_group: bool) {
    use nix::sys::signal::Signal;

    for sig in [Signal::SIGTERM, Signal::SIGKILL] {
        if let Err(e) = signal(child, own_group, sig) {
            warn!("Failed to send {} to process {}: {}", sig.as_str(), child.id(), e);
        }
        match child.wait_timeout(REAP_GRACE) {
            Ok(Some(_)) => {
                if own_group {
                    // Stragglers that ignored SIGTERM; ESRCH when the group is already gone
                    let _ = signal(child, true, Signal::SIGKILL);
                }
                return;
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Failed to wait for process {}: {}", child.id(), e);
                return;
            }
        }
    }
    warn!(
        "Process {} still running after SIGKILL, leaving it behind",
        child.id()
    );
}

#[cfg(unix)]
fn signal(child: &Child, own_group: bool, sig: nix::sys::signal::Signal) -> nix::Result<()> {
    use nix::errno::Errno;
    use nix::sys::signal::{kill, killpg};
    use nix::unistd::Pid;

    let pid = Pid::from_raw(i32::try_from(child.id()).map_err(|_| Errno::ESRCH)?);
    if own_group {
        killpg(pid, sig)
    } else {
        kill(pid, sig)
    }
}

#[cfg(not(unix))]
fn reap(child: &mut Child, _own_group: bool) {
    if let Err(e) = child.kill() {
        warn!("Failed to kill process {}: {}", child.id(), e);
    }
    if !matches!(child.wait_timeout(REAP_GRACE), Ok(Some(_))) {
        warn!("Process {} did not exit after being killed", child.id());
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_successful_command_captures_stdout() {
        let outcome = run(&CommandSpec::new(
            "sh",
            ["-c", "echo hello; echo oops >&2"],
            Duration::from_secs(5),
        ));
        assert!(outcome.success);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.stdout.trim(), "hello");
        assert_eq!(outcome.stderr.trim(), "oops");
        assert!(!outcome.timed_out);
    }

    #[test]
    fn test_nonzero_exit_is_failure() {
        let outcome = run(&CommandSpec::new(
            "sh",
            ["-c", "exit 3"],
            Duration::from_secs(5),
        ));
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, Some(3));
    }

    #[test]
    fn test_timeout_kills_child() {
        let started = Instant::now();
        let outcome = run(&CommandSpec::new(
            "sleep",
            ["10"],
            Duration::from_millis(200),
        ));
        assert!(!outcome.success);
        assert!(outcome.timed_out);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(target_os = "linux")]
    fn process_alive(pid: &str) -> bool {
        // Zombies count as gone: they only wait for init to reap them
        std::fs::read_to_string(format!("/proc/{pid}/stat")).is_ok_and(|stat| {
            stat.rsplit(')')
                .next()
                .and_then(|rest| rest.trim_start().chars().next())
                != Some('Z')
        })
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_timeout_kills_grandchildren() {
        let dir = tempfile::TempDir::new().unwrap();
        let pid_file = dir.path().join("sleep.pid");
        let script = format!("sleep 30 & echo $! > '{}'; wait", pid_file.display());

        let outcome = run(&CommandSpec::new(
            "sh",
            ["-c".to_string(), script],
            Duration::from_millis(300),
        ));
        assert!(outcome.timed_out);

        let pid = std::fs::read_to_string(&pid_file).unwrap().trim().to_string();
        let deadline = Instant::now() + Duration::from_secs(5);
        while process_alive(&pid) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
        }
        assert!(!process_alive(&pid), "sleep {pid} outlived its timed-out parent");
    }

    #[test]
    fn test_timeout_with_terminal_stdin_still_returns() {
        let started = Instant::now();
        let outcome = run(
            &CommandSpec::new("sh", ["-c", "trap '' TERM; sleep 10"], Duration::from_millis(200))
                .interactive(),
        );
        assert!(outcome.timed_out);
        assert!(started.elapsed() < Duration::from_secs(8));
    }

    #[test]
    fn test_missing_program_is_negative_outcome() {
        let outcome = run(&CommandSpec::new(
            "pacfall-definitely-missing-binary",
            Vec::<String>::new(),
            Duration::from_secs(1),
        ));
        assert!(!outcome.success);
        assert!(!outcome.timed_out);
        assert_eq!(outcome.exit_code, None);
        assert!(outcome.stderr.contains("failed to spawn"));
    }

    #[test]
    fn test_large_output_does_not_deadlock() {
        let outcome = run(&CommandSpec::new(
            "sh",
            ["-c", "i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done"],
            Duration::from_secs(20),
        ));
        assert!(outcome.success);
        assert_eq!(outcome.stdout.lines().count(), 20000);
    }

    #[test]
    fn test_current_dir_is_applied() {
        let dir = tempfile::TempDir::new().unwrap();
        let outcome = run(&CommandSpec::new("pwd", Vec::<String>::new(), Duration::from_secs(5))
            .in_dir(dir.path()));
        assert!(outcome.success);
        let reported = std::fs::canonicalize(outcome.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn test_combined_output() {
        let outcome = CommandOutcome {
            stdout: "out".to_string(),
            stderr: "err".to_string(),
            ..CommandOutcome::default()
        };
        assert_eq!(outcome.combined_output(), "out\nerr");
        assert_eq!(CommandOutcome::failed(1, "err").combined_output(), "err");
    }
}
