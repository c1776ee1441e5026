//! Running one external search tool with captured output

use crate::error::{RefViewError, Result};
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Output of a finished tool run
#[derive(Debug)]
pub struct CapturedOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CapturedOutput {
    /// grep, git grep and findstr exit with 1 when nothing matched
    pub fn is_no_match(&self) -> bool {
        self.status.code() == Some(1) && self.stdout.is_empty()
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Spawn `executable` in `working_dir` and block until it exits.
///
/// stdin is closed so the tool can never wait for input. Without a timeout
/// the wait is unbounded. With one, the deadline also covers draining the
/// output pipes, which a leftover grandchild may keep open.
pub fn run_captured(
    executable: &str,
    args: &[String],
    working_dir: &Path,
    timeout: Option<Duration>,
) -> Result<CapturedOutput> {
    let launch_error = |source: std::io::Error| RefViewError::ProcessLaunch {
        executable: executable.to_string(),
        source,
    };

    let mut command = Command::new(executable);
    command
        .args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(CREATE_NO_WINDOW);
    }
    // 端末の Ctrl-C はツールではなく refview だけが受け取る
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let child = command.spawn().map_err(launch_error)?;

    match timeout {
        None => {
            let output = child.wait_with_output().map_err(launch_error)?;
            Ok(CapturedOutput {
                status: output.status,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
        Some(timeout) => wait_with_timeout(child, executable, timeout),
    }
}

fn wait_with_timeout(mut child: Child, executable: &str, timeout: Duration) -> Result<CapturedOutput> {
    let launch_error = |source: std::io::Error| RefViewError::ProcessLaunch {
        executable: executable.to_string(),
        source,
    };

    // Pipes are drained on their own threads so a chatty tool cannot block on a full pipe
    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait().map_err(launch_error)? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                log::warn!("'{}' exceeded {:?}, killing it", executable, timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Err(RefViewError::TimedOut {
                    executable: executable.to_string(),
                    timeout,
                });
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    let timed_out = || {
        log::warn!("'{}' exited but its output stayed open past {:?}", executable, timeout);
        RefViewError::TimedOut {
            executable: executable.to_string(),
            timeout,
        }
    };
    let stdout = join_reader(stdout_reader, deadline)
        .ok_or_else(timed_out)?
        .map_err(launch_error)?;
    let stderr = join_reader(stderr_reader, deadline)
        .ok_or_else(timed_out)?
        .map_err(launch_error)?;
    Ok(CapturedOutput {
        status,
        stdout,
        stderr,
    })
}

type Reader = thread::JoinHandle<std::io::Result<Vec<u8>>>;

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Reader {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        pipe.read_to_end(&mut buffer)?;
        Ok(buffer)
    })
}

/// Collect a reader's output, or `None` when `deadline` passes first.
/// The reader thread is left detached in that case.
fn join_reader(reader: Option<Reader>, deadline: Instant) -> Option<std::io::Result<Vec<u8>>> {
    let Some(handle) = reader else {
        return Some(Ok(Vec::new()));
    };
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            return None;
        }
        thread::sleep(POLL_INTERVAL);
    }
    Some(
        handle
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::new(std::io::ErrorKind::Other, "output reader panicked"))),
    )
}
