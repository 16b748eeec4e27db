//! The command runner.

use std::process::Stdio;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

use super::console::{Console, TerminalConsole};
use super::progress::ProgressIndicator;
use super::scrollback::row_count;
use super::types::{CommandOptions, CommandResult};
use crate::config::RunnerConfig;
use crate::debuglog::{DebugLog, TranscriptEntry};

/// Exit code reported when the process could not be spawned or was killed.
const NO_EXIT_CODE: i32 = -1;

const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

/// Runs external commands one at a time.
pub struct CommandRunner {
    config: RunnerConfig,
    debug_log: Option<DebugLog>,
    console: Arc<dyn Console>,
}

impl CommandRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config, debug_log: None, console: Arc::new(TerminalConsole) }
    }

    /// Transcript destination used when debug mode is on.
    pub fn with_debug_log(mut self, log: DebugLog) -> Self {
        self.debug_log = Some(log);
        self
    }

    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    /// Run `command` through `sh -c` and wait for it to close.
    ///
    /// Never fails: spawn errors and non-zero exits are both reported through
    /// [`CommandResult::exit_code`] and [`CommandResult::stderr`].
    pub async fn run(
        &self,
        command: &str,
        options: CommandOptions,
        mut progress: Option<&mut dyn ProgressIndicator>,
    ) -> CommandResult {
        let realtime = options.realtime.unwrap_or(progress.is_none());
        let keep_output = options.keep_output || self.config.diagnostic;

        if self.config.debug {
            self.console.write_stderr(format!("$ {command}\n").as_bytes());
            self.transcript(&TranscriptEntry::started(command));
        }
        tracing::debug!(command, realtime, keep_output, "spawning command");

        if let Some(p) = progress.as_deref_mut() {
            p.start();
        }

        let result = self.execute(command, realtime).await;

        if let Some(p) = progress.as_deref_mut() {
            p.stop();
        }

        tracing::debug!(command, exit_code = result.exit_code, "command closed");

        if self.config.debug {
            self.transcript(&TranscriptEntry::finished(
                result.exit_code,
                result.stdout.as_str(),
                result.stderr.as_str(),
            ));
        }

        if realtime {
            let echoed = !result.stdout.is_empty() || !result.stderr.is_empty();
            if progress.is_none() && !keep_output && echoed {
                // stdout then stderr, as captured; not the interleaved terminal order.
                let text = format!("{}{}", result.stdout, result.stderr);
                self.console.erase_rows(row_count(&text, self.console.width()));
            }
        } else if !result.stderr.is_empty() && result.exit_code != 0 && !options.silent {
            self.console.write_stderr(result.stderr.as_bytes());
        }

        result
    }

    async fn execute(&self, command: &str, realtime: bool) -> CommandResult {
        let mut child = match Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return CommandResult {
                    exit_code: NO_EXIT_CODE,
                    stdout: String::new(),
                    stderr: format!("failed to spawn `{command}`: {e}"),
                };
            }
        };

        let echo = realtime.then(|| Arc::clone(&self.console));
        let stdout = pump(child.stdout.take(), Stream::Stdout, echo.clone());
        let stderr = pump(child.stderr.take(), Stream::Stderr, echo);

        let status = child.wait().await;
        let stdout = stdout.await.unwrap_or_default();
        let stderr = stderr.await.unwrap_or_default();

        let (exit_code, stderr) = match status {
            Ok(status) => (status.code().unwrap_or(NO_EXIT_CODE), stderr),
            Err(e) => {
                let mut stderr = stderr;
                stderr.extend_from_slice(format!("failed to wait for `{command}`: {e}").as_bytes());
                (NO_EXIT_CODE, stderr)
            }
        };

        CommandResult {
            exit_code,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        }
    }

    fn transcript(&self, entry: &TranscriptEntry) {
        if let Some(log) = &self.debug_log {
            log.record(entry);
        }
    }
}

/// Drain one pipe into a buffer, echoing each chunk as it arrives.
fn pump<R>(
    reader: Option<R>,
    stream: Stream,
    echo: Option<Arc<dyn Console>>,
) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        let Some(mut reader) = reader else {
            return buf;
        };
        let mut chunk = vec![0u8; CHUNK_SIZE];
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    let data = &chunk[..n];
                    buf.extend_from_slice(data);
                    if let Some(console) = &echo {
                        match stream {
                            Stream::Stdout => console.write_stdout(data),
                            Stream::Stderr => console.write_stderr(data),
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("failed to read {stream:?}: {e}");
                    break;
                }
            }
        }
        buf
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Stdout(String),
        Stderr(String),
        Erase(usize),
    }

    #[derive(Default)]
    struct RecordingConsole {
        events: Mutex<Vec<Event>>,
    }

    impl RecordingConsole {
        fn events(&self) -> Vec<Event> {
            self.events.lock().unwrap().clone()
        }

        fn stdout(&self) -> String {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Event::Stdout(s) => Some(s),
                    _ => None,
                })
                .collect()
        }

        fn erasures(&self) -> Vec<usize> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    Event::Erase(n) => Some(n),
                    _ => None,
                })
                .collect()
        }
    }

    impl Console for RecordingConsole {
        fn write_stdout(&self, chunk: &[u8]) {
            let text = String::from_utf8_lossy(chunk).into_owned();
            self.events.lock().unwrap().push(Event::Stdout(text));
        }

        fn write_stderr(&self, chunk: &[u8]) {
            let text = String::from_utf8_lossy(chunk).into_owned();
            self.events.lock().unwrap().push(Event::Stderr(text));
        }

        fn width(&self) -> u16 {
            80
        }

        fn erase_rows(&self, rows: usize) {
            self.events.lock().unwrap().push(Event::Erase(rows));
        }
    }

    #[derive(Default)]
    struct CountingProgress {
        starts: usize,
        stops: usize,
    }

    impl ProgressIndicator for CountingProgress {
        fn start(&mut self) {
            self.starts += 1;
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    fn runner(config: RunnerConfig) -> (CommandRunner, Arc<RecordingConsole>) {
        let console = Arc::new(RecordingConsole::default());
        let runner = CommandRunner::new(config).with_console(console.clone());
        (runner, console)
    }

    #[tokio::test]
    async fn test_captures_both_streams_and_exit_code() {
        let (runner, console) = runner(RunnerConfig::default());
        let opts = CommandOptions::default().realtime(false).silent();

        let result = runner.run("printf out; printf err >&2; exit 3", opts, None).await;

        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stdout, "out");
        assert_eq!(result.stderr, "err");
        assert!(!result.success());
        assert!(console.events().is_empty());
    }

    #[tokio::test]
    async fn test_failed_quiet_command_surfaces_stderr_once() {
        let (runner, console) = runner(RunnerConfig::default());
        let opts = CommandOptions::default().realtime(false);

        runner.run("echo broken >&2; exit 1", opts, None).await;

        assert_eq!(console.events(), vec![Event::Stderr("broken\n".into())]);
    }

    #[tokio::test]
    async fn test_successful_quiet_command_prints_nothing() {
        let (runner, console) = runner(RunnerConfig::default());
        let opts = CommandOptions::default().realtime(false);

        let result = runner.run("echo warning >&2", opts, None).await;

        assert!(result.success());
        assert!(console.events().is_empty());
    }

    #[tokio::test]
    async fn test_realtime_echo_is_erased_afterwards() {
        let (runner, console) = runner(RunnerConfig::default());

        let result = runner.run("printf 'a\\nb\\n'", CommandOptions::default(), None).await;

        assert_eq!(result.stdout, "a\nb\n");
        assert_eq!(console.stdout(), "a\nb\n");
        // "a", "b" and the empty line the cursor ends on.
        assert_eq!(console.erasures(), vec![3]);
    }

    #[tokio::test]
    async fn test_erasure_counts_stderr_and_carriage_returns() {
        let (runner, console) = runner(RunnerConfig::default());

        let result = runner
            .run("printf 'p 50%%\\rp 100%%\\n'; printf 'e\\n' >&2", CommandOptions::default(), None)
            .await;

        assert_eq!(result.stdout, "p 50%\rp 100%\n");
        assert_eq!(result.stderr, "e\n");
        // "p 100%" after the overwrite, "e", and the line the cursor ends on.
        let expected = row_count("p 50%\rp 100%\ne\n", 80);
        assert_eq!(expected, 3);
        assert_eq!(console.erasures(), vec![expected]);
    }

    #[tokio::test]
    async fn test_keep_output_skips_erasure() {
        let (runner, console) = runner(RunnerConfig::default());
        let opts = CommandOptions::default().keep_output();

        runner.run("echo kept", opts, None).await;

        assert_eq!(console.stdout(), "kept\n");
        assert!(console.erasures().is_empty());
    }

    #[tokio::test]
    async fn test_diagnostic_mode_forces_keep_output() {
        let config = RunnerConfig { diagnostic: true, ..RunnerConfig::default() };
        let (runner, console) = runner(config);

        runner.run("echo visible", CommandOptions::default(), None).await;

        assert_eq!(console.stdout(), "visible\n");
        assert!(console.erasures().is_empty());
    }

    #[tokio::test]
    async fn test_no_output_means_nothing_to_erase() {
        let (runner, console) = runner(RunnerConfig::default());

        let result = runner.run("true", CommandOptions::default(), None).await;

        assert!(result.success());
        assert!(console.events().is_empty());
    }

    #[tokio::test]
    async fn test_progress_disables_echo_by_default() {
        let (runner, console) = runner(RunnerConfig::default());
        let mut progress = CountingProgress::default();

        let result =
            runner.run("echo hidden", CommandOptions::default(), Some(&mut progress)).await;

        assert_eq!(result.stdout, "hidden\n");
        assert_eq!((progress.starts, progress.stops), (1, 1));
        assert!(console.events().is_empty());
    }

    #[tokio::test]
    async fn test_explicit_realtime_with_progress_echoes_without_erasing() {
        let (runner, console) = runner(RunnerConfig::default());
        let mut progress = CountingProgress::default();
        let opts = CommandOptions::default().realtime(true);

        runner.run("echo shown", opts, Some(&mut progress)).await;

        assert_eq!(console.stdout(), "shown\n");
        assert!(console.erasures().is_empty());
        assert_eq!((progress.starts, progress.stops), (1, 1));
    }

    #[tokio::test]
    async fn test_unknown_command_reports_through_exit_code() {
        let (runner, _console) = runner(RunnerConfig::default());
        let opts = CommandOptions::default().realtime(false).silent();

        let result = runner.run("definitely-not-a-command-xyz", opts, None).await;

        assert_eq!(result.exit_code, 127);
        assert!(!result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_debug_mode_echoes_and_writes_ordered_transcript() {
        let dir = TempDir::new().unwrap();
        let log = DebugLog::new(dir.path().join("debug.log"));
        let config = RunnerConfig { debug: true, ..RunnerConfig::default() };
        let console = Arc::new(RecordingConsole::default());
        let runner =
            CommandRunner::new(config).with_console(console.clone()).with_debug_log(log.clone());
        let opts = CommandOptions::default().realtime(false);

        runner.run("echo first", opts, None).await;
        runner.run("echo second; exit 2", opts, None).await;

        assert_eq!(console.events()[0], Event::Stderr("$ echo first\n".into()));

        let content = std::fs::read_to_string(log.path()).unwrap();
        let first_cmd = content.find("$ echo first").unwrap();
        let first_out = content.find("exit code: 0\nstdout:\nfirst\n").unwrap();
        let second_cmd = content.find("$ echo second; exit 2").unwrap();
        let second_out = content.find("exit code: 2\nstdout:\nsecond\n").unwrap();
        assert!(first_cmd < first_out);
        assert!(first_out < second_cmd);
        assert!(second_cmd < second_out);
    }

    #[tokio::test]
    async fn test_without_debug_nothing_is_logged() {
        let dir = TempDir::new().unwrap();
        let log = DebugLog::new(dir.path().join("debug.log"));
        let (runner, _console) = runner(RunnerConfig::default());
        let runner = runner.with_debug_log(log.clone());

        runner.run("echo quiet", CommandOptions::default().realtime(false), None).await;

        assert!(!log.path().exists());
    }
}
