use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;

use futures::stream::BoxStream;
use futures::StreamExt;
use regex::Regex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use url::Url;

const DEFAULT_TOOL: &str = "yt-dlp";

/// Everything needed to invoke the external download tool once.
#[derive(Debug, Clone)]
pub struct WorkerSpawn {
    pub worker_id: u64,
    pub href: Url,
    pub download_dir: PathBuf,
    pub format_selector: String,
    pub tool: String,
}

impl WorkerSpawn {
    pub fn new(worker_id: u64, href: Url, download_dir: PathBuf, format_selector: String) -> Self {
        Self {
            worker_id,
            href,
            download_dir,
            format_selector,
            tool: DEFAULT_TOOL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Progress {
        worker_id: u64,
        percent: u32,
    },
    /// Exactly one terminal event per invocation; the stream ends after it.
    Finished {
        worker_id: u64,
        href: Url,
        success: bool,
        message: String,
    },
}

enum WorkerState {
    Start(WorkerSpawn),
    Streaming {
        worker_id: u64,
        href: Url,
        child: Child,
        lines: Lines<BufReader<ChildStdout>>,
    },
    Finished,
}

/// Run one download invocation as an event stream: a `Progress` event per
/// matched output line (no deduplication, every match forwarded), then one
/// `Finished`. Spawn failures become a failed `Finished` carrying the error
/// text. The worker is single-shot and cannot be reused.
pub fn run(spawn: WorkerSpawn) -> BoxStream<'static, WorkerEvent> {
    futures::stream::unfold(WorkerState::Start(spawn), |state| async move {
        match state {
            WorkerState::Start(spawn) => {
                let output_template = spawn.download_dir.join("%(title)s.%(ext)s");
                let mut command = Command::new(&spawn.tool);
                command
                    .arg("--newline")
                    .arg("-o")
                    .arg(&output_template)
                    .arg("-f")
                    .arg(&spawn.format_selector)
                    .arg(spawn.href.as_str())
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::null());

                log::info!("starting {} for {}", spawn.tool, spawn.href);
                let mut child = match command.spawn() {
                    Ok(child) => child,
                    Err(e) => {
                        return Some((
                            WorkerEvent::Finished {
                                worker_id: spawn.worker_id,
                                href: spawn.href,
                                success: false,
                                message: format!("Error: {e}"),
                            },
                            WorkerState::Finished,
                        ));
                    }
                };

                let Some(stdout) = child.stdout.take() else {
                    return Some((
                        WorkerEvent::Finished {
                            worker_id: spawn.worker_id,
                            href: spawn.href,
                            success: false,
                            message: "Error: could not capture tool output".to_string(),
                        },
                        WorkerState::Finished,
                    ));
                };

                let lines = BufReader::new(stdout).lines();
                Some(next_event(spawn.worker_id, spawn.href, child, lines).await)
            }
            WorkerState::Streaming {
                worker_id,
                href,
                child,
                lines,
            } => Some(next_event(worker_id, href, child, lines).await),
            WorkerState::Finished => None,
        }
    })
    .boxed()
}

async fn next_event(
    worker_id: u64,
    href: Url,
    mut child: Child,
    mut lines: Lines<BufReader<ChildStdout>>,
) -> (WorkerEvent, WorkerState) {
    if let Some(percent) = next_percent(&mut lines).await {
        return (
            WorkerEvent::Progress { worker_id, percent },
            WorkerState::Streaming {
                worker_id,
                href,
                child,
                lines,
            },
        );
    }

    // Output exhausted; the exit status decides the terminal event.
    let (success, message) = match child.wait().await {
        Ok(status) if status.success() => (true, "Download completed successfully.".to_string()),
        Ok(_) => (false, "Download failed.".to_string()),
        Err(e) => (false, format!("Error: {e}")),
    };
    (
        WorkerEvent::Finished {
            worker_id,
            href,
            success,
            message,
        },
        WorkerState::Finished,
    )
}

/// Scan lines in program order until the next progress marker; unmatched
/// lines are skipped. `None` means the stream is exhausted.
async fn next_percent<R: AsyncBufRead + Unpin>(lines: &mut Lines<R>) -> Option<u32> {
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Some(percent) = parse_progress(&line) {
                    return Some(percent);
                }
            }
            Ok(None) | Err(_) => return None,
        }
    }
}

fn progress_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\[download\]\s+(\d+(?:\.\d+)?)%").expect("pattern is a valid literal")
    })
}

/// Percentage from a `[download]  <float>%` line, truncated to an integer.
fn parse_progress(line: &str) -> Option<u32> {
    let caps = progress_pattern().captures(line)?;
    let percent: f64 = caps.get(1)?.as_str().parse().ok()?;
    Some(percent as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_progress_lines() {
        assert_eq!(parse_progress("[download]  0.0%"), Some(0));
        assert_eq!(
            parse_progress("[download]  45.5% of 10.00MiB at 1.50MiB/s ETA 00:30"),
            Some(45)
        );
        assert_eq!(parse_progress("[download] 100%"), Some(100));
        assert_eq!(parse_progress("[download] Destination: ep.m4a"), None);
        assert_eq!(parse_progress("45.5% without marker"), None);
    }

    #[tokio::test]
    async fn test_progress_forwarded_in_program_order() {
        let output = b"[download]  0.0%\n\
                       [download] Destination: ep.m4a\n\
                       [download]  45.5%\n\
                       [download]  100.0%\n";
        let mut lines = BufReader::new(&output[..]).lines();

        let mut seen = Vec::new();
        while let Some(percent) = next_percent(&mut lines).await {
            seen.push(percent);
        }
        assert_eq!(seen, vec![0, 45, 100]);
    }

    #[tokio::test]
    async fn test_spawn_failure_emits_single_failed_terminal() {
        let mut spawn = WorkerSpawn::new(
            7,
            Url::parse("https://example.com/ep").unwrap(),
            std::env::temp_dir(),
            "bestaudio".to_string(),
        );
        spawn.tool = "definitely-not-a-real-tool".to_string();

        let events: Vec<WorkerEvent> = run(spawn).collect().await;
        assert_eq!(events.len(), 1);
        match &events[0] {
            WorkerEvent::Finished {
                worker_id,
                success,
                message,
                ..
            } => {
                assert_eq!(*worker_id, 7);
                assert!(!*success);
                assert!(message.starts_with("Error:"));
            }
            other => panic!("expected terminal event, got {other:?}"),
        }
    }
}
