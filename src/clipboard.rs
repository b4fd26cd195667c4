use std::env;
use std::io::Write;
use std::process::{Child, Command, ExitStatus, Stdio};
use tracing::{debug, info};

use crate::errors::UtmError;

pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), UtmError>;
}

/// Pipes text into the platform's clipboard command.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    fn command() -> Result<(&'static str, &'static [&'static str]), UtmError> {
        let system = env::consts::OS;
        let command: (&'static str, &'static [&'static str]) = match system {
            "macos" => ("pbcopy", &[]),
            "windows" => ("clip", &[]),
            "linux" | "freebsd" | "openbsd" | "netbsd" => {
                if env::var_os("WAYLAND_DISPLAY").is_some() {
                    ("wl-copy", &[])
                } else {
                    ("xclip", &["-selection", "clipboard"])
                }
            }
            _ => {
                return Err(UtmError::ClipboardUnavailable(format!(
                    "no clipboard command known for '{system}'"
                )))
            }
        };
        Ok(command)
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&self, text: &str) -> Result<(), UtmError> {
        let (program, args) = Self::command()?;
        debug!(action = "spawn", component = "clipboard", program, "Writing to clipboard");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| unavailable(program, e))?;

        let status = feed_and_wait(&mut child, program, text)?;
        if !status.success() {
            return Err(UtmError::ClipboardUnavailable(format!(
                "{program} exited with {status}"
            )));
        }

        info!(action = "complete", component = "clipboard", bytes = text.len(), "Copied to clipboard");
        Ok(())
    }
}

fn unavailable(program: &str, e: std::io::Error) -> UtmError {
    UtmError::ClipboardUnavailable(format!("{program}: {e}"))
}

/// Write `text` to the child's stdin, then reap it even if the write failed.
fn feed_and_wait(child: &mut Child, program: &str, text: &str) -> Result<ExitStatus, UtmError> {
    // stdin is dropped at the end of the match so the child sees EOF before we wait.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    let status = child.wait();

    written.map_err(|e| unavailable(program, e))?;
    status.map_err(|e| unavailable(program, e))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn spawn(program: &str) -> Child {
        Command::new(program)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap()
    }

    #[test]
    fn test_child_is_reaped_when_write_fails() {
        // `true` exits without reading, so a large write hits a closed pipe.
        let mut child = spawn("true");
        let text = "x".repeat(4 * 1024 * 1024);

        let err = feed_and_wait(&mut child, "true", &text).unwrap_err();
        assert!(matches!(err, UtmError::ClipboardUnavailable(_)));
        assert!(child.try_wait().unwrap().is_some());
    }

    #[test]
    fn test_feed_and_wait_success() {
        let mut child = spawn("cat");
        let status = feed_and_wait(&mut child, "cat", "https://a.com/").unwrap();
        assert!(status.success());
    }
}
