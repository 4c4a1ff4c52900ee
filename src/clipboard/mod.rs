use std::io::{self, Write};
use std::process::{Command, Stdio};

use gtk4::gdk;
use gtk4::gdk::prelude::*;
use gtk4::glib;
use thiserror::Error;

const WL_COPY_COMMAND: &str = "wl-copy";
const MIME_TEXT_PLAIN: &str = "text/plain";
const MIME_TEXT_PLAIN_UTF8: &str = "text/plain;charset=utf-8";

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to access default display for clipboard operations")]
    DisplayUnavailable,
    #[error("failed to set clipboard content: {source}")]
    SetContent {
        #[source]
        source: glib::BoolError,
    },
    #[error("failed to run wl-copy command: {command}")]
    CommandIo {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("wl-copy exited with non-zero status: {status}")]
    CommandFailed { status: String },
}

pub type ClipboardResult<T> = std::result::Result<T, ClipboardError>;

pub trait ClipboardBackend {
    fn copy_text(&self, text: &str) -> ClipboardResult<()>;
}

/// Writes to the clipboard of the default GDK display.
#[derive(Debug, Default)]
pub struct GdkClipboardBackend;

impl ClipboardBackend for GdkClipboardBackend {
    fn copy_text(&self, text: &str) -> ClipboardResult<()> {
        let display = gdk::Display::default().ok_or(ClipboardError::DisplayUnavailable)?;
        let providers = [MIME_TEXT_PLAIN_UTF8, MIME_TEXT_PLAIN].map(|mime| {
            gdk::ContentProvider::for_bytes(mime, &glib::Bytes::from_owned(text.as_bytes().to_vec()))
        });
        let provider = gdk::ContentProvider::new_union(&providers);
        display
            .clipboard()
            .set_content(Some(&provider))
            .map_err(|source| ClipboardError::SetContent { source })
    }
}

/// Pipes text through `wl-copy` for compositors where the GDK clipboard
/// does not outlive the window.
#[derive(Debug, Default)]
pub struct WlCopyBackend;

impl ClipboardBackend for WlCopyBackend {
    fn copy_text(&self, text: &str) -> ClipboardResult<()> {
        let command_io = |source| ClipboardError::CommandIo {
            command: WL_COPY_COMMAND.to_string(),
            source,
        };
        let mut child = Command::new(WL_COPY_COMMAND)
            .args(["--type", MIME_TEXT_PLAIN_UTF8])
            .stdin(Stdio::piped())
            .spawn()
            .map_err(command_io)?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).map_err(command_io)?;
        }
        let status = child.wait().map_err(command_io)?;

        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::CommandFailed {
                status: status.to_string(),
            })
        }
    }
}

/// Tries each backend in order and returns the last error if all fail.
pub fn copy_text_with_fallback(
    backends: &[&dyn ClipboardBackend],
    text: &str,
) -> ClipboardResult<()> {
    let mut last_error = ClipboardError::DisplayUnavailable;
    for backend in backends {
        match backend.copy_text(text) {
            Ok(()) => return Ok(()),
            Err(err) => {
                tracing::debug!(%err, "clipboard backend failed; trying next");
                last_error = err;
            }
        }
    }
    Err(last_error)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    struct RecordingBackend {
        copied: RefCell<Vec<String>>,
        fail: bool,
    }

    impl RecordingBackend {
        fn new(fail: bool) -> Self {
            Self {
                copied: RefCell::new(Vec::new()),
                fail,
            }
        }
    }

    impl ClipboardBackend for RecordingBackend {
        fn copy_text(&self, text: &str) -> ClipboardResult<()> {
            if self.fail {
                return Err(ClipboardError::CommandFailed {
                    status: "exit status 1".to_string(),
                });
            }
            self.copied.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn fallback_stops_at_first_successful_backend() {
        let failing = RecordingBackend::new(true);
        let working = RecordingBackend::new(false);
        let unused = RecordingBackend::new(false);

        copy_text_with_fallback(&[&failing, &working, &unused], ".glass-card {}").unwrap();

        assert_eq!(working.copied.borrow().as_slice(), [".glass-card {}"]);
        assert!(unused.copied.borrow().is_empty());
    }

    #[test]
    fn fallback_reports_last_error_when_all_fail() {
        let failing = RecordingBackend::new(true);
        let err = copy_text_with_fallback(&[&failing], "css").unwrap_err();
        assert!(matches!(err, ClipboardError::CommandFailed { .. }));
        assert!(copy_text_with_fallback(&[], "css").is_err());
    }

    #[test]
    fn command_error_contains_command_name() {
        let err = ClipboardError::CommandFailed {
            status: "exit status 1".to_string(),
        };
        assert!(format!("{err}").contains("wl-copy"));
    }
}
