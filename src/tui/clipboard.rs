//! Clipboard paste for the query input (`Ctrl+V`).
//!
//! Tries the native clipboard through arboard first, then the usual
//! command-line tools. Terminals with bracketed paste deliver pasted text as
//! an event instead, so a missing clipboard is never fatal.

use arboard::Clipboard;
use std::process::{Command, Stdio};
use std::sync::Mutex;
use thiserror::Error;

/// Native clipboard handle, created by [`init`].
static CLIPBOARD: Mutex<Option<Clipboard>> = Mutex::new(None);

/// Where pasted text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteSource {
    /// Native clipboard via arboard.
    Arboard,
    /// `xclip -selection clipboard -o`
    Xclip,
    /// `xsel --clipboard --output`
    Xsel,
    /// `pbpaste`
    Pbpaste,
}

impl PasteSource {
    fn command(self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            Self::Arboard => None,
            Self::Xclip => Some(("xclip", &["-selection", "clipboard", "-o"])),
            Self::Xsel => Some(("xsel", &["--clipboard", "--output"])),
            Self::Pbpaste => Some(("pbpaste", &[])),
        }
    }
}

static SOURCE: Mutex<Option<PasteSource>> = Mutex::new(None);

/// Clipboard errors.
#[derive(Debug, Clone, Error)]
pub enum ClipboardError {
    #[error("Failed to initialize clipboard: {0}")]
    Init(String),
    #[error("Failed to acquire clipboard lock")]
    Lock,
    #[error("Clipboard not initialized")]
    NotInitialized,
    #[error("No clipboard available")]
    Unavailable,
    #[error("Failed to paste from clipboard: {0}")]
    Paste(String),
}

fn tool_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

fn detect_source() -> Option<PasteSource> {
    if Clipboard::new().is_ok() {
        return Some(PasteSource::Arboard);
    }
    if cfg!(target_os = "macos") {
        return Some(PasteSource::Pbpaste);
    }
    [PasteSource::Xclip, PasteSource::Xsel]
        .into_iter()
        .find(|source| source.command().is_some_and(|(program, _)| tool_available(program)))
}

/// Initializes the clipboard. Should be called once at startup.
pub fn init() -> Result<(), ClipboardError> {
    let source = detect_source().ok_or(ClipboardError::Unavailable)?;

    *SOURCE.lock().map_err(|_| ClipboardError::Lock)? = Some(source);

    if source == PasteSource::Arboard {
        let clipboard = Clipboard::new().map_err(|e| ClipboardError::Init(e.to_string()))?;
        *CLIPBOARD.lock().map_err(|_| ClipboardError::Lock)? = Some(clipboard);
    }

    Ok(())
}

/// Returns the paste source picked by [`init`].
pub fn source() -> Option<PasteSource> {
    SOURCE.lock().ok().and_then(|guard| *guard)
}

/// Reads text from the clipboard.
pub fn paste() -> Result<String, ClipboardError> {
    match source().ok_or(ClipboardError::NotInitialized)? {
        PasteSource::Arboard => paste_arboard(),
        other => match other.command() {
            Some((program, args)) => paste_command(program, args),
            None => Err(ClipboardError::Unavailable),
        },
    }
}

fn paste_arboard() -> Result<String, ClipboardError> {
    let mut guard = CLIPBOARD.lock().map_err(|_| ClipboardError::Lock)?;
    let clipboard = guard.as_mut().ok_or(ClipboardError::NotInitialized)?;
    clipboard
        .get_text()
        .map_err(|e| ClipboardError::Paste(e.to_string()))
}

fn paste_command(program: &str, args: &[&str]) -> Result<String, ClipboardError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ClipboardError::Paste(format!("Failed to run {program}: {e}")))?;

    if !output.status.success() {
        return Err(ClipboardError::Paste(format!("{program} returned error")));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| ClipboardError::Paste(format!("Invalid UTF-8 from {program}: {e}")))
}
