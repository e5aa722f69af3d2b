//! Best-effort clipboard support
//!
//! Codes are piped into whichever clipboard tool is installed. Nothing
//! here is allowed to fail a command.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Clipboard tools in order of preference, with the arguments that make
/// them read the new contents from stdin
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip.exe", &[]),
];

/// Destination for copied codes
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// The desktop clipboard, reached through an external tool
pub struct SystemClipboard;

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        let (path, args) = CLIPBOARD_TOOLS
            .iter()
            .find_map(|(tool, args)| which::which(tool).ok().map(|path| (path, *args)))
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no clipboard tool found"))?;
        debug!("Copying code with {}", path.display());
        pipe_to(&path, args, text)
    }
}

/// Run `program` with `text` on its stdin
///
/// The child is always waited on, even when writing to it fails.
fn pipe_to(program: &Path, args: &[&str], text: &str) -> io::Result<()> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };

    let status = child.wait()?;
    written?;
    if !status.success() {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{} exited with {}", program.display(), status),
        ));
    }
    Ok(())
}

/// Copy `text`, logging instead of failing when the clipboard is unavailable
pub fn copy_best_effort(clipboard: &mut dyn Clipboard, text: &str) {
    if let Err(e) = clipboard.copy(text) {
        warn!("Failed to copy code to clipboard: {}", e);
    }
}
