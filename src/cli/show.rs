//! List and show command implementations
//!
//! Output goes to the given writer only; diagnostics go through tracing.

use super::clipboard::{copy_best_effort, Clipboard};
use std::io::Write;
use twofa_core::error::TwofaError;
use twofa_core::keychain::{format_show_all, Keychain};

/// Print every key name, one per line
pub fn run_list(keychain: &Keychain, out: &mut dyn Write) -> Result<(), TwofaError> {
    for name in keychain.names() {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

/// Print the code for one key, optionally copying it to the clipboard
pub fn run_show(
    keychain: &mut Keychain,
    name: &str,
    clipboard: Option<&mut dyn Clipboard>,
    out: &mut dyn Write,
) -> Result<(), TwofaError> {
    let code = keychain.code(name)?;
    if let Some(clipboard) = clipboard {
        copy_best_effort(clipboard, code.expose());
    }
    writeln!(out, "{}", code.expose())?;
    Ok(())
}

/// Print codes for all time-based keys and placeholders for counter-based ones
pub fn run_show_all(keychain: &Keychain, out: &mut dyn Write) -> Result<(), TwofaError> {
    out.write_all(format_show_all(&keychain.show_all()).as_bytes())?;
    Ok(())
}
