//! Add command implementation

use super::prompt::KeyPrompt;
use twofa_core::error::TwofaError;
use twofa_core::keychain::Keychain;
use twofa_core::types::AddParams;

/// Read a secret for `name` and append it to the keychain
pub fn run_add(
    keychain: &Keychain,
    name: &str,
    params: &AddParams,
    prompt: &mut dyn KeyPrompt,
) -> Result<(), TwofaError> {
    let text = prompt.read_key(name).map_err(TwofaError::Prompt)?;
    keychain.add(name, &text, params)?;
    Ok(())
}
