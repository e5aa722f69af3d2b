//! Command line surface
//!
//! Parses flags into a [`Command`] and dispatches to the keychain.

pub mod add;
pub mod clipboard;
pub mod prompt;
pub mod show;

use clap::Parser;
use std::path::PathBuf;
use twofa_core::error::TwofaError;
use twofa_core::keychain::validate_name;
use twofa_core::types::{AddParams, Digits};

#[derive(Parser, Debug)]
#[command(name = "2fa", version)]
#[command(about = "Two-factor authentication agent with a plain-text keychain")]
#[command(after_help = "With no arguments, prints codes for all keys. \
Counter-based keys are shown as dashes so their counters are not consumed.")]
pub struct Cli {
    /// Add a key, reading its secret from standard input
    #[arg(long, requires = "name", conflicts_with_all = ["list", "clip"])]
    pub add: bool,

    /// Generate 7-digit codes (with --add)
    #[arg(short = '7', requires = "add", conflicts_with = "eight")]
    pub seven: bool,

    /// Generate 8-digit codes (with --add)
    #[arg(short = '8', requires = "add")]
    pub eight: bool,

    /// Add the key as an HOTP (counter-based) key
    #[arg(long, requires = "add")]
    pub hotp: bool,

    /// List the names of all keys
    #[arg(long, conflicts_with_all = ["name", "clip"])]
    pub list: bool,

    /// Copy the code to the clipboard
    #[arg(long, requires = "name")]
    pub clip: bool,

    /// Keychain file [default: $TWOFA_KEYCHAIN or $HOME/.2fa]
    #[arg(long, value_name = "PATH")]
    pub keychain: Option<PathBuf>,

    /// Key name
    pub name: Option<String>,
}

/// The operation requested on the command line
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Add { name: String, params: AddParams },
    List,
    Show { name: String, clip: bool },
    ShowAll,
}

impl Cli {
    /// Resolve the parsed flags into a single command
    pub fn into_command(self) -> Result<Command, TwofaError> {
        if self.list {
            return Ok(Command::List);
        }
        let Some(name) = self.name else {
            return Ok(Command::ShowAll);
        };
        validate_name(&name)?;

        if self.add {
            let count: u32 = if self.seven {
                7
            } else if self.eight {
                8
            } else {
                6
            };
            let params = AddParams {
                digits: Digits::try_from(count)?,
                counter_based: self.hotp,
            };
            return Ok(Command::Add { name, params });
        }

        Ok(Command::Show {
            name,
            clip: self.clip,
        })
    }
}
