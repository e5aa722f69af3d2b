//! twofa - two-factor authentication agent
//!
//! Keeps TOTP and HOTP secrets in a plain-text keychain and prints
//! authentication codes on demand.

use clap::Parser;
use twofa_core::{config::KeychainConfig, error::TwofaError, init_logging, keychain::Keychain};

mod cli;

use cli::clipboard::SystemClipboard;
use cli::prompt::LinePrompt;
use cli::{Cli, Command};

fn main() {
    if let Err(e) = init_logging() {
        eprintln!("2fa: failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("2fa: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), TwofaError> {
    let path = match &cli.keychain {
        Some(path) => path.clone(),
        None => KeychainConfig::from_env()?.path,
    };
    let command = cli.into_command()?;
    let mut keychain = Keychain::load(path)?;
    let mut stdout = std::io::stdout().lock();

    match command {
        Command::Add { name, params } => {
            cli::add::run_add(&keychain, &name, &params, &mut LinePrompt::stdio())
        }
        Command::List => cli::show::run_list(&keychain, &mut stdout),
        Command::Show { name, clip } => {
            let mut clipboard = SystemClipboard;
            let clipboard = clip.then_some(&mut clipboard as &mut dyn cli::clipboard::Clipboard);
            cli::show::run_show(&mut keychain, &name, clipboard, &mut stdout)
        }
        Command::ShowAll => cli::show::run_show_all(&keychain, &mut stdout),
    }
}
