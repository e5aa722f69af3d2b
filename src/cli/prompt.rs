//! Interactive secret entry

use std::io::{self, BufRead, Write};

/// Source of secret text for new keys
pub trait KeyPrompt {
    /// Ask for the secret of key `name` and return the raw text typed
    fn read_key(&mut self, name: &str) -> io::Result<String>;
}

/// Prompts on one stream and reads a single line from another
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl LinePrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read from stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> KeyPrompt for LinePrompt<R, W> {
    fn read_key(&mut self, name: &str) -> io::Result<String> {
        write!(self.output, "2fa key for {}: ", name)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof));
        }
        Ok(line)
    }
}
