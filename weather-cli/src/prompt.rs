use anyhow::{Context, Result, bail};
use std::io::{BufRead, Write};

/// Asks the user one question and returns the answer.
pub trait Prompt {
    fn ask(&mut self, message: &str) -> Result<String>;
}

/// Line-editing prompt for interactive terminals.
#[derive(Debug, Default)]
pub struct InquirePrompt;

impl Prompt for InquirePrompt {
    fn ask(&mut self, message: &str) -> Result<String> {
        inquire::Text::new(message)
            .prompt()
            .with_context(|| format!("Failed to read answer to '{message}'"))
    }
}

/// Plain line reader, used when stdin is piped.
#[derive(Debug)]
pub struct LinePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn ask(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{message} ")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            bail!("Unexpected end of input while waiting for: {message}");
        }

        Ok(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}
