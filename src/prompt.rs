//! Interactive prompting capability.
//!
//! The pipeline asks for input at exactly two kinds of points: metadata
//! a document cannot supply (plain flavor, missing title) and archive
//! collisions. [`Prompter`] keeps those seams mockable in tests.

use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};

pub trait Prompter: Send + Sync {
    /// Ask a free-text question; returns the trimmed answer (possibly empty).
    fn ask(&self, question: &str) -> Result<String>;

    /// Ask a yes/no question; invalid input re-prompts.
    fn confirm(&self, question: &str) -> Result<bool>;

    /// Ask until a non-empty answer arrives.
    fn ask_required(&self, question: &str) -> Result<String> {
        loop {
            let answer = self.ask(question)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            println!("a value is required");
        }
    }
}

/// [`Prompter`] over stdin/stdout.
///
/// Refuses to read when stdin is not a terminal so a scripted run fails
/// fast instead of hanging on input nobody will type.
pub struct ConsolePrompter;

impl ConsolePrompter {
    fn read_line(&self) -> Result<String> {
        if !atty::is(atty::Stream::Stdin) {
            bail!("stdin is not a terminal; cannot prompt for input");
        }
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        Ok(line.trim().to_string())
    }
}

impl Prompter for ConsolePrompter {
    fn ask(&self, question: &str) -> Result<String> {
        print!("{}: ", question);
        io::stdout().flush()?;
        self.read_line()
    }

    fn confirm(&self, question: &str) -> Result<bool> {
        loop {
            print!("{} (y/n): ", question);
            io::stdout().flush()?;
            match self.read_line()?.to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => println!("please answer y or n"),
            }
        }
    }
}
