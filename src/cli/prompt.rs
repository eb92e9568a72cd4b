//! Line-based prompting with a bounded validation loop
//!
//! A question is asked, the answer is validated, and on failure the reason is
//! shown and the question asked again. After `max_attempts` invalid answers
//! the prompt gives up; `0` keeps asking until valid input or end of input.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    /// Input reached end of file before a valid answer
    #[error("Input closed")]
    Closed,

    #[error("Giving up after {attempts} invalid answers")]
    TooManyAttempts { attempts: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Asks questions on `output` and reads answers from `input`
pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_attempts: u32,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, max_attempts: u32) -> Self {
        Prompter {
            input,
            output,
            max_attempts,
        }
    }

    /// Writer the shell prints results to
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Ask once and return the trimmed answer
    pub fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(answer.trim().to_string())
    }

    /// Ask until `validate` accepts the answer
    pub fn ask_valid<T, E, F>(&mut self, question: &str, mut validate: F) -> Result<T, PromptError>
    where
        E: Display,
        F: FnMut(&str) -> Result<T, E>,
    {
        let mut failures = 0u32;
        loop {
            let answer = self.ask(question)?;
            match validate(&answer) {
                Ok(value) => return Ok(value),
                Err(reason) => {
                    failures += 1;
                    writeln!(self.output, "{}", reason)?;
                    if self.max_attempts != 0 && failures >= self.max_attempts {
                        return Err(PromptError::TooManyAttempts { attempts: failures });
                    }
                }
            }
        }
    }
}
