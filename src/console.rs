//! Console I/O used by the exercise runner.
//!
//! The runner only talks to the `Console` trait, so a run can be driven by
//! the terminal or by a script of canned answers.

use crate::core::Result;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-oriented prompt and print capability
pub trait Console {
    /// Shows `prompt` and reads one line, without its line terminator.
    ///
    /// End of input is an `UnexpectedEof` I/O error.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Prints one line of output.
    fn write_line(&mut self, line: &str) -> Result<()>;
}

fn strip_line_ending(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}

/// Console backed by the process' stdin and stdout
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        {
            let mut stdout = io::stdout().lock();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no more input").into());
        }
        Ok(strip_line_ending(line))
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        Ok(())
    }
}

/// Console that answers prompts from a fixed list and records everything
/// printed, prompts included.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedConsole {
            inputs: inputs.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Everything written so far, one entry per prompt or printed line
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// The transcript joined with newlines
    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }

    /// Number of scripted answers not consumed yet
    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let answer = self.inputs.pop_front().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted")
        })?;
        let answer = strip_line_ending(answer);
        self.transcript.push(format!("{}{}", prompt, answer));
        Ok(answer)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.transcript.push(line.to_string());
        Ok(())
    }
}
