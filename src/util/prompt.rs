//! Yes/no prompting. Only `y` or `Y` counts as yes; any other answer,
//! including an empty line or EOF, is no.

use anyhow::{Context, Result};
use dialoguer::Input;
use std::io::{BufRead, Write};

pub trait Prompt {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}

/// Interactive prompt on the controlling terminal, falling back to a plain
/// line read from stdin when stdin is not a TTY.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        if atty::is(atty::Stream::Stdin) {
            let answer = Input::<String>::new()
                .with_prompt(format!("{} (y/n)", question))
                .allow_empty(true)
                .interact_text()
                .context("read answer")?;
            return Ok(is_yes(&answer));
        }
        let stdin = std::io::stdin();
        LinePrompt::new(stdin.lock(), std::io::stdout()).confirm(question)
    }
}

pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.writer, "{} (y/n) ", question).context("write prompt")?;
        self.writer.flush().ok();
        // raw bytes: an undecodable answer is just another "no"
        let mut line = Vec::new();
        self.reader
            .read_until(b'\n', &mut line)
            .context("read answer")?;
        Ok(is_yes(&String::from_utf8_lossy(&line)))
    }
}

/// Answers every question the same way (`--yes`, `--non-interactive`).
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn confirm(&mut self, _question: &str) -> Result<bool> {
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn answer(input: &str) -> bool {
        LinePrompt::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
            .confirm("Run the installer now?")
            .unwrap()
    }

    #[test]
    fn test_only_y_is_yes() {
        assert!(answer("y\n"));
        assert!(answer("Y\n"));
        assert!(answer("  y  \n"));
        assert!(!answer("n\n"));
        assert!(!answer("yes\n"));
        assert!(!answer("\n"));
        assert!(!answer("q\n"));
    }

    #[test]
    fn test_invalid_utf8_is_no() {
        let mut prompt = LinePrompt::new(Cursor::new(b"\xff\n".to_vec()), Vec::new());
        assert!(!prompt.confirm("Run the installer now?").unwrap());
        let mut prompt = LinePrompt::new(Cursor::new(b"y\xff\n".to_vec()), Vec::new());
        assert!(!prompt.confirm("Run the installer now?").unwrap());
    }

    #[test]
    fn test_eof_is_no() {
        assert!(!answer(""));
    }

    #[test]
    fn test_line_prompt_writes_question() {
        let mut prompt = LinePrompt::new(Cursor::new(b"n\n".to_vec()), Vec::new());
        prompt.confirm("Run the installer now?").unwrap();
        let written = String::from_utf8(prompt.into_writer()).unwrap();
        assert_eq!(written, "Run the installer now? (y/n) ");
    }

    #[test]
    fn test_fixed_answer() {
        assert!(FixedAnswer(true).confirm("q").unwrap());
        assert!(!FixedAnswer(false).confirm("q").unwrap());
    }
}
