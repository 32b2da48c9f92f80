use std::io::{BufRead, Write};

use genresplit::clients::errors::{Error, Result};
use genresplit::genres::SplitMode;

// Line-based terminal questions. Generic over the streams so answers can be scripted.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    // Ask a question and return the trimmed answer, possibly empty
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question} ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::ConfigurationError(format!(
                "input closed before answering {question:?}"
            )));
        }
        Ok(line.trim().to_owned())
    }

    pub fn ask_required(&mut self, question: &str) -> Result<String> {
        let answer = self.ask(question)?;
        if answer.is_empty() {
            return Err(Error::ConfigurationError(format!(
                "an answer is required for {question:?}"
            )));
        }
        Ok(answer)
    }

    // "yes" splits by every genre, anything else asks how many playlists to create
    pub fn ask_mode(&mut self) -> Result<SplitMode> {
        let full = self.ask("Do you want the full playlist divided? (yes/no)")?;
        if matches!(full.to_lowercase().as_str(), "yes" | "y") {
            return Ok(SplitMode::AllGenres);
        }

        let count = self.ask("Enter the number of playlists to create (blank for no limit):")?;
        if count.is_empty() {
            return Ok(SplitMode::TopGenres { limit: None });
        }
        let limit = count.parse::<usize>().map_err(|e| {
            Error::ConfigurationError(format!("invalid number of playlists {count:?}: {e}"))
        })?;
        Ok(SplitMode::TopGenres { limit: Some(limit) })
    }
}
