//! Interactive read-classify-print loop
//!
//! The loop owns nothing but a borrowed classifier and its input/output
//! handles, so it runs the same against a terminal or in-memory buffers.

use std::io::{BufRead, Write};
use stocksent_classifiers::Classifier;
use stocksent_core::{Error, Result};

/// Prompt written before every read
pub const PROMPT: &str = "Please enter tweet (or type 'exit'):";

/// Input that ends the session
pub const EXIT_SENTINEL: &str = "exit";

/// Whether `input` is the exit sentinel (surrounding whitespace and case ignored)
pub fn is_exit(input: &str) -> bool {
    input.trim().to_lowercase() == EXIT_SENTINEL
}

/// Outcome of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// An input was classified; prompt again
    Continue,
    /// Sentinel or end of input reached
    Stop,
}

/// One interactive session over a loaded classifier
pub struct Session<'a, R, W> {
    classifier: &'a dyn Classifier,
    input: R,
    output: W,
    classified: usize,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(classifier: &'a dyn Classifier, input: R, output: W) -> Self {
        Self {
            classifier,
            input,
            output,
            classified: 0,
        }
    }

    /// Print the start-up banner
    pub fn print_banner(&mut self) -> Result<()> {
        writeln!(self.output, "\n  Stock Tweet Sentiment Classifier\n")?;
        Ok(())
    }

    /// Run until the sentinel or end of input; returns the number of inputs classified.
    ///
    /// Read, write and classifier errors end the session immediately.
    pub fn run(&mut self) -> Result<usize> {
        while self.step()? == Step::Continue {}

        tracing::debug!(classified = self.classified, "Session finished");
        Ok(self.classified)
    }

    /// Prompt, read one line and classify it unless it is the sentinel
    pub fn step(&mut self) -> Result<Step> {
        write!(self.output, "{}", PROMPT)?;
        self.output.flush()?;

        let Some(text) = self.read_line()? else {
            tracing::debug!("End of input");
            writeln!(self.output)?;
            return Ok(Step::Stop);
        };

        if is_exit(&text) {
            return Ok(Step::Stop);
        }

        let result = self.classifier.classify(&text)?;
        let top = result
            .top()
            .ok_or_else(|| Error::internal("Classifier returned no predictions"))?;

        write!(
            self.output,
            "\n  Predicted Sentiment: {}\n  Score:               {}\n\n",
            top.label,
            f64::from(top.score)
        )?;
        self.output.flush()?;

        self.classified += 1;
        Ok(Step::Continue)
    }

    /// Number of inputs classified so far
    pub fn classified(&self) -> usize {
        self.classified
    }

    /// Next line without its terminator, or `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }
}
