//! Start-up sequence: load the model once, then hand it to the loop

use crate::config::AppConfig;
use crate::repl::Session;
use anyhow::Context;
use std::io::{BufRead, Write};
use stocksent_classifiers::ModelLoader;

/// Load the classifier and run an interactive session over `input`/`output`.
///
/// Nothing is written to `output` if the model fails to load.
pub fn run<R: BufRead, W: Write>(
    config: &AppConfig,
    input: R,
    output: W,
) -> anyhow::Result<usize> {
    let classifier = ModelLoader::new(config.model.clone())
        .load()
        .context("Failed to load sentiment model")?;
    tracing::info!("Classifier '{}' ready", classifier.name());

    let mut session = Session::new(classifier.as_ref(), input, output);
    session.print_banner()?;
    let classified = session.run()?;

    Ok(classified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use stocksent_classifiers::ModelConfig;

    #[test]
    fn test_missing_model_stops_before_prompt() {
        let config = AppConfig {
            model: ModelConfig::from_local("./models/not-downloaded"),
        };
        let mut output = Vec::new();

        let result = run(&config, Cursor::new("great quarter\nexit\n"), &mut output);

        assert!(result.is_err());
        assert!(output.is_empty(), "nothing should be printed before loading succeeds");
    }
}
