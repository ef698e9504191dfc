use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "stocksent")]
#[command(author, version, about = "Stock tweet sentiment classifier")]
pub struct Cli {
    /// Configuration file path (ignored if missing)
    #[arg(short, long, env = "STOCKSENT_CONFIG", default_value = "stocksent.yaml")]
    pub config: PathBuf,

    /// Model directory containing config.json and model.safetensors
    #[arg(short, long, env = "STOCKSENT_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Tokenizer: an existing tokenizer.json path or directory, otherwise a hub repo id
    #[arg(short, long, env = "STOCKSENT_TOKENIZER")]
    pub tokenizer: Option<String>,

    /// Inference device (cpu, cuda, cuda:N, metal)
    #[arg(short, long, env = "STOCKSENT_DEVICE")]
    pub device: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_required() {
        let cli = Cli::try_parse_from(["stocksent"]).unwrap();
        assert!(!cli.verbose);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "stocksent",
            "--model-dir",
            "/opt/models/bertweet",
            "-t",
            "vinai/bertweet-large",
            "--device",
            "cuda:1",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.model_dir.unwrap(), PathBuf::from("/opt/models/bertweet"));
        assert_eq!(cli.tokenizer.as_deref(), Some("vinai/bertweet-large"));
        assert_eq!(cli.device.as_deref(), Some("cuda:1"));
        assert!(cli.verbose);
    }
}
