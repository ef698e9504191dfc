//! Sentiment labels shared by the classifier and the terminal front-end

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentiment of a tweet.
///
/// Variants are declared in the checkpoint's label-id order
/// (0 = NEGATIVE, 1 = NEUTRAL, 2 = POSITIVE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// All labels in label-id order
    pub const ALL: [Sentiment; 3] = [Self::Negative, Self::Neutral, Self::Positive];

    /// Upper-case label as printed to the user
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
            Self::Positive => "POSITIVE",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_upper_case() {
        assert_eq!(Sentiment::Negative.to_string(), "NEGATIVE");
        assert_eq!(Sentiment::Neutral.to_string(), "NEUTRAL");
        assert_eq!(Sentiment::Positive.to_string(), "POSITIVE");
    }

    #[test]
    fn test_yaml_label_list() {
        let labels: Vec<Sentiment> =
            serde_yaml::from_str("[NEGATIVE, NEUTRAL, POSITIVE]").unwrap();
        assert_eq!(labels, Sentiment::ALL.to_vec());
    }
}
