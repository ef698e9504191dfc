//! BERTweet tokenizer built from fastBPE files
//!
//! BERTweet checkpoints ship `vocab.txt` (one `<token> <count>` per line) and
//! `bpe.codes` (one `<left> <right> <count>` merge per line) instead of a
//! `tokenizer.json`. Non-final subwords carry an `@@` suffix in the vocabulary,
//! while the merge table marks word endings with `</w>`.
//!
//! The vocabulary is rewritten into the `</w>` convention so the stock BPE
//! model from `tokenizers` can apply the merges: `ab@@` becomes `ab` and a
//! word-final `ab` becomes `ab</w>`. Token ids are unchanged.

use std::collections::HashMap;
use std::path::Path;
use stocksent_core::{Error, Result};
use tokenizers::models::bpe::{Merges, Vocab, BPE};
use tokenizers::pre_tokenizers::whitespace::WhitespaceSplit;
use tokenizers::processors::roberta::RobertaProcessing;
use tokenizers::{AddedToken, Tokenizer};

pub const VOCAB_FILE: &str = "vocab.txt";
pub const CODES_FILE: &str = "bpe.codes";

const BOS: &str = "<s>";
const PAD: &str = "<pad>";
const EOS: &str = "</s>";
const UNK: &str = "<unk>";
const MASK: &str = "<mask>";

const SUBWORD_SUFFIX: &str = "@@";
const END_OF_WORD: &str = "</w>";

/// Build a BERTweet tokenizer from its vocabulary and merge table
pub fn build_bertweet_tokenizer(vocab_path: &Path, codes_path: &Path) -> Result<Tokenizer> {
    let vocab_text = read(vocab_path)?;
    let codes_text = read(codes_path)?;

    let ids = parse_vocab(&vocab_text)?;
    let vocab: Vocab = ids
        .iter()
        .map(|(token, id)| (to_bpe_symbol(token), *id))
        .collect();

    let all_merges = parse_codes(&codes_text)?;
    let total = all_merges.len();
    // Merges whose parts or product fall outside the vocabulary can only ever yield <unk>
    let merges: Merges = all_merges
        .into_iter()
        .filter(|(left, right)| {
            vocab.contains_key(left)
                && vocab.contains_key(right)
                && vocab.contains_key(&format!("{}{}", left, right))
        })
        .collect();
    tracing::debug!(
        "BERTweet tokenizer: {} tokens, {} of {} merges usable",
        vocab.len(),
        merges.len(),
        total
    );

    let bpe = BPE::builder()
        .vocab_and_merges(vocab, merges)
        .unk_token(UNK.to_string())
        .end_of_word_suffix(END_OF_WORD.to_string())
        .build()
        .map_err(|e| Error::classifier(format!("Failed to build BPE model: {}", e)))?;

    let mut tokenizer = Tokenizer::new(bpe);
    tokenizer.with_pre_tokenizer(Some(WhitespaceSplit));

    let cls = (BOS.to_string(), special_id(&ids, BOS)?);
    let sep = (EOS.to_string(), special_id(&ids, EOS)?);
    tokenizer.with_post_processor(Some(
        RobertaProcessing::new(sep, cls)
            .trim_offsets(false)
            .add_prefix_space(false),
    ));

    let specials: Vec<AddedToken> = [BOS, PAD, EOS, UNK, MASK]
        .iter()
        .map(|token| AddedToken::from(*token, true))
        .collect();
    tokenizer.add_special_tokens(&specials);

    Ok(tokenizer)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        Error::classifier(format!("Failed to read {}: {}", path.display(), e))
    })
}

/// Token ids as BERTweet assigns them: four specials, the file in order, then `<mask>`
fn parse_vocab(text: &str) -> Result<HashMap<String, u32>> {
    let mut ids: HashMap<String, u32> = HashMap::new();
    for special in [BOS, PAD, EOS, UNK] {
        let id = ids.len() as u32;
        ids.insert(special.to_string(), id);
    }

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((token, _count)) = line.rsplit_once(' ') else {
            return Err(Error::classifier(format!(
                "{} line {}: expected '<token> <count>'",
                VOCAB_FILE,
                line_no + 1
            )));
        };
        let id = ids.len() as u32;
        ids.insert(token.to_string(), id);
    }

    if !ids.contains_key(MASK) {
        let id = ids.len() as u32;
        ids.insert(MASK.to_string(), id);
    }

    Ok(ids)
}

fn parse_codes(text: &str) -> Result<Vec<(String, String)>> {
    let mut merges = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.as_slice() {
            [] => continue,
            [left, right, _count] => merges.push((left.to_string(), right.to_string())),
            _ => {
                return Err(Error::classifier(format!(
                    "{} line {}: expected '<left> <right> <count>'",
                    CODES_FILE,
                    line_no + 1
                )))
            }
        }
    }
    Ok(merges)
}

/// Vocabulary entry in the form the BPE model produces
fn to_bpe_symbol(token: &str) -> String {
    if [BOS, PAD, EOS, UNK, MASK].contains(&token) {
        return token.to_string();
    }
    match token.strip_suffix(SUBWORD_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}{}", token, END_OF_WORD),
    }
}

fn special_id(ids: &HashMap<String, u32>, token: &str) -> Result<u32> {
    ids.get(token)
        .copied()
        .ok_or_else(|| Error::internal(format!("Special token {} missing", token)))
}
