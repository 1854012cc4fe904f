use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

const TOKEN_PATTERN: &str = r"\w[\w']+";

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(TOKEN_PATTERN).expect("token pattern is valid"));

// Observations are written in Spanish; English stopwords are kept as well
// since evaluators occasionally mix them in.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // es
        "al", "algo", "algunas", "algunos", "ante", "antes", "como", "con", "contra", "cual",
        "cuando", "de", "del", "desde", "donde", "durante", "el", "ella", "ellas", "ellos",
        "en", "entre", "era", "es", "esa", "esas", "ese", "eso", "esos", "esta", "estas",
        "este", "esto", "estos", "está", "están", "fue", "ha", "hace", "han", "hasta", "la",
        "las", "le", "les", "lo", "los", "mas", "muy", "más", "ni", "no", "nos", "o", "otra",
        "otro", "para", "pero", "poco", "por", "porque", "que", "qué", "se", "sea", "ser",
        "si", "sin", "sobre", "son", "su", "sus", "sí", "también", "tiene", "todo", "un",
        "una", "uno", "unos", "y", "ya",
        // en
        "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "has", "have",
        "he", "in", "is", "it", "its", "of", "on", "or", "she", "that", "the", "their",
        "there", "they", "this", "to", "was", "were", "with",
    ]
    .into_iter()
    .collect()
});

/// Most frequent terms across `texts`, highest count first.
///
/// Tokens are lowercased; stopwords and purely numeric tokens are dropped.
/// Ties are broken alphabetically so the output is stable.
pub fn word_frequencies<'a, I>(texts: I, max_words: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for token in TOKEN_RE.find_iter(text) {
            let word = token.as_str().trim_matches('\'').to_lowercase();
            if word.chars().count() < 2
                || word.chars().all(|c| c.is_ascii_digit())
                || STOPWORDS.contains(word.as_str())
            {
                continue;
            }
            *counts.entry(word).or_default() += 1;
        }
    }

    let mut words: Vec<(String, usize)> = counts.into_iter().collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(max_words);
    words
}
