//! Text normalization and the shared language-processing context

use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Glyphs that PDF and DOCX decoders emit for list bullets.
const BULLET_GLYPHS: &[char] = &['\u{2022}', '\u{25CF}', '\u{25AA}', '\u{25E6}', '\u{2023}', '\u{2043}'];

/// Normalize resume text for uniform downstream matching.
///
/// Collapses whitespace (newlines included), maps bullet glyphs to `-`, drops
/// everything outside printable ASCII and outside the punctuation allow-list
/// `. , : ; - @ ( ) & + /`, then fixes spacing around punctuation. The result
/// is lossy on purpose: line structure is gone and a space is forced after
/// every `.`, so e-mail addresses and URLs come out split.
///
/// `normalize(normalize(t)) == normalize(t)` for every input.
pub fn normalize(text: &str) -> String {
    static_regexes().normalize(text)
}

/// Collapse every whitespace run to one space, leaving all other characters
/// alone. Skill matching reads this view so entries such as `node.js` or `c#`
/// keep the punctuation `normalize` would split or drop.
pub fn collapse_whitespace(text: &str) -> String {
    static_regexes().whitespace.replace_all(text, " ").trim().to_string()
}

struct NormalizerRegexes {
    whitespace: Regex,
    disallowed: Regex,
    space_before_punct: Regex,
    missing_space_after_punct: Regex,
}

impl NormalizerRegexes {
    fn new() -> Self {
        Self {
            whitespace: Regex::new(r"\s+").expect("Invalid whitespace regex"),
            disallowed: Regex::new(r"[^\w\s.,:;\-@()&+/]").expect("Invalid allow-list regex"),
            space_before_punct: Regex::new(r"\s+([.,:;!?()])").expect("Invalid punctuation regex"),
            missing_space_after_punct: Regex::new(r"([.,:;!?()])([^\s])")
                .expect("Invalid punctuation regex"),
        }
    }

    fn normalize(&self, text: &str) -> String {
        let collapsed = self.whitespace.replace_all(text, " ");

        let ascii: String = collapsed
            .chars()
            .map(|c| if BULLET_GLYPHS.contains(&c) { '-' } else { c })
            .filter(|c| (' '..='~').contains(c))
            .collect();

        let allowed = self.disallowed.replace_all(&ascii, "");
        let collapsed = self.whitespace.replace_all(&allowed, " ");

        let tightened = self.space_before_punct.replace_all(&collapsed, "$1");
        let spaced = self.missing_space_after_punct.replace_all(&tightened, "$1 $2");

        spaced.trim().to_string()
    }
}

fn static_regexes() -> &'static NormalizerRegexes {
    static REGEXES: std::sync::OnceLock<NormalizerRegexes> = std::sync::OnceLock::new();
    REGEXES.get_or_init(NormalizerRegexes::new)
}

/// Language-processing context shared by the skill matcher, the experience
/// analyzer and the similarity scorer. Build it once per run and hand out
/// references; nothing in it is mutated after construction.
pub struct TextProcessor {
    stop_words: HashSet<String>,
    phrase_delimiters: Regex,
    capitalized_phrase: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let stop_words = Self::create_stop_words();

        // Sentence ends need trailing whitespace so "node.js" survives intact.
        let phrase_delimiters = Regex::new(r"[,;:()|\n\r\t]|[.!?](?:\s|$)|\s-\s|\s&\s")
            .expect("Invalid phrase delimiter regex");

        let capitalized_phrase = Regex::new(
            r"\b[A-Z][A-Za-z0-9&.\-]*(?:[ \t]+(?:of|and|&|for|de)?[ \t]*[A-Z][A-Za-z0-9&.\-]*)*",
        )
        .expect("Invalid capitalized phrase regex");

        Self {
            stop_words,
            phrase_delimiters,
            capitalized_phrase,
        }
    }

    /// Lowercased word tokens with stop words and single characters removed.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| word.chars().count() > 1)
            .filter(|word| !self.stop_words.contains(word))
            .collect()
    }

    /// Bag-of-words term frequencies over `tokenize`.
    pub fn term_frequencies(&self, text: &str) -> HashMap<String, usize> {
        let mut frequencies = HashMap::new();
        for token in self.tokenize(text) {
            *frequencies.entry(token).or_insert(0) += 1;
        }
        frequencies
    }

    /// Split text into sentences
    pub fn split_sentences(&self, text: &str) -> Vec<String> {
        text.unicode_sentences()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Candidate noun phrases: maximal runs of non-stop-word tokens between
    /// punctuation delimiters, lowercased and single-spaced.
    pub fn noun_phrases(&self, text: &str) -> Vec<String> {
        let mut phrases = Vec::new();

        for segment in self.phrase_delimiters.split(text) {
            let mut current: Vec<String> = Vec::new();
            for raw in segment.split_whitespace() {
                let word = raw
                    .trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
                    .to_lowercase();
                if word.is_empty() || self.stop_words.contains(&word) {
                    if !current.is_empty() {
                        phrases.push(current.join(" "));
                        current.clear();
                    }
                    continue;
                }
                current.push(word);
            }
            if !current.is_empty() {
                phrases.push(current.join(" "));
            }
        }

        phrases
    }

    /// Runs of capitalized words on a single line, e.g. "Acme Labs" or
    /// "Bank of America". Used as a cheap organization-name detector.
    pub fn capitalized_phrases<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.capitalized_phrase
            .find_iter(text)
            .map(|m| m.as_str().trim_end_matches(['.', '-', '&']).trim())
            .filter(|phrase| !phrase.is_empty())
            .collect()
    }

    /// Common English stop words
    fn create_stop_words() -> HashSet<String> {
        let stop_words = [
            "a", "about", "above", "across", "after", "afterwards", "again", "against",
            "all", "almost", "alone", "along", "already", "also", "although", "always",
            "am", "among", "amongst", "an", "and", "another", "any", "anyhow", "anyone",
            "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be",
            "became", "because", "become", "becomes", "been", "before", "beforehand",
            "behind", "being", "below", "beside", "besides", "between", "beyond", "both",
            "but", "by", "can", "cannot", "could", "did", "do", "does", "done", "down",
            "due", "during", "each", "eg", "either", "else", "elsewhere", "enough", "etc",
            "even", "ever", "every", "everyone", "everything", "everywhere", "except",
            "few", "for", "former", "formerly", "from", "further", "had", "has", "have",
            "he", "hence", "her", "here", "hereafter", "hereby", "herein", "hers",
            "herself", "him", "himself", "his", "how", "however", "i", "ie", "if", "in",
            "indeed", "into", "is", "it", "its", "itself", "just", "last", "latter",
            "least", "less", "many", "may", "me", "meanwhile", "might", "mine", "more",
            "moreover", "most", "mostly", "much", "must", "my", "myself", "namely",
            "neither", "never", "nevertheless", "next", "no", "nobody", "none", "noone",
            "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once",
            "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
            "ourselves", "out", "over", "own", "per", "perhaps", "please", "rather", "re",
            "same", "seem", "seemed", "seeming", "seems", "several", "she", "should",
            "since", "so", "some", "somehow", "someone", "something", "sometime",
            "sometimes", "somewhere", "still", "such", "than", "that", "the", "their",
            "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
            "therefore", "therein", "thereupon", "these", "they", "this", "those",
            "though", "through", "throughout", "thru", "thus", "to", "together", "too",
            "toward", "towards", "under", "until", "up", "upon", "us", "very", "via",
            "was", "we", "well", "were", "what", "whatever", "when", "whence", "whenever",
            "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
            "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole",
            "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
            "you", "your", "yours", "yourself", "yourselves",
        ];

        stop_words.iter().map(|&s| s.to_string()).collect()
    }
}
