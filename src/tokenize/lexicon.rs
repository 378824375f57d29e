// Lexicon-backed linguistic analyzer.
//
// Segments text on Unicode word boundaries, splits elided clitics at the
// apostrophe (l'home -> l' + home, veure'l -> veure + 'l), flags stopwords
// from the stop-words list of the working language, and maps surface forms
// to lemmas through an optional form<TAB>lemma dictionary. Forms missing
// from the dictionary lemmatize to themselves.
//
// Loading is all-or-nothing: an unsupported language or an unreadable
// resource file means the capability is unavailable and the linguistic
// branch stops before touching any document.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use stop_words::{get, LANGUAGE};
use tracing::info;
use unicode_segmentation::UnicodeSegmentation;

use super::traits::{AnalyzedToken, Analyzer};
use crate::error::PipelineError;

const CAPABILITY: &str = "linguistic analyzer";

/// Catalan middle dot (ela geminada). Counts as a letter between letters.
const INTERPUNCT: char = '·';

/// Where to find the analyzer's resources.
#[derive(Debug, Clone)]
pub struct LexiconOptions {
    /// ISO 639-1 code of the corpus language
    pub language: String,
    /// Optional form<TAB>lemma dictionary
    pub lemma_dict: Option<PathBuf>,
    /// Optional extra stopwords, one per line
    pub extra_stopwords: Option<PathBuf>,
}

impl Default for LexiconOptions {
    fn default() -> Self {
        Self {
            language: "ca".to_string(),
            lemma_dict: None,
            extra_stopwords: None,
        }
    }
}

pub struct LexiconAnalyzer {
    stopwords: HashSet<String>,
    lemmas: HashMap<String, String>,
}

impl LexiconAnalyzer {
    /// Load stopwords and the lemma dictionary.
    pub fn load(options: &LexiconOptions) -> Result<Self, PipelineError> {
        let language = language_for_code(&options.language).ok_or_else(|| {
            PipelineError::unavailable(
                CAPABILITY,
                format!("no stopword list for language `{}`", options.language),
            )
        })?;

        let mut stopwords: HashSet<String> =
            get(language).into_iter().map(|w| w.to_lowercase()).collect();

        if let Some(path) = &options.extra_stopwords {
            let extra = read_resource(path)?;
            stopwords.extend(
                extra
                    .lines()
                    .map(|line| line.trim().to_lowercase())
                    .filter(|w| !w.is_empty() && !w.starts_with('#')),
            );
        }

        if stopwords.is_empty() {
            return Err(PipelineError::unavailable(
                CAPABILITY,
                format!("stopword list for `{}` is empty", options.language),
            ));
        }

        let lemmas = match &options.lemma_dict {
            Some(path) => parse_lemma_dictionary(&read_resource(path)?, path)?,
            None => HashMap::new(),
        };

        info!(
            language = %options.language,
            stopwords = stopwords.len(),
            lemmas = lemmas.len(),
            "Loaded linguistic analyzer"
        );

        Ok(Self { stopwords, lemmas })
    }

    /// Build an analyzer from in-memory resources.
    pub fn from_parts(stopwords: HashSet<String>, lemmas: HashMap<String, String>) -> Self {
        Self { stopwords, lemmas }
    }

    fn analyze_unit(&self, surface: &str) -> AnalyzedToken {
        let lower = surface.to_lowercase();
        let lemma = self.lemmas.get(&lower).cloned().unwrap_or_else(|| lower.clone());

        AnalyzedToken {
            surface: surface.to_string(),
            is_stopword: self.stopwords.contains(&lower),
            is_punctuation: !surface.chars().any(char::is_alphanumeric),
            is_alphabetic: is_alphabetic_word(surface),
            lemma,
        }
    }
}

impl Analyzer for LexiconAnalyzer {
    fn analyze(&self, text: &str) -> Vec<AnalyzedToken> {
        text.split_word_bounds()
            .filter(|segment| !segment.trim().is_empty())
            .flat_map(split_clitics)
            .map(|unit| self.analyze_unit(unit))
            .collect()
    }
}

fn language_for_code(code: &str) -> Option<LANGUAGE> {
    match code.to_ascii_lowercase().as_str() {
        "ca" => Some(LANGUAGE::Catalan),
        "es" => Some(LANGUAGE::Spanish),
        "en" => Some(LANGUAGE::English),
        "fr" => Some(LANGUAGE::French),
        "it" => Some(LANGUAGE::Italian),
        "pt" => Some(LANGUAGE::Portuguese),
        "de" => Some(LANGUAGE::German),
        _ => None,
    }
}

fn read_resource(path: &Path) -> Result<String, PipelineError> {
    std::fs::read_to_string(path).map_err(|e| {
        PipelineError::unavailable(CAPABILITY, format!("cannot read {}: {e}", path.display()))
    })
}

/// Parse `form<TAB>lemma` lines. Blank lines and `#` comments are skipped.
fn parse_lemma_dictionary(
    contents: &str,
    path: &Path,
) -> Result<HashMap<String, String>, PipelineError> {
    let mut lemmas = HashMap::new();
    for (i, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((form, lemma)) = line.split_once('\t') else {
            return Err(PipelineError::unavailable(
                CAPABILITY,
                format!("{} line {}: expected form<TAB>lemma", path.display(), i + 1),
            ));
        };
        lemmas.insert(form.trim().to_lowercase(), lemma.trim().to_string());
    }
    Ok(lemmas)
}

/// Split one word-boundary segment at an elision apostrophe.
///
/// A short prefix (one or two letters) is a proclitic and keeps the
/// apostrophe (`l'`, `d'`, `n'`); otherwise the apostrophe starts an
/// enclitic (`'l`, `'n`).
fn split_clitics(segment: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut rest = segment;

    // i > 0: an apostrophe leading `rest` already opens an enclitic
    while let Some((idx, apostrophe)) = rest
        .char_indices()
        .find(|&(i, c)| i > 0 && (c == '\'' || c == '’'))
    {
        let after = idx + apostrophe.len_utf8();
        if after >= rest.len() {
            break;
        }
        let split_at = if rest[..idx].chars().count() <= 2 {
            after
        } else {
            idx
        };
        units.push(&rest[..split_at]);
        rest = &rest[split_at..];
    }

    units.push(rest);
    units
}

fn is_alphabetic_word(surface: &str) -> bool {
    let mut chars = surface.chars().peekable();
    let mut prev_alpha = false;
    let mut any = false;

    while let Some(c) = chars.next() {
        if c.is_alphabetic() {
            prev_alpha = true;
            any = true;
        } else if c == INTERPUNCT && prev_alpha && chars.peek().is_some_and(|n| n.is_alphabetic()) {
            prev_alpha = false;
        } else {
            return false;
        }
    }
    any
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> LexiconAnalyzer {
        let stopwords = ["el", "la", "de", "i", "l'", "d'"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let lemmas = [("juguen", "jugar"), ("nens", "nen")]
            .iter()
            .map(|(f, l)| (f.to_string(), l.to_string()))
            .collect();
        LexiconAnalyzer::from_parts(stopwords, lemmas)
    }

    #[test]
    fn splits_proclitics_and_enclitics() {
        assert_eq!(split_clitics("l'home"), vec!["l'", "home"]);
        assert_eq!(split_clitics("d’aigua"), vec!["d’", "aigua"]);
        assert_eq!(split_clitics("veure'l"), vec!["veure", "'l"]);
        assert_eq!(split_clitics("escola"), vec!["escola"]);
        assert_eq!(split_clitics("rock'"), vec!["rock'"]);
    }

    #[test]
    fn interpunct_between_letters_is_alphabetic() {
        assert!(is_alphabetic_word("col·legi"));
        assert!(!is_alphabetic_word("·a"));
        assert!(!is_alphabetic_word("a·"));
        assert!(!is_alphabetic_word("3r"));
        assert!(!is_alphabetic_word(""));
    }

    #[test]
    fn flags_each_unit() {
        let units = analyzer().analyze("Els nens juguen a l'escola, 2024.");
        let surfaces: Vec<&str> = units.iter().map(|u| u.surface.as_str()).collect();
        assert_eq!(
            surfaces,
            vec!["Els", "nens", "juguen", "a", "l'", "escola", ",", "2024", "."]
        );

        let juguen = &units[2];
        assert_eq!(juguen.lemma, "jugar");
        assert!(juguen.is_alphabetic && !juguen.is_stopword && !juguen.is_punctuation);

        let elided = &units[4];
        assert!(elided.is_stopword);
        assert!(!elided.is_alphabetic);

        assert!(units[6].is_punctuation);
        assert!(!units[7].is_punctuation && !units[7].is_alphabetic);
    }

    #[test]
    fn unsupported_language_is_unavailable() {
        let options = LexiconOptions {
            language: "xx".to_string(),
            ..LexiconOptions::default()
        };
        assert!(matches!(
            LexiconAnalyzer::load(&options),
            Err(PipelineError::ExternalModelUnavailable { .. })
        ));
    }

    #[test]
    fn missing_dictionary_is_unavailable() {
        let options = LexiconOptions {
            lemma_dict: Some(PathBuf::from("/nonexistent/topicmap/lemmas.tsv")),
            ..LexiconOptions::default()
        };
        assert!(matches!(
            LexiconAnalyzer::load(&options),
            Err(PipelineError::ExternalModelUnavailable { .. })
        ));
    }

    #[test]
    fn malformed_dictionary_line_is_rejected() {
        let err = parse_lemma_dictionary("# header\nnens\tnen\nbroken line\n", Path::new("d.tsv"))
            .unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }
}
