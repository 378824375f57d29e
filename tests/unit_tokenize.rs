// Unit tests for the two tokenization methodologies.
//
// Rule-based tokenization is exercised directly; the linguistic tokenizer
// runs over the lexicon analyzer built from in-memory stopwords and lemmas,
// so no resource files are needed.

use std::collections::{HashMap, HashSet};

use topicmap::tokenize::lexicon::LexiconAnalyzer;
use topicmap::tokenize::linguistic::LinguisticTokenizer;
use topicmap::tokenize::rule_based::RuleTokenizer;
use topicmap::tokenize::traits::{Methodology, Tokenize};

fn rule(text: &str) -> Vec<String> {
    RuleTokenizer::default().tokenize(text).tokens().to_vec()
}

fn linguistic() -> LinguisticTokenizer {
    let stopwords: HashSet<String> = ["el", "els", "la", "les", "de", "a", "i", "l'", "d'", "que"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let lemmas: HashMap<String, String> = [
        ("cases", "casa"),
        ("juguen", "jugar"),
        ("nens", "nen"),
        ("plou", "ploure"),
    ]
    .iter()
    .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
    .collect();
    LinguisticTokenizer::new(Box::new(LexiconAnalyzer::from_parts(stopwords, lemmas)))
}

fn ling(text: &str) -> Vec<String> {
    linguistic().tokenize(text).tokens().to_vec()
}

// ============================================================
// Rule-based tokenizer
// ============================================================

#[test]
fn rule_based_lowercases_and_drops_numbers() {
    assert_eq!(
        rule("Barcelona acull 3 concerts, el 2024!"),
        vec!["barcelona", "acull", "concerts", "el"]
    );
}

#[test]
fn rule_based_strips_typographic_punctuation() {
    assert_eq!(
        rule("«Diu que sí» — i… “no”"),
        vec!["diu", "que", "sí", "i", "no"]
    );
}

#[test]
fn rule_based_fuses_elisions_and_keeps_mixed_tokens() {
    // Apostrophes are stripped, not split on
    assert_eq!(rule("L'Ajuntament d’Olot"), vec!["lajuntament", "dolot"]);
    // Digits inside a word survive; a number with a decimal comma does not
    assert_eq!(rule("covid-19 3,5"), vec!["covid19"]);
}

#[test]
fn rule_based_output_is_lowercase_and_punctuation_free() {
    let tokens = rule("El Consell, l'Agència i «la Generalitat»: 12 acords!");
    assert!(!tokens.is_empty());
    for token in &tokens {
        assert_eq!(token, &token.to_lowercase());
        assert!(!token.chars().any(|c| c.is_ascii_punctuation()));
        assert!(!token.chars().all(|c| c.is_ascii_digit()));
        assert!(!token.is_empty());
    }
}

#[test]
fn rule_based_empty_text_gives_empty_stream() {
    assert!(RuleTokenizer::default().tokenize("").is_empty());
    assert!(RuleTokenizer::default().tokenize(" ... 42 !!").is_empty());
}

#[test]
fn custom_extra_punctuation_replaces_default_set() {
    let tokenizer = RuleTokenizer::with_extra_punctuation("§");
    let tokens = tokenizer.tokenize("§ article «nou»").tokens().to_vec();
    assert_eq!(tokens, vec!["article", "«nou»"]);
}

// ============================================================
// Linguistic tokenizer
// ============================================================

#[test]
fn linguistic_drops_stopwords_and_lemmatizes() {
    assert_eq!(
        ling("Els nens juguen a les cases de l'escola."),
        vec!["nen", "jugar", "casa", "escola"]
    );
}

#[test]
fn linguistic_drops_numbers_and_punctuation() {
    assert_eq!(ling("Plou 30 litres, diu l'informe!"), vec!["ploure", "litres", "diu", "informe"]);
}

#[test]
fn linguistic_keeps_interpunct_words() {
    assert_eq!(ling("El col·legi"), vec!["col·legi"]);
}

#[test]
fn linguistic_never_emits_stopwords() {
    let tokens = ling("La pluja i el vent de la tarda que arriba a la costa");
    for stop in ["la", "i", "el", "de", "que", "a"] {
        assert!(!tokens.iter().any(|t| t == stop), "stopword `{stop}` leaked");
    }
    assert_eq!(tokens, vec!["pluja", "vent", "tarda", "arriba", "costa"]);
}

#[test]
fn linguistic_empty_text_gives_empty_stream() {
    assert!(linguistic().tokenize("").is_empty());
}

#[test]
fn methodologies_are_labelled() {
    assert_eq!(RuleTokenizer::default().methodology(), Methodology::RuleBased);
    assert_eq!(linguistic().methodology(), Methodology::Linguistic);
    assert_eq!(Methodology::Linguistic.as_str(), "linguistic");
}

#[test]
fn token_stream_preview_and_joined() {
    let stream = RuleTokenizer::default().tokenize("un dos tres quatre");
    assert_eq!(stream.preview(2), "un dos");
    assert_eq!(stream.joined(), "un dos tres quatre");
    assert_eq!(stream.len(), 4);
}
