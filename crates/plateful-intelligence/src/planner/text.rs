// ABOUTME: Text folding, tokenization and suffix stemming for Polish and English requests
// ABOUTME: Pure functions shared by the hint miner, range parser and catalog search index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

//! Text normalization.
//!
//! Request text and catalog names go through the same folding so that
//! `"Łosoś"`, `"losos"` and `"LOSOŚ"` all produce the stem `loso`.

use plateful_core::constants::text::{MIN_STEM_REMAINDER, MIN_TERM_LEN};
use unicode_normalization::UnicodeNormalization;

/// Inflectional suffixes, longest first. Polish endings plus a few English plurals.
const SUFFIXES: &[&str] = &[
    "kami", "owie", "owej", "ami", "ach", "ech", "owa", "owe", "owi", "owy", "ego", "ych", "imi",
    "ymi", "ies", "oes", "em", "om", "ow", "ek", "ka", "ki", "ie", "mi", "u", "y", "i", "a", "e",
    "o", "s",
];

/// Filler words dropped from every term set (already folded)
const STOPWORDS: &[&str] = &[
    // Polish
    "lub", "albo", "bez", "z", "i", "oraz", "prosze", "poprosze", "dla", "mnie", "na", "do",
    "okolo", "ok", "max", "maks", "maksymalnie", "miedzy", "pomiedzy", "a", "min", "minimum", "co",
    "najmniej", "najwyzej", "cos", "chce", "chcialbym", "chcialabym", "daj", "posilek", "danie",
    "jakies", "jakis", "nie", "jem", "niejem", "alergia", "uczulenie", "uczulony", "uczulona", "w",
    "ze", "wiecej", "mniej", "niz", "alergie", "alergii", "mam", "jestem",
    // English
    "or", "and", "with", "without", "no", "for", "me", "please", "an", "the", "to", "of", "about",
    "around", "approx", "approximately", "maximum", "at", "least", "most", "up", "under", "over",
    "between", "some", "something", "want", "would", "like", "give", "meal", "dish", "i", "my",
    "dont", "don", "t", "do", "not", "eat", "allergic", "allergy", "intolerant", "less", "more",
    "than", "grams", "gram", "g",
];

/// Calorie and macro keywords, matched on the word or its stem
const NUTRIENT_KEYWORDS: &[&str] = &[
    "kcal", "kal", "kalorie", "kalorii", "cal", "calorie", "calories", "bial", "bialk", "bialko",
    "protein", "proteins", "p", "b", "tluszcz", "tluszczu", "t", "fat", "fats", "f", "wegl",
    "wegle", "weglowodany", "weglowodanow", "carb", "carbs", "carbohydrate", "carbohydrates", "w",
    "c",
];

/// Fold diacritics and lowercase
///
/// Applies NFKD, drops the combining diacritical marks block and maps the
/// Polish `ł`, which has no decomposition, onto `l`.
#[must_use]
pub fn fold(input: &str) -> String {
    input
        .nfkd()
        .filter(|ch| !('\u{0300}'..='\u{036f}').contains(ch))
        .map(|ch| match ch {
            'ł' | 'Ł' => 'l',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Fold, replace punctuation other than `: % -` with spaces and collapse whitespace
#[must_use]
pub fn normalize(input: &str) -> String {
    normalize_keeping(input, &[':', '%', '-'])
}

/// Like [`normalize`] but keeps the comparison characters used by range rules
/// (`~ < > = .`) and turns typographic dashes into `-`.
#[must_use]
pub fn normalize_for_ranges(input: &str) -> String {
    let dashed: String = input
        .chars()
        .map(|ch| if matches!(ch, '–' | '—') { '-' } else { ch })
        .collect();
    split_glued_units(&normalize_keeping(&dashed, &[':', '%', '-', '~', '<', '>', '=', '.']))
}

fn normalize_keeping(input: &str, keep: &[char]) -> String {
    let replaced: String = fold(input)
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch.is_whitespace() || keep.contains(&ch) {
                ch
            } else {
                ' '
            }
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Insert a space between a digit and a directly following letter: `1000kcal` becomes `1000 kcal`
fn split_glued_units(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut previous_digit = false;
    for ch in input.chars() {
        if previous_digit && ch.is_alphabetic() {
            out.push(' ');
        }
        previous_digit = ch.is_ascii_digit();
        out.push(ch);
    }
    out
}

/// Split text into normalized word tokens
///
/// Dashes become separators (`20-40` gives `20`, `40`), glued number+unit
/// tokens are split and trailing sentence punctuation is stripped.
#[must_use]
pub fn tokenize(input: &str) -> Vec<String> {
    let normalized = normalize(input).replace('-', " ");
    split_glued_units(&normalized)
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|ch| !matches!(ch, '.' | ',' | ';' | ':' | '!' | '?'))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect()
}

/// Strip the longest known suffix when enough of the word remains
#[must_use]
pub fn stem(word: &str) -> String {
    let length = word.chars().count();
    for suffix in SUFFIXES {
        if length > suffix.len() + MIN_STEM_REMAINDER {
            if let Some(stripped) = word.strip_suffix(suffix) {
                return stripped.to_owned();
            }
        }
    }
    word.to_owned()
}

/// Tokenize and stem in one pass, returning `(word, stem)` pairs
#[must_use]
pub fn tokens_with_stems(input: &str) -> Vec<(String, String)> {
    tokenize(input)
        .into_iter()
        .map(|word| {
            let stemmed = stem(&word);
            (word, stemmed)
        })
        .collect()
}

/// Integer or decimal number (`12`, `12.5`, `12,5`)
#[must_use]
pub fn is_numeric(word: &str) -> bool {
    let mut parts = word.splitn(2, ['.', ',']);
    let whole = parts.next().unwrap_or_default();
    let digits = |part: &str| !part.is_empty() && part.chars().all(|ch| ch.is_ascii_digit());
    digits(whole) && parts.next().is_none_or(digits)
}

/// Calorie or macro keyword, by word or by stem
#[must_use]
pub fn is_nutrient_keyword(word: &str, stemmed: &str) -> bool {
    NUTRIENT_KEYWORDS.contains(&word) || NUTRIENT_KEYWORDS.contains(&stemmed)
}

/// Filler word carrying no food meaning
#[must_use]
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

/// Word naming a diet rather than a food
#[must_use]
pub fn is_diet_keyword(word: &str) -> bool {
    matches!(word, "vege" | "wege" | "keto")
        || ["vegan", "wegan", "vegetarian", "wegetarian", "pesc", "ketogeni"]
            .iter()
            .any(|prefix| word.starts_with(prefix))
}

/// Word that never becomes a search term
#[must_use]
pub fn is_ignorable(word: &str, stemmed: &str) -> bool {
    is_numeric(word) || is_nutrient_keyword(word, stemmed) || is_stopword(word) || is_diet_keyword(word)
}

/// Stem long enough and meaningful enough to be searched for
#[must_use]
pub fn is_search_term(word: &str, stemmed: &str) -> bool {
    !is_ignorable(word, stemmed) && stemmed.chars().count() >= MIN_TERM_LEN
}

/// Search stems of free-form phrases such as `"chicken breast"`
#[must_use]
pub fn phrase_terms<S: AsRef<str>>(phrases: &[S]) -> Vec<String> {
    phrases
        .iter()
        .flat_map(|phrase| tokens_with_stems(phrase.as_ref()))
        .filter(|(word, stemmed)| is_search_term(word, stemmed))
        .map(|(_, stemmed)| stemmed)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_polish_diacritics() {
        assert_eq!(fold("Łosoś z Żółtym Serem"), "losos z zoltym serem");
    }

    #[test]
    fn test_normalize_keeps_colon_percent_dash() {
        assert_eq!(normalize("Białko: 20-40%, proszę!!"), "bialko: 20-40% prosze");
    }

    #[test]
    fn test_tokenize_splits_glued_units_and_ranges() {
        assert_eq!(tokenize("1000kcal, białko 20–40"), vec!["1000", "kcal", "bialko", "20", "40"]);
        assert_eq!(tokenize("~600 kcal, no turkey"), vec!["600", "kcal", "no", "turkey"]);
    }

    #[test]
    fn test_range_normalization_keeps_comparators() {
        assert_eq!(normalize_for_ranges("~600kcal, <=20g fat"), "~600 kcal <=20 g fat");
        assert_eq!(normalize_for_ranges("białko 30—50"), "bialko 30-50");
    }

    #[test]
    fn test_stem_longest_suffix_first() {
        assert_eq!(stem("kurczakami"), "kurcza");
        assert_eq!(stem("ziemniakow"), "ziemniak");
        assert_eq!(stem("turkey"), "turke");
        assert_eq!(stem("berries"), "berr");
        assert_eq!(stem("berry"), "berr");
        assert_eq!(stem("ryba"), "ryb");
        // too short to strip
        assert_eq!(stem("ser"), "ser");
    }

    #[test]
    fn test_predicates() {
        assert!(is_numeric("12"));
        assert!(is_numeric("12,5"));
        assert!(!is_numeric("12a"));
        assert!(!is_numeric("1.2.3"));
        assert!(is_nutrient_keyword("bialka", &stem("bialka")));
        assert!(is_nutrient_keyword("carbs", "carb"));
        assert!(is_stopword("bez"));
        assert!(is_diet_keyword("weganski"));
        assert!(!is_diet_keyword("vegetable"));
        assert!(is_ignorable("600", "600"));
        assert!(!is_ignorable("chicken", "chicken"));
    }

    #[test]
    fn test_phrase_terms() {
        assert_eq!(phrase_terms(&["Chicken breast", "no", "tofu 200g"]), vec!["chicken", "breast", "tof"]);
    }
}
