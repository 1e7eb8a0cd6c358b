// ABOUTME: Hint miner classifying request words into required, excluded and alternative terms
// ABOUTME: Also hosts the allergy scanner adding "allergic to X" style targets to exclusions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Plateful Contributors

use super::text::{is_ignorable, is_search_term, tokens_with_stems};
use plateful_core::constants::text::MIN_TERM_LEN;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Search terms mined from a request, all stemmed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hints {
    /// Every one must appear in a meal
    pub required_terms: BTreeSet<String>,
    /// None may appear in a meal
    pub excluded_terms: BTreeSet<String>,
    /// At least one member of each group must appear
    pub alternative_groups: Vec<BTreeSet<String>>,
}

impl Hints {
    /// No term constrains the search
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.required_terms.is_empty()
            && self.excluded_terms.is_empty()
            && self.alternative_groups.is_empty()
    }
}

fn is_exclusion_marker(word: &str) -> bool {
    matches!(word, "bez" | "without" | "no")
}

fn is_disjunction(word: &str) -> bool {
    matches!(word, "lub" | "albo" | "or")
}

fn is_between_marker(word: &str) -> bool {
    matches!(word, "miedzy" | "pomiedzy" | "between")
}

fn is_between_joiner(word: &str) -> bool {
    matches!(word, "a" | "and")
}

fn purge<'a>(terms: impl IntoIterator<Item = &'a String>) -> BTreeSet<String> {
    terms
        .into_iter()
        .filter(|term| is_search_term(term, term))
        .cloned()
        .collect()
}

/// Classifies request words into hint sets
pub struct HintMiner;

impl HintMiner {
    /// Mine required, excluded and alternative terms from a request
    ///
    /// `"without X"` excludes `X`, `"X or Y"` forms a group, and
    /// `"between X and Y"` is read as the group `{X, Y}`. Numbers, calorie and
    /// macro keywords, diet names and stopwords never become terms.
    #[must_use]
    pub fn mine(prompt: &str) -> Hints {
        let tokens = tokens_with_stems(prompt);
        let mut required = Vec::new();
        let mut excluded = Vec::new();
        let mut groups: Vec<Vec<String>> = Vec::new();

        let mut i = 0;
        while i < tokens.len() {
            let (word, stemmed) = &tokens[i];

            if is_exclusion_marker(word) {
                if let Some((next_word, next_stem)) = tokens.get(i + 1) {
                    if !is_ignorable(next_word, next_stem) {
                        excluded.push(next_stem.clone());
                    }
                    i += 2;
                    continue;
                }
            }

            if is_between_marker(word)
                && i + 3 < tokens.len()
                && is_between_joiner(&tokens[i + 2].0)
            {
                let (first_word, first_stem) = &tokens[i + 1];
                let (second_word, second_stem) = &tokens[i + 3];
                if !is_ignorable(first_word, first_stem) && !is_ignorable(second_word, second_stem) {
                    groups.push(vec![first_stem.clone(), second_stem.clone()]);
                }
                i += 4;
                continue;
            }

            if is_ignorable(word, stemmed) {
                i += 1;
                continue;
            }

            let mut group = vec![stemmed.clone()];
            let mut j = i + 1;
            while j + 1 < tokens.len() && is_disjunction(&tokens[j].0) {
                let (next_word, next_stem) = &tokens[j + 1];
                if !is_ignorable(next_word, next_stem) {
                    group.push(next_stem.clone());
                }
                j += 2;
            }
            if group.len() > 1 {
                groups.push(group);
                i = j;
                continue;
            }

            if stemmed.chars().count() >= MIN_TERM_LEN {
                required.push(stemmed.clone());
            }
            i += 1;
        }

        Hints {
            required_terms: purge(&required),
            excluded_terms: purge(&excluded),
            alternative_groups: groups
                .iter()
                .map(|group| purge(group))
                .filter(|group| !group.is_empty())
                .collect(),
        }
    }
}

/// Stemmed targets of allergy and avoidance phrases
///
/// Recognizes `alergia|uczulenie|uczulony [na] X` (and inflections), `nie [jem] X`,
/// `allergic|allergy|intolerant [to] X`, and `don't|do not eat X`.
#[must_use]
pub fn scan_allergies(prompt: &str) -> Vec<String> {
    let tokens = tokens_with_stems(prompt);
    let word_at = |index: usize| tokens.get(index).map(|(word, _)| word.as_str());
    let mut found = Vec::new();

    for (i, (word, _)) in tokens.iter().enumerate() {
        let target = match word.as_str() {
            "alergia" | "alergie" | "alergii" | "uczulenie" | "uczulony" | "uczulona" => {
                Some(if word_at(i + 1) == Some("na") { i + 2 } else { i + 1 })
            }
            "allergic" | "allergy" | "intolerant" => {
                Some(if matches!(word_at(i + 1), Some("to" | "on")) { i + 2 } else { i + 1 })
            }
            "nie" => Some(if word_at(i + 1) == Some("jem") { i + 2 } else { i + 1 }),
            "niejem" => Some(i + 1),
            "dont" if word_at(i + 1) == Some("eat") => Some(i + 2),
            "don" if word_at(i + 1) == Some("t") && word_at(i + 2) == Some("eat") => Some(i + 3),
            "do" if word_at(i + 1) == Some("not") && word_at(i + 2) == Some("eat") => Some(i + 3),
            _ => None,
        };

        if let Some((target_word, target_stem)) = target.and_then(|index| tokens.get(index)) {
            if is_search_term(target_word, target_stem) {
                found.push(target_stem.clone());
            }
        }
    }

    found
}
