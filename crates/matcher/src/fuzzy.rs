use ingest::Entity;

use crate::rank::{round_score, sort_desc_stable};
use crate::ratio::token_sort_ratio;
use crate::text::{normalize, tokens};
use crate::types::{MatchOutcome, MatchResult};


/// Label equals the whole document text.
pub const EXACT_SCORE: f64 = 1.0;
/// Label equals one whitespace token of the text.
pub const TOKEN_SCORE: f64 = 0.95;
/// Floor for a label found inside the text...
pub const SUBSTRING_BASE: f64 = 0.85;
/// ...plus this much scaled by the share of the text the label covers.
pub const SUBSTRING_SPAN: f64 = 0.1;
/// Minimum fuzzy ratio accepted by the two fuzzy stages.
pub const FUZZY_THRESHOLD: f64 = 0.70;

/// Normalized document text, tokenized once per ranking.
struct Subject<'a> {
    text: &'a str,
    tokens: Vec<&'a str>,
    chars: usize,
}

impl<'a> Subject<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            tokens: tokens(text).collect(),
            chars: text.chars().count(),
        }
    }
}

type Stage = fn(&str, &Subject<'_>) -> Option<f64>;

/// Evaluated in order per entity; the first stage returning a score wins.
const STAGES: [Stage; 5] = [
    exact_text,
    exact_token,
    substring,
    best_token_fuzzy,
    whole_text_fuzzy,
];

fn exact_text(label: &str, subject: &Subject<'_>) -> Option<f64> {
    (label == subject.text).then_some(EXACT_SCORE)
}

fn exact_token(label: &str, subject: &Subject<'_>) -> Option<f64> {
    subject.tokens.contains(&label).then_some(TOKEN_SCORE)
}

fn substring(label: &str, subject: &Subject<'_>) -> Option<f64> {
    subject.text.contains(label).then(|| {
        let coverage = label.chars().count() as f64 / subject.chars as f64;
        SUBSTRING_BASE + SUBSTRING_SPAN * coverage
    })
}

fn best_token_fuzzy(label: &str, subject: &Subject<'_>) -> Option<f64> {
    let best = subject
        .tokens
        .iter()
        .map(|token| token_sort_ratio(label, token))
        .fold(0.0, f64::max);
    (best >= FUZZY_THRESHOLD).then_some(best)
}

fn whole_text_fuzzy(label: &str, subject: &Subject<'_>) -> Option<f64> {
    let score = token_sort_ratio(label, subject.text);
    (score >= FUZZY_THRESHOLD).then_some(score)
}

fn cascade(label: &str, subject: &Subject<'_>) -> Option<f64> {
    STAGES.iter().find_map(|stage| stage(label, subject))
}

/// Unrounded cascade score of a single label against a text, after
/// normalizing both. `None` when no stage fires or the text is blank.
///
/// A blank label is contained in every non-blank text, so it lands on the
/// substring floor.
pub fn score_label(label: &str, text: &str) -> Option<f64> {
    let label = normalize(label);
    let text = normalize(text);
    if text.is_empty() {
        return None;
    }
    cascade(&label, &Subject::new(&text))
}

/// Ranks entities whose label plausibly appears in a document's text.
///
/// Stateless; the same inputs always produce the same outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatcher;

impl FuzzyMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Score every entity against `text` and return those a stage accepted,
    /// best first. Blank text or no entities yields an empty outcome.
    ///
    /// Ordering uses the unrounded scores; rounding happens afterwards, so
    /// two results may share a printed score yet keep a definite order.
    pub fn rank(&self, text: &str, entities: &[Entity]) -> MatchOutcome {
        let text = normalize(text);
        if text.is_empty() || entities.is_empty() {
            return MatchOutcome::empty();
        }
        let subject = Subject::new(&text);

        let mut scored: Vec<(f64, &Entity)> = entities
            .iter()
            .filter_map(|entity| {
                cascade(&normalize(&entity.label), &subject).map(|score| (score, entity))
            })
            .collect();
        sort_desc_stable(&mut scored, |(score, _)| *score);

        let matches = scored
            .into_iter()
            .map(|(score, entity)| MatchResult {
                entity_id: entity.id.clone(),
                score: round_score(score) as f32,
            })
            .collect();
        MatchOutcome::from_matches(matches)
    }
}
