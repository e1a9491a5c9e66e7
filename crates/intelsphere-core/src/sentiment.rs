//! Multi-provider sentiment consensus.
//!
//! Every provider is asked for a JSON verdict (see
//! [`crate::prompt::sentiment_system_prompt`]). Replies that contain a
//! parseable verdict vote; the rest are ignored. The consensus is the
//! majority label.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Used when a verdict omits `confidence` or `emotional_intensity`.
const DEFAULT_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "negative" => Ok(Sentiment::Negative),
            "neutral" => Ok(Sentiment::Neutral),
            other => Err(format!("invalid sentiment: '{other}'")),
        }
    }
}

/// One provider's verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentVerdict {
    pub sentiment: Sentiment,
    /// Clamped to `0.0..=1.0`.
    pub confidence: f64,
    /// Clamped to `0.0..=1.0`.
    pub emotional_intensity: f64,
    pub reasoning: String,
}

#[derive(Deserialize)]
struct RawVerdict {
    sentiment: String,
    confidence: Option<f64>,
    emotional_intensity: Option<f64>,
    #[serde(default)]
    reasoning: String,
}

/// Extract a verdict from a provider reply.
///
/// Scans for the first `{` that starts a JSON object with a valid
/// `sentiment` field, so prose or code fences around the object are fine.
pub fn parse_verdict(text: &str) -> Option<SentimentVerdict> {
    text.match_indices('{').find_map(|(start, _)| {
        let raw = serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<RawVerdict>()
            .next()?
            .ok()?;
        let sentiment = raw.sentiment.parse().ok()?;
        Some(SentimentVerdict {
            sentiment,
            confidence: clamp_score(raw.confidence),
            emotional_intensity: clamp_score(raw.emotional_intensity),
            reasoning: raw.reasoning,
        })
    })
}

fn clamp_score(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 1.0),
        _ => DEFAULT_SCORE,
    }
}

/// A verdict attributed to the provider that produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentVote {
    pub provider: String,
    #[serde(flatten)]
    pub verdict: SentimentVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentConsensus {
    pub sentiment: Sentiment,
    /// Mean confidence of the voters that agree with the consensus.
    pub confidence: f64,
    /// Mean intensity over all voters.
    pub emotional_intensity: f64,
    /// `1 - agreeing / total`; 0 means unanimous.
    pub disagreement_score: f64,
    pub voters: usize,
}

/// Majority vote over `votes`; `None` when there are none.
///
/// Ties go to `neutral` if it is among the tied labels, otherwise to the
/// label with the higher summed confidence.
pub fn consensus(votes: &[SentimentVote]) -> Option<SentimentConsensus> {
    if votes.is_empty() {
        return None;
    }

    // (label, count, summed confidence), neutral first so it wins exact ties.
    let mut tally: Vec<(Sentiment, usize, f64)> = [
        Sentiment::Neutral,
        Sentiment::Positive,
        Sentiment::Negative,
    ]
    .into_iter()
    .map(|label| {
        let agreeing = votes.iter().filter(|v| v.verdict.sentiment == label);
        let (count, conf) = agreeing.fold((0, 0.0), |(n, c), v| (n + 1, c + v.verdict.confidence));
        (label, count, conf)
    })
    .collect();

    let top = tally.iter().map(|(_, n, _)| *n).max().unwrap_or(0);
    tally.retain(|(_, n, _)| *n == top);
    let (winner, agreeing, summed_confidence) = if tally.iter().any(|(l, _, _)| *l == Sentiment::Neutral) {
        tally[0]
    } else {
        tally
            .into_iter()
            .reduce(|a, b| if b.2 > a.2 { b } else { a })?
    };

    let total = votes.len();
    let intensity = votes.iter().map(|v| v.verdict.emotional_intensity).sum::<f64>() / total as f64;

    Some(SentimentConsensus {
        sentiment: winner,
        confidence: summed_confidence / agreeing as f64,
        emotional_intensity: intensity,
        disagreement_score: 1.0 - agreeing as f64 / total as f64,
        voters: total,
    })
}
