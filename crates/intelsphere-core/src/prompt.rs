//! Prompt templates for the dashboard analysis panels.
//!
//! Each panel route turns its form fields into one user prompt plus a
//! personality-specific system prompt. The aggregator sends the pair to
//! every provider unchanged.

use std::fmt;
use std::str::FromStr;

/// Analyst persona used as the system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Personality {
    #[default]
    Strategic,
    IntelligenceAnalyst,
    OsintAnalyst,
    BusinessAnalyst,
    ResearchAnalyst,
    Technical,
}

impl Personality {
    /// Parse a personality name, falling back to [`Personality::Strategic`].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Personality::Strategic => "strategic",
            Personality::IntelligenceAnalyst => "intelligence-analyst",
            Personality::OsintAnalyst => "osint-analyst",
            Personality::BusinessAnalyst => "business-analyst",
            Personality::ResearchAnalyst => "research-analyst",
            Personality::Technical => "technical",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Personality::Strategic => {
                "You are a strategic advisor. Give clear, well-structured answers that weigh \
                 options, risks and likely outcomes, and end with concrete recommendations."
            }
            Personality::IntelligenceAnalyst => {
                "You are an intelligence analyst. Separate established facts from assessment, \
                 state your confidence in each judgment, and flag gaps in the available \
                 information. Present findings as a detailed analytical report."
            }
            Personality::OsintAnalyst => {
                "You are an open-source intelligence (OSINT) analyst. Work only from publicly \
                 available information, name the kinds of sources that would corroborate each \
                 point, and format the answer as an intelligence brief."
            }
            Personality::BusinessAnalyst => {
                "You are a business intelligence analyst. Cover market position, competitors \
                 and strategic options, and format the answer as an executive brief."
            }
            Personality::ResearchAnalyst => {
                "You are a research analyst. Summarize what is currently known on the topic, \
                 distinguish recent developments from background, and note where claims \
                 should be verified against live sources."
            }
            Personality::Technical => {
                "You are a senior technical expert. Answer precisely, include implementation \
                 details where they matter, and call out trade-offs."
            }
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "strategic" => Ok(Personality::Strategic),
            "intelligence-analyst" => Ok(Personality::IntelligenceAnalyst),
            "osint-analyst" => Ok(Personality::OsintAnalyst),
            "business-analyst" => Ok(Personality::BusinessAnalyst),
            "research-analyst" => Ok(Personality::ResearchAnalyst),
            "technical" => Ok(Personality::Technical),
            other => Err(format!("unknown personality: '{other}'")),
        }
    }
}

pub fn intelligence_prompt(target: &str, analysis_type: &str) -> String {
    format!("Perform {analysis_type} intelligence analysis on: {target}")
}

pub fn osint_prompt(query: &str, depth: &str) -> String {
    format!(
        "Conduct OSINT research with {depth} depth on: {query}. \
         Include real-time data sources and intelligence methodologies."
    )
}

/// An absent or blank `industry` reads as "general".
pub fn business_prompt(company: &str, analysis_type: &str, industry: Option<&str>) -> String {
    let industry = industry
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("general");
    format!(
        "Generate {analysis_type} business intelligence analysis for {company} in {industry} \
         industry. Include market positioning, competitive landscape, and strategic insights."
    )
}

/// System prompt asking for a single JSON verdict object.
pub fn sentiment_system_prompt() -> &'static str {
    r#"You are an expert sentiment analyst. Analyze the given text and reply with one JSON object and nothing else:
{
  "sentiment": "positive|negative|neutral",
  "confidence": 0.0-1.0,
  "emotional_intensity": 0.0-1.0,
  "reasoning": "short explanation"
}"#
}

pub fn sentiment_user_prompt(text: &str) -> String {
    format!("Analyze the sentiment of this text: \"{text}\"")
}
