//! Labeled concatenation of provider responses.
//!
//! Pure functions: the same responses in the same order always compose to
//! the same text.

use intelsphere_types::llm::ModelResponse;

/// Render one `**{provider}:**` section per successful response, in the
/// given order, joined by `separator`. Failed responses are skipped.
pub fn compose_sections(responses: &[ModelResponse], separator: &str) -> String {
    responses
        .iter()
        .filter(|r| r.success)
        .map(|r| format!("**{}:**\n{}", r.provider, r.response.trim()))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Full aggregate body: a one-line summary followed by the labeled sections.
pub fn compose_report_body(
    query_id: &str,
    responses: &[ModelResponse],
    attempted: usize,
    separator: &str,
) -> String {
    let names: Vec<&str> = responses
        .iter()
        .filter(|r| r.success)
        .map(|r| r.provider.as_str())
        .collect();

    format!(
        "Multi-model analysis [{query_id}]: {}/{attempted} providers responded ({})\n\n{}",
        names.len(),
        names.join(", "),
        compose_sections(responses, separator)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(provider: &str, text: &str) -> ModelResponse {
        ModelResponse {
            provider: provider.to_string(),
            model: format!("{provider}-model"),
            response: text.to_string(),
            success: true,
            tokens: None,
            error: None,
            latency_ms: 1,
        }
    }

    fn err(provider: &str) -> ModelResponse {
        ModelResponse {
            provider: provider.to_string(),
            model: String::new(),
            response: String::new(),
            success: false,
            tokens: None,
            error: Some("authentication failed".to_string()),
            latency_ms: 1,
        }
    }

    #[test]
    fn test_sections_keep_given_order() {
        let responses = vec![ok("Cohere", "second"), ok("OpenAI-1", "first")];
        let text = compose_sections(&responses, "\n\n---\n\n");
        assert_eq!(text, "**Cohere:**\nsecond\n\n---\n\n**OpenAI-1:**\nfirst");
    }

    #[test]
    fn test_sections_skip_failures() {
        let responses = vec![ok("A", "alpha"), err("B"), ok("C", "gamma")];
        let text = compose_sections(&responses, "|");
        assert_eq!(text, "**A:**\nalpha|**C:**\ngamma");
        assert!(!text.contains("**B:**"));
    }

    #[test]
    fn test_sections_trim_whitespace() {
        let responses = vec![ok("A", "\n  padded answer  \n")];
        assert_eq!(compose_sections(&responses, "|"), "**A:**\npadded answer");
    }

    #[test]
    fn test_composition_is_deterministic() {
        let responses = vec![ok("A", "same"), ok("B", "text")];
        let first = compose_report_body("q1", &responses, 3, "\n\n---\n\n");
        let second = compose_report_body("q1", &responses.clone(), 3, "\n\n---\n\n");
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_body_header() {
        let responses = vec![ok("A", "one"), err("B"), ok("C", "two")];
        let body = compose_report_body("abc", &responses, 3, "\n");
        assert!(body.starts_with("Multi-model analysis [abc]: 2/3 providers responded (A, C)\n\n"));
        assert!(body.ends_with("**A:**\none\n**C:**\ntwo"));
    }
}
