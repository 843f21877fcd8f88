//! One-shot client for the generative-language suggestion service. The
//! outlook is computed before this module runs and is never blocked or
//! invalidated by anything that happens here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Outlook, RetirementParameters};
use crate::format::format_inr;

const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("suggestion service API key is not configured; set GEMINI_API_KEY")]
    MissingApiKey,
    #[error("suggestion service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("suggestion service returned no usable response")]
    EmptyResponse,
}

/// Everything the prompt needs, captured from an already-computed outlook.
#[derive(Debug, Clone)]
pub struct SuggestionRequest {
    pub current_age: i32,
    pub retirement_age: i32,
    pub years_to_retirement: i32,
    pub accumulated_corpus: f64,
    pub required_corpus: f64,
    pub outcome_message: String,
}

impl SuggestionRequest {
    pub fn new(params: &RetirementParameters, outlook: &Outlook, outcome_message: String) -> Self {
        Self {
            current_age: params.current_age,
            retirement_age: params.retirement_age,
            years_to_retirement: params.years_to_retirement(),
            accumulated_corpus: outlook.accumulated_corpus,
            required_corpus: outlook.required_corpus,
            outcome_message,
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "As a retirement planning assistant, analyze the following user's retirement calculation:\n\
             Current Age: {}\n\
             Retirement Age: {}\n\
             Years to Retirement: {}\n\
             Estimated Accumulated Corpus: {}\n\
             Required Corpus: {}\n\
             Outcome: {}\n\
             \n\
             Based on this, provide actionable and helpful suggestions to help the user achieve \
             their retirement goals. If there's a deficit, suggest ways to bridge the gap \
             (e.g., increase savings, extend working years, adjust expectations). If there's a \
             surplus, suggest ways to utilize it (e.g., early retirement, enhanced lifestyle, \
             legacy planning). Keep the suggestions concise and encouraging. Provide 3-5 \
             distinct points.",
            self.current_age,
            self.retirement_age,
            self.years_to_retirement,
            format_inr(self.accumulated_corpus),
            format_inr(self.required_corpus),
            self.outcome_message,
        )
    }
}

/// One opaque display line of the service's free-text answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionLine {
    pub bullet: bool,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Calls the default endpoint with the key from the environment.
pub async fn fetch_suggestions(
    request: &SuggestionRequest,
) -> Result<Vec<SuggestionLine>, SuggestError> {
    let api_key = std::env::var(API_KEY_ENV).map_err(|_| SuggestError::MissingApiKey)?;
    fetch_suggestions_from(DEFAULT_ENDPOINT, &api_key, request).await
}

/// Endpoint-parameterized variant so tests and deployments can point the
/// client elsewhere.
pub async fn fetch_suggestions_from(
    endpoint: &str,
    api_key: &str,
    request: &SuggestionRequest,
) -> Result<Vec<SuggestionLine>, SuggestError> {
    let prompt = request.prompt();
    let body = GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part { text: &prompt }],
        }],
    };

    let response = reqwest::Client::new()
        .post(endpoint)
        .query(&[("key", api_key)])
        .json(&body)
        .send()
        .await?
        .error_for_status()?;
    let envelope: GenerateContentResponse = response.json().await?;

    match extract_text(&envelope) {
        Some(text) => Ok(split_suggestions(text)),
        None => Err(SuggestError::EmptyResponse),
    }
}

fn extract_text(envelope: &GenerateContentResponse) -> Option<&str> {
    envelope
        .candidates
        .iter()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.text.as_deref())
        .find(|text| !text.trim().is_empty())
}

/// Splits the opaque free text into display lines, marking lines the model
/// chose to bullet-prefix. No further parsing or validation happens here.
pub fn split_suggestions(text: &str) -> Vec<SuggestionLine> {
    text.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return None;
            }
            let bullet = trimmed
                .strip_prefix('-')
                .or_else(|| trimmed.strip_prefix('*'));
            Some(match bullet {
                Some(rest) => SuggestionLine {
                    bullet: true,
                    text: rest.trim().to_string(),
                },
                None => SuggestionLine {
                    bullet: false,
                    text: trimmed.to_string(),
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Outcome, Outlook};

    fn sample_request() -> SuggestionRequest {
        SuggestionRequest {
            current_age: 30,
            retirement_age: 60,
            years_to_retirement: 30,
            accumulated_corpus: 322_324_725.0,
            required_corpus: 71_809_008.0,
            outcome_message: "Congratulations! You have a surplus.".to_string(),
        }
    }

    #[test]
    fn prompt_carries_ages_corpora_and_outcome() {
        let prompt = sample_request().prompt();
        assert!(prompt.contains("Current Age: 30"));
        assert!(prompt.contains("Retirement Age: 60"));
        assert!(prompt.contains("Years to Retirement: 30"));
        assert!(prompt.contains("Estimated Accumulated Corpus: \u{20b9}32,23,24,725"));
        assert!(prompt.contains("Required Corpus: \u{20b9}7,18,09,008"));
        assert!(prompt.contains("Outcome: Congratulations! You have a surplus."));
        assert!(prompt.contains("Provide 3-5 distinct points."));
    }

    #[test]
    fn request_builder_derives_years_from_parameters() {
        let params = crate::core::RetirementParameters {
            present_lumpsum: 0.0,
            monthly_investable: 0.0,
            present_pf_value: 0.0,
            monthly_pf_investment: 0.0,
            cagr_invested: 0.0,
            cagr_pf: 0.0,
            cagr_after_retirement: 0.0,
            current_age: 42,
            retirement_age: 65,
            inflation_rate: 0.0,
            annual_investment_increase: 0.0,
            annual_pf_increase: 0.0,
            desired_annual_income: 0.0,
            life_expectancy: 20,
        };
        let outlook = Outlook {
            accumulated_corpus: 10.0,
            required_corpus: 5.0,
            surplus_or_deficit: 5.0,
            outcome: Outcome::Surplus,
            advisory_flag: false,
        };
        let request = SuggestionRequest::new(&params, &outlook, "ok".to_string());
        assert_eq!(request.years_to_retirement, 23);
        assert_eq!(request.accumulated_corpus, 10.0);
    }

    #[test]
    fn envelope_with_candidate_text_parses() {
        let json = r#"{
          "candidates": [
            {"content": {"parts": [{"text": "- Save more.\n- Retire later."}]}}
          ]
        }"#;
        let envelope: GenerateContentResponse =
            serde_json::from_str(json).expect("envelope should parse");
        let text = extract_text(&envelope).expect("text expected");
        assert!(text.starts_with("- Save more."));
    }

    #[test]
    fn empty_and_blank_envelopes_yield_no_text() {
        let empty: GenerateContentResponse = serde_json::from_str("{}").expect("should parse");
        assert_eq!(extract_text(&empty), None);

        let blank: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "   "}]}}]}"#,
        )
        .expect("should parse");
        assert_eq!(extract_text(&blank), None);
    }

    #[test]
    fn splits_bulleted_and_plain_lines() {
        let lines = split_suggestions(
            "Here are some ideas:\n\n- Increase your monthly savings.\n* Push retirement by two years.\nStay invested.",
        );
        assert_eq!(
            lines,
            vec![
                SuggestionLine {
                    bullet: false,
                    text: "Here are some ideas:".to_string()
                },
                SuggestionLine {
                    bullet: true,
                    text: "Increase your monthly savings.".to_string()
                },
                SuggestionLine {
                    bullet: true,
                    text: "Push retirement by two years.".to_string()
                },
                SuggestionLine {
                    bullet: false,
                    text: "Stay invested.".to_string()
                },
            ]
        );
    }
}
