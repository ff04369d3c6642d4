// Natural-language summary of a graded table.
//
// Only the top/bottom extract and the best/worst names leave the engine.
// The reply is treated as opaque text.
use crate::config::InsightsConfig;
use crate::error::InsightError;
use crate::output::markdown_table;
use crate::types::{ExtractEntry, Highlights, InsightRow};
use crate::util::{format_optional, round2};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, info};

/// Anything that can turn a prompt into prose.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, InsightError>;
    fn model_id(&self) -> &str;
}

fn insight_row(e: &ExtractEntry) -> InsightRow {
    InsightRow {
        campaign: e.campaign.clone(),
        score: format_optional(Some(round2(e.score))),
        roi: format_optional(e.roi),
        revenue: format_optional(e.revenue),
        cpl: format_optional(e.cpl),
        total_leads: format_optional(e.total_leads),
    }
}

/// Fill the instruction template with the extract table and campaign names.
pub fn build_prompt(highlights: &Highlights, currency: &str) -> String {
    let rows: Vec<InsightRow> = highlights.extract.iter().map(insight_row).collect();
    let table = markdown_table(&rows);
    let best = &highlights.best_campaign;
    let worst = &highlights.worst_campaign;
    format!(
        "Analyze the campaign performance data in the markdown table below.\n\
         \n\
         Write a concise, business-focused summary that helps decide whether to \
         continue or suspend each campaign. Revenue and spend are in {currency}.\n\
         \n\
         Summarize the key differences between the top performing campaigns \
         (e.g. '{best}') and the bottom performing campaigns (e.g. '{worst}'). \
         Support the comparison with ROI, CPL and Revenue figures. Add a few \
         points on any other noteworthy campaigns.\n\
         \n\
         Data table (metrics rounded to 2 decimal places):\n\
         {table}\n\
         \n\
         Use the 'Campaign Score (0–100)' column for overall context only. Do not \
         quote the score itself in your answer (e.g. \"100 Campaign Score\").\n\
         \n\
         IMPORTANT: every time you mention a campaign by name (e.g. '{best}'), wrap \
         the name in an inline code block, like `Campaign Name`.\n"
    )
}

/// Ask `generator` for a summary of the extract.
pub fn generate_insights(
    generator: &dyn TextGenerator,
    highlights: &Highlights,
    currency: &str,
) -> Result<String, InsightError> {
    let prompt = build_prompt(highlights, currency);
    info!(
        model = generator.model_id(),
        rows = highlights.extract.len(),
        "requesting campaign insights"
    );
    debug!(prompt_chars = prompt.len(), "prompt built");
    let text = generator.generate(&prompt)?;
    if text.trim().is_empty() {
        return Err(InsightError::EmptyResponse);
    }
    Ok(text)
}

/// Google Generative Language API client, blocking.
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: SecretString,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(config: &InsightsConfig, api_key: SecretString) -> Result<Self, InsightError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("campaign-grader/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });
        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()?;
        let status = resp.status().as_u16();
        let text = resp.text()?;
        if status >= 400 {
            return Err(api_error(status, &text));
        }
        let json: serde_json::Value = serde_json::from_str(&text)?;
        response_text(&json)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn api_error(status: u16, body: &str) -> InsightError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    InsightError::ApiError { status, message }
}

/// Concatenate the text parts of the first candidate.
fn response_text(json: &serde_json::Value) -> Result<String, InsightError> {
    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or(InsightError::EmptyResponse)?;
    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        Err(InsightError::EmptyResponse)
    } else {
        Ok(text)
    }
}
