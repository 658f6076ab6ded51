//! Thin wrapper around a hosted generative-text endpoint that suggests blog
//! post titles for an upcoming artist.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::utils::error::{AppError, AppResult};

const SUGGESTION_COUNT: usize = 5;

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

pub struct TitleSuggester {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl TitleSuggester {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.genai_api_url.clone(),
            api_key: config.genai_api_key.clone(),
            model: config.genai_model.clone(),
        }
    }

    pub async fn suggest(
        &self,
        artist_name: &str,
        artist_genre: &str,
        keywords: &str,
    ) -> AppResult<Vec<String>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::ExternalServiceError(
                "Title suggestions are not configured on this server".to_string(),
            )
        })?;

        let prompt = build_prompt(artist_name, artist_genre, keywords);
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                contents: vec![Content {
                    parts: vec![Part { text: prompt }],
                }],
            })
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Generative call failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Generative endpoint returned {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Unreadable generative response: {}", e))
        })?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| {
                AppError::ExternalServiceError("Generative response had no content".to_string())
            })?;

        let titles = parse_titles(&text);
        if titles.is_empty() {
            return Err(AppError::ExternalServiceError(
                "Generative response had no usable titles".to_string(),
            ));
        }

        Ok(titles)
    }
}

fn build_prompt(artist_name: &str, artist_genre: &str, keywords: &str) -> String {
    format!(
        "You are a creative blog post title generator for a music blog.\n\n\
         Generate {SUGGESTION_COUNT} blog post titles for an upcoming artist.\n\n\
         Artist Name: {artist_name}\n\
         Artist Genre: {artist_genre}\n\
         Keywords: {keywords}\n\n\
         Titles:"
    )
}

/// Pulls individual titles out of free-form model output: one per line,
/// numbering and bullets stripped.
fn parse_titles(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')')
                .trim_start_matches(['-', '*'])
                .trim()
                .trim_matches('"')
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .take(SUGGESTION_COUNT)
        .collect()
}
