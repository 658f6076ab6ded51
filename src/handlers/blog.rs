use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::registry::AppRegistry;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::success;

#[derive(Debug, Deserialize)]
pub struct TitleSuggestionRequest {
    pub artist_name: String,
    pub artist_genre: String,
    pub keywords: String,
}

#[derive(Serialize)]
struct TitleSuggestions {
    titles: Vec<String>,
}

pub async fn suggest_titles(
    State(registry): State<AppRegistry>,
    Json(req): Json<TitleSuggestionRequest>,
) -> AppResult<Response> {
    for (field, value) in [
        ("artist_name", &req.artist_name),
        ("artist_genre", &req.artist_genre),
        ("keywords", &req.keywords),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::ValidationError(format!(
                "{} is required",
                field
            )));
        }
    }

    let titles = registry
        .title_suggester()
        .suggest(
            req.artist_name.trim(),
            req.artist_genre.trim(),
            req.keywords.trim(),
        )
        .await?;

    Ok(success(TitleSuggestions { titles }, "Titles suggested"))
}
