//! `POST /search_code`

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use codereader_search::{JobRef, SearchMatch};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub job_id: Option<String>,
    pub identifier: Option<String>,
    pub limit: Option<usize>,
    pub min_score: Option<f32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatchView {
    pub relative_path: String,
    pub content: String,
    pub start_line: u64,
    pub end_line: u64,
    pub score: f32,
}

impl From<SearchMatch> for SearchMatchView {
    fn from(m: SearchMatch) -> Self {
        Self {
            relative_path: m.relative_path,
            content: m.content,
            start_line: m.start_line,
            end_line: m.end_line,
            score: m.score,
        }
    }
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub data: Vec<SearchMatchView>,
}

pub async fn search_code(
    State(state): State<AppState>,
    Json(body): Json<SearchRequest>,
) -> ApiResult<Json<SearchResponse>> {
    let job_ref = match (body.job_id, body.identifier) {
        (Some(job_id), _) => JobRef::JobId(job_id),
        (None, Some(identifier)) => JobRef::Identifier(identifier),
        (None, None) => {
            return Err(ApiError::Validation(
                "either jobId or identifier must be provided".to_string(),
            ));
        }
    };

    let limit = body.limit.unwrap_or(codereader_search::DEFAULT_LIMIT);
    let min_score = body.min_score.unwrap_or(codereader_search::DEFAULT_MIN_SCORE);

    let matches = state
        .search
        .search(&body.query, &job_ref, limit, min_score)
        .await?;

    Ok(Json(SearchResponse {
        data: matches.into_iter().map(SearchMatchView::from).collect(),
    }))
}
