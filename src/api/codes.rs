use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use super::ApiError;
use crate::{
    codes,
    server::AppState,
    types::{CodeResponse, CodesQuery, CodesResponse},
};

/// `GET /api/v1/codes/one`
pub async fn one(State(state): State<AppState>) -> Json<CodeResponse> {
    let settings = &state.settings;
    Json(CodeResponse {
        code: codes::generate_code(settings.code_length, &settings.code_alphabet),
    })
}

/// `GET /api/v1/codes/many?count=N`, bounded by `max_generate`.
pub async fn many(
    State(state): State<AppState>,
    query: Result<Query<CodesQuery>, QueryRejection>,
) -> Result<Json<CodesResponse>, ApiError> {
    let Query(query) = query?;
    let settings = &state.settings;
    let count = query.count.unwrap_or(1);

    if count < 1 || count > settings.max_generate {
        return Err(ApiError::Validation(format!(
            "count must be between 1 and {}",
            settings.max_generate
        )));
    }

    Ok(Json(CodesResponse {
        codes: codes::generate_codes(count, settings.code_length, &settings.code_alphabet),
    }))
}
