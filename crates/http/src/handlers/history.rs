use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;

use crate::AppState;
use crate::api_error::ApiError;
use crate::identity::authenticated_user;
use crate::query_types::HistoryQuery;
use crate::response_types::HistoryResponse;

pub async fn list_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let user = authenticated_user(&headers).ok_or(ApiError::Unauthorized)?;
    let Query(query) = query?;
    let page = state.history.list(&user, query.cursor.as_deref(), query.limit).await?;
    Ok(Json(HistoryResponse::from(page)))
}
