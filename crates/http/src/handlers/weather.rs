use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use serde_json::Value;

use crate::AppState;
use crate::api_error::ApiError;
use crate::identity::authenticated_user;
use crate::query_types::WeatherQuery;

pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let user = authenticated_user(&headers);
    let payload = state
        .resolver
        .resolve(
            &state.history,
            user.as_ref(),
            query.city.as_deref(),
            query.state.as_deref(),
            query.country.as_deref(),
        )
        .await?;
    Ok(Json(payload))
}
