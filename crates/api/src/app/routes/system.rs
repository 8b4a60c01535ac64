use axum::{http::StatusCode, response::IntoResponse, Json};

pub async fn welcome() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Welcome to the product catalog API" }))
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
