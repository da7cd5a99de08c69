// Prediction HTTP service.
use crate::deeplink;
use crate::form::SpecForm;
use crate::model::UNKNOWN;
use crate::predictor::PriceModel;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Deserialize)]
struct PredictRequest {
    input_data: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    prediction: f64,
}

#[derive(Debug, Serialize)]
struct QuoteResponse {
    prediction: f64,
    search_url: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

pub fn build_router(model: Arc<PriceModel>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/predict", post(predict))
        .route("/quote", post(quote))
        .layer(TraceLayer::new_for_http())
        .with_state(model)
}

pub async fn serve(addr: &str, model: Arc<PriceModel>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Prediction server listening on {addr}");
    axum::serve(listener, build_router(model)).await
}

async fn healthz() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}

/// Bare prediction: one-hot encode the flat record onto the training
/// schema and run the regressor.
async fn predict(
    State(model): State<Arc<PriceModel>>,
    Json(request): Json<PredictRequest>,
) -> Json<PredictResponse> {
    let prediction = model.predict(&request.input_data);
    Json(PredictResponse { prediction })
}

/// Full quote: validate the specification form, predict a price and build
/// the matching marketplace deep link.
async fn quote(
    State(model): State<Arc<PriceModel>>,
    Json(form): Json<SpecForm>,
) -> Result<Json<QuoteResponse>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(e) = form.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        ));
    }

    let prediction = model.predict(&form.input_data());
    let filters = deeplink::build_filters(&form);
    let search_url = deeplink::search_url(
        form.brand.as_deref().unwrap_or(UNKNOWN),
        form.model.as_deref().unwrap_or(UNKNOWN),
        form.condition.as_deref().unwrap_or(UNKNOWN),
        &filters,
    );

    Ok(Json(QuoteResponse {
        prediction,
        search_url,
    }))
}
