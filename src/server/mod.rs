use crate::config::CliConfig;
use crate::core::batch::BatchEngine;
use crate::core::export::{export_filename, to_csv, ExportFormat};
use crate::core::fetcher::FipeClient;
use crate::core::{BatchRequest, ConfigProvider};
use crate::domain::model::HealthResponse;
use crate::utils::error::{FipeError, Result};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub struct AppState {
    engine: BatchEngine<FipeClient>,
    api_base: String,
}

impl AppState {
    pub fn from_config(config: &CliConfig) -> Result<Self> {
        let api_base = ConfigProvider::api_base(config).to_string();
        let client = FipeClient::new(&api_base)?;
        Ok(Self {
            engine: BatchEngine::from_config(client, config),
            api_base,
        })
    }
}

#[derive(Debug, Deserialize)]
struct BatchQuery {
    format: Option<ExportFormat>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/fipe", post(run_batch))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: CliConfig) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Servidor FIPE iniciado em http://localhost:{}", config.port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_batch(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BatchQuery>,
    Json(request): Json<BatchRequest>,
) -> std::result::Result<Response, FipeError> {
    let codes = request.codes.unwrap_or_default();
    let text = request.text.unwrap_or_default();

    let response = state.engine.run(&codes, &text).await?;

    match query.format {
        Some(ExportFormat::Csv) => {
            let filename = export_filename(ExportFormat::Csv);
            let headers = [
                (header::CONTENT_TYPE, ExportFormat::Csv.mime_type().to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ];
            Ok((headers, to_csv(&response.results)).into_response())
        }
        _ => Ok(Json(response).into_response()),
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        api_base: state.api_base.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

impl IntoResponse for FipeError {
    fn into_response(self) -> Response {
        let status = match self {
            FipeError::NoValidCodes => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Batch request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
