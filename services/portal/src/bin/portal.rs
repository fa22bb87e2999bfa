//! services/portal/src/bin/portal.rs

use portal_lib::{
    adapters::{HttpSessionAdapter, LogAnalyticsAdapter, MeasurementAnalyticsAdapter, SystemClock},
    config::Config,
    error::ApiError,
    web::{eligibility_handler, meta_handler, rest::ApiDoc, state::AppState, ws_handler},
};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::get,
    Router,
};
use portal_core::ports::{AnalyticsSink, SessionService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let analytics: Arc<dyn AnalyticsSink> = match (
        config.analytics_measurement_id.clone(),
        config.analytics_api_secret.clone(),
    ) {
        (Some(measurement_id), Some(api_secret)) => {
            info!("Using measurement-protocol analytics sink.");
            Arc::new(MeasurementAnalyticsAdapter::new(
                config.analytics_endpoint.clone(),
                measurement_id,
                api_secret,
            ))
        }
        _ => {
            info!("No analytics credentials configured; events go to the log.");
            Arc::new(LogAnalyticsAdapter::new())
        }
    };

    let sessions: Option<Arc<dyn SessionService>> = config
        .session_service_url
        .clone()
        .map(|url| Arc::new(HttpSessionAdapter::new(url)) as Arc<dyn SessionService>);
    if sessions.is_none() {
        info!("No session provider configured; all visitors are guests.");
    }

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        analytics,
        sessions,
        clock: Arc::new(SystemClock),
    });

    let cors = CorsLayer::new()
        .allow_origin(config.site_base_url.parse::<HeaderValue>().map_err(|e| {
            ApiError::Internal(format!("Invalid SITE_BASE_URL for CORS: {}", e))
        })?)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let api_router = Router::new()
        .route("/meta", get(meta_handler))
        .route("/eligibility", get(eligibility_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
