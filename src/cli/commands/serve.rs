//! Voice webhook server.
//!
//! Point a phone number's voice webhook at `/twiml` and every call it
//! receives is bridged into the meeting.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::telephony::SipBridge;
use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Run the webhook server.
pub async fn run_serve(host: Option<String>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let env = match preflight::check(&Operation::Serve) {
        Ok(env) => env,
        Err(e) => {
            Output::error(&format!("{}", e));
            Output::info("Run 'callbot doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    };

    let bridge = SipBridge::from_env(&env, &settings.telephony.sip_domain)?;
    let sip_uri = bridge.uri();
    let app = router(bridge);

    let host = host.unwrap_or(settings.server.host);
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("callbot webhook server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("Bridging to", &sip_uri);
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET       /health");
    Output::kv("Bridge markup", "GET|POST  /twiml");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Routes for the webhook server.
pub fn router(bridge: SipBridge) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/twiml", get(twiml).post(twiml))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(bridge))
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn twiml(State(bridge): State<Arc<SipBridge>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/xml")], bridge.markup())
}
