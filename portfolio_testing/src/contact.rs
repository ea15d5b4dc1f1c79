use std::{net::IpAddr, time::Duration};

use anyhow::Context;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tracing::info;

pub const CONTACT_ROUTE: &str = "/api/contact";

pub const TAKEN_EMAIL: &str = "taken@example.com";
pub const INTERNAL_ERROR_NAME: &str = "Internal Error";
pub const BAD_REQUEST_NAME: &str = "Bad Request";
pub const SLOW_NAME: &str = "Slow Poke";
pub const SLOW_DELAY: Duration = Duration::from_secs(2);

pub async fn start_server(host: IpAddr, port: u16) -> anyhow::Result<()> {
    info!("Starting contact testing server on {host}:{port}");
    info!("Contact endpoint: http://{host}:{port}{CONTACT_ROUTE}");
    info!(
        "Submissions are accepted, except for the email {TAKEN_EMAIL:?} (400), messages \
         containing \"spam\" (400), the names {BAD_REQUEST_NAME:?} (400 without JSON body) and \
         {INTERNAL_ERROR_NAME:?} (500). The name {SLOW_NAME:?} delays the response."
    );

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router())
        .await
        .context("Failed to start HTTP server")
}

pub fn router() -> Router<()> {
    Router::new().route(CONTACT_ROUTE, routing::post(submit))
}

#[derive(Deserialize)]
struct ContactRequest {
    name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    message: String,
}

async fn submit(Json(request): Json<ContactRequest>) -> Response {
    info!(
        name = %request.name,
        email = %request.email,
        phone = ?request.phone,
        "received contact message"
    );

    match request.name.as_str() {
        INTERNAL_ERROR_NAME => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"detail": "Internal server error"})),
            )
                .into_response()
        }
        BAD_REQUEST_NAME => return (StatusCode::BAD_REQUEST, "bad request").into_response(),
        SLOW_NAME => tokio::time::sleep(SLOW_DELAY).await,
        _ => {}
    }

    if request.email == TAKEN_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"email": ["already used"]})),
        )
            .into_response();
    }

    if request.message.contains("spam") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Looks like spam.", "captcha": "ignored"})),
        )
            .into_response();
    }

    Json(json!({"ok": true})).into_response()
}
