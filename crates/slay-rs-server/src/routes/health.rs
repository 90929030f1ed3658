use crate::response::{Envelope, success};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct Banner {
    status: &'static str,
    timestamp: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct Health {
    status: &'static str,
    openai: &'static str,
}

pub(crate) async fn banner() -> Json<Envelope<Banner>> {
    success(Banner {
        status: "$SLAY backend is running! Ready to girlify!",
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<Envelope<Health>> {
    success(Health {
        status: "Server is running! Ready to girlify!",
        openai: if state.upstream_configured {
            "Connected"
        } else {
            "Not configured"
        },
    })
}
