use axum::response::Json;
use serde_json::{Value, json};

/// Health check for the local callback server. Reports which service is
/// listening, so a port clash with another local tool is easy to spot.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_service_identity() {
        let Json(body) = health().await;

        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], env!("CARGO_PKG_NAME"));
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
