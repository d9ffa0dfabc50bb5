//! Current-temperature lookup against an Open-Meteo compatible forecast API.

use crate::error::{CallbotError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Current temperature at a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature: f64,
    pub temperature_unit: String,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current: Option<CurrentConditions>,
}

#[derive(Deserialize)]
struct CurrentConditions {
    temperature_2m: Option<f64>,
}

/// Client for the weather endpoint.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    endpoint: String,
}

impl WeatherClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }

    /// Fetch the current temperature. A single request, no retry.
    #[instrument(skip(self))]
    pub async fn current(&self, latitude: &str, longitude: &str) -> Result<WeatherReport> {
        let latitude = parse_coordinate("latitude", latitude)?;
        let longitude = parse_coordinate("longitude", longitude)?;

        let url = url::Url::parse_with_params(
            &self.endpoint,
            &[
                ("latitude", latitude),
                ("longitude", longitude),
                ("current", "temperature_2m"),
            ],
        )
        .map_err(|e| CallbotError::Config(format!("Invalid weather endpoint {}: {}", self.endpoint, e)))?;

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(CallbotError::Upstream {
                service: "weather",
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unexpected status").to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let body: ForecastResponse = serde_json::from_slice(&bytes).map_err(|e| CallbotError::Upstream {
            service: "weather",
            status: status.as_u16(),
            message: format!("unreadable response body: {}", e),
        })?;
        let temperature = body
            .current
            .and_then(|c| c.temperature_2m)
            .ok_or_else(|| CallbotError::Upstream {
                service: "weather",
                status: status.as_u16(),
                message: "response has no current.temperature_2m".to_string(),
            })?;

        debug!("Current temperature {}", temperature);
        Ok(WeatherReport {
            temperature,
            temperature_unit: "Celsius".to_string(),
        })
    }
}

/// Check that a coordinate is numeric, returning it trimmed.
fn parse_coordinate<'a>(name: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(trimmed),
        _ => Err(CallbotError::InvalidInput(format!(
            "{} must be numeric, got {:?}",
            name, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode as AxumStatus, routing::get, Json, Router};
    use std::collections::HashMap;
    use tokio_test::{assert_err, assert_ok};

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/v1/forecast", addr)
    }

    #[tokio::test]
    async fn test_returns_current_temperature() {
        let app = Router::new().route(
            "/v1/forecast",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.get("current").map(String::as_str) != Some("temperature_2m")
                    || params.get("latitude").map(String::as_str) != Some("52.52")
                    || params.get("longitude").map(String::as_str) != Some("13.41")
                {
                    return Err(AxumStatus::BAD_REQUEST);
                }
                Ok(Json(serde_json::json!({
                    "latitude": 52.52,
                    "current": { "time": "2025-06-05T11:00", "temperature_2m": 21.5 }
                })))
            }),
        );
        let client = WeatherClient::new(&spawn(app).await);

        let report = assert_ok!(client.current("52.52", " 13.41").await);
        assert_eq!(
            report,
            WeatherReport {
                temperature: 21.5,
                temperature_unit: "Celsius".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_non_200_is_upstream_error() {
        let app = Router::new().route(
            "/v1/forecast",
            get(|| async { (AxumStatus::SERVICE_UNAVAILABLE, "maintenance") }),
        );
        let client = WeatherClient::new(&spawn(app).await);

        let err = assert_err!(client.current("52.52", "13.41").await);
        assert_eq!(err.upstream_status(), Some(503));
    }

    #[tokio::test]
    async fn test_missing_field_is_upstream_error() {
        let app = Router::new().route(
            "/v1/forecast",
            get(|| async { Json(serde_json::json!({ "current": {} })) }),
        );
        let client = WeatherClient::new(&spawn(app).await);

        let err = assert_err!(client.current("1", "2").await);
        assert!(matches!(err, CallbotError::Upstream { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_upstream_error() {
        let app = Router::new().route("/v1/forecast", get(|| async { "<html>busy</html>" }));
        let client = WeatherClient::new(&spawn(app).await);

        let err = assert_err!(client.current("1", "2").await);
        assert!(matches!(err, CallbotError::Upstream { service: "weather", status: 200, .. }));
    }

    #[tokio::test]
    async fn test_non_numeric_coordinates_rejected_before_request() {
        // Nothing listens here; a request would fail with an HTTP error instead.
        let client = WeatherClient::new("http://127.0.0.1:9/v1/forecast");
        let err = assert_err!(client.current("north", "13.41").await);
        assert!(matches!(err, CallbotError::InvalidInput(_)));
    }
}
