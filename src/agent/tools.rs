//! Tool definitions and implementations for the voice agent.

use super::horoscope::horoscope_for;
use super::weather::WeatherClient;
use crate::error::{CallbotError, Result};
use crate::session::CallControl;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// Available tools for the agent.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    /// Current temperature at a location.
    GetWeather { latitude: String, longitude: String },

    /// Today's horoscope for a zodiac sign.
    GetHoroscope { sign: String },

    /// Say goodbye and hang up.
    EndCall,
}

impl ToolCall {
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::GetWeather { .. } => "get_weather",
            ToolCall::GetHoroscope { .. } => "get_horoscope",
            ToolCall::EndCall => "end_call",
        }
    }
}

/// A function the realtime model may call, in the shape both providers accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Tool execution context: the clients and lines the tools need.
pub struct ToolContext {
    weather: WeatherClient,
    farewell: String,
    end_call_pause: Duration,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(weather: WeatherClient, farewell: &str, end_call_pause: Duration) -> Self {
        Self {
            weather,
            farewell: farewell.to_string(),
            end_call_pause,
        }
    }

    /// Execute a tool call and return its result record.
    pub async fn execute(&self, tool: &ToolCall, control: &dyn CallControl) -> Result<Value> {
        debug!("Executing {}", tool.name());
        match tool {
            ToolCall::GetWeather { latitude, longitude } => {
                let report = self.weather.current(latitude, longitude).await?;
                Ok(serde_json::to_value(report)?)
            }
            ToolCall::GetHoroscope { sign } => Ok(serde_json::to_value(horoscope_for(sign))?),
            ToolCall::EndCall => self.execute_end_call(control).await,
        }
    }

    async fn execute_end_call(&self, control: &dyn CallControl) -> Result<Value> {
        info!("Ending call");
        control.say(&self.farewell).await?;
        tokio::time::sleep(self.end_call_pause).await;
        control.hangup().await?;
        Ok(json!({ "status": "ended" }))
    }
}

/// Function definitions for the realtime session, in registration order.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "get_weather".to_string(),
            description: "Get the current temperature at a location. \
                Use this when the caller asks about the weather."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "latitude": {
                        "type": "string",
                        "description": "Latitude in decimal degrees"
                    },
                    "longitude": {
                        "type": "string",
                        "description": "Longitude in decimal degrees"
                    }
                },
                "required": ["latitude", "longitude"]
            }),
        },
        ToolDefinition {
            name: "get_horoscope".to_string(),
            description: "Get today's horoscope for a zodiac sign.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "sign": {
                        "type": "string",
                        "description": "The zodiac sign, e.g. Aries"
                    }
                },
                "required": ["sign"]
            }),
        },
        ToolDefinition {
            name: "end_call".to_string(),
            description: "End the call. Use this once the conversation is finished \
                or the caller asks to hang up."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

/// Parse a tool call from the name and JSON arguments sent by the model.
///
/// `arguments` is either an object or a string holding a JSON-encoded object.
/// Coordinates may arrive as JSON numbers as well as strings.
pub fn parse_tool_call(name: &str, arguments: &Value) -> Result<ToolCall> {
    let decoded = match arguments {
        Value::String(raw) if raw.trim().is_empty() => Some(Value::Null),
        Value::String(raw) => Some(
            serde_json::from_str::<Value>(raw)
                .map_err(|e| CallbotError::Agent(format!("Invalid arguments for {}: {}", name, e)))?,
        ),
        _ => None,
    };
    let arguments = decoded.as_ref().unwrap_or(arguments);

    match name {
        "get_weather" => Ok(ToolCall::GetWeather {
            latitude: string_arg(arguments, "latitude")?,
            longitude: string_arg(arguments, "longitude")?,
        }),
        "get_horoscope" => Ok(ToolCall::GetHoroscope {
            sign: string_arg(arguments, "sign")?,
        }),
        "end_call" => Ok(ToolCall::EndCall),
        _ => Err(CallbotError::Agent(format!("Unknown tool: {}", name))),
    }
}

fn string_arg(args: &Value, key: &str) -> Result<String> {
    match &args[key] {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(CallbotError::Agent(format!("Missing '{}' argument", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::RecordingControl;

    #[test]
    fn test_parse_weather_tool() {
        let tool = parse_tool_call("get_weather", &json!({"latitude": "52.52", "longitude": 13.41})).unwrap();
        assert_eq!(
            tool,
            ToolCall::GetWeather {
                latitude: "52.52".to_string(),
                longitude: "13.41".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_incomplete() {
        assert!(matches!(
            parse_tool_call("book_flight", &json!({})),
            Err(CallbotError::Agent(_))
        ));
        assert!(matches!(
            parse_tool_call("get_horoscope", &json!({"zodiac": "Aries"})),
            Err(CallbotError::Agent(_))
        ));
    }

    #[test]
    fn test_parse_json_encoded_arguments() {
        let tool = parse_tool_call("get_horoscope", &json!("{\"sign\":\"Aries\"}")).unwrap();
        assert_eq!(tool, ToolCall::GetHoroscope { sign: "Aries".to_string() });

        assert_eq!(parse_tool_call("end_call", &json!("")).unwrap(), ToolCall::EndCall);
        assert!(matches!(
            parse_tool_call("get_weather", &json!("{\"latitude\": 52.5")),
            Err(CallbotError::Agent(_))
        ));
    }

    #[test]
    fn test_definitions_match_tool_names() {
        let names: Vec<_> = tool_definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["get_weather", "get_horoscope", "end_call"]);
        assert_eq!(ToolCall::EndCall.name(), "end_call");
    }

    #[tokio::test]
    async fn test_horoscope_record() {
        let ctx = ToolContext::new(WeatherClient::new("http://127.0.0.1:9"), "Goodbye!", Duration::ZERO);
        let control = RecordingControl::default();

        let out = ctx
            .execute(&ToolCall::GetHoroscope { sign: "Aries".to_string() }, &control)
            .await
            .unwrap();
        assert_eq!(out, json!({"sign": "Aries", "horoscope": "Today is your lucky day!"}));
    }

    #[tokio::test]
    async fn test_end_call_says_farewell_then_hangs_up() {
        let ctx = ToolContext::new(WeatherClient::new("http://127.0.0.1:9"), "Goodbye!", Duration::ZERO);
        let control = RecordingControl::default();

        let out = ctx.execute(&ToolCall::EndCall, &control).await.unwrap();
        assert_eq!(out, json!({"status": "ended"}));
        assert_eq!(control.events(), vec!["say:Goodbye!", "hangup"]);
        assert!(!control.is_live());
    }
}
