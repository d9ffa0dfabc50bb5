//! Tool command: run an agent tool outside a call.

use crate::agent::{horoscope_for, WeatherClient};
use crate::cli::{Output, ToolAction};
use crate::config::Settings;
use anyhow::Result;

/// Run the tool command.
pub async fn run_tool(action: &ToolAction, settings: Settings) -> Result<()> {
    let record = match action {
        ToolAction::Weather { latitude, longitude } => {
            let client = WeatherClient::new(&settings.weather.endpoint);
            match client.current(latitude, longitude).await {
                Ok(report) => serde_json::to_value(report)?,
                Err(e) => {
                    Output::error(&format!("Weather lookup failed: {}", e));
                    return Err(e.into());
                }
            }
        }
        ToolAction::Horoscope { sign } => serde_json::to_value(horoscope_for(sign))?,
    };

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
