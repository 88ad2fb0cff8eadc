use anyhow::{Result, anyhow};
use weather_cache_core::{UserId, WeatherConfig};
use weather_cache_http::HistoryResponse;

pub(crate) async fn run(user: String, cursor: Option<String>, limit: Option<usize>) -> Result<()> {
    let config = WeatherConfig::from_env()?;
    let user = UserId::new(&user).ok_or_else(|| anyhow!("user must not be blank"))?;
    let (_, history) = super::build_services(&config).await?;

    let page = history.list(&user, cursor.as_deref(), limit).await?;
    println!("{}", serde_json::to_string_pretty(&HistoryResponse::from(page))?);
    Ok(())
}
