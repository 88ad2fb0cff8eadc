use anyhow::Result;
use weather_cache_core::{UserId, WeatherConfig};

pub(crate) async fn run(
    city: String,
    state: Option<String>,
    country: Option<String>,
    user: Option<String>,
) -> Result<()> {
    let config = WeatherConfig::from_env()?;
    let (resolver, history) = super::build_services(&config).await?;
    let user = user.as_deref().and_then(UserId::new);

    let payload = resolver
        .resolve(&history, user.as_ref(), Some(&city), state.as_deref(), country.as_deref())
        .await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
