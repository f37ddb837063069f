//! Checks against the real public APIs.
//!
//! These need network access and, for the keyed APIs, credentials in the
//! environment (`APIPROBE_WEATHER_API_KEY`, `APIPROBE_USER_API_URI`,
//! `APIPROBE_USER_API_KEY`). Run with `cargo test -- --ignored`.

use apiprobe::{
    ConfigKey, ContentType, Probe, ProbeConfig, ProbeResult, RequestDefaults, equal_to, has_item,
    has_size, init_tracing,
};
use tracing::info;

fn setup() -> ProbeResult<(ProbeConfig, Probe)> {
    init_tracing();
    let config = ProbeConfig::from_env()?;
    let probe = Probe::from_config(&config)?;
    Ok((config, probe))
}

#[tokio::test]
#[ignore = "needs network access"]
async fn live_zippopotam_beverly_hills() -> ProbeResult<()> {
    let (config, probe) = setup()?;

    probe
        .given()
        .base_uri(&config.zippo_base_uri)
        .path_param("Country", "us")
        .path_param("ZipCode", "90210")
        .log_uri()
        .get("/{Country}/{ZipCode}")
        .await?
        .status_code(200)?
        .content_type(ContentType::Json)?
        .body("country", equal_to("United States"))?
        .body("places[0].state", equal_to("California"))?
        .body("places[0].'state abbreviation'", equal_to("CA"))?
        .body("places.'place name'", has_size(1))?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs network access"]
async fn live_zippopotam_istanbul() -> ProbeResult<()> {
    let (config, probe) = setup()?;

    probe
        .given()
        .base_uri(&config.zippo_base_uri)
        .get("/tr/01000")
        .await?
        .status_code(200)?
        .body("places.'place name'", has_item("Büyükdikili Köyü"))?
        .body("places.'place name'", has_size(71))?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs network access"]
async fn live_gorest_shared_spec() -> ProbeResult<()> {
    let (config, probe) = setup()?;
    let probe = probe.with_defaults(
        RequestDefaults::new()
            .with_base_uri(&config.gorest_base_uri)
            .with_path_param("APIName", "users")
            .with_query_param("page", 2),
    );

    probe
        .given()
        .get("/{APIName}")
        .await?
        .status_code(200)?
        .body("meta.pagination.page", equal_to(2))?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs network access and APIPROBE_USER_API_URI/APIPROBE_USER_API_KEY"]
async fn live_user_api_key() -> ProbeResult<()> {
    let (config, probe) = setup()?;
    let uri = config.require(ConfigKey::UserApiUri)?;
    let key = config.require(ConfigKey::UserApiKey)?;

    probe
        .given()
        .header("x-api-key", key)
        .get(uri)
        .await?
        .status_code(200)?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs network access and APIPROBE_WEATHER_API_KEY"]
async fn live_weather_temperatures() -> ProbeResult<()> {
    let (config, probe) = setup()?;
    let key = config.require(ConfigKey::WeatherApiKey)?;

    let response = probe
        .given()
        .base_uri(&config.weather_base_uri)
        .param("key", key)
        .param("q", &config.weather_location)
        .param("aqi", "no")
        .get("/current.json")
        .await?;
    response.status_code(200)?;

    let temp_c: f64 = response.path("current.temp_c")?;
    let temp_f: f64 = response.path("current.temp_f")?;
    info!(location = %config.weather_location, temp_c, temp_f, "current temperature");
    Ok(())
}
