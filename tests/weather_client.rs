use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use weatherwise::config::WeatherConfig;
use weatherwise::models::CITIES;
use weatherwise::weather::warm_up;
use weatherwise::{City, ForecastProvider, PersistentCache, WeatherClient, WeatherWiseError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn week_body() -> Value {
    json!({
        "latitude": 41.88,
        "longitude": -87.63,
        "timezone": "America/Chicago",
        "daily": {
            "time": [
                "2024-06-03", "2024-06-04", "2024-06-05", "2024-06-06",
                "2024-06-07", "2024-06-08", "2024-06-09"
            ],
            "temperature_2m_max": [72.1, 75.4, 68.0, 61.3, 80.2, 83.9, 77.0],
            "temperature_2m_min": [55.0, 58.2, 52.4, 49.9, 62.0, 65.5, 60.1],
            "rain_sum": [0.0, 0.0, 0.35, 0.02, 0.0, 0.0, 0.0],
            "wind_speed_10m_max": [9.5, 11.2, 18.0, 14.4, 7.1, 6.3, 10.0],
            "weather_code": [1, 2, 63, 51, 0, 0, 3],
            "precipitation_probability_max": [5, 10, 90, 55, 0, 3, 20],
            "cloud_cover_mean": [12, 40, 95, 80, 4, 2, 70]
        }
    })
}

fn test_config(server: &MockServer) -> WeatherConfig {
    WeatherConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
        max_retries: 2,
        backoff_base_ms: 1,
    }
}

fn chicago() -> &'static City {
    City::find("chicago").unwrap()
}

fn open_cache(dir: &tempfile::TempDir) -> Arc<PersistentCache> {
    Arc::new(PersistentCache::open(dir.path()).unwrap())
}

#[tokio::test]
async fn test_every_city_gets_a_full_week() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(week_body()))
        .mount(&server)
        .await;

    let client = WeatherClient::new(&test_config(&server), None, Duration::from_secs(60)).unwrap();

    for city in &CITIES {
        let days = client.daily_forecast(city).await.unwrap();
        assert_eq!(days.len(), 7, "{}", city.name);
        assert!(days.iter().all(|d| d.max_temp_f >= d.min_temp_f));
    }
}

#[tokio::test]
async fn test_second_fetch_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(week_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = WeatherClient::new(
        &test_config(&server),
        Some(open_cache(&dir)),
        Duration::from_secs(3600),
    )
    .unwrap();

    let first = client.fetch_payload(chicago()).await.unwrap();
    let second = client.fetch_payload(chicago()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cache_survives_restart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(week_body()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ttl = Duration::from_secs(3600);

    let first = {
        let client =
            WeatherClient::new(&test_config(&server), Some(open_cache(&dir)), ttl).unwrap();
        client.daily_forecast(chicago()).await.unwrap()
    };

    // The first client and its database handle are gone; reopen from disk
    let client = WeatherClient::new(&test_config(&server), Some(open_cache(&dir)), ttl).unwrap();
    let second = client.daily_forecast(chicago()).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_expired_entry_triggers_new_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(week_body()))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client =
        WeatherClient::new(&test_config(&server), Some(open_cache(&dir)), Duration::ZERO).unwrap();

    client.fetch_payload(chicago()).await.unwrap();
    client.fetch_payload(chicago()).await.unwrap();
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(week_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = WeatherClient::new(&test_config(&server), None, Duration::from_secs(60)).unwrap();
    let days = client.daily_forecast(chicago()).await.unwrap();
    assert_eq!(days.len(), 7);
}

#[tokio::test]
async fn test_persistent_failure_gives_up() {
    let server = MockServer::start().await;
    // One attempt plus two retries
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = WeatherClient::new(&test_config(&server), None, Duration::from_secs(60)).unwrap();
    let err = client.daily_forecast(chicago()).await.unwrap_err();
    assert!(matches!(err, WeatherWiseError::Upstream { .. }));
}

#[tokio::test]
async fn test_client_error_reports_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": true,
            "reason": "Cannot initialize WeatherVariable from invalid String value foo"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = WeatherClient::new(&test_config(&server), None, Duration::from_secs(60)).unwrap();
    let err = client.daily_forecast(chicago()).await.unwrap_err();
    assert!(matches!(err, WeatherWiseError::Upstream { .. }));
    assert!(err.to_string().contains("invalid String value foo"));
}

#[tokio::test]
async fn test_malformed_forecast_is_not_cached() {
    let server = MockServer::start().await;
    let mut body = week_body();
    body["daily"]["temperature_2m_min"] = json!([55.0, 58.2]);
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = WeatherClient::new(
        &test_config(&server),
        Some(open_cache(&dir)),
        Duration::from_secs(3600),
    )
    .unwrap();

    assert!(client.daily_forecast(chicago()).await.is_err());
    assert!(client.daily_forecast(chicago()).await.is_err());
}

#[tokio::test]
async fn test_without_cache_every_call_hits_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(week_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = WeatherClient::new(&test_config(&server), None, Duration::from_secs(60)).unwrap();
    client.fetch_payload(chicago()).await.unwrap();
    client.fetch_payload(chicago()).await.unwrap();
}

#[tokio::test]
async fn test_warm_up_counts_loaded_cities() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("latitude", "21.31"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": true,
            "reason": "nope"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(week_body()))
        .mount(&server)
        .await;

    let client = WeatherClient::new(&test_config(&server), None, Duration::from_secs(60)).unwrap();
    assert_eq!(warm_up(&client).await, CITIES.len() - 1);
}
