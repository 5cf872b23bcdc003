//! OpenWeather client behaviour against a mock HTTP server.

use skywatch_core::{FetchError, OpenWeatherProvider, WeatherProvider, WeatherQuery};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn delhi_response() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 77.2167, "lat": 28.6667 },
        "weather": [
            { "id": 721, "main": "Haze", "description": "haze", "icon": "50d" }
        ],
        "base": "stations",
        "main": {
            "temp": 31.05,
            "feels_like": 33.4,
            "temp_min": 31.05,
            "temp_max": 31.05,
            "pressure": 1008,
            "humidity": 52
        },
        "visibility": 3000,
        "wind": { "speed": 3.6, "deg": 290 },
        "clouds": { "all": 0 },
        "dt": 1_700_000_000,
        "sys": { "country": "IN" },
        "timezone": 19800,
        "id": 1273294,
        "name": "Delhi",
        "cod": 200
    })
}

fn provider_for(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_base_url("TEST_KEY".into(), server.uri())
}

#[tokio::test]
async fn city_lookup_maps_reading() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Delhi"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(delhi_response()))
        .expect(1)
        .mount(&server)
        .await;

    let reading = provider_for(&server)
        .current(&WeatherQuery::city("Delhi"))
        .await
        .expect("reading");

    assert_eq!(reading.location_name, "Delhi");
    assert_eq!(reading.condition, "Haze");
    assert_eq!(reading.description, "haze");
    assert_eq!(reading.temperature_c, 31.05);
    assert_eq!(reading.humidity_pct, 52);
    assert_eq!(reading.pressure_hpa, 1008.0);
    assert_eq!(reading.wind_speed_mps, 3.6);
    assert_eq!(reading.wind_direction_deg, 290.0);
    assert_eq!(reading.observed_at.timestamp(), 1_700_000_000);
}

#[tokio::test]
async fn coordinate_lookup_sends_lat_lon() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "28.61"))
        .and(query_param("lon", "77.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(delhi_response()))
        .expect(1)
        .mount(&server)
        .await;

    let reading = provider_for(&server)
        .current(&WeatherQuery::coordinates(28.61, 77.2))
        .await
        .expect("reading");

    assert_eq!(reading.location_name, "Delhi");
}

#[tokio::test]
async fn not_found_carries_api_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current(&WeatherQuery::city("Atlantis"))
        .await
        .unwrap_err();

    match err {
        FetchError::Api {
            status,
            ref message,
        } => {
            assert_eq!(status.as_u16(), 404);
            assert_eq!(message.as_deref(), Some("city not found"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
        )
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current(&WeatherQuery::city("Delhi"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn json_error_body_without_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "cod": 500
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current(&WeatherQuery::city("Delhi"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Api { message: None, .. }));
}

#[tokio::test]
async fn string_success_code_is_rejected() {
    let server = MockServer::start().await;

    let mut body = delhi_response();
    body["cod"] = serde_json::json!("200");

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current(&WeatherQuery::city("Delhi"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Api { message: None, .. }));
}

#[tokio::test]
async fn ok_status_with_error_code_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": "401",
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current(&WeatherQuery::city("Delhi"))
        .await
        .unwrap_err();

    assert_eq!(err.api_message(), Some("Invalid API key"));
}

#[tokio::test]
async fn malformed_success_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": 200,
            "name": "Delhi"
        })))
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current(&WeatherQuery::city("Delhi"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn invalid_coordinates_never_hit_the_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(delhi_response()))
        .expect(0)
        .mount(&server)
        .await;

    let err = provider_for(&server)
        .current(&WeatherQuery::coordinates(123.0, 0.0))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::InvalidCoordinates));
}

#[tokio::test]
async fn unreachable_host_is_request_error() {
    // Nothing listens on port 9 (discard) in the test environment.
    let provider = OpenWeatherProvider::with_base_url("KEY".into(), "http://127.0.0.1:9".into());

    let err = provider
        .current(&WeatherQuery::city("Delhi"))
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Request(_)));
}
