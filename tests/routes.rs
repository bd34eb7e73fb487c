use std::sync::Arc;

use bytes::Bytes;
use dashagpt::chart::ChartEngine;
use dashagpt::config::Config;
use dashagpt::{Router, app, pages};
use http_body_util::{BodyExt, Full};
use serde_json::{Value, json};

fn router() -> Router {
    app::router(&Config::default(), Arc::new(ChartEngine::default()))
}

fn get(path: &str) -> http::Request<Full<Bytes>> {
    http::Request::get(path).body(Full::new(Bytes::new())).unwrap()
}

fn post(path: &str, body: impl Into<Bytes>) -> http::Request<Full<Bytes>> {
    http::Request::post(path)
        .header("content-type", "application/json")
        .body(Full::new(body.into()))
        .unwrap()
}

async fn send(req: http::Request<Full<Bytes>>) -> (http::StatusCode, http::HeaderMap, Bytes) {
    let res = router().handle(req).await;
    let (parts, body) = res.into_parts();
    let body = body.collect().await.unwrap().to_bytes();
    (parts.status, parts.headers, body)
}

async fn send_json(req: http::Request<Full<Bytes>>) -> (http::StatusCode, Value) {
    let (status, headers, body) = send(req).await;
    assert_eq!(headers["content-type"], "application/json");
    (status, serde_json::from_slice(&body).unwrap())
}

fn birth(overrides: Value) -> String {
    let mut body = json!({
        "date": "1990-05-17",
        "time": "14:30",
        "latitude": 28.6139,
        "longitude": 77.2090,
        "timezone": "Asia/Kolkata",
    });
    if let (Some(body), Some(overrides)) = (body.as_object_mut(), overrides.as_object()) {
        for (key, value) in overrides {
            body.insert(key.clone(), value.clone());
        }
    }
    body.to_string()
}

#[tokio::test]
async fn landing_page() {
    let (status, headers, body) = send(get("/")).await;
    assert_eq!(status, 200);
    assert_eq!(headers["content-type"], "text/html; charset=utf-8");
    assert_eq!(body, pages::LANDING);
}

#[tokio::test]
async fn calculator_page() {
    let (status, _, body) = send(get("/calculator")).await;
    assert_eq!(status, 200);
    assert_eq!(body, pages::CALCULATOR);
}

#[tokio::test]
async fn seo_files() {
    let (status, headers, body) = send(get("/robots.txt")).await;
    assert_eq!(status, 200);
    assert_eq!(headers["content-type"], "text/plain; charset=utf-8");
    assert_eq!(body, pages::ROBOTS_TXT);

    let (status, headers, body) = send(get("/sitemap.xml")).await;
    assert_eq!(status, 200);
    assert_eq!(headers["content-type"], "application/xml");
    assert_eq!(body, pages::SITEMAP_XML);
}

#[tokio::test]
async fn probes() {
    assert_eq!(send(get("/healthz")).await.2, "ok");
    assert_eq!(send(get("/readyz")).await.2, "ready");
}

#[tokio::test]
async fn empty_object_gets_the_placeholder_reply() {
    let (status, _, body) = send(post("/api/calculate", "{}")).await;
    assert_eq!(status, 200);
    assert_eq!(body, r#"{"status":"success","message":"Not yet implemented"}"#);
}

#[tokio::test]
async fn any_json_without_birth_data_gets_the_placeholder_reply() {
    for payload in ["[]", "null", "42", r#"{"name":"Arjuna"}"#] {
        let (status, value) = send_json(post("/api/calculate", payload)).await;
        assert_eq!(status, 200, "{payload}");
        assert_eq!(value, json!({"status": "success", "message": "Not yet implemented"}));
    }
}

#[tokio::test]
async fn birth_data_gets_a_chart() {
    let (status, value) = send_json(post("/api/calculate", birth(json!({})))).await;
    assert_eq!(status, 200);
    assert_eq!(value["status"], "success");

    let chart = &value["chart"];
    assert_eq!(chart["zodiac"], "sidereal");
    assert_eq!(chart["houseSystem"], "whole_sign");
    assert_eq!(chart["bodies"].as_object().unwrap().len(), 9);
    assert_eq!(chart["bodies"]["sun"]["sign"], "taurus");
    assert_eq!(chart["houses"].as_object().unwrap().len(), 12);
    assert!(chart["vargas"]["d9"]["bodies"]["moon"].is_object());
    assert_eq!(chart["dasha"]["periods"].as_array().unwrap().len(), 9);
    assert_eq!(chart["moment"]["utc"], "1990-05-17T09:00:00Z");

    for (name, body) in chart["bodies"].as_object().unwrap() {
        let longitude = body["longitude"].as_f64().unwrap();
        assert!((0.0..360.0).contains(&longitude), "{name}: {longitude}");
    }
}

#[tokio::test]
async fn same_birth_data_same_bytes() {
    let first = send(post("/api/calculate", birth(json!({})))).await.2;
    let second = send(post("/api/calculate", birth(json!({})))).await.2;
    assert_eq!(first, second);
}

#[tokio::test]
async fn settings_shape_the_chart() {
    let body = birth(json!({
        "settings": {"zodiac": "tropical", "houseSystem": "placidus", "outerPlanets": true, "vargas": ["d10"]}
    }));
    let (status, value) = send_json(post("/api/calculate", body)).await;
    assert_eq!(status, 200);
    let chart = &value["chart"];
    assert_eq!(chart["zodiac"], "tropical");
    assert!(chart.get("ayanamsa").is_none());
    assert_eq!(chart["bodies"].as_object().unwrap().len(), 12);
    assert!(chart["vargas"]["d10"].is_object());
    assert!(chart["vargas"].get("d9").is_none());
}

#[tokio::test]
async fn placidus_chart_angles_stay_in_range() {
    let body = birth(json!({
        "settings": {"houseSystem": "placidus", "outerPlanets": true, "vargas": ["d1", "d2", "d3", "d9", "d10", "d12"]}
    }));
    let (status, value) = send_json(post("/api/calculate", body)).await;
    assert_eq!(status, 200);
    let chart = &value["chart"];
    assert_eq!(chart["zodiac"], "sidereal");

    let mut longitudes = vec![
        ("ascendant".to_owned(), &chart["ascendant"]["longitude"]),
        ("midheaven".to_owned(), &chart["midheaven"]["longitude"]),
    ];
    for (number, cusp) in chart["houses"].as_object().unwrap() {
        longitudes.push((format!("house {number}"), &cusp["longitude"]));
    }
    for (name, body) in chart["bodies"].as_object().unwrap() {
        longitudes.push((name.clone(), &body["longitude"]));
    }
    for (varga, varga_chart) in chart["vargas"].as_object().unwrap() {
        longitudes.push((format!("{varga} ascendant"), &varga_chart["ascendant"]["longitude"]));
        for (name, body) in varga_chart["bodies"].as_object().unwrap() {
            longitudes.push((format!("{varga} {name}"), &body["longitude"]));
        }
    }

    assert_eq!(chart["houses"].as_object().unwrap().len(), 12);
    assert_eq!(chart["vargas"].as_object().unwrap().len(), 6);
    for (name, longitude) in longitudes {
        let longitude = longitude.as_f64().unwrap();
        assert!((0.0..360.0).contains(&longitude), "{name}: {longitude}");
    }
}

#[tokio::test]
async fn tropical_charts_keep_the_sidereal_dasha() {
    let (_, sidereal) = send_json(post("/api/calculate", birth(json!({})))).await;
    let (_, tropical) = send_json(post("/api/calculate", birth(json!({"settings": {"zodiac": "tropical"}})))).await;
    assert_eq!(tropical["chart"]["dasha"]["birthLord"], sidereal["chart"]["dasha"]["birthLord"]);
    assert_eq!(
        tropical["chart"]["bodies"]["moon"]["nakshatra"],
        sidereal["chart"]["bodies"]["moon"]["nakshatra"]
    );
}

#[tokio::test]
async fn out_of_range_latitude_is_422() {
    let (status, value) = send_json(post("/api/calculate", birth(json!({"latitude": 91.0})))).await;
    assert_eq!(status, 422);
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"], "invalid_input");
    assert_eq!(value["field"], "latitude");
}

#[tokio::test]
async fn bad_timezone_and_missing_fields_are_422() {
    let (status, value) = send_json(post("/api/calculate", birth(json!({"timezone": "Atlantis/Capital"})))).await;
    assert_eq!(status, 422);
    assert_eq!(value["field"], "timezone");

    let (status, value) = send_json(post("/api/calculate", r#"{"date":"1990-05-17"}"#)).await;
    assert_eq!(status, 422);
    assert_eq!(value["field"], "body");

    let (status, value) = send_json(post("/api/calculate", birth(json!({"settings": {"zodiac": "lunar"}})))).await;
    assert_eq!(status, 422);
    assert_eq!(value["error"], "invalid_input");
}

#[tokio::test]
async fn date_outside_the_ephemeris_is_500_json() {
    let (status, value) = send_json(post("/api/calculate", birth(json!({"date": "1700-01-01"})))).await;
    assert_eq!(status, 500);
    assert_eq!(value["error"], "computation_failed");
}

#[tokio::test]
async fn malformed_json_is_400() {
    let (status, value) = send_json(post("/api/calculate", "{not json")).await;
    assert_eq!(status, 400);
    assert_eq!(value["error"], "malformed_json");
}

#[tokio::test]
async fn unknown_path_renders_the_404_page() {
    let (status, headers, body) = send(get("/nonexistent-path")).await;
    assert_eq!(status, 404);
    assert_eq!(headers["content-type"], "text/html; charset=utf-8");
    assert_eq!(body, pages::NOT_FOUND);
}

#[tokio::test]
async fn body_over_sixteen_mib_is_413() {
    let oversized = vec![b' '; 16 * 1024 * 1024 + 1];
    let (status, _, _) = send(post("/api/calculate", oversized)).await;
    assert_eq!(status, 413);

    let declared = http::Request::post("/api/calculate")
        .header("content-length", (16 * 1024 * 1024 + 1).to_string())
        .body(Full::new(Bytes::from_static(b"{}")))
        .unwrap();
    assert_eq!(send(declared).await.0, 413);
}

#[tokio::test]
async fn get_on_the_api_is_405() {
    let (status, headers, _) = send(get("/api/calculate")).await;
    assert_eq!(status, 405);
    assert_eq!(headers["allow"], "OPTIONS, POST");
}

#[tokio::test]
async fn cors_preflight_and_headers() {
    let preflight = http::Request::options("/api/calculate")
        .header("origin", "https://example.org")
        .header("access-control-request-method", "POST")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let (status, headers, _) = send(preflight).await;
    assert_eq!(status, 204);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "OPTIONS, POST");

    let (_, headers, _) = send(post("/api/calculate", "{}")).await;
    assert_eq!(headers["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn head_serves_headers_only() {
    let req = http::Request::head("/").body(Full::new(Bytes::new())).unwrap();
    let (status, headers, body) = send(req).await;
    assert_eq!(status, 200);
    assert!(body.is_empty());
    assert_eq!(headers["content-length"], pages::LANDING.len().to_string());
}
