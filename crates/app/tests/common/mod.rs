//! Shared fixtures for the integration suites.
//!
//! Bodies mirror what the public APIs return, trimmed to the fields the
//! suites look at.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const ISTANBUL_PLACE_COUNT: usize = 71;

pub fn beverly_hills() -> Value {
    json!({
        "post code": "90210",
        "country": "United States",
        "country abbreviation": "US",
        "places": [{
            "place name": "Beverly Hills",
            "longitude": "-118.4065",
            "state": "California",
            "state abbreviation": "CA",
            "latitude": "34.0901"
        }]
    })
}

/// A US zip in the 9021x block; 90211 and up are also in Beverly Hills.
pub fn us_zip(zip: u32) -> Value {
    let mut body = beverly_hills();
    body["post code"] = json!(zip.to_string());
    body
}

/// Istanbul postal code 01000, which covers many villages.
pub fn istanbul_01000() -> Value {
    let places: Vec<Value> = (0..ISTANBUL_PLACE_COUNT)
        .map(|i| {
            let name = if i == 17 {
                "Büyükdikili Köyü".to_string()
            } else {
                format!("Köy {i:02}")
            };
            json!({
                "place name": name,
                "longitude": "37.3833",
                "state": "Adana",
                "state abbreviation": "01",
                "latitude": "37.05"
            })
        })
        .collect();

    json!({
        "post code": "01000",
        "country": "Turkey",
        "country abbreviation": "TR",
        "places": places
    })
}

pub async fn zippo_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/us/90210"))
        .respond_with(ResponseTemplate::new(200).set_body_json(beverly_hills()))
        .mount(&server)
        .await;

    for zip in 90211..=90213 {
        Mock::given(method("GET"))
            .and(path(format!("/us/{zip}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(us_zip(zip)))
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/tr/01000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(istanbul_01000()))
        .mount(&server)
        .await;

    server
}

/// Answers a user listing with the requested `page` echoed back in the
/// pagination block.
pub struct EchoPage;

impl Respond for EchoPage {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let page = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse::<u64>().ok())
            .unwrap_or(1);

        let data: Vec<Value> = (0..10)
            .map(|i| {
                json!({
                    "id": page * 100 + i,
                    "name": format!("User {page}-{i}"),
                    "status": "active"
                })
            })
            .collect();

        ResponseTemplate::new(200).set_body_json(json!({
            "meta": {
                "pagination": {"total": 2000, "pages": 200, "page": page, "limit": 10}
            },
            "data": data
        }))
    }
}

pub fn weather_lyndhurst() -> Value {
    json!({
        "location": {"name": "Lyndhurst", "region": "Hampshire", "country": "United Kingdom"},
        "current": {
            "temp_c": 11.0,
            "temp_f": 51.8,
            "condition": {"text": "Partly cloudy"}
        }
    })
}
