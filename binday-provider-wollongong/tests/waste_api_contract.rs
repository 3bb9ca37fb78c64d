//! Contract tests for the waste-info API client against a mock server.

use binday_core::model::{LocalityId, PropertyId, RawCollection, StreetId};
use binday_core::ports::{PortError, WastePort};
use binday_provider_wollongong::WollongongWastePort;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn port(server: &MockServer) -> WollongongWastePort {
    WollongongWastePort::new(reqwest::Client::new(), format!("{}/api/v1/", server.uri()))
}

#[tokio::test]
async fn lists_localities() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/localities.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "localities": [
                {"id": 7, "name": "Wollongong"},
                {"id": 3, "name": "Corrimal"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let localities = port(&server).localities().await.expect("localities");

    assert_eq!(localities.len(), 2);
    assert_eq!(localities.first().map(|locality| locality.id), Some(LocalityId(7)));
}

#[tokio::test]
async fn streets_are_queried_by_locality() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/streets.json"))
        .and(query_param("locality", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "streets": [{"id": 55, "name": "Crown Street"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let streets = port(&server).streets(LocalityId(7)).await.expect("streets");

    assert_eq!(streets.len(), 1);
    assert_eq!(streets.first().map(|street| street.id), Some(StreetId(55)));
}

#[tokio::test]
async fn properties_are_queried_by_street() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/properties.json"))
        .and(query_param("street", "55"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": [{"id": 9001, "name": "12 Crown Street"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let properties = port(&server)
        .properties(StreetId(55))
        .await
        .expect("properties");

    assert_eq!(properties.first().map(|property| property.id), Some(PropertyId(9001)));
}

#[tokio::test]
async fn property_schedule_keeps_raw_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/properties/9001.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collection_day": 3,
            "collections": [
                {"type": "Organics", "next": {"date": "2026-03-04T00:00:00+11:00"}},
                {"type": "Landfill Waste", "next": {}},
                {"type": "Recycling"}
            ]
        })))
        .mount(&server)
        .await;

    let schedule = port(&server)
        .property_schedule(PropertyId(9001))
        .await
        .expect("schedule");

    assert_eq!(schedule.collection_day, Some(3));
    assert_eq!(
        schedule.collections,
        vec![
            RawCollection::new("Organics", Some("2026-03-04T00:00:00+11:00")),
            RawCollection::new("Landfill Waste", None::<String>),
            RawCollection::new("Recycling", None::<String>),
        ]
    );
}

#[tokio::test]
async fn property_schedule_tolerates_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/properties/1.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let schedule = port(&server)
        .property_schedule(PropertyId(1))
        .await
        .expect("schedule");

    assert!(schedule.collections.is_empty());
    assert_eq!(schedule.collection_day, None);
}

#[tokio::test]
async fn error_status_is_a_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/properties/1.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = port(&server).property_schedule(PropertyId(1)).await;

    assert!(matches!(result, Err(PortError::Network(_))));
}

#[tokio::test]
async fn materials_skip_untitled_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/materials.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "materials": [
                {"title": "Pizza boxes", "bin_type": "recycle", "keywords": "cardboard"},
                {"title": "", "bin_type": "waste"}
            ]
        })))
        .mount(&server)
        .await;

    let materials = port(&server).materials().await.expect("materials");

    assert_eq!(materials.len(), 1);
    let pizza = materials.first().expect("pizza boxes");
    assert_eq!(pizza.bin_type.as_deref(), Some("recycle"));
    assert_eq!(pizza.keywords.as_deref(), Some("cardboard"));
}

#[tokio::test]
async fn events_accept_bare_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/events.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"title": "E-waste drop-off", "start_date": "2026-03-14"},
            {"start_date": "not a date"}
        ])))
        .mount(&server)
        .await;

    let events = port(&server).events().await.expect("events");

    assert_eq!(events.len(), 2);
    assert_eq!(
        events.first().and_then(|event| event.start_date),
        NaiveDate::from_ymd_opt(2026, 3, 14)
    );
    let untitled = events.get(1).expect("second event");
    assert_eq!(untitled.title, "Upcoming Event");
    assert_eq!(untitled.start_date, None);
}

#[tokio::test]
async fn events_accept_wrapped_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/events.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "events": [{"title": "Clean-up", "start_date": "2026-04-01"}]
        })))
        .mount(&server)
        .await;

    let events = port(&server).events().await.expect("events");

    assert_eq!(events.len(), 1);
}
