//! Waste port for Wollongong City Council using the waste-info API.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use binday_core::{
    model::{
        Locality, LocalityId, Material, Property, PropertyId, PropertySchedule, RawCollection,
        Street, StreetId, WasteEvent,
    },
    ports::{PortError, WastePort},
};

/// Title shown for events the service sends without one.
const UNTITLED_EVENT: &str = "Upcoming Event";

/// Response from /localities.json
#[derive(Debug, Deserialize)]
struct LocalitiesResponse {
    #[serde(default)]
    localities: Vec<NamedEntry>,
}

/// Response from /streets.json
#[derive(Debug, Deserialize)]
struct StreetsResponse {
    #[serde(default)]
    streets: Vec<NamedEntry>,
}

/// Response from /properties.json
#[derive(Debug, Deserialize)]
struct PropertiesResponse {
    #[serde(default)]
    properties: Vec<NamedEntry>,
}

/// Locality, street, or property entry; all three share this shape.
#[derive(Debug, Deserialize)]
struct NamedEntry {
    id: u64,
    #[serde(default)]
    name: String,
}

/// Response from /properties/{id}.json
#[derive(Debug, Deserialize)]
struct PropertyResponse {
    #[serde(default)]
    collections: Vec<CollectionEntry>,
    #[serde(default)]
    collection_day: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct CollectionEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    next: Option<NextCollection>,
}

#[derive(Debug, Deserialize)]
struct NextCollection {
    #[serde(default)]
    date: Option<String>,
}

/// Response from /materials.json
#[derive(Debug, Deserialize)]
struct MaterialsResponse {
    #[serde(default)]
    materials: Vec<MaterialEntry>,
}

#[derive(Debug, Deserialize)]
struct MaterialEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    bin_type: Option<String>,
    #[serde(default)]
    disposal: Option<String>,
    #[serde(default)]
    tip: Option<String>,
    #[serde(default)]
    keywords: Option<String>,
}

/// /events.json answers with a bare list; a wrapped object is accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EventsResponse {
    List(Vec<EventEntry>),
    Wrapped {
        #[serde(default)]
        events: Vec<EventEntry>,
    },
}

#[derive(Debug, Deserialize)]
struct EventEntry {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
}

/// Waste service client bound to an API root such as
/// `https://wollongong.waste-info.com.au/api/v1`.
pub struct WollongongWastePort {
    client: Client,
    base_url: String,
}

impl WollongongWastePort {
    /// Create a new port bound to the given HTTP client and API root.
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url }
    }

    fn get(&self, resource: &str) -> RequestBuilder {
        self.client.get(format!("{}/{resource}", self.base_url))
    }
}

#[async_trait]
impl WastePort for WollongongWastePort {
    async fn localities(&self) -> Result<Vec<Locality>, PortError> {
        let resp = fetch_json::<LocalitiesResponse>(self.get("localities.json")).await?;
        debug!(count = resp.localities.len(), "fetched localities");

        Ok(resp
            .localities
            .into_iter()
            .map(|entry| Locality {
                id: LocalityId(entry.id),
                name: entry.name,
            })
            .collect())
    }

    async fn streets(&self, locality: LocalityId) -> Result<Vec<Street>, PortError> {
        let req = self
            .get("streets.json")
            .query(&[("locality", locality.0.to_string())]);
        let resp = fetch_json::<StreetsResponse>(req).await?;
        debug!(locality = locality.0, count = resp.streets.len(), "fetched streets");

        Ok(resp
            .streets
            .into_iter()
            .map(|entry| Street {
                id: StreetId(entry.id),
                name: entry.name,
            })
            .collect())
    }

    async fn properties(&self, street: StreetId) -> Result<Vec<Property>, PortError> {
        let req = self
            .get("properties.json")
            .query(&[("street", street.0.to_string())]);
        let resp = fetch_json::<PropertiesResponse>(req).await?;
        debug!(street = street.0, count = resp.properties.len(), "fetched properties");

        Ok(resp
            .properties
            .into_iter()
            .map(|entry| Property {
                id: PropertyId(entry.id),
                name: entry.name,
            })
            .collect())
    }

    async fn property_schedule(&self, property: PropertyId) -> Result<PropertySchedule, PortError> {
        let resp =
            fetch_json::<PropertyResponse>(self.get(&format!("properties/{property}.json"))).await?;
        debug!(
            %property,
            collections = resp.collections.len(),
            collection_day = ?resp.collection_day,
            "fetched property schedule"
        );

        let collections = resp
            .collections
            .into_iter()
            .map(|entry| RawCollection {
                kind: entry.kind,
                next_date: entry.next.and_then(|next| next.date),
            })
            .collect();

        Ok(PropertySchedule {
            collections,
            collection_day: resp.collection_day,
        })
    }

    async fn materials(&self) -> Result<Vec<Material>, PortError> {
        let resp = fetch_json::<MaterialsResponse>(self.get("materials.json")).await?;
        debug!(count = resp.materials.len(), "fetched materials");

        Ok(resp
            .materials
            .into_iter()
            .filter(|entry| !entry.title.trim().is_empty())
            .map(|entry| Material {
                title: entry.title,
                bin_type: entry.bin_type,
                disposal: entry.disposal,
                tip: entry.tip,
                keywords: entry.keywords,
            })
            .collect())
    }

    async fn events(&self) -> Result<Vec<WasteEvent>, PortError> {
        let entries = match fetch_json::<EventsResponse>(self.get("events.json")).await? {
            EventsResponse::List(entries) | EventsResponse::Wrapped { events: entries } => entries,
        };
        debug!(count = entries.len(), "fetched events");

        Ok(entries.into_iter().map(map_event).collect())
    }
}

/// Events keep their title even when the start date is missing or malformed.
fn map_event(entry: EventEntry) -> WasteEvent {
    let start_date = entry
        .start_date
        .as_deref()
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok());
    WasteEvent {
        title: entry
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| UNTITLED_EVENT.to_owned()),
        start_date,
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}
