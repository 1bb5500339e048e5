use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::geo::{Coordinates, GeocodedAddress};
use crate::domain::station_mapping::PlaceSummary;

const CHARGING_STATION_TYPE: &str = "charging_station";

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("Google Places API error: {status}")]
    Status { status: String },
    #[error("places request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("failed to build places client: {0}")]
    Client(String),
}

/// Read-only access to a places search backend.
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn nearby_search(
        &self,
        location: Coordinates,
        radius_m: u32,
    ) -> Result<Vec<PlaceSummary>, PlacesError>;

    async fn text_search(&self, query: &str) -> Result<Vec<PlaceSummary>, PlacesError>;

    /// `Ok(None)` when the address resolves to nothing.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, PlacesError>;
}

#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| PlacesError::Client(error.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn fetch<T>(&self, path: &str, query: &[(&str, String)]) -> Result<T, PlacesError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!("{}/{path}", self.base_url);

        let body = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;

        Ok(body)
    }

    async fn search_places(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<PlaceSummary>, PlacesError> {
        let response: PlacesResponse = self.fetch(path, query).await?;

        match response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            _ => {
                tracing::warn!(
                    status = %response.status,
                    error_message = response.error_message.as_deref().unwrap_or(""),
                    "places search rejected"
                );
                return Err(PlacesError::Status {
                    status: response.status,
                });
            }
        }

        Ok(response
            .results
            .into_iter()
            .map(GooglePlace::into_summary)
            .collect())
    }
}

#[async_trait]
impl PlacesProvider for GooglePlacesClient {
    async fn nearby_search(
        &self,
        location: Coordinates,
        radius_m: u32,
    ) -> Result<Vec<PlaceSummary>, PlacesError> {
        self.search_places(
            "place/nearbysearch/json",
            &[
                (
                    "location",
                    format!("{},{}", location.latitude, location.longitude),
                ),
                ("radius", radius_m.to_string()),
                ("type", CHARGING_STATION_TYPE.to_string()),
            ],
        )
        .await
    }

    async fn text_search(&self, query: &str) -> Result<Vec<PlaceSummary>, PlacesError> {
        self.search_places("place/textsearch/json", &[("query", query.to_string())])
            .await
    }

    async fn geocode(&self, address: &str) -> Result<Option<GeocodedAddress>, PlacesError> {
        let response: GeocodeResponse = self
            .fetch("geocode/json", &[("address", address.to_string())])
            .await?;

        match response.status.as_str() {
            "OK" => Ok(response
                .results
                .into_iter()
                .next()
                .map(|result| GeocodedAddress {
                    location: result.geometry.location.into(),
                    address: result.formatted_address.unwrap_or_default(),
                })),
            "ZERO_RESULTS" => Ok(None),
            _ => Err(PlacesError::Status {
                status: response.status,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GooglePlace>,
}

#[derive(Debug, Deserialize)]
struct GooglePlace {
    place_id: String,
    name: String,
    vicinity: Option<String>,
    formatted_address: Option<String>,
    geometry: Geometry,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    opening_hours: Option<OpeningHours>,
}

impl GooglePlace {
    fn into_summary(self) -> PlaceSummary {
        PlaceSummary {
            place_id: self.place_id,
            name: self.name,
            vicinity: self.vicinity,
            formatted_address: self.formatted_address,
            location: self.geometry.location.into(),
            rating: self.rating,
            user_ratings_total: self.user_ratings_total,
            open_now: self.opening_hours.and_then(|hours| hours.open_now),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl From<LatLng> for Coordinates {
    fn from(value: LatLng) -> Self {
        Coordinates::new(value.lat, value.lng)
    }
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    open_now: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    geometry: Geometry,
}
