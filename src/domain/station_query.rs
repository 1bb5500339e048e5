use serde::Deserialize;
use thiserror::Error;

use crate::domain::geo::{Coordinates, ViewportBounds};

pub const GLOBAL_SEARCH_QUERY: &str = "ev charging stations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Nearby,
    Viewport,
    Global,
    Geocode,
}

/// Wire shape of a station search: `{searchType, latitude?, longitude?, radius?, bounds?, address?}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSearchRequest {
    #[serde(default)]
    pub search_type: SearchType,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<u32>,
    pub bounds: Option<ViewportBounds>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StationQuery {
    Nearby {
        location: Coordinates,
        radius_m: u32,
    },
    Viewport {
        bounds: ViewportBounds,
        reference: Coordinates,
        radius_m: u32,
    },
    Global {
        reference: Option<Coordinates>,
    },
    Geocode {
        address: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Latitude and longitude are required for nearby search")]
    MissingCoordinates,
}

impl StationSearchRequest {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }

    /// A viewport search without bounds, or a geocode search without an
    /// address, degrades to a nearby search.
    pub fn resolve(&self, default_radius_m: u32) -> Result<StationQuery, QueryError> {
        let radius_m = self.radius.unwrap_or(default_radius_m);
        let address = self
            .address
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty());

        match (self.search_type, self.bounds, address) {
            (SearchType::Geocode, _, Some(address)) => Ok(StationQuery::Geocode {
                address: address.to_string(),
            }),
            (SearchType::Global, _, _) => Ok(StationQuery::Global {
                reference: self.coordinates(),
            }),
            (SearchType::Viewport, Some(bounds), _) => Ok(StationQuery::Viewport {
                bounds,
                reference: self.coordinates().unwrap_or_else(|| bounds.center()),
                radius_m,
            }),
            _ => {
                let location = self.coordinates().ok_or(QueryError::MissingCoordinates)?;
                Ok(StationQuery::Nearby { location, radius_m })
            }
        }
    }
}
