use crate::domain::geo::{Coordinates, haversine_km};
use crate::domain::models::{ChargingStation, RankedStation, StationType};

pub const SEARCH_RADIUS_KM: f64 = 50.0;

/// Keeps stations within [`SEARCH_RADIUS_KM`] of `reference`, nearest first.
pub fn rank_by_distance(reference: Coordinates, stations: Vec<ChargingStation>) -> Vec<RankedStation> {
    let mut ranked: Vec<RankedStation> = stations
        .into_iter()
        .map(|station| {
            let distance_km = haversine_km(reference, station.coordinates());
            RankedStation::at_distance(station, distance_km)
        })
        .filter(|ranked| {
            ranked
                .distance_km
                .is_some_and(|distance| distance <= SEARCH_RADIUS_KM)
        })
        .collect();

    ranked.sort_by(|a, b| {
        let left = a.distance_km.unwrap_or(f64::INFINITY);
        let right = b.distance_km.unwrap_or(f64::INFINITY);
        left.total_cmp(&right)
    });

    ranked
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationListFilter {
    pub query: String,
    pub station_type: Option<StationType>,
}

impl StationListFilter {
    /// `type_filter` of `None`, `"all"` or an unknown value matches every type.
    pub fn new(query: Option<&str>, type_filter: Option<&str>) -> Self {
        Self {
            query: query.unwrap_or_default().trim().to_lowercase(),
            station_type: type_filter.and_then(StationType::parse),
        }
    }

    pub fn matches(&self, station: &ChargingStation) -> bool {
        let matches_search = self.query.is_empty()
            || station.name.to_lowercase().contains(&self.query)
            || station.address.to_lowercase().contains(&self.query);
        let matches_type = self
            .station_type
            .is_none_or(|kind| station.station_type == kind);

        matches_search && matches_type
    }

    pub fn apply<'a>(&self, stations: &'a [RankedStation]) -> Vec<&'a RankedStation> {
        stations
            .iter()
            .filter(|ranked| self.matches(&ranked.station))
            .collect()
    }
}
