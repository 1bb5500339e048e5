use rand::Rng;

use crate::domain::geo::Coordinates;
use crate::domain::models::{ChargingStation, StationType};

pub const CONNECTORS_PER_STATION: u32 = 4;
pub const UNKNOWN_ADDRESS: &str = "Address not available";

const AMENITIES: [&str; 3] = ["WiFi", "Restrooms", "24/7"];

/// Provider-neutral view of a single places search result.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    pub vicinity: Option<String>,
    pub formatted_address: Option<String>,
    pub location: Coordinates,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub open_now: Option<bool>,
}

/// The places API carries no connector data, so availability, type, price and
/// amenities are simulated per result.
pub fn station_from_place<R: Rng + ?Sized>(
    index: usize,
    place: PlaceSummary,
    rng: &mut R,
) -> ChargingStation {
    let is_open = place.open_now.unwrap_or(false);
    let available = if is_open { rng.random_range(1..=3) } else { 0 };
    let station_type = StationType::ALL[rng.random_range(0..StationType::ALL.len())];
    let price_per_kwh: f64 = rng.random_range(0.15..0.65);
    let amenities = AMENITIES
        .iter()
        .filter(|_| rng.random_bool(0.5))
        .map(|amenity| (*amenity).to_string())
        .collect();

    let address = place
        .vicinity
        .filter(|value| !value.is_empty())
        .or(place.formatted_address.filter(|value| !value.is_empty()))
        .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string());

    ChargingStation {
        id: u32::try_from(index + 1).unwrap_or(u32::MAX),
        place_id: Some(place.place_id),
        name: place.name,
        address,
        latitude: place.location.latitude,
        longitude: place.location.longitude,
        available,
        total: CONNECTORS_PER_STATION,
        station_type,
        price: format!("${price_per_kwh:.2}/kWh"),
        is_open,
        rating: place.rating.unwrap_or(0.0),
        reviews: place.user_ratings_total.unwrap_or(0),
        amenities,
    }
}

pub fn stations_from_places<R: Rng + ?Sized>(
    places: Vec<PlaceSummary>,
    rng: &mut R,
) -> Vec<ChargingStation> {
    places
        .into_iter()
        .enumerate()
        .map(|(index, place)| station_from_place(index, place, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{CONNECTORS_PER_STATION, PlaceSummary, UNKNOWN_ADDRESS, stations_from_places};
    use crate::domain::geo::Coordinates;

    fn place(id: &str, open_now: Option<bool>) -> PlaceSummary {
        PlaceSummary {
            place_id: id.to_string(),
            name: format!("Station {id}"),
            vicinity: None,
            formatted_address: None,
            location: Coordinates::new(52.5, 13.4),
            rating: None,
            user_ratings_total: None,
            open_now,
        }
    }

    #[test]
    fn numbers_stations_from_one_and_keeps_place_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        let stations = stations_from_places(vec![place("a", None), place("b", None)], &mut rng);

        assert_eq!(stations[0].id, 1);
        assert_eq!(stations[1].id, 2);
        assert_eq!(stations[1].place_id.as_deref(), Some("b"));
        assert_eq!(stations[1].name, "Station b");
    }

    #[test]
    fn closed_or_unknown_hours_mean_nothing_available() {
        let mut rng = StdRng::seed_from_u64(11);
        let stations = stations_from_places(
            vec![place("closed", Some(false)), place("unknown", None)],
            &mut rng,
        );

        for station in stations {
            assert!(!station.is_open);
            assert_eq!(station.available, 0);
            assert!(!station.is_available());
        }
    }

    #[test]
    fn simulated_fields_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let places = (0..200).map(|i| place(&i.to_string(), Some(true))).collect();

        for station in stations_from_places(places, &mut rng) {
            assert!((1..=3).contains(&station.available));
            assert_eq!(station.total, CONNECTORS_PER_STATION);

            let price: f64 = station
                .price
                .trim_start_matches('$')
                .trim_end_matches("/kWh")
                .parse()
                .expect("price should be numeric");
            assert!((0.15..=0.65).contains(&price), "price out of range: {price}");
            assert!(station.amenities.len() <= 3);
        }
    }

    #[test]
    fn address_prefers_vicinity_then_formatted_address() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut with_vicinity = place("v", None);
        with_vicinity.vicinity = Some("12 Dock Road".to_string());
        with_vicinity.formatted_address = Some("12 Dock Road, Hamburg".to_string());
        let mut with_formatted = place("f", None);
        with_formatted.formatted_address = Some("1 Ring, Vienna".to_string());

        let stations = stations_from_places(
            vec![with_vicinity, with_formatted, place("none", None)],
            &mut rng,
        );

        assert_eq!(stations[0].address, "12 Dock Road");
        assert_eq!(stations[1].address, "1 Ring, Vienna");
        assert_eq!(stations[2].address, UNKNOWN_ADDRESS);
        assert_eq!(stations[2].rating, 0.0);
        assert_eq!(stations[2].reviews, 0);
    }
}
