use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use thiserror::Error;

use crate::adapters::db;
use crate::adapters::db::{DbError, RecordedReservation};
use crate::adapters::places::{PlacesError, PlacesProvider};
use crate::domain::clock::TimestampMs;
use crate::domain::geo::GeocodedAddress;
use crate::domain::marker_board::Viewport;
use crate::domain::models::{
    AuthenticatedUser, NotificationRecord, RankedStation, Recipient, ReservationRecord,
};
use crate::domain::reservation::{
    ReservationDraft, ReservationPlan, ReservationRejection, plan_reservation, success_message,
};
use crate::domain::station_filter::rank_by_distance;
use crate::domain::station_mapping::stations_from_places;
use crate::domain::station_query::{
    GLOBAL_SEARCH_QUERY, QueryError, StationQuery, StationSearchRequest,
};

pub const FEED_RETRY_MESSAGE: &str = "Unable to load stations. Retrying…";
pub const DEFAULT_MAP_RADIUS_M: u32 = 6000;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database lock poisoned")]
    DbLockPoisoned,
    #[error("database operation failed: {0}")]
    Database(#[from] DbError),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("Location not found")]
    LocationNotFound,
    #[error(transparent)]
    Provider(#[from] PlacesError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Stations(Vec<RankedStation>),
    Location(GeocodedAddress),
}

#[derive(Clone)]
pub struct StationFeedService {
    provider: Arc<dyn PlacesProvider>,
    default_radius_m: u32,
    map_radius_m: u32,
}

impl StationFeedService {
    /// `default_radius_m` applies to searches that name no radius; map
    /// refreshes use `map_radius_m`.
    pub fn new(provider: Arc<dyn PlacesProvider>, default_radius_m: u32) -> Self {
        Self {
            provider,
            default_radius_m,
            map_radius_m: DEFAULT_MAP_RADIUS_M,
        }
    }

    pub fn with_map_radius(mut self, map_radius_m: u32) -> Self {
        self.map_radius_m = map_radius_m;
        self
    }

    pub async fn search(&self, request: &StationSearchRequest) -> Result<SearchOutcome, FeedError> {
        match request.resolve(self.default_radius_m)? {
            StationQuery::Geocode { address } => {
                tracing::debug!(address = %address, "geocoding address");
                self.provider
                    .geocode(&address)
                    .await?
                    .map(SearchOutcome::Location)
                    .ok_or(FeedError::LocationNotFound)
            }
            query => self.fetch_stations(&query).await.map(SearchOutcome::Stations),
        }
    }

    pub async fn fetch_stations(&self, query: &StationQuery) -> Result<Vec<RankedStation>, FeedError> {
        let (places, reference) = match query {
            StationQuery::Nearby { location, radius_m } => (
                self.provider.nearby_search(*location, *radius_m).await?,
                Some(*location),
            ),
            StationQuery::Viewport {
                bounds,
                reference,
                radius_m,
            } => (
                self.provider
                    .nearby_search(bounds.center(), *radius_m)
                    .await?,
                Some(*reference),
            ),
            StationQuery::Global { reference } => (
                self.provider.text_search(GLOBAL_SEARCH_QUERY).await?,
                *reference,
            ),
            StationQuery::Geocode { .. } => return Ok(Vec::new()),
        };

        let place_count = places.len();
        let stations = stations_from_places(places, &mut rand::rng());

        let ranked = match reference {
            Some(reference) => rank_by_distance(reference, stations),
            None => stations.into_iter().map(RankedStation::unranked).collect(),
        };

        tracing::debug!(
            place_count,
            station_count = ranked.len(),
            "stations fetched"
        );

        Ok(ranked)
    }

    pub async fn fetch_viewport(&self, viewport: &Viewport) -> Result<Vec<RankedStation>, FeedError> {
        self.fetch_stations(&StationQuery::Viewport {
            bounds: viewport.bounds,
            reference: viewport.reference,
            radius_m: self.map_radius_m,
        })
        .await
    }
}

pub trait ReservationQueryHandler {
    fn get_reservation(&self, id: &str) -> Result<Option<ReservationRecord>, ServiceError>;
    fn list_reservations(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ReservationRecord>, ServiceError>;
    fn list_notifications(
        &self,
        recipient: &Recipient,
        limit: u32,
    ) -> Result<Vec<NotificationRecord>, ServiceError>;
}

pub trait ReservationCommandHandler {
    fn record_reservation(&self, plan: &ReservationPlan)
    -> Result<RecordedReservation, ServiceError>;
}

#[derive(Clone)]
pub struct SqliteReservationService {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteReservationService {
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn with_connection<T>(
        &self,
        op: impl FnOnce(&mut Connection) -> Result<T, DbError>,
    ) -> Result<T, ServiceError> {
        let mut connection = self
            .connection
            .lock()
            .map_err(|_| ServiceError::DbLockPoisoned)?;
        op(&mut connection).map_err(ServiceError::from)
    }
}

impl ReservationQueryHandler for SqliteReservationService {
    fn get_reservation(&self, id: &str) -> Result<Option<ReservationRecord>, ServiceError> {
        self.with_connection(|connection| db::get_reservation(connection, id))
    }

    fn list_reservations(
        &self,
        user_id: &str,
        limit: u32,
    ) -> Result<Vec<ReservationRecord>, ServiceError> {
        self.with_connection(|connection| db::list_reservations(connection, user_id, limit))
    }

    fn list_notifications(
        &self,
        recipient: &Recipient,
        limit: u32,
    ) -> Result<Vec<NotificationRecord>, ServiceError> {
        self.with_connection(|connection| db::list_notifications(connection, recipient, limit))
    }
}

impl ReservationCommandHandler for SqliteReservationService {
    fn record_reservation(
        &self,
        plan: &ReservationPlan,
    ) -> Result<RecordedReservation, ServiceError> {
        self.with_connection(|connection| db::record_reservation(connection, plan))
    }
}

#[derive(Debug, Error)]
pub enum ReservationError {
    #[error(transparent)]
    Rejected(#[from] ReservationRejection),
    #[error("Unable to create reservation. Please try again.")]
    Storage(#[source] ServiceError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookedReservation {
    pub recorded: RecordedReservation,
    pub message: String,
}

/// Validates the draft, then records the reservation and its notifications.
/// Rejected drafts never reach the handler.
pub fn book_reservation<H>(
    handler: &H,
    draft: &ReservationDraft,
    user: Option<&AuthenticatedUser>,
    now: TimestampMs,
) -> Result<BookedReservation, ReservationError>
where
    H: ReservationCommandHandler + ?Sized,
{
    let plan = plan_reservation(draft, user, now)?;

    let recorded = handler.record_reservation(&plan).map_err(|error| {
        tracing::error!(
            error = %error,
            station_id = %plan.reservation.station_id,
            "reservation write failed"
        );
        ReservationError::Storage(error)
    })?;

    tracing::info!(
        reservation_id = %recorded.reservation.id,
        user_id = %recorded.reservation.user_id,
        station_id = %recorded.reservation.station_id,
        status = recorded.reservation.status.as_str(),
        price = recorded.reservation.price,
        "reservation recorded"
    );

    Ok(BookedReservation {
        recorded,
        message: success_message(draft),
    })
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::adapters::places::{PlacesError, PlacesProvider};
    use crate::domain::geo::{Coordinates, GeocodedAddress};
    use crate::domain::station_mapping::PlaceSummary;

    pub fn place(id: &str, latitude: f64, longitude: f64, open: bool) -> PlaceSummary {
        PlaceSummary {
            place_id: id.to_string(),
            name: format!("Station {id}"),
            vicinity: Some(format!("{id} Street")),
            formatted_address: None,
            location: Coordinates::new(latitude, longitude),
            rating: Some(4.0),
            user_ratings_total: Some(10),
            open_now: Some(open),
        }
    }

    /// Replays queued nearby responses in call order; each response may carry
    /// a delay so concurrent calls can finish out of order.
    #[derive(Default)]
    pub struct FakePlaces {
        pub nearby: Mutex<Vec<(Duration, Result<Vec<PlaceSummary>, String>)>>,
        pub text: Vec<PlaceSummary>,
        pub geocoded: Option<GeocodedAddress>,
        pub calls: AtomicUsize,
        pub nearby_centers: Mutex<Vec<Coordinates>>,
        pub nearby_radii: Mutex<Vec<u32>>,
    }

    impl FakePlaces {
        pub fn with_nearby(responses: Vec<Result<Vec<PlaceSummary>, String>>) -> Self {
            Self::with_delayed(
                responses
                    .into_iter()
                    .map(|response| (Duration::ZERO, response))
                    .collect(),
            )
        }

        pub fn with_delayed(responses: Vec<(Duration, Result<Vec<PlaceSummary>, String>)>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self {
                nearby: Mutex::new(responses),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl PlacesProvider for FakePlaces {
        async fn nearby_search(
            &self,
            location: Coordinates,
            radius_m: u32,
        ) -> Result<Vec<PlaceSummary>, PlacesError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.nearby_centers
                .lock()
                .expect("centers lock")
                .push(location);
            self.nearby_radii.lock().expect("radii lock").push(radius_m);
            let next = self.nearby.lock().expect("nearby lock").pop();
            let (delay, response) = next.unwrap_or((Duration::ZERO, Ok(Vec::new())));

            if !delay.is_zero() {
                actix_web::rt::time::sleep(delay).await;
            }

            response.map_err(|status| PlacesError::Status { status })
        }

        async fn text_search(&self, _query: &str) -> Result<Vec<PlaceSummary>, PlacesError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.clone())
        }

        async fn geocode(&self, _address: &str) -> Result<Option<GeocodedAddress>, PlacesError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.geocoded.clone())
        }
    }
}
