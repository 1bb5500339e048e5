use std::sync::{Arc, Mutex, MutexGuard};

use actix_cors::Cors;
use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::header::{self, HeaderName};
use actix_web::{HttpRequest, HttpResponse, Responder, ResponseError, get, post, web};
use serde::{Deserialize, Serialize};

use crate::app::marker_sync::{MarkerSyncService, SyncError};
use crate::app::services::{
    FEED_RETRY_MESSAGE, FeedError, ReservationError, ReservationQueryHandler, SearchOutcome,
    ServiceError, SqliteReservationService, StationFeedService, book_reservation,
};
use crate::domain::chat_responder::{GREETING, respond};
use crate::domain::clock::Clock;
use crate::domain::geo::{Coordinates, ViewportBounds};
use crate::domain::host_chat::{HOST_NOT_FOUND, host_reply, welcome_message};
use crate::domain::marker_board::{RefreshOutcome, RefreshTrigger, Viewport};
use crate::domain::models::{
    AuthenticatedUser, Conversation, NotificationRecord, RankedStation, Recipient,
    ReservationRecord, Sender,
};
use crate::domain::profile::{
    PROFILE_UPDATED_MESSAGE, PROFILE_UPDATED_TITLE, ProfileDetails, ProfileUpdate, dashboard,
};
use crate::domain::peer_charging::{
    PeerCharger, PeerFilter, PeerRequestError, find_host_by_slug, request_charging,
};
use crate::domain::rentals::{
    RentalEquipment, RentalFilter, RentalPeriod, RentalRequestError, request_rental,
};
use crate::domain::reservation::{ReservationDraft, ReservationRejection};
use crate::domain::station_filter::StationListFilter;
use crate::domain::station_query::StationSearchRequest;
use crate::domain::storefront::{
    CART_ADDED_MESSAGE, CART_ADDED_TITLE, FAVORITES_UPDATED_MESSAGE, FAVORITES_UPDATED_TITLE,
    ShopError, Storefront,
};

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct ApiState {
    pub station_feed: StationFeedService,
    pub marker_sync: MarkerSyncService,
    pub reservations: SqliteReservationService,
    pub storefront: Arc<Mutex<Storefront>>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Deserialize)]
pub struct StationListQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub station_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationsResponse<'a> {
    pub stations: Vec<&'a RankedStation>,
    pub count: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LatLngResponse {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct GeocodeResponse {
    pub location: LatLngResponse,
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct ViewportRequest {
    pub bounds: ViewportBounds,
    pub reference: Option<Coordinates>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: String,
    pub user_id: String,
    pub station_id: String,
    pub station_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub reservation_time: String,
    pub duration: u32,
    pub status: String,
    pub payment_status: String,
    pub price: f64,
    pub created_at: String,
}

impl From<ReservationRecord> for ReservationResponse {
    fn from(record: ReservationRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            station_id: record.station_id,
            station_name: record.station_name,
            latitude: record.latitude,
            longitude: record.longitude,
            reservation_time: record.reservation_time,
            duration: record.duration_minutes,
            status: record.status.as_str().to_string(),
            payment_status: record.payment_status.as_str().to_string(),
            price: record.price,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub user_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub related_reservation_id: Option<String>,
    pub created_at: String,
}

impl From<NotificationRecord> for NotificationResponse {
    fn from(record: NotificationRecord) -> Self {
        Self {
            id: record.id,
            user_id: record.recipient.user_id().map(ToString::to_string),
            kind: record.kind.as_str().to_string(),
            title: record.title,
            message: record.message,
            related_reservation_id: record.related_reservation_id,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRequest {
    pub product_id: u32,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PeerChargerQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub charger_type: Option<String>,
    pub tab: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RentalQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalResponse {
    #[serde(flatten)]
    pub equipment: &'static RentalEquipment,
    pub period: &'static str,
    pub rate: u32,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(health)
        .service(search_stations_endpoint)
        .service(get_markers_endpoint)
        .service(set_viewport_endpoint)
        .service(create_reservation_endpoint)
        .service(list_reservations_endpoint)
        .service(get_reservation_endpoint)
        .service(list_user_notifications_endpoint)
        .service(list_admin_notifications_endpoint)
        .service(open_assistant_chat_endpoint)
        .service(assistant_chat_endpoint)
        .service(list_peer_chargers_endpoint)
        .service(request_peer_charging_endpoint)
        .service(open_host_chat_endpoint)
        .service(send_host_message_endpoint)
        .service(list_rentals_endpoint)
        .service(request_rental_endpoint)
        .service(list_products_endpoint)
        .service(toggle_favorite_endpoint)
        .service(get_cart_endpoint)
        .service(add_to_cart_endpoint)
        .service(get_profile_endpoint)
        .service(update_profile_endpoint);
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .max_age(3600)
}

/// The upstream auth layer puts the signed-in user's id in `X-User-Id`.
fn current_user(request: &HttpRequest) -> Option<AuthenticatedUser> {
    request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|id| AuthenticatedUser { id: id.to_string() })
}

fn error_body(message: impl std::fmt::Display) -> serde_json::Value {
    serde_json::json!({ "error": message.to_string() })
}

fn json_error_handler(error: JsonPayloadError, _request: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::build(error.status_code()).json(error_body(&error));
    InternalError::from_response(error, response).into()
}

fn query_error_handler(error: QueryPayloadError, _request: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest().json(error_body(&error));
    InternalError::from_response(error, response).into()
}

fn path_error_handler(error: PathError, _request: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::NotFound().json(error_body(&error));
    InternalError::from_response(error, response).into()
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[post("/stations/search")]
async fn search_stations_endpoint(
    state: web::Data<ApiState>,
    query: web::Query<StationListQuery>,
    body: web::Json<StationSearchRequest>,
) -> impl Responder {
    match state.station_feed.search(&body).await {
        Ok(SearchOutcome::Stations(stations)) => {
            let filter = StationListFilter::new(query.q.as_deref(), query.station_type.as_deref());
            let visible = filter.apply(&stations);
            HttpResponse::Ok().json(StationsResponse {
                count: visible.len(),
                stations: visible,
            })
        }
        Ok(SearchOutcome::Location(geocoded)) => HttpResponse::Ok().json(GeocodeResponse {
            location: LatLngResponse {
                lat: geocoded.location.latitude,
                lng: geocoded.location.longitude,
            },
            address: geocoded.address,
        }),
        Err(error) => feed_error_response(error),
    }
}

#[get("/map/markers")]
async fn get_markers_endpoint(
    state: web::Data<ApiState>,
    query: web::Query<StationListQuery>,
) -> impl Responder {
    let mut snapshot = match state.marker_sync.snapshot() {
        Ok(snapshot) => snapshot,
        Err(error) => return sync_error_response(error),
    };

    let filter = StationListFilter::new(query.q.as_deref(), query.station_type.as_deref());
    snapshot
        .markers
        .retain(|marker| filter.matches(&marker.station.station));

    HttpResponse::Ok().json(snapshot)
}

#[post("/map/viewport")]
async fn set_viewport_endpoint(
    state: web::Data<ApiState>,
    body: web::Json<ViewportRequest>,
) -> impl Responder {
    let viewport = Viewport {
        bounds: body.bounds,
        reference: body.reference.unwrap_or_else(|| body.bounds.center()),
    };

    if let Err(error) = state.marker_sync.set_viewport(viewport) {
        return sync_error_response(error);
    }

    let outcome = match state.marker_sync.refresh(RefreshTrigger::Idle).await {
        Ok(outcome) => outcome,
        Err(error) => return sync_error_response(error),
    };

    let snapshot = match state.marker_sync.snapshot() {
        Ok(snapshot) => snapshot,
        Err(error) => return sync_error_response(error),
    };

    let outcome = match outcome {
        Some(RefreshOutcome::Applied { .. }) => "applied",
        Some(RefreshOutcome::Stale { .. }) => "stale",
        Some(RefreshOutcome::EmptyKept { .. }) => "emptyKept",
        None => "skipped",
    };

    HttpResponse::Ok().json(serde_json::json!({
        "outcome": outcome,
        "snapshot": snapshot,
    }))
}

#[post("/reservations")]
async fn create_reservation_endpoint(
    request: HttpRequest,
    state: web::Data<ApiState>,
    body: web::Json<ReservationDraft>,
) -> impl Responder {
    let user = current_user(&request);

    match book_reservation(
        &state.reservations,
        &body,
        user.as_ref(),
        state.clock.now(),
    ) {
        Ok(booked) => HttpResponse::Created().json(serde_json::json!({
            "reservation": ReservationResponse::from(booked.recorded.reservation),
            "message": booked.message,
        })),
        Err(error) => reservation_error_response(error),
    }
}

#[get("/reservations")]
async fn list_reservations_endpoint(
    request: HttpRequest,
    state: web::Data<ApiState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let Some(user) = current_user(&request) else {
        return HttpResponse::Unauthorized().json(error_body(
            ReservationRejection::AuthenticationRequired,
        ));
    };
    let limit = query.limit.unwrap_or(50).clamp(1, 500);

    match state.reservations.list_reservations(&user.id, limit) {
        Ok(reservations) => {
            let mapped: Vec<ReservationResponse> = reservations
                .into_iter()
                .map(ReservationResponse::from)
                .collect();
            HttpResponse::Ok().json(mapped)
        }
        Err(error) => service_error_response(error),
    }
}

#[get("/reservations/{id}")]
async fn get_reservation_endpoint(
    request: HttpRequest,
    state: web::Data<ApiState>,
    path: web::Path<String>,
) -> impl Responder {
    let Some(user) = current_user(&request) else {
        return HttpResponse::Unauthorized().json(error_body(
            ReservationRejection::AuthenticationRequired,
        ));
    };

    match state.reservations.get_reservation(&path) {
        Ok(Some(reservation)) if reservation.user_id == user.id => {
            HttpResponse::Ok().json(ReservationResponse::from(reservation))
        }
        Ok(_) => HttpResponse::NotFound().json(error_body("reservation not found")),
        Err(error) => service_error_response(error),
    }
}

#[get("/notifications")]
async fn list_user_notifications_endpoint(
    request: HttpRequest,
    state: web::Data<ApiState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let Some(user) = current_user(&request) else {
        return HttpResponse::Unauthorized().json(error_body("Please log in to view notifications"));
    };

    list_notifications(&state, &Recipient::User(user.id), query.limit)
}

#[get("/notifications/admin")]
async fn list_admin_notifications_endpoint(
    state: web::Data<ApiState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    list_notifications(&state, &Recipient::AdminBroadcast, query.limit)
}

fn list_notifications(state: &ApiState, recipient: &Recipient, limit: Option<u32>) -> HttpResponse {
    let limit = limit.unwrap_or(50).clamp(1, 500);

    match state.reservations.list_notifications(recipient, limit) {
        Ok(notifications) => {
            let mapped: Vec<NotificationResponse> = notifications
                .into_iter()
                .map(NotificationResponse::from)
                .collect();
            HttpResponse::Ok().json(mapped)
        }
        Err(error) => service_error_response(error),
    }
}

#[get("/chat/assistant")]
async fn open_assistant_chat_endpoint(state: web::Data<ApiState>) -> impl Responder {
    let mut conversation = Conversation::new();
    conversation.push(Sender::Bot, GREETING, state.clock.now());

    HttpResponse::Ok().json(serde_json::json!({ "messages": conversation.into_messages() }))
}

#[post("/chat/assistant")]
async fn assistant_chat_endpoint(
    state: web::Data<ApiState>,
    body: web::Json<ChatRequest>,
) -> impl Responder {
    let text = body.message.trim();
    if text.is_empty() {
        return HttpResponse::BadRequest().json(error_body("message must not be empty"));
    }

    let now = state.clock.now();
    let mut conversation = Conversation::new();
    conversation.push(Sender::User, text, now);
    conversation.push(Sender::Bot, respond(text), now);

    HttpResponse::Ok().json(serde_json::json!({ "messages": conversation.into_messages() }))
}

#[get("/peer-chargers")]
async fn list_peer_chargers_endpoint(query: web::Query<PeerChargerQuery>) -> impl Responder {
    let filter = PeerFilter::new(
        query.q.as_deref(),
        query.charger_type.as_deref(),
        query.tab.as_deref(),
    );
    let chargers: Vec<&PeerCharger> = filter.apply();

    HttpResponse::Ok().json(serde_json::json!({
        "count": chargers.len(),
        "chargers": chargers,
    }))
}

#[post("/peer-chargers/{id}/requests")]
async fn request_peer_charging_endpoint(path: web::Path<u32>) -> impl Responder {
    match request_charging(path.into_inner()) {
        Ok((charger, message)) => {
            tracing::info!(charger_id = charger.id, "peer charging requested");
            HttpResponse::Ok().json(serde_json::json!({ "message": message }))
        }
        Err(error @ PeerRequestError::NotFound) => HttpResponse::NotFound().json(error_body(error)),
        Err(error @ PeerRequestError::Busy { .. }) => HttpResponse::Conflict().json(error_body(error)),
    }
}

#[get("/chat/hosts/{slug}")]
async fn open_host_chat_endpoint(
    state: web::Data<ApiState>,
    path: web::Path<String>,
) -> impl Responder {
    let Some(host) = find_host_by_slug(&path) else {
        return HttpResponse::NotFound().json(error_body(HOST_NOT_FOUND));
    };

    let mut conversation = Conversation::new();
    conversation.push(Sender::Host, welcome_message(host), state.clock.now());

    HttpResponse::Ok().json(serde_json::json!({
        "host": host,
        "messages": conversation.into_messages(),
    }))
}

#[post("/chat/hosts/{slug}/messages")]
async fn send_host_message_endpoint(
    state: web::Data<ApiState>,
    path: web::Path<String>,
    body: web::Json<ChatRequest>,
) -> impl Responder {
    let Some(host) = find_host_by_slug(&path) else {
        return HttpResponse::NotFound().json(error_body(HOST_NOT_FOUND));
    };

    let text = body.message.trim();
    if text.is_empty() {
        return HttpResponse::BadRequest().json(error_body("message must not be empty"));
    }

    let now = state.clock.now();
    let reply = host_reply(host, &mut rand::rng());
    let mut conversation = Conversation::new();
    conversation.push(Sender::User, text, now);
    conversation.push(Sender::Host, reply, now);

    HttpResponse::Ok().json(serde_json::json!({ "messages": conversation.into_messages() }))
}

#[get("/rentals")]
async fn list_rentals_endpoint(query: web::Query<RentalQuery>) -> impl Responder {
    let filter = RentalFilter::new(query.q.as_deref(), query.category.as_deref());
    let period = RentalPeriod::parse(query.period.as_deref());

    let items: Vec<RentalResponse> = filter
        .apply()
        .into_iter()
        .map(|equipment| RentalResponse {
            equipment,
            period: period.as_str(),
            rate: equipment.rate_for(period),
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "count": items.len(),
        "equipment": items,
    }))
}

#[post("/rentals/{id}/requests")]
async fn request_rental_endpoint(path: web::Path<u32>) -> impl Responder {
    match request_rental(path.into_inner()) {
        Ok((equipment, message)) => {
            tracing::info!(equipment_id = equipment.id, "rental requested");
            HttpResponse::Ok().json(serde_json::json!({ "message": message }))
        }
        Err(error) => rental_error_response(error),
    }
}

fn lock_storefront(state: &ApiState) -> Result<MutexGuard<'_, Storefront>, HttpResponse> {
    state.storefront.lock().map_err(|_| {
        HttpResponse::InternalServerError().json(error_body("storefront lock poisoned"))
    })
}

#[get("/shop/products")]
async fn list_products_endpoint(
    state: web::Data<ApiState>,
    query: web::Query<ProductQuery>,
) -> impl Responder {
    let storefront = match lock_storefront(&state) {
        Ok(storefront) => storefront,
        Err(response) => return response,
    };
    let products = storefront.search(query.q.as_deref(), query.category.as_deref());

    HttpResponse::Ok().json(serde_json::json!({
        "count": products.len(),
        "products": products,
    }))
}

#[post("/shop/products/{id}/favorite")]
async fn toggle_favorite_endpoint(
    state: web::Data<ApiState>,
    path: web::Path<u32>,
) -> impl Responder {
    let mut storefront = match lock_storefront(&state) {
        Ok(storefront) => storefront,
        Err(response) => return response,
    };

    match storefront.toggle_favorite(path.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(serde_json::json!({
            "title": FAVORITES_UPDATED_TITLE,
            "message": FAVORITES_UPDATED_MESSAGE,
            "product": product,
        })),
        Err(error) => shop_error_response(error),
    }
}

#[get("/shop/cart")]
async fn get_cart_endpoint(request: HttpRequest, state: web::Data<ApiState>) -> impl Responder {
    let Some(user) = current_user(&request) else {
        return HttpResponse::Unauthorized().json(error_body("Please log in to use the cart"));
    };
    let storefront = match lock_storefront(&state) {
        Ok(storefront) => storefront,
        Err(response) => return response,
    };
    let items = storefront.cart(&user.id);

    HttpResponse::Ok().json(serde_json::json!({
        "count": items.len(),
        "items": items,
    }))
}

#[post("/shop/cart")]
async fn add_to_cart_endpoint(
    request: HttpRequest,
    state: web::Data<ApiState>,
    body: web::Json<CartRequest>,
) -> impl Responder {
    let Some(user) = current_user(&request) else {
        return HttpResponse::Unauthorized().json(error_body("Please log in to use the cart"));
    };
    let mut storefront = match lock_storefront(&state) {
        Ok(storefront) => storefront,
        Err(response) => return response,
    };

    match storefront.add_to_cart(&user.id, body.product_id) {
        Ok(count) => HttpResponse::Ok().json(serde_json::json!({
            "title": CART_ADDED_TITLE,
            "message": CART_ADDED_MESSAGE,
            "count": count,
        })),
        Err(error) => shop_error_response(error),
    }
}

/// Mock dashboard plus the caller's most recent reservations.
#[get("/profile")]
async fn get_profile_endpoint(request: HttpRequest, state: web::Data<ApiState>) -> impl Responder {
    let Some(user) = current_user(&request) else {
        return HttpResponse::Unauthorized().json(error_body("Please log in to view your profile"));
    };

    let recent = match state.reservations.list_reservations(&user.id, 5) {
        Ok(reservations) => reservations,
        Err(error) => return service_error_response(error),
    };
    let recent: Vec<ReservationResponse> =
        recent.into_iter().map(ReservationResponse::from).collect();

    HttpResponse::Ok().json(serde_json::json!({
        "profile": dashboard(ProfileDetails::default()),
        "recentReservations": recent,
    }))
}

/// Echoes the merged details; profile edits are not stored.
#[post("/profile")]
async fn update_profile_endpoint(
    request: HttpRequest,
    body: web::Json<ProfileUpdate>,
) -> impl Responder {
    let Some(user) = current_user(&request) else {
        return HttpResponse::Unauthorized().json(error_body("Please log in to view your profile"));
    };

    let details = body.into_inner().apply(ProfileDetails::default());
    tracing::info!(user_id = %user.id, "profile update confirmed");

    HttpResponse::Ok().json(serde_json::json!({
        "title": PROFILE_UPDATED_TITLE,
        "message": PROFILE_UPDATED_MESSAGE,
        "details": details,
    }))
}

fn feed_error_response(error: FeedError) -> HttpResponse {
    match error {
        FeedError::Query(error) => HttpResponse::BadRequest().json(error_body(error)),
        FeedError::LocationNotFound => HttpResponse::NotFound().json(error_body(error)),
        FeedError::Provider(error) => {
            tracing::warn!(error = %error, "station search failed");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": FEED_RETRY_MESSAGE,
                "stations": [],
                "count": 0,
            }))
        }
    }
}

fn rental_error_response(error: RentalRequestError) -> HttpResponse {
    match error {
        RentalRequestError::NotFound => HttpResponse::NotFound().json(error_body(error)),
        RentalRequestError::Unavailable { .. } => HttpResponse::Conflict().json(error_body(error)),
    }
}

fn shop_error_response(error: ShopError) -> HttpResponse {
    match error {
        ShopError::NotFound => HttpResponse::NotFound().json(error_body(error)),
        ShopError::OutOfStock { .. } => HttpResponse::Conflict().json(error_body(error)),
    }
}

fn sync_error_response(error: SyncError) -> HttpResponse {
    match error {
        SyncError::BoardLockPoisoned => {
            HttpResponse::InternalServerError().json(error_body(error))
        }
        SyncError::Feed(_) => HttpResponse::BadGateway().json(error_body(FEED_RETRY_MESSAGE)),
    }
}

fn reservation_error_response(error: ReservationError) -> HttpResponse {
    match error {
        ReservationError::Rejected(ReservationRejection::AuthenticationRequired) => {
            HttpResponse::Unauthorized().json(error_body(error))
        }
        ReservationError::Rejected(_) => HttpResponse::BadRequest().json(error_body(error)),
        ReservationError::Storage(_) => HttpResponse::InternalServerError().json(error_body(error)),
    }
}

fn service_error_response(error: ServiceError) -> HttpResponse {
    match error {
        ServiceError::DbLockPoisoned => {
            HttpResponse::InternalServerError().json(error_body("database lock poisoned"))
        }
        ServiceError::Database(error) => HttpResponse::InternalServerError()
            .json(error_body(format!("database query failed: {error}"))),
    }
}
