pub mod chat_responder;
pub mod clock;
pub mod geo;
pub mod host_chat;
pub mod marker_board;
pub mod models;
pub mod peer_charging;
pub mod profile;
pub mod rentals;
pub mod reservation;
pub mod station_filter;
pub mod station_mapping;
pub mod station_query;
pub mod storefront;
