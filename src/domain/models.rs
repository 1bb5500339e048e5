use serde::{Deserialize, Serialize};

use crate::domain::clock::{TimestampMs, timestamp_to_iso8601};
use crate::domain::geo::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationType {
    Fast,
    Normal,
    Ultra,
}

impl StationType {
    pub const ALL: [StationType; 3] = [StationType::Fast, StationType::Normal, StationType::Ultra];

    pub fn as_str(&self) -> &'static str {
        match self {
            StationType::Fast => "Fast",
            StationType::Normal => "Normal",
            StationType::Ultra => "Ultra",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingStation {
    pub id: u32,
    pub place_id: Option<String>,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub available: u32,
    pub total: u32,
    #[serde(rename = "type")]
    pub station_type: StationType,
    pub price: String,
    pub is_open: bool,
    pub rating: f64,
    pub reviews: u32,
    pub amenities: Vec<String>,
}

impl ChargingStation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn is_available(&self) -> bool {
        self.is_open && self.available > 0
    }
}

/// A station annotated with its distance from the search reference point.
/// Both distance fields are absent when the search had no reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStation {
    #[serde(flatten)]
    pub station: ChargingStation,
    pub distance: Option<String>,
    pub distance_km: Option<f64>,
}

impl RankedStation {
    pub fn at_distance(station: ChargingStation, distance_km: f64) -> Self {
        Self {
            station,
            distance: Some(format!("{distance_km:.1} km")),
            distance_km: Some(distance_km),
        }
    }

    pub fn unranked(station: ChargingStation) -> Self {
        Self {
            station,
            distance: None,
            distance_km: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
    Host,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: String,
}

/// In-memory message list for a single chat exchange.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>, at: TimestampMs) -> &Message {
        // ids follow the timestamp but stay strictly increasing within one conversation
        let id = match self.messages.last() {
            Some(last) if last.id >= at.0 => last.id + 1,
            _ => at.0,
        };

        self.messages.push(Message {
            id,
            text: text.into(),
            sender,
            timestamp: timestamp_to_iso8601(at),
        });

        let index = self.messages.len() - 1;
        &self.messages[index]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Pending,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "confirmed" => Some(ReservationStatus::Confirmed),
            "pending" => Some(ReservationStatus::Pending),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "paid" => Some(PaymentStatus::Paid),
            "unpaid" => Some(PaymentStatus::Unpaid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservationRecord {
    pub id: String,
    pub user_id: String,
    pub station_id: String,
    pub station_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub reservation_time: String,
    pub duration_minutes: u32,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    pub price: f64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReservationRecord {
    pub user_id: String,
    pub station_id: String,
    pub station_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub reservation_time: String,
    pub duration_minutes: u32,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    pub price: f64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    User(String),
    AdminBroadcast,
}

impl Recipient {
    pub fn kind(&self) -> &'static str {
        match self {
            Recipient::User(_) => "user",
            Recipient::AdminBroadcast => "admin_broadcast",
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Recipient::User(id) => Some(id),
            Recipient::AdminBroadcast => None,
        }
    }

    pub fn from_columns(kind: &str, user_id: Option<String>) -> Option<Self> {
        match (kind, user_id) {
            ("user", Some(id)) => Some(Recipient::User(id)),
            ("admin_broadcast", None) => Some(Recipient::AdminBroadcast),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Reservation,
    Admin,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Reservation => "reservation",
            NotificationKind::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reservation" => Some(NotificationKind::Reservation),
            "admin" => Some(NotificationKind::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotificationRecord {
    pub recipient: Recipient,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationRecord {
    pub id: String,
    pub recipient: Recipient,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_reservation_id: Option<String>,
    pub created_at: String,
}
