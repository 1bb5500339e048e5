use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Timelike};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::domain::clock::{TimestampMs, timestamp_to_iso8601};
use crate::domain::models::{
    AuthenticatedUser, NewNotificationRecord, NewReservationRecord, NotificationKind,
    PaymentStatus, Recipient, ReservationStatus,
};

pub const PRICE_PER_HOUR: f64 = 0.35;
pub const DEFAULT_TIME: &str = "12:00";
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

/// Reservation price for a duration, rounded to cents.
pub fn reservation_price(duration_minutes: u32) -> f64 {
    let raw = f64::from(duration_minutes) / 60.0 * PRICE_PER_HOUR;
    (raw * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Now,
    Later,
}

impl PaymentMethod {
    pub fn status(&self) -> ReservationStatus {
        match self {
            PaymentMethod::Now => ReservationStatus::Confirmed,
            PaymentMethod::Later => ReservationStatus::Pending,
        }
    }

    pub fn payment_status(&self) -> PaymentStatus {
        match self {
            PaymentMethod::Now => PaymentStatus::Paid,
            PaymentMethod::Later => PaymentStatus::Unpaid,
        }
    }

    fn outcome_phrase(&self) -> &'static str {
        match self {
            PaymentMethod::Now => "confirmed",
            PaymentMethod::Later => "pending payment",
        }
    }
}

/// Station data captured at booking time and copied onto the reservation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSnapshot {
    pub id: u32,
    pub place_id: Option<String>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl StationSnapshot {
    pub fn reference(&self) -> String {
        self.place_id
            .clone()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDraft {
    pub station: StationSnapshot,
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub date: Option<NaiveDate>,
    #[serde(default = "default_time")]
    pub time: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// An untouched date picker submits `""`, which counts as no date.
fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn default_time() -> String {
    DEFAULT_TIME.to_string()
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReservationRejection {
    #[error("Please select a date and time")]
    MissingDate,
    #[error("Please log in to make a reservation")]
    AuthenticationRequired,
    #[error("Please enter a valid time (HH:MM)")]
    InvalidTime,
    #[error("Duration must be greater than zero")]
    InvalidDuration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReservationPlan {
    pub reservation: NewReservationRecord,
    pub user_notification: NewNotificationRecord,
    pub admin_notification: NewNotificationRecord,
}

/// Validates a draft and builds every row a booking writes.
///
/// The date is checked before the user, so an anonymous request without a
/// date reports the missing date.
pub fn plan_reservation(
    draft: &ReservationDraft,
    user: Option<&AuthenticatedUser>,
    created_at: TimestampMs,
) -> Result<ReservationPlan, ReservationRejection> {
    let date = draft.date.ok_or(ReservationRejection::MissingDate)?;
    let user = user.ok_or(ReservationRejection::AuthenticationRequired)?;
    let time = NaiveTime::parse_from_str(draft.time.trim(), "%H:%M")
        .map_err(|_| ReservationRejection::InvalidTime)?;
    if draft.duration_minutes == 0 {
        return Err(ReservationRejection::InvalidDuration);
    }

    let starts_at = date.and_time(time);
    let created_at = timestamp_to_iso8601(created_at);
    let station_name = draft.station.name.clone();
    let method = draft.payment_method;

    let reservation = NewReservationRecord {
        user_id: user.id.clone(),
        station_id: draft.station.reference(),
        station_name: station_name.clone(),
        latitude: draft.station.latitude,
        longitude: draft.station.longitude,
        reservation_time: starts_at
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        duration_minutes: draft.duration_minutes,
        status: method.status(),
        payment_status: method.payment_status(),
        price: reservation_price(draft.duration_minutes),
        created_at: created_at.clone(),
    };

    let user_notification = NewNotificationRecord {
        recipient: Recipient::User(user.id.clone()),
        kind: NotificationKind::Reservation,
        title: "Reservation Confirmed".to_string(),
        message: format!(
            "Your reservation at {station_name} is {}",
            method.outcome_phrase()
        ),
        created_at: created_at.clone(),
    };

    let admin_notification = NewNotificationRecord {
        recipient: Recipient::AdminBroadcast,
        kind: NotificationKind::Admin,
        title: "New Reservation".to_string(),
        message: format!(
            "New reservation at {station_name} for {}",
            format_long_datetime(starts_at)
        ),
        created_at,
    };

    Ok(ReservationPlan {
        reservation,
        user_notification,
        admin_notification,
    })
}

pub fn success_message(draft: &ReservationDraft) -> String {
    format!(
        "Your spot at {} is {}",
        draft.station.name,
        draft.payment_method.outcome_phrase()
    )
}

/// Formats as e.g. `October 18th, 2026 12:00 PM`.
pub fn format_long_datetime(value: NaiveDateTime) -> String {
    let day = value.day();
    let (hour12_is_pm, hour12) = value.hour12();
    format!(
        "{} {}{}, {} {}:{:02} {}",
        value.format("%B"),
        day,
        ordinal_suffix(day),
        value.year(),
        hour12,
        value.minute(),
        if hour12_is_pm { "PM" } else { "AM" }
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        PaymentMethod, ReservationDraft, ReservationRejection, StationSnapshot,
        format_long_datetime, plan_reservation, reservation_price, success_message,
    };
    use crate::domain::clock::TimestampMs;
    use crate::domain::models::{
        AuthenticatedUser, NotificationKind, PaymentStatus, Recipient, ReservationStatus,
    };

    fn draft(date: Option<NaiveDate>, method: PaymentMethod) -> ReservationDraft {
        ReservationDraft {
            station: StationSnapshot {
                id: 3,
                place_id: Some("ChIJ-station".to_string()),
                name: "Harbor Hub".to_string(),
                latitude: 53.54,
                longitude: 9.98,
            },
            date,
            time: "14:30".to_string(),
            duration_minutes: 120,
            payment_method: method,
        }
    }

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: "user-1".to_string(),
        }
    }

    #[test]
    fn price_is_linear_in_duration_and_rounded_to_cents() {
        assert_eq!(reservation_price(60), 0.35);
        assert_eq!(reservation_price(120), 0.7);
        assert_eq!(reservation_price(0), 0.0);

        for minutes in (30..=600).step_by(30) {
            let expected = ((f64::from(minutes) / 60.0 * 0.35) * 100.0).round() / 100.0;
            assert_eq!(reservation_price(minutes), expected);
            assert_eq!(reservation_price(minutes), reservation_price(minutes));
        }
    }

    #[test]
    fn missing_date_is_reported_before_missing_user() {
        assert_eq!(
            plan_reservation(&draft(None, PaymentMethod::Now), None, TimestampMs(0)),
            Err(ReservationRejection::MissingDate)
        );
        assert_eq!(
            plan_reservation(&draft(None, PaymentMethod::Now), Some(&user()), TimestampMs(0)),
            Err(ReservationRejection::MissingDate)
        );
    }

    #[test]
    fn anonymous_request_with_date_requires_login() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18);
        assert_eq!(
            plan_reservation(&draft(date, PaymentMethod::Now), None, TimestampMs(0)),
            Err(ReservationRejection::AuthenticationRequired)
        );
    }

    #[test]
    fn rejects_malformed_time_and_zero_duration() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18);
        let mut bad_time = draft(date, PaymentMethod::Now);
        bad_time.time = "25:99".to_string();
        assert_eq!(
            plan_reservation(&bad_time, Some(&user()), TimestampMs(0)),
            Err(ReservationRejection::InvalidTime)
        );

        let mut no_duration = draft(date, PaymentMethod::Now);
        no_duration.duration_minutes = 0;
        assert_eq!(
            plan_reservation(&no_duration, Some(&user()), TimestampMs(0)),
            Err(ReservationRejection::InvalidDuration)
        );
    }

    #[test]
    fn pay_now_plans_confirmed_reservation_with_both_notifications() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18);
        let plan = plan_reservation(
            &draft(date, PaymentMethod::Now),
            Some(&user()),
            TimestampMs(1_700_000_000_000),
        )
        .expect("plan should be valid");

        assert_eq!(plan.reservation.user_id, "user-1");
        assert_eq!(plan.reservation.station_id, "ChIJ-station");
        assert_eq!(plan.reservation.station_name, "Harbor Hub");
        assert_eq!(plan.reservation.reservation_time, "2026-10-18T14:30:00.000Z");
        assert_eq!(plan.reservation.status, ReservationStatus::Confirmed);
        assert_eq!(plan.reservation.payment_status, PaymentStatus::Paid);
        assert_eq!(plan.reservation.price, 0.7);
        assert_eq!(plan.reservation.created_at, "2023-11-14T22:13:20.000Z");

        assert_eq!(
            plan.user_notification.recipient,
            Recipient::User("user-1".to_string())
        );
        assert_eq!(plan.user_notification.kind, NotificationKind::Reservation);
        assert_eq!(
            plan.user_notification.message,
            "Your reservation at Harbor Hub is confirmed"
        );

        assert_eq!(plan.admin_notification.recipient, Recipient::AdminBroadcast);
        assert_eq!(plan.admin_notification.kind, NotificationKind::Admin);
        assert_eq!(
            plan.admin_notification.message,
            "New reservation at Harbor Hub for October 18th, 2026 2:30 PM"
        );
    }

    #[test]
    fn pay_later_plans_pending_unpaid_reservation() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 18);
        let mut later = draft(date, PaymentMethod::Later);
        later.station.place_id = None;

        let plan = plan_reservation(&later, Some(&user()), TimestampMs(0)).expect("valid plan");

        assert_eq!(plan.reservation.station_id, "3");
        assert_eq!(plan.reservation.status, ReservationStatus::Pending);
        assert_eq!(plan.reservation.payment_status, PaymentStatus::Unpaid);
        assert_eq!(
            plan.user_notification.message,
            "Your reservation at Harbor Hub is pending payment"
        );
        assert_eq!(
            success_message(&later),
            "Your spot at Harbor Hub is pending payment"
        );
    }

    #[test]
    fn draft_defaults_match_booking_form() {
        let draft: ReservationDraft = serde_json::from_str(
            r#"{"station":{"id":1,"name":"A","latitude":1.0,"longitude":2.0},"date":"2026-10-20"}"#,
        )
        .expect("draft should parse");

        assert_eq!(draft.time, "12:00");
        assert_eq!(draft.duration_minutes, 60);
        assert_eq!(draft.payment_method, PaymentMethod::Now);
        assert_eq!(draft.station.place_id, None);
    }

    #[test]
    fn blank_or_absent_date_parses_as_missing() {
        for body in [
            r#"{"station":{"id":1,"name":"A","latitude":1.0,"longitude":2.0},"date":""}"#,
            r#"{"station":{"id":1,"name":"A","latitude":1.0,"longitude":2.0},"date":"  "}"#,
            r#"{"station":{"id":1,"name":"A","latitude":1.0,"longitude":2.0},"date":null}"#,
            r#"{"station":{"id":1,"name":"A","latitude":1.0,"longitude":2.0}}"#,
        ] {
            let draft: ReservationDraft = serde_json::from_str(body).expect("draft should parse");
            assert_eq!(draft.date, None);
            assert_eq!(
                plan_reservation(&draft, Some(&user()), TimestampMs(0)),
                Err(ReservationRejection::MissingDate)
            );
        }

        let malformed = serde_json::from_str::<ReservationDraft>(
            r#"{"station":{"id":1,"name":"A","latitude":1.0,"longitude":2.0},"date":"20/10/2026"}"#,
        );
        assert!(malformed.is_err());
    }

    #[test]
    fn long_datetime_uses_ordinals_and_twelve_hour_clock() {
        let at = |d: u32, h: u32, m: u32| {
            NaiveDate::from_ymd_opt(2026, 1, d)
                .and_then(|date| date.and_hms_opt(h, m, 0))
                .expect("valid datetime")
        };

        assert_eq!(format_long_datetime(at(1, 0, 5)), "January 1st, 2026 12:05 AM");
        assert_eq!(format_long_datetime(at(2, 12, 0)), "January 2nd, 2026 12:00 PM");
        assert_eq!(format_long_datetime(at(3, 9, 30)), "January 3rd, 2026 9:30 AM");
        assert_eq!(format_long_datetime(at(11, 23, 59)), "January 11th, 2026 11:59 PM");
        assert_eq!(format_long_datetime(at(22, 13, 0)), "January 22nd, 2026 1:00 PM");
    }
}
