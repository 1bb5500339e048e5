use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::{
    NewNotificationRecord, NewReservationRecord, NotificationKind, NotificationRecord,
    PaymentStatus, Recipient, ReservationRecord, ReservationStatus,
};
use crate::domain::reservation::ReservationPlan;

pub const LATEST_SCHEMA_VERSION: u32 = 2;

const MIGRATIONS: &[(u32, &str)] = &[
    (
        1,
        r#"
CREATE TABLE IF NOT EXISTS reservations (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    station_id TEXT NOT NULL,
    station_name TEXT NOT NULL,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    reservation_time TEXT NOT NULL,
    duration INTEGER NOT NULL CHECK (duration > 0),
    status TEXT NOT NULL CHECK (status IN ('confirmed', 'pending')),
    payment_status TEXT NOT NULL CHECK (payment_status IN ('paid', 'unpaid')),
    price REAL NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reservations_user_created_at
ON reservations (user_id, created_at DESC);
"#,
    ),
    (
        2,
        r#"
CREATE TABLE IF NOT EXISTS notifications (
    id TEXT PRIMARY KEY,
    recipient_kind TEXT NOT NULL CHECK (recipient_kind IN ('user', 'admin_broadcast')),
    user_id TEXT,
    type TEXT NOT NULL,
    title TEXT NOT NULL,
    message TEXT NOT NULL,
    related_reservation_id TEXT REFERENCES reservations (id),
    created_at TEXT NOT NULL,
    CHECK (
        (recipient_kind = 'user' AND user_id IS NOT NULL)
        OR (recipient_kind = 'admin_broadcast' AND user_id IS NULL)
    )
);

CREATE INDEX IF NOT EXISTS idx_notifications_recipient_created_at
ON notifications (recipient_kind, user_id, created_at DESC);
"#,
    ),
];

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database operation failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("unsupported schema version {current}; latest supported is {latest}")]
    UnsupportedSchemaVersion { current: u32, latest: u32 },
    #[error("invalid value {value:?} in column {column}")]
    InvalidColumn { column: &'static str, value: String },
}

pub fn open_connection(path: &str) -> Result<Connection, DbError> {
    let connection = Connection::open(path)?;
    connection.pragma_update(None, "foreign_keys", true)?;
    Ok(connection)
}

pub fn run_migrations(connection: &mut Connection) -> Result<(), DbError> {
    let current_version = schema_version(connection)?;

    if current_version > LATEST_SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            current: current_version,
            latest: LATEST_SCHEMA_VERSION,
        });
    }

    let transaction = connection.transaction()?;

    for (version, sql) in MIGRATIONS {
        if *version > current_version {
            transaction.execute_batch(sql)?;
            transaction.pragma_update(None, "user_version", version)?;
        }
    }

    transaction.commit()?;

    Ok(())
}

pub fn schema_version(connection: &Connection) -> Result<u32, DbError> {
    let version = connection.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedReservation {
    pub reservation: ReservationRecord,
    pub user_notification_id: String,
    pub admin_notification_id: String,
}

/// Writes the reservation and both notifications in one transaction; if any
/// insert fails nothing is kept.
pub fn record_reservation(
    connection: &mut Connection,
    plan: &ReservationPlan,
) -> Result<RecordedReservation, DbError> {
    let transaction = connection.transaction()?;

    let reservation_id = insert_reservation(&transaction, &plan.reservation)?;
    let user_notification_id =
        insert_notification(&transaction, &plan.user_notification, Some(&reservation_id))?;
    let admin_notification_id =
        insert_notification(&transaction, &plan.admin_notification, Some(&reservation_id))?;

    transaction.commit()?;

    Ok(RecordedReservation {
        reservation: reservation_from_new(reservation_id, &plan.reservation),
        user_notification_id,
        admin_notification_id,
    })
}

pub fn insert_reservation(
    connection: &Connection,
    new_reservation: &NewReservationRecord,
) -> Result<String, DbError> {
    let id = Uuid::new_v4().to_string();

    connection.execute(
        "INSERT INTO reservations (
            id, user_id, station_id, station_name, latitude, longitude, reservation_time,
            duration, status, payment_status, price, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            id,
            new_reservation.user_id,
            new_reservation.station_id,
            new_reservation.station_name,
            new_reservation.latitude,
            new_reservation.longitude,
            new_reservation.reservation_time,
            i64::from(new_reservation.duration_minutes),
            new_reservation.status.as_str(),
            new_reservation.payment_status.as_str(),
            new_reservation.price,
            new_reservation.created_at,
        ],
    )?;

    Ok(id)
}

pub fn insert_notification(
    connection: &Connection,
    new_notification: &NewNotificationRecord,
    related_reservation_id: Option<&str>,
) -> Result<String, DbError> {
    let id = Uuid::new_v4().to_string();

    connection.execute(
        "INSERT INTO notifications (
            id, recipient_kind, user_id, type, title, message, related_reservation_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            new_notification.recipient.kind(),
            new_notification.recipient.user_id(),
            new_notification.kind.as_str(),
            new_notification.title,
            new_notification.message,
            related_reservation_id,
            new_notification.created_at,
        ],
    )?;

    Ok(id)
}

pub fn get_reservation(
    connection: &Connection,
    id: &str,
) -> Result<Option<ReservationRecord>, DbError> {
    let row = connection
        .query_row(
            "SELECT id, user_id, station_id, station_name, latitude, longitude, reservation_time,
                    duration, status, payment_status, price, created_at
             FROM reservations
             WHERE id = ?1",
            params![id],
            RawReservation::from_row,
        )
        .optional()?;

    row.map(RawReservation::into_record).transpose()
}

/// A user's reservation history, newest booking first.
pub fn list_reservations(
    connection: &Connection,
    user_id: &str,
    limit: u32,
) -> Result<Vec<ReservationRecord>, DbError> {
    let mut statement = connection.prepare(
        "SELECT id, user_id, station_id, station_name, latitude, longitude, reservation_time,
                duration, status, payment_status, price, created_at
         FROM reservations
         WHERE user_id = ?1
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?2",
    )?;

    let rows = statement.query_map(params![user_id, i64::from(limit)], RawReservation::from_row)?;

    let mut reservations = Vec::new();
    for row in rows {
        reservations.push(row?.into_record()?);
    }

    Ok(reservations)
}

pub fn list_notifications(
    connection: &Connection,
    recipient: &Recipient,
    limit: u32,
) -> Result<Vec<NotificationRecord>, DbError> {
    let mut statement = connection.prepare(
        "SELECT id, recipient_kind, user_id, type, title, message, related_reservation_id, created_at
         FROM notifications
         WHERE recipient_kind = ?1 AND user_id IS ?2
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?3",
    )?;

    let rows = statement.query_map(
        params![recipient.kind(), recipient.user_id(), i64::from(limit)],
        RawNotification::from_row,
    )?;

    let mut notifications = Vec::new();
    for row in rows {
        notifications.push(row?.into_record()?);
    }

    Ok(notifications)
}

pub fn count_reservations(connection: &Connection) -> Result<i64, DbError> {
    let count = connection.query_row("SELECT COUNT(*) FROM reservations", [], |row| row.get(0))?;
    Ok(count)
}

pub fn count_notifications(connection: &Connection) -> Result<i64, DbError> {
    let count = connection.query_row("SELECT COUNT(*) FROM notifications", [], |row| row.get(0))?;
    Ok(count)
}

fn reservation_from_new(id: String, new_reservation: &NewReservationRecord) -> ReservationRecord {
    ReservationRecord {
        id,
        user_id: new_reservation.user_id.clone(),
        station_id: new_reservation.station_id.clone(),
        station_name: new_reservation.station_name.clone(),
        latitude: new_reservation.latitude,
        longitude: new_reservation.longitude,
        reservation_time: new_reservation.reservation_time.clone(),
        duration_minutes: new_reservation.duration_minutes,
        status: new_reservation.status,
        payment_status: new_reservation.payment_status,
        price: new_reservation.price,
        created_at: new_reservation.created_at.clone(),
    }
}

// Rows are read as plain columns first; enum columns are validated afterwards
// so a bad value surfaces as DbError::InvalidColumn instead of a rusqlite error.
struct RawReservation {
    id: String,
    user_id: String,
    station_id: String,
    station_name: String,
    latitude: f64,
    longitude: f64,
    reservation_time: String,
    duration: i64,
    status: String,
    payment_status: String,
    price: f64,
    created_at: String,
}

impl RawReservation {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            station_id: row.get(2)?,
            station_name: row.get(3)?,
            latitude: row.get(4)?,
            longitude: row.get(5)?,
            reservation_time: row.get(6)?,
            duration: row.get(7)?,
            status: row.get(8)?,
            payment_status: row.get(9)?,
            price: row.get(10)?,
            created_at: row.get(11)?,
        })
    }

    fn into_record(self) -> Result<ReservationRecord, DbError> {
        let status = ReservationStatus::parse(&self.status).ok_or(DbError::InvalidColumn {
            column: "status",
            value: self.status.clone(),
        })?;
        let payment_status =
            PaymentStatus::parse(&self.payment_status).ok_or(DbError::InvalidColumn {
                column: "payment_status",
                value: self.payment_status.clone(),
            })?;
        let duration_minutes =
            u32::try_from(self.duration).map_err(|_| DbError::InvalidColumn {
                column: "duration",
                value: self.duration.to_string(),
            })?;

        Ok(ReservationRecord {
            id: self.id,
            user_id: self.user_id,
            station_id: self.station_id,
            station_name: self.station_name,
            latitude: self.latitude,
            longitude: self.longitude,
            reservation_time: self.reservation_time,
            duration_minutes,
            status,
            payment_status,
            price: self.price,
            created_at: self.created_at,
        })
    }
}

struct RawNotification {
    id: String,
    recipient_kind: String,
    user_id: Option<String>,
    kind: String,
    title: String,
    message: String,
    related_reservation_id: Option<String>,
    created_at: String,
}

impl RawNotification {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            recipient_kind: row.get(1)?,
            user_id: row.get(2)?,
            kind: row.get(3)?,
            title: row.get(4)?,
            message: row.get(5)?,
            related_reservation_id: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_record(self) -> Result<NotificationRecord, DbError> {
        let recipient = Recipient::from_columns(&self.recipient_kind, self.user_id.clone())
            .ok_or(DbError::InvalidColumn {
                column: "recipient_kind",
                value: self.recipient_kind.clone(),
            })?;
        let kind = NotificationKind::parse(&self.kind).ok_or(DbError::InvalidColumn {
            column: "type",
            value: self.kind.clone(),
        })?;

        Ok(NotificationRecord {
            id: self.id,
            recipient,
            kind,
            title: self.title,
            message: self.message,
            related_reservation_id: self.related_reservation_id,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rusqlite::params;

    use super::{
        LATEST_SCHEMA_VERSION, count_notifications, count_reservations, get_reservation,
        list_notifications, list_reservations, open_connection, record_reservation,
        run_migrations, schema_version,
    };
    use crate::domain::clock::TimestampMs;
    use crate::domain::models::{AuthenticatedUser, Recipient, ReservationStatus};
    use crate::domain::reservation::{
        PaymentMethod, ReservationDraft, ReservationPlan, StationSnapshot, plan_reservation,
    };
    use crate::test_support::open_test_connection;

    fn temp_db_path(name: &str) -> std::path::PathBuf {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join(name);
        std::mem::forget(dir);
        path
    }

    fn sample_plan(user_id: &str, created_at: i64) -> ReservationPlan {
        let draft = ReservationDraft {
            station: StationSnapshot {
                id: 1,
                place_id: Some("place-1".to_string()),
                name: "Harbor Hub".to_string(),
                latitude: 53.54,
                longitude: 9.98,
            },
            date: NaiveDate::from_ymd_opt(2026, 10, 20),
            time: "09:00".to_string(),
            duration_minutes: 60,
            payment_method: PaymentMethod::Now,
        };
        let user = AuthenticatedUser {
            id: user_id.to_string(),
        };
        plan_reservation(&draft, Some(&user), TimestampMs(created_at)).expect("plan is valid")
    }

    #[test]
    fn migrates_fresh_database_to_latest_version() {
        let db_path = temp_db_path("fresh.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");

        run_migrations(&mut connection).expect("migrations should succeed");

        let version = schema_version(&connection).expect("schema version should be queryable");
        assert_eq!(version, LATEST_SCHEMA_VERSION);

        for table in ["reservations", "notifications"] {
            let exists: i64 = connection
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    params![table],
                    |row| row.get(0),
                )
                .expect("table check should work");
            assert_eq!(exists, 1, "missing table {table}");
        }
    }

    #[test]
    fn migrations_are_idempotent() {
        let db_path = temp_db_path("idempotent.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");

        run_migrations(&mut connection).expect("first migration run should succeed");
        run_migrations(&mut connection).expect("second migration run should succeed");

        let version = schema_version(&connection).expect("schema version should be queryable");
        assert_eq!(version, LATEST_SCHEMA_VERSION);
    }

    #[test]
    fn rejects_databases_from_newer_versions() {
        let db_path = temp_db_path("future.sqlite");
        let mut connection =
            open_connection(db_path.to_string_lossy().as_ref()).expect("db connection should open");
        connection
            .pragma_update(None, "user_version", LATEST_SCHEMA_VERSION + 1)
            .expect("pragma update should work");

        let error = run_migrations(&mut connection).expect_err("newer schema must be rejected");
        assert_eq!(
            error.to_string(),
            format!(
                "unsupported schema version {}; latest supported is {}",
                LATEST_SCHEMA_VERSION + 1,
                LATEST_SCHEMA_VERSION
            )
        );
    }

    #[test]
    fn records_reservation_with_linked_notifications() {
        let mut connection = open_test_connection("record-reservation");

        let recorded = record_reservation(&mut connection, &sample_plan("user-1", 1_000))
            .expect("reservation should be recorded");

        let stored = get_reservation(&connection, &recorded.reservation.id)
            .expect("query should succeed")
            .expect("reservation should exist");
        assert_eq!(stored, recorded.reservation);
        assert_eq!(stored.status, ReservationStatus::Confirmed);
        assert_eq!(stored.price, 0.35);

        let user_notes =
            list_notifications(&connection, &Recipient::User("user-1".to_string()), 10)
                .expect("query should succeed");
        assert_eq!(user_notes.len(), 1);
        assert_eq!(user_notes[0].id, recorded.user_notification_id);
        assert_eq!(
            user_notes[0].related_reservation_id.as_deref(),
            Some(stored.id.as_str())
        );

        let admin_notes = list_notifications(&connection, &Recipient::AdminBroadcast, 10)
            .expect("query should succeed");
        assert_eq!(admin_notes.len(), 1);
        assert_eq!(admin_notes[0].id, recorded.admin_notification_id);
        assert_eq!(admin_notes[0].recipient, Recipient::AdminBroadcast);
    }

    #[test]
    fn failed_notification_write_rolls_back_reservation() {
        let mut connection = open_test_connection("record-rollback");
        connection
            .execute_batch(
                "CREATE TRIGGER reject_admin_notifications
                 BEFORE INSERT ON notifications
                 WHEN NEW.recipient_kind = 'admin_broadcast'
                 BEGIN SELECT RAISE(ABORT, 'admin notifications disabled'); END;",
            )
            .expect("trigger should be created");

        let result = record_reservation(&mut connection, &sample_plan("user-1", 1_000));

        assert!(result.is_err());
        assert_eq!(count_reservations(&connection).expect("count"), 0);
        assert_eq!(count_notifications(&connection).expect("count"), 0);
    }

    #[test]
    fn notification_recipient_shape_is_enforced_by_schema() {
        let connection = open_test_connection("recipient-check");
        let result = connection.execute(
            "INSERT INTO notifications (id, recipient_kind, user_id, type, title, message, created_at)
             VALUES ('n1', 'admin_broadcast', 'user-1', 'admin', 't', 'm', '2026-01-01T00:00:00.000Z')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn lists_notifications_newest_first_and_per_user() {
        let mut connection = open_test_connection("list-notifications");
        record_reservation(&mut connection, &sample_plan("user-1", 1_000)).expect("record");
        record_reservation(&mut connection, &sample_plan("user-1", 2_000)).expect("record");
        record_reservation(&mut connection, &sample_plan("user-2", 3_000)).expect("record");

        let user_one = list_notifications(&connection, &Recipient::User("user-1".to_string()), 10)
            .expect("query should succeed");
        assert_eq!(user_one.len(), 2);
        assert_eq!(user_one[0].created_at, "1970-01-01T00:00:02.000Z");

        let limited = list_notifications(&connection, &Recipient::AdminBroadcast, 2)
            .expect("query should succeed");
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].created_at, "1970-01-01T00:00:03.000Z");
    }

    #[test]
    fn lists_reservation_history_newest_first_per_user() {
        let mut connection = open_test_connection("list-reservations");
        let first =
            record_reservation(&mut connection, &sample_plan("user-1", 1_000)).expect("record");
        let second =
            record_reservation(&mut connection, &sample_plan("user-1", 2_000)).expect("record");
        record_reservation(&mut connection, &sample_plan("user-2", 3_000)).expect("record");

        let history = list_reservations(&connection, "user-1", 10).expect("query should succeed");
        let ids: Vec<&str> = history.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                second.reservation.id.as_str(),
                first.reservation.id.as_str()
            ]
        );

        let limited = list_reservations(&connection, "user-1", 1).expect("query should succeed");
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].created_at, "1970-01-01T00:00:02.000Z");

        assert!(
            list_reservations(&connection, "nobody", 10)
                .expect("query should succeed")
                .is_empty()
        );
    }

    #[test]
    fn returns_none_for_unknown_reservation() {
        let connection = open_test_connection("missing-reservation");
        assert_eq!(
            get_reservation(&connection, "does-not-exist").expect("query should succeed"),
            None
        );
    }
}
