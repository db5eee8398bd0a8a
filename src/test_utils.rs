//! Shared test utilities for `AbsenceSync`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults. The default test session
//! runs 14:00-16:00 on a school day, which overlaps periods 6, 7 and 8.

use crate::core::assignment::{attach_relacio, create_beosztas, get_or_create_relacio};
use crate::core::forgatas::{ForgTipus, NewForgatas, create_forgatas};
use crate::core::periods::{affected_periods, encode_periods};
use crate::core::sync::SyncOutcome;
use crate::entities::{absence, beosztas, forgatas};
use crate::errors::Result;
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// School year used by all test fixtures
pub const TEST_TANEV: &str = "2025/2026";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for building a `NaiveTime` in tests.
pub fn t(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap_or(NaiveTime::MIN)
}

/// Shorthand for building a `NaiveDate` in tests.
pub fn d(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Default creation parameters: a dated ordinary session from 14:00 to 16:00.
pub fn default_new_forgatas() -> NewForgatas {
    NewForgatas {
        name: "Test Forgatas".to_string(),
        description: "Test session".to_string(),
        date: Some(d(2026, 3, 2)),
        time_from: t(14, 0),
        time_to: t(16, 0),
        location: None,
        contact_person: None,
        forg_tipus: ForgTipus::Rendes,
        related_kacsa_id: None,
        tanev: TEST_TANEV.to_string(),
    }
}

/// Creates a test session with sensible defaults (dated, 14:00-16:00).
pub async fn create_test_forgatas(
    db: &DatabaseConnection,
    name: &str,
) -> Result<forgatas::Model> {
    create_forgatas(
        db,
        NewForgatas {
            name: name.to_string(),
            ..default_new_forgatas()
        },
    )
    .await
}

/// Creates a test session with a custom date (None for not yet scheduled).
pub async fn create_custom_forgatas(
    db: &DatabaseConnection,
    name: &str,
    date: Option<NaiveDate>,
) -> Result<forgatas::Model> {
    create_forgatas(
        db,
        NewForgatas {
            name: name.to_string(),
            date,
            ..default_new_forgatas()
        },
    )
    .await
}

/// Creates a test session without a date (scheduling in progress).
pub async fn create_dateless_forgatas(
    db: &DatabaseConnection,
    name: &str,
) -> Result<forgatas::Model> {
    create_custom_forgatas(db, name, None).await
}

/// Creates a draft assignment for a session.
pub async fn create_test_beosztas(
    db: &DatabaseConnection,
    forgatas_id: i64,
) -> Result<beosztas::Model> {
    create_beosztas(db, forgatas_id, TEST_TANEV).await
}

/// Attaches a student to an assignment in the default "operator" role.
/// Returns the sync engine's outcome.
pub async fn attach_student(
    db: &DatabaseConnection,
    beosztas_id: i64,
    diak_id: i64,
) -> Result<SyncOutcome> {
    let relacio = get_or_create_relacio(db, diak_id, "operator").await?;
    attach_relacio(db, beosztas_id, relacio.id).await
}

/// Inserts an auto-generated absence row directly, bypassing the engine.
/// Used to simulate drift from out-of-band edits.
pub async fn create_auto_absence(
    db: &DatabaseConnection,
    diak_id: i64,
    forgatas_id: i64,
) -> Result<absence::Model> {
    insert_absence(db, diak_id, forgatas_id, true).await
}

/// Inserts a manually entered absence row (not engine-owned).
pub async fn create_manual_absence(
    db: &DatabaseConnection,
    diak_id: i64,
    forgatas_id: i64,
) -> Result<absence::Model> {
    insert_absence(db, diak_id, forgatas_id, false).await
}

async fn insert_absence(
    db: &DatabaseConnection,
    diak_id: i64,
    forgatas_id: i64,
    auto_generated: bool,
) -> Result<absence::Model> {
    let record = absence::ActiveModel {
        diak_id: Set(diak_id),
        forgatas_id: Set(forgatas_id),
        date: Set(d(2026, 3, 2)),
        time_from: Set(t(14, 0)),
        time_to: Set(t(16, 0)),
        affected_periods: Set(encode_periods(&affected_periods(t(14, 0), t(16, 0)))),
        excused: Set(false),
        unexcused: Set(false),
        auto_generated: Set(auto_generated),
        ..Default::default()
    };
    record.insert(db).await.map_err(Into::into)
}
