//! Filming session (forgatas) business logic.
//!
//! Sessions are created by staff action and rescheduled through
//! [`reschedule_forgatas`], which is one of the three trigger points of the
//! synchronization engine: the timing update and the derived absence rewrites
//! run in one transaction. Deleting a session cascades its assignments,
//! attachments, and absence records.

use crate::core::sync::{self, RetimeResult};
use crate::entities::{
    Absence, Beosztas, BeosztasSzerepkor, Forgatas, absence, beosztas, beosztas_szerepkor, forgatas,
};
use crate::errors::{Error, Result};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Session type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgTipus {
    /// Ordinary filming session
    Rendes,
    /// Event coverage
    Rendezveny,
    /// KaCsa special session
    Kacsa,
    /// Anything else
    Egyeb,
}

impl ForgTipus {
    /// The stored string form of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rendes => "rendes",
            Self::Rendezveny => "rendezveny",
            Self::Kacsa => "kacsa",
            Self::Egyeb => "egyeb",
        }
    }

    /// Parses a stored type string.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "rendes" => Ok(Self::Rendes),
            "rendezveny" => Ok(Self::Rendezveny),
            "kacsa" => Ok(Self::Kacsa),
            "egyeb" => Ok(Self::Egyeb),
            other => Err(Error::UnknownForgatasType {
                value: other.to_string(),
            }),
        }
    }
}

/// Parameters for creating a session.
#[derive(Debug, Clone)]
pub struct NewForgatas {
    /// Session name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Date; None while scheduling is in progress
    pub date: Option<NaiveDate>,
    /// Start time
    pub time_from: NaiveTime,
    /// End time
    pub time_to: NaiveTime,
    /// Optional location name
    pub location: Option<String>,
    /// Optional contact person
    pub contact_person: Option<String>,
    /// Session type
    pub forg_tipus: ForgTipus,
    /// Optional related KaCsa session
    pub related_kacsa_id: Option<i64>,
    /// Owning school year
    pub tanev: String,
}

/// Result of deleting a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForgatasDeleteResult {
    /// Assignments removed with the session
    pub deleted_beosztasok: usize,
    /// Absence records removed with the session
    pub deleted_absences: usize,
}

/// Creates a new session, performing input validation.
pub async fn create_forgatas(db: &DatabaseConnection, new: NewForgatas) -> Result<forgatas::Model> {
    if new.name.trim().is_empty() {
        return Err(Error::Config {
            message: "Forgatas name cannot be empty".to_string(),
        });
    }
    if new.time_from > new.time_to {
        return Err(Error::InvalidTimeRange {
            time_from: new.time_from,
            time_to: new.time_to,
        });
    }

    let record = forgatas::ActiveModel {
        name: Set(new.name.trim().to_string()),
        description: Set(new.description),
        date: Set(new.date),
        time_from: Set(new.time_from),
        time_to: Set(new.time_to),
        location: Set(new.location),
        contact_person: Set(new.contact_person),
        forg_tipus: Set(new.forg_tipus.as_str().to_string()),
        related_kacsa_id: Set(new.related_kacsa_id),
        tanev: Set(new.tanev),
        ..Default::default()
    };
    let result = record.insert(db).await?;
    Ok(result)
}

/// Finds a session by its unique ID.
pub async fn get_forgatas_by_id(
    db: &DatabaseConnection,
    forgatas_id: i64,
) -> Result<Option<forgatas::Model>> {
    Forgatas::find_by_id(forgatas_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a session by name.
pub async fn get_forgatas_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<forgatas::Model>> {
    Forgatas::find()
        .filter(forgatas::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns all sessions of a school year, ordered by date then name.
pub async fn get_forgatas_for_tanev(
    db: &DatabaseConnection,
    tanev: &str,
) -> Result<Vec<forgatas::Model>> {
    Forgatas::find()
        .filter(forgatas::Column::Tanev.eq(tanev))
        .order_by_asc(forgatas::Column::Date)
        .order_by_asc(forgatas::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Reschedules a session and resynchronizes its absences in one transaction.
///
/// Setting `date` to None marks the session as no longer scheduled, which
/// deletes its auto-generated absences. Decisions on surviving records are
/// preserved by the engine.
pub async fn reschedule_forgatas(
    db: &DatabaseConnection,
    forgatas_id: i64,
    date: Option<NaiveDate>,
    time_from: NaiveTime,
    time_to: NaiveTime,
) -> Result<(forgatas::Model, RetimeResult)> {
    if time_from > time_to {
        return Err(Error::InvalidTimeRange { time_from, time_to });
    }

    let txn = db.begin().await?;

    let record = Forgatas::find_by_id(forgatas_id)
        .one(&txn)
        .await?
        .ok_or(Error::ForgatasNotFound { id: forgatas_id })?;

    let mut active: forgatas::ActiveModel = record.into();
    active.date = Set(date);
    active.time_from = Set(time_from);
    active.time_to = Set(time_to);
    let updated = active.update(&txn).await?;

    let result = sync::handle_forgatas_retimed(&txn, &updated).await?;
    txn.commit().await?;

    info!(
        forgatas_id,
        updated = result.updated,
        deleted = result.deleted,
        "rescheduled session"
    );
    Ok((updated, result))
}

/// Deletes a session, cascading its assignments, attachments, and absences.
pub async fn delete_forgatas(
    db: &DatabaseConnection,
    forgatas_id: i64,
) -> Result<ForgatasDeleteResult> {
    let txn = db.begin().await?;

    Forgatas::find_by_id(forgatas_id)
        .one(&txn)
        .await?
        .ok_or(Error::ForgatasNotFound { id: forgatas_id })?;

    let beosztas_ids: Vec<i64> = Beosztas::find()
        .filter(beosztas::Column::ForgatasId.eq(forgatas_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect();

    if !beosztas_ids.is_empty() {
        BeosztasSzerepkor::delete_many()
            .filter(beosztas_szerepkor::Column::BeosztasId.is_in(beosztas_ids.clone()))
            .exec(&txn)
            .await?;
        Beosztas::delete_many()
            .filter(beosztas::Column::ForgatasId.eq(forgatas_id))
            .exec(&txn)
            .await?;
    }

    let deleted_absences = Absence::delete_many()
        .filter(absence::Column::ForgatasId.eq(forgatas_id))
        .exec(&txn)
        .await?;

    Forgatas::delete_by_id(forgatas_id).exec(&txn).await?;
    txn.commit().await?;

    info!(
        forgatas_id,
        deleted_beosztasok = beosztas_ids.len(),
        deleted_absences = deleted_absences.rows_affected,
        "deleted session"
    );
    Ok(ForgatasDeleteResult {
        deleted_beosztasok: beosztas_ids.len(),
        deleted_absences: deleted_absences.rows_affected as usize,
    })
}
