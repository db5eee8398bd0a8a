//! Assignment (beosztas) business logic.
//!
//! Assignments group students to a filming session through role relations.
//! A relation pairs one student with one named role, is unique per
//! (student, role), and may be attached to any number of assignments; the
//! attachment itself is an explicit join row. The attach/detach operations
//! here are the trigger points of the synchronization engine: they perform
//! the membership change and call the matching engine handler inside one
//! transaction, so the membership write and the derived absence write commit
//! or roll back together.

use crate::core::sync::{self, SyncOutcome};
use crate::entities::{
    Beosztas, BeosztasSzerepkor, Forgatas, SzerepkorRelacio, beosztas, beosztas_szerepkor,
    szerepkor_relacio,
};
use crate::errors::{Error, Result};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Result of deleting an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeosztasDeleteResult {
    /// Students whose attachment to the session went through this assignment
    pub detached_students: usize,
    /// Auto-generated absences removed because no attachment remained
    pub deleted_absences: usize,
}

/// Creates a new draft assignment for a session.
pub async fn create_beosztas(
    db: &DatabaseConnection,
    forgatas_id: i64,
    tanev: &str,
) -> Result<beosztas::Model> {
    Forgatas::find_by_id(forgatas_id)
        .one(db)
        .await?
        .ok_or(Error::ForgatasNotFound { id: forgatas_id })?;

    let record = beosztas::ActiveModel {
        forgatas_id: Set(forgatas_id),
        kesz: Set(false),
        tanev: Set(tanev.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let result = record.insert(db).await?;
    Ok(result)
}

/// Finds an assignment by its unique ID.
pub async fn get_beosztas_by_id(
    db: &DatabaseConnection,
    beosztas_id: i64,
) -> Result<Option<beosztas::Model>> {
    Beosztas::find_by_id(beosztas_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Sets the finalized flag of an assignment.
///
/// Absences are tracked for drafts too; finalization only gates downstream
/// consumers such as the notification system.
pub async fn set_finalized(
    db: &DatabaseConnection,
    beosztas_id: i64,
    kesz: bool,
) -> Result<beosztas::Model> {
    let record = Beosztas::find_by_id(beosztas_id)
        .one(db)
        .await?
        .ok_or(Error::BeosztasNotFound { id: beosztas_id })?;

    let mut active: beosztas::ActiveModel = record.into();
    active.kesz = Set(kesz);
    active.update(db).await.map_err(Into::into)
}

/// Finds the role relation for a (student, role) pair, creating it on first use.
///
/// Relations are shared: the same instance is reused across every assignment
/// the student fills that role in.
pub async fn get_or_create_relacio(
    db: &DatabaseConnection,
    diak_id: i64,
    szerepkor: &str,
) -> Result<szerepkor_relacio::Model> {
    if szerepkor.trim().is_empty() {
        return Err(Error::Config {
            message: "Role name cannot be empty".to_string(),
        });
    }

    let existing = SzerepkorRelacio::find()
        .filter(szerepkor_relacio::Column::DiakId.eq(diak_id))
        .filter(szerepkor_relacio::Column::Szerepkor.eq(szerepkor.trim()))
        .one(db)
        .await?;

    if let Some(relacio) = existing {
        return Ok(relacio);
    }

    let record = szerepkor_relacio::ActiveModel {
        diak_id: Set(diak_id),
        szerepkor: Set(szerepkor.trim().to_string()),
        ..Default::default()
    };
    let result = record.insert(db).await?;
    Ok(result)
}

/// Attaches a role relation to an assignment and creates the student's absence.
///
/// Inserts the join row (no-op if already attached) and runs the engine's
/// attach handler in the same transaction. Returns the engine's outcome so
/// callers can observe whether an absence was created.
pub async fn attach_relacio(
    db: &DatabaseConnection,
    beosztas_id: i64,
    relacio_id: i64,
) -> Result<SyncOutcome> {
    let txn = db.begin().await?;

    let beosztas_row = Beosztas::find_by_id(beosztas_id)
        .one(&txn)
        .await?
        .ok_or(Error::BeosztasNotFound { id: beosztas_id })?;
    let relacio = SzerepkorRelacio::find_by_id(relacio_id)
        .one(&txn)
        .await?
        .ok_or(Error::RelacioNotFound { id: relacio_id })?;
    let forgatas = Forgatas::find_by_id(beosztas_row.forgatas_id)
        .one(&txn)
        .await?
        .ok_or(Error::ForgatasNotFound {
            id: beosztas_row.forgatas_id,
        })?;

    let already_attached = BeosztasSzerepkor::find()
        .filter(beosztas_szerepkor::Column::BeosztasId.eq(beosztas_id))
        .filter(beosztas_szerepkor::Column::RelacioId.eq(relacio_id))
        .one(&txn)
        .await?
        .is_some();

    if !already_attached {
        let attachment = beosztas_szerepkor::ActiveModel {
            beosztas_id: Set(beosztas_id),
            relacio_id: Set(relacio_id),
            ..Default::default()
        };
        attachment.insert(&txn).await?;
    }

    let outcome = sync::handle_relacio_attached(&txn, &forgatas, relacio.diak_id).await?;
    txn.commit().await?;

    info!(
        beosztas_id,
        relacio_id,
        diak_id = relacio.diak_id,
        ?outcome,
        "attached role relation"
    );
    Ok(outcome)
}

/// Detaches a role relation from an assignment.
///
/// Deletes the join row and runs the engine's detach handler in the same
/// transaction. The student's absence is deleted only if no attachment to any
/// assignment of the session remains.
pub async fn detach_relacio(
    db: &DatabaseConnection,
    beosztas_id: i64,
    relacio_id: i64,
) -> Result<SyncOutcome> {
    let txn = db.begin().await?;

    let beosztas_row = Beosztas::find_by_id(beosztas_id)
        .one(&txn)
        .await?
        .ok_or(Error::BeosztasNotFound { id: beosztas_id })?;
    let relacio = SzerepkorRelacio::find_by_id(relacio_id)
        .one(&txn)
        .await?
        .ok_or(Error::RelacioNotFound { id: relacio_id })?;

    BeosztasSzerepkor::delete_many()
        .filter(beosztas_szerepkor::Column::BeosztasId.eq(beosztas_id))
        .filter(beosztas_szerepkor::Column::RelacioId.eq(relacio_id))
        .exec(&txn)
        .await?;

    let outcome =
        sync::handle_relacio_detached(&txn, beosztas_row.forgatas_id, relacio.diak_id).await?;
    txn.commit().await?;

    info!(
        beosztas_id,
        relacio_id,
        diak_id = relacio.diak_id,
        ?outcome,
        "detached role relation"
    );
    Ok(outcome)
}

/// Deletes an assignment, detaching every relation first.
///
/// Runs the detach handler for each affected student inside one transaction,
/// so absences of students who remain attached through another assignment of
/// the same session survive.
pub async fn delete_beosztas(
    db: &DatabaseConnection,
    beosztas_id: i64,
) -> Result<BeosztasDeleteResult> {
    let txn = db.begin().await?;

    let beosztas_row = Beosztas::find_by_id(beosztas_id)
        .one(&txn)
        .await?
        .ok_or(Error::BeosztasNotFound { id: beosztas_id })?;

    let relaciok = get_attached_relaciok(&txn, beosztas_id).await?;
    let mut diak_ids: Vec<i64> = relaciok.iter().map(|r| r.diak_id).collect();
    diak_ids.sort_unstable();
    diak_ids.dedup();

    BeosztasSzerepkor::delete_many()
        .filter(beosztas_szerepkor::Column::BeosztasId.eq(beosztas_id))
        .exec(&txn)
        .await?;
    Beosztas::delete_by_id(beosztas_id).exec(&txn).await?;

    let mut deleted_absences = 0;
    for diak_id in &diak_ids {
        let outcome =
            sync::handle_relacio_detached(&txn, beosztas_row.forgatas_id, *diak_id).await?;
        if outcome == SyncOutcome::Deleted {
            deleted_absences += 1;
        }
    }

    txn.commit().await?;

    info!(
        beosztas_id,
        detached_students = diak_ids.len(),
        deleted_absences,
        "deleted assignment"
    );
    Ok(BeosztasDeleteResult {
        detached_students: diak_ids.len(),
        deleted_absences,
    })
}

/// Returns the role relations attached to an assignment, ordered by ID.
pub async fn get_attached_relaciok<C>(
    db: &C,
    beosztas_id: i64,
) -> Result<Vec<szerepkor_relacio::Model>>
where
    C: ConnectionTrait,
{
    let relacio_ids: Vec<i64> = BeosztasSzerepkor::find()
        .filter(beosztas_szerepkor::Column::BeosztasId.eq(beosztas_id))
        .all(db)
        .await?
        .into_iter()
        .map(|a| a.relacio_id)
        .collect();

    if relacio_ids.is_empty() {
        return Ok(Vec::new());
    }

    SzerepkorRelacio::find()
        .filter(szerepkor_relacio::Column::Id.is_in(relacio_ids))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns the deduplicated student IDs attached to any assignment of a session.
pub async fn get_assigned_student_ids<C>(db: &C, forgatas_id: i64) -> Result<Vec<i64>>
where
    C: ConnectionTrait,
{
    let beosztas_ids: Vec<i64> = Beosztas::find()
        .filter(beosztas::Column::ForgatasId.eq(forgatas_id))
        .all(db)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect();

    if beosztas_ids.is_empty() {
        return Ok(Vec::new());
    }

    let relacio_ids: Vec<i64> = BeosztasSzerepkor::find()
        .filter(beosztas_szerepkor::Column::BeosztasId.is_in(beosztas_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|a| a.relacio_id)
        .collect();

    if relacio_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut diak_ids: Vec<i64> = SzerepkorRelacio::find()
        .filter(szerepkor_relacio::Column::Id.is_in(relacio_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.diak_id)
        .collect();
    diak_ids.sort_unstable();
    diak_ids.dedup();
    Ok(diak_ids)
}

/// Checks whether a student is attached to any assignment of a session.
///
/// This is the explicit "any remaining path" query the detach handler keys
/// deletion off.
pub async fn is_student_attached<C>(db: &C, forgatas_id: i64, diak_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let beosztas_ids: Vec<i64> = Beosztas::find()
        .filter(beosztas::Column::ForgatasId.eq(forgatas_id))
        .all(db)
        .await?
        .into_iter()
        .map(|b| b.id)
        .collect();

    if beosztas_ids.is_empty() {
        return Ok(false);
    }

    let relacio_ids: Vec<i64> = SzerepkorRelacio::find()
        .filter(szerepkor_relacio::Column::DiakId.eq(diak_id))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();

    if relacio_ids.is_empty() {
        return Ok(false);
    }

    let count = BeosztasSzerepkor::find()
        .filter(beosztas_szerepkor::Column::BeosztasId.is_in(beosztas_ids))
        .filter(beosztas_szerepkor::Column::RelacioId.is_in(relacio_ids))
        .count(db)
        .await?;
    Ok(count > 0)
}
