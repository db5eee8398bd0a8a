//! Absence synchronization engine.
//!
//! Keeps the auto-generated absence set consistent with the current
//! (session x assigned-student) pairs. Exactly three events drive it: a role
//! relation attached to an assignment, a role relation detached, and a session
//! timing/date change. The handlers are plain functions called by the mutation
//! operations inside their transaction; all writes for one event commit or
//! roll back together.
//!
//! The engine maintains two invariants:
//! - at most one `auto_generated` absence exists per (student, session) pair
//! - `affected_periods` always reflects the session's time range as of the
//!   last recomputation
//!
//! The only condition the engine swallows is a session with no date at attach
//! time: scheduling-in-progress is an expected transient state, reported as
//! [`SyncOutcome::Skipped`]. Database errors propagate unchanged.

use crate::core::assignment::is_student_attached;
use crate::core::periods::{affected_periods, encode_periods};
use crate::entities::{Absence, absence};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Set, prelude::*};
use tracing::debug;

/// What a single sync-engine event handler did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new absence record was created
    Created,
    /// An existing absence record was deleted
    Deleted,
    /// Nothing needed to change
    Unchanged,
    /// Soft skip: the session has no date, nothing to track yet
    Skipped,
}

/// Result of a session retiming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetimeResult {
    /// Absence records whose date/time/periods were rewritten
    pub updated: usize,
    /// Absence records deleted because the session's date was cleared
    pub deleted: usize,
}

/// Handles a role relation being attached to an assignment of the given session.
///
/// Creates the student's auto-generated absence if it does not exist yet, with
/// affected periods derived from the session's current time range. A session
/// with no date is a soft skip, not an error.
pub async fn handle_relacio_attached<C>(
    db: &C,
    forgatas: &crate::entities::ForgatasModel,
    diak_id: i64,
) -> Result<SyncOutcome>
where
    C: ConnectionTrait,
{
    let Some(date) = forgatas.date else {
        debug!(
            forgatas_id = forgatas.id,
            diak_id, "session has no date yet, skipping absence creation"
        );
        return Ok(SyncOutcome::Skipped);
    };

    let existing = Absence::find()
        .filter(absence::Column::DiakId.eq(diak_id))
        .filter(absence::Column::ForgatasId.eq(forgatas.id))
        .filter(absence::Column::AutoGenerated.eq(true))
        .one(db)
        .await?;

    if existing.is_some() {
        return Ok(SyncOutcome::Unchanged);
    }

    let ordinals = affected_periods(forgatas.time_from, forgatas.time_to);
    let record = absence::ActiveModel {
        diak_id: Set(diak_id),
        forgatas_id: Set(forgatas.id),
        date: Set(date),
        time_from: Set(forgatas.time_from),
        time_to: Set(forgatas.time_to),
        affected_periods: Set(encode_periods(&ordinals)),
        excused: Set(false),
        unexcused: Set(false),
        auto_generated: Set(true),
        ..Default::default()
    };
    record.insert(db).await?;

    debug!(
        forgatas_id = forgatas.id,
        diak_id, "created auto-generated absence"
    );
    Ok(SyncOutcome::Created)
}

/// Handles a role relation being detached from an assignment of the given session.
///
/// Deletes the student's auto-generated absence only if no attachment to any
/// assignment of the session remains; a student assigned through a second
/// assignment keeps their record.
pub async fn handle_relacio_detached<C>(
    db: &C,
    forgatas_id: i64,
    diak_id: i64,
) -> Result<SyncOutcome>
where
    C: ConnectionTrait,
{
    if is_student_attached(db, forgatas_id, diak_id).await? {
        return Ok(SyncOutcome::Unchanged);
    }

    let deleted = Absence::delete_many()
        .filter(absence::Column::DiakId.eq(diak_id))
        .filter(absence::Column::ForgatasId.eq(forgatas_id))
        .filter(absence::Column::AutoGenerated.eq(true))
        .exec(db)
        .await?;

    if deleted.rows_affected == 0 {
        return Ok(SyncOutcome::Unchanged);
    }

    debug!(forgatas_id, diak_id, "deleted auto-generated absence");
    Ok(SyncOutcome::Deleted)
}

/// Handles a session's date or time range changing.
///
/// With a date set, rewrites date/time/affected-periods on every auto-generated
/// absence of the session in place; the excused/unexcused decisions are never
/// touched. With the date cleared, the session is no longer trackable and its
/// auto-generated absences are deleted.
pub async fn handle_forgatas_retimed<C>(
    db: &C,
    forgatas: &crate::entities::ForgatasModel,
) -> Result<RetimeResult>
where
    C: ConnectionTrait,
{
    let Some(date) = forgatas.date else {
        let deleted = Absence::delete_many()
            .filter(absence::Column::ForgatasId.eq(forgatas.id))
            .filter(absence::Column::AutoGenerated.eq(true))
            .exec(db)
            .await?;
        debug!(
            forgatas_id = forgatas.id,
            deleted = deleted.rows_affected,
            "session date cleared, removed auto-generated absences"
        );
        return Ok(RetimeResult {
            updated: 0,
            deleted: deleted.rows_affected as usize,
        });
    };

    let ordinals = affected_periods(forgatas.time_from, forgatas.time_to);
    let encoded = encode_periods(&ordinals);

    let records = Absence::find()
        .filter(absence::Column::ForgatasId.eq(forgatas.id))
        .filter(absence::Column::AutoGenerated.eq(true))
        .all(db)
        .await?;

    let mut updated = 0;
    for record in records {
        let mut active: absence::ActiveModel = record.into();
        active.date = Set(date);
        active.time_from = Set(forgatas.time_from);
        active.time_to = Set(forgatas.time_to);
        active.affected_periods = Set(encoded.clone());
        active.update(db).await?;
        updated += 1;
    }

    debug!(
        forgatas_id = forgatas.id,
        updated, "recomputed absences after retiming"
    );
    Ok(RetimeResult { updated, deleted: 0 })
}
