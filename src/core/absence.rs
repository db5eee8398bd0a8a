//! Absence decision writes and review queries.
//!
//! The class-teacher review surface reads absences and writes only the
//! excused/unexcused decision pair. Date, time, and affected-periods fields
//! belong to the synchronization engine and are never writable here. Setting
//! both decision flags at once is rejected at this boundary; the engine itself
//! never produces that state.

use crate::core::periods::decode_periods;
use crate::entities::{Absence, absence};
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, QueryOrder, Set, prelude::*};

/// Decision state of an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionStatus {
    /// The class teacher excused the absence
    Excused,
    /// The class teacher marked the absence unexcused
    Unexcused,
    /// No decision has been made yet
    Undecided,
}

/// Returns the decision state of an absence record.
#[must_use]
pub const fn status(record: &absence::Model) -> DecisionStatus {
    match (record.excused, record.unexcused) {
        (true, false) => DecisionStatus::Excused,
        (false, true) => DecisionStatus::Unexcused,
        _ => DecisionStatus::Undecided,
    }
}

/// Returns the decoded affected period ordinals of an absence record.
#[must_use]
pub fn affected_period_ordinals(record: &absence::Model) -> Vec<u8> {
    decode_periods(&record.affected_periods)
}

/// Writes the excused/unexcused decision pair on an absence.
///
/// Both flags true is an invariant violation and is rejected; both false
/// returns the record to the undecided state. Nothing else on the record is
/// touched.
pub async fn set_decision(
    db: &DatabaseConnection,
    absence_id: i64,
    excused: bool,
    unexcused: bool,
) -> Result<absence::Model> {
    if excused && unexcused {
        return Err(Error::InvalidDecision);
    }

    let record = Absence::find_by_id(absence_id)
        .one(db)
        .await?
        .ok_or(Error::AbsenceNotFound { id: absence_id })?;

    let mut active: absence::ActiveModel = record.into();
    active.excused = Set(excused);
    active.unexcused = Set(unexcused);
    active.update(db).await.map_err(Into::into)
}

/// Returns an absence to the undecided state.
pub async fn clear_decision(db: &DatabaseConnection, absence_id: i64) -> Result<absence::Model> {
    set_decision(db, absence_id, false, false).await
}

/// Finds an absence by its unique ID.
pub async fn get_absence_by_id(db: &DatabaseConnection, absence_id: i64) -> Result<absence::Model> {
    Absence::find_by_id(absence_id)
        .one(db)
        .await?
        .ok_or(Error::AbsenceNotFound { id: absence_id })
}

/// Finds a student's auto-generated absence for a session, if any.
pub async fn get_auto_absence<C>(
    db: &C,
    diak_id: i64,
    forgatas_id: i64,
) -> Result<Option<absence::Model>>
where
    C: ConnectionTrait,
{
    Absence::find()
        .filter(absence::Column::DiakId.eq(diak_id))
        .filter(absence::Column::ForgatasId.eq(forgatas_id))
        .filter(absence::Column::AutoGenerated.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns all absences of a session.
pub async fn get_absences_for_forgatas<C>(
    db: &C,
    forgatas_id: i64,
) -> Result<Vec<absence::Model>>
where
    C: ConnectionTrait,
{
    Absence::find()
        .filter(absence::Column::ForgatasId.eq(forgatas_id))
        .order_by_asc(absence::Column::DiakId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns all absences of a student, newest first.
pub async fn get_absences_for_student(
    db: &DatabaseConnection,
    diak_id: i64,
) -> Result<Vec<absence::Model>> {
    Absence::find()
        .filter(absence::Column::DiakId.eq(diak_id))
        .order_by_desc(absence::Column::Date)
        .order_by_desc(absence::Column::TimeFrom)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Returns all absences in a date range (inclusive), for the review surface.
pub async fn get_absences_in_range(
    db: &DatabaseConnection,
    from_date: NaiveDate,
    to_date: NaiveDate,
) -> Result<Vec<absence::Model>> {
    Absence::find()
        .filter(absence::Column::Date.gte(from_date))
        .filter(absence::Column::Date.lte(to_date))
        .order_by_asc(absence::Column::Date)
        .order_by_asc(absence::Column::TimeFrom)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_set_decision_rejects_both_flags() -> Result<()> {
        let db = setup_test_db().await?;
        let forgatas = create_test_forgatas(&db, "Shoot").await?;
        let beosztas_row = create_test_beosztas(&db, forgatas.id).await?;
        attach_student(&db, beosztas_row.id, 11).await?;
        let record = get_auto_absence(&db, 11, forgatas.id).await?.unwrap();

        let result = set_decision(&db, record.id, true, true).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidDecision));

        // The record is untouched by the rejected write
        let unchanged = get_absence_by_id(&db, record.id).await?;
        assert_eq!(status(&unchanged), DecisionStatus::Undecided);

        Ok(())
    }

    #[tokio::test]
    async fn test_decision_life_cycle() -> Result<()> {
        let db = setup_test_db().await?;
        let forgatas = create_test_forgatas(&db, "Shoot").await?;
        let beosztas_row = create_test_beosztas(&db, forgatas.id).await?;
        attach_student(&db, beosztas_row.id, 11).await?;
        let record = get_auto_absence(&db, 11, forgatas.id).await?.unwrap();
        assert_eq!(status(&record), DecisionStatus::Undecided);

        let excused = set_decision(&db, record.id, true, false).await?;
        assert_eq!(status(&excused), DecisionStatus::Excused);

        let unexcused = set_decision(&db, record.id, false, true).await?;
        assert_eq!(status(&unexcused), DecisionStatus::Unexcused);

        let cleared = clear_decision(&db, record.id).await?;
        assert_eq!(status(&cleared), DecisionStatus::Undecided);

        Ok(())
    }

    #[tokio::test]
    async fn test_decision_does_not_touch_derived_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let forgatas = create_test_forgatas(&db, "Shoot").await?;
        let beosztas_row = create_test_beosztas(&db, forgatas.id).await?;
        attach_student(&db, beosztas_row.id, 11).await?;
        let before = get_auto_absence(&db, 11, forgatas.id).await?.unwrap();

        let after = set_decision(&db, before.id, true, false).await?;
        assert_eq!(after.date, before.date);
        assert_eq!(after.time_from, before.time_from);
        assert_eq!(after.time_to, before.time_to);
        assert_eq!(after.affected_periods, before.affected_periods);
        assert!(after.auto_generated);

        Ok(())
    }

    #[tokio::test]
    async fn test_set_decision_missing_record() -> Result<()> {
        let db = setup_test_db().await?;

        let result = set_decision(&db, 999, true, false).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::AbsenceNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_absences_in_range() -> Result<()> {
        let db = setup_test_db().await?;

        let monday = create_custom_forgatas(&db, "Monday shoot", Some(d(2026, 3, 2))).await?;
        let friday = create_custom_forgatas(&db, "Friday shoot", Some(d(2026, 3, 6))).await?;
        let later = create_custom_forgatas(&db, "Next month", Some(d(2026, 4, 1))).await?;

        for forgatas in [&monday, &friday, &later] {
            let beosztas_row = create_test_beosztas(&db, forgatas.id).await?;
            attach_student(&db, beosztas_row.id, 11).await?;
        }

        let week = get_absences_in_range(&db, d(2026, 3, 2), d(2026, 3, 8)).await?;
        assert_eq!(week.len(), 2);
        assert_eq!(week[0].forgatas_id, monday.id);
        assert_eq!(week[1].forgatas_id, friday.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_absences_for_student_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        let early = create_custom_forgatas(&db, "Early", Some(d(2026, 3, 2))).await?;
        let late = create_custom_forgatas(&db, "Late", Some(d(2026, 3, 9))).await?;
        for forgatas in [&early, &late] {
            let beosztas_row = create_test_beosztas(&db, forgatas.id).await?;
            attach_student(&db, beosztas_row.id, 11).await?;
        }

        let records = get_absences_for_student(&db, 11).await?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].forgatas_id, late.id);
        assert_eq!(records[1].forgatas_id, early.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_affected_period_ordinals_helper() -> Result<()> {
        let db = setup_test_db().await?;
        let forgatas = create_test_forgatas(&db, "Shoot").await?;
        let beosztas_row = create_test_beosztas(&db, forgatas.id).await?;
        attach_student(&db, beosztas_row.id, 11).await?;

        let record = get_auto_absence(&db, 11, forgatas.id).await?.unwrap();
        assert_eq!(affected_period_ordinals(&record), vec![6, 7, 8]);

        Ok(())
    }
}
