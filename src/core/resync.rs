//! Bulk resync pass for consistency repair.
//!
//! Recomputes the entire auto-generated absence set in one pass: for every
//! session with a date, the desired student set is the union over all of its
//! assignments, and the minimal create/update/delete diff is applied to
//! converge. The end state is identical to replaying every individual
//! attach/detach/retime event, without replaying history. Intended for use
//! after data import, migration, or detected drift; running it twice in a row
//! with no intervening changes performs zero mutations on the second run.
//!
//! Manually entered (`auto_generated = false`) records are never touched.

use crate::core::periods::{affected_periods, encode_periods};
use crate::entities::{
    Absence, Beosztas, BeosztasSzerepkor, Forgatas, absence, forgatas,
};
use crate::errors::Result;
use sea_orm::{DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::info;

/// Counts of mutations applied by one resync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResyncSummary {
    /// Absence records created for assigned students that had none
    pub created: usize,
    /// Absence records whose date/time/periods were stale and got rewritten
    pub updated: usize,
    /// Absence records deleted (unassigned students, dateless or missing sessions, duplicates)
    pub deleted: usize,
    /// Absence records that already matched the desired state
    pub unchanged: usize,
}

/// Recomputes the auto-generated absence set from scratch.
///
/// The whole pass runs in one transaction. Decisions on surviving records are
/// preserved; where the 1:1 invariant has been violated by out-of-band edits,
/// the lowest-id record per (student, session) pair is kept and the rest are
/// deleted.
pub async fn resync_absences(db: &DatabaseConnection) -> Result<ResyncSummary> {
    let txn = db.begin().await?;

    let sessions: HashMap<i64, forgatas::Model> = Forgatas::find()
        .all(&txn)
        .await?
        .into_iter()
        .map(|f| (f.id, f))
        .collect();

    let beosztas_to_forgatas: HashMap<i64, i64> = Beosztas::find()
        .all(&txn)
        .await?
        .into_iter()
        .map(|b| (b.id, b.forgatas_id))
        .collect();

    let relacio_to_diak: HashMap<i64, i64> = crate::entities::SzerepkorRelacio::find()
        .all(&txn)
        .await?
        .into_iter()
        .map(|r| (r.id, r.diak_id))
        .collect();

    // Desired state: (diak, forgatas) pairs for every dated session
    let mut desired: BTreeSet<(i64, i64)> = BTreeSet::new();
    for attachment in BeosztasSzerepkor::find().all(&txn).await? {
        let Some(&forgatas_id) = beosztas_to_forgatas.get(&attachment.beosztas_id) else {
            continue;
        };
        let Some(&diak_id) = relacio_to_diak.get(&attachment.relacio_id) else {
            continue;
        };
        let has_date = sessions
            .get(&forgatas_id)
            .is_some_and(|f| f.date.is_some());
        if has_date {
            desired.insert((diak_id, forgatas_id));
        }
    }

    let existing = Absence::find()
        .filter(absence::Column::AutoGenerated.eq(true))
        .order_by_asc(absence::Column::Id)
        .all(&txn)
        .await?;

    let mut summary = ResyncSummary::default();
    let mut seen: HashSet<(i64, i64)> = HashSet::new();

    for record in existing {
        let key = (record.diak_id, record.forgatas_id);

        // Orphans and duplicates go; lowest id wins for duplicates
        if !desired.contains(&key) || seen.contains(&key) {
            Absence::delete_by_id(record.id).exec(&txn).await?;
            summary.deleted += 1;
            continue;
        }
        seen.insert(key);

        // desired membership guarantees the session exists and has a date
        let Some(session) = sessions.get(&record.forgatas_id) else {
            continue;
        };
        let Some(date) = session.date else {
            continue;
        };

        let encoded = encode_periods(&affected_periods(session.time_from, session.time_to));
        if record.date == date
            && record.time_from == session.time_from
            && record.time_to == session.time_to
            && record.affected_periods == encoded
        {
            summary.unchanged += 1;
            continue;
        }

        let mut active: absence::ActiveModel = record.into();
        active.date = Set(date);
        active.time_from = Set(session.time_from);
        active.time_to = Set(session.time_to);
        active.affected_periods = Set(encoded);
        active.update(&txn).await?;
        summary.updated += 1;
    }

    for (diak_id, forgatas_id) in &desired {
        if seen.contains(&(*diak_id, *forgatas_id)) {
            continue;
        }
        let Some(session) = sessions.get(forgatas_id) else {
            continue;
        };
        let Some(date) = session.date else {
            continue;
        };

        let ordinals = affected_periods(session.time_from, session.time_to);
        let record = absence::ActiveModel {
            diak_id: Set(*diak_id),
            forgatas_id: Set(*forgatas_id),
            date: Set(date),
            time_from: Set(session.time_from),
            time_to: Set(session.time_to),
            affected_periods: Set(encode_periods(&ordinals)),
            excused: Set(false),
            unexcused: Set(false),
            auto_generated: Set(true),
            ..Default::default()
        };
        record.insert(&txn).await?;
        summary.created += 1;
    }

    txn.commit().await?;

    info!(
        created = summary.created,
        updated = summary.updated,
        deleted = summary.deleted,
        unchanged = summary.unchanged,
        "bulk absence resync finished"
    );
    Ok(summary)
}

/// Formats a resync summary into a human-readable line for operator output.
#[must_use]
pub fn format_resync_summary(summary: &ResyncSummary) -> String {
    format!(
        "Absence resync - created: {} | updated: {} | deleted: {} | unchanged: {}",
        summary.created, summary.updated, summary.deleted, summary.unchanged
    )
}
