//! Absence entity - An automatically tracked attendance exception.
//!
//! One `auto_generated` record exists per (student, session) pair while the
//! student is assigned to the session and the session has a date. The
//! `affected_periods` column is a derived cache of the bell-schedule overlap
//! and is recomputed whenever the session is retimed; it is never edited
//! independently. The two decision flags are written only by the class-teacher
//! review surface and at most one of them may be true.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Absence database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "absence")]
pub struct Model {
    /// Unique identifier for the absence
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student user ID this absence belongs to
    pub diak_id: i64,
    /// ID of the originating session
    pub forgatas_id: i64,
    /// Date of the session at last recomputation
    pub date: Date,
    /// Session start time at last recomputation
    pub time_from: Time,
    /// Session end time at last recomputation
    pub time_to: Time,
    /// Comma-separated affected period ordinals (derived, e.g. "6,7,8")
    pub affected_periods: String,
    /// Class-teacher decision: absence is excused
    pub excused: bool,
    /// Class-teacher decision: absence is unexcused
    pub unexcused: bool,
    /// True for records created by the synchronization engine
    pub auto_generated: bool,
}

/// Defines relationships between Absence and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each absence belongs to one session
    #[sea_orm(
        belongs_to = "super::forgatas::Entity",
        from = "Column::ForgatasId",
        to = "super::forgatas::Column::Id"
    )]
    Forgatas,
}

impl Related<super::forgatas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forgatas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
