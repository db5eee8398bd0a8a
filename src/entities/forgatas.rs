//! Forgatas entity - Represents a filming session.
//!
//! Each session has a name, an optional date (None while scheduling is still in
//! progress), a time range, a type, and an owning school year. A session with
//! no date is not yet trackable for absence purposes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Filming session database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "forgatas")]
pub struct Model {
    /// Unique identifier for the session
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable name of the session
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Date of the session; None while not yet scheduled
    pub date: Option<Date>,
    /// Start time of the session
    pub time_from: Time,
    /// End time of the session
    pub time_to: Time,
    /// Optional location name
    pub location: Option<String>,
    /// Optional contact person name
    pub contact_person: Option<String>,
    /// Session type: `"rendes"`, `"rendezveny"`, `"kacsa"`, or `"egyeb"`
    pub forg_tipus: String,
    /// Optional link to a related KaCsa session
    pub related_kacsa_id: Option<i64>,
    /// Owning school year (e.g., "2025/2026")
    pub tanev: String,
}

/// Defines relationships between Forgatas and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One session has many assignments
    #[sea_orm(has_many = "super::beosztas::Entity")]
    Beosztasok,
    /// One session has many absence records
    #[sea_orm(has_many = "super::absence::Entity")]
    Absences,
}

impl Related<super::beosztas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Beosztasok.def()
    }
}

impl Related<super::absence::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Absences.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
