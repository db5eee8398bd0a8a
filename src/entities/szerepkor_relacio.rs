//! `SzerepkorRelacio` entity - Pairs one student with one named role.
//!
//! A relation is unique per (student, role) and may be attached to any number
//! of assignments through the `beosztas_szerepkor` join table. Detaching a
//! relation from one assignment never deletes the relation itself.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role relation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "szerepkor_relacio")]
pub struct Model {
    /// Unique identifier for the relation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Student user ID (user management is external to this crate)
    pub diak_id: i64,
    /// Free-form role name (e.g., "operator")
    pub szerepkor: String,
}

/// Defines relationships between `SzerepkorRelacio` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One relation has many assignment attachments
    #[sea_orm(has_many = "super::beosztas_szerepkor::Entity")]
    Attachments,
}

impl Related<super::beosztas_szerepkor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
