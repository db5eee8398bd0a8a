//! Beosztas entity - Represents an assignment grouping students to a session.
//!
//! Membership lives in the `beosztas_szerepkor` join table; the `kesz` flag
//! distinguishes drafts from finalized assignments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Assignment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "beosztas")]
pub struct Model {
    /// Unique identifier for the assignment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the session this assignment belongs to
    pub forgatas_id: i64,
    /// Finalized flag - false means the assignment is still a draft
    pub kesz: bool,
    /// Owning school year (e.g., "2025/2026")
    pub tanev: String,
    /// When the assignment was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Beosztas and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each assignment belongs to one session
    #[sea_orm(
        belongs_to = "super::forgatas::Entity",
        from = "Column::ForgatasId",
        to = "super::forgatas::Column::Id"
    )]
    Forgatas,
    /// One assignment has many role-relation attachments
    #[sea_orm(has_many = "super::beosztas_szerepkor::Entity")]
    Attachments,
}

impl Related<super::forgatas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forgatas.def()
    }
}

impl Related<super::beosztas_szerepkor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
