//! `BeosztasSzerepkor` entity - Attachment of a role relation to an assignment.
//!
//! Explicit join rows with their own identity make "is this student still
//! attached to this session via any path" a plain query instead of implicit
//! many-to-many cascade behavior.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Assignment-to-relation attachment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "beosztas_szerepkor")]
pub struct Model {
    /// Unique identifier for the attachment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the assignment
    pub beosztas_id: i64,
    /// ID of the attached role relation
    pub relacio_id: i64,
}

/// Defines relationships between `BeosztasSzerepkor` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each attachment belongs to one assignment
    #[sea_orm(
        belongs_to = "super::beosztas::Entity",
        from = "Column::BeosztasId",
        to = "super::beosztas::Column::Id"
    )]
    Beosztas,
    /// Each attachment points at one role relation
    #[sea_orm(
        belongs_to = "super::szerepkor_relacio::Entity",
        from = "Column::RelacioId",
        to = "super::szerepkor_relacio::Column::Id"
    )]
    Relacio,
}

impl Related<super::beosztas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Beosztas.def()
    }
}

impl Related<super::szerepkor_relacio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Relacio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
