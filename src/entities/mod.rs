//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod absence;
pub mod beosztas;
pub mod beosztas_szerepkor;
pub mod forgatas;
pub mod szerepkor_relacio;

// Re-export specific types to avoid conflicts
pub use absence::{Column as AbsenceColumn, Entity as Absence, Model as AbsenceModel};
pub use beosztas::{Column as BeosztasColumn, Entity as Beosztas, Model as BeosztasModel};
pub use beosztas_szerepkor::{
    Column as BeosztasSzerepkorColumn, Entity as BeosztasSzerepkor, Model as BeosztasSzerepkorModel,
};
pub use forgatas::{Column as ForgatasColumn, Entity as Forgatas, Model as ForgatasModel};
pub use szerepkor_relacio::{
    Column as SzerepkorRelacioColumn, Entity as SzerepkorRelacio, Model as SzerepkorRelacioModel,
};
