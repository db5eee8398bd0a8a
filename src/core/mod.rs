//! Core business logic module - Framework-agnostic operations.
//!
//! This module contains all business logic for absence tracking, separated from
//! any transport or UI concerns. The mutation operations call the sync-engine
//! handlers explicitly, inside their own transactions; there are no hidden
//! model-change triggers anywhere.

/// Absence decision writes and review queries
pub mod absence;
/// Assignment (beosztas) operations and role-relation attachment
pub mod assignment;
/// Filming session (forgatas) operations
pub mod forgatas;
/// Bell schedule and period overlap computation
pub mod periods;
/// Bulk resync pass for consistency repair
pub mod resync;
/// Event-driven absence synchronization engine
pub mod sync;
