//! Domain model for the project management data layer.
//!
//! # Responsibility
//! - Define stored entity records (`entity`) and their write-time validation.
//! - Define read-facing response shapes (`dto`) returned by the backend.
//!
//! # Invariants
//! - Entities reference each other by numeric id only.
//! - DTOs never carry a user password.

pub mod dto;
pub mod entity;
