//! Reactive accessor services.
//!
//! # Responsibility
//! - Hold the latest projected snapshot per entity kind or view.
//! - Expose snapshots through observable `Signal`s.
//! - Offer explicit refresh and narrow write-through mutations.
//!
//! # Invariants
//! - Constructors run the first load; a failure leaves the state `Empty`.
//! - Independent service instances never invalidate each other.

pub mod accessor;
pub mod project_service;
pub mod reference_service;
pub mod signal;
pub mod task_history_service;
pub mod task_service;
pub mod user_service;
