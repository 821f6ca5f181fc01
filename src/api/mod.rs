//! Внешнее представление стола.
//!
//! - DTO (dto.rs): то, что уходит клиенту;
//! - проекция (projection.rs): скрытие чужих карт для конкретного зрителя.

pub mod dto;
pub mod projection;

pub use dto::*;
pub use projection::project;
