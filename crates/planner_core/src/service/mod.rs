//! Core use-case services.
//!
//! # Responsibility
//! - Turn repository calls into the request-level operations the API serves.
//! - Return wire records so transports only map errors to responses.

pub mod curriculum_service;
pub mod note_service;
