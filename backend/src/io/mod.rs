//! # IO Layer
//!
//! Translation between domain models and the `shared` DTOs that front ends
//! exchange with the backend. No business logic lives here.

pub mod mappers;
