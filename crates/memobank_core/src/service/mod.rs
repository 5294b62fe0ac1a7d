//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep transport layers decoupled from storage details.

pub mod memo_service;
