//! Error types and error handling for the front end.
//!
//! This module defines the error type shared by every stage. It includes:
//!
//! - Error structures with source span and node information
//! - Lexing and parsing variants
//! - The semantic error taxonomy reported by the type checker
//! - Helpful error messages used by the diagnostic renderer

pub mod errors;
