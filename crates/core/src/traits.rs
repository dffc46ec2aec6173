//! Core traits for the donation admin client
//!
//! This module defines the behaviour shared by payloads (local validation
//! before any request leaves the process) and by mirrored records (stable
//! identity used by the state containers to merge responses).

use crate::error::AdminResult;
use std::fmt::{Debug, Display};
use std::hash::Hash;

// ============================================================================
// Validatable Trait
// ============================================================================

/// Trait for types that can be validated
///
/// Types implementing this trait can check their internal consistency
/// and return validation errors if the state is invalid.
///
/// # Example
///
/// ```rust,ignore
/// use donation_core::{AdminError, AdminResult, Validatable};
///
/// struct Login {
///     username: String,
/// }
///
/// impl Validatable for Login {
///     fn validate(&self) -> AdminResult<()> {
///         if self.username.is_empty() {
///             return Err(AdminError::validation("Username is required"));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validatable {
    /// Validate the current state of the object
    ///
    /// Returns `Ok(())` if valid, or an `AdminError` describing the problem.
    fn validate(&self) -> AdminResult<()>;
}

// ============================================================================
// Identified Trait
// ============================================================================

/// A backend-owned record with a server-assigned identity
///
/// State containers merge create/update/delete responses into their cached
/// collection by comparing `id()` values, so every entity must expose exactly
/// one identity type.
pub trait Identified {
    /// Identity type of the record
    type Id: Copy + Eq + Hash + Display + Debug + Send + Sync + 'static;

    /// Human-readable entity name used in logs and errors
    const KIND: &'static str;

    /// Identity of this record
    fn id(&self) -> Self::Id;
}

