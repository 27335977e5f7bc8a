// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for the registry, the generator and the store

use thiserror::Error;

/// Rule violations reported by the validator, with its advisory warnings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .errors.join("; "))]
pub struct ValidationFailure {
    /// Every violated rule, in check order
    pub errors: Vec<String>,
    /// Advisory notes gathered in the same pass
    pub warnings: Vec<String>,
}

/// Errors raised by [`crate::registry::StackRegistry`] operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The candidate broke one or more layout rules
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    /// Delete attempted on a stack that still holds containers
    #[error("stack {stack_number} holds {occupancy} container(s); move them before deleting")]
    OccupiedStack {
        /// Stack number
        stack_number: u32,
        /// Containers still in the stack
        occupancy: u32,
    },

    /// Occupancy would exceed capacity
    #[error("stack {stack_number} would hold {occupancy} container(s) but its capacity is {capacity}")]
    CapacityViolation {
        /// Stack number
        stack_number: u32,
        /// Requested or current occupancy
        occupancy: u32,
        /// Capacity after the change
        capacity: u32,
    },

    /// No yard with this ID
    #[error("yard not found: {0}")]
    YardNotFound(String),

    /// No active stack with this ID in the yard
    #[error("stack not found: {0}")]
    StackNotFound(String),

    /// Persistence failure, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fatal preconditions for a generation batch; nothing is created
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The target yard has no active sections to place stacks in
    #[error("yard {0} has no active sections")]
    NoSections(String),

    /// The clone source has no active stacks
    #[error("source yard {0} has no active stacks to clone")]
    SourceYardEmpty(String),

    /// Grid parameters cannot produce a layout
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// The grid names a section the target yard does not have
    #[error("section not found: {0}")]
    SectionNotFound(String),

    /// Lookup or persistence failure from the registry
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors raised by a [`crate::store::StackStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record references a yard the store does not hold
    #[error("unknown yard: {0}")]
    UnknownYard(String),

    /// A record with this ID already exists
    #[error("duplicate id: {0}")]
    DuplicateId(String),
}

impl RegistryError {
    /// The validation failure, if this is one
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Validation(failure) => Some(failure),
            _ => None,
        }
    }
}
