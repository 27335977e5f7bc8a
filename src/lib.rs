// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Stackyard library - layout engine for container depot yards
//!
//! This crate keeps the per-yard registry of container stacks, validates
//! every candidate stack against the yard's layout rules, and bulk-generates
//! layouts from a fixed template, an arithmetic grid, or another yard.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod commands;
pub mod config;
pub mod error;
pub mod generator;
pub mod pairing;
pub mod registry;
pub mod store;
pub mod template;
pub mod validator;

/// Core data types for yards, sections and stacks
pub mod types {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use sha2::{Digest, Sha256};

    // =========================================================================
    // Yard and Section
    // =========================================================================

    /// A physical container depot
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Yard {
        /// Always "Yard"
        pub kind: String,
        /// Unique identifier: yard:<code>
        pub id: String,
        /// Short depot code (e.g. "TNT")
        pub code: String,
        /// Display name
        pub name: String,
        /// Declared total capacity in TEU slots
        pub total_capacity: u32,
        /// Inactive yards are hidden from listings
        pub is_active: bool,
    }

    impl Yard {
        /// Build a new active yard with a deterministic ID
        #[must_use]
        pub fn new(code: &str, name: &str, total_capacity: u32) -> Self {
            Self {
                kind: "Yard".into(),
                id: Self::generate_id(code),
                code: code.to_string(),
                name: name.to_string(),
                total_capacity,
                is_active: true,
            }
        }

        /// Generate the ID for a yard code
        #[must_use]
        pub fn generate_id(code: &str) -> String {
            format!("yard:{}", slug(code))
        }
    }

    /// A named zone within a yard
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Section {
        /// Always "Section"
        pub kind: String,
        /// Unique identifier: section:<yard-slug>:<name-slug>
        pub id: String,
        /// Owning yard ID
        pub yard_id: String,
        /// Display name (e.g. "Top Section")
        pub name: String,
        /// Inactive sections cannot receive stacks
        pub is_active: bool,
    }

    impl Section {
        /// Build a new active section for a yard
        #[must_use]
        pub fn new(yard_id: &str, name: &str) -> Self {
            Self {
                kind: "Section".into(),
                id: Self::generate_id(yard_id, name),
                yard_id: yard_id.to_string(),
                name: name.to_string(),
                is_active: true,
            }
        }

        /// Generate the ID for a section name within a yard
        #[must_use]
        pub fn generate_id(yard_id: &str, name: &str) -> String {
            let yard_part = yard_id.strip_prefix("yard:").unwrap_or(yard_id);
            format!("section:{}:{}", yard_part, slug(name))
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Position of a stack's origin corner in yard-plane coordinates
    #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
    pub struct Position {
        /// X coordinate
        pub x: f64,
        /// Y coordinate
        pub y: f64,
        /// Stacking order, only used for visualization
        #[serde(default)]
        pub z: f64,
    }

    impl Position {
        /// Position on the ground plane (z = 0)
        #[must_use]
        pub fn new(x: f64, y: f64) -> Self {
            Self { x, y, z: 0.0 }
        }
    }

    /// Footprint dimensions of a stack
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Dimensions {
        /// Extent along x
        pub width: f64,
        /// Extent along y
        pub length: f64,
    }

    impl Dimensions {
        /// Create dimensions
        #[must_use]
        pub fn new(width: f64, length: f64) -> Self {
            Self { width, length }
        }
    }

    /// Axis-aligned rectangle `[min_x, max_x] × [min_y, max_y]`
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Footprint {
        /// Left edge
        pub min_x: f64,
        /// Top edge
        pub min_y: f64,
        /// Right edge
        pub max_x: f64,
        /// Bottom edge
        pub max_y: f64,
    }

    impl Footprint {
        /// Footprint covered by a position and dimensions
        #[must_use]
        pub fn new(position: Position, dimensions: Dimensions) -> Self {
            Self {
                min_x: position.x,
                min_y: position.y,
                max_x: position.x + dimensions.width,
                max_y: position.y + dimensions.length,
            }
        }

        /// Whether two footprints overlap.
        ///
        /// With `touching_conflicts` the intervals are closed, so rectangles
        /// that only share an edge or a corner count as overlapping.
        #[must_use]
        pub fn overlaps(&self, other: &Self, touching_conflicts: bool) -> bool {
            if touching_conflicts {
                self.min_x <= other.max_x
                    && other.min_x <= self.max_x
                    && self.min_y <= other.max_y
                    && other.min_y <= self.max_y
            } else {
                self.min_x < other.max_x
                    && other.min_x < self.max_x
                    && self.min_y < other.max_y
                    && other.min_y < self.max_y
            }
        }
    }

    // =========================================================================
    // Stack
    // =========================================================================

    /// Container sizes a stack may hold
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub enum ContainerSize {
        /// 20 foot containers only
        #[serde(rename = "20ft")]
        Twenty,
        /// 40 foot containers only
        #[serde(rename = "40ft")]
        Forty,
        /// Either size
        #[serde(rename = "both")]
        Both,
    }

    impl ContainerSize {
        /// Wire/display code
        #[must_use]
        pub fn code(&self) -> &'static str {
            match self {
                Self::Twenty => "20ft",
                Self::Forty => "40ft",
                Self::Both => "both",
            }
        }

        /// Parse from a user-supplied code
        #[must_use]
        pub fn parse(s: &str) -> Option<Self> {
            match s.trim().to_lowercase().as_str() {
                "20" | "20ft" => Some(Self::Twenty),
                "40" | "40ft" => Some(Self::Forty),
                "both" | "any" => Some(Self::Both),
                _ => None,
            }
        }

        /// Whether this size assignment needs an adjacency partner
        #[must_use]
        pub fn requires_pairing(&self) -> bool {
            matches!(self, Self::Forty | Self::Both)
        }

        /// Whether every container accepted by `other` is also accepted here
        #[must_use]
        pub fn covers(&self, other: Self) -> bool {
            *self == Self::Both || *self == other
        }
    }

    impl std::fmt::Display for ContainerSize {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.pad(self.code())
        }
    }

    /// Who touched a record and when
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct AuditMeta {
        /// Creation time
        pub created_at: DateTime<Utc>,
        /// Creator
        pub created_by: String,
        /// Last update time
        pub updated_at: DateTime<Utc>,
        /// Last updater
        pub updated_by: String,
    }

    impl AuditMeta {
        /// Fresh metadata for a new record
        #[must_use]
        pub fn created(by: &str, at: DateTime<Utc>) -> Self {
            Self {
                created_at: at,
                created_by: by.to_string(),
                updated_at: at,
                updated_by: by.to_string(),
            }
        }

        /// Stamp an update
        pub fn touch(&mut self, by: &str, at: DateTime<Utc>) {
            self.updated_at = at;
            self.updated_by = by.to_string();
        }
    }

    /// A rectangular storage slot for containers
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Stack {
        /// Always "Stack"
        pub kind: String,
        /// Unique identifier: stack:<hash>
        pub id: String,
        /// Owning yard ID
        pub yard_id: String,
        /// Section this stack sits in
        pub section_id: String,
        /// Stack number, unique among active stacks of the yard
        pub stack_number: u32,
        /// Number of rows
        pub rows: u32,
        /// Maximum tier height
        pub max_tiers: u32,
        /// Always `rows * max_tiers`
        pub capacity: u32,
        /// Containers currently stored
        pub current_occupancy: u32,
        /// Origin corner
        pub position: Position,
        /// Footprint size
        pub dimensions: Dimensions,
        /// Sizes this stack may hold
        pub container_size: ContainerSize,
        /// Special stacks are 20ft only and never paired
        pub is_special_stack: bool,
        /// Soft-delete flag
        pub is_active: bool,
        /// Client the stack is reserved for, if any
        #[serde(default)]
        pub assigned_client_code: Option<String>,
        /// Audit metadata
        pub audit: AuditMeta,
    }

    impl Stack {
        /// Generate a deterministic ID from the yard and the yard's stack sequence
        #[must_use]
        pub fn generate_id(yard_id: &str, sequence: usize) -> String {
            let mut hasher = Sha256::new();
            hasher.update(yard_id.as_bytes());
            hasher.update(sequence.to_le_bytes());
            let hash = hex::encode(hasher.finalize());
            format!("stack:{}", &hash[..12])
        }

        /// Footprint rectangle of this stack
        #[must_use]
        pub fn footprint(&self) -> Footprint {
            Footprint::new(self.position, self.dimensions)
        }

        /// Recompute capacity from rows and tiers
        pub fn recompute_capacity(&mut self) {
            self.capacity = self.rows.saturating_mul(self.max_tiers);
        }

        /// Free container slots
        #[must_use]
        pub fn available_slots(&self) -> u32 {
            self.capacity.saturating_sub(self.current_occupancy)
        }

        /// Whether `other` differs in a field that decides its pairing:
        /// number, accepted size or the special flag
        #[must_use]
        pub fn pairing_differs(&self, other: &Self) -> bool {
            self.stack_number != other.stack_number
                || self.container_size != other.container_size
                || self.is_special_stack != other.is_special_stack
        }
    }

    /// Payload for creating a stack
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct NewStack {
        /// Stack number
        pub stack_number: u32,
        /// Number of rows
        pub rows: u32,
        /// Maximum tier height
        pub max_tiers: u32,
        /// Origin corner
        pub position: Position,
        /// Footprint size
        pub dimensions: Dimensions,
        /// Sizes the stack may hold
        pub container_size: ContainerSize,
        /// Special (20ft only) stack
        #[serde(default)]
        pub is_special_stack: bool,
        /// Client reservation
        #[serde(default)]
        pub assigned_client_code: Option<String>,
    }

    /// Explicit partial update of a stack; `None` leaves a field unchanged
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct StackPatch {
        /// Move to another section
        pub section_id: Option<String>,
        /// Renumber
        pub stack_number: Option<u32>,
        /// Change rows
        pub rows: Option<u32>,
        /// Change tier height
        pub max_tiers: Option<u32>,
        /// Move
        pub position: Option<Position>,
        /// Resize
        pub dimensions: Option<Dimensions>,
        /// Change the accepted container size
        pub container_size: Option<ContainerSize>,
        /// Mark or unmark as special
        pub is_special_stack: Option<bool>,
        /// `Some(None)` clears the reservation
        pub assigned_client_code: Option<Option<String>>,
    }

    impl StackPatch {
        /// Whether the patch changes nothing
        #[must_use]
        pub fn is_empty(&self) -> bool {
            *self == Self::default()
        }

        /// Produce the merged stack, recomputing capacity.
        ///
        /// Marking a stack special without naming a size narrows it to 20ft.
        #[must_use]
        pub fn apply_to(&self, stack: &Stack) -> Stack {
            let mut merged = stack.clone();
            if let Some(section_id) = &self.section_id {
                merged.section_id.clone_from(section_id);
            }
            if let Some(number) = self.stack_number {
                merged.stack_number = number;
            }
            if let Some(rows) = self.rows {
                merged.rows = rows;
            }
            if let Some(tiers) = self.max_tiers {
                merged.max_tiers = tiers;
            }
            if let Some(position) = self.position {
                merged.position = position;
            }
            if let Some(dimensions) = self.dimensions {
                merged.dimensions = dimensions;
            }
            if let Some(special) = self.is_special_stack {
                merged.is_special_stack = special;
            }
            match self.container_size {
                Some(size) => merged.container_size = size,
                None if merged.is_special_stack => merged.container_size = ContainerSize::Twenty,
                None => {}
            }
            if let Some(client) = &self.assigned_client_code {
                merged.assigned_client_code.clone_from(client);
            }
            merged.recompute_capacity();
            merged
        }
    }

    // =========================================================================
    // Validation and Generation Results
    // =========================================================================

    /// Outcome of validating a candidate stack
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct ValidationResult {
        /// True when `errors` is empty
        pub is_valid: bool,
        /// Blocking rule violations
        pub errors: Vec<String>,
        /// Advisory notes
        pub warnings: Vec<String>,
    }

    impl ValidationResult {
        /// Build a result, deriving `is_valid` from the errors
        #[must_use]
        pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
            Self {
                is_valid: errors.is_empty(),
                errors,
                warnings,
            }
        }
    }

    /// A stack the generator could not create
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct GenerationFailure {
        /// Stack number of the rejected candidate
        pub stack_number: u32,
        /// Why it was rejected
        pub reasons: Vec<String>,
    }

    /// Summary of a bulk generation run
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    pub struct GenerationReport {
        /// Stacks committed to the target yard
        pub created: Vec<Stack>,
        /// Candidates that were skipped
        pub failures: Vec<GenerationFailure>,
        /// Non-fatal notes (e.g. section fallbacks)
        pub warnings: Vec<String>,
    }

    impl GenerationReport {
        /// Number of stacks created
        #[must_use]
        pub fn created_count(&self) -> usize {
            self.created.len()
        }

        /// Number of candidates skipped
        #[must_use]
        pub fn skipped_count(&self) -> usize {
            self.failures.len()
        }
    }

    /// Per-section occupancy totals
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct SectionSummary {
        /// Section ID
        pub section_id: String,
        /// Section name
        pub name: String,
        /// Active stacks in the section
        pub stacks: usize,
        /// Sum of stack capacities
        pub capacity: u64,
        /// Sum of stack occupancies
        pub occupancy: u64,
    }

    /// Yard-wide occupancy totals
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct YardSummary {
        /// The yard
        pub yard: Yard,
        /// Active stacks
        pub stacks: usize,
        /// Sum of stack capacities
        pub capacity: u64,
        /// Sum of stack occupancies
        pub occupancy: u64,
        /// Breakdown by section
        pub sections: Vec<SectionSummary>,
    }

    /// Convert a name to a slug for IDs
    #[must_use]
    pub fn slug(name: &str) -> String {
        name.to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect::<String>()
            .trim_matches('-')
            .to_string()
    }
}

/// Prelude for common imports
pub mod prelude {
    pub use crate::error::{GenerationError, RegistryError, StoreError, ValidationFailure};
    pub use crate::registry::StackRegistry;
    pub use crate::store::{DepotStore, StackStore};
    pub use crate::types::*;
    pub use crate::validator::{LayoutRules, ValidationMode, Validator};
    pub use anyhow::{Context, Result};
}
