// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Layout validation for candidate stacks
//!
//! The validator is a pure function over a snapshot of one yard: it never
//! mutates anything and never fails. Every rule is checked so the caller sees
//! all problems of a candidate at once.

use crate::pairing;
use crate::types::{ContainerSize, Section, Stack, ValidationResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum rows per stack
pub const MAX_ROWS: u32 = 10;
/// Maximum tier height per stack
pub const MAX_TIERS: u32 = 8;
/// Rows above this raise an accessibility warning
pub const ROWS_WARNING_THRESHOLD: u32 = 6;
/// Tiers above this raise a safety warning
pub const TIERS_WARNING_THRESHOLD: u32 = 5;

/// Tunable layout rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutRules {
    /// Treat footprints that only share an edge as overlapping
    pub touching_edges_conflict: bool,
    /// X of the first stack placed in an empty section
    pub placement_origin_x: f64,
    /// Y of the first stack placed in an empty section
    pub placement_origin_y: f64,
    /// Gap left between a new stack and its left neighbour
    pub placement_spacing: f64,
}

impl Default for LayoutRules {
    fn default() -> Self {
        Self {
            touching_edges_conflict: true,
            placement_origin_x: 20.0,
            placement_origin_y: 20.0,
            placement_spacing: 20.0,
        }
    }
}

/// Active sections and stacks of one yard at a point in time
#[derive(Debug, Clone, Default)]
pub struct YardSnapshot {
    /// Yard the snapshot belongs to
    pub yard_id: String,
    /// Active sections
    pub sections: Vec<Section>,
    /// Active stacks
    pub stacks: Vec<Stack>,
}

impl YardSnapshot {
    /// Copy of the snapshot with `stack` replacing the record with the same ID
    #[must_use]
    pub fn replacing(&self, stack: &Stack) -> Self {
        let mut next = self.clone();
        match next.stacks.iter_mut().find(|s| s.id == stack.id) {
            Some(existing) => *existing = stack.clone(),
            None => next.stacks.push(stack.clone()),
        }
        next
    }

    /// Active stack with a given number
    #[must_use]
    pub fn stack_by_number(&self, stack_number: u32) -> Option<&Stack> {
        self.stacks
            .iter()
            .find(|s| s.is_active && s.stack_number == stack_number)
    }

    /// Active section by ID
    #[must_use]
    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.id == section_id && s.is_active && s.yard_id == self.yard_id)
    }
}

/// How a candidate reached the validator
#[derive(Debug, Clone, Copy)]
pub enum ValidationMode<'a> {
    /// Direct single create
    Create,
    /// Update of an existing stack; `previous` is the stored record
    Update {
        /// Record before the patch
        previous: &'a Stack,
    },
    /// Size propagation onto a pairing partner; pairing is not re-checked
    Paired {
        /// Partner record before the change
        previous: &'a Stack,
    },
    /// Generator output; sizes are pre-assigned so pairing is not checked
    Bulk,
}

impl<'a> ValidationMode<'a> {
    fn previous(&self) -> Option<&'a Stack> {
        match self {
            Self::Update { previous } | Self::Paired { previous } => Some(previous),
            Self::Create | Self::Bulk => None,
        }
    }
}

/// Checks candidate stacks against the layout rules
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: LayoutRules,
}

impl Validator {
    /// Create a validator with the given rules
    #[must_use]
    pub fn new(rules: LayoutRules) -> Self {
        Self { rules }
    }

    /// Rules in effect
    #[must_use]
    pub fn rules(&self) -> &LayoutRules {
        &self.rules
    }

    /// Validate a candidate against a yard snapshot
    #[must_use]
    pub fn validate(
        &self,
        snapshot: &YardSnapshot,
        candidate: &Stack,
        mode: ValidationMode<'_>,
    ) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let previous = mode.previous();
        let others: Vec<&Stack> = snapshot
            .stacks
            .iter()
            .filter(|s| s.is_active && s.id != candidate.id)
            .filter(|s| previous.map_or(true, |p| s.id != p.id))
            .collect();

        Self::check_structure(candidate, &mut errors);

        if snapshot.section(&candidate.section_id).is_none() {
            errors.push(format!(
                "Section {} does not exist in this yard",
                candidate.section_id
            ));
        }

        if others.iter().any(|s| s.stack_number == candidate.stack_number) {
            errors.push(format!(
                "Stack number {} already exists in this yard",
                candidate.stack_number
            ));
        }

        self.check_overlap(candidate, &others, &mut errors);
        Self::check_size(candidate, &others, mode, &mut errors);

        if candidate.rows > ROWS_WARNING_THRESHOLD {
            warnings.push(format!(
                "More than {ROWS_WARNING_THRESHOLD} rows may impact accessibility"
            ));
        }
        if candidate.max_tiers > TIERS_WARNING_THRESHOLD {
            warnings.push(format!(
                "More than {TIERS_WARNING_THRESHOLD} tiers may impact safety and accessibility"
            ));
        }

        debug!(
            stack = candidate.stack_number,
            errors = errors.len(),
            warnings = warnings.len(),
            "validated stack candidate"
        );

        ValidationResult::new(errors, warnings)
    }

    fn check_structure(candidate: &Stack, errors: &mut Vec<String>) {
        if candidate.stack_number == 0 {
            errors.push("Stack number must be greater than 0".into());
        }
        if !(1..=MAX_ROWS).contains(&candidate.rows) {
            errors.push(format!("Rows must be between 1 and {MAX_ROWS}"));
        }
        if !(1..=MAX_TIERS).contains(&candidate.max_tiers) {
            errors.push(format!("Max tiers must be between 1 and {MAX_TIERS}"));
        }
        // NaN fails both comparisons, so test the positive case
        if !(candidate.dimensions.width > 0.0 && candidate.dimensions.width.is_finite()) {
            errors.push("Width must be greater than 0".into());
        }
        if !(candidate.dimensions.length > 0.0 && candidate.dimensions.length.is_finite()) {
            errors.push("Length must be greater than 0".into());
        }
        let p = candidate.position;
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            errors.push("Position coordinates must be finite numbers".into());
        }
        if candidate
            .assigned_client_code
            .as_deref()
            .is_some_and(|c| c.trim().is_empty())
        {
            errors.push("Assigned client code must not be blank".into());
        }
    }

    fn check_overlap(&self, candidate: &Stack, others: &[&Stack], errors: &mut Vec<String>) {
        let footprint = candidate.footprint();
        let mut conflicts: Vec<u32> = others
            .iter()
            .filter(|s| {
                s.footprint()
                    .overlaps(&footprint, self.rules.touching_edges_conflict)
            })
            .map(|s| s.stack_number)
            .collect();

        if conflicts.is_empty() {
            return;
        }
        conflicts.sort_unstable();
        let numbers: Vec<String> = conflicts.iter().map(ToString::to_string).collect();
        errors.push(format!(
            "Stack position overlaps with existing stack(s): {}",
            numbers.join(", ")
        ));
    }

    fn check_size(
        candidate: &Stack,
        others: &[&Stack],
        mode: ValidationMode<'_>,
        errors: &mut Vec<String>,
    ) {
        let size = candidate.container_size;

        if candidate.is_special_stack && size != ContainerSize::Twenty {
            errors.push(format!(
                "Stack {} is a special stack and is restricted to 20ft containers",
                candidate.stack_number
            ));
            return;
        }

        let previous = mode.previous();
        if let Some(prev) = previous {
            if candidate.current_occupancy > 0 && !size.covers(prev.container_size) {
                errors.push(format!(
                    "Stack {} holds containers that a {} assignment would not accept (currently {})",
                    candidate.stack_number, size, prev.container_size
                ));
            }
        }

        // Only a new stack, or an update touching number, size or the
        // special flag, can change which pair a stack belongs to
        let (pairing_changed, renumbered) = match mode {
            ValidationMode::Create => (true, true),
            ValidationMode::Update { previous } => (
                previous.pairing_differs(candidate),
                previous.stack_number != candidate.stack_number,
            ),
            ValidationMode::Paired { .. } | ValidationMode::Bulk => (false, false),
        };
        if !pairing_changed || candidate.is_special_stack {
            return;
        }

        let partner_number = pairing::partner_of(candidate.stack_number);
        let partner = partner_number.and_then(|n| others.iter().find(|s| s.stack_number == n));

        if !size.requires_pairing() {
            // A 20ft stack must not join a pair that already carries 40ft
            let carries_forty = |p: &&&Stack| renumbered && p.container_size.requires_pairing();
            if let Some(partner) = partner.filter(carries_forty) {
                errors.push(format!(
                    "Pairing partner stack {} is assigned {}; stack {} must match",
                    partner.stack_number, partner.container_size, candidate.stack_number
                ));
            }
            return;
        }

        let Some(partner_number) = partner_number else {
            errors.push(format!(
                "Stack {} has no valid pairing partner for 40ft assignment",
                candidate.stack_number
            ));
            return;
        };

        match partner {
            None => errors.push(format!(
                "Pairing partner stack {partner_number} is not present in this yard"
            )),
            Some(partner) if partner.is_special_stack => errors.push(format!(
                "Pairing partner stack {partner_number} is a special stack"
            )),
            Some(partner)
                if partner.current_occupancy > 0 && !size.covers(partner.container_size) =>
            {
                errors.push(format!(
                    "Pairing partner stack {partner_number} holds containers incompatible with {size} (currently {})",
                    partner.container_size
                ));
            }
            Some(_) => {}
        }
    }
}
