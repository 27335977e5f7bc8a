// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Stack registry - the authoritative set of stacks per yard
//!
//! Every mutation validates against a fresh snapshot of the yard and then
//! commits through the store in one batch. Mutations take `&mut self`, so a
//! validate-then-write sequence cannot interleave with another writer on the
//! same registry; share a registry across threads behind a `Mutex`.

use crate::error::{RegistryError, ValidationFailure};
use crate::pairing;
use crate::store::StackStore;
use crate::types::{
    AuditMeta, ContainerSize, NewStack, Position, SectionSummary, Stack, StackPatch,
    ValidationResult, YardSummary,
};
use crate::validator::{LayoutRules, ValidationMode, Validator, YardSnapshot};
use chrono::Utc;
use tracing::{info, warn};

/// ID used for candidates that have not been stored yet
const CANDIDATE_ID: &str = "stack:candidate";

/// Registry of stacks backed by a [`StackStore`]
#[derive(Debug)]
pub struct StackRegistry<S> {
    store: S,
    validator: Validator,
    operator: String,
}

impl<S: StackStore> StackRegistry<S> {
    /// Create a registry over a store
    #[must_use]
    pub fn new(store: S, rules: LayoutRules) -> Self {
        Self {
            store,
            validator: Validator::new(rules),
            operator: "system".into(),
        }
    }

    /// Name stamped into audit fields
    #[must_use]
    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// The underlying store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store (yard and section setup)
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give the store back
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// The validator in use
    #[must_use]
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Active sections and stacks of a yard
    pub fn snapshot(&self, yard_id: &str) -> Result<YardSnapshot, RegistryError> {
        self.require_yard(yard_id)?;
        Ok(YardSnapshot {
            yard_id: yard_id.to_string(),
            sections: self.store.active_sections(yard_id)?,
            stacks: self.store.active_stacks(yard_id)?,
        })
    }

    /// All active stacks of a yard, ordered by stack number
    pub fn list_stacks(&self, yard_id: &str) -> Result<Vec<Stack>, RegistryError> {
        self.require_yard(yard_id)?;
        let mut stacks = self.store.active_stacks(yard_id)?;
        stacks.sort_by_key(|s| s.stack_number);
        Ok(stacks)
    }

    /// Active stack by ID
    pub fn get_stack(&self, yard_id: &str, stack_id: &str) -> Result<Option<Stack>, RegistryError> {
        self.require_yard(yard_id)?;
        Ok(self
            .store
            .stack(stack_id)?
            .filter(|s| s.yard_id == yard_id && s.is_active))
    }

    /// Active stack by number
    pub fn find_by_number(
        &self,
        yard_id: &str,
        stack_number: u32,
    ) -> Result<Option<Stack>, RegistryError> {
        self.require_yard(yard_id)?;
        Ok(self
            .store
            .active_stacks(yard_id)?
            .into_iter()
            .find(|s| s.stack_number == stack_number))
    }

    /// Validate a create without committing anything
    pub fn validate_candidate(
        &self,
        yard_id: &str,
        section_id: &str,
        candidate: &NewStack,
    ) -> Result<ValidationResult, RegistryError> {
        let snapshot = self.snapshot(yard_id)?;
        let stack = self.materialize(yard_id, section_id, candidate, CANDIDATE_ID.into());
        Ok(self
            .validator
            .validate(&snapshot, &stack, ValidationMode::Create))
    }

    /// Create a stack after validating it
    pub fn create_stack(
        &mut self,
        yard_id: &str,
        section_id: &str,
        candidate: NewStack,
    ) -> Result<Stack, RegistryError> {
        self.insert(yard_id, section_id, &candidate, false)
    }

    /// Validate and commit one new stack. Bulk inserts skip the pairing rule
    /// and never touch a partner.
    pub(crate) fn insert(
        &mut self,
        yard_id: &str,
        section_id: &str,
        candidate: &NewStack,
        bulk: bool,
    ) -> Result<Stack, RegistryError> {
        let snapshot = self.snapshot(yard_id)?;
        let id = self.allocate_id(yard_id)?;
        let stack = self.materialize(yard_id, section_id, candidate, id);

        let mode = if bulk {
            ValidationMode::Bulk
        } else {
            ValidationMode::Create
        };
        let result = self.validator.validate(&snapshot, &stack, mode);
        Self::ensure_valid(result, stack.stack_number)?;

        let mut batch = vec![stack.clone()];
        if !bulk {
            batch.extend(self.partner_sync(&snapshot, &stack, None)?);
        }

        self.store.commit(batch)?;
        info!(
            yard = %yard_id,
            stack = stack.stack_number,
            capacity = stack.capacity,
            "created stack"
        );
        Ok(stack)
    }

    /// Merge a patch into a stack, re-validate and commit.
    ///
    /// A size, number or special-flag change on a paired stack is committed
    /// together with the partners' matching changes, or not at all.
    pub fn update_stack(
        &mut self,
        yard_id: &str,
        stack_id: &str,
        patch: &StackPatch,
    ) -> Result<Stack, RegistryError> {
        let existing = self
            .get_stack(yard_id, stack_id)?
            .ok_or_else(|| RegistryError::StackNotFound(stack_id.to_string()))?;

        if patch.is_empty() {
            return Ok(existing);
        }

        let snapshot = self.snapshot(yard_id)?;
        let mut merged = patch.apply_to(&existing);

        let result = self.validator.validate(
            &snapshot,
            &merged,
            ValidationMode::Update {
                previous: &existing,
            },
        );
        Self::ensure_valid(result, merged.stack_number)?;

        if merged.current_occupancy > merged.capacity {
            return Err(RegistryError::CapacityViolation {
                stack_number: merged.stack_number,
                occupancy: merged.current_occupancy,
                capacity: merged.capacity,
            });
        }

        merged.audit.touch(&self.operator, Utc::now());

        let mut batch = vec![merged.clone()];
        for partner in self.partner_sync(&snapshot, &merged, Some(&existing))? {
            info!(
                yard = %yard_id,
                stack = merged.stack_number,
                partner = partner.stack_number,
                size = %partner.container_size,
                "propagating size to pairing partner"
            );
            batch.push(partner);
        }

        self.store.commit(batch)?;
        info!(yard = %yard_id, stack = merged.stack_number, "updated stack");
        Ok(merged)
    }

    /// Soft-delete an empty stack
    pub fn delete_stack(&mut self, yard_id: &str, stack_id: &str) -> Result<(), RegistryError> {
        let mut stack = self
            .get_stack(yard_id, stack_id)?
            .ok_or_else(|| RegistryError::StackNotFound(stack_id.to_string()))?;

        if stack.current_occupancy > 0 {
            return Err(RegistryError::OccupiedStack {
                stack_number: stack.stack_number,
                occupancy: stack.current_occupancy,
            });
        }

        stack.is_active = false;
        stack.audit.touch(&self.operator, Utc::now());
        let number = stack.stack_number;
        self.store.commit(vec![stack])?;
        info!(yard = %yard_id, stack = number, "deleted stack");
        Ok(())
    }

    /// Record the number of containers held by a stack
    pub fn set_occupancy(
        &mut self,
        yard_id: &str,
        stack_id: &str,
        occupancy: u32,
    ) -> Result<Stack, RegistryError> {
        let mut stack = self
            .get_stack(yard_id, stack_id)?
            .ok_or_else(|| RegistryError::StackNotFound(stack_id.to_string()))?;

        if occupancy > stack.capacity {
            return Err(RegistryError::CapacityViolation {
                stack_number: stack.stack_number,
                occupancy,
                capacity: stack.capacity,
            });
        }

        stack.current_occupancy = occupancy;
        stack.audit.touch(&self.operator, Utc::now());
        self.store.commit(vec![stack.clone()])?;
        Ok(stack)
    }

    /// Highest active stack number plus one, or 1 for an empty yard
    pub fn next_stack_number(&self, yard_id: &str) -> Result<u32, RegistryError> {
        self.require_yard(yard_id)?;
        Ok(self
            .store
            .active_stacks(yard_id)?
            .iter()
            .map(|s| s.stack_number)
            .max()
            .map_or(1, |n| n.saturating_add(1)))
    }

    /// Suggested position for the next stack of a section.
    ///
    /// Placement aid only: the result is not checked for overlap.
    pub fn optimal_position(
        &self,
        yard_id: &str,
        section_id: &str,
    ) -> Result<Position, RegistryError> {
        self.require_yard(yard_id)?;
        let rules = self.validator.rules();
        let stacks = self.store.active_stacks(yard_id)?;

        let rightmost = stacks
            .iter()
            .filter(|s| s.section_id == section_id)
            .max_by(|a, b| a.position.x.total_cmp(&b.position.x));

        Ok(match rightmost {
            Some(last) => Position::new(
                last.position.x + last.dimensions.width + rules.placement_spacing,
                last.position.y,
            ),
            None => Position::new(rules.placement_origin_x, rules.placement_origin_y),
        })
    }

    /// Capacity and occupancy totals for a yard
    pub fn yard_summary(&self, yard_id: &str) -> Result<YardSummary, RegistryError> {
        let yard = self.require_yard(yard_id)?;
        let snapshot = self.snapshot(yard_id)?;

        let sections = snapshot
            .sections
            .iter()
            .map(|section| {
                let members: Vec<&Stack> = snapshot
                    .stacks
                    .iter()
                    .filter(|s| s.section_id == section.id)
                    .collect();
                SectionSummary {
                    section_id: section.id.clone(),
                    name: section.name.clone(),
                    stacks: members.len(),
                    capacity: members.iter().map(|s| u64::from(s.capacity)).sum(),
                    occupancy: members.iter().map(|s| u64::from(s.current_occupancy)).sum(),
                }
            })
            .collect();

        Ok(YardSummary {
            yard,
            stacks: snapshot.stacks.len(),
            capacity: snapshot.stacks.iter().map(|s| u64::from(s.capacity)).sum(),
            occupancy: snapshot
                .stacks
                .iter()
                .map(|s| u64::from(s.current_occupancy))
                .sum(),
            sections,
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn require_yard(&self, yard_id: &str) -> Result<crate::types::Yard, RegistryError> {
        self.store
            .yard(yard_id)?
            .ok_or_else(|| RegistryError::YardNotFound(yard_id.to_string()))
    }

    fn allocate_id(&self, yard_id: &str) -> Result<String, RegistryError> {
        let mut sequence = self.store.stack_sequence(yard_id)?;
        loop {
            let id = Stack::generate_id(yard_id, sequence);
            if self.store.stack(&id)?.is_none() {
                return Ok(id);
            }
            sequence += 1;
        }
    }

    fn materialize(
        &self,
        yard_id: &str,
        section_id: &str,
        candidate: &NewStack,
        id: String,
    ) -> Stack {
        let mut stack = Stack {
            kind: "Stack".into(),
            id,
            yard_id: yard_id.to_string(),
            section_id: section_id.to_string(),
            stack_number: candidate.stack_number,
            rows: candidate.rows,
            max_tiers: candidate.max_tiers,
            capacity: 0,
            current_occupancy: 0,
            position: candidate.position,
            dimensions: candidate.dimensions,
            container_size: candidate.container_size,
            is_special_stack: candidate.is_special_stack,
            is_active: true,
            assigned_client_code: candidate.assigned_client_code.clone(),
            audit: AuditMeta::created(&self.operator, Utc::now()),
        };
        stack.recompute_capacity();
        stack
    }

    fn ensure_valid(result: ValidationResult, stack_number: u32) -> Result<(), RegistryError> {
        for warning in &result.warnings {
            warn!(stack = stack_number, "{}", warning);
        }
        if result.is_valid {
            Ok(())
        } else {
            Err(ValidationFailure {
                errors: result.errors,
                warnings: result.warnings,
            }
            .into())
        }
    }

    /// Changes the pairing partners need once `stack` replaces `previous`,
    /// each validated against the yard as it will look after the commit.
    ///
    /// The partner of the stack's number takes over its size. A partner the
    /// stack leaves behind, by renumbering or by turning special, narrows
    /// to 20ft.
    fn partner_sync(
        &self,
        snapshot: &YardSnapshot,
        stack: &Stack,
        previous: Option<&Stack>,
    ) -> Result<Vec<Stack>, RegistryError> {
        if previous.is_some_and(|prev| !prev.pairing_differs(stack)) {
            return Ok(Vec::new());
        }

        let current = if stack.is_special_stack {
            None
        } else {
            pairing::partner_of(stack.stack_number)
        };
        let mut targets = Vec::with_capacity(2);
        if let Some(number) = current {
            targets.push((number, stack.container_size));
        }
        if let Some(prev) = previous {
            let was_paired = !prev.is_special_stack && prev.container_size.requires_pairing();
            let left_behind =
                pairing::partner_of(prev.stack_number).filter(|n| Some(*n) != current);
            if let (true, Some(number)) = (was_paired, left_behind) {
                targets.push((number, ContainerSize::Twenty));
            }
        }

        let mut after = snapshot.replacing(stack);
        let mut changes = Vec::new();
        for (partner_number, size) in targets {
            let Some(partner) = after
                .stacks
                .iter()
                .find(|s| s.id != stack.id && s.stack_number == partner_number)
                .cloned()
            else {
                continue;
            };
            if partner.container_size == size {
                continue;
            }

            let mut updated = partner.clone();
            updated.container_size = size;
            updated.audit.touch(&self.operator, Utc::now());

            let result = self.validator.validate(
                &after,
                &updated,
                ValidationMode::Paired { previous: &partner },
            );
            if !result.is_valid {
                return Err(ValidationFailure {
                    errors: result
                        .errors
                        .into_iter()
                        .map(|e| format!("Pairing partner stack {partner_number}: {e}"))
                        .collect(),
                    warnings: result.warnings,
                }
                .into());
            }

            after = after.replacing(&updated);
            changes.push(updated);
        }

        Ok(changes)
    }
}
