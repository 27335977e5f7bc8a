// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Bulk layout generation: reference template, arithmetic grid, yard clone
//!
//! Every candidate goes through the registry's validation and is committed
//! on its own, so a rejected stack is reported in the [`GenerationReport`]
//! while the rest of the batch still lands.

use crate::error::{GenerationError, RegistryError};
use crate::registry::StackRegistry;
use crate::store::StackStore;
use crate::template::{TemplateGroup, TANTARELLI_LAYOUT, TEMPLATE_MAX_TIERS};
use crate::types::{
    ContainerSize, Dimensions, GenerationFailure, GenerationReport, NewStack, Position, Section,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Parameters for an arithmetic grid of stacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Section every generated stack goes into
    pub section_id: String,
    /// First stack number
    pub start: u32,
    /// Last stack number (inclusive)
    pub end: u32,
    /// Number increment, 2 for odd-only numbering
    pub step: u32,
    /// Rows per stack
    pub rows: u32,
    /// Tiers per stack
    pub max_tiers: u32,
    /// X of the first stack
    pub start_x: f64,
    /// Y of the first stack
    pub start_y: f64,
    /// Distance between stack origins along x
    pub spacing_x: f64,
    /// Distance between grid rows along y
    pub spacing_y: f64,
    /// Stacks per grid row
    pub per_row: u32,
    /// Footprint of every stack
    pub dimensions: Dimensions,
    /// Size assigned to every stack
    pub container_size: ContainerSize,
}

impl GridSpec {
    /// Grid over `[start, end]` with default geometry
    #[must_use]
    pub fn new(section_id: &str, start: u32, end: u32) -> Self {
        Self {
            section_id: section_id.to_string(),
            start,
            end,
            step: 1,
            rows: 4,
            max_tiers: 5,
            start_x: 0.0,
            start_y: 0.0,
            spacing_x: 30.0,
            spacing_y: 70.0,
            per_row: 10,
            dimensions: Dimensions::new(25.0, 60.0),
            container_size: ContainerSize::Twenty,
        }
    }

    /// Stack numbers the grid produces, in placement order
    pub fn numbers(&self) -> impl Iterator<Item = u32> {
        (self.start..=self.end).step_by(self.step.max(1) as usize)
    }

    /// Position of the `index`-th stack
    #[must_use]
    pub fn position_of(&self, index: u32) -> Position {
        let per_row = self.per_row.max(1);
        Position::new(
            self.start_x + self.spacing_x * f64::from(index % per_row),
            self.start_y + self.spacing_y * f64::from(index / per_row),
        )
    }

    fn check(&self) -> Result<(), GenerationError> {
        if self.per_row == 0 {
            return Err(GenerationError::InvalidGrid(
                "stacks per row must be at least 1".into(),
            ));
        }
        if self.step == 0 {
            return Err(GenerationError::InvalidGrid("step must be at least 1".into()));
        }
        if self.start > self.end {
            return Err(GenerationError::InvalidGrid(format!(
                "start {} is after end {}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

impl<S: StackStore> StackRegistry<S> {
    /// Populate a yard with the Tantarelli reference layout
    pub fn generate_tantarelli(
        &mut self,
        yard_id: &str,
    ) -> Result<GenerationReport, GenerationError> {
        let sections = self.target_sections(yard_id)?;
        let mut report = GenerationReport::default();

        let mut section_for = Vec::with_capacity(TemplateGroup::ALL.len());
        for group in TemplateGroup::ALL {
            let section = match sections.iter().find(|s| group.matches(&s.name)) {
                Some(section) => section,
                None => {
                    let fallback = &sections[0];
                    report.warnings.push(format!(
                        "No section matching '{}'; using {}",
                        group.name(),
                        fallback.name
                    ));
                    fallback
                }
            };
            section_for.push((group, section.id.clone()));
        }

        for template in TANTARELLI_LAYOUT {
            let section_id = section_for
                .iter()
                .find(|(g, _)| *g == template.group)
                .map_or(sections[0].id.as_str(), |(_, id)| id.as_str());

            let candidate = NewStack {
                stack_number: template.stack_number,
                rows: template.rows,
                max_tiers: TEMPLATE_MAX_TIERS,
                position: Position::new(template.x, template.y),
                dimensions: Dimensions::new(template.width, template.length),
                container_size: if template.is_special {
                    ContainerSize::Twenty
                } else {
                    ContainerSize::Both
                },
                is_special_stack: template.is_special,
                assigned_client_code: None,
            };
            self.generate_one(yard_id, section_id, &candidate, &mut report)?;
        }

        Self::log_report("tantarelli", yard_id, &report);
        Ok(report)
    }

    /// Copy every active stack of `source_yard_id` into `target_yard_id`.
    ///
    /// Sections are mapped by name, falling back to the target's first
    /// section. Occupancy starts at zero in the target.
    pub fn clone_yard(
        &mut self,
        source_yard_id: &str,
        target_yard_id: &str,
    ) -> Result<GenerationReport, GenerationError> {
        let source = self.snapshot(source_yard_id)?;
        if source.stacks.is_empty() {
            return Err(GenerationError::SourceYardEmpty(source_yard_id.to_string()));
        }
        let target_sections = self.target_sections(target_yard_id)?;

        let mut stacks = source.stacks;
        stacks.sort_by_key(|s| s.stack_number);

        let mut report = GenerationReport::default();
        let mut fallbacks = BTreeSet::new();

        for stack in &stacks {
            let source_name = source
                .sections
                .iter()
                .find(|s| s.id == stack.section_id)
                .map(|s| s.name.trim());

            let target = source_name
                .and_then(|name| {
                    target_sections
                        .iter()
                        .find(|t| t.name.trim().eq_ignore_ascii_case(name))
                })
                .unwrap_or_else(|| {
                    fallbacks.insert(source_name.unwrap_or(&stack.section_id).to_string());
                    &target_sections[0]
                });

            let candidate = NewStack {
                stack_number: stack.stack_number,
                rows: stack.rows,
                max_tiers: stack.max_tiers,
                position: stack.position,
                dimensions: stack.dimensions,
                container_size: stack.container_size,
                is_special_stack: stack.is_special_stack,
                assigned_client_code: stack.assigned_client_code.clone(),
            };
            let target_id = target.id.clone();
            self.generate_one(target_yard_id, &target_id, &candidate, &mut report)?;
        }

        for name in fallbacks {
            report.warnings.push(format!(
                "No section named '{}' in target; used {}",
                name, target_sections[0].name
            ));
        }

        Self::log_report("clone", target_yard_id, &report);
        Ok(report)
    }

    /// Generate a numbered grid of identical stacks
    pub fn generate_grid(
        &mut self,
        yard_id: &str,
        spec: &GridSpec,
    ) -> Result<GenerationReport, GenerationError> {
        spec.check()?;
        let sections = self.target_sections(yard_id)?;
        if !sections.iter().any(|s| s.id == spec.section_id) {
            return Err(GenerationError::SectionNotFound(spec.section_id.clone()));
        }

        let mut report = GenerationReport::default();
        for (index, number) in (0u32..).zip(spec.numbers()) {
            let candidate = NewStack {
                stack_number: number,
                rows: spec.rows,
                max_tiers: spec.max_tiers,
                position: spec.position_of(index),
                dimensions: spec.dimensions,
                container_size: spec.container_size,
                is_special_stack: false,
                assigned_client_code: None,
            };
            self.generate_one(yard_id, &spec.section_id, &candidate, &mut report)?;
        }

        Self::log_report("grid", yard_id, &report);
        Ok(report)
    }

    fn target_sections(&self, yard_id: &str) -> Result<Vec<Section>, GenerationError> {
        let sections = self.snapshot(yard_id)?.sections;
        if sections.is_empty() {
            return Err(GenerationError::NoSections(yard_id.to_string()));
        }
        Ok(sections)
    }

    fn generate_one(
        &mut self,
        yard_id: &str,
        section_id: &str,
        candidate: &NewStack,
        report: &mut GenerationReport,
    ) -> Result<(), GenerationError> {
        match self.insert(yard_id, section_id, candidate, true) {
            Ok(stack) => report.created.push(stack),
            Err(RegistryError::Validation(failure)) => {
                warn!(
                    yard = %yard_id,
                    stack = candidate.stack_number,
                    "skipping stack: {}",
                    failure
                );
                report.failures.push(GenerationFailure {
                    stack_number: candidate.stack_number,
                    reasons: failure.errors,
                });
            }
            Err(other) => return Err(other.into()),
        }
        Ok(())
    }

    fn log_report(kind: &str, yard_id: &str, report: &GenerationReport) {
        info!(
            yard = %yard_id,
            kind,
            created = report.created_count(),
            skipped = report.skipped_count(),
            "layout generation finished"
        );
    }
}
