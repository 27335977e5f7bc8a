// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//
//! Command implementations

pub mod completions;
pub mod generate;
pub mod section;
pub mod stack;
pub mod yard;

use crate::config::Config;
use crate::error::RegistryError;
use crate::registry::StackRegistry;
use crate::store::DepotStore;
use crate::types::{GenerationReport, Section, Stack, Yard};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Resolved configuration
    pub config: Config,
    /// Print machine-readable JSON instead of text
    pub json: bool,
    /// Colour terminal output
    pub color: bool,
}

impl CommandContext {
    /// Load the depot from the data directory and wrap it in a registry
    pub fn open(&self) -> Result<StackRegistry<DepotStore>> {
        let store = DepotStore::load(&self.config.data_dir).with_context(|| {
            format!("Failed to load depot from {}", self.config.data_dir.display())
        })?;
        Ok(StackRegistry::new(store, self.config.rules.clone())
            .with_operator(self.config.operator.clone()))
    }

    /// Persist the registry's store back to the data directory
    pub fn save(&self, registry: &StackRegistry<DepotStore>) -> Result<()> {
        registry.store().save(&self.config.data_dir)
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("Failed to serialize output")?
        );
        Ok(())
    }

    /// Green text when colour is on
    #[must_use]
    pub fn good(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    /// Yellow text when colour is on
    #[must_use]
    pub fn caution(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    /// Red text when colour is on
    #[must_use]
    pub fn bad(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    /// Print the details of a registry error and hand it back as `anyhow`
    pub fn explain(&self, err: RegistryError) -> anyhow::Error {
        if let Some(failure) = err.validation() {
            eprintln!("{}", self.bad("Rejected:"));
            for e in &failure.errors {
                eprintln!("  - {e}");
            }
            for w in &failure.warnings {
                eprintln!("  {} {w}", self.caution("warning:"));
            }
        }
        err.into()
    }

    /// Print a generation summary
    pub fn print_report(&self, report: &GenerationReport) -> Result<()> {
        if self.json {
            return self.print_json(report);
        }

        println!(
            "{} {} stack(s), skipped {}",
            self.good("Created"),
            report.created_count(),
            report.skipped_count()
        );
        for failure in &report.failures {
            println!("  {} stack {}:", self.bad("skipped"), failure.stack_number);
            for reason in &failure.reasons {
                println!("    - {reason}");
            }
        }
        for warning in &report.warnings {
            println!("  {} {warning}", self.caution("warning:"));
        }
        Ok(())
    }
}

/// Resolve a yard code or ID
pub fn resolve_yard(registry: &StackRegistry<DepotStore>, code_or_id: &str) -> Result<Yard> {
    registry
        .store()
        .find_yard(code_or_id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Yard not found: {}", code_or_id))
}

/// Resolve a section name or ID within a yard
pub fn resolve_section(
    registry: &StackRegistry<DepotStore>,
    yard: &Yard,
    name_or_id: &str,
) -> Result<Section> {
    registry
        .store()
        .find_section(&yard.id, name_or_id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Section not found in {}: {}", yard.code, name_or_id))
}

/// Resolve an active stack by number
pub fn resolve_stack(
    registry: &StackRegistry<DepotStore>,
    yard: &Yard,
    number: u32,
) -> Result<Stack> {
    registry
        .find_by_number(&yard.id, number)?
        .ok_or_else(|| anyhow::anyhow!("Stack {} not found in {}", number, yard.code))
}
