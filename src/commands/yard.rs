// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Yard management commands

use super::{resolve_yard, CommandContext};
use crate::types::Yard;
use anyhow::Result;

/// Run yard command
pub fn run(
    ctx: &CommandContext,
    action: &str,
    yard: Option<String>,
    name: Option<String>,
    capacity: u32,
) -> Result<()> {
    let mut registry = ctx.open()?;

    match action {
        "create" | "new" => {
            let code = yard.ok_or_else(|| anyhow::anyhow!("Yard code is required"))?;
            let name = name.unwrap_or_else(|| code.clone());
            let yard = Yard::new(&code, &name, capacity);
            let id = yard.id.clone();

            registry.store_mut().add_yard(yard)?;
            ctx.save(&registry)?;

            println!("{} yard: {} ({})", ctx.good("Created"), name, id);
        }

        "list" | "ls" => {
            let yards: Vec<&Yard> = registry.store().yards.iter().filter(|y| y.is_active).collect();
            if ctx.json {
                return ctx.print_json(&yards);
            }
            if yards.is_empty() {
                println!(
                    "No yards defined. Use 'stackyard yard create <code> <name>' to create one."
                );
                return Ok(());
            }

            println!("Yards ({}):", yards.len());
            for y in yards {
                let stacks = registry.list_stacks(&y.id)?.len();
                println!(
                    "  {} {} - {} stacks, capacity {}",
                    y.code, y.name, stacks, y.total_capacity
                );
            }
        }

        "show" => {
            let key = yard.ok_or_else(|| anyhow::anyhow!("Yard code is required"))?;
            let yard = resolve_yard(&registry, &key)?;
            let summary = registry.yard_summary(&yard.id)?;
            if ctx.json {
                return ctx.print_json(&summary);
            }

            println!("Yard: {} ({})", yard.name, yard.code);
            println!("  id: {}", yard.id);
            println!("  declared capacity: {}", yard.total_capacity);
            println!(
                "  stacks: {}, slots: {}, occupied: {}",
                summary.stacks, summary.capacity, summary.occupancy
            );
            for section in &summary.sections {
                println!(
                    "    {} - {} stacks, {}/{} occupied",
                    section.name, section.stacks, section.occupancy, section.capacity
                );
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: create, list, show", other);
        }
    }

    Ok(())
}
