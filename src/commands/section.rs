// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Section management commands

use super::{resolve_yard, CommandContext};
use crate::store::StackStore;
use crate::types::Section;
use anyhow::Result;

/// Run section command
pub fn run(ctx: &CommandContext, action: &str, yard: &str, name: Option<String>) -> Result<()> {
    let mut registry = ctx.open()?;
    let yard = resolve_yard(&registry, yard)?;

    match action {
        "create" | "new" => {
            let name = name.ok_or_else(|| anyhow::anyhow!("Section name is required"))?;
            let section = Section::new(&yard.id, &name);
            let id = section.id.clone();

            registry.store_mut().add_section(section)?;
            ctx.save(&registry)?;

            println!("{} section: {} ({})", ctx.good("Created"), name, id);
        }

        "list" | "ls" => {
            let sections = registry.store().active_sections(&yard.id)?;
            if ctx.json {
                return ctx.print_json(&sections);
            }
            if sections.is_empty() {
                println!(
                    "No sections in {}. Use 'stackyard section create {} <name>' to add one.",
                    yard.code, yard.code
                );
                return Ok(());
            }

            let stacks = registry.list_stacks(&yard.id)?;
            println!("Sections of {} ({}):", yard.code, sections.len());
            for section in &sections {
                let count = stacks.iter().filter(|s| s.section_id == section.id).count();
                println!("  {} [{}] - {} stacks", section.name, section.id, count);
            }
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: create, list", other);
        }
    }

    Ok(())
}
