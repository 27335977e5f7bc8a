// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Stack commands - list, create, update, delete and occupancy

use super::{resolve_section, resolve_stack, resolve_yard, CommandContext};
use crate::types::{ContainerSize, Dimensions, NewStack, Position, Stack, StackPatch};
use anyhow::{Context, Result};
use serde::Serialize;

/// Default rows for a stack created from the command line
const DEFAULT_ROWS: u32 = 4;
/// Default tiers for a stack created from the command line
const DEFAULT_TIERS: u32 = 5;
/// Default footprint width
const DEFAULT_WIDTH: f64 = 25.0;
/// Default footprint length
const DEFAULT_LENGTH: f64 = 60.0;

/// Arguments for stack commands
#[derive(Debug, Default, clap::Args)]
pub struct StackArgs {
    /// Section name or ID
    #[arg(long)]
    pub section: Option<String>,
    /// Rows
    #[arg(long)]
    pub rows: Option<u32>,
    /// Maximum tiers
    #[arg(long)]
    pub tiers: Option<u32>,
    /// X coordinate
    #[arg(long, allow_negative_numbers = true)]
    pub x: Option<f64>,
    /// Y coordinate
    #[arg(long, allow_negative_numbers = true)]
    pub y: Option<f64>,
    /// Footprint width
    #[arg(long)]
    pub width: Option<f64>,
    /// Footprint length
    #[arg(long)]
    pub length: Option<f64>,
    /// Container size: 20ft, 40ft, both
    #[arg(long)]
    pub size: Option<String>,
    /// Mark (true) or unmark (false) as special
    #[arg(long)]
    pub special: Option<bool>,
    /// Reserve for a client
    #[arg(long)]
    pub client: Option<String>,
    /// Remove the client reservation
    #[arg(long)]
    pub clear_client: bool,
    /// Container count for the occupancy action
    #[arg(long)]
    pub count: Option<u32>,
    /// Output format for list: table, json, toml
    #[arg(long, default_value = "table")]
    pub format: String,
}

impl StackArgs {
    fn container_size(&self) -> Result<Option<ContainerSize>> {
        self.size
            .as_deref()
            .map(|s| {
                ContainerSize::parse(s).ok_or_else(|| {
                    anyhow::anyhow!("Unknown container size: {}. Valid: 20ft, 40ft, both", s)
                })
            })
            .transpose()
    }

    /// Position from `--x`/`--y`, taking any missing axis from `suggest`
    fn position(&self, suggest: impl FnOnce() -> Result<Position>) -> Result<Position> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Ok(Position::new(x, y)),
            (x, y) => {
                let suggested = suggest()?;
                Ok(Position {
                    x: x.unwrap_or(suggested.x),
                    y: y.unwrap_or(suggested.y),
                    z: suggested.z,
                })
            }
        }
    }

    fn dimensions(&self, current: Option<Dimensions>) -> Option<Dimensions> {
        match (self.width, self.length, current) {
            (None, None, _) => None,
            (w, l, Some(cur)) => Some(Dimensions::new(
                w.unwrap_or(cur.width),
                l.unwrap_or(cur.length),
            )),
            (w, l, None) => Some(Dimensions::new(
                w.unwrap_or(DEFAULT_WIDTH),
                l.unwrap_or(DEFAULT_LENGTH),
            )),
        }
    }
}

#[derive(Serialize)]
struct StackList<'a> {
    stacks: &'a [Stack],
}

/// Run stack command
pub fn run(
    ctx: &CommandContext,
    action: &str,
    yard: &str,
    number: Option<u32>,
    args: &StackArgs,
) -> Result<()> {
    let mut registry = ctx.open()?;
    let yard = resolve_yard(&registry, yard)?;

    match action {
        "list" | "ls" => {
            let stacks = registry.list_stacks(&yard.id)?;
            let format = if ctx.json { "json" } else { args.format.as_str() };
            match format {
                "json" => return ctx.print_json(&stacks),
                "toml" => {
                    let out = toml::to_string_pretty(&StackList { stacks: &stacks })
                        .context("Failed to serialize stacks to TOML")?;
                    println!("{out}");
                    return Ok(());
                }
                "table" => {}
                other => anyhow::bail!("Unknown format: {}. Valid: table, json, toml", other),
            }

            if stacks.is_empty() {
                println!("No stacks in {}.", yard.code);
                return Ok(());
            }
            println!("Stacks of {} ({}):", yard.code, stacks.len());
            for s in &stacks {
                let special = if s.is_special_stack { " special" } else { "" };
                println!(
                    "  #{:<4} {:>3}x{} {:>3}/{:<3} {:<4}{} at ({}, {})",
                    s.stack_number,
                    s.rows,
                    s.max_tiers,
                    s.current_occupancy,
                    s.capacity,
                    s.container_size,
                    special,
                    s.position.x,
                    s.position.y
                );
            }
        }

        "show" => {
            let number = number.ok_or_else(|| anyhow::anyhow!("Stack number is required"))?;
            let stack = resolve_stack(&registry, &yard, number)?;
            if ctx.json {
                return ctx.print_json(&stack);
            }
            print_stack(&stack);
        }

        "create" | "new" => {
            let section_key = args
                .section
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--section is required"))?;
            let section = resolve_section(&registry, &yard, section_key)?;

            let stack_number = match number {
                Some(n) => n,
                None => registry.next_stack_number(&yard.id)?,
            };
            let position =
                args.position(|| Ok(registry.optimal_position(&yard.id, &section.id)?))?;
            let candidate = NewStack {
                stack_number,
                rows: args.rows.unwrap_or(DEFAULT_ROWS),
                max_tiers: args.tiers.unwrap_or(DEFAULT_TIERS),
                position,
                dimensions: args
                    .dimensions(None)
                    .unwrap_or(Dimensions::new(DEFAULT_WIDTH, DEFAULT_LENGTH)),
                container_size: args.container_size()?.unwrap_or(ContainerSize::Twenty),
                is_special_stack: args.special.unwrap_or(false),
                assigned_client_code: args.client.clone(),
            };

            let stack = registry
                .create_stack(&yard.id, &section.id, candidate)
                .map_err(|e| ctx.explain(e))?;
            ctx.save(&registry)?;

            println!(
                "{} stack {} in {} (capacity {})",
                ctx.good("Created"),
                stack.stack_number,
                section.name,
                stack.capacity
            );
        }

        "update" | "edit" => {
            let number = number.ok_or_else(|| anyhow::anyhow!("Stack number is required"))?;
            let stack = resolve_stack(&registry, &yard, number)?;

            let section_id = match &args.section {
                Some(key) => Some(resolve_section(&registry, &yard, key)?.id),
                None => None,
            };
            let position = match (args.x, args.y) {
                (None, None) => None,
                (x, y) => Some(Position {
                    x: x.unwrap_or(stack.position.x),
                    y: y.unwrap_or(stack.position.y),
                    z: stack.position.z,
                }),
            };
            let client = if args.clear_client {
                Some(None)
            } else {
                args.client.clone().map(Some)
            };
            let patch = StackPatch {
                section_id,
                stack_number: None,
                rows: args.rows,
                max_tiers: args.tiers,
                position,
                dimensions: args.dimensions(Some(stack.dimensions)),
                container_size: args.container_size()?,
                is_special_stack: args.special,
                assigned_client_code: client,
            };

            let updated = registry
                .update_stack(&yard.id, &stack.id, &patch)
                .map_err(|e| ctx.explain(e))?;
            ctx.save(&registry)?;

            println!("{} stack {}", ctx.good("Updated"), updated.stack_number);
            if updated.container_size != stack.container_size {
                println!("  size: {} -> {}", stack.container_size, updated.container_size);
            }
        }

        "delete" | "rm" => {
            let number = number.ok_or_else(|| anyhow::anyhow!("Stack number is required"))?;
            let stack = resolve_stack(&registry, &yard, number)?;

            registry
                .delete_stack(&yard.id, &stack.id)
                .map_err(|e| ctx.explain(e))?;
            ctx.save(&registry)?;

            println!("{} stack {}", ctx.good("Deleted"), number);
        }

        "occupancy" => {
            let number = number.ok_or_else(|| anyhow::anyhow!("Stack number is required"))?;
            let count = args.count.ok_or_else(|| anyhow::anyhow!("--count is required"))?;
            let stack = resolve_stack(&registry, &yard, number)?;

            let updated = registry
                .set_occupancy(&yard.id, &stack.id, count)
                .map_err(|e| ctx.explain(e))?;
            ctx.save(&registry)?;

            println!(
                "Stack {}: {}/{} occupied",
                updated.stack_number, updated.current_occupancy, updated.capacity
            );
        }

        "next" => {
            println!("{}", registry.next_stack_number(&yard.id)?);
        }

        "place" => {
            let section_key = args
                .section
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--section is required"))?;
            let section = resolve_section(&registry, &yard, section_key)?;
            let position = registry.optimal_position(&yard.id, &section.id)?;
            if ctx.json {
                return ctx.print_json(&position);
            }
            println!("{} {}", position.x, position.y);
        }

        other => {
            anyhow::bail!(
                "Unknown action: {}. Valid: list, show, create, update, delete, occupancy, next, place",
                other
            );
        }
    }

    Ok(())
}

fn print_stack(stack: &Stack) {
    println!("Stack {}", stack.stack_number);
    println!("  id: {}", stack.id);
    println!("  section: {}", stack.section_id);
    println!(
        "  capacity: {} ({} rows x {} tiers), occupied: {}",
        stack.capacity, stack.rows, stack.max_tiers, stack.current_occupancy
    );
    println!(
        "  footprint: ({}, {}) {} x {}",
        stack.position.x, stack.position.y, stack.dimensions.width, stack.dimensions.length
    );
    println!("  size: {}", stack.container_size);
    if stack.is_special_stack {
        println!("  special: yes");
    }
    if let Some(client) = &stack.assigned_client_code {
        println!("  client: {client}");
    }
    println!(
        "  updated: {} by {}",
        stack.audit.updated_at.to_rfc3339(),
        stack.audit.updated_by
    );
}
