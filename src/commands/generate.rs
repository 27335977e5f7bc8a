// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Layout generation commands

use super::{resolve_section, resolve_yard, CommandContext};
use crate::generator::GridSpec;
use crate::types::{ContainerSize, Dimensions};
use anyhow::Result;

/// Arguments for generate commands
#[derive(Debug, Default, clap::Args)]
pub struct GenerateArgs {
    /// Source yard for clone
    #[arg(long = "from")]
    pub source: Option<String>,
    /// Section for grid generation
    #[arg(long)]
    pub section: Option<String>,
    /// First stack number of the grid
    #[arg(long)]
    pub start: Option<u32>,
    /// Last stack number of the grid
    #[arg(long)]
    pub end: Option<u32>,
    /// Number increment
    #[arg(long)]
    pub step: Option<u32>,
    /// Stacks per grid row
    #[arg(long)]
    pub per_row: Option<u32>,
    /// Rows per stack
    #[arg(long)]
    pub rows: Option<u32>,
    /// Tiers per stack
    #[arg(long)]
    pub tiers: Option<u32>,
    /// X of the first stack
    #[arg(long, allow_negative_numbers = true)]
    pub start_x: Option<f64>,
    /// Y of the first stack
    #[arg(long, allow_negative_numbers = true)]
    pub start_y: Option<f64>,
    /// Origin distance along x
    #[arg(long)]
    pub spacing_x: Option<f64>,
    /// Origin distance along y
    #[arg(long)]
    pub spacing_y: Option<f64>,
    /// Stack width
    #[arg(long)]
    pub width: Option<f64>,
    /// Stack length
    #[arg(long)]
    pub length: Option<f64>,
    /// Container size: 20ft, 40ft, both
    #[arg(long)]
    pub size: Option<String>,
}

/// Run generate command
pub fn run(ctx: &CommandContext, action: &str, yard: &str, args: &GenerateArgs) -> Result<()> {
    let mut registry = ctx.open()?;
    let target = resolve_yard(&registry, yard)?;

    let report = match action {
        "tantarelli" | "template" => registry.generate_tantarelli(&target.id)?,

        "clone" => {
            let source_key = args
                .source
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--from <yard> is required"))?;
            let source = resolve_yard(&registry, source_key)?;
            registry.clone_yard(&source.id, &target.id)?
        }

        "grid" => {
            let section_key = args
                .section
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("--section is required"))?;
            let section = resolve_section(&registry, &target, section_key)?;
            let start = args.start.ok_or_else(|| anyhow::anyhow!("--start is required"))?;
            let end = args.end.ok_or_else(|| anyhow::anyhow!("--end is required"))?;

            let mut spec = GridSpec::new(&section.id, start, end);
            if let Some(step) = args.step {
                spec.step = step;
            }
            if let Some(per_row) = args.per_row {
                spec.per_row = per_row;
            }
            if let Some(rows) = args.rows {
                spec.rows = rows;
            }
            if let Some(tiers) = args.tiers {
                spec.max_tiers = tiers;
            }
            spec.start_x = args.start_x.unwrap_or(spec.start_x);
            spec.start_y = args.start_y.unwrap_or(spec.start_y);
            spec.spacing_x = args.spacing_x.unwrap_or(spec.spacing_x);
            spec.spacing_y = args.spacing_y.unwrap_or(spec.spacing_y);
            spec.dimensions = Dimensions::new(
                args.width.unwrap_or(spec.dimensions.width),
                args.length.unwrap_or(spec.dimensions.length),
            );
            if let Some(size) = args.size.as_deref() {
                spec.container_size = ContainerSize::parse(size).ok_or_else(|| {
                    anyhow::anyhow!("Unknown container size: {}. Valid: 20ft, 40ft, both", size)
                })?;
            }

            registry.generate_grid(&target.id, &spec)?
        }

        other => {
            anyhow::bail!("Unknown action: {}. Valid: tantarelli, clone, grid", other);
        }
    };

    ctx.save(&registry)?;
    ctx.print_report(&report)
}
