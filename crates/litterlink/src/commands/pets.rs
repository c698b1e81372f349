//! Pet list command handler.

use tabled::Tabled;

use litterlink_core::{Litterbox, Pet};

use crate::cli::PetsArgs;
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Weight")]
    weight: String,
}

impl From<&Pet> for PetRow {
    fn from(p: &Pet) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            weight: output::weight_cell(p.weight_lbs),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    litterbox: &mut Litterbox,
    args: &PetsArgs,
    ctx: &Context<'_>,
) -> Result<(), CliError> {
    litterbox
        .fetch_all_data(args.depth.unwrap_or(ctx.defaults.depth))
        .await?;

    let pets = litterbox.pets();
    let out = output::render_list(ctx.global.output, &pets, |p| PetRow::from(p), |p| {
        format!("{}\t{}", p.id, p.name)
    })?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
