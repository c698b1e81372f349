//! Visit history command handler.

use chrono_tz::Tz;
use tabled::Tabled;

use litterlink_core::{Litterbox, VisitRecord};

use crate::cli::VisitsArgs;
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VisitRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Pet")]
    pet: String,
    #[tabled(rename = "Event")]
    action: String,
    #[tabled(rename = "Weight")]
    weight: String,
    #[tabled(rename = "Duration")]
    duration: String,
    #[tabled(rename = "Device")]
    device: String,
}

impl VisitRow {
    fn new(v: &VisitRecord, tz: Tz) -> Self {
        Self {
            time: local_time(v, tz),
            pet: if v.pet_name.is_empty() {
                "-".into()
            } else {
                v.pet_name.clone()
            },
            action: v.action.clone(),
            weight: output::weight_cell(v.weight_lbs),
            duration: if v.duration_seconds == 0 {
                "-".into()
            } else {
                format!("{}s", v.duration_seconds)
            },
            device: v.source_device.clone(),
        }
    }
}

fn local_time(v: &VisitRecord, tz: Tz) -> String {
    v.timestamp
        .with_timezone(&tz)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Match `--pet` against ids first, then names.
fn select_visits(litterbox: &Litterbox, pet: &str) -> Result<Vec<VisitRecord>, CliError> {
    if litterbox.pet(pet).is_some() {
        return Ok(litterbox.visit_records_for_pet(pet));
    }
    if let Some(found) = litterbox.pet_by_name(pet) {
        return Ok(litterbox.visit_records_for_pet(&found.id));
    }
    Err(CliError::NotFound {
        resource_type: "pet".into(),
        identifier: pet.into(),
        list_command: "pets".into(),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    litterbox: &mut Litterbox,
    args: &VisitsArgs,
    ctx: &Context<'_>,
) -> Result<(), CliError> {
    let summary = litterbox
        .fetch_all_data(args.depth.unwrap_or(ctx.defaults.depth))
        .await?;
    if summary.pages_failed > 0 && !ctx.global.quiet {
        eprintln!(
            "⚠ {} of {} history pages could not be read",
            summary.pages_failed, summary.pages_attempted
        );
    }

    let mut visits = match args.pet.as_deref() {
        Some(pet) => select_visits(litterbox, pet)?,
        None => litterbox.visit_records(),
    };
    if args.pets_only {
        visits.retain(|v| !v.is_machine_event());
    }

    let tz = litterbox.timezone();
    let out = output::render_list(
        ctx.global.output,
        &visits,
        |v| VisitRow::new(v, tz),
        |v| format!("{}\t{}\t{}", v.timestamp.to_rfc3339(), v.pet_name, v.action),
    )?;
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
