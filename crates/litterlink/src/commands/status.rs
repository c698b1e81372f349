//! Device status command handler.

use std::fmt::Write;

use chrono_tz::Tz;
use tabled::Tabled;

use litterlink_core::{DeviceStatus, Litterbox};

use crate::cli::StatusArgs;
use crate::commands::Context;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Litter")]
    litter: String,
    #[tabled(rename = "Waste")]
    waste: String,
    #[tabled(rename = "Reported")]
    reported: String,
}

impl StatusRow {
    fn new(s: &DeviceStatus, tz: Tz) -> Self {
        Self {
            device: s.device_name.clone(),
            model: s.device_type.clone(),
            status: status_label(s),
            litter: format!("{}%", s.litter_level_percent),
            waste: format!("{}%", s.waste_level_percent),
            reported: local_time(s, tz),
        }
    }
}

fn status_label(s: &DeviceStatus) -> String {
    if s.is_error_state {
        format!("{} (fault)", s.status_text)
    } else {
        s.status_text.clone()
    }
}

fn local_time(s: &DeviceStatus, tz: Tz) -> String {
    if s.is_unknown() {
        return "-".into();
    }
    s.timestamp
        .with_timezone(&tz)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

fn detail(s: &DeviceStatus, tz: Tz) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Vendor:       {}", s.vendor);
    let _ = writeln!(out, "Device:       {} ({})", s.device_name, s.device_type);
    let _ = writeln!(out, "Status:       {}", status_label(s));
    let _ = writeln!(out, "Litter level: {}%", s.litter_level_percent);
    let _ = writeln!(out, "Waste level:  {}%", s.waste_level_percent);
    let _ = writeln!(
        out,
        "Drawer full:  {}",
        if s.is_drawer_full { "yes" } else { "no" }
    );
    let _ = write!(out, "Reported:     {}", local_time(s, tz));
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    litterbox: &mut Litterbox,
    args: &StatusArgs,
    ctx: &Context<'_>,
) -> Result<(), CliError> {
    litterbox.fetch_all_data(ctx.defaults.depth).await?;
    let tz = litterbox.timezone();

    let out = if args.all {
        output::render_list(
            ctx.global.output,
            &litterbox.statuses(),
            |s| StatusRow::new(s, tz),
            |s| format!("{}\t{}", s.device_name, s.status_text),
        )?
    } else {
        output::render_single(
            ctx.global.output,
            &litterbox.latest_status(),
            |s| detail(s, tz),
            |s| s.status_text.clone(),
        )?
    };
    output::print_output(&out, ctx.global.quiet);
    Ok(())
}
