//! `login`: credentials check only, nothing is fetched.

use litterlink_core::Litterbox;

use crate::commands::Context;

pub fn handle(litterbox: &Litterbox, ctx: &Context<'_>) {
    if ctx.global.quiet {
        return;
    }
    eprintln!(
        "✓ Logged in to {} as {} (profile '{}')",
        litterbox.vendor(),
        ctx.username,
        ctx.profile
    );
}
