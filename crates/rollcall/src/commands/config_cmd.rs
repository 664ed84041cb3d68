//! Config subcommand handlers.

use serde_json::json;

use rollcall_config::store::storage_path;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::build_store;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = build_store(global);

    match args.command {
        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let info = json!({
                "api_url": store.api_url(),
                "storage_path": storage_path().display().to_string(),
            });
            let out = output::render(&global.output, &info);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── SetUrl <url> ────────────────────────────────────────────
        ConfigCommand::SetUrl { url } => {
            let normalized = store.set_api_url(&url);
            eprintln!("✓ Saved backend URL: {normalized}");
            output::print_output(&normalized, global.quiet);
            Ok(())
        }

        // ── Reset ───────────────────────────────────────────────────
        ConfigCommand::Reset => {
            store.reset();
            eprintln!("✓ Cleared saved backend URL");
            Ok(())
        }
    }
}
