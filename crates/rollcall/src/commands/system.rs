//! Discovery and health subcommands.

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::{build_client, build_store};

/// Run a full discovery pass and print the resolved URL.
///
/// Progress strings go to stderr so stdout stays pipeable. An unconfirmed
/// outcome (nothing reachable) is a connection-class failure, pointing the
/// user at `config set-url`.
pub async fn discover(global: &GlobalOpts) -> Result<(), CliError> {
    let store = build_store(global);

    let outcome = store
        .discover(|status| {
            if !global.quiet {
                eprintln!("{status}");
            }
        })
        .await;

    if outcome.is_confirmed() {
        output::print_output(outcome.url(), global.quiet);
        Ok(())
    } else {
        Err(CliError::DiscoveryFailed {
            fallback: outcome.url().to_owned(),
        })
    }
}

/// Query the backend's rich health endpoint.
pub async fn health(global: &GlobalOpts) -> Result<(), CliError> {
    let store = build_store(global);
    let client = build_client(global, &store)?;

    let health = client.health().await?;

    let out = output::render(&global.output, &health);
    output::print_output(&out, global.quiet);
    Ok(())
}
