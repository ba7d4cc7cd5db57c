//! Command handlers. Reports go to stdout as JSON; logs go to stderr.

use careerlens_core::{AppConfig, OBJECTIVE_CATALOG};
use careerlens_pipeline::RequestCoordinator;

/// Runs one fetch-and-analyze flow and prints the report.
///
/// A partial report is still printed, with a warning logged.
///
/// # Errors
///
/// Returns an error when the pipeline cannot be built, the profile cannot be
/// fetched, or the request times out.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    url: &str,
    objective: Option<&str>,
) -> anyhow::Result<()> {
    let coordinator = RequestCoordinator::from_app_config(config)?;
    let outcome = coordinator.fetch_and_analyze(url, objective).await?;
    if outcome.is_partial() {
        tracing::warn!(url, "analysis failed; printing partial report");
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// # Errors
///
/// Returns an error only if the catalog cannot be serialized.
pub(crate) fn run_objectives() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(OBJECTIVE_CATALOG)?);
    Ok(())
}

/// Prints each credential source label with its cookie count.
///
/// # Errors
///
/// Returns an error when the credential store is unreachable or holds no
/// usable sets.
pub(crate) async fn run_credentials(config: &AppConfig) -> anyhow::Result<()> {
    let coordinator = RequestCoordinator::from_app_config(config)?;
    let sets = coordinator.source().credentials().list_all().await?;

    println!("{:<40} {:>8}", "SOURCE", "COOKIES");
    for set in &sets {
        println!("{:<40} {:>8}", set.source, set.cookies.len());
    }
    println!("{} credential set(s)", sets.len());
    Ok(())
}
