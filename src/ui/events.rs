//! Background catalog load and its completion event.

use crate::app::{App, AppEvent};
use crate::catalog::{self, CatalogSource};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Load the catalog once on a background task.
///
/// The result, success or failure, arrives as `AppEvent::CatalogLoaded`.
/// There is no retry.
pub fn spawn_catalog_load(
    source: CatalogSource,
    client: reqwest::Client,
    event_tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!(source = %source, "Loading catalog");
        let result = catalog::load(&source, &client).await;
        if let Err(e) = event_tx.send(AppEvent::CatalogLoaded(result)).await {
            tracing::warn!(error = %e, "Failed to deliver catalog (receiver dropped)");
        }
    })
}

/// Apply a background event to the application state.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::CatalogLoaded(Ok(catalog)) => {
            let count = catalog.len();
            app.set_catalog(catalog);
            app.set_status(format!("Loaded {} games", count));
        }
        AppEvent::CatalogLoaded(Err(e)) => app.fail_load(&e),
    }
}
