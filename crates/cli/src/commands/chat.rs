//! Shopping assistant command.

use grocer_client::StorefrontApi;
use tracing::info;

/// Send one message and log the reply.
///
/// # Errors
///
/// Returns an error if the assistant request fails.
pub async fn ask(api: &StorefrontApi, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    let reply = api.chat(message).await?;
    info!("{reply}");
    Ok(())
}
