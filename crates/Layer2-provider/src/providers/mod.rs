//! Provider implementations

pub mod openai_compat;

use crate::error::ProviderError;
use crate::gateway::LlmGateway;
use ember_foundation::Config;
use std::sync::Arc;
use std::time::Duration;

/// Build the gateway for a session configuration.
///
/// Both provider kinds are served by the OpenAI-compatible client; the kind
/// only influenced the endpoint/model defaults at configuration time.
pub fn create_gateway(config: &Config) -> Result<Arc<dyn LlmGateway>, ProviderError> {
    let provider = openai_compat::OpenAiCompatProvider::new(
        &config.endpoint,
        &config.model,
        Duration::from_secs(config.timeout_secs),
    )?;
    Ok(Arc::new(provider))
}
