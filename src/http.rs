use reqwest::blocking::Client;
use reqwest::redirect::Policy;

use crate::config::PlatformConfig;

/// One client per run; its cookie jar carries the login session.
pub(crate) fn http_client(config: &PlatformConfig) -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout)
        .cookie_store(true)
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))
}

/// Client for media checks. Redirects are not followed, so the status is the
/// probed URL's own.
pub(crate) fn probe_client(config: &PlatformConfig) -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.probe_timeout)
        .redirect(Policy::none())
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build probe client: {}", e))
}
