use std::time::Duration;

use feedsync::{Probe, ProbeOutcome};
use reqwest::StatusCode;
use reqwest::blocking::Client;

/// Checks media URLs with a `HEAD` request.
pub(crate) struct HttpProbe {
    client: Client,
    timeout: Duration,
}

impl HttpProbe {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

impl Probe for HttpProbe {
    fn probe(&self, url: &str) -> ProbeOutcome {
        match self.client.head(url).timeout(self.timeout).send() {
            Ok(r) if r.status() == StatusCode::OK => ProbeOutcome::Found,
            Ok(r) if r.status() == StatusCode::NOT_FOUND => ProbeOutcome::NotFound,
            Ok(r) => ProbeOutcome::Unknown(format!("HTTP {}", r.status())),
            Err(e) if e.is_timeout() => ProbeOutcome::Unknown("timed out".to_string()),
            Err(e) => ProbeOutcome::Unknown(e.to_string()),
        }
    }
}
