use feedsync::SourceError;
use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::config::PlatformConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginState {
    Anonymous,
    LoggedIn,
    Rejected,
}

/// The run's single platform session. Logs in on first use and never retries
/// a rejected login.
pub(crate) struct Session {
    client: Client,
    config: PlatformConfig,
    user: String,
    password: String,
    state: LoginState,
}

impl Session {
    pub fn new(client: Client, config: PlatformConfig, user: String, password: String) -> Self {
        Self {
            client,
            config,
            user,
            password,
            state: LoginState::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == LoginState::LoggedIn
    }

    /// The client, logged in. Fails with `AuthRequired` if the platform
    /// turned the credentials down, now or earlier in the run.
    pub fn authenticated(&mut self) -> Result<&Client, SourceError> {
        match self.state {
            LoginState::LoggedIn => {}
            LoginState::Anonymous => self.login()?,
            LoginState::Rejected => {
                return Err(SourceError::AuthRequired(format!(
                    "login for {} was rejected earlier in this run",
                    self.user
                )));
            }
        }
        Ok(&self.client)
    }

    fn login(&mut self) -> Result<(), SourceError> {
        let url = self
            .config
            .endpoint("wp-login.php")
            .map_err(|e| SourceError::Remote(format!("{e:#}")))?;
        debug!(%url, user = %self.user, "logging in");

        let form = [
            ("log", self.user.as_str()),
            ("pwd", self.password.as_str()),
            ("wp-submit", "Log In"),
            ("redirect_to", self.config.site_url.as_str()),
            ("testcookie", "1"),
        ];
        let response = self
            .client
            .post(url)
            .header(reqwest::header::COOKIE, "wordpress_test_cookie=WP Cookie check")
            .form(&form)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| SourceError::Remote(format!("login request failed: {e}")))?;

        // A rejected login renders the form again instead of redirecting.
        if response.url().path().ends_with("wp-login.php") {
            self.state = LoginState::Rejected;
            return Err(SourceError::AuthRequired(format!(
                "login rejected for {}",
                self.user
            )));
        }

        info!(user = %self.user, "logged in");
        self.state = LoginState::LoggedIn;
        Ok(())
    }
}
