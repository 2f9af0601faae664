//! Bot lifecycle: login with flood-wait retry, then log-channel validation.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::{
    config::Config,
    domain::{Account, BotIdentity, ChatId, MemberStatus},
    errors::{Error, StartupError},
    formatting::startup_announcement,
    ports::ChatClient,
    Result,
};

pub struct Bot {
    client: Arc<dyn ChatClient>,
    logger_id: ChatId,
    identity: Option<BotIdentity>,
}

impl Bot {
    pub fn new(cfg: &Config, client: Arc<dyn ChatClient>) -> Self {
        info!("Starting Bot...");
        Self {
            client,
            logger_id: cfg.logger_id,
            identity: None,
        }
    }

    /// Identity of the logged-in bot; `None` until `start` has logged in.
    pub fn identity(&self) -> Option<&BotIdentity> {
        self.identity.as_ref()
    }

    /// Log in, announce startup in the log channel and verify admin rights there.
    ///
    /// Any error returned here is fatal; see [`StartupError::exit_code`].
    pub async fn start(&mut self) -> std::result::Result<&BotIdentity, StartupError> {
        info!("Attempting to connect to Telegram...");

        let me = self.login().await?;
        let identity = self.identity.insert(BotIdentity::from(&me));

        let announcement = startup_announcement(identity);
        if let Err(e) = self.client.send_html(self.logger_id, &announcement).await {
            let err = match e {
                Error::ChatUnreachable(_) => StartupError::LogChannelUnreachable(e),
                other => StartupError::Announcement(other),
            };
            error!("{err}");
            return Err(err);
        }

        match self.client.member_status(self.logger_id, identity.id).await {
            Ok(MemberStatus::Administrator) => {}
            Ok(status) => {
                let err = StartupError::NotAdministrator;
                error!(?status, "{err}");
                return Err(err);
            }
            Err(e) => {
                let err = StartupError::AdminCheck(e);
                error!("{err}");
                return Err(err);
            }
        }

        info!("Music Bot Started as {}", identity.name);
        Ok(identity)
    }

    async fn login(&self) -> std::result::Result<Account, StartupError> {
        loop {
            let e = match self.client.connect().await {
                Ok(me) => return Ok(me),
                Err(e) => e,
            };

            if let Some(wait) = e.retry_after() {
                warn!(
                    "Telegram FloodWait during login. Waiting for {} seconds before retrying...",
                    wait.as_secs()
                );
                sleep(wait).await;
                continue;
            }

            let err = match e {
                Error::Unauthorized(_) | Error::Config(_) => StartupError::InvalidCredentials(e),
                other => StartupError::Login(other),
            };
            error!("{err}");
            return Err(err);
        }
    }

    pub async fn stop(&mut self) -> Result<()> {
        info!("Stopping Bot...");
        self.client.disconnect().await
    }
}
