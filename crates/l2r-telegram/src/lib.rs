//! Telegram adapter (teloxide).
//!
//! This crate implements the `l2r-core` ChatClient port over the Telegram Bot API.

use std::{future::Future, time::Duration};

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{ChatMemberKind, ParseMode},
    ApiError, RequestError,
};

use tokio::{sync::Semaphore, time::sleep};
use tracing::{debug, info, warn};

use l2r_core::{
    config::Config,
    domain::{Account, ChatId, MemberStatus, MessageId, MessageRef, UserId},
    errors::Error,
    ports::ChatClient,
    Result,
};

const SHORT_FLOOD_RETRIES: usize = 1;

/// [`ChatClient`] over the Telegram Bot API.
///
/// Outbound requests share a semaphore sized by `max_concurrent_transmissions`.
pub struct TelegramClient {
    bot: Bot,
    session_name: String,
    permits: Semaphore,
    flood_sleep_threshold: Duration,
}

impl TelegramClient {
    pub fn new(cfg: &Config) -> Self {
        Self {
            bot: Bot::new(cfg.bot_token.clone()),
            session_name: cfg.session_name.clone(),
            permits: Semaphore::new(cfg.max_concurrent_transmissions),
            flood_sleep_threshold: cfg.flood_sleep_threshold,
        }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_user(user_id: UserId) -> teloxide::types::UserId {
        teloxide::types::UserId(user_id.0 as u64)
    }

    fn map_err(e: RequestError) -> Error {
        match e {
            RequestError::RetryAfter(wait) => Error::FloodWait { wait },
            // teloxide reports Telegram's 401 "Unauthorized" as `NotFound`.
            RequestError::Api(ApiError::NotFound) => {
                Error::Unauthorized("telegram rejected the bot token".to_string())
            }
            RequestError::Api(
                api @ (ApiError::ChatNotFound
                | ApiError::BotKicked
                | ApiError::BotKickedFromSupergroup),
            ) => Error::ChatUnreachable(format!("telegram error: {api}")),
            other => Error::External(format!("telegram error: {other}")),
        }
    }

    /// Run a request under the transmission limit, sleeping through up to
    /// `max_retries` short flood waits.
    async fn with_retry<T, Fut>(
        &self,
        max_retries: usize,
        mut op: impl FnMut() -> Fut,
    ) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, RequestError>> + Send,
        Fut::IntoFuture: Send,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| Error::External(format!("transmission limiter closed: {e}")))?;

        retry_short_flood_waits(self.flood_sleep_threshold, max_retries, || {
            let req = op();
            async move { req.await.map_err(Self::map_err) }
        })
        .await
    }
}

/// Retries after sleeping for any flood wait no longer than `threshold`, at
/// most `max_retries` times; every other outcome goes back to the caller.
async fn retry_short_flood_waits<T, Fut>(
    threshold: Duration,
    max_retries: usize,
    mut op: impl FnMut() -> Fut,
) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    let mut attempts = 0usize;
    loop {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) => match e.retry_after() {
                Some(wait) if attempts < max_retries && wait <= threshold => {
                    attempts += 1;
                    warn!("Waiting for {} seconds (flood wait)", wait.as_secs());
                    sleep(wait).await;
                }
                _ => return Err(e),
            },
        }
    }
}

fn member_status(kind: &ChatMemberKind) -> MemberStatus {
    match kind {
        ChatMemberKind::Owner(_) => MemberStatus::Owner,
        ChatMemberKind::Administrator(_) => MemberStatus::Administrator,
        ChatMemberKind::Member => MemberStatus::Member,
        ChatMemberKind::Restricted(_) => MemberStatus::Restricted,
        ChatMemberKind::Left => MemberStatus::Left,
        ChatMemberKind::Banned(_) => MemberStatus::Banned,
    }
}

#[async_trait]
impl ChatClient for TelegramClient {
    async fn connect(&self) -> Result<Account> {
        // Login flood waits are left to the caller's retry loop.
        let me = self.with_retry(0, || self.bot.get_me()).await?;

        info!(session = %self.session_name, "logged in as {}", me.user.first_name);
        Ok(Account {
            id: UserId(me.user.id.0 as i64),
            first_name: me.user.first_name.clone(),
            last_name: me.user.last_name.clone(),
            username: me.user.username.clone(),
        })
    }

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef> {
        let msg = self
            .with_retry(SHORT_FLOOD_RETRIES, || {
                self.bot
                    .send_message(Self::tg_chat(chat_id), html.to_string())
                    .parse_mode(ParseMode::Html)
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn member_status(&self, chat_id: ChatId, user_id: UserId) -> Result<MemberStatus> {
        let member = self
            .with_retry(SHORT_FLOOD_RETRIES, || {
                self.bot
                    .get_chat_member(Self::tg_chat(chat_id), Self::tg_user(user_id))
            })
            .await?;
        Ok(member_status(&member.kind))
    }

    async fn disconnect(&self) -> Result<()> {
        // The Bot API is stateless over HTTP; closing the limiter rejects late requests.
        self.permits.close();
        debug!(session = %self.session_name, "client closed");
        Ok(())
    }
}
