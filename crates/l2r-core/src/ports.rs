use async_trait::async_trait;

use crate::{
    domain::{Account, ChatId, MemberStatus, MessageRef, UserId},
    Result,
};

/// Hexagonal port for the chat-platform client.
///
/// Adapters map platform failures onto [`crate::Error`]: rate limits become
/// `FloodWait`, rejected credentials `Unauthorized`, missing or forbidden chats
/// `ChatUnreachable`.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Authenticate and return the account behind the session.
    async fn connect(&self) -> Result<Account>;

    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<MessageRef>;

    async fn member_status(&self, chat_id: ChatId, user_id: UserId) -> Result<MemberStatus>;

    async fn disconnect(&self) -> Result<()>;
}
