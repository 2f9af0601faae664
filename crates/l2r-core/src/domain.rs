use crate::formatting::mention_html;

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a Telegram message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// The account behind an authenticated session, as reported by the platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: UserId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// Bot identity copied from the session after login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: UserId,
    pub name: String,
    pub username: Option<String>,
    /// HTML mention link.
    pub mention: String,
}

impl From<&Account> for BotIdentity {
    fn from(me: &Account) -> Self {
        let name = match me.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {last}", me.first_name),
            _ => me.first_name.clone(),
        };

        Self {
            id: me.id,
            name,
            username: me.username.clone(),
            mention: mention_html(me.id, &me.first_name),
        }
    }
}

/// Membership status of a user in a chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberStatus {
    Owner,
    Administrator,
    Member,
    Restricted,
    Left,
    Banned,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(last_name: Option<&str>, username: Option<&str>) -> Account {
        Account {
            id: UserId(777),
            first_name: "L2R".to_string(),
            last_name: last_name.map(str::to_string),
            username: username.map(str::to_string),
        }
    }

    #[test]
    fn identity_joins_first_and_last_name() {
        let id = BotIdentity::from(&account(Some("Music"), Some("l2rbot")));
        assert_eq!(id.id, UserId(777));
        assert_eq!(id.name, "L2R Music");
        assert_eq!(id.username.as_deref(), Some("l2rbot"));
        assert_eq!(id.mention, r#"<a href="tg://user?id=777">L2R</a>"#);
    }

    #[test]
    fn identity_without_last_name_has_no_trailing_space() {
        assert_eq!(BotIdentity::from(&account(None, None)).name, "L2R");
        assert_eq!(BotIdentity::from(&account(Some("  "), None)).name, "L2R");
    }
}
