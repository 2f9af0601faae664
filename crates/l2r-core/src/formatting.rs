use crate::domain::{BotIdentity, UserId};

/// Escape text for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Inline mention of a user, rendered by Telegram as a profile link.
pub fn mention_html(user_id: UserId, label: &str) -> String {
    format!(
        r#"<a href="tg://user?id={}">{}</a>"#,
        user_id.0,
        escape_html(label)
    )
}

/// Startup announcement posted to the log channel.
pub fn startup_announcement(identity: &BotIdentity) -> String {
    let username = identity.username.as_deref().unwrap_or_default();
    format!(
        "<u><b>» {} ʙᴏᴛ sᴛᴀʀᴛᴇᴅ :</b></u>\n\nɪᴅ : <code>{}</code>\nɴᴀᴍᴇ : {}\nᴜsᴇʀɴᴀᴍᴇ : @{}",
        identity.mention,
        identity.id.0,
        escape_html(&identity.name),
        escape_html(username),
    )
}
