//! Structured reasons for refusing or ending a connection.
//!
//! The login core never writes player-facing text. It produces a reason
//! with a message key and named parameters, and a [`MessageRenderer`]
//! (usually the gateway's localization layer) turns that into a string.

use std::fmt;

/// Key of the generic message shown when a login fails for an internal
/// reason (storage down, coordinator timeout). Never carries detail.
pub const INTERNAL_FAILURE_KEY: &str = "auth_verify_failed_server_down";

/// A message parameter: `(name, value)`.
pub type MessageParam = (&'static str, String);

// ---------------------------------------------------------------------------
// RejectReason
// ---------------------------------------------------------------------------

/// Why the verification pipeline refused a login.
///
/// These are expected, policy-driven outcomes, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The remote identity is bound to a different backend than the one
    /// that just vouched for it. `backend_name` is the bound backend's
    /// display name (or its raw path if it is no longer configured).
    PathMismatch { backend_name: String },

    /// The verified name does not match the effective name pattern.
    UsernameMismatch { name: String, pattern: String },

    /// Another remote identity already owns this display name.
    UsernameRepeated { name: String },

    /// A whitelist is required and the player is not on it.
    NoWhitelist,

    /// The identity is already online and the backend refuses a second
    /// concurrent login.
    RepeatLogin,
}

impl RejectReason {
    /// The renderer key for this reason.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::PathMismatch { .. } => "auth_verify_failed_path_mismatch",
            Self::UsernameMismatch { .. } => {
                "auth_verify_failed_username_mismatch"
            }
            Self::UsernameRepeated { .. } => {
                "auth_verify_failed_username_repeated"
            }
            Self::NoWhitelist => "auth_verify_failed_no_whitelist",
            Self::RepeatLogin => "auth_verify_failed_repeat_login",
        }
    }

    /// Named parameters for the renderer.
    pub fn params(&self) -> Vec<MessageParam> {
        match self {
            Self::PathMismatch { backend_name } => {
                vec![("yggdrasil_server_name", backend_name.clone())]
            }
            Self::UsernameMismatch { name, pattern } => vec![
                ("current_name", name.clone()),
                ("regular", pattern.clone()),
            ],
            Self::UsernameRepeated { name } => {
                vec![("current_name", name.clone())]
            }
            Self::NoWhitelist | Self::RepeatLogin => Vec::new(),
        }
    }

    /// Renders this reason with the given renderer.
    pub fn render(&self, renderer: &impl MessageRenderer) -> String {
        renderer.render(self.message_key(), &self.params())
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PathMismatch { backend_name } => {
                write!(f, "identity bound to backend {backend_name}")
            }
            Self::UsernameMismatch { name, pattern } => {
                write!(f, "name {name} does not match {pattern}")
            }
            Self::UsernameRepeated { name } => {
                write!(f, "name {name} is owned by another identity")
            }
            Self::NoWhitelist => f.write_str("not whitelisted"),
            Self::RepeatLogin => f.write_str("already logged in"),
        }
    }
}

// ---------------------------------------------------------------------------
// DisconnectReason
// ---------------------------------------------------------------------------

/// Why a live session was closed by the login core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// Another identity just logged in under this display name.
    BusyUsername,

    /// The same identity logged in again and took over.
    SessionReplaced,
}

impl DisconnectReason {
    /// The renderer key for this reason.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::BusyUsername => "in_game_busy_username",
            Self::SessionReplaced => "in_game_busy_login",
        }
    }

    pub fn render(&self, renderer: &impl MessageRenderer) -> String {
        renderer.render(self.message_key(), &[])
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message_key())
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Maps a message key plus named parameters to player-facing text.
///
/// Localization is the gateway's business; Arcgate ships only
/// [`PlainRenderer`], a fixed English table.
pub trait MessageRenderer: Send + Sync + 'static {
    fn render(&self, key: &str, params: &[MessageParam]) -> String;
}

/// English messages with `{param}` placeholders.
///
/// Unknown keys render as the key itself so a missing translation is
/// visible rather than silent.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl PlainRenderer {
    fn template(key: &str) -> Option<&'static str> {
        let text = match key {
            "auth_verify_failed_path_mismatch" => {
                "This account must log in through {yggdrasil_server_name}."
            }
            "auth_verify_failed_username_mismatch" => {
                "The name {current_name} is not allowed here (must match {regular})."
            }
            "auth_verify_failed_username_repeated" => {
                "The name {current_name} is already taken by another account."
            }
            "auth_verify_failed_no_whitelist" => {
                "You are not whitelisted on this server."
            }
            "auth_verify_failed_repeat_login" => {
                "This account is already online."
            }
            INTERNAL_FAILURE_KEY => {
                "Login failed, please try again later."
            }
            "in_game_busy_username" => {
                "Someone else logged in with your name."
            }
            "in_game_busy_login" => {
                "You logged in from another location."
            }
            _ => return None,
        };
        Some(text)
    }
}

impl MessageRenderer for PlainRenderer {
    fn render(&self, key: &str, params: &[MessageParam]) -> String {
        let Some(template) = Self::template(key) else {
            return key.to_string();
        };
        params
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}
