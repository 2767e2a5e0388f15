use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::{
    domain::{Dialog, DialogId, User, UserId},
    Result,
};

/// Lazy dialog listing in platform order (typically most recently active
/// first).
pub type DialogStream<'a> = BoxStream<'a, Result<Dialog>>;

/// Hexagonal port for the Telegram client.
///
/// The grammers adapter is the live implementation; tests drive the resolver
/// and reconciler against an in-memory fake. Every method is a suspension
/// point and may fail with an opaque [`crate::Error::Telegram`] (or
/// [`crate::Error::FloodWait`] when the server throttles us).
#[async_trait]
pub trait TelegramPort: Send + Sync {
    /// Profile of the authenticated account.
    async fn get_self(&self) -> Result<User>;

    /// All conversations visible to the account, fetched page by page.
    fn dialogs(&self) -> DialogStream<'_>;

    /// Identity lookup by username (no `@` prefix). An unknown username is a
    /// failure, not an absence: the loop has nothing sensible to do without
    /// the target's identity.
    async fn resolve_user(&self, username: &str) -> Result<User>;

    /// Full participant list of a dialog.
    async fn participants(&self, dialog: DialogId) -> Result<Vec<User>>;

    /// Add a user to a dialog. `fwd_limit` bounds how many prior messages
    /// the new member can see (basic groups only; channels have no such
    /// concept).
    async fn add_participant(&self, dialog: DialogId, user: UserId, fwd_limit: i32) -> Result<()>;
}
