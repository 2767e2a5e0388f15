//! In-memory `TelegramPort` fake shared by the resolver and reconciler tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::{
    domain::{Dialog, DialogId, User, UserId},
    port::{DialogStream, TelegramPort},
    Error, Result,
};

pub(crate) fn user(id: i64, username: &str) -> User {
    User {
        id: UserId(id),
        username: Some(username.to_string()),
        display_name: username.to_string(),
    }
}

/// One recorded `add_participant` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct InviteCall {
    pub dialog: DialogId,
    pub user: UserId,
    pub fwd_limit: i32,
}

#[derive(Default)]
pub(crate) struct FakeTelegram {
    me: Option<User>,
    dialogs: Vec<Dialog>,
    dialog_error: Option<String>,
    users: Vec<User>,
    participants: Mutex<Vec<User>>,
    /// When set, dialog listings come back empty after this many passes.
    listings_left: Mutex<Option<u32>>,
    /// When set, the next `participants` call fails with a flood wait.
    flood_next_participants: Mutex<Option<Duration>>,
    invites: Mutex<Vec<InviteCall>>,
}

impl FakeTelegram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_me(mut self, me: User) -> Self {
        self.me = Some(me);
        self
    }

    pub fn with_dialog(mut self, id: i64, name: &str) -> Self {
        self.dialogs.push(Dialog {
            id: DialogId(id),
            name: name.to_string(),
        });
        self
    }

    pub fn with_dialog_error(mut self, message: &str) -> Self {
        self.dialog_error = Some(message.to_string());
        self
    }

    pub fn with_user(mut self, u: User) -> Self {
        self.users.push(u);
        self
    }

    pub fn with_participant(self, u: User) -> Self {
        self.participants.lock().unwrap().push(u.clone());
        self.with_user(u)
    }

    pub fn dialog_gone_after(self, listings: u32) -> Self {
        *self.listings_left.lock().unwrap() = Some(listings);
        self
    }

    pub fn flood_next_participants(self, retry_after: Duration) -> Self {
        *self.flood_next_participants.lock().unwrap() = Some(retry_after);
        self
    }

    pub fn invites(&self) -> Vec<InviteCall> {
        self.invites.lock().unwrap().clone()
    }
}

#[async_trait]
impl TelegramPort for FakeTelegram {
    async fn get_self(&self) -> Result<User> {
        match &self.me {
            Some(me) => Ok(me.clone()),
            None => Ok(user(0, "me")),
        }
    }

    fn dialogs(&self) -> DialogStream<'_> {
        if let Some(message) = &self.dialog_error {
            let failure: Result<Dialog> = Err(Error::Telegram(message.clone()));
            return stream::iter(vec![failure]).boxed();
        }

        let mut left = self.listings_left.lock().unwrap();
        let visible = match *left {
            Some(0) => Vec::new(),
            Some(n) => {
                *left = Some(n - 1);
                self.dialogs.clone()
            }
            None => self.dialogs.clone(),
        };
        drop(left);

        stream::iter(visible.into_iter().map(Ok::<_, Error>)).boxed()
    }

    async fn resolve_user(&self, username: &str) -> Result<User> {
        self.users
            .iter()
            .find(|u| u.username.as_deref() == Some(username))
            .cloned()
            .ok_or_else(|| Error::Telegram(format!("no user with username @{username}")))
    }

    async fn participants(&self, _dialog: DialogId) -> Result<Vec<User>> {
        if let Some(retry_after) = self.flood_next_participants.lock().unwrap().take() {
            return Err(Error::FloodWait { retry_after });
        }
        Ok(self.participants.lock().unwrap().clone())
    }

    async fn add_participant(&self, dialog: DialogId, user: UserId, fwd_limit: i32) -> Result<()> {
        self.invites.lock().unwrap().push(InviteCall {
            dialog,
            user,
            fwd_limit,
        });

        // Mirror the platform: an invited user shows up in later listings.
        if let Some(u) = self.users.iter().find(|u| u.id == user) {
            self.participants.lock().unwrap().push(u.clone());
        }
        Ok(())
    }
}
