//! The membership reconciler: keep the target user inside the target chat.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::{
    domain::{Dialog, User},
    pacing::{wait, Delay},
    port::TelegramPort,
    resolver::dialog_by_name,
    Error, Result,
};

/// How many prior messages a freshly added member may see.
pub const FORWARD_LIMIT: i32 = 10;

/// Pause between reconcile passes.
pub const LOOP_DELAY: Duration = Duration::from_secs(4);

/// What a single reconcile pass did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The target dialog is no longer visible. The loop's only graceful exit.
    DialogGone,
    /// The user was already a member; nothing was mutated.
    AlreadyMember { dialog: Dialog, user: User },
    /// The user was absent and exactly one invite was issued.
    Invited { dialog: Dialog, user: User },
}

pub struct Reconciler {
    port: Arc<dyn TelegramPort>,
    chat_name: String,
    username: String,
}

impl Reconciler {
    pub fn new(
        port: Arc<dyn TelegramPort>,
        chat_name: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            port,
            chat_name: chat_name.into(),
            username: username.into(),
        }
    }

    /// One reconcile pass: resolve the dialog, check membership by id,
    /// invite iff absent. The membership check immediately precedes the
    /// mutating call, so a present user is never re-invited.
    pub async fn step(&self) -> Result<Outcome> {
        let Some(dialog) = dialog_by_name(self.port.as_ref(), &self.chat_name).await? else {
            return Ok(Outcome::DialogGone);
        };

        let target = self.port.resolve_user(&self.username).await?;

        info!("checking whether {} is in {:?}", target.handle(), dialog.name);

        let members = self.port.participants(dialog.id).await?;
        let found = members.iter().any(|m| m.id == target.id);

        if found {
            info!("{} found, nothing to do", target.handle());
            return Ok(Outcome::AlreadyMember {
                dialog,
                user: target,
            });
        }

        info!("{} not found, adding", target.handle());
        self.port
            .add_participant(dialog.id, target.id, FORWARD_LIMIT)
            .await?;
        info!("{} added", target.handle());

        Ok(Outcome::Invited {
            dialog,
            user: target,
        })
    }

    /// Drive [`Reconciler::step`] until the target dialog disappears.
    ///
    /// A flood wait pauses for the server-provided backoff and resumes;
    /// every other failure propagates to the process boundary.
    pub async fn run(&self) -> Result<()> {
        loop {
            match self.step().await {
                Ok(Outcome::DialogGone) => {
                    info!("dialog {:?} no longer visible, stopping", self.chat_name);
                    return Ok(());
                }
                Ok(_) => {}
                Err(Error::FloodWait { retry_after }) => {
                    warn!("flood wait, resuming in {retry_after:?}");
                    wait(Delay::Exact(retry_after)).await;
                    continue;
                }
                Err(e) => return Err(e),
            }

            wait(Delay::Exact(LOOP_DELAY)).await;
        }
    }
}

/// Startup announcement: log the authenticated profile and whether the
/// target dialog is currently visible. Informational only, mutates nothing.
pub async fn announce(port: &dyn TelegramPort, chat_name: &str) -> Result<()> {
    let me = port.get_self().await?;
    info!("signed in as {} (id {})", me.handle(), me.id.0);

    match dialog_by_name(port, chat_name).await? {
        Some(dialog) => info!("target dialog {:?} found (id {})", dialog.name, dialog.id.0),
        None => info!("target dialog {:?} not visible", chat_name),
    }
    Ok(())
}
