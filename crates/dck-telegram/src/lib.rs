//! Telegram adapter (grammers).
//!
//! This crate implements the `dck-core` TelegramPort over MTProto via
//! `grammers-client`, and owns the session bootstrap: connect with the named
//! session file and run the interactive login flow on first use.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::Mutex;
use tracing::info;

use grammers_client::session::{PackedChat, PackedType, Session};
use grammers_client::types::Chat;
use grammers_client::{
    grammers_tl_types as tl, Client, Config as ClientConfig, InitParams, InvocationError,
    SignInError,
};

use dck_core::{
    config::Config,
    domain::{Dialog, DialogId, User, UserId},
    port::{DialogStream, TelegramPort},
    Error, Result,
};

/// Connect with the configured session file, logging in interactively on
/// first use. Later runs reuse the session artifact and stay
/// non-interactive.
pub async fn connect(cfg: &Config) -> Result<Client> {
    let session = Session::load_file_or_create(&cfg.session_file).map_err(|e| {
        Error::Config(format!(
            "session file {}: {e}",
            cfg.session_file.display()
        ))
    })?;

    let client = Client::connect(ClientConfig {
        session,
        api_id: cfg.api_id,
        api_hash: cfg.api_hash.clone(),
        params: InitParams::default(),
    })
    .await
    .map_err(|e| Error::Telegram(format!("connect: {e}")))?;

    if !client.is_authorized().await.map_err(map_invocation)? {
        sign_in(&client, cfg).await?;
    }

    Ok(client)
}

async fn sign_in(client: &Client, cfg: &Config) -> Result<()> {
    let phone = prompt("Enter your phone number (international format): ")?;
    let token = client
        .request_login_code(phone.trim())
        .await
        .map_err(|e| Error::Telegram(format!("request login code: {e}")))?;

    let code = prompt("Enter the login code: ")?;
    match client.sign_in(&token, code.trim()).await {
        Ok(_) => {}
        Err(SignInError::PasswordRequired(password_token)) => {
            let hint = password_token.hint().unwrap_or("none");
            let password = prompt(&format!("Enter the 2FA password (hint: {hint}): "))?;
            client
                .check_password(password_token, password.trim())
                .await
                .map_err(|e| Error::Telegram(format!("password check: {e}")))?;
        }
        Err(e) => return Err(Error::Telegram(format!("sign in: {e}"))),
    }

    client
        .session()
        .save_to_file(&cfg.session_file)
        .map_err(|e| Error::Telegram(format!("save session: {e}")))?;
    info!("session saved to {}", cfg.session_file.display());

    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(message.as_bytes())?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

/// `TelegramPort` over a connected grammers client.
///
/// MTProto wants the access hash alongside the bare id for participant and
/// invite calls, so packed records are cached as chats show up in dialog
/// listings and users in lookups.
pub struct GrammersTelegram {
    client: Client,
    chats: Mutex<HashMap<i64, PackedChat>>,
    users: Mutex<HashMap<i64, PackedChat>>,
}

impl GrammersTelegram {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            chats: Mutex::new(HashMap::new()),
            users: Mutex::new(HashMap::new()),
        }
    }

    async fn packed_chat(&self, dialog: DialogId) -> Result<PackedChat> {
        self.chats.lock().await.get(&dialog.0).cloned().ok_or_else(|| {
            Error::Telegram(format!("dialog {} not seen in any listing yet", dialog.0))
        })
    }

    async fn packed_user(&self, user: UserId) -> Result<PackedChat> {
        self.users.lock().await.get(&user.0).cloned().ok_or_else(|| {
            Error::Telegram(format!("user {} not resolved yet", user.0))
        })
    }
}

#[async_trait]
impl TelegramPort for GrammersTelegram {
    async fn get_self(&self) -> Result<User> {
        let me = self.client.get_me().await.map_err(map_invocation)?;
        Ok(map_user(&me))
    }

    fn dialogs(&self) -> DialogStream<'_> {
        futures::stream::try_unfold(
            (self, self.client.iter_dialogs()),
            |(this, mut iter)| async move {
                match iter.next().await {
                    Ok(Some(dialog)) => {
                        let chat = dialog.chat();
                        this.chats.lock().await.insert(chat.id(), chat.pack());
                        let item = Dialog {
                            id: DialogId(chat.id()),
                            name: chat.name().to_string(),
                        };
                        Ok(Some((item, (this, iter))))
                    }
                    Ok(None) => Ok(None),
                    Err(e) => Err(map_invocation(e)),
                }
            },
        )
        .boxed()
    }

    async fn resolve_user(&self, username: &str) -> Result<User> {
        let resolved = self
            .client
            .resolve_username(username)
            .await
            .map_err(map_invocation)?;

        match resolved {
            Some(Chat::User(u)) => {
                self.users.lock().await.insert(u.id(), u.pack());
                Ok(map_user(&u))
            }
            Some(other) => Err(Error::Telegram(format!(
                "@{username} resolves to {:?}, not a user",
                other.name()
            ))),
            None => Err(Error::Telegram(format!("no user with username @{username}"))),
        }
    }

    async fn participants(&self, dialog: DialogId) -> Result<Vec<User>> {
        let packed = self.packed_chat(dialog).await?;

        let mut iter = self.client.iter_participants(packed);
        let mut members = Vec::new();
        while let Some(participant) = iter.next().await.map_err(map_invocation)? {
            let u = participant.user;
            self.users.lock().await.insert(u.id(), u.pack());
            members.push(map_user(&u));
        }
        Ok(members)
    }

    async fn add_participant(&self, dialog: DialogId, user: UserId, fwd_limit: i32) -> Result<()> {
        let chat = self.packed_chat(dialog).await?;
        let member = self.packed_user(user).await?;

        match chat.ty {
            PackedType::Chat => {
                self.client
                    .invoke(&tl::functions::messages::AddChatUser {
                        chat_id: chat.id,
                        user_id: input_user(member),
                        fwd_limit,
                    })
                    .await
                    .map_err(map_invocation)?;
            }
            PackedType::Megagroup | PackedType::Broadcast | PackedType::Gigagroup => {
                // Channels have no forward-limit concept.
                self.client
                    .invoke(&tl::functions::channels::InviteToChannel {
                        channel: input_channel(chat),
                        users: vec![input_user(member)],
                    })
                    .await
                    .map_err(map_invocation)?;
            }
            PackedType::User | PackedType::Bot => {
                return Err(Error::Telegram(format!(
                    "dialog {} is a direct chat, cannot add members",
                    dialog.0
                )));
            }
        }

        Ok(())
    }
}

fn map_user(u: &grammers_client::types::User) -> User {
    User {
        id: UserId(u.id()),
        username: u.username().map(str::to_string),
        display_name: u.full_name(),
    }
}

fn input_user(packed: PackedChat) -> tl::enums::InputUser {
    tl::enums::InputUser::User(tl::types::InputUser {
        user_id: packed.id,
        access_hash: packed.access_hash.unwrap_or(0),
    })
}

fn input_channel(packed: PackedChat) -> tl::enums::InputChannel {
    tl::enums::InputChannel::Channel(tl::types::InputChannel {
        channel_id: packed.id,
        access_hash: packed.access_hash.unwrap_or(0),
    })
}

fn map_invocation(e: InvocationError) -> Error {
    match e {
        InvocationError::Rpc(rpc) if rpc.name == "FLOOD_WAIT" => Error::FloodWait {
            retry_after: Duration::from_secs(u64::from(rpc.value.unwrap_or(1))),
        },
        other => Error::Telegram(format!("{other}")),
    }
}
