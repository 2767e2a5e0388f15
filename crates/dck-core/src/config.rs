use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{errors::Error, Result};

/// Placeholder credentials matching what the script shipped with. Running
/// against them fails the MTProto handshake; that latent misconfiguration
/// risk is documented behavior, not guarded against here.
const DEFAULT_API_ID: i32 = 12345;
const DEFAULT_API_HASH: &str = "0123456789abcdef0123456789abcdef";

const DEFAULT_SESSION_FILE: &str = "dck.session";
const DEFAULT_TARGET_CHAT: &str = "Dev chat";
const DEFAULT_TARGET_USER: &str = "tomas_hv";

/// Typed configuration, sourced from the environment (plus `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    /// Application identifier for the platform's auth handshake.
    pub api_id: i32,
    /// Application secret for the platform's auth handshake.
    pub api_hash: String,
    /// Local session artifact; opaque to us, owned by the client library.
    pub session_file: PathBuf,
    /// Display name of the group chat to watch.
    pub target_chat: String,
    /// Handle of the user to keep in the chat, without the `@` prefix.
    pub target_user: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let api_id = match env_str("API_ID").and_then(non_empty) {
            Some(raw) => raw.trim().parse::<i32>().map_err(|_| {
                Error::Config(format!("API_ID must be an integer, got {raw:?}"))
            })?,
            None => DEFAULT_API_ID,
        };
        let api_hash = env_str("API_HASH")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_API_HASH.to_string());

        let session_file = env::var_os("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

        let target_chat = env_str("TARGET_CHAT")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_TARGET_CHAT.to_string());
        let target_user = env_str("TARGET_USER")
            .and_then(non_empty)
            .map(|u| normalize_handle(&u))
            .unwrap_or_else(|| DEFAULT_TARGET_USER.to_string());

        Ok(Self {
            api_id,
            api_hash,
            session_file,
            target_chat,
            target_user,
        })
    }
}

/// Usernames are stored and compared without the `@` prefix.
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_string()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
