use futures::TryStreamExt;

use crate::{domain::Dialog, port::TelegramPort, Result};

/// Find a dialog by its display name.
///
/// Exact string equality only; the first match in platform order wins when
/// several dialogs share a name (documented ambiguity, kept as-is). Absence
/// is a valid state, not an error; listing failures propagate unmodified.
pub async fn dialog_by_name(port: &dyn TelegramPort, name: &str) -> Result<Option<Dialog>> {
    let mut dialogs = port.dialogs();
    while let Some(dialog) = dialogs.try_next().await? {
        if dialog.name == name {
            return Ok(Some(dialog));
        }
    }
    Ok(None)
}
