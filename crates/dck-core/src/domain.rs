/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram dialog id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DialogId(pub i64);

/// A conversation visible to the authenticated account.
///
/// Projection of the platform's dialog object; only the attributes the
/// reconciler compares on are carried.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dialog {
    pub id: DialogId,
    pub name: String,
}

/// A user (account profile or dialog participant).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Option<String>,
    pub display_name: String,
}

impl User {
    /// `@username` when the account has one, display name otherwise.
    pub fn handle(&self) -> String {
        match &self.username {
            Some(u) => format!("@{u}"),
            None => self.display_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_prefers_username() {
        let u = User {
            id: UserId(1),
            username: Some("tomas_hv".into()),
            display_name: "Tomas".into(),
        };
        assert_eq!(u.handle(), "@tomas_hv");
    }

    #[test]
    fn handle_falls_back_to_display_name() {
        let u = User {
            id: UserId(1),
            username: None,
            display_name: "Tomas".into(),
        };
        assert_eq!(u.handle(), "Tomas");
    }
}
