//! Profile and session models

use serde::{Deserialize, Serialize};

/// Role given to users without an explicit one
pub const DEFAULT_ROLE: &str = "customer";
/// Role that unlocks the admin back-office
pub const ADMIN_ROLE: &str = "admin";

/// Row of the `profiles` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

/// Authenticated user as returned by the auth backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Active auth session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: SessionUser,
}

/// Postal address shown on the profile and checkout pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Signed-in user assembled from the session and its profile row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
    pub address: Address,
}

impl AuthUser {
    /// Merge a session user with its (possibly missing) profile row
    ///
    /// The username falls back to the local part of the e-mail address and the
    /// role to [`DEFAULT_ROLE`].
    pub fn from_session(user: &SessionUser, profile: Option<Profile>) -> Self {
        let email = user.email.clone().unwrap_or_default();
        let email_local = email.split('@').next().unwrap_or_default().to_string();
        let profile = profile.unwrap_or_default();

        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        Self {
            id: user.id.clone(),
            username: non_empty(profile.username).unwrap_or(email_local),
            email,
            phone_number: profile.phone.unwrap_or_default(),
            role: non_empty(profile.role).unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            address: Address {
                street: profile.street.unwrap_or_default(),
                city: profile.city.unwrap_or_default(),
                state: profile.state.unwrap_or_default(),
                zip: profile.zip.unwrap_or_default(),
            },
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_user() -> SessionUser {
        SessionUser {
            id: "u1".into(),
            email: Some("maria.lopez@example.com".into()),
        }
    }

    #[test]
    fn test_without_profile_uses_fallbacks() {
        let user = AuthUser::from_session(&session_user(), None);
        assert_eq!(user.username, "maria.lopez");
        assert_eq!(user.role, DEFAULT_ROLE);
        assert!(!user.is_admin());
        assert_eq!(user.address, Address::default());
    }

    #[test]
    fn test_profile_fields_win() {
        let profile = Profile {
            id: "u1".into(),
            username: Some("maria".into()),
            role: Some("admin".into()),
            city: Some("Sevilla".into()),
            ..Default::default()
        };
        let user = AuthUser::from_session(&session_user(), Some(profile));
        assert_eq!(user.username, "maria");
        assert!(user.is_admin());
        assert_eq!(user.address.city, "Sevilla");
    }

    #[test]
    fn test_empty_role_is_customer() {
        let profile = Profile {
            id: "u1".into(),
            role: Some(String::new()),
            ..Default::default()
        };
        let user = AuthUser::from_session(&session_user(), Some(profile));
        assert_eq!(user.role, DEFAULT_ROLE);
    }
}
