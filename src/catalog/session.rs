//! Cookie session gate.
//!
//! A page request is authenticated when the session cookie is present and
//! non-empty. Its value is the acting user's display name, which the editor
//! stamps into `updated_by`. The gate runs before any product data is loaded.

use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

/// Identity of the signed-in user for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub signin_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "VITRINE_USER".to_string(),
            signin_path: "/signin".to_string(),
        }
    }
}

impl SessionConfig {
    /// Resolve the session, or the redirect an anonymous visitor gets.
    pub fn authenticate(&self, jar: &CookieJar) -> Result<Session, Redirect> {
        jar.get(&self.cookie_name)
            .map(|cookie| cookie.value().trim())
            .filter(|name| !name.is_empty())
            .map(|name| Session {
                user_name: name.to_string(),
            })
            .ok_or_else(|| Redirect::to(&self.signin_path))
    }

    pub fn sign_in(&self, jar: CookieJar, user_name: &str) -> CookieJar {
        let cookie = Cookie::build((self.cookie_name.clone(), user_name.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        jar.add(cookie)
    }

    pub fn sign_out(&self, jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(self.cookie_name.clone()).path("/"))
    }
}
