//! Session gate for identity-scoped endpoints.
//!
//! The session lives entirely in an encrypted cookie holding the user's email
//! and an expiry timestamp. [`SessionContext`] wraps the Actix session with
//! login-shaped operations; [`SessionEmail`] is the extractor handlers take
//! to require a live session.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::{DateTime, TimeDelta, Utc};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::{Error, UserEmail};

use super::state::HttpState;

pub(crate) const EMAIL_KEY: &str = "email";
pub(crate) const EXPIRES_AT_KEY: &str = "expires_at";

/// Lifetime of a login.
pub const SESSION_TTL_HOURS: i64 = 5;

fn session_ttl() -> TimeDelta {
    TimeDelta::hours(SESSION_TTL_HOURS)
}

/// Newtype wrapper exposing login-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Bind `email` to the session until `now` plus the session lifetime.
    ///
    /// The session is renewed first so a login never reuses an older state.
    pub fn persist_login(
        &self,
        email: &UserEmail,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, Error> {
        let expires_at = now + session_ttl();
        self.0.renew();
        self.0
            .insert(EMAIL_KEY, email.as_ref())
            .and_then(|()| self.0.insert(EXPIRES_AT_KEY, expires_at.timestamp()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))?;
        Ok(expires_at)
    }

    /// The email bound to a live session, if any.
    ///
    /// Expired sessions are purged so the response clears the cookie.
    pub fn email(&self, now: DateTime<Utc>) -> Result<Option<UserEmail>, Error> {
        let read_error =
            |error: actix_session::SessionGetError| Error::internal(format!("failed to read session: {error}"));
        let email = self.0.get::<String>(EMAIL_KEY).map_err(read_error)?;
        let expires_at = self.0.get::<i64>(EXPIRES_AT_KEY).map_err(read_error)?;

        let (Some(email), Some(expires_at)) = (email, expires_at) else {
            return Ok(None);
        };
        if now.timestamp() >= expires_at {
            debug!(expires_at, "session expired");
            self.0.purge();
            return Ok(None);
        }
        match UserEmail::new(email) {
            Ok(email) => Ok(Some(email)),
            Err(error) => {
                warn!(%error, "invalid email in session cookie");
                Ok(None)
            }
        }
    }

    /// Require a live session or fail with `401 Unauthorized`.
    pub fn require_email(&self, now: DateTime<Utc>) -> Result<UserEmail, Error> {
        self.email(now)?
            .ok_or_else(|| Error::unauthorized("unauthorized access"))
    }

    /// Drop all session state; the response expires the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Email of the caller's live session.
///
/// Extraction fails with `401 Unauthorized` when the cookie is missing,
/// expired, or could not be decrypted; the handler never runs.
#[derive(Debug, Clone)]
pub struct SessionEmail(pub UserEmail);

impl SessionEmail {
    pub fn into_inner(self) -> UserEmail {
        self.0
    }
}

impl FromRequest for SessionEmail {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let fut = SessionContext::from_request(req, payload);
        Box::pin(async move {
            let session = fut.await?;
            let state = state
                .ok_or_else(|| Error::internal("session gate used without HttpState"))?;
            let email = session.require_email(state.clock.utc())?;
            Ok(SessionEmail(email))
        })
    }
}

#[cfg(test)]
mod tests;
