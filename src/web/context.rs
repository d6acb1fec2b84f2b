//! Per-request session, identity and locale.

use axum::extract::FromRequestParts;
use axum::http::header::{ACCEPT_LANGUAGE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use std::convert::Infallible;
use std::sync::Arc;

use super::guards::Halt;
use super::render;
use super::{AppState, SESSION_COOKIE, Settings};
use crate::i18n::{Locale, Notice, Text};
use crate::models::User;
use crate::storage::Storage;
use crate::{Error, Result};

/// Successful outcome of a handler body.
#[derive(Debug)]
pub enum Reply {
    /// Render a full page around `body`
    Page { title: String, body: String },
    /// 302 to `to`, optionally queueing a notice first
    Redirect { to: String, notice: Option<Notice> },
}

impl Reply {
    pub fn page(title: impl Into<String>, body: impl Into<String>) -> Self {
        Reply::Page {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn redirect(to: impl Into<String>) -> Self {
        Reply::Redirect {
            to: to.into(),
            notice: None,
        }
    }

    pub fn redirect_with(to: impl Into<String>, notice: Notice) -> Self {
        Reply::Redirect {
            to: to.into(),
            notice: Some(notice),
        }
    }
}

/// Everything a handler knows about who is asking.
pub struct RequestContext {
    /// Token of the live session, if any
    token: Option<String>,
    /// Set when this request issued a new token that the browser must store
    issued: bool,
    pub user: Option<User>,
    pub locale: Locale,
    settings: Arc<Settings>,
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let locale = Locale::negotiate(
            parts
                .headers
                .get(ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok()),
            state.settings.language,
        );

        let mut ctx = RequestContext {
            token: None,
            issued: false,
            user: None,
            locale,
            settings: state.settings.clone(),
        };

        if let Some(token) = session_cookie(&parts.headers) {
            let storage = state.storage.lock().await;
            match storage.load_session(&token) {
                Ok(Some(session)) => {
                    ctx.user = session.user;
                    ctx.token = Some(token);
                }
                Ok(None) => {}
                // Serve the request anonymously rather than failing it
                Err(e) => tracing::error!(error = %e, "failed to load session"),
            }
        }

        Ok(ctx)
    }
}

/// Find the session token among the request cookies.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

impl RequestContext {
    /// Context for an anonymous request, used by tests and error paths.
    pub fn anonymous(settings: Arc<Settings>) -> Self {
        Self {
            token: None,
            issued: false,
            user: None,
            locale: settings.language,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn text(&self, text: Text) -> &'static str {
        text.get(self.locale)
    }

    /// Token of the current session, starting an anonymous one if needed.
    fn ensure_session(&mut self, storage: &mut Storage) -> Result<String> {
        if let Some(ref token) = self.token {
            return Ok(token.clone());
        }
        let token = storage.create_session(None, self.settings.session_ttl)?;
        self.token = Some(token.clone());
        self.issued = true;
        Ok(token)
    }

    /// Queue a notice for the next rendered page.
    pub fn notify(&mut self, storage: &mut Storage, notice: Notice) -> Result<()> {
        let token = self.ensure_session(storage)?;
        storage.push_notice(&token, notice)
    }

    /// Bind the session to `user` under a fresh token.
    pub fn login(&mut self, storage: &mut Storage, user: User) -> Result<()> {
        let token = storage.rotate_session(
            self.token.as_deref(),
            Some(user.id),
            self.settings.session_ttl,
        )?;
        tracing::info!(user_id = user.id, "user logged in");
        self.token = Some(token);
        self.issued = true;
        self.user = Some(user);
        Ok(())
    }

    /// Drop the identity, keeping an anonymous session for notices.
    pub fn logout(&mut self, storage: &mut Storage) -> Result<()> {
        if let Some(ref user) = self.user {
            tracing::info!(user_id = user.id, "user logged out");
        }
        if self.token.is_some() {
            let token =
                storage.rotate_session(self.token.as_deref(), None, self.settings.session_ttl)?;
            self.token = Some(token);
            self.issued = true;
        }
        self.user = None;
        Ok(())
    }

    /// Turn a handler outcome into the HTTP response.
    pub fn finish(
        mut self,
        storage: &mut Storage,
        outcome: std::result::Result<Reply, Halt>,
    ) -> Response {
        let response = match self.respond(storage, outcome) {
            Ok(response) => response,
            Err(e) => self.server_error(&e),
        };
        self.attach_cookie(response)
    }

    fn respond(
        &mut self,
        storage: &mut Storage,
        outcome: std::result::Result<Reply, Halt>,
    ) -> Result<Response> {
        match outcome {
            Ok(Reply::Page { title, body }) => {
                let notices = match self.token {
                    Some(ref token) => storage.take_notices(token)?,
                    None => Vec::new(),
                };
                let html = render::layout(
                    self.locale,
                    self.user.as_ref(),
                    &notices,
                    &title,
                    &body,
                );
                Ok(Html(html).into_response())
            }
            Ok(Reply::Redirect { to, notice }) => {
                if let Some(notice) = notice {
                    self.notify(storage, notice)?;
                }
                Ok(redirect(&to))
            }
            Err(Halt::Deny(denial)) => {
                tracing::warn!(
                    notice = denial.notice.key(),
                    user_id = self.user.as_ref().map(|u| u.id),
                    redirect = denial.redirect,
                    "request denied"
                );
                self.notify(storage, denial.notice)?;
                Ok(redirect(denial.redirect))
            }
            Err(Halt::Fail(Error::NotFound(what))) => {
                tracing::debug!(%what, "not found");
                Ok(self.not_found())
            }
            Err(Halt::Fail(Error::InvalidInput(what))) => {
                tracing::info!(%what, "unreadable request body");
                Ok(self.message(StatusCode::BAD_REQUEST, Text::BadRequest))
            }
            Err(Halt::Fail(e)) => Ok(self.server_error(&e)),
        }
    }

    pub fn not_found(&self) -> Response {
        self.message(StatusCode::NOT_FOUND, Text::NotFound)
    }

    fn server_error(&self, error: &Error) -> Response {
        tracing::error!(%error, "request failed");
        self.message(StatusCode::INTERNAL_SERVER_ERROR, Text::ServerError)
    }

    /// Bare page whose title is also its only content.
    fn message(&self, status: StatusCode, text: Text) -> Response {
        let title = self.text(text);
        let html = render::layout(
            self.locale,
            self.user.as_ref(),
            &[],
            title,
            &render::message_body(title),
        );
        (status, Html(html)).into_response()
    }

    fn attach_cookie(&self, mut response: Response) -> Response {
        if !self.issued {
            return response;
        }
        let Some(ref token) = self.token else {
            return response;
        };

        let max_age = self.settings.session_ttl.num_seconds();
        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            SESSION_COOKIE, token, max_age
        );
        if self.settings.secure_cookies {
            cookie.push_str("; Secure");
        }
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(SET_COOKIE, value);
        }
        response
    }
}

/// 302 Found to a local path.
pub fn redirect(to: &str) -> Response {
    let mut response = StatusCode::FOUND.into_response();
    if let Ok(value) = HeaderValue::from_str(to) {
        response.headers_mut().insert(LOCATION, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for cookie in cookies {
            map.append(COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        map
    }

    #[test]
    fn test_session_cookie_found_among_others() {
        let map = headers(&["theme=dark; taskmate_session=abc123; lang=ru"]);
        assert_eq!(session_cookie(&map).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_session_cookie_across_headers() {
        let map = headers(&["theme=dark", "taskmate_session=xyz"]);
        assert_eq!(session_cookie(&map).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_session_cookie_missing_or_empty() {
        assert!(session_cookie(&headers(&[])).is_none());
        assert!(session_cookie(&headers(&["taskmate_session="])).is_none());
        assert!(session_cookie(&headers(&["other_session=1"])).is_none());
    }

    #[test]
    fn test_redirect_sets_location() {
        let response = redirect("/login/");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/login/");
    }

    #[test]
    fn test_deny_queues_notice_and_sets_cookie() {
        let mut storage = Storage::open_in_memory().unwrap();
        let ctx = RequestContext::anonymous(Arc::new(Settings::default()));

        let response = ctx.finish(
            &mut storage,
            Err(Halt::Deny(crate::web::Denial {
                notice: Notice::LoginRequired,
                redirect: "/login/",
            })),
        );

        assert_eq!(response.status(), StatusCode::FOUND);
        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("taskmate_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("Secure"));

        let token = cookie
            .trim_start_matches("taskmate_session=")
            .split(';')
            .next()
            .unwrap();
        assert_eq!(
            storage.take_notices(token).unwrap(),
            vec![Notice::LoginRequired]
        );
    }

    #[test]
    fn test_not_found_error_renders_404() {
        let mut storage = Storage::open_in_memory().unwrap();
        let ctx = RequestContext::anonymous(Arc::new(Settings::default()));
        let response = ctx.finish(
            &mut storage,
            Err(Halt::Fail(Error::NotFound("Task not found: 9".into()))),
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[test]
    fn test_other_errors_render_500() {
        let mut storage = Storage::open_in_memory().unwrap();
        let ctx = RequestContext::anonymous(Arc::new(Settings::default()));
        let response = ctx.finish(&mut storage, Err(Halt::Fail(Error::Other("boom".into()))));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_input_renders_400() {
        let mut storage = Storage::open_in_memory().unwrap();
        let ctx = RequestContext::anonymous(Arc::new(Settings::default()));
        let response = ctx.finish(
            &mut storage,
            Err(Halt::Fail(Error::InvalidInput("missing content type".into()))),
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_secure_cookie_attribute() {
        let mut storage = Storage::open_in_memory().unwrap();
        let settings = Settings {
            secure_cookies: true,
            ..Settings::default()
        };
        let ctx = RequestContext::anonymous(Arc::new(settings));
        let response = ctx.finish(
            &mut storage,
            Ok(Reply::redirect_with("/", Notice::LoggedOut)),
        );
        let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.ends_with("; Secure"));
    }
}
