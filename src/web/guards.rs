//! Request guards.
//!
//! Handlers compose these with `?` in a fixed order: authentication, then
//! loading the target row, then ownership, then the operation itself with
//! the integrity guard around deletes. The first guard that refuses ends
//! the request with a redirect and a queued notice.

use crate::Error;
use crate::i18n::Notice;
use crate::models::User;

use super::RequestContext;

/// Where a refused request is sent, and what it is told.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denial {
    pub notice: Notice,
    pub redirect: &'static str,
}

/// Early exit from a handler body.
#[derive(Debug)]
pub enum Halt {
    /// A guard refused the request
    Deny(Denial),
    /// Something failed; rendered as 404 or 500
    Fail(Error),
}

impl Halt {
    pub fn deny(notice: Notice, redirect: &'static str) -> Self {
        Halt::Deny(Denial { notice, redirect })
    }
}

impl From<Error> for Halt {
    fn from(error: Error) -> Self {
        Halt::Fail(error)
    }
}

pub const LOGIN_URL: &str = "/login/";

/// Authentication gate: the requester must be logged in.
pub fn require_login(ctx: &RequestContext) -> Result<&User, Halt> {
    ctx.user
        .as_ref()
        .ok_or_else(|| Halt::deny(Notice::LoginRequired, LOGIN_URL))
}

/// Ownership gate: `actor` must be the owner of the target row.
pub fn require_owner(
    actor: &User,
    owner_id: i64,
    notice: Notice,
    fallback: &'static str,
) -> Result<(), Halt> {
    if actor.id == owner_id {
        Ok(())
    } else {
        Err(Halt::deny(notice, fallback))
    }
}

/// Integrity guard: a delete refused for live references becomes a
/// notice and a redirect. Any other failure passes through.
pub fn protect<T>(
    result: crate::Result<T>,
    notice: Notice,
    fallback: &'static str,
) -> Result<T, Halt> {
    match result {
        Ok(value) => Ok(value),
        Err(Error::Protected(what)) => {
            tracing::info!(%what, "delete refused, row still referenced");
            Err(Halt::deny(notice, fallback))
        }
        Err(e) => Err(Halt::Fail(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::Settings;
    use chrono::Utc;
    use std::sync::Arc;

    fn user(id: i64) -> User {
        User {
            id,
            username: format!("user{}", id),
            first_name: "F".to_string(),
            last_name: "L".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_require_login_denies_anonymous() {
        let ctx = RequestContext::anonymous(Arc::new(Settings::default()));
        match require_login(&ctx) {
            Err(Halt::Deny(denial)) => {
                assert_eq!(denial.notice, Notice::LoginRequired);
                assert_eq!(denial.redirect, "/login/");
            }
            other => panic!("expected denial, got {:?}", other),
        }
    }

    #[test]
    fn test_require_login_passes_user() {
        let mut ctx = RequestContext::anonymous(Arc::new(Settings::default()));
        ctx.user = Some(user(3));
        assert_eq!(require_login(&ctx).unwrap().id, 3);
    }

    #[test]
    fn test_require_owner() {
        let actor = user(1);
        assert!(require_owner(&actor, 1, Notice::UserForbidden, "/users/").is_ok());

        match require_owner(&actor, 2, Notice::TaskForbidden, "/tasks/") {
            Err(Halt::Deny(denial)) => {
                assert_eq!(
                    denial,
                    Denial {
                        notice: Notice::TaskForbidden,
                        redirect: "/tasks/"
                    }
                );
            }
            other => panic!("expected denial, got {:?}", other),
        }
    }

    #[test]
    fn test_protect_maps_only_protected_errors() {
        let ok = protect(Ok(5), Notice::StatusInUse, "/statuses/");
        assert!(matches!(ok, Ok(5)));

        let denied: Result<(), Halt> = protect(
            Err(Error::Protected("status 1".into())),
            Notice::StatusInUse,
            "/statuses/",
        );
        assert!(matches!(
            denied,
            Err(Halt::Deny(Denial {
                notice: Notice::StatusInUse,
                redirect: "/statuses/"
            }))
        ));

        let failed: Result<(), Halt> = protect(
            Err(Error::NotFound("status 1".into())),
            Notice::StatusInUse,
            "/statuses/",
        );
        assert!(matches!(failed, Err(Halt::Fail(Error::NotFound(_)))));
    }
}
