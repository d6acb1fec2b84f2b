//! Route handlers.
//!
//! Each axum handler is a thin async shell around a synchronous body that
//! runs with the storage lock held.

pub mod auth;
pub mod catalog;
pub mod tasks;
pub mod users;

use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::response::Response;

use super::{AppState, Halt, Reply, RequestContext};
use crate::forms::FormData;
use crate::storage::Storage;
use crate::{Error, Result};

/// A posted form, decoded lazily so the guards run before a bad body is
/// reported.
pub type FormBody = std::result::Result<Form<Vec<(String, String)>>, FormRejection>;

/// Lock storage, run `body`, and render its outcome.
async fn run<F>(state: &AppState, mut ctx: RequestContext, body: F) -> Response
where
    F: FnOnce(&mut RequestContext, &mut Storage) -> std::result::Result<Reply, Halt>,
{
    let mut storage = state.storage.lock().await;
    let outcome = body(&mut ctx, &mut storage);
    ctx.finish(&mut storage, outcome)
}

/// Path ids that are not numbers name nothing.
fn parse_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| Error::NotFound(format!("no such id: {}", raw)))
}

/// Unwrap a posted form; undecodable bodies become a 400.
fn form_data(body: FormBody) -> Result<FormData> {
    body.map(|Form(pairs)| FormData::new(pairs))
        .map_err(|rejection| Error::InvalidInput(rejection.body_text()))
}

pub async fn not_found(ctx: RequestContext) -> Response {
    ctx.not_found()
}
