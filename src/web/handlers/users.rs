//! User registration, profile editing and removal.

use axum::extract::{Path, State};
use axum::response::Response;

use super::{FormBody, form_data, parse_id, run};
use crate::auth;
use crate::forms::{FormErrors, UserForm, ValidUser};
use crate::i18n::{Notice, Text};
use crate::models::{NewUser, User, UserChanges};
use crate::storage::Storage;
use crate::web::guards::{protect, require_login, require_owner};
use crate::web::render::{self, FormBuilder};
use crate::web::{AppState, Halt, Reply, RequestContext};

const INDEX: &str = "/users/";

pub async fn index(State(state): State<AppState>, ctx: RequestContext) -> Response {
    run(&state, ctx, |ctx, storage| index_page(ctx, storage)).await
}

pub async fn create_form(State(state): State<AppState>, ctx: RequestContext) -> Response {
    run(&state, ctx, |ctx, _| {
        if ctx.is_authenticated() {
            return Ok(Reply::redirect("/"));
        }
        Ok(registration_page(ctx, &UserForm::default(), &FormErrors::new()))
    })
    .await
}

pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: FormBody,
) -> Response {
    run(&state, ctx, move |ctx, storage| register(ctx, storage, body)).await
}

pub async fn update_form(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        let target = load_own_user(ctx, storage, &id)?;
        Ok(update_page(
            ctx,
            target.id,
            &UserForm::from_user(&target),
            &FormErrors::new(),
        ))
    })
    .await
}

pub async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    body: FormBody,
) -> Response {
    run(&state, ctx, move |ctx, storage| update_submit(ctx, storage, &id, body)).await
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        let target = load_own_user(ctx, storage, &id)?;
        let body = render::confirm_delete(
            ctx.locale,
            &target.full_name(),
            &format!("/users/{}/delete/", target.id),
        );
        Ok(Reply::page(ctx.text(Text::DeletingUser), body))
    })
    .await
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        let target = load_own_user(ctx, storage, &id)?;
        protect(storage.delete_user(target.id), Notice::UserInUse, INDEX)?;
        Ok(Reply::redirect_with(INDEX, Notice::UserDeleted))
    })
    .await
}

fn index_page(ctx: &RequestContext, storage: &Storage) -> Result<Reply, Halt> {
    let users = storage.list_users()?;
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| {
            vec![
                user.id.to_string(),
                render::escape(&user.username),
                render::escape(&user.full_name()),
                render::date(&user.created_at),
                render::row_actions(ctx.locale, &format!("/users/{}/", user.id)),
            ]
        })
        .collect();

    let body = render::table(
        &[
            ctx.text(Text::Id),
            ctx.text(Text::Username),
            ctx.text(Text::FullName),
            ctx.text(Text::CreatedAt),
            "",
        ],
        &rows,
    );
    Ok(Reply::page(ctx.text(Text::Users), body))
}

/// Authentication gate, target lookup, then ownership gate.
fn load_own_user(ctx: &RequestContext, storage: &Storage, raw_id: &str) -> Result<User, Halt> {
    let actor = require_login(ctx)?;
    let target = storage.get_user(parse_id(raw_id)?)?;
    require_owner(actor, target.id, Notice::UserForbidden, INDEX)?;
    Ok(target)
}

fn user_fields<'a>(builder: FormBuilder<'a>, form: &UserForm) -> FormBuilder<'a> {
    builder
        .text("first_name", Text::FirstName, &form.first_name)
        .text("last_name", Text::LastName, &form.last_name)
        .text("username", Text::Username, &form.username)
        .password("password1", Text::Password)
        .password("password2", Text::PasswordConfirmation)
}

fn registration_page(ctx: &RequestContext, form: &UserForm, errors: &FormErrors) -> Reply {
    let builder = FormBuilder::new(ctx.locale, "/users/create/", errors);
    let body = user_fields(builder, form).submit(Text::Register);
    Reply::page(ctx.text(Text::Registration), body)
}

fn update_page(ctx: &RequestContext, id: i64, form: &UserForm, errors: &FormErrors) -> Reply {
    let action = format!("/users/{}/update/", id);
    let builder = FormBuilder::new(ctx.locale, &action, errors);
    let body = user_fields(builder, form).submit(Text::Change);
    Reply::page(ctx.text(Text::ChangingUser), body)
}

fn register(ctx: &RequestContext, storage: &mut Storage, body: FormBody) -> Result<Reply, Halt> {
    if ctx.is_authenticated() {
        return Ok(Reply::redirect("/"));
    }

    let form = UserForm::from_data(&form_data(body)?);
    let valid = match form.clean(storage, None, ctx.settings().password_min_length)? {
        Ok(valid) => valid,
        Err(errors) => return Ok(registration_page(ctx, &form, &errors)),
    };

    storage.create_user(&new_user(valid)?)?;
    Ok(Reply::redirect_with("/login/", Notice::UserRegistered))
}

fn update_submit(
    ctx: &RequestContext,
    storage: &mut Storage,
    raw_id: &str,
    body: FormBody,
) -> Result<Reply, Halt> {
    let target = load_own_user(ctx, storage, raw_id)?;

    let form = UserForm::from_data(&form_data(body)?);
    let valid = match form.clean(
        storage,
        Some(target.id),
        ctx.settings().password_min_length,
    )? {
        Ok(valid) => valid,
        Err(errors) => return Ok(update_page(ctx, target.id, &form, &errors)),
    };

    let changes = UserChanges {
        password_hash: Some(auth::hash_password(&valid.password)?),
        username: valid.username,
        first_name: valid.first_name,
        last_name: valid.last_name,
    };
    storage.update_user(target.id, &changes)?;
    Ok(Reply::redirect_with(INDEX, Notice::UserUpdated))
}

fn new_user(valid: ValidUser) -> crate::Result<NewUser> {
    Ok(NewUser {
        password_hash: auth::hash_password(&valid.password)?,
        username: valid.username,
        first_name: valid.first_name,
        last_name: valid.last_name,
    })
}
