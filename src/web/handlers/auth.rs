//! Home page, login and logout.

use axum::extract::State;
use axum::response::Response;

use super::{FormBody, form_data, run};
use crate::forms::{FormErrors, LoginForm};
use crate::i18n::{Notice, Text};
use crate::storage::Storage;
use crate::web::render::{self, FormBuilder};
use crate::web::{AppState, Halt, Reply, RequestContext};

pub async fn home(State(state): State<AppState>, ctx: RequestContext) -> Response {
    run(&state, ctx, |ctx, _| Ok(home_page(ctx))).await
}

pub async fn login_form(State(state): State<AppState>, ctx: RequestContext) -> Response {
    run(&state, ctx, |ctx, _| {
        if ctx.is_authenticated() {
            return Ok(Reply::redirect("/"));
        }
        Ok(login_page(ctx, &LoginForm::default(), &FormErrors::new()))
    })
    .await
}

pub async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: FormBody,
) -> Response {
    run(&state, ctx, move |ctx, storage| login_submit(ctx, storage, body)).await
}

pub async fn logout(State(state): State<AppState>, ctx: RequestContext) -> Response {
    run(&state, ctx, |ctx, storage| {
        ctx.logout(storage)?;
        Ok(Reply::redirect_with("/", Notice::LoggedOut))
    })
    .await
}

fn home_page(ctx: &RequestContext) -> Reply {
    let mut body = render::message_body(ctx.text(Text::HomeLead));
    if !ctx.is_authenticated() {
        body.push('\n');
        body.push_str(&render::link("/login/", ctx.text(Text::LogIn)));
    }
    Reply::page(ctx.text(Text::HomeTitle), body)
}

fn login_page(ctx: &RequestContext, form: &LoginForm, errors: &FormErrors) -> Reply {
    let body = FormBuilder::new(ctx.locale, "/login/", errors)
        .text("username", Text::Username, &form.username)
        .password("password", Text::Password)
        .submit(Text::LogIn);
    Reply::page(ctx.text(Text::LogIn), body)
}

fn login_submit(
    ctx: &mut RequestContext,
    storage: &mut Storage,
    body: FormBody,
) -> Result<Reply, Halt> {
    if ctx.is_authenticated() {
        return Ok(Reply::redirect("/"));
    }

    let form = LoginForm::from_data(&form_data(body)?);
    match form.clean(storage)? {
        Ok(user) => {
            ctx.login(storage, user)?;
            Ok(Reply::redirect_with("/", Notice::LoggedIn))
        }
        Err(errors) => {
            tracing::info!(username = %form.username, "login failed");
            Ok(login_page(ctx, &form, &errors))
        }
    }
}
