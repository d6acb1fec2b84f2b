//! Status and label pages.
//!
//! Both are flat catalogs of unique names, so one set of handlers serves
//! both, parameterized by a [`Catalog`] implementation.

use axum::extract::{Path, State};
use axum::response::Response;

use super::{FormBody, form_data, parse_id, run};
use crate::Result;
use crate::forms::{FormErrors, NameForm};
use crate::i18n::{Notice, Text};
use crate::models::{Label, Status};
use crate::storage::Storage;
use crate::web::guards::{protect, require_login};
use crate::web::render::{self, FormBuilder};
use crate::web::{AppState, Halt, Reply, RequestContext};

/// Routes, strings and storage calls for one catalog.
pub trait Catalog: Send + Sync + 'static {
    type Item;

    /// Index path, with trailing slash
    const INDEX: &'static str;
    const TITLE: Text;
    const CREATE_TITLE: Text;
    const UPDATE_TITLE: Text;
    const DELETE_TITLE: Text;
    const CREATED: Notice;
    const UPDATED: Notice;
    const DELETED: Notice;
    const IN_USE: Notice;

    fn id(item: &Self::Item) -> i64;
    fn name(item: &Self::Item) -> &str;
    fn created_at(item: &Self::Item) -> &chrono::DateTime<chrono::Utc>;

    fn list(storage: &Storage) -> Result<Vec<Self::Item>>;
    fn get(storage: &Storage, id: i64) -> Result<Self::Item>;
    fn create(storage: &mut Storage, name: &str) -> Result<Self::Item>;
    fn rename(storage: &mut Storage, id: i64, name: &str) -> Result<Self::Item>;
    fn delete(storage: &mut Storage, id: i64) -> Result<()>;
    fn name_taken(storage: &Storage, name: &str, exclude: Option<i64>) -> Result<bool>;
}

pub struct Statuses;

impl Catalog for Statuses {
    type Item = Status;

    const INDEX: &'static str = "/statuses/";
    const TITLE: Text = Text::Statuses;
    const CREATE_TITLE: Text = Text::CreateStatus;
    const UPDATE_TITLE: Text = Text::ChangingStatus;
    const DELETE_TITLE: Text = Text::StatusDeletion;
    const CREATED: Notice = Notice::StatusCreated;
    const UPDATED: Notice = Notice::StatusUpdated;
    const DELETED: Notice = Notice::StatusDeleted;
    const IN_USE: Notice = Notice::StatusInUse;

    fn id(item: &Status) -> i64 {
        item.id
    }

    fn name(item: &Status) -> &str {
        &item.name
    }

    fn created_at(item: &Status) -> &chrono::DateTime<chrono::Utc> {
        &item.created_at
    }

    fn list(storage: &Storage) -> Result<Vec<Status>> {
        storage.list_statuses()
    }

    fn get(storage: &Storage, id: i64) -> Result<Status> {
        storage.get_status(id)
    }

    fn create(storage: &mut Storage, name: &str) -> Result<Status> {
        storage.create_status(name)
    }

    fn rename(storage: &mut Storage, id: i64, name: &str) -> Result<Status> {
        storage.update_status(id, name)
    }

    fn delete(storage: &mut Storage, id: i64) -> Result<()> {
        storage.delete_status(id)
    }

    fn name_taken(storage: &Storage, name: &str, exclude: Option<i64>) -> Result<bool> {
        storage.status_name_taken(name, exclude)
    }
}

pub struct Labels;

impl Catalog for Labels {
    type Item = Label;

    const INDEX: &'static str = "/labels/";
    const TITLE: Text = Text::Labels;
    const CREATE_TITLE: Text = Text::CreateLabel;
    const UPDATE_TITLE: Text = Text::ChangingLabel;
    const DELETE_TITLE: Text = Text::LabelDeletion;
    const CREATED: Notice = Notice::LabelCreated;
    const UPDATED: Notice = Notice::LabelUpdated;
    const DELETED: Notice = Notice::LabelDeleted;
    const IN_USE: Notice = Notice::LabelInUse;

    fn id(item: &Label) -> i64 {
        item.id
    }

    fn name(item: &Label) -> &str {
        &item.name
    }

    fn created_at(item: &Label) -> &chrono::DateTime<chrono::Utc> {
        &item.created_at
    }

    fn list(storage: &Storage) -> Result<Vec<Label>> {
        storage.list_labels()
    }

    fn get(storage: &Storage, id: i64) -> Result<Label> {
        storage.get_label(id)
    }

    fn create(storage: &mut Storage, name: &str) -> Result<Label> {
        storage.create_label(name)
    }

    fn rename(storage: &mut Storage, id: i64, name: &str) -> Result<Label> {
        storage.update_label(id, name)
    }

    fn delete(storage: &mut Storage, id: i64) -> Result<()> {
        storage.delete_label(id)
    }

    fn name_taken(storage: &Storage, name: &str, exclude: Option<i64>) -> Result<bool> {
        storage.label_name_taken(name, exclude)
    }
}

pub async fn index<C: Catalog>(State(state): State<AppState>, ctx: RequestContext) -> Response {
    run(&state, ctx, |ctx, storage| index_page::<C>(ctx, storage)).await
}

pub async fn create_form<C: Catalog>(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Response {
    run(&state, ctx, |ctx, _| {
        require_login(ctx)?;
        Ok(create_page::<C>(ctx, &NameForm::default(), &FormErrors::new()))
    })
    .await
}

pub async fn create<C: Catalog>(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: FormBody,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        require_login(ctx)?;
        let form = NameForm::from_data(&form_data(body)?);
        match form.clean(|name| C::name_taken(storage, name, None))? {
            Ok(name) => {
                C::create(storage, &name)?;
                Ok(Reply::redirect_with(C::INDEX, C::CREATED))
            }
            Err(errors) => Ok(create_page::<C>(ctx, &form, &errors)),
        }
    })
    .await
}

pub async fn update_form<C: Catalog>(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        require_login(ctx)?;
        let item = C::get(storage, parse_id(&id)?)?;
        let form = NameForm {
            name: C::name(&item).to_string(),
        };
        Ok(update_page::<C>(ctx, C::id(&item), &form, &FormErrors::new()))
    })
    .await
}

pub async fn update<C: Catalog>(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    body: FormBody,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        require_login(ctx)?;
        let id = C::id(&C::get(storage, parse_id(&id)?)?);
        let form = NameForm::from_data(&form_data(body)?);
        match form.clean(|name| C::name_taken(storage, name, Some(id)))? {
            Ok(name) => {
                C::rename(storage, id, &name)?;
                Ok(Reply::redirect_with(C::INDEX, C::UPDATED))
            }
            Err(errors) => Ok(update_page::<C>(ctx, id, &form, &errors)),
        }
    })
    .await
}

pub async fn delete_confirm<C: Catalog>(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        require_login(ctx)?;
        let item = C::get(storage, parse_id(&id)?)?;
        let body = render::confirm_delete(
            ctx.locale,
            C::name(&item),
            &format!("{}{}/delete/", C::INDEX, C::id(&item)),
        );
        Ok(Reply::page(ctx.text(C::DELETE_TITLE), body))
    })
    .await
}

pub async fn delete<C: Catalog>(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        require_login(ctx)?;
        let id = C::id(&C::get(storage, parse_id(&id)?)?);
        protect(C::delete(storage, id), C::IN_USE, C::INDEX)?;
        Ok(Reply::redirect_with(C::INDEX, C::DELETED))
    })
    .await
}

fn index_page<C: Catalog>(
    ctx: &RequestContext,
    storage: &Storage,
) -> std::result::Result<Reply, Halt> {
    require_login(ctx)?;
    let items = C::list(storage)?;
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            vec![
                C::id(item).to_string(),
                render::escape(C::name(item)),
                render::date(C::created_at(item)),
                render::row_actions(ctx.locale, &format!("{}{}/", C::INDEX, C::id(item))),
            ]
        })
        .collect();

    let mut body = render::link(&format!("{}create/", C::INDEX), ctx.text(C::CREATE_TITLE));
    body.push('\n');
    body.push_str(&render::table(
        &[
            ctx.text(Text::Id),
            ctx.text(Text::Name),
            ctx.text(Text::CreatedAt),
            "",
        ],
        &rows,
    ));
    Ok(Reply::page(ctx.text(C::TITLE), body))
}

fn create_page<C: Catalog>(ctx: &RequestContext, form: &NameForm, errors: &FormErrors) -> Reply {
    let action = format!("{}create/", C::INDEX);
    let body = FormBuilder::new(ctx.locale, &action, errors)
        .text("name", Text::Name, &form.name)
        .submit(Text::Create);
    Reply::page(ctx.text(C::CREATE_TITLE), body)
}

fn update_page<C: Catalog>(
    ctx: &RequestContext,
    id: i64,
    form: &NameForm,
    errors: &FormErrors,
) -> Reply {
    let action = format!("{}{}/update/", C::INDEX, id);
    let body = FormBuilder::new(ctx.locale, &action, errors)
        .text("name", Text::Name, &form.name)
        .submit(Text::Change);
    Reply::page(ctx.text(C::UPDATE_TITLE), body)
}
