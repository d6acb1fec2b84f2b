//! Task pages: filtered list, detail, create, update and delete.

use axum::extract::{Path, Query, State};
use axum::response::Response;

use super::{FormBody, form_data, parse_id, run};
use crate::forms::{FilterForm, FormData, FormErrors, TaskForm};
use crate::i18n::{Notice, Text};
use crate::models::{Task, User};
use crate::storage::Storage;
use crate::web::guards::{require_login, require_owner};
use crate::web::render::{self, FilterBuilder, FormBuilder};
use crate::web::{AppState, Halt, Reply, RequestContext};

const INDEX: &str = "/tasks/";

pub async fn index(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let data = FormData::new(pairs);
    run(&state, ctx, move |ctx, storage| index_page(ctx, storage, &data)).await
}

pub async fn detail(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        require_login(ctx)?;
        let task = storage.get_task(parse_id(&id)?)?;
        Ok(detail_page(ctx, &task))
    })
    .await
}

pub async fn create_form(State(state): State<AppState>, ctx: RequestContext) -> Response {
    run(&state, ctx, |ctx, storage| {
        require_login(ctx)?;
        Ok(form_page(
            ctx,
            storage,
            FormKind::Create,
            &TaskForm::default(),
            &FormErrors::new(),
        )?)
    })
    .await
}

pub async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: FormBody,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        let author_id = require_login(ctx)?.id;
        let form = TaskForm::from_data(&form_data(body)?);
        match form.clean(storage, None)? {
            Ok(input) => {
                storage.create_task(&input, author_id)?;
                Ok(Reply::redirect_with(INDEX, Notice::TaskCreated))
            }
            Err(errors) => Ok(form_page(ctx, storage, FormKind::Create, &form, &errors)?),
        }
    })
    .await
}

pub async fn update_form(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        require_login(ctx)?;
        let task = storage.get_task(parse_id(&id)?)?;
        Ok(form_page(
            ctx,
            storage,
            FormKind::Update(task.id),
            &TaskForm::from_task(&task),
            &FormErrors::new(),
        )?)
    })
    .await
}

pub async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    body: FormBody,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        require_login(ctx)?;
        let task = storage.get_task(parse_id(&id)?)?;
        let form = TaskForm::from_data(&form_data(body)?);
        match form.clean(storage, Some(task.id))? {
            Ok(input) => {
                storage.update_task(task.id, &input)?;
                Ok(Reply::redirect_with(INDEX, Notice::TaskUpdated))
            }
            Err(errors) => Ok(form_page(
                ctx,
                storage,
                FormKind::Update(task.id),
                &form,
                &errors,
            )?),
        }
    })
    .await
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        let task = load_own_task(ctx, storage, &id)?;
        let body = render::confirm_delete(
            ctx.locale,
            &task.name,
            &format!("/tasks/{}/delete/", task.id),
        );
        Ok(Reply::page(ctx.text(Text::TaskDeletion), body))
    })
    .await
}

pub async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Response {
    run(&state, ctx, move |ctx, storage| {
        let task = load_own_task(ctx, storage, &id)?;
        storage.delete_task(task.id)?;
        Ok(Reply::redirect_with(INDEX, Notice::TaskDeleted))
    })
    .await
}

/// Authentication gate, task lookup, then the author-only gate.
fn load_own_task(ctx: &RequestContext, storage: &Storage, raw_id: &str) -> Result<Task, Halt> {
    let actor = require_login(ctx)?;
    let task = storage.get_task(parse_id(raw_id)?)?;
    require_owner(actor, task.created_by.id, Notice::TaskForbidden, INDEX)?;
    Ok(task)
}

fn user_options(users: &[User]) -> Vec<(i64, String)> {
    users.iter().map(|u| (u.id, u.full_name())).collect()
}

fn index_page(ctx: &RequestContext, storage: &Storage, data: &FormData) -> Result<Reply, Halt> {
    let actor = require_login(ctx)?;

    let filter_form = FilterForm::from_data(data);
    let (tasks, errors) = match filter_form.clean(storage, Some(actor))? {
        Ok(filter) => (storage.list_tasks(&filter)?, FormErrors::new()),
        Err(errors) => (Vec::new(), errors),
    };

    let statuses: Vec<(i64, String)> = storage
        .list_statuses()?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();
    let executors = user_options(&storage.list_users()?);
    let labels: Vec<(i64, String)> = storage
        .list_labels()?
        .into_iter()
        .map(|l| (l.id, l.name))
        .collect();

    let filter_html = FilterBuilder::new(ctx.locale, INDEX, &errors)
        .select("status", Text::Status, &statuses, |id| {
            filter_form.is_selected("status", id)
        })
        .select("executor", Text::Executor, &executors, |id| {
            filter_form.is_selected("executor", id)
        })
        .select("label", Text::Label, &labels, |id| {
            filter_form.is_selected("label", id)
        })
        .checkbox("self_tasks", Text::OnlyOwnTasks, filter_form.self_tasks)
        .submit(Text::Show);

    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|task| {
            vec![
                task.id.to_string(),
                render::link(&format!("/tasks/{}/", task.id), &task.name),
                render::escape(&task.status.name),
                render::escape(&task.created_by.full_name()),
                task.executor
                    .as_ref()
                    .map(|u| render::escape(&u.full_name()))
                    .unwrap_or_default(),
                render::date(&task.created_at),
                render::row_actions(ctx.locale, &format!("/tasks/{}/", task.id)),
            ]
        })
        .collect();

    let body = format!(
        "{}\n{}\n{}",
        render::link("/tasks/create/", ctx.text(Text::CreateTask)),
        filter_html,
        render::table(
            &[
                ctx.text(Text::Id),
                ctx.text(Text::Name),
                ctx.text(Text::Status),
                ctx.text(Text::Author),
                ctx.text(Text::Executor),
                ctx.text(Text::CreatedAt),
                "",
            ],
            &rows,
        )
    );
    Ok(Reply::page(ctx.text(Text::Tasks), body))
}

fn detail_page(ctx: &RequestContext, task: &Task) -> Reply {
    let t = |text: Text| ctx.text(text);
    let executor = task
        .executor
        .as_ref()
        .map(|u| render::escape(&u.full_name()))
        .unwrap_or_default();
    let labels: String = task
        .labels
        .iter()
        .map(|l| format!("<li>{}</li>", render::escape(&l.name)))
        .collect();

    let body = format!(
        "<p class=\"description\">{}</p>\n<dl>\n\
         <dt>{}</dt><dd>{}</dd>\n\
         <dt>{}</dt><dd>{}</dd>\n\
         <dt>{}</dt><dd>{}</dd>\n\
         <dt>{}</dt><dd>{}</dd>\n\
         <dt>{}</dt><dd><ul class=\"labels\">{}</ul></dd>\n</dl>\n{}",
        render::escape(&task.description),
        t(Text::Author),
        render::escape(&task.created_by.full_name()),
        t(Text::Executor),
        executor,
        t(Text::Status),
        render::escape(&task.status.name),
        t(Text::CreatedAt),
        render::date(&task.created_at),
        t(Text::Labels),
        labels,
        render::row_actions(ctx.locale, &format!("/tasks/{}/", task.id)),
    );
    Reply::page(task.name.clone(), body)
}

#[derive(Debug, Clone, Copy)]
enum FormKind {
    Create,
    Update(i64),
}

fn form_page(
    ctx: &RequestContext,
    storage: &Storage,
    kind: FormKind,
    form: &TaskForm,
    errors: &FormErrors,
) -> crate::Result<Reply> {
    let statuses: Vec<(i64, String)> = storage
        .list_statuses()?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();
    let executors = user_options(&storage.list_users()?);
    let labels: Vec<(i64, String)> = storage
        .list_labels()?
        .into_iter()
        .map(|l| (l.id, l.name))
        .collect();

    let (action, title, button) = match kind {
        FormKind::Create => ("/tasks/create/".to_string(), Text::CreateTask, Text::Create),
        FormKind::Update(id) => (
            format!("/tasks/{}/update/", id),
            Text::ChangingTask,
            Text::Change,
        ),
    };

    let body = FormBuilder::new(ctx.locale, &action, errors)
        .text("name", Text::Name, &form.name)
        .textarea("description", Text::Description, &form.description)
        .select(
            "status",
            Text::Status,
            &statuses,
            |id| form.is_selected("status", id),
            false,
            true,
        )
        .select(
            "executor",
            Text::Executor,
            &executors,
            |id| form.is_selected("executor", id),
            false,
            true,
        )
        .select(
            "labels",
            Text::Labels,
            &labels,
            |id| form.is_selected("labels", id),
            true,
            false,
        )
        .submit(button);
    Ok(Reply::page(ctx.text(title), body))
}
