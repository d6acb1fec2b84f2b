//! Localized user-facing strings.
//!
//! Notices and interface labels are stored and passed around as keys and
//! resolved to text only when a page is rendered, against the locale of
//! the request being served.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported interface languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    /// Parse a language tag such as "ru", "en-US" or "RU_ru".
    pub fn parse(tag: &str) -> Option<Self> {
        let primary = tag
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match primary.as_str() {
            "en" => Some(Locale::En),
            "ru" => Some(Locale::Ru),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }

    /// Pick the best supported locale from an `Accept-Language` header.
    ///
    /// Entries are ranked by their `q` weight; ties keep header order.
    /// Falls back to `default` when nothing matches.
    pub fn negotiate(accept_language: Option<&str>, default: Locale) -> Locale {
        let Some(header) = accept_language else {
            return default;
        };

        let mut candidates: Vec<(f32, usize, Locale)> = header
            .split(',')
            .enumerate()
            .filter_map(|(position, part)| {
                let mut pieces = part.split(';');
                let locale = Locale::parse(pieces.next()?)?;
                let weight = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (weight > 0.0).then_some((weight, position, locale))
            })
            .collect();

        candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
        candidates.first().map(|c| c.2).unwrap_or(default)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a queued notice, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Error => "error",
        }
    }
}

/// A notice queued for display on the next rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    LoginRequired,
    LoggedIn,
    LoggedOut,
    UserRegistered,
    UserUpdated,
    UserDeleted,
    UserForbidden,
    UserInUse,
    StatusCreated,
    StatusUpdated,
    StatusDeleted,
    StatusInUse,
    LabelCreated,
    LabelUpdated,
    LabelDeleted,
    LabelInUse,
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    TaskForbidden,
}

impl Notice {
    const ALL: [Notice; 20] = [
        Notice::LoginRequired,
        Notice::LoggedIn,
        Notice::LoggedOut,
        Notice::UserRegistered,
        Notice::UserUpdated,
        Notice::UserDeleted,
        Notice::UserForbidden,
        Notice::UserInUse,
        Notice::StatusCreated,
        Notice::StatusUpdated,
        Notice::StatusDeleted,
        Notice::StatusInUse,
        Notice::LabelCreated,
        Notice::LabelUpdated,
        Notice::LabelDeleted,
        Notice::LabelInUse,
        Notice::TaskCreated,
        Notice::TaskUpdated,
        Notice::TaskDeleted,
        Notice::TaskForbidden,
    ];

    /// Stable key used when the notice is persisted.
    pub fn key(&self) -> &'static str {
        match self {
            Notice::LoginRequired => "login_required",
            Notice::LoggedIn => "logged_in",
            Notice::LoggedOut => "logged_out",
            Notice::UserRegistered => "user_registered",
            Notice::UserUpdated => "user_updated",
            Notice::UserDeleted => "user_deleted",
            Notice::UserForbidden => "user_forbidden",
            Notice::UserInUse => "user_in_use",
            Notice::StatusCreated => "status_created",
            Notice::StatusUpdated => "status_updated",
            Notice::StatusDeleted => "status_deleted",
            Notice::StatusInUse => "status_in_use",
            Notice::LabelCreated => "label_created",
            Notice::LabelUpdated => "label_updated",
            Notice::LabelDeleted => "label_deleted",
            Notice::LabelInUse => "label_in_use",
            Notice::TaskCreated => "task_created",
            Notice::TaskUpdated => "task_updated",
            Notice::TaskDeleted => "task_deleted",
            Notice::TaskForbidden => "task_forbidden",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.key() == key)
    }

    pub fn level(&self) -> Level {
        match self {
            Notice::LoginRequired
            | Notice::UserForbidden
            | Notice::UserInUse
            | Notice::StatusInUse
            | Notice::LabelInUse
            | Notice::TaskForbidden => Level::Error,
            Notice::LoggedOut => Level::Info,
            _ => Level::Success,
        }
    }

    pub fn text(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.text_en(),
            Locale::Ru => self.text_ru(),
        }
    }

    fn text_en(&self) -> &'static str {
        match self {
            Notice::LoginRequired => "You are not logged in! Please log in.",
            Notice::LoggedIn => "You are logged in.",
            Notice::LoggedOut => "You are unlogged.",
            Notice::UserRegistered => "User successfully registered.",
            Notice::UserUpdated => "User successfully changed.",
            Notice::UserDeleted => "User successfully deleted.",
            Notice::UserForbidden => "You have no rights to change another user.",
            Notice::UserInUse => "Unable to delete the user because it is in use.",
            Notice::StatusCreated => "Status successfully created.",
            Notice::StatusUpdated => "Status successfully changed.",
            Notice::StatusDeleted => "Status successfully deleted.",
            Notice::StatusInUse => "Unable to delete the status because it is in use.",
            Notice::LabelCreated => "Label successfully created.",
            Notice::LabelUpdated => "Label successfully changed.",
            Notice::LabelDeleted => "Label successfully deleted.",
            Notice::LabelInUse => "Unable to delete the label because it is in use.",
            Notice::TaskCreated => "Task successfully created.",
            Notice::TaskUpdated => "Task successfully changed.",
            Notice::TaskDeleted => "Task successfully deleted.",
            Notice::TaskForbidden => "Only the author of the task can delete it.",
        }
    }

    fn text_ru(&self) -> &'static str {
        match self {
            Notice::LoginRequired => "Вы не авторизованы! Пожалуйста, выполните вход.",
            Notice::LoggedIn => "Вы залогинены.",
            Notice::LoggedOut => "Вы разлогинены.",
            Notice::UserRegistered => "Пользователь успешно зарегистрирован.",
            Notice::UserUpdated => "Пользователь успешно изменён.",
            Notice::UserDeleted => "Пользователь успешно удалён.",
            Notice::UserForbidden => "У вас нет прав для изменения другого пользователя.",
            Notice::UserInUse => "Невозможно удалить пользователя, потому что он используется.",
            Notice::StatusCreated => "Статус успешно создан.",
            Notice::StatusUpdated => "Статус успешно изменён.",
            Notice::StatusDeleted => "Статус успешно удалён.",
            Notice::StatusInUse => "Невозможно удалить статус, потому что он используется.",
            Notice::LabelCreated => "Метка успешно создана.",
            Notice::LabelUpdated => "Метка успешно изменена.",
            Notice::LabelDeleted => "Метка успешно удалена.",
            Notice::LabelInUse => "Невозможно удалить метку, потому что она используется.",
            Notice::TaskCreated => "Задача успешно создана.",
            Notice::TaskUpdated => "Задача успешно изменена.",
            Notice::TaskDeleted => "Задача успешно удалена.",
            Notice::TaskForbidden => "Задачу может удалить только её автор.",
        }
    }
}

/// Interface labels: headings, buttons, column titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    AppName,
    HomeTitle,
    HomeLead,
    Users,
    Statuses,
    Labels,
    Tasks,
    LogIn,
    LogOut,
    SignUp,
    Id,
    Name,
    FirstName,
    LastName,
    FullName,
    Username,
    Password,
    PasswordConfirmation,
    Description,
    Status,
    Executor,
    Label,
    Author,
    CreatedAt,
    Edit,
    Delete,
    Create,
    Change,
    Register,
    YesDelete,
    Show,
    OnlyOwnTasks,
    CreateStatus,
    ChangingStatus,
    StatusDeletion,
    CreateLabel,
    ChangingLabel,
    LabelDeletion,
    CreateTask,
    ChangingTask,
    TaskDeletion,
    Registration,
    ChangingUser,
    DeletingUser,
    DeleteQuestion,
    Blank,
    BadRequest,
    NotFound,
    ServerError,
}

impl Text {
    pub fn get(self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.en(),
            Locale::Ru => self.ru(),
        }
    }

    fn en(self) -> &'static str {
        match self {
            Text::AppName => "Task manager",
            Text::HomeTitle => "Hello!",
            Text::HomeLead => "A simple task manager: statuses, labels, executors.",
            Text::Users => "Users",
            Text::Statuses => "Statuses",
            Text::Labels => "Labels",
            Text::Tasks => "Tasks",
            Text::LogIn => "Log in",
            Text::LogOut => "Log out",
            Text::SignUp => "Sign up",
            Text::Id => "ID",
            Text::Name => "Name",
            Text::FirstName => "First name",
            Text::LastName => "Last name",
            Text::FullName => "Full name",
            Text::Username => "Username",
            Text::Password => "Password",
            Text::PasswordConfirmation => "Password confirmation",
            Text::Description => "Description",
            Text::Status => "Status",
            Text::Executor => "Executor",
            Text::Label => "Label",
            Text::Author => "Author",
            Text::CreatedAt => "Created at",
            Text::Edit => "Edit",
            Text::Delete => "Delete",
            Text::Create => "Create",
            Text::Change => "Change",
            Text::Register => "Register",
            Text::YesDelete => "Yes, delete",
            Text::Show => "Show",
            Text::OnlyOwnTasks => "Only your own tasks",
            Text::CreateStatus => "Create a status",
            Text::ChangingStatus => "Changing status",
            Text::StatusDeletion => "Status deletion",
            Text::CreateLabel => "Create a label",
            Text::ChangingLabel => "Changing label",
            Text::LabelDeletion => "Label deletion",
            Text::CreateTask => "Create a task",
            Text::ChangingTask => "Changing task",
            Text::TaskDeletion => "Task deletion",
            Text::Registration => "Registration",
            Text::ChangingUser => "Changing the user",
            Text::DeletingUser => "Deleting a user",
            Text::DeleteQuestion => "Are you sure you want to delete",
            Text::Blank => "---------",
            Text::BadRequest => "Bad request",
            Text::NotFound => "Page not found",
            Text::ServerError => "Internal server error",
        }
    }

    fn ru(self) -> &'static str {
        match self {
            Text::AppName => "Менеджер задач",
            Text::HomeTitle => "Привет!",
            Text::HomeLead => "Простой менеджер задач: статусы, метки, исполнители.",
            Text::Users => "Пользователи",
            Text::Statuses => "Статусы",
            Text::Labels => "Метки",
            Text::Tasks => "Задачи",
            Text::LogIn => "Вход",
            Text::LogOut => "Выход",
            Text::SignUp => "Регистрация",
            Text::Id => "ID",
            Text::Name => "Имя",
            Text::FirstName => "Имя",
            Text::LastName => "Фамилия",
            Text::FullName => "Полное имя",
            Text::Username => "Имя пользователя",
            Text::Password => "Пароль",
            Text::PasswordConfirmation => "Подтверждение пароля",
            Text::Description => "Описание",
            Text::Status => "Статус",
            Text::Executor => "Исполнитель",
            Text::Label => "Метка",
            Text::Author => "Автор",
            Text::CreatedAt => "Дата создания",
            Text::Edit => "Изменить",
            Text::Delete => "Удалить",
            Text::Create => "Создать",
            Text::Change => "Изменить",
            Text::Register => "Зарегистрировать",
            Text::YesDelete => "Да, удалить",
            Text::Show => "Показать",
            Text::OnlyOwnTasks => "Только свои задачи",
            Text::CreateStatus => "Создать статус",
            Text::ChangingStatus => "Изменение статуса",
            Text::StatusDeletion => "Удаление статуса",
            Text::CreateLabel => "Создать метку",
            Text::ChangingLabel => "Изменение метки",
            Text::LabelDeletion => "Удаление метки",
            Text::CreateTask => "Создать задачу",
            Text::ChangingTask => "Изменение задачи",
            Text::TaskDeletion => "Удаление задачи",
            Text::Registration => "Регистрация",
            Text::ChangingUser => "Изменение пользователя",
            Text::DeletingUser => "Удаление пользователя",
            Text::DeleteQuestion => "Вы уверены, что хотите удалить",
            Text::Blank => "---------",
            Text::BadRequest => "Некорректный запрос",
            Text::NotFound => "Страница не найдена",
            Text::ServerError => "Внутренняя ошибка сервера",
        }
    }
}
