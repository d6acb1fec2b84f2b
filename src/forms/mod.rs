//! Form parsing and validation.
//!
//! Each form keeps the raw submitted values so an invalid submission can be
//! rendered again exactly as entered. `clean` validates the values and
//! returns either the typed result or the collected [`FormErrors`]; the
//! outer `Result` carries storage failures hit while checking uniqueness or
//! choices.

use crate::i18n::Locale;
use crate::models::{NAME_MAX_LENGTH, TaskInput, USER_FIELD_MAX_LENGTH, User};
use crate::storage::{Storage, TaskFilter};
use crate::{Error, Result, auth};

/// Key under which errors not tied to one field are collected.
pub const NON_FIELD: &str = "__all__";

/// Submitted form or query pairs, in submission order.
///
/// Repeated keys are kept, so multi-selects such as `labels=1&labels=2`
/// survive parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData(Vec<(String, String)>);

impl FormData {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// First raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every raw value for `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First value for `key` with surrounding whitespace removed.
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().trim().to_string()
    }

    /// First value for `key` exactly as submitted.
    pub fn raw(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }
}

impl From<Vec<(String, String)>> for FormData {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required,
    TooLong { max: usize, actual: usize },
    /// Another row already uses this name
    Duplicate,
    UsernameTaken,
    InvalidUsername,
    InvalidChoice,
    PasswordMismatch,
    PasswordTooShort { min: usize },
    InvalidCredentials,
}

impl FieldError {
    pub fn text(&self, locale: Locale) -> String {
        match locale {
            Locale::En => self.text_en(),
            Locale::Ru => self.text_ru(),
        }
    }

    fn text_en(&self) -> String {
        match self {
            FieldError::Required => "This field is required.".to_string(),
            FieldError::TooLong { max, actual } => format!(
                "Ensure this value has at most {} characters (it has {}).",
                max, actual
            ),
            FieldError::Duplicate => "An entry with this name already exists.".to_string(),
            FieldError::UsernameTaken => "A user with that username already exists.".to_string(),
            FieldError::InvalidUsername => "Enter a valid username. This value may contain only \
                 letters, numbers, and @/./+/-/_ characters."
                .to_string(),
            FieldError::InvalidChoice => {
                "Select a valid choice. That choice is not one of the available choices."
                    .to_string()
            }
            FieldError::PasswordMismatch => "The two password fields didn't match.".to_string(),
            FieldError::PasswordTooShort { min } => format!(
                "This password is too short. It must contain at least {} characters.",
                min
            ),
            FieldError::InvalidCredentials => "Please enter a correct username and password. \
                 Note that both fields may be case-sensitive."
                .to_string(),
        }
    }

    fn text_ru(&self) -> String {
        match self {
            FieldError::Required => "Обязательное поле.".to_string(),
            FieldError::TooLong { max, actual } => format!(
                "Убедитесь, что это значение содержит не более {} символов (сейчас {}).",
                max, actual
            ),
            FieldError::Duplicate => "Запись с таким именем уже существует.".to_string(),
            FieldError::UsernameTaken => "Пользователь с таким именем уже существует.".to_string(),
            FieldError::InvalidUsername => "Введите правильное имя пользователя. Оно может \
                 содержать только буквы, цифры и знаки @/./+/-/_."
                .to_string(),
            FieldError::InvalidChoice => {
                "Выберите корректный вариант. Вашего варианта нет среди допустимых значений."
                    .to_string()
            }
            FieldError::PasswordMismatch => "Введённые пароли не совпадают.".to_string(),
            FieldError::PasswordTooShort { min } => format!(
                "Введённый пароль слишком короткий. Он должен содержать как минимум {} символа.",
                min
            ),
            FieldError::InvalidCredentials => "Пожалуйста, введите правильные имя пользователя \
                 и пароль. Оба поля могут быть чувствительны к регистру."
                .to_string(),
        }
    }
}

/// Validation failures keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<(&'static str, FieldError)>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, error: FieldError) {
        self.errors.push((field, error));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Errors recorded for one field.
    pub fn field(&self, name: &str) -> Vec<&FieldError> {
        self.errors
            .iter()
            .filter(|(f, _)| *f == name)
            .map(|(_, e)| e)
            .collect()
    }

    pub fn has(&self, name: &str) -> bool {
        self.errors.iter().any(|(f, _)| *f == name)
    }

    pub fn non_field(&self) -> Vec<&FieldError> {
        self.field(NON_FIELD)
    }

    fn into_result<T>(self, value: T) -> std::result::Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Required text no longer than `max` characters.
fn check_text(errors: &mut FormErrors, field: &'static str, value: &str, max: usize) -> bool {
    if value.is_empty() {
        errors.add(field, FieldError::Required);
        return false;
    }
    let actual = value.chars().count();
    if actual > max {
        errors.add(field, FieldError::TooLong { max, actual });
        return false;
    }
    true
}

fn valid_username(username: &str) -> bool {
    username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '@' | '+' | '-'))
}

/// Resolve a submitted id against rows that must exist.
///
/// Returns `Ok(None)` after recording `InvalidChoice` when the value is not
/// a number or names no row.
fn check_choice<T>(
    errors: &mut FormErrors,
    field: &'static str,
    raw: &str,
    lookup: impl FnOnce(i64) -> Result<T>,
) -> Result<Option<i64>> {
    let Ok(id) = raw.trim().parse::<i64>() else {
        errors.add(field, FieldError::InvalidChoice);
        return Ok(None);
    };
    match lookup(id) {
        Ok(_) => Ok(Some(id)),
        Err(Error::NotFound(_)) => {
            errors.add(field, FieldError::InvalidChoice);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Single-field form shared by statuses and labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameForm {
    pub name: String,
}

impl NameForm {
    pub fn from_data(data: &FormData) -> Self {
        Self {
            name: data.text("name"),
        }
    }

    /// Validate the name; `is_taken` reports whether another row uses it.
    pub fn clean(
        &self,
        is_taken: impl FnOnce(&str) -> Result<bool>,
    ) -> Result<std::result::Result<String, FormErrors>> {
        let mut errors = FormErrors::new();
        if check_text(&mut errors, "name", &self.name, NAME_MAX_LENGTH) && is_taken(&self.name)? {
            errors.add("name", FieldError::Duplicate);
        }
        Ok(errors.into_result(self.name.clone()))
    }
}

/// Cleaned registration or profile data; the password is still plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Registration and profile form.
///
/// Both password fields are required every time, as when registering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password1: String,
    pub password2: String,
}

impl UserForm {
    pub fn from_data(data: &FormData) -> Self {
        Self {
            first_name: data.text("first_name"),
            last_name: data.text("last_name"),
            username: data.text("username"),
            password1: data.raw("password1"),
            password2: data.raw("password2"),
        }
    }

    /// Prefill for editing an existing user; passwords are never echoed.
    pub fn from_user(user: &User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            ..Self::default()
        }
    }

    /// Validate against the store; `exclude` is the user being edited.
    pub fn clean(
        &self,
        storage: &Storage,
        exclude: Option<i64>,
        password_min_length: usize,
    ) -> Result<std::result::Result<ValidUser, FormErrors>> {
        let mut errors = FormErrors::new();

        check_text(
            &mut errors,
            "first_name",
            &self.first_name,
            USER_FIELD_MAX_LENGTH,
        );
        check_text(
            &mut errors,
            "last_name",
            &self.last_name,
            USER_FIELD_MAX_LENGTH,
        );
        if check_text(&mut errors, "username", &self.username, USER_FIELD_MAX_LENGTH) {
            if !valid_username(&self.username) {
                errors.add("username", FieldError::InvalidUsername);
            } else if storage.username_taken(&self.username, exclude)? {
                errors.add("username", FieldError::UsernameTaken);
            }
        }

        if self.password1.is_empty() {
            errors.add("password1", FieldError::Required);
        }
        if self.password2.is_empty() {
            errors.add("password2", FieldError::Required);
        } else if !self.password1.is_empty() {
            if self.password1 != self.password2 {
                errors.add("password2", FieldError::PasswordMismatch);
            } else if self.password1.chars().count() < password_min_length {
                errors.add(
                    "password2",
                    FieldError::PasswordTooShort {
                        min: password_min_length,
                    },
                );
            }
        }

        Ok(errors.into_result(ValidUser {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            password: self.password1.clone(),
        }))
    }
}

/// Login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn from_data(data: &FormData) -> Self {
        Self {
            username: data.text("username"),
            password: data.raw("password"),
        }
    }

    /// Authenticate the submitted credentials.
    ///
    /// Unknown usernames and wrong passwords produce the same non-field
    /// error.
    pub fn clean(&self, storage: &Storage) -> Result<std::result::Result<User, FormErrors>> {
        let mut errors = FormErrors::new();
        if self.username.is_empty() {
            errors.add("username", FieldError::Required);
        }
        if self.password.is_empty() {
            errors.add("password", FieldError::Required);
        }
        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        match storage.find_credentials(&self.username)? {
            Some((user, hash)) if auth::verify_password(&self.password, &hash) => Ok(Ok(user)),
            _ => {
                errors.add(NON_FIELD, FieldError::InvalidCredentials);
                Ok(Err(errors))
            }
        }
    }
}

/// Task create/update form.
///
/// There is no author field; a submitted `created_by` is never read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub name: String,
    pub description: String,
    pub status: String,
    pub executor: String,
    pub labels: Vec<String>,
}

impl TaskForm {
    pub fn from_data(data: &FormData) -> Self {
        Self {
            name: data.text("name"),
            description: data.text("description"),
            status: data.text("status"),
            executor: data.text("executor"),
            labels: data
                .get_all("labels")
                .into_iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect(),
        }
    }

    pub fn from_task(task: &crate::models::Task) -> Self {
        Self {
            name: task.name.clone(),
            description: task.description.clone(),
            status: task.status.id.to_string(),
            executor: task
                .executor
                .as_ref()
                .map(|u| u.id.to_string())
                .unwrap_or_default(),
            labels: task.labels.iter().map(|l| l.id.to_string()).collect(),
        }
    }

    /// Whether `id` is among the selected values of `field`.
    pub fn is_selected(&self, field: &str, id: i64) -> bool {
        let id = id.to_string();
        match field {
            "status" => self.status == id,
            "executor" => self.executor == id,
            "labels" => self.labels.contains(&id),
            _ => false,
        }
    }

    /// Validate against the store; `exclude` is the task being edited.
    pub fn clean(
        &self,
        storage: &Storage,
        exclude: Option<i64>,
    ) -> Result<std::result::Result<TaskInput, FormErrors>> {
        let mut errors = FormErrors::new();

        if check_text(&mut errors, "name", &self.name, NAME_MAX_LENGTH)
            && storage.task_name_taken(&self.name, exclude)?
        {
            errors.add("name", FieldError::Duplicate);
        }

        let status_id = if self.status.is_empty() {
            errors.add("status", FieldError::Required);
            None
        } else {
            check_choice(&mut errors, "status", &self.status, |id| {
                storage.get_status(id)
            })?
        };

        let executor_id = if self.executor.is_empty() {
            None
        } else {
            check_choice(&mut errors, "executor", &self.executor, |id| {
                storage.get_user(id)
            })?
        };

        let mut label_ids = Vec::new();
        for raw in &self.labels {
            match check_choice(&mut errors, "labels", raw, |id| storage.get_label(id))? {
                Some(id) if !label_ids.contains(&id) => label_ids.push(id),
                _ => {}
            }
        }

        Ok(errors.into_result(TaskInput {
            name: self.name.clone(),
            description: self.description.clone(),
            status_id: status_id.unwrap_or_default(),
            executor_id,
            label_ids,
        }))
    }
}

/// Task list filter as submitted in the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub status: String,
    pub executor: String,
    pub label: String,
    pub self_tasks: bool,
}

impl FilterForm {
    pub fn from_data(data: &FormData) -> Self {
        let label = match data.text("label") {
            l if l.is_empty() => data.text("labels"),
            l => l,
        };
        Self {
            status: data.text("status"),
            executor: data.text("executor"),
            label,
            self_tasks: data.get("self_tasks").is_some_and(checkbox_value),
        }
    }

    /// Build the filter; `requester` backs the own-tasks predicate.
    ///
    /// Without a requester the own-tasks predicate is dropped.
    pub fn clean(
        &self,
        storage: &Storage,
        requester: Option<&User>,
    ) -> Result<std::result::Result<TaskFilter, FormErrors>> {
        let mut errors = FormErrors::new();
        let mut filter = TaskFilter::new();

        if !self.status.is_empty() {
            filter.status_id =
                check_choice(&mut errors, "status", &self.status, |id| storage.get_status(id))?;
        }
        if !self.executor.is_empty() {
            filter.executor_id = check_choice(&mut errors, "executor", &self.executor, |id| {
                storage.get_user(id)
            })?;
        }
        if !self.label.is_empty() {
            filter.label_id =
                check_choice(&mut errors, "label", &self.label, |id| storage.get_label(id))?;
        }
        if self.self_tasks {
            filter.author_id = requester.map(|u| u.id);
        }

        Ok(errors.into_result(filter))
    }

    pub fn is_selected(&self, field: &str, id: i64) -> bool {
        let id = id.to_string();
        match field {
            "status" => self.status == id,
            "executor" => self.executor == id,
            "label" => self.label == id,
            _ => false,
        }
    }
}

/// Checkbox semantics: only explicit truthy values are checked.
fn checkbox_value(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::test_utils::{add_status, add_user};

    fn data(pairs: &[(&str, &str)]) -> FormData {
        FormData::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn memory() -> Storage {
        Storage::open_in_memory().unwrap()
    }

    #[test]
    fn test_form_data_keeps_repeated_keys() {
        let form = data(&[("labels", "1"), ("name", " x "), ("labels", "2")]);
        assert_eq!(form.get_all("labels"), vec!["1", "2"]);
        assert_eq!(form.get("labels"), Some("1"));
        assert_eq!(form.text("name"), "x");
        assert_eq!(form.raw("name"), " x ");
        assert_eq!(form.text("missing"), "");
    }

    #[test]
    fn test_name_form_requires_name() {
        let form = NameForm::from_data(&data(&[("name", "   ")]));
        let errors = form.clean(|_| Ok(false)).unwrap().unwrap_err();
        assert_eq!(errors.field("name"), vec![&FieldError::Required]);
    }

    #[test]
    fn test_name_form_max_length() {
        let long = "x".repeat(NAME_MAX_LENGTH + 1);
        let form = NameForm::from_data(&data(&[("name", &long)]));
        let errors = form.clean(|_| Ok(false)).unwrap().unwrap_err();
        assert_eq!(
            errors.field("name"),
            vec![&FieldError::TooLong {
                max: 100,
                actual: 101
            }]
        );

        let exact = "x".repeat(NAME_MAX_LENGTH);
        let form = NameForm::from_data(&data(&[("name", &exact)]));
        assert_eq!(form.clean(|_| Ok(false)).unwrap(), Ok(exact));
    }

    #[test]
    fn test_name_form_duplicate() {
        let form = NameForm::from_data(&data(&[("name", "new")]));
        let errors = form.clean(|n| Ok(n == "new")).unwrap().unwrap_err();
        assert_eq!(errors.field("name"), vec![&FieldError::Duplicate]);
    }

    #[test]
    fn test_user_form_valid() {
        let storage = memory();
        let form = UserForm::from_data(&data(&[
            ("first_name", "Ann"),
            ("last_name", "Lee"),
            ("username", "ann.lee@x"),
            ("password1", "abc"),
            ("password2", "abc"),
        ]));
        let valid = form.clean(&storage, None, 3).unwrap().unwrap();
        assert_eq!(valid.username, "ann.lee@x");
        assert_eq!(valid.password, "abc");
    }

    #[test]
    fn test_user_form_collects_every_error() {
        let storage = memory();
        let form = UserForm::from_data(&data(&[
            ("username", "bad name!"),
            ("password1", "abc"),
            ("password2", "abd"),
        ]));
        let errors = form.clean(&storage, None, 3).unwrap().unwrap_err();
        assert_eq!(errors.field("first_name"), vec![&FieldError::Required]);
        assert_eq!(errors.field("last_name"), vec![&FieldError::Required]);
        assert_eq!(errors.field("username"), vec![&FieldError::InvalidUsername]);
        assert_eq!(errors.field("password2"), vec![&FieldError::PasswordMismatch]);
    }

    #[test]
    fn test_user_form_password_rules() {
        let storage = memory();
        let short = UserForm {
            first_name: "A".into(),
            last_name: "B".into(),
            username: "ab".into(),
            password1: "12".into(),
            password2: "12".into(),
        };
        let errors = short.clean(&storage, None, 3).unwrap().unwrap_err();
        assert_eq!(
            errors.field("password2"),
            vec![&FieldError::PasswordTooShort { min: 3 }]
        );

        let missing = UserForm {
            password1: String::new(),
            password2: String::new(),
            ..short
        };
        let errors = missing.clean(&storage, None, 3).unwrap().unwrap_err();
        assert!(errors.has("password1"));
        assert!(errors.has("password2"));
    }

    #[test]
    fn test_user_form_username_uniqueness_excludes_self() {
        let mut storage = memory();
        let alice = add_user(&mut storage, "alice");
        let form = UserForm {
            first_name: "A".into(),
            last_name: "B".into(),
            username: "alice".into(),
            password1: "pass".into(),
            password2: "pass".into(),
        };

        let errors = form.clean(&storage, None, 3).unwrap().unwrap_err();
        assert_eq!(errors.field("username"), vec![&FieldError::UsernameTaken]);
        assert!(form.clean(&storage, Some(alice.id), 3).unwrap().is_ok());
    }

    #[test]
    fn test_login_form() {
        let mut storage = memory();
        storage
            .create_user(&NewUser {
                username: "alice".into(),
                first_name: "A".into(),
                last_name: "B".into(),
                password_hash: auth::hash_password("secret").unwrap(),
            })
            .unwrap();

        let ok = LoginForm::from_data(&data(&[("username", "alice"), ("password", "secret")]));
        assert_eq!(ok.clean(&storage).unwrap().unwrap().username, "alice");

        let wrong = LoginForm::from_data(&data(&[("username", "alice"), ("password", "nope")]));
        let errors = wrong.clean(&storage).unwrap().unwrap_err();
        assert_eq!(errors.non_field(), vec![&FieldError::InvalidCredentials]);

        let unknown = LoginForm::from_data(&data(&[("username", "bob"), ("password", "secret")]));
        assert_eq!(unknown.clean(&storage).unwrap().unwrap_err(), errors);

        let empty = LoginForm::default();
        let errors = empty.clean(&storage).unwrap().unwrap_err();
        assert!(errors.has("username"));
        assert!(errors.has("password"));
    }

    #[test]
    fn test_task_form_ignores_created_by() {
        let mut storage = memory();
        let status = add_status(&mut storage, "new");
        let other = add_user(&mut storage, "mallory");
        let label = storage.create_label("bug").unwrap();

        let form = TaskForm::from_data(&data(&[
            ("name", "T1"),
            ("status", &status.id.to_string()),
            ("created_by", &other.id.to_string()),
            ("labels", &label.id.to_string()),
            ("labels", &label.id.to_string()),
        ]));
        let input = form.clean(&storage, None).unwrap().unwrap();
        assert_eq!(input.name, "T1");
        assert_eq!(input.status_id, status.id);
        assert_eq!(input.executor_id, None);
        assert_eq!(input.label_ids, vec![label.id]);
    }

    #[test]
    fn test_task_form_invalid_choices() {
        let storage = memory();
        let form = TaskForm::from_data(&data(&[
            ("name", "T1"),
            ("status", "42"),
            ("executor", "abc"),
            ("labels", "7"),
        ]));
        let errors = form.clean(&storage, None).unwrap().unwrap_err();
        assert_eq!(errors.field("status"), vec![&FieldError::InvalidChoice]);
        assert_eq!(errors.field("executor"), vec![&FieldError::InvalidChoice]);
        assert_eq!(errors.field("labels"), vec![&FieldError::InvalidChoice]);
    }

    #[test]
    fn test_task_form_requires_name_and_status() {
        let storage = memory();
        let errors = TaskForm::default()
            .clean(&storage, None)
            .unwrap()
            .unwrap_err();
        assert_eq!(errors.field("name"), vec![&FieldError::Required]);
        assert_eq!(errors.field("status"), vec![&FieldError::Required]);
        assert!(!errors.has("executor"));
    }

    #[test]
    fn test_filter_form_checkbox_values() {
        for raw in ["on", "TRUE", "1", " true "] {
            assert!(FilterForm::from_data(&data(&[("self_tasks", raw)])).self_tasks);
        }
        for raw in ["", "off", "false", "0", "yes"] {
            assert!(!FilterForm::from_data(&data(&[("self_tasks", raw)])).self_tasks);
        }
        assert!(!FilterForm::from_data(&data(&[])).self_tasks);
    }

    #[test]
    fn test_filter_form_builds_filter() {
        let mut storage = memory();
        let alice = add_user(&mut storage, "alice");
        let status = add_status(&mut storage, "new");

        let form = FilterForm::from_data(&data(&[
            ("status", &status.id.to_string()),
            ("executor", ""),
            ("self_tasks", "on"),
        ]));
        let filter = form.clean(&storage, Some(&alice)).unwrap().unwrap();
        assert_eq!(
            filter,
            TaskFilter::new().with_status(status.id).with_author(alice.id)
        );
    }

    #[test]
    fn test_filter_form_self_tasks_without_requester() {
        let storage = memory();
        let form = FilterForm::from_data(&data(&[("self_tasks", "on")]));
        let filter = form.clean(&storage, None).unwrap().unwrap();
        assert_eq!(filter, TaskFilter::new());
    }

    #[test]
    fn test_filter_form_invalid_ids() {
        let storage = memory();
        let form = FilterForm::from_data(&data(&[("status", "x"), ("labels", "99")]));
        assert_eq!(form.label, "99");
        let errors = form.clean(&storage, None).unwrap().unwrap_err();
        assert_eq!(errors.field("status"), vec![&FieldError::InvalidChoice]);
        assert_eq!(errors.field("label"), vec![&FieldError::InvalidChoice]);
    }

    #[test]
    fn test_field_error_texts_are_localized() {
        let error = FieldError::TooLong {
            max: 100,
            actual: 120,
        };
        assert!(error.text(Locale::En).contains("at most 100"));
        assert!(error.text(Locale::Ru).contains("не более 100"));
        assert_ne!(
            FieldError::Required.text(Locale::En),
            FieldError::Required.text(Locale::Ru)
        );
    }
}
