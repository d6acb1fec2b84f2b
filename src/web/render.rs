//! HTML rendering.
//!
//! Pages are assembled from small string builders. Every value that did
//! not originate in this module goes through [`escape`].

use std::fmt::Write;

use crate::forms::{FieldError, FormErrors};
use crate::i18n::{Locale, Notice, Text};
use crate::models::User;

/// Escape text for use in element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a page body in the site chrome: navigation and queued notices.
pub fn layout(
    locale: Locale,
    user: Option<&User>,
    notices: &[Notice],
    title: &str,
    body: &str,
) -> String {
    let t = |text: Text| text.get(locale);
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{} | {}</title>\n</head>\n<body>\n",
        locale,
        escape(title),
        t(Text::AppName)
    );

    html.push_str("<nav>\n");
    let _ = writeln!(html, "<a class=\"brand\" href=\"/\">{}</a>", t(Text::AppName));
    let _ = writeln!(html, "<a href=\"/users/\">{}</a>", t(Text::Users));
    match user {
        Some(_) => {
            let _ = writeln!(html, "<a href=\"/statuses/\">{}</a>", t(Text::Statuses));
            let _ = writeln!(html, "<a href=\"/labels/\">{}</a>", t(Text::Labels));
            let _ = writeln!(html, "<a href=\"/tasks/\">{}</a>", t(Text::Tasks));
            let _ = writeln!(
                html,
                "<form method=\"post\" action=\"/logout/\"><button type=\"submit\">{}</button></form>",
                t(Text::LogOut)
            );
        }
        None => {
            let _ = writeln!(html, "<a href=\"/login/\">{}</a>", t(Text::LogIn));
            let _ = writeln!(html, "<a href=\"/users/create/\">{}</a>", t(Text::SignUp));
        }
    }
    html.push_str("</nav>\n<main>\n");

    for notice in notices {
        let _ = writeln!(
            html,
            "<div class=\"alert alert-{}\" role=\"alert\">{}</div>",
            notice.level().as_str(),
            escape(notice.text(locale))
        );
    }

    let _ = writeln!(html, "<h1>{}</h1>", escape(title));
    html.push_str(body);
    html.push_str("\n</main>\n</body>\n</html>\n");
    html
}

/// Body of a page that only states its title, such as 404.
pub fn message_body(message: &str) -> String {
    format!("<p class=\"lead\">{}</p>", escape(message))
}

fn error_list(errors: &[&FieldError], locale: Locale) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"errorlist\">");
    for error in errors {
        let _ = write!(html, "<li>{}</li>", escape(&error.text(locale)));
    }
    html.push_str("</ul>");
    html
}

/// Builder for a POST form.
pub struct FormBuilder<'a> {
    locale: Locale,
    errors: &'a FormErrors,
    html: String,
}

impl<'a> FormBuilder<'a> {
    pub fn new(locale: Locale, action: &str, errors: &'a FormErrors) -> Self {
        let mut html = format!("<form method=\"post\" action=\"{}\">\n", escape(action));
        html.push_str(&error_list(&errors.non_field(), locale));
        Self {
            locale,
            errors,
            html,
        }
    }

    fn open_field(&mut self, name: &str, label: Text) {
        let _ = write!(
            self.html,
            "<div class=\"field\">\n<label for=\"id_{name}\">{}</label>\n",
            label.get(self.locale)
        );
    }

    fn close_field(&mut self, name: &str) {
        let errors = error_list(&self.errors.field(name), self.locale);
        self.html.push_str(&errors);
        self.html.push_str("\n</div>\n");
    }

    fn input(mut self, kind: &str, name: &str, label: Text, value: &str) -> Self {
        self.open_field(name, label);
        let _ = writeln!(
            self.html,
            "<input type=\"{kind}\" name=\"{name}\" id=\"id_{name}\" value=\"{}\">",
            escape(value)
        );
        self.close_field(name);
        self
    }

    pub fn text(self, name: &str, label: Text, value: &str) -> Self {
        self.input("text", name, label, value)
    }

    /// Password inputs never echo a value back.
    pub fn password(self, name: &str, label: Text) -> Self {
        self.input("password", name, label, "")
    }

    pub fn textarea(mut self, name: &str, label: Text, value: &str) -> Self {
        self.open_field(name, label);
        let _ = writeln!(
            self.html,
            "<textarea name=\"{name}\" id=\"id_{name}\">{}</textarea>",
            escape(value)
        );
        self.close_field(name);
        self
    }

    /// Select box; `blank` adds an empty first option.
    pub fn select(
        mut self,
        name: &str,
        label: Text,
        options: &[(i64, String)],
        selected: impl Fn(i64) -> bool,
        multiple: bool,
        blank: bool,
    ) -> Self {
        self.open_field(name, label);
        let _ = writeln!(
            self.html,
            "<select name=\"{name}\" id=\"id_{name}\"{}>",
            if multiple { " multiple" } else { "" }
        );
        if blank {
            let _ = writeln!(
                self.html,
                "<option value=\"\">{}</option>",
                Text::Blank.get(self.locale)
            );
        }
        self.html.push_str(&options_html(options, selected));
        self.html.push_str("</select>\n");
        self.close_field(name);
        self
    }

    pub fn submit(mut self, label: Text) -> String {
        let _ = write!(
            self.html,
            "<button type=\"submit\">{}</button>\n</form>",
            label.get(self.locale)
        );
        self.html
    }
}

fn options_html(options: &[(i64, String)], selected: impl Fn(i64) -> bool) -> String {
    let mut html = String::new();
    for (id, label) in options {
        let _ = writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            id,
            if selected(*id) { " selected" } else { "" },
            escape(label)
        );
    }
    html
}

/// A GET filter form with selects and a checkbox.
pub struct FilterBuilder<'a> {
    locale: Locale,
    errors: &'a FormErrors,
    html: String,
}

impl<'a> FilterBuilder<'a> {
    pub fn new(locale: Locale, action: &str, errors: &'a FormErrors) -> Self {
        Self {
            locale,
            errors,
            html: format!(
                "<form method=\"get\" action=\"{}\" class=\"filter\">\n",
                escape(action)
            ),
        }
    }

    pub fn select(
        mut self,
        name: &str,
        label: Text,
        options: &[(i64, String)],
        selected: impl Fn(i64) -> bool,
    ) -> Self {
        let _ = write!(
            self.html,
            "<div class=\"field\">\n<label for=\"id_{name}\">{}</label>\n\
             <select name=\"{name}\" id=\"id_{name}\">\n<option value=\"\">{}</option>\n{}</select>\n{}\n</div>\n",
            label.get(self.locale),
            Text::Blank.get(self.locale),
            options_html(options, selected),
            error_list(&self.errors.field(name), self.locale)
        );
        self
    }

    pub fn checkbox(mut self, name: &str, label: Text, checked: bool) -> Self {
        let _ = writeln!(
            self.html,
            "<div class=\"field\">\n<input type=\"checkbox\" name=\"{name}\" id=\"id_{name}\"{}>\n\
             <label for=\"id_{name}\">{}</label>\n</div>",
            if checked { " checked" } else { "" },
            label.get(self.locale)
        );
        self
    }

    pub fn submit(mut self, label: Text) -> String {
        let _ = write!(
            self.html,
            "<button type=\"submit\">{}</button>\n</form>",
            label.get(self.locale)
        );
        self.html
    }
}

/// A table; cells are HTML fragments already escaped by the caller.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut html = String::from("<table class=\"table\">\n<thead>\n<tr>");
    for header in headers {
        let _ = write!(html, "<th>{}</th>", escape(header));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", cell);
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>");
    html
}

pub fn link(href: &str, label: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(href), escape(label))
}

/// Edit and delete links for a row under `base` (e.g. `/statuses/3/`).
pub fn row_actions(locale: Locale, base: &str) -> String {
    format!(
        "{}<br>{}",
        link(&format!("{}update/", base), Text::Edit.get(locale)),
        link(&format!("{}delete/", base), Text::Delete.get(locale))
    )
}

/// Confirmation form for deleting `subject`.
pub fn confirm_delete(locale: Locale, subject: &str, action: &str) -> String {
    format!(
        "<p>{} {}?</p>\n<form method=\"post\" action=\"{}\">\n\
         <button type=\"submit\" class=\"danger\">{}</button>\n</form>",
        Text::DeleteQuestion.get(locale),
        escape(subject),
        escape(action),
        Text::YesDelete.get(locale)
    )
}

/// Render a timestamp the way every list shows it.
pub fn date(at: &chrono::DateTime<chrono::Utc>) -> String {
    at.format("%d.%m.%Y %H:%M").to_string()
}
