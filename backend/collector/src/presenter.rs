//! Page rendering: the editable form or the read-only success summary.
//!
//! [`view`] decides *what* is on screen from a [`FormState`]; [`render_page`]
//! turns that into HTML. Keeping the two apart lets the state rules be tested
//! without looking at markup.

use tracing::{info, warn};

use crate::clipboard::Clipboard;
use crate::form::{FormState, SubmissionRecord, SubmissionStatus};

pub const SUBMIT_LABEL: &str = "Submit";
pub const SUBMITTING_LABEL: &str = "Submitting...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView<'a> {
    pub name: &'a str,
    pub project: &'a str,
    pub inputs_disabled: bool,
    /// Server-side lock; only set while a submission is in flight.
    pub submit_disabled: bool,
    /// Emit the inline script that keeps the button disabled until both
    /// trimmed fields are non-empty. Without script the server-side check in
    /// `FormState` still rejects an invalid submit.
    pub live_validation: bool,
    pub submit_label: &'static str,
    pub error: Option<&'a str>,
    /// Page should poll for the pipeline outcome.
    pub auto_refresh: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View<'a> {
    Form(FormView<'a>),
    Success(&'a SubmissionRecord),
}

pub fn view(state: &FormState) -> View<'_> {
    if let (SubmissionStatus::Success, Some(record)) = (state.status(), state.record()) {
        return View::Success(record);
    }

    let loading = state.is_loading();
    View::Form(FormView {
        name: &state.input().name,
        project: &state.input().project,
        inputs_disabled: loading,
        submit_disabled: loading,
        live_validation: !loading,
        submit_label: if loading { SUBMITTING_LABEL } else { SUBMIT_LABEL },
        error: state.error(),
        auto_refresh: loading,
    })
}

// ─────────────────────────────────────────────────────────
// Transient notifications
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

/// A toast shown once on the next render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: &'static str,
    pub description: &'static str,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn copied() -> Self {
        Self {
            title: "Copied!",
            description: "Submission details copied to clipboard.",
            variant: NotificationVariant::Default,
        }
    }

    pub fn copy_failed() -> Self {
        Self {
            title: "Copy failed",
            description: "Please try again.",
            variant: NotificationVariant::Destructive,
        }
    }
}

/// Put the record's copy text on the clipboard. Failure is reported through
/// the returned notification only.
pub async fn copy_record(clipboard: &dyn Clipboard, record: &SubmissionRecord) -> Notification {
    match clipboard.write_text(&record.copy_text()).await {
        Ok(()) => {
            info!("Submission details copied to clipboard");
            Notification::copied()
        }
        Err(e) => {
            warn!("Copy failed: {e}");
            Notification::copy_failed()
        }
    }
}

// ─────────────────────────────────────────────────────────
// HTML
// ─────────────────────────────────────────────────────────

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "\
body{margin:0;min-height:100vh;display:flex;align-items:center;justify-content:center;\
background:#0f1822;font-family:system-ui,sans-serif;color:#0f1822}\
.card{width:100%;max-width:28rem;background:#fff;border-radius:12px;padding:2rem;\
box-shadow:0 10px 30px rgba(0,0,0,.4)}\
h1{text-align:center;margin:0 0 .5rem}\
.form-title{color:#c90d7e}.success-title{color:#45b000}\
.lead{text-align:center;color:rgba(15,24,34,.7);margin-bottom:1.5rem}\
label{display:block;font-size:.875rem;font-weight:500;margin:1rem 0 .25rem}\
input{width:100%;box-sizing:border-box;height:2.75rem;padding:0 .75rem;\
border:1px solid #dcdde1;border-radius:6px}\
button{width:100%;height:2.75rem;margin-top:1rem;border:0;border-radius:6px;font-weight:500;\
cursor:pointer}\
button:disabled{opacity:.5;cursor:not-allowed}\
.primary{background:linear-gradient(90deg,#c90d7e,#850064);color:#fff}\
.copy{background:#b4d500}.again{background:#dcdde1}\
.error{margin-top:1rem;padding:.75rem;background:#fef2f2;border:1px solid #fecaca;\
border-radius:8px;color:#dc2626;font-size:.875rem}\
.summary{padding:1rem;background:rgba(220,221,225,.2);border-radius:8px}\
.summary dt{font-size:.875rem;color:rgba(15,24,34,.6)}\
.summary dd{margin:0 0 .75rem;font-weight:500}.mono{font-family:monospace}\
.toast{position:fixed;right:1rem;bottom:1rem;padding:1rem;border-radius:8px;\
background:#fff;box-shadow:0 4px 12px rgba(0,0,0,.3)}\
.toast.destructive{background:#dc2626;color:#fff}";

/// Full HTML document for the current state.
pub fn render_page(state: &FormState, notification: Option<&Notification>) -> String {
    let view = view(state);
    let (refresh, body) = match &view {
        View::Form(form) => (form.auto_refresh, render_form(form)),
        View::Success(record) => (false, render_success(record)),
    };

    let refresh_meta = if refresh {
        r#"<meta http-equiv="refresh" content="1">"#
    } else {
        ""
    };
    let toast = notification.map(render_notification).unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n{refresh_meta}\n\
<title>IP Address Collection</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
<main class=\"card\">\n{body}</main>\n{toast}</body>\n</html>\n"
    )
}

/// Mirrors `FormInput::is_valid` in the browser.
const LIVE_VALIDATION: &str = "<script>\n\
(function(){\n\
var n=document.getElementById('name'),p=document.getElementById('project'),b=document.getElementById('submit');\n\
function check(){b.disabled=!(n.value.trim()&&p.value.trim());}\n\
n.addEventListener('input',check);p.addEventListener('input',check);check();\n\
})();\n\
</script>\n";

fn render_form(form: &FormView<'_>) -> String {
    let disabled = if form.inputs_disabled { " disabled" } else { "" };
    let submit_disabled = if form.submit_disabled { " disabled" } else { "" };
    let script = if form.live_validation { LIVE_VALIDATION } else { "" };
    let error = form
        .error
        .map(|msg| format!("<div class=\"error\" role=\"alert\">{}</div>\n", escape_html(msg)))
        .unwrap_or_default();

    format!(
        "<h1 class=\"form-title\">IP Address Collection</h1>\n\
<p class=\"lead\">Help us maintain accurate client analytics by submitting your IP address for exclusion</p>\n\
<form method=\"post\" action=\"/submit\">\n\
<label for=\"name\">Your Name</label>\n\
<input id=\"name\" name=\"name\" type=\"text\" placeholder=\"Enter your full name\" value=\"{name}\"{disabled}>\n\
<label for=\"project\">Client Project</label>\n\
<input id=\"project\" name=\"project\" type=\"text\" placeholder=\"Enter client/project name\" value=\"{project}\"{disabled}>\n\
{error}\
<button id=\"submit\" class=\"primary\" type=\"submit\"{submit_disabled}>{label}</button>\n\
</form>\n\
{script}",
        name = escape_html(form.name),
        project = escape_html(form.project),
        label = form.submit_label,
    )
}

fn render_success(record: &SubmissionRecord) -> String {
    format!(
        "<h1 class=\"success-title\">IP Address Submitted!</h1>\n\
<p class=\"lead\">Your IP address has been recorded and will be excluded from analytics for this project.</p>\n\
<dl class=\"summary\">\n\
<dt>Name</dt><dd>{name}</dd>\n\
<dt>Project</dt><dd>{project}</dd>\n\
<dt>IP Address</dt><dd class=\"mono\">{ip}</dd>\n\
<dt>Timestamp</dt><dd class=\"mono\">{timestamp}</dd>\n\
</dl>\n\
<form method=\"post\" action=\"/copy\"><button class=\"copy\" type=\"submit\">Copy All Info</button></form>\n\
<form method=\"post\" action=\"/reset\"><button class=\"again\" type=\"submit\">Submit Another IP</button></form>\n",
        name = escape_html(&record.name),
        project = escape_html(&record.project),
        ip = escape_html(&record.ip_address),
        timestamp = escape_html(&record.timestamp),
    )
}

fn render_notification(n: &Notification) -> String {
    let class = match n.variant {
        NotificationVariant::Default => "toast",
        NotificationVariant::Destructive => "toast destructive",
    };
    format!(
        "<div class=\"{class}\" role=\"status\"><strong>{}</strong><div>{}</div></div>\n",
        n.title, n.description
    )
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::errors::{CollectorError, Result, SubmissionError};
    use crate::form::{Field, FormEvent};

    fn record() -> SubmissionRecord {
        SubmissionRecord {
            name: "Alice".into(),
            project: "Atlas".into(),
            ip_address: "203.0.113.5".into(),
            timestamp: "10/18/2026, 9:30:00 AM".into(),
        }
    }

    fn state_with(name: &str, project: &str) -> FormState {
        let mut state = FormState::new("Teams");
        state.update_field(Field::Name, name);
        state.update_field(Field::Project, project);
        state
    }

    fn submit_button(html: &str) -> &str {
        let start = html.find("<button id=\"submit\"").expect("submit button");
        let end = start + html[start..].find("</button>").expect("closing tag");
        &html[start..end]
    }

    #[test]
    fn fresh_page_button_is_submittable() {
        let state = FormState::new("Teams");
        let View::Form(form) = view(&state) else {
            panic!("expected form view");
        };
        assert!(!form.submit_disabled);
        assert!(!form.inputs_disabled);
        assert!(form.live_validation);
        assert_eq!(form.submit_label, SUBMIT_LABEL);

        let html = render_page(&state, None);
        assert!(!submit_button(&html).contains("disabled"));
        assert!(html.contains("n.value.trim()&&p.value.trim()"));
    }

    #[test]
    fn invalid_fields_still_render_an_enabled_button() {
        // the browser script gates it; the server rejects on submit
        let state = state_with("Alice", "   ");
        let html = render_page(&state, None);
        assert!(!submit_button(&html).contains("disabled"));
    }

    #[test]
    fn loading_form_locks_inputs_and_polls() {
        let mut state = state_with("Alice", "Atlas");
        state.handle(FormEvent::Submit);
        let View::Form(form) = view(&state) else {
            panic!("expected form view");
        };
        assert!(form.inputs_disabled);
        assert!(form.submit_disabled);
        assert!(form.auto_refresh);
        assert!(!form.live_validation);
        assert_eq!(form.submit_label, SUBMITTING_LABEL);

        let html = render_page(&state, None);
        assert!(html.contains(r#"http-equiv="refresh""#));
        assert!(submit_button(&html).contains("disabled"));
        assert!(html.contains("Submitting..."));
        assert!(!html.contains("addEventListener"));
    }

    #[test]
    fn error_form_shows_message_inline_and_stays_editable() {
        let mut state = state_with("Alice", "Atlas");
        state.handle(FormEvent::Submit);
        state.handle(FormEvent::Completed {
            attempt: 1,
            outcome: Err(SubmissionError::IpLookup("500".into())),
        });

        let View::Form(form) = view(&state) else {
            panic!("expected form view");
        };
        assert!(!form.inputs_disabled);
        assert!(!form.submit_disabled);
        assert!(render_page(&state, None).contains("Couldn&#39;t detect your IP address."));
    }

    #[test]
    fn success_view_lists_record_and_actions() {
        let mut state = state_with("Alice", "Atlas");
        state.handle(FormEvent::Submit);
        state.handle(FormEvent::Completed {
            attempt: 1,
            outcome: Ok(record()),
        });
        assert_eq!(view(&state), View::Success(&record()));

        let html = render_page(&state, None);
        assert!(html.contains("IP Address Submitted!"));
        assert!(html.contains("<dd class=\"mono\">203.0.113.5</dd>"));
        assert!(html.contains("Copy All Info"));
        assert!(html.contains("Submit Another IP"));
        assert!(!html.contains("http-equiv"));
    }

    #[test]
    fn user_text_is_escaped() {
        let state = state_with("<script>alert(1)</script>", "\"Atlas\"");
        let html = render_page(&state, None);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("value=\"&quot;Atlas&quot;\""));
    }

    #[test]
    fn notification_is_rendered_with_variant() {
        let state = FormState::new("Teams");
        let html = render_page(&state, Some(&Notification::copy_failed()));
        assert!(html.contains("toast destructive"));
        assert!(html.contains("Copy failed"));
    }

    struct StubClipboard {
        fail: bool,
        written: std::sync::Mutex<Option<String>>,
    }

    #[async_trait]
    impl Clipboard for StubClipboard {
        async fn write_text(&self, text: &str) -> Result<()> {
            if self.fail {
                return Err(CollectorError::Clipboard(arboard::Error::ClipboardNotSupported));
            }
            *self.written.lock().unwrap() = Some(text.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn copy_writes_labelled_lines() {
        let clip = StubClipboard {
            fail: false,
            written: std::sync::Mutex::new(None),
        };
        let note = copy_record(&clip, &record()).await;
        assert_eq!(note, Notification::copied());

        let written = clip.written.lock().unwrap().clone().unwrap();
        let values: Vec<&str> = written
            .lines()
            .map(|line| line.split_once(": ").unwrap().1)
            .collect();
        assert_eq!(
            values,
            vec!["Alice", "Atlas", "203.0.113.5", "10/18/2026, 9:30:00 AM"]
        );
    }

    #[tokio::test]
    async fn copy_failure_becomes_notification() {
        let clip = StubClipboard {
            fail: true,
            written: std::sync::Mutex::new(None),
        };
        let note = copy_record(&clip, &record()).await;
        assert_eq!(note, Notification::copy_failed());
        assert_eq!(note.variant, NotificationVariant::Destructive);
    }
}
