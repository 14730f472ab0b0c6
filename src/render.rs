//! Server-rendered HTML for the identify form and its results.

use std::fmt::Write;

use crate::action::ActionOutcome;
use crate::flows::FontSuggestion;

/// Form-level message when neither a file nor a URL was submitted.
pub const FORM_MISSING_IMAGE_MESSAGE: &str = "Please upload an image or provide a URL.";

/// Confidence as a whole percentage, rounded to nearest (0.873 → 87).
pub fn confidence_percent(confidence: f64) -> i64 {
    (confidence * 100.0).round() as i64
}

/// Which input tab is selected when the page renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Upload,
    Url,
}

/// Everything the page shows for one render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub active_tab: Tab,
    /// Value echoed back into the URL field
    pub image_url: String,
    /// `src` of the preview image: a data URI or the submitted URL
    pub preview: Option<String>,
    /// Field validation message shown under the form
    pub form_error: Option<String>,
    /// Failure of the identify action, shown as an alert
    pub error: Option<String>,
    pub suggestions: Vec<FontSuggestion>,
}

impl PageState {
    /// Page state after an identify action ran.
    pub fn with_outcome(mut self, outcome: ActionOutcome<FontSuggestion>) -> Self {
        match outcome {
            ActionOutcome::Suggestions { suggestions } => {
                self.suggestions = suggestions;
                self.error = None;
            }
            ActionOutcome::Error { error } => {
                self.suggestions.clear();
                self.error = Some(error);
            }
        }
        self
    }
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

// Model-supplied links only become hrefs when they are plain web URLs.
fn safe_href(link: &str) -> String {
    match url::Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => escape_html(url.as_str()),
        _ => "#".to_string(),
    }
}

/// One result card: name, confidence bar, copy and "Get Font" actions.
pub fn render_suggestion_card(suggestion: &FontSuggestion) -> String {
    let percent = confidence_percent(suggestion.confidence_level);
    let bar = percent.clamp(0, 100);
    let name = escape_html(&suggestion.font_name);

    format!(
        r#"<article class="card suggestion">
  <h3 class="font-name" title="{name}">{name}</h3>
  <div class="confidence">
    <span class="label">Confidence</span>
    <span class="value">{percent}%</span>
  </div>
  <div class="progress" role="progressbar" aria-valuenow="{bar}" aria-valuemin="0" aria-valuemax="100" aria-label="{percent}% confidence" title="{percent}% confidence">
    <div class="progress-fill" style="width: {bar}%"></div>
  </div>
  <div class="actions">
    <button type="button" class="secondary copy" data-font="{name}">Copy</button>
    <a class="button" href="{href}" target="_blank" rel="noopener noreferrer">Get Font &#8599;</a>
  </div>
</article>
"#,
        href = safe_href(&suggestion.purchase_link),
    )
}

/// The results region: error alert, suggestion grid, or nothing.
pub fn render_results(state: &PageState) -> String {
    if let Some(error) = &state.error {
        return format!(
            r#"<div class="alert destructive" role="alert">
  <strong>Error</strong>
  <p>{}</p>
</div>
"#,
            escape_html(error)
        );
    }

    if state.suggestions.is_empty() {
        return String::new();
    }

    let mut out = String::from(
        "<section aria-live=\"polite\" class=\"results\">\n  <h2>We found these fonts!</h2>\n  <div class=\"grid\">\n",
    );
    for suggestion in &state.suggestions {
        out.push_str(&render_suggestion_card(suggestion));
    }
    out.push_str("  </div>\n</section>\n");
    out
}

fn render_loading() -> String {
    let skeleton = r#"<div class="card skeleton"><div class="bone title"></div><div class="bone bar"></div><div class="bone buttons"></div></div>"#;
    format!(
        "<section id=\"loading\" aria-live=\"polite\" aria-busy=\"true\" class=\"results\" hidden>\n  <h2>Identifying your font...</h2>\n  <div class=\"grid\">{0}{0}{0}</div>\n</section>\n",
        skeleton
    )
}

/// Render the complete page.
pub fn render_page(state: &PageState) -> String {
    let (upload_checked, url_checked) = match state.active_tab {
        Tab::Upload => (" checked", ""),
        Tab::Url => ("", " checked"),
    };

    let mut body = String::new();
    let _ = write!(
        body,
        r#"<main>
<div class="card">
  <h1>Identify a Font</h1>
  <p class="muted">Upload an image or paste a URL to find out what font is used.</p>
  <form id="identify-form" method="post" action="/" enctype="multipart/form-data">
    <div class="tabs">
      <input type="radio" name="tab" id="tab-upload" value="upload"{upload_checked}>
      <label for="tab-upload">Upload File</label>
      <input type="radio" name="tab" id="tab-url" value="url"{url_checked}>
      <label for="tab-url">Use URL</label>
      <div class="tab-panel upload">
        <label for="imageFile">Image File</label>
        <input id="imageFile" name="imageFile" type="file" accept="image/*">
      </div>
      <div class="tab-panel url">
        <label for="imageUrl">Image URL</label>
        <input id="imageUrl" name="imageUrl" type="text" placeholder="https://example.com/image.png" value="{image_url}">
      </div>
    </div>
"#,
        image_url = escape_html(&state.image_url),
    );

    if let Some(form_error) = &state.form_error {
        let _ = writeln!(body, "    <p class=\"field-error\">{}</p>", escape_html(form_error));
    }

    match &state.preview {
        Some(src) => {
            let _ = writeln!(
                body,
                "    <div class=\"preview\"><img src=\"{}\" alt=\"Image preview\"></div>",
                escape_html(src)
            );
        }
        None => body.push_str(
            "    <div class=\"preview empty\"><span>Image preview will appear here</span></div>\n",
        ),
    }

    body.push_str(
        "    <button type=\"submit\" id=\"submit\">Identify Font</button>\n  </form>\n</div>\n",
    );
    body.push_str(&render_loading());
    body.push_str(&render_results(state));
    body.push_str("</main>\n");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>FontSnap</title>
<style>{STYLE}</style>
</head>
<body>
<header><span class="logo">FontSnap</span></header>
{body}<script>{SCRIPT}</script>
</body>
</html>
"#
    )
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f5f7; color: #1d1d1f; }
header { padding: 16px 24px; font-weight: 700; }
main { max-width: 960px; margin: 0 auto; padding: 24px; display: grid; gap: 32px; }
.card { background: #fff; border-radius: 12px; padding: 24px; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.muted, .label { color: #6e6e73; font-size: 14px; }
.tabs > input[type=radio] { display: none; }
.tabs > label { display: inline-block; padding: 8px 16px; cursor: pointer; border-radius: 8px; }
.tabs > input:checked + label { background: #e8e8ed; font-weight: 600; }
.tab-panel { display: none; padding-top: 16px; }
#tab-upload:checked ~ .upload, #tab-url:checked ~ .url { display: block; }
.field-error { color: #d70015; font-size: 14px; }
.preview { margin: 16px 0; min-height: 160px; border: 2px dashed #d2d2d7; border-radius: 8px; display: flex; align-items: center; justify-content: center; }
.preview img { max-width: 100%; max-height: 320px; }
button, .button { background: #0071e3; color: #fff; border: 0; border-radius: 8px; padding: 8px 16px; text-decoration: none; cursor: pointer; }
button.secondary { background: #e8e8ed; color: #1d1d1f; }
.results h2 { text-align: center; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 24px; }
.confidence, .actions { display: flex; justify-content: space-between; align-items: baseline; gap: 8px; }
.progress { height: 10px; background: #e8e8ed; border-radius: 5px; overflow: hidden; margin: 8px 0 16px; }
.progress-fill { height: 100%; background: #0071e3; }
.alert.destructive { border: 1px solid #d70015; color: #d70015; border-radius: 8px; padding: 12px 16px; }
.skeleton .bone { background: #e8e8ed; border-radius: 6px; margin-bottom: 12px; animation: pulse 1.5s infinite; }
.bone.title { height: 24px; width: 75%; } .bone.bar { height: 10px; } .bone.buttons { height: 36px; width: 60%; }
@keyframes pulse { 50% { opacity: .5; } }
"#;

const SCRIPT: &str = r#"
document.getElementById('identify-form').addEventListener('submit', function () {
  document.getElementById('loading').hidden = false;
  document.querySelectorAll('.results:not(#loading), .alert').forEach(function (el) { el.remove(); });
  document.getElementById('submit').disabled = true;
});
document.getElementById('imageFile').addEventListener('change', function (event) {
  var file = event.target.files[0];
  if (!file) return;
  document.getElementById('imageUrl').value = '';
  var reader = new FileReader();
  reader.onloadend = function () {
    var preview = document.querySelector('.preview');
    preview.classList.remove('empty');
    preview.innerHTML = '<img alt="Image preview">';
    preview.querySelector('img').src = reader.result;
  };
  reader.readAsDataURL(file);
});
document.querySelectorAll('button.copy').forEach(function (button) {
  button.addEventListener('click', function () {
    navigator.clipboard.writeText(button.dataset.font);
    button.textContent = 'Copied!';
    setTimeout(function () { button.textContent = 'Copy'; }, 2000);
  });
});
"#;
