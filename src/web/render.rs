//! HTML views, assembled as strings. All user-supplied text goes through
//! `escape` before it reaches a page.

use crate::session::HistoryEntry;

pub struct IndexView<'a> {
    pub error: Option<&'a str>,
    pub result: Option<&'a str>,
    pub video_url: Option<&'a str>,
    pub selected_model: Option<&'a str>,
    pub history: &'a [HistoryEntry],
    pub ollama_models: &'a [String],
}

impl Default for IndexView<'_> {
    fn default() -> Self {
        Self {
            error: None,
            result: None,
            video_url: None,
            selected_model: None,
            history: &[],
            ollama_models: &[],
        }
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>\nbody {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }}\n\
         textarea, input[type=text], input[type=password], select {{ width: 100%; margin-bottom: 0.5rem; }}\n\
         .error {{ color: #b00020; }}\n\
         .entry {{ border-top: 1px solid #ccc; padding: 0.5rem 0; }}\n\
         </style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn option(value: &str, label: &str, selected: Option<&str>) -> String {
    let mark = if selected == Some(value) { " selected" } else { "" };
    format!("<option value=\"{}\"{}>{}</option>\n", value, mark, label)
}

pub fn index_page(view: &IndexView) -> String {
    let mut body = String::new();
    body.push_str("<h1>Video Q&amp;A</h1>\n");

    if let Some(error) = view.error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape(error)));
    }

    body.push_str("<form method=\"post\" action=\"/\">\n");
    body.push_str("<label>Video URL</label>\n");
    body.push_str(&format!(
        "<input type=\"text\" name=\"video_url\" value=\"{}\" placeholder=\"https://www.youtube.com/watch?v=...\">\n",
        escape(view.video_url.unwrap_or_default())
    ));

    body.push_str("<label>Model</label>\n<select name=\"model\">\n");
    body.push_str(&option("gemini", "Gemini", view.selected_model));
    body.push_str(&option("openai", "OpenAI", view.selected_model));
    body.push_str(&option("ollama", "Ollama (local)", view.selected_model));
    body.push_str("</select>\n");

    body.push_str("<label>Model name</label>\n");
    body.push_str("<input type=\"text\" name=\"model_name\" list=\"local-models\" placeholder=\"gemini-2.0-flash, gpt-4o, llama3...\">\n");
    body.push_str("<datalist id=\"local-models\">\n");
    for model in view.ollama_models {
        body.push_str(&format!("<option value=\"{}\">\n", escape(model)));
    }
    body.push_str("</datalist>\n");

    body.push_str("<label>Instruction</label>\n");
    body.push_str("<textarea name=\"user_request\" rows=\"3\" placeholder=\"summarize the video\"></textarea>\n");

    body.push_str("<button type=\"submit\">Ask</button>\n");
    body.push_str("<button type=\"submit\" name=\"reset\" value=\"1\">Reset</button>\n");
    body.push_str("<a href=\"/settings\">Settings</a>\n");
    body.push_str("</form>\n");

    if let Some(result) = view.result {
        body.push_str(&format!(
            "<h2>Response</h2>\n<div class=\"result\"><pre>{}</pre></div>\n",
            escape(result)
        ));
    }

    if !view.history.is_empty() {
        body.push_str("<h2>History</h2>\n");
        for entry in view.history {
            body.push_str(&format!(
                "<div class=\"entry\"><p><strong>{}</strong> &mdash; {}</p><pre>{}</pre></div>\n",
                escape(&entry.model),
                escape(&entry.request),
                escape(&entry.response)
            ));
        }
    }

    page("Video Q&A", &body)
}

pub fn settings_page(gemini_api_key: Option<&str>, openai_api_key: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str("<h1>Settings</h1>\n");

    body.push_str("<form method=\"post\" action=\"/settings\">\n");
    body.push_str("<label>Backend</label>\n<select name=\"model\">\n");
    body.push_str(&option("gemini", "Gemini", None));
    body.push_str(&option("openai", "OpenAI", None));
    body.push_str("</select>\n");

    body.push_str("<label>API key</label>\n");
    body.push_str("<input type=\"password\" name=\"api_key\" placeholder=\"paste your key\">\n");
    body.push_str("<button type=\"submit\">Save</button>\n");
    body.push_str("<a href=\"/\">Back</a>\n");
    body.push_str("</form>\n");

    body.push_str(&format!(
        "<p>Gemini key: {}</p>\n<p>OpenAI key: {}</p>\n",
        key_status(gemini_api_key),
        key_status(openai_api_key)
    ));

    page("Settings", &body)
}

/// Keys are never echoed back; the page only reports whether one is stored.
fn key_status(key: Option<&str>) -> &'static str {
    if key.is_some() {
        "configured"
    } else {
        "not set"
    }
}
