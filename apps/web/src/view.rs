//! Server-rendered page. Pure function of a `PageModel`; the live output area
//! follows `/api/output/events` while a generation is running.

use std::fmt::Write;

use crate::form::{Notice, PageModel};

const STYLE: &str = "body{font-family:sans-serif;padding:20px;max-width:800px;margin:0 auto}\
.objective{margin:4px;padding:6px 10px;background:#eee;color:#000;border:none;border-radius:4px}\
.objective.active{background:#006e6e;color:#fff}\
select,input{width:100%;padding:8px;box-sizing:border-box}\
.generate{margin-top:12px;padding:12px;width:100%;background:#022543;color:#fff;border:none;border-radius:4px}\
.notice{background:#fde8e8;padding:10px;border-radius:4px}\
pre{white-space:pre-wrap;background:#f4f4f4;padding:10px;margin-top:20px;min-height:160px}";

/// Mirrors the framework and keyword into the objective form on every
/// keystroke, so an objective click carries them. Also posts the selection in
/// the background when an input is committed.
const SELECTION_SCRIPT: &str = "const form=document.getElementById('generate-form');\
const carry=document.getElementById('objective-form');\
form.addEventListener('input',()=>{carry.elements.framework_id.value=form.elements.framework_id.value;\
carry.elements.keyword.value=form.elements.keyword.value;});\
form.addEventListener('change',()=>fetch('/selection',{method:'POST',keepalive:true,body:new URLSearchParams(new FormData(form))}));";

const LIVE_OUTPUT_SCRIPT: &str = "const out=document.getElementById('output');\
const events=new EventSource('/api/output/events');\
events.addEventListener('output',e=>{const s=JSON.parse(e.data);out.textContent=s.output;\
if(!s.loading){events.close();location.reload();}});";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// JSON string literal that is also safe inside a `<script>` element.
fn script_string(text: &str) -> String {
    serde_json::to_string(text)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace("</", "<\\/")
}

fn render_notice(html: &mut String, notice: &Notice) {
    let _ = write!(
        html,
        "<div class=\"notice\" role=\"alert\">{}</div><script>alert({});</script>",
        escape_html(&notice.message),
        script_string(&notice.message)
    );
}

fn render_objectives(html: &mut String, page: &PageModel) {
    let _ = write!(
        html,
        "<h3>Objective</h3><form id=\"objective-form\" method=\"post\" action=\"/objective\">\
         <input type=\"hidden\" name=\"framework_id\" value=\"{}\">\
         <input type=\"hidden\" name=\"keyword\" value=\"{}\">",
        escape_html(page.selected_framework.as_deref().unwrap_or_default()),
        escape_html(&page.keyword)
    );
    for objective in &page.objectives {
        let active = page.active_objective.as_deref() == Some(objective.as_str());
        let _ = write!(
            html,
            "<button class=\"objective{}\" name=\"objective\" value=\"{}\">{}</button>",
            if active { " active" } else { "" },
            escape_html(objective),
            escape_html(objective)
        );
    }
    html.push_str("<button name=\"objective\" value=\"\" style=\"margin:4px\">All</button></form>");
}

fn render_generate_form(html: &mut String, page: &PageModel) {
    html.push_str(
        "<form id=\"generate-form\" method=\"post\" action=\"/generate\">\
         <h3 style=\"margin-top:20px\">Framework</h3>\
         <select name=\"framework_id\"><option value=\"\">Select...</option>",
    );
    for framework in &page.frameworks {
        let selected = page.selected_framework.as_deref() == Some(framework.id.as_str());
        let _ = write!(
            html,
            "<option value=\"{}\" title=\"{}\"{}>{}</option>",
            escape_html(&framework.id),
            escape_html(&framework.synopsis),
            if selected { " selected" } else { "" },
            escape_html(&framework.name)
        );
    }
    let _ = write!(
        html,
        "</select><h3>Keyword / Pain-point</h3>\
         <input name=\"keyword\" value=\"{}\" placeholder=\"e.g. Forex Trading\">\
         <button class=\"generate\" type=\"submit\"{}>{}</button></form>",
        escape_html(&page.keyword),
        if page.output.loading { " disabled" } else { "" },
        if page.output.loading { "Generating…" } else { "Generate" }
    );
}

pub fn render_page(page: &PageModel) -> String {
    let mut html = String::with_capacity(4096);
    let _ = write!(
        html,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>Money Lines Generator</title><style>{STYLE}</style></head><body>\
         <h1>Money Lines Generator</h1>"
    );

    if let Some(notice) = &page.notice {
        render_notice(&mut html, notice);
    }

    render_objectives(&mut html, page);
    render_generate_form(&mut html, page);

    let _ = write!(
        html,
        "<form method=\"post\" action=\"/reload\"><button type=\"submit\">Reload frameworks</button></form>\
         <pre id=\"output\">{}</pre><script>{SELECTION_SCRIPT}",
        escape_html(&page.output.output)
    );
    if page.output.loading {
        html.push_str(LIVE_OUTPUT_SCRIPT);
    }
    html.push_str("</script></body></html>");
    html
}
