use reportobello_core::{DisplayMode, PageViewModel, DEFAULT_DOWNLOAD_NAME};

/// Number of log lines shown on the page; the full log stays in state.
const VISIBLE_LOGS: usize = 10;

pub(crate) fn render(view: &PageViewModel) -> String {
    let mode = view.display_mode.map_or("(none)", DisplayMode::as_str);
    let version = view
        .uploaded_version
        .map_or_else(|| "not uploaded".to_string(), |version| format!("v{version}"));
    let status = if view.in_flight > 0 {
        format!("{} request(s) in flight", view.in_flight)
    } else {
        "idle".to_string()
    };

    let mut out = String::new();
    out.push_str(&format!(
        "== {} | {} | {} ==\n",
        view.template_name, version, status
    ));
    out.push_str(&format!(
        "Display: {mode} | Download as: {} | Tab download as: {}\n",
        view.download_as.as_deref().unwrap_or(DEFAULT_DOWNLOAD_NAME),
        view.tab_download_as.as_deref().unwrap_or("(browser default)")
    ));
    out.push_str(&format!(
        "Template: {} line(s)\n",
        view.template_source.lines().count()
    ));
    out.push_str(&format!("Data: {}\n", single_line(&view.json_data)));

    if view.logs.is_empty() {
        out.push_str("Log: (empty)");
    } else {
        out.push_str("Log (newest first):");
        for line in view.logs.iter().take(VISIBLE_LOGS) {
            out.push_str("\n  ");
            out.push_str(line);
        }
        let hidden = view.logs.len().saturating_sub(VISIBLE_LOGS);
        if hidden > 0 {
            out.push_str(&format!("\n  ... {hidden} older"));
        }
    }
    out
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
