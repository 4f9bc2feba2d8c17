const MAX_STEM_BYTES: usize = 80;
const FALLBACK_STEM: &str = "report";

/// Windows-safe PDF filename derived from a user supplied name.
///
/// Forbidden characters become `_`, runs of `_` collapse, reserved device
/// names are patched and the result always ends in `.pdf`.
pub fn safe_pdf_filename(requested: &str) -> String {
    format!("{}.pdf", sanitize_stem(strip_pdf_extension(requested.trim())))
}

fn strip_pdf_extension(name: &str) -> &str {
    match name.len().checked_sub(4) {
        Some(cut) if name.is_char_boundary(cut) && name[cut..].eq_ignore_ascii_case(".pdf") => {
            &name[..cut]
        }
        _ => name,
    }
}

fn sanitize_stem(input: &str) -> String {
    let mut replaced = String::with_capacity(input.len());
    for c in input.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && replaced.ends_with('_') {
            continue;
        }
        replaced.push(c);
    }

    let trimmed = replaced.trim_matches(['_', ' ', '.']);
    let mut stem = if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        truncate_to_boundary(trimmed, MAX_STEM_BYTES).to_string()
    };
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    stem
}

fn truncate_to_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut cut = max_bytes;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|') || c.is_control()
}

fn is_reserved_windows_name(name: &str) -> bool {
    const DEVICES: &[&str] = &["CON", "PRN", "AUX", "NUL"];
    if DEVICES.iter().any(|device| device.eq_ignore_ascii_case(name)) {
        return true;
    }
    // COM1..COM9 and LPT1..LPT9
    let bytes = name.as_bytes();
    let port = matches!(
        name.get(..3),
        Some(prefix) if prefix.eq_ignore_ascii_case("COM") || prefix.eq_ignore_ascii_case("LPT")
    );
    port && bytes.len() == 4 && matches!(bytes[3], b'1'..=b'9')
}
