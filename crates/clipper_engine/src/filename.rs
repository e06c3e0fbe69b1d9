const FALLBACK_NAME: &str = "vertical_clip.mp4";

/// Makes a server-derived filename safe to create in the output directory.
///
/// Path separators, reserved characters and control characters become `_`, so
/// a hostile process id can never escape the directory.
pub fn safe_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&[' ', '.'][..]);
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        return FALLBACK_NAME.to_string();
    }
    let mut final_name = cleaned.to_string();
    if is_reserved_windows_name(final_name.split('.').next().unwrap_or_default()) {
        final_name.insert(0, '_');
    }
    final_name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
