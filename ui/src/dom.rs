//! Small browser interop helpers shared by the components.

/// Blocking confirmation dialog. Always true off-wasm (tests, native).
pub fn confirm(message: &str) -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .map(|w| w.confirm_with_message(message).unwrap_or(false))
            .unwrap_or(false)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        true
    }
}

/// Non-blocking failure notice.
pub fn alert(message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!("{message}");
}

/// Async sleep that works on the browser event loop.
pub async fn sleep_ms(ms: u32) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::TimeoutFuture::new(ms).await;
    #[cfg(not(target_arch = "wasm32"))]
    let _ = ms;
}

/// Escape a string so it's safe to embed inside a JS string literal
/// (double-quoted).
pub fn js_string_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c < '\x20' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::js_string_escape;

    #[test]
    fn escapes_quotes_and_control_chars() {
        assert_eq!(js_string_escape(r#"a"b"#), r#""a\"b""#);
        assert_eq!(js_string_escape("line\nbreak"), r#""line\nbreak""#);
        assert_eq!(js_string_escape("back\\slash"), r#""back\\slash""#);
        assert_eq!(js_string_escape("\u{1}"), "\"\\u0001\"");
    }
}
