//! Markup injection.

/// Append the live reload client and the compiled stylesheet to a markup body.
///
/// The script is only added when a push channel is running (`ws_port`).
/// Output depends on nothing but the inputs, so serving the same document
/// twice without a recompile in between yields identical bytes.
pub fn inject(body: Vec<u8>, css: &str, ws_port: Option<u16>) -> Vec<u8> {
    use crate::embed::serve::{LIVERELOAD_JS, LiveReloadVars};

    let script = ws_port.map(|ws_port| LIVERELOAD_JS.render(&LiveReloadVars { ws_port }));
    let script_len = script.as_ref().map_or(0, |s| s.len() + "\n<script></script>".len());
    let style_len = css.len() + "\n<style></style>\n".len();

    let mut result = Vec::with_capacity(body.len() + script_len + style_len);
    result.extend_from_slice(&body);

    if let Some(script) = script {
        result.extend_from_slice(b"\n<script>");
        result.extend_from_slice(script.as_bytes());
        result.extend_from_slice(b"</script>");
    }

    result.extend_from_slice(b"\n<style>");
    result.extend_from_slice(css.as_bytes());
    result.extend_from_slice(b"</style>\n");
    result
}
