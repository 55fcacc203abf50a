use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Current UTC timestamp (milliseconds)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Hide a numeric id behind `base64(salt + id)`.
///
/// This only discourages casual tampering with public URLs (table QR codes);
/// anyone who knows the salt can reverse it.
pub fn obfuscate_id(salt: &str, id: i64) -> String {
    STANDARD.encode(format!("{salt}{id}"))
}

/// Reverse [`obfuscate_id`]; `None` when the token was not produced with
/// this salt
pub fn reveal_id(salt: &str, token: &str) -> Option<i64> {
    let bytes = STANDARD.decode(token.trim()).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    text.strip_prefix(salt)?.parse().ok()
}

/// Public menu URL encoded in a table's QR code:
/// `frontend-url/menu/table/<obfuscated-id>`
pub fn table_menu_url(frontend_url: &str, salt: &str, table_id: i64) -> String {
    format!(
        "{}/menu/table/{}",
        frontend_url.trim_end_matches('/'),
        obfuscate_id(salt, table_id)
    )
}
