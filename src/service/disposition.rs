/// Filename used when the server does not suggest one.
pub const DEFAULT_DOWNLOAD_NAME: &str = "translations.zip";

const EXTENDED_PARAM: &str = "filename*=utf-8''";
const PLAIN_PARAM: &str = "filename=";

/// Pick the download filename from a `Content-Disposition` header value.
///
/// The RFC 5987 form (`filename*=UTF-8''...`) wins over the plain
/// `filename="..."` form. A percent-encoded name that does not decode to
/// UTF-8 is returned as the raw token.
pub fn suggested_filename(header: Option<&str>) -> String {
    header
        .and_then(|value| extended_filename(value).or_else(|| plain_filename(value)))
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string())
}

fn extended_filename(value: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `value`.
    let start = value.to_ascii_lowercase().find(EXTENDED_PARAM)? + EXTENDED_PARAM.len();
    let token = value[start..].split(';').next()?.trim();
    if token.is_empty() {
        return None;
    }
    match urlencoding::decode(token) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(e) => {
            log::warn!("Could not decode filename {token:?}: {e}");
            Some(token.to_string())
        }
    }
}

fn plain_filename(value: &str) -> Option<String> {
    let start = value.to_ascii_lowercase().find(PLAIN_PARAM)? + PLAIN_PARAM.len();
    let rest = value[start..].trim_start();
    let name = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next()?,
        None => rest.split(';').next()?.trim(),
    };
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
