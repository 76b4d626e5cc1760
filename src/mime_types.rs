use std::path::Path;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

// Platform tables are often stale for these, and a wrong type breaks module loading.
const WEB_BUNDLE_OVERRIDES: &[(&str, &str)] = &[
    ("js", "application/javascript"),
    ("mjs", "application/javascript"),
    ("wasm", "application/wasm"),
];

pub(crate) fn content_type_for_path(path: &Path) -> String {
    let Some(extension) = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
    else {
        return FALLBACK_CONTENT_TYPE.to_string();
    };

    if let Some((_, content_type)) = WEB_BUNDLE_OVERRIDES
        .iter()
        .find(|(candidate, _)| *candidate == extension)
    {
        return (*content_type).to_string();
    }

    mime_guess::from_ext(&extension)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}
