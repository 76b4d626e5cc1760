use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MappedPath {
    pub(crate) fs_path: PathBuf,
    /// Path part of the request target, still percent-encoded, without query.
    pub(crate) url_path: String,
    pub(crate) trailing_slash: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestPathError {
    Traversal,
    Malformed,
}

fn hex_val(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

pub(crate) fn percent_decode_segment(input: &str) -> Result<String, RequestPathError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' && index + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_val(bytes[index + 1]), hex_val(bytes[index + 2])) {
                out.push((hi << 4) | lo);
                index += 3;
                continue;
            }
        }
        out.push(bytes[index]);
        index += 1;
    }
    String::from_utf8(out).map_err(|_| RequestPathError::Malformed)
}

fn is_plain_segment(segment: &str) -> bool {
    if segment.contains(['/', '\\', '\0']) {
        return false;
    }
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Maps a raw request target onto a path below `root`.
///
/// Never produces a path above `root`; callers still compare canonical paths
/// to catch symlinks that point outside.
pub(crate) fn map_request_path(root: &Path, raw_target: &str) -> Result<MappedPath, RequestPathError> {
    let url_path = raw_target
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let url_path = if url_path.is_empty() { "/" } else { url_path };
    let trailing_slash = url_path.ends_with('/');

    let mut fs_path = root.to_path_buf();
    for raw_segment in url_path.split('/') {
        let segment = percent_decode_segment(raw_segment)?;
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." || !is_plain_segment(&segment) {
            return Err(RequestPathError::Traversal);
        }
        fs_path.push(segment);
    }

    Ok(MappedPath {
        fs_path,
        url_path: url_path.to_string(),
        trailing_slash,
    })
}
