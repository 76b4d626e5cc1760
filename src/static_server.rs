use std::{
    fs,
    io::Cursor,
    net::{IpAddr, SocketAddr, TcpStream},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant, SystemTime},
};

use chrono::{DateTime, Utc};
use tiny_http::{Header, Method, Request, Response, ResponseBox, Server, StatusCode};

use crate::{
    append_shutdown_log, mime_types, port_allocator,
    request_path::{self, RequestPathError},
    LauncherError,
};

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const LISTENER_RELEASE_TIMEOUT: Duration = Duration::from_secs(5);
const LISTENER_RELEASE_POLL_INTERVAL: Duration = Duration::from_millis(10);
const LISTENER_PROBE_CONNECT_TIMEOUT: Duration = Duration::from_millis(200);

/// Owns the bound listener and its accept thread. Stopping is idempotent and
/// also happens on drop.
pub(crate) struct ServerHandle {
    server: Option<Arc<Server>>,
    accept_thread: Option<JoinHandle<()>>,
    stopping: Arc<AtomicBool>,
    addr: SocketAddr,
}

impl ServerHandle {
    pub(crate) fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub(crate) fn stop(&mut self) {
        let Some(server) = self.server.take() else {
            return;
        };
        self.stopping.store(true, Ordering::SeqCst);
        server.unblock();
        if let Some(accept_thread) = self.accept_thread.take() {
            if accept_thread.join().is_err() {
                append_shutdown_log("asset server accept thread panicked before shutdown");
            }
        }
        // Last reference. tiny_http closes the listener from its own thread,
        // so wait until the port refuses connections before returning.
        drop(server);
        if wait_for_listener_release(self.addr, LISTENER_RELEASE_TIMEOUT) {
            append_shutdown_log(&format!("asset server on {} stopped", self.addr));
        } else {
            append_shutdown_log(&format!(
                "asset server on {} stopped but the port still accepts connections",
                self.addr
            ));
        }
    }
}

/// Returns once `addr` refuses connections, or `false` after `timeout`.
fn wait_for_listener_release(addr: SocketAddr, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        match TcpStream::connect_timeout(&addr, LISTENER_PROBE_CONNECT_TIMEOUT) {
            Err(_) => return true,
            Ok(stream) => drop(stream),
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(LISTENER_RELEASE_POLL_INTERVAL);
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn parse_loopback_host(host: &str) -> Result<IpAddr, LauncherError> {
    let reject = |reason: &str| LauncherError::ServerBind {
        addr: host.to_string(),
        reason: reason.to_string(),
    };
    let ip: IpAddr = host
        .trim()
        .parse()
        .map_err(|_| reject("host is not an IP address"))?;
    if !ip.is_loopback() {
        return Err(reject("refusing to serve on a non-loopback interface"));
    }
    Ok(ip)
}

pub(crate) fn start_asset_server(resource_dir: &Path, host: &str) -> Result<ServerHandle, LauncherError> {
    let ip = parse_loopback_host(host)?;
    let root = resource_dir
        .canonicalize()
        .map_err(|_| LauncherError::MissingResource {
            path: resource_dir.to_path_buf(),
        })?;

    let port = port_allocator::allocate_port()?;
    let addr = SocketAddr::new(ip, port);
    let server = Server::http(addr).map_err(|error| LauncherError::ServerBind {
        addr: addr.to_string(),
        reason: error.to_string(),
    })?;
    let server = Arc::new(server);
    let stopping = Arc::new(AtomicBool::new(false));

    let accept_server = Arc::clone(&server);
    let accept_stopping = Arc::clone(&stopping);
    let accept_root = Arc::new(root);
    let accept_thread = thread::Builder::new()
        .name("asset-server-accept".to_string())
        .spawn(move || run_accept_loop(&accept_server, accept_root, &accept_stopping))
        .map_err(|error| LauncherError::ServerBind {
            addr: addr.to_string(),
            reason: format!("failed to spawn accept thread: {error}"),
        })?;

    Ok(ServerHandle {
        server: Some(server),
        accept_thread: Some(accept_thread),
        stopping,
        addr,
    })
}

fn run_accept_loop(server: &Server, root: Arc<PathBuf>, stopping: &AtomicBool) {
    loop {
        match server.recv() {
            Ok(request) => {
                let root = Arc::clone(&root);
                thread::spawn(move || serve_request(request, &root));
            }
            Err(_) if stopping.load(Ordering::SeqCst) => break,
            Err(_) => continue,
        }
    }
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn with_header(response: ResponseBox, name: &str, value: &str) -> ResponseBox {
    match header(name, value) {
        Some(header) => response.with_header(header),
        None => response,
    }
}

fn text_response(status: u16, body: &str) -> ResponseBox {
    let response = Response::new(
        StatusCode(status),
        Vec::new(),
        Cursor::new(body.as_bytes().to_vec()),
        Some(body.len()),
        None,
    )
    .boxed();
    with_header(response, "Content-Type", "text/plain; charset=utf-8")
}

fn html_response(body: String) -> ResponseBox {
    let length = body.len();
    let response = Response::new(
        StatusCode(200),
        Vec::new(),
        Cursor::new(body.into_bytes()),
        Some(length),
        None,
    )
    .boxed();
    with_header(response, "Content-Type", "text/html; charset=utf-8")
}

fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

fn not_modified_since(request: &Request, modified: SystemTime) -> bool {
    let Some(raw) = request
        .headers()
        .iter()
        .find(|header| header.field.equiv("If-Modified-Since"))
        .map(|header| header.value.as_str().to_string())
    else {
        return false;
    };
    let Ok(since) = DateTime::parse_from_rfc2822(raw.trim()) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

fn serve_request(request: Request, root: &Path) {
    let response = build_response(&request, root);
    // The client may have gone away; nothing useful to do about it.
    let _ = request.respond(response);
}

fn build_response(request: &Request, root: &Path) -> ResponseBox {
    if !matches!(request.method(), Method::Get | Method::Head) {
        return text_response(501, "Unsupported method");
    }

    let mapped = match request_path::map_request_path(root, request.url()) {
        Ok(mapped) => mapped,
        Err(RequestPathError::Traversal) => return text_response(403, "Forbidden"),
        Err(RequestPathError::Malformed) => return text_response(400, "Bad request path"),
    };

    let Ok(metadata) = fs::metadata(&mapped.fs_path) else {
        return text_response(404, "File not found");
    };

    let file_path = if metadata.is_dir() {
        if !mapped.trailing_slash {
            let location = match request.url().split_once('?') {
                Some((_, query)) => format!("{}/?{}", mapped.url_path, query),
                None => format!("{}/", mapped.url_path),
            };
            return with_header(text_response(301, "Moved Permanently"), "Location", &location);
        }
        match INDEX_FILES
            .iter()
            .map(|name| mapped.fs_path.join(name))
            .find(|candidate| candidate.is_file())
        {
            Some(index) => index,
            None => return directory_listing(&mapped.fs_path, &mapped.url_path, root),
        }
    } else if mapped.trailing_slash {
        return text_response(404, "File not found");
    } else {
        mapped.fs_path
    };

    let Ok(canonical) = file_path.canonicalize() else {
        return text_response(404, "File not found");
    };
    if !canonical.starts_with(root) {
        return text_response(403, "Forbidden");
    }

    serve_file(request, &canonical)
}

fn serve_file(request: &Request, path: &Path) -> ResponseBox {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(_) => return text_response(404, "File not found"),
    };
    let modified = file.metadata().and_then(|metadata| metadata.modified()).ok();

    if let Some(modified) = modified {
        if not_modified_since(request, modified) {
            return Response::empty(StatusCode(304)).boxed();
        }
    }

    let mut response = Response::from_file(file).boxed();
    response = with_header(response, "Content-Type", &mime_types::content_type_for_path(path));
    if let Some(modified) = modified {
        response = with_header(response, "Last-Modified", &format_http_date(modified));
    }
    response
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn encode_path_segment(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

fn directory_listing(dir: &Path, url_path: &str, root: &Path) -> ResponseBox {
    match dir.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => {}
        _ => return text_response(403, "Forbidden"),
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return text_response(404, "No permission to list directory");
    };

    let mut names: Vec<(String, bool)> = entries
        .filter_map(Result::ok)
        .map(|entry| {
            let is_dir = entry.file_type().map(|kind| kind.is_dir()).unwrap_or(false);
            (entry.file_name().to_string_lossy().to_string(), is_dir)
        })
        .collect();
    names.sort_by_key(|(name, _)| name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(url_path));
    let mut body = format!(
        "<!DOCTYPE HTML>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n<h1>{title}</h1>\n<hr>\n<ul>\n"
    );
    for (name, is_dir) in names {
        let suffix = if is_dir { "/" } else { "" };
        body.push_str(&format!(
            "<li><a href=\"{}{}\">{}{}</a></li>\n",
            encode_path_segment(&name),
            suffix,
            escape_html(&name),
            suffix
        ));
    }
    body.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html_response(body)
}
