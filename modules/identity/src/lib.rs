//! Client identity (UUID) resolution.
//!
//! Sources are tried strictly in order. Each attempt either resolves or names the reason
//! to move on; the chain fails only when every source has moved on.

use cfsub_core::{Error, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_URL: &str =
    "https://raw.githubusercontent.com/RescueNet/TelegramFreeServer/main/others/cloudflare/advanced/uuid";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_FALLBACK_FILE: &str = "../output/rescuenet/others/cloudflare/advanced/uuid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Value given on the command line, used verbatim.
    Explicit(String),
    /// One GET; the first line of a 2xx body must look like a UUID.
    Remote { url: String, timeout: Duration },
    /// First line of a local file.
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Resolved(String),
    Next(String),
}

impl Source {
    pub fn attempt(&self) -> Attempt {
        match self {
            Source::Explicit(v) if v.is_empty() => Attempt::Next("no explicit uuid".into()),
            Source::Explicit(v) => Attempt::Resolved(v.clone()),
            Source::Remote { url, timeout } => fetch_remote(url, *timeout),
            Source::File(path) => match fs::read_to_string(path) {
                Ok(text) => match first_line(&text) {
                    Some(line) => Attempt::Resolved(line.to_string()),
                    None => Attempt::Next(format!("{} is empty", path.display())),
                },
                Err(e) => Attempt::Next(format!("{}: {e}", path.display())),
            },
        }
    }

    fn label(&self) -> String {
        match self {
            Source::Explicit(_) => "flag".into(),
            Source::Remote { url, .. } => url.clone(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

/// The chain cfsub uses: flag, then remote, then the local file.
pub fn default_chain(explicit: Option<&str>, url: &str, timeout: Duration, fallback: PathBuf) -> Vec<Source> {
    let mut chain = Vec::with_capacity(3);
    if let Some(v) = explicit { chain.push(Source::Explicit(v.to_string())); }
    chain.push(Source::Remote { url: url.to_string(), timeout });
    chain.push(Source::File(fallback));
    chain
}

/// Try each source in order and return the first resolved identity.
pub fn resolve(sources: &[Source]) -> Result<String> {
    let mut reasons = Vec::new();
    for source in sources {
        match source.attempt() {
            Attempt::Resolved(id) => {
                info!(source = %source.label(), "resolved client identity");
                return Ok(id);
            }
            Attempt::Next(reason) => {
                warn!(source = %source.label(), %reason, "identity source skipped");
                reasons.push(reason);
            }
        }
    }
    Err(Error::IdentityUnavailable(reasons.join("; ")))
}

fn first_line(text: &str) -> Option<&str> {
    text.lines().next().map(str::trim).filter(|l| !l.is_empty())
}

#[cfg(feature = "remote")]
fn fetch_remote(url: &str, timeout: Duration) -> Attempt {
    // direct connection: the proxy this tool configures is usually not running yet
    let client = match reqwest::blocking::Client::builder().timeout(timeout).no_proxy().build() {
        Ok(c) => c,
        Err(e) => return Attempt::Next(format!("http client: {e}")),
    };
    let resp = match client.get(url).send() {
        Ok(r) => r,
        Err(e) => return Attempt::Next(format!("request failed: {e}")),
    };
    if !resp.status().is_success() {
        return Attempt::Next(format!("status {}", resp.status()));
    }
    let body = match resp.text() {
        Ok(b) => b,
        Err(e) => return Attempt::Next(format!("body: {e}")),
    };
    match first_line(&body) {
        Some(line) if uuid::Uuid::parse_str(line).is_ok() => Attempt::Resolved(line.to_string()),
        Some(line) => Attempt::Next(format!("response is not a uuid: {line:?}")),
        None => Attempt::Next("empty response".into()),
    }
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(url: &str, _timeout: Duration) -> Attempt {
    Attempt::Next(format!("remote lookup disabled, skipping {url}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "4ea68717-bd05-486c-a177-247400d35c18";

    #[test]
    fn explicit_value_wins() {
        let chain = default_chain(Some("anything"), "http://127.0.0.1:1/", DEFAULT_TIMEOUT, "/nonexistent".into());
        assert_eq!(resolve(&chain).unwrap(), "anything");
    }

    #[test]
    fn empty_explicit_moves_on() {
        assert!(matches!(Source::Explicit(String::new()).attempt(), Attempt::Next(_)));
    }

    #[test]
    fn file_fallback_strips_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uuid");
        fs::write(&path, format!("{ID}\nsecond line\n")).unwrap();
        assert_eq!(Source::File(path).attempt(), Attempt::Resolved(ID.to_string()));
    }

    #[test]
    fn unreachable_remote_falls_back_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uuid");
        fs::write(&path, format!("{ID}\r\n")).unwrap();
        let chain = default_chain(None, "http://127.0.0.1:1/uuid", Duration::from_millis(500), path);
        assert_eq!(resolve(&chain).unwrap(), ID);
    }

    #[test]
    fn every_source_failing_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let chain = default_chain(None, "http://127.0.0.1:1/uuid", Duration::from_millis(500), dir.path().join("missing"));
        let err = resolve(&chain).unwrap_err();
        assert!(matches!(err, Error::IdentityUnavailable(_)));
    }

    #[cfg(feature = "remote")]
    mod remote {
        use super::*;
        use std::io::{Read, Write};
        use std::net::TcpListener;
        use std::thread;

        /// Serve one canned HTTP response and return the URL to reach it.
        fn serve_once(status: &'static str, body: &'static str) -> String {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            thread::spawn(move || {
                if let Ok((mut stream, _)) = listener.accept() {
                    let mut buf = [0u8; 4096];
                    let _ = stream.read(&mut buf);
                    let resp = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(resp.as_bytes());
                }
            });
            format!("http://{addr}/uuid")
        }

        #[test]
        fn remote_body_resolves() {
            let url = serve_once("200 OK", "4ea68717-bd05-486c-a177-247400d35c18\n");
            let chain = default_chain(None, &url, DEFAULT_TIMEOUT, "/nonexistent".into());
            assert_eq!(resolve(&chain).unwrap(), ID);
        }

        #[test]
        fn non_success_status_falls_back() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("uuid");
            fs::write(&path, "from-file\n").unwrap();
            let url = serve_once("500 Internal Server Error", "4ea68717-bd05-486c-a177-247400d35c18\n");
            let chain = default_chain(None, &url, DEFAULT_TIMEOUT, path);
            assert_eq!(resolve(&chain).unwrap(), "from-file");
        }

        #[test]
        fn non_uuid_body_falls_back() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("uuid");
            fs::write(&path, "from-file\n").unwrap();
            let url = serve_once("200 OK", "<html>rate limited</html>\n");
            let chain = default_chain(None, &url, DEFAULT_TIMEOUT, path);
            assert_eq!(resolve(&chain).unwrap(), "from-file");
        }

        #[test]
        fn slow_remote_times_out() {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let url = format!("http://{}/uuid", listener.local_addr().unwrap());
            let hold = thread::spawn(move || {
                let conn = listener.accept();
                thread::sleep(Duration::from_millis(800));
                drop(conn);
            });
            let attempt = Source::Remote { url, timeout: Duration::from_millis(200) }.attempt();
            assert!(matches!(attempt, Attempt::Next(_)));
            let _ = hold.join();
        }
    }
}
