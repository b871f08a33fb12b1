// crates/geomerge-core/src/facts/fetch.rs
#![cfg(feature = "fetch")]

use super::{build_fact_cache, decode_countries, write_fact_cache, CountriesRaw, FactCache};
use crate::error::{GeoMergeError, Result};
use reqwest::blocking::Client;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// REST Countries v3.1, restricted to the fields the cache reads
/// (the endpoint accepts at most ten).
pub const DEFAULT_FACTS_URL: &str = "https://restcountries.com/v3.1/all?fields=name,cca3,capital,capitalInfo,latlng,region,population,area,currencies,languages";

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FACTS_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("geomerge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// One-shot blocking client for the country dataset.
pub struct FactsFetcher {
    client: Client,
    url: String,
}

impl FactsFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeoMergeError::RemoteFetchFailed(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Performs the single GET and decodes the whole body.
    ///
    /// Transport errors, timeouts, non-2xx statuses and undecodable bodies
    /// all fail the call; there is no retry.
    pub fn fetch(&self) -> Result<CountriesRaw> {
        info!(url = %self.url, "fetching country dataset");
        let failed = |e: reqwest::Error| GeoMergeError::RemoteFetchFailed(e.to_string());

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(failed)?
            .error_for_status()
            .map_err(failed)?;
        let body = response.bytes().map_err(failed)?;

        let items = decode_countries(&body)?;
        info!(countries = items.len(), "decoded country dataset");
        Ok(items)
    }
}

/// Fetch, derive and write the capitals/facts cache in one pass.
///
/// The output file is only touched after the full response has been
/// decoded and every entry derived.
pub fn generate_capitals_facts(config: &FetchConfig, out_path: impl AsRef<Path>) -> Result<FactCache> {
    let items = FactsFetcher::new(config)?.fetch()?;
    let cache = build_fact_cache(&items);
    write_fact_cache(out_path, &cache)?;
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    /// Serves exactly one canned HTTP response on a loopback port and
    /// returns the URL to request.
    fn serve_once(status: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(response.as_bytes());
        });
        format!("http://{addr}/v3.1/all")
    }

    fn local_config(url: String) -> FetchConfig {
        FetchConfig {
            url,
            timeout: Duration::from_secs(5),
            ..FetchConfig::default()
        }
    }

    #[test]
    fn default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.url.starts_with("https://restcountries.com/v3.1/all"));
        assert!(config.user_agent.starts_with("geomerge/"));
    }

    #[test]
    fn unreachable_host_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("capitals_facts.json");
        let config = FetchConfig {
            // Port 9 on loopback: nothing listens there in CI sandboxes.
            url: "http://127.0.0.1:9/v3.1/all".to_string(),
            timeout: Duration::from_secs(2),
            ..FetchConfig::default()
        };

        let err = generate_capitals_facts(&config, &out).unwrap_err();

        assert!(matches!(err, GeoMergeError::RemoteFetchFailed(_)));
        assert!(!out.exists());
    }

    #[test]
    fn server_error_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("capitals_facts.json");
        let config = local_config(serve_once("500 Internal Server Error", r#"{"message":"boom"}"#));

        let err = generate_capitals_facts(&config, &out).unwrap_err();

        assert!(matches!(err, GeoMergeError::RemoteFetchFailed(_)));
        assert!(!out.exists());
    }

    #[test]
    fn non_json_body_fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("capitals_facts.json");
        let config = local_config(serve_once("200 OK", "<html>maintenance</html>"));

        let err = generate_capitals_facts(&config, &out).unwrap_err();

        assert!(matches!(err, GeoMergeError::RemoteFetchFailed(_)));
        assert!(!out.exists());
    }

    #[test]
    fn successful_fetch_writes_cache() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("capitals_facts.json");
        let body = r#"[{"name":{"common":"Peru"},"capital":["Lima"],"region":"Americas"}]"#;
        let config = local_config(serve_once("200 OK", body));

        let cache = generate_capitals_facts(&config, &out).unwrap();

        assert_eq!(cache["peru"].capital_name, "Lima");
        assert_eq!(cache["peru"].fact, "Region: Americas");
        assert!(out.exists());
    }
}
