//! Fetching response bodies

use std::borrow::Cow;

use tracing::{debug, warn};
use url::Url;

use crate::error::TransportError;

/// Source of raw response bodies.
///
/// One call is one attempt; implementations do not retry.
pub trait Transport {
    fn fetch(&self, url: &Url) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn fetch(&self, url: &Url) -> Result<String, TransportError> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP GET
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &Url) -> Result<String, TransportError> {
        let shown = redact(url).into_owned();
        debug!(url = %shown, "sending request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| TransportError::Request {
                url: shown.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %shown, status = status.as_u16(), "request failed");
            return Err(TransportError::Status {
                url: shown,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|source| TransportError::Request {
                url: shown.clone(),
                source,
            })?;
        debug!(url = %shown, bytes = body.len(), "received response");
        Ok(body)
    }
}

/// The URL with the service id masked, for logs and error messages
pub fn redact(url: &Url) -> Cow<'_, str> {
    if !url.query_pairs().any(|(name, _)| name == "zws-id") {
        return Cow::Borrowed(url.as_str());
    }

    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "zws-id" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    Cow::Owned(masked.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answers a single request with `response`, returning the service URL
    fn serve_once(response: &'static str) -> std::io::Result<(Url, JoinHandle<()>)> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let handle = thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).is_ok_and(|n| n > 0) && line != "\r\n" {
                line.clear();
            }
            let _ = reader.get_mut().write_all(response.as_bytes());
        });
        let url = format!("http://{addr}/GetZestimate.htm?zws-id=X1-secret&zpid=1");
        let url = Url::parse(&url).map_err(std::io::Error::other)?;
        Ok((url, handle))
    }

    #[test]
    fn test_http_success_returns_body() -> Result<(), Box<dyn std::error::Error>> {
        let (url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: 4\r\nConnection: close\r\n\r\n<r/>",
        )?;
        let body = HttpTransport::new("rillow-test")?.fetch(&url)?;
        assert_eq!(body, "<r/>");
        assert!(server.join().is_ok());
        Ok(())
    }

    #[test]
    fn test_http_error_status() -> Result<(), Box<dyn std::error::Error>> {
        let (url, server) = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )?;
        let result = HttpTransport::new("rillow-test")?.fetch(&url);
        assert!(server.join().is_ok());

        assert!(matches!(
            &result,
            Err(TransportError::Status { url, status: 500 })
                if url.contains("zws-id=***") && !url.contains("X1-secret")
        ));
        Ok(())
    }

    #[test]
    fn test_connection_refused() -> Result<(), Box<dyn std::error::Error>> {
        let addr = TcpListener::bind("127.0.0.1:0")?.local_addr()?;
        let url = Url::parse(&format!("http://{addr}/GetRateSummary.htm?zws-id=X1-secret"))?;

        let result = HttpTransport::new("rillow-test")?.fetch(&url);
        assert!(matches!(
            &result,
            Err(TransportError::Request { url, .. }) if !url.contains("X1-secret")
        ));
        Ok(())
    }

    #[test]
    fn test_redact_masks_service_id() -> Result<(), url::ParseError> {
        let url = Url::parse("http://example.com/GetZestimate.htm?zws-id=X1-secret&zpid=1")?;
        let shown = redact(&url);
        assert_eq!(shown, "http://example.com/GetZestimate.htm?zws-id=***&zpid=1");
        assert!(!shown.contains("X1-secret"));
        Ok(())
    }

    #[test]
    fn test_redact_leaves_other_urls_alone() -> Result<(), url::ParseError> {
        let url = Url::parse("http://example.com/chart.png?w=300")?;
        assert!(matches!(redact(&url), Cow::Borrowed(_)));
        Ok(())
    }

    #[test]
    fn test_borrowed_transport_delegates() -> Result<(), Box<dyn std::error::Error>> {
        struct Fixed;
        impl Transport for Fixed {
            fn fetch(&self, _url: &Url) -> Result<String, TransportError> {
                Ok("<r/>".to_string())
            }
        }

        let fixed = Fixed;
        let borrowed: &dyn Transport = &fixed;
        let url = Url::parse("http://example.com/")?;
        assert_eq!((&borrowed).fetch(&url)?, "<r/>");
        Ok(())
    }
}
