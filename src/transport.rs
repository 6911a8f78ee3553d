use std::{fmt, future::Future, time::Duration};

/// HTTP verbs used by the PhotoApp service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
        })
    }
}

/// A single request description. Only PUT and POST carry a JSON body.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn put(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            body: Some(body),
        }
    }

    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body),
        }
    }
}

/// Status code and unparsed body of one HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failure below HTTP: no status code was received.
#[derive(Debug)]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync>);

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl TransportError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Sends exactly one request and reports what came back.
///
/// Implementations must not retry; that is the job of
/// [`resilient_call`](crate::retry::resilient_call).
pub trait Transport {
    fn send(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            http: reqwest::Client::new(),
            timeout,
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<RawResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.http.get(&request.url),
            Method::Put => self.http.put(&request.url),
            Method::Post => self.http.post(&request.url),
        };
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}
