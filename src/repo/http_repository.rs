use std::collections::HashMap;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use hyper::{Body, Client, Method, Request, Response, StatusCode, Uri};
use hyper::body::to_bytes;
use hyper::client::HttpConnector;
use hyper::header::{HeaderName, HeaderValue, AUTHORIZATION, LOCATION, USER_AGENT};
use hyper_tls::HttpsConnector;
use tracing::{debug, trace};

use crate::error::ExistsError;
use crate::repo::repository_accessor::RepositoryAccessor;

//TODO Maven Central returns a 403 without a user agent - which one to use?
const USER_AGENT_VALUE: &str = "curl/7.68.0";

const MAX_REDIRECTS: usize = 5;

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Accesses a remote repository over HTTP(S) relative to a fixed base URI: HEAD requests for
///  existence checks, GET requests for content.
pub struct HttpRepository {
    client: Client<HttpsConnector<HttpConnector>>,
    base_uri: String, // without trailing '/'
    headers: Vec<(HeaderName, HeaderValue)>,
}
impl HttpRepository {
    pub fn new(base_uri: &str, credentials: Option<&Credentials>, headers: &HashMap<String, String>) -> anyhow::Result<HttpRepository> {
        let base_uri = base_uri.trim_end_matches('/').to_string();

        // check that the base URI is valid
        Uri::try_from(format!("{}/", base_uri))?;

        let mut request_headers = vec![(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE))];
        if let Some(credentials) = credentials {
            let token = STANDARD.encode(format!("{}:{}", credentials.username, credentials.password));
            let mut value = HeaderValue::try_from(format!("Basic {}", token))?;
            value.set_sensitive(true);
            request_headers.push((AUTHORIZATION, value));
        }
        for (name, value) in headers {
            request_headers.push((HeaderName::try_from(name.as_str())?, HeaderValue::try_from(value.as_str())?));
        }

        Ok(HttpRepository {
            client: Client::builder()
                .build::<_, Body>(HttpsConnector::new()),
            base_uri,
            headers: request_headers,
        })
    }

    /// Sends a request for `path`, following redirects. Errors name the originally requested
    ///  location.
    async fn request(&self, method: Method, path: &str) -> Result<Response<Body>, ExistsError> {
        let location = self.location(path);
        let original_uri = Uri::try_from(location.clone()).map_err(|e| ExistsError::transport(&location, e))?;

        let mut uri = original_uri.clone();
        for _ in 0..=MAX_REDIRECTS {
            // credentials are for the repository's host only
            let same_host = uri.authority() == original_uri.authority();
            let response = self.send(method.clone(), &uri, same_host)
                .await
                .map_err(|e| ExistsError::transport(&location, e))?;

            let status = response.status();
            if !status.is_redirection() || status == StatusCode::NOT_MODIFIED {
                return Ok(response);
            }

            let target = response.headers().get(LOCATION)
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| ExistsError::transport(&location, anyhow::anyhow!("redirect {} without a Location header", status)))?;
            uri = resolve_redirect(&uri, target).map_err(|e| ExistsError::transport(&location, e))?;
            debug!("{} redirected ({}) to {}", location, status, uri);
        }
        Err(ExistsError::transport(&location, anyhow::anyhow!("more than {} redirects", MAX_REDIRECTS)))
    }

    async fn send(&self, method: Method, uri: &Uri, with_credentials: bool) -> anyhow::Result<Response<Body>> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri.clone());
        for (name, value) in &self.headers {
            if with_credentials || *name != AUTHORIZATION {
                builder = builder.header(name, value.clone());
            }
        }
        let request = builder.body(Body::empty())?;

        trace!("requesting {} {}", request.method(), uri);
        let response = self.client.request(request).await?;
        trace!("{} -> {}", uri, response.status());
        Ok(response)
    }
}

/// Resolves a Location header value, which may be absolute, host-relative or path-relative
fn resolve_redirect(current: &Uri, target: &str) -> anyhow::Result<Uri> {
    if target.starts_with("http://") || target.starts_with("https://") {
        return Ok(Uri::try_from(target)?);
    }

    let scheme = current.scheme_str().unwrap_or("http");
    let authority = current.authority().map(|a| a.as_str()).unwrap_or_default();
    let resolved = if target.starts_with("//") {
        format!("{}:{}", scheme, target)
    }
    else if target.starts_with('/') {
        format!("{}://{}{}", scheme, authority, target)
    }
    else {
        let directory = current.path().rsplit_once('/').map(|(d, _)| d).unwrap_or_default();
        format!("{}://{}{}/{}", scheme, authority, directory, target)
    };
    Ok(Uri::try_from(resolved)?)
}

fn is_not_found(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND || status == StatusCode::GONE
}

#[async_trait]
impl RepositoryAccessor for HttpRepository {
    fn base(&self) -> &str {
        &self.base_uri
    }

    async fn exists(&self, path: &str) -> Result<bool, ExistsError> {
        let response = self.request(Method::HEAD, path).await?;
        let status = response.status();
        if status.is_success() {
            Ok(true)
        }
        else if is_not_found(status) {
            Ok(false)
        }
        else {
            Err(ExistsError::transport(self.location(path), anyhow::anyhow!("unexpected response status {}", status)))
        }
    }

    async fn fetch_bytes(&self, path: &str) -> Result<Bytes, ExistsError> {
        let response = self.request(Method::GET, path).await?;
        let status = response.status();
        if is_not_found(status) {
            return Err(ExistsError::NotFound(self.location(path)));
        }
        if !status.is_success() {
            return Err(ExistsError::transport(self.location(path), anyhow::anyhow!("unexpected response status {}", status)));
        }

        to_bytes(response.into_body())
            .await
            .map_err(|e| ExistsError::transport(self.location(path), e))
    }
}
