use std::time::Duration;

use bon::bon;
use ureq::{
    Agent,
    Body,
    ResponseExt,
    config::Config,
    tls::{TlsConfig, TlsProvider},
    unversioned::{
        resolver::DefaultResolver,
        transport::{Connector, TcpConnector},
    },
};

use crate::{api::tls::LegacyTlsConnector, prelude::*};

/// Plain HTTP exchange with the portal.
///
/// Implementations return every response as is, including error statuses:
/// deciding what a response means is up to [`crate::api::guard::Guarded`].
pub trait Transport {
    fn get(&self, url: &str) -> Result<Response>;

    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<Response>;
}

#[must_use]
#[derive(Clone, Debug)]
pub struct Response {
    /// Final URL, after following the redirects.
    pub url: String,

    /// URLs the request went through before landing on [`Response::url`], the requested one first.
    pub redirects: Vec<String>,

    pub status: u16,

    pub body: String,
}

impl Response {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self { url: url.into(), redirects: Vec::new(), status, body: body.into() }
    }

    pub fn with_redirects(mut self, redirects: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.redirects = redirects.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Every URL of the exchange, the final one last.
    pub fn route(&self) -> impl Iterator<Item = &str> {
        self.redirects.iter().map(String::as_str).chain([self.url.as_str()])
    }

    fn read(mut response: ureq::http::Response<Body>) -> Result<Self> {
        let url = response.get_uri().to_string();
        let redirects = response
            .get_redirect_history()
            .and_then(<[_]>::split_last)
            .map(|(_, hops)| hops.iter().map(ToString::to_string).collect::<Vec<_>>())
            .unwrap_or_default();
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .with_context(|| format!("failed to read the response from `{url}`"))?;
        debug!(%url, n_redirects = redirects.len(), status, n_bytes = body.len(), "received");
        Ok(Self::new(url, status, body).with_redirects(redirects))
    }
}

/// TLS stack to talk to the portal with.
#[derive(Copy, Clone, Debug, Default, clap::ValueEnum)]
pub enum TlsPolicy {
    /// OpenSSL at the security level 1, which the portal's certificate requires.
    #[default]
    Legacy,

    /// Rustls with its default cipher suites.
    Modern,
}

/// [`Transport`] over a blocking agent with a cookie store, so the session cookies persist.
pub struct Http(Agent);

#[bon]
impl Http {
    #[builder]
    pub fn new(tls_policy: TlsPolicy, #[builder(into)] timeout: Duration) -> Result<Self> {
        match tls_policy {
            TlsPolicy::Legacy => Ok(Self::with_legacy_tls(timeout, LegacyTlsConnector::new()?)),
            TlsPolicy::Modern => Ok(Self(Agent::new_with_config(Self::config(timeout)))),
        }
    }
}

impl Http {
    /// Plain TCP, wrapped into the OpenSSL connector for `https`.
    pub(super) fn with_legacy_tls(timeout: Duration, tls: LegacyTlsConnector) -> Self {
        let connector = ().chain(TcpConnector::default()).chain(tls);
        Self(Agent::with_parts(Self::config(timeout), connector, DefaultResolver::default()))
    }

    fn config(timeout: Duration) -> Config {
        Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .save_redirect_history(true)
            .tls_config(TlsConfig::builder().provider(TlsProvider::Rustls).build())
            .build()
    }
}

impl Transport for Http {
    #[instrument(skip_all, level = Level::DEBUG, fields(url = url))]
    fn get(&self, url: &str) -> Result<Response> {
        let response = self.0.get(url).call().with_context(|| format!("failed to call `{url}`"))?;
        Response::read(response)
    }

    #[instrument(skip_all, level = Level::DEBUG, fields(url = url))]
    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<Response> {
        let response = self
            .0
            .post(url)
            .send_form(fields.iter().copied())
            .with_context(|| format!("failed to submit the form to `{url}`"))?;
        Response::read(response)
    }
}
