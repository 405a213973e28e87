use crate::{
    api::{Endpoints, Response, Transport},
    error::PortalError,
    prelude::*,
};

/// Text the login page shows after rejecting the credentials
/// («Login lub hasło są nieprawidłowe»).
pub const INVALID_CREDENTIALS_MARKER: &str = "Login lub has";

/// Inspects every response of the wrapped transport before anyone else sees it.
///
/// The portal reports bans and rejected credentials with ordinary `200 OK` pages,
/// recognizable only by where the request went. Each redirect hop counts as a response.
pub struct Guarded<T> {
    inner: T,
    login_url: &'static str,
    blocked_url: &'static str,
}

impl<T> Guarded<T> {
    pub const fn new(inner: T, endpoints: &Endpoints) -> Self {
        Self { inner, login_url: endpoints.login, blocked_url: endpoints.blocked }
    }

    fn inspect(&self, response: Response) -> Result<Response> {
        if let Some(url) = response.route().find(|url| same_resource(url, self.blocked_url)) {
            warn!(%url, final_url = %response.url, "went through the blocked page");
            return Err(PortalError::AccessDenied.into());
        }
        if same_resource(&response.url, self.login_url)
            && response.body.contains(INVALID_CREDENTIALS_MARKER)
        {
            return Err(PortalError::AuthenticationFailed.into());
        }
        ensure!(
            response.is_success(),
            "`{}` responded with HTTP {}",
            response.url,
            response.status,
        );
        Ok(response)
    }
}

impl<T: Transport> Transport for Guarded<T> {
    fn get(&self, url: &str) -> Result<Response> {
        self.inspect(self.inner.get(url)?)
    }

    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<Response> {
        self.inspect(self.inner.post_form(url, fields)?)
    }
}

/// Compare the URLs ignoring the query and fragment.
fn same_resource(url: &str, resource: &str) -> bool {
    strip_query(url) == strip_query(resource)
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}
