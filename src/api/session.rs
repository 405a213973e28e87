use crate::{
    api::{Endpoints, Response, Transport, guard::Guarded},
    prelude::*,
};

#[derive(Clone, derive_more::Debug)]
pub struct Credentials {
    pub username: String,

    #[debug(skip)]
    pub password: String,
}

/// Authenticated channel to the portal.
///
/// Every response passing through the session is inspected for bans and rejected credentials,
/// so that callers never have to look into the response bodies themselves.
pub struct Session<T> {
    channel: Guarded<T>,
    endpoints: Endpoints,
}

impl<T: Transport> Session<T> {
    /// Open the login page for the session cookies, then submit the credentials.
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub fn authenticate(
        transport: T,
        endpoints: Endpoints,
        credentials: &Credentials,
    ) -> Result<Self> {
        let channel = Guarded::new(transport, &endpoints);
        debug!("opening the login page…");
        let _ = channel.get(endpoints.login).context("failed to open the login page")?;
        info!("logging in…");
        let response = channel
            .post_form(
                endpoints.login,
                &[
                    ("username", credentials.username.as_str()),
                    ("password", credentials.password.as_str()),
                    ("service", endpoints.service),
                ],
            )
            .context("failed to log in")?;
        info!(landed_on = %response.url, "logged in");
        Ok(Self { channel, endpoints })
    }

    /// Switch to another metering point of the account.
    #[instrument(skip_all, fields(site = site))]
    pub fn select_site(&self, site: &str) -> Result {
        let _ = self
            .channel
            .post_form(self.endpoints.site_selection, &[("site[client]", site)])
            .context("failed to select the site")?;
        info!("selected");
        Ok(())
    }

    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

impl<T: Transport> Transport for Session<T> {
    fn get(&self, url: &str) -> Result<Response> {
        self.channel.get(url)
    }

    fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<Response> {
        self.channel.post_form(url, fields)
    }
}
