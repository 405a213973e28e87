use clap::Parser;
use enumset::EnumSet;

use crate::{
    api::{Credentials, Endpoints, Http, Session, SourceKind, TlsPolicy},
    core::Metric,
    prelude::*,
};

#[derive(Parser)]
pub struct ConnectionArgs {
    /// Portal login.
    #[clap(short = 'u', long, env = "ELICZNIK_USERNAME")]
    username: String,

    #[clap(long, env = "ELICZNIK_PASSWORD", hide_env_values = true)]
    password: String,

    /// Metering point to switch to after logging in, the account's default one is used otherwise.
    #[clap(long, env = "ELICZNIK_SITE")]
    site: Option<String>,

    #[clap(long, env = "ELICZNIK_SOURCE", value_enum, default_value = "export")]
    pub source: SourceKind,

    /// The portal requires OpenSSL at a lowered security level, `modern` is likely to fail the handshake.
    #[clap(long, env = "ELICZNIK_TLS_POLICY", value_enum, default_value = "legacy")]
    tls_policy: TlsPolicy,

    /// Timeout of each request.
    #[clap(long, env = "ELICZNIK_TIMEOUT", default_value = "60s")]
    timeout: humantime::Duration,

    #[clap(
        long,
        env = "ELICZNIK_METRICS",
        value_enum,
        value_delimiter = ',',
        num_args = 1..,
        default_value = "consumption,production,net-consumption,net-production",
    )]
    metrics: Vec<Metric>,
}

impl ConnectionArgs {
    #[must_use]
    pub fn metrics(&self) -> EnumSet<Metric> {
        self.metrics.iter().copied().collect()
    }

    pub fn connect(&self) -> Result<Session<Http>> {
        let transport = Http::builder().tls_policy(self.tls_policy).timeout(self.timeout).build()?;
        let credentials =
            Credentials { username: self.username.clone(), password: self.password.clone() };
        let session = Session::authenticate(transport, Endpoints::default(), &credentials)?;
        if let Some(site) = &self.site {
            session.select_site(site)?;
        }
        Ok(session)
    }
}
