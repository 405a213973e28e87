/// Resources of the provider's portal.
#[derive(Copy, Clone, Debug)]
pub struct Endpoints {
    /// Central login page, also shown again after rejecting the credentials.
    pub login: &'static str,

    /// Where the portal sends a blocked account or address.
    pub blocked: &'static str,

    /// Target service identifier the login form is submitted for.
    pub service: &'static str,

    /// Metering point selection.
    pub site_selection: &'static str,

    /// Per-day JSON chart API.
    pub chart: &'static str,

    /// Date-range CSV export.
    pub export: &'static str,
}

impl Endpoints {
    pub const TAURON: Self = Self {
        login: "https://logowanie.tauron-dystrybucja.pl/login",
        blocked: "https://elicznik.tauron-dystrybucja.pl/blokada",
        service: "https://elicznik.tauron-dystrybucja.pl",
        site_selection: "https://elicznik.tauron-dystrybucja.pl/ustaw_punkt",
        chart: "https://elicznik.tauron-dystrybucja.pl/energia/api",
        export: "https://elicznik.tauron-dystrybucja.pl/energia/do/dane",
    };
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::TAURON
    }
}
