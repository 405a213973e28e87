pub mod chart;
pub mod endpoints;
pub mod export;
pub mod guard;
#[cfg(test)]
pub mod scripted;
pub mod session;
pub mod source;
pub mod tls;
pub mod transport;

pub use self::{
    endpoints::Endpoints,
    session::{Credentials, Session},
    source::{Source, SourceKind},
    transport::{Http, Response, TlsPolicy, Transport},
};
