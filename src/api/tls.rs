//! OpenSSL connector for servers that only pass at a lowered security level.
//!
//! The portal presents a certificate that OpenSSL rejects at its default security level 2,
//! and neither `rustls` nor `native-tls` lets one lower it.

use std::{
    fmt::{Debug, Formatter},
    io::{Read, Write},
};

use openssl::{
    ssl::{HandshakeError, SslConnector, SslMethod, SslStream},
    x509::{X509, X509VerifyResult},
};
use ureq::unversioned::transport::{
    Buffers,
    ConnectionDetails,
    Connector,
    Either,
    LazyBuffers,
    NextTimeout,
    Transport,
    TransportAdapter,
};

use crate::prelude::*;

/// Security level 1 still accepts 1024-bit RSA keys and SHA-1 signatures.
pub const LEGACY_CIPHER_LIST: &str = "DEFAULT@SECLEVEL=1";

/// Wraps the chained transport in OpenSSL TLS for `https` URLs.
#[derive(Clone, Debug)]
pub struct LegacyTlsConnector(SslConnector);

impl LegacyTlsConnector {
    /// Connector trusting the platform roots, at [`LEGACY_CIPHER_LIST`].
    pub fn new() -> Result<Self> {
        Self::with_cipher_list(LEGACY_CIPHER_LIST, &[])
    }

    fn with_cipher_list(cipher_list: &str, extra_roots: &[X509]) -> Result<Self> {
        let mut builder = SslConnector::builder(SslMethod::tls_client())?;
        builder
            .set_cipher_list(cipher_list)
            .with_context(|| format!("failed to set the cipher list `{cipher_list}`"))?;
        for root in extra_roots {
            builder.cert_store_mut().add_cert(root.clone())?;
        }
        Ok(Self(builder.build()))
    }
}

impl<In: Transport> Connector<In> for LegacyTlsConnector {
    type Out = Either<In, LegacyTlsTransport>;

    fn connect(
        &self,
        details: &ConnectionDetails,
        chained: Option<In>,
    ) -> Result<Option<Self::Out>, ureq::Error> {
        let Some(transport) = chained else {
            return Err(ureq::Error::ConnectionFailed);
        };
        if !details.needs_tls() || transport.is_tls() {
            return Ok(Some(Either::A(transport)));
        }
        let host = details.uri.host().ok_or_else(|| ureq::Error::BadUri(details.uri.to_string()))?;

        let mut adapter = TransportAdapter::new(transport.boxed());
        adapter.set_timeout(details.timeout);
        let stream = self.0.connect(host, adapter).map_err(handshake_error)?;
        debug!(host, version = stream.ssl().version_str(), "handshake completed");

        let buffers = LazyBuffers::new(
            details.config.input_buffer_size(),
            details.config.output_buffer_size(),
        );
        Ok(Some(Either::B(LegacyTlsTransport { buffers, stream })))
    }
}

fn handshake_error<S>(error: HandshakeError<S>) -> ureq::Error {
    match error {
        HandshakeError::SetupFailure(error) => ureq::Error::Other(Box::new(error)),
        HandshakeError::Failure(stream) | HandshakeError::WouldBlock(stream) => {
            let verify_result = stream.ssl().verify_result();
            let error = stream.into_error();
            if verify_result == X509VerifyResult::OK {
                ureq::Error::Other(Box::new(error))
            } else {
                ureq::Error::Other(format!("{error} ({verify_result})").into())
            }
        }
    }
}

pub struct LegacyTlsTransport {
    buffers: LazyBuffers,
    stream: SslStream<TransportAdapter>,
}

impl Debug for LegacyTlsTransport {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("LegacyTlsTransport").finish_non_exhaustive()
    }
}

impl Transport for LegacyTlsTransport {
    fn buffers(&mut self) -> &mut dyn Buffers {
        &mut self.buffers
    }

    fn transmit_output(&mut self, amount: usize, timeout: NextTimeout) -> Result<(), ureq::Error> {
        self.stream.get_mut().set_timeout(timeout);
        self.stream.write_all(&self.buffers.output()[..amount])?;
        Ok(())
    }

    fn await_input(&mut self, timeout: NextTimeout) -> Result<bool, ureq::Error> {
        self.stream.get_mut().set_timeout(timeout);
        let amount = self.stream.read(self.buffers.input_append_buf())?;
        self.buffers.input_appended(amount);
        Ok(amount > 0)
    }

    fn is_open(&mut self) -> bool {
        self.stream.get_mut().get_mut().is_open()
    }

    fn is_tls(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use std::{
        net::{SocketAddr, TcpListener},
        thread,
        time::Duration,
    };

    use openssl::{
        asn1::Asn1Time,
        bn::BigNum,
        hash::MessageDigest,
        pkey::{PKey, Private},
        rsa::Rsa,
        ssl::SslAcceptor,
        x509::{X509Builder, X509NameBuilder, extension::SubjectAlternativeName},
    };

    use super::*;
    use crate::api::{Http, Transport as _};

    /// Self-signed certificate for `127.0.0.1` with a 1024-bit RSA key.
    fn weak_certificate() -> Result<(X509, PKey<Private>)> {
        let key = PKey::from_rsa(Rsa::generate(1024)?)?;

        let mut name = X509NameBuilder::new()?;
        name.append_entry_by_text("CN", "127.0.0.1")?;
        let name = name.build();

        let mut builder = X509Builder::new()?;
        builder.set_version(2)?;
        let serial = BigNum::from_u32(1)?.to_asn1_integer()?;
        builder.set_serial_number(&serial)?;
        builder.set_subject_name(&name)?;
        builder.set_issuer_name(&name)?;
        builder.set_pubkey(&key)?;
        let not_before = Asn1Time::days_from_now(0)?;
        let not_after = Asn1Time::days_from_now(1)?;
        builder.set_not_before(&not_before)?;
        builder.set_not_after(&not_after)?;
        let alt_name =
            SubjectAlternativeName::new().ip("127.0.0.1").build(&builder.x509v3_context(None, None))?;
        builder.append_extension(alt_name)?;
        builder.sign(&key, MessageDigest::sha256())?;
        Ok((builder.build(), key))
    }

    /// Serve a single HTTPS connection with the weak certificate.
    fn serve_once(certificate: &X509, key: &PKey<Private>) -> Result<(SocketAddr, thread::JoinHandle<()>)> {
        let mut acceptor = SslAcceptor::mozilla_intermediate_v5(SslMethod::tls_server())?;
        acceptor.set_cipher_list("DEFAULT@SECLEVEL=0")?;
        acceptor.set_private_key(key)?;
        acceptor.set_certificate(certificate)?;
        let acceptor = acceptor.build();

        let listener = TcpListener::bind("127.0.0.1:0")?;
        let address = listener.local_addr()?;
        let handle = thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else { return };
            let Ok(mut stream) = acceptor.accept(stream) else { return };
            let mut head = Vec::new();
            let mut byte = [0; 1];
            while !head.ends_with(b"\r\n\r\n") {
                match stream.read(&mut byte) {
                    Ok(1) => head.push(byte[0]),
                    _ => return,
                }
            }
            let _ = stream.write_all(
                b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
            );
            let _ = stream.shutdown();
        });
        Ok((address, handle))
    }

    fn http(cipher_list: &str, certificate: &X509) -> Result<Http> {
        let connector = LegacyTlsConnector::with_cipher_list(cipher_list, &[certificate.clone()])?;
        Ok(Http::with_legacy_tls(Duration::from_secs(10), connector))
    }

    #[test]
    fn test_legacy_level_accepts_weak_key() -> Result {
        let (certificate, key) = weak_certificate()?;
        let (address, handle) = serve_once(&certificate, &key)?;

        let response = http(LEGACY_CIPHER_LIST, &certificate)?.get(&format!("https://{address}/"))?;
        assert!(response.is_success());
        assert_eq!(response.body, "ok");

        handle.join().map_err(|_| anyhow!("the server has panicked"))?;
        Ok(())
    }

    #[test]
    fn test_default_level_rejects_weak_key() -> Result {
        let (certificate, key) = weak_certificate()?;
        let (address, _) = serve_once(&certificate, &key)?;

        let error = http("DEFAULT@SECLEVEL=2", &certificate)?
            .get(&format!("https://{address}/"))
            .unwrap_err();
        assert!(format!("{error:#}").contains("too weak"), "{error:#}");
        Ok(())
    }
}
