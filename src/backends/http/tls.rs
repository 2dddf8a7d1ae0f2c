// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Client TLS context for the proxied HTTP transport.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use pkcs8::der::Document;
use pkcs8::EncryptedPrivateKeyInfo;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, Error as TlsError, RootCertStore, SignatureScheme};

use crate::backends::http::options::HttpOptions;

const ENCRYPTED_KEY_LABEL: &str = "ENCRYPTED PRIVATE KEY";

#[derive(Debug)]
struct AcceptAllServerCertVerifier;

impl ServerCertVerifier for AcceptAllServerCertVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, TlsError> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, TlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        rustls::crypto::aws_lc_rs::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// The TLS configuration for `options`, or `None` when the transport's
/// default (bundled web roots, full verification, no client certificate) applies.
pub fn client_config(options: &HttpOptions) -> anyhow::Result<Option<Arc<ClientConfig>>> {
    if !options.ssl_enabled && options.verify {
        return Ok(None);
    }

    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let builder = ClientConfig::builder();
    let builder = if options.verify {
        builder.with_root_certificates(root_store(options.ca_cert.as_deref())?)
    } else {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAllServerCertVerifier))
    };

    let config = match (&options.cert, &options.key) {
        (Some(cert), Some(key)) => builder
            .with_client_auth_cert(
                load_certs(cert)?,
                load_private_key(key, options.key_password.as_deref())?,
            )
            .context("client certificate and key do not form a usable identity")?,
        _ => builder.with_no_client_auth(),
    };

    Ok(Some(Arc::new(config)))
}

/// Roots from the CA bundle when given, otherwise the bundled web PKI roots.
fn root_store(ca_cert: Option<&Path>) -> anyhow::Result<RootCertStore> {
    match ca_cert {
        None => Ok(RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect(),
        }),
        Some(path) => {
            let mut roots = RootCertStore::empty();
            let (added, _) = roots.add_parsable_certificates(load_certs(path)?);
            if added == 0 {
                bail!("CA bundle {} contains no parsable certificates", path.display());
            }
            Ok(roots)
        }
    }
}

fn load_certs(path: &Path) -> anyhow::Result<Vec<CertificateDer<'static>>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read certificate file {}", path.display()))?;
    let certs = rustls_pemfile::certs(&mut Cursor::new(bytes))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to parse certificate file {}", path.display()))?;
    if certs.is_empty() {
        bail!("certificate file {} contains no certificates", path.display());
    }
    Ok(certs)
}

/// Load a PEM private key. With a password the key must be an encrypted PKCS#8 document.
fn load_private_key(path: &Path, password: Option<&str>) -> anyhow::Result<PrivateKeyDer<'static>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read private key file {}", path.display()))?;

    match password {
        Some(password) => decrypt_private_key(&bytes, password)
            .with_context(|| format!("failed to decrypt private key {}", path.display())),
        None => rustls_pemfile::private_key(&mut Cursor::new(bytes))
            .with_context(|| format!("failed to parse private key file {}", path.display()))?
            .ok_or_else(|| anyhow!("private key file {} contains no key", path.display())),
    }
}

fn decrypt_private_key(pem: &[u8], password: &str) -> anyhow::Result<PrivateKeyDer<'static>> {
    let pem = std::str::from_utf8(pem).context("key file is not PEM text")?;
    let (label, document) = Document::from_pem(pem).map_err(|e| anyhow!("{}", e))?;
    if label != ENCRYPTED_KEY_LABEL {
        bail!("expected an {} block, found {}", ENCRYPTED_KEY_LABEL, label);
    }

    let encrypted =
        EncryptedPrivateKeyInfo::try_from(document.as_bytes()).map_err(|e| anyhow!("{}", e))?;
    let decrypted = encrypted
        .decrypt(password)
        .map_err(|e| anyhow!("wrong password or unsupported cipher: {}", e))?;

    Ok(PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(
        decrypted.as_bytes().to_vec(),
    )))
}
