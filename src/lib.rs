//! openssh-cert
//!
//! this library decodes OpenSSH certificates — both their one-line textual
//! envelope and the RFC-4251 binary wire format inside it — into typed,
//! zero-copy in-memory views. it covers RSA, DSA, ECDSA (nistp256/384/521),
//! and Ed25519 certificates, including their critical options and
//! extensions substructures.
//!
//! openssh-cert does not do any cryptography itself: no signature
//! verification, no hashing, no key agreement. `Certificate::encoded_sig_size`
//! hands back exactly the byte range a signature verifier needs; what it
//! does with `signature_key`/`signature` is the caller's business. it also
//! doesn't generate or re-serialize certificates — this is a one-way
//! reader.
#![allow(unused_doc_comment)]

#[macro_use]
extern crate error_chain;

pub mod certificate;
pub mod envelope;
pub mod errors;
pub mod magic;
pub mod options;
pub mod principals;
pub mod reader;

pub use certificate::{
    Certificate, CertKind, DsaCertificate, EcdsaCertificate, Ed25519Certificate, RsaCertificate,
    Tail,
};
pub use errors::*;
pub use magic::{Magic, Schema};
pub use options::{CriticalOption, CriticalOptionsIter};
pub use principals::{Principals, PrincipalsIter};

/// an owned, decoded OpenSSH certificate envelope.
///
/// `Document` is the ergonomic front door: [`Document::from_openssh`] peels
/// off the textual envelope and holds the decoded binary blob, and
/// [`Document::certificate`] runs the field parser over it on demand. it
/// never hands back a `Certificate` with a lifetime tied to the `&str` you
/// passed in — only to the blob `Document` itself owns — so it stays a
/// plain, non-self-referential struct.
///
/// re-parsing on every `certificate()` call is cheap: the field parser does
/// a single allocation-free pass over the blob (spec §4.6), so there's
/// nothing to cache.
pub struct Document {
    magic: String,
    blob: Vec<u8>,
    comment: Option<String>,
}

impl Document {
    /// decodes the textual envelope `<magic> <base64-blob> [comment]`.
    pub fn from_openssh(text: &str) -> Result<Self> {
        let env = envelope::decode(text)?;
        Ok(Document {
            magic: env.magic.to_string(),
            blob: env.blob,
            comment: env.comment.map(|c| c.to_string()),
        })
    }

    /// runs the field parser over the decoded blob and checks that the
    /// binary magic agrees with the envelope's textual magic (spec §4.3);
    /// a mismatch is `MalformedCertificate`.
    pub fn certificate(&self) -> Result<Certificate<'_>> {
        let cert = certificate::parse(&self.blob)?;
        if cert.magic().as_str() != self.magic {
            return Err(ErrorKind::MalformedCertificate.into());
        }
        Ok(cert)
    }

    /// the decoded binary blob, before any field parsing.
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// the envelope's trailing comment, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}
