//! the typed, variant-dispatched certificate record.
//!
//! `Certificate` is a tagged union over the four key families OpenSSH
//! certificates come in. every variant shares the same tail fields
//! (serial, validity window, principals, critical options, extensions,
//! signature...); only the head fields between the magic and `serial`
//! differ, per the table in spec §3. rather than one generic, reflective
//! walker, each variant gets its own straight-line parse routine — spec §9
//! explicitly prefers this over compile-time schema reflection for a
//! systems-language port.

use crate::errors::*;
use crate::magic::{Magic, Schema};
use crate::principals::Principals;
use crate::reader::Reader;

/// `cert_kind`: whether a certificate vouches for a user or a host.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CertKind {
    User,
    Host,
}

impl CertKind {
    fn from_u32(v: u32) -> Result<Self> {
        match v {
            1 => Ok(CertKind::User),
            2 => Ok(CertKind::Host),
            _ => Err(ErrorKind::MalformedCertificate.into()),
        }
    }
}

/// the fields every certificate variant shares, from `serial` through
/// `signature` (see spec §3's "Certificate records" table).
#[derive(Clone, Copy, Debug)]
pub struct Tail<'a> {
    pub serial: u64,
    pub kind: CertKind,
    pub key_id: &'a [u8],
    pub valid_principals: Principals<'a>,
    pub valid_after: u64,
    pub valid_before: u64,
    pub critical_options: &'a [u8],
    pub extensions: &'a [u8],
    pub reserved: &'a [u8],
    pub signature_key: &'a [u8],
    pub signature: &'a [u8],
    /// length of the blob prefix that was actually signed — everything
    /// up to (not including) the `signature` field's own length prefix.
    /// callers hand `blob[..encoded_sig_size]` to a signature verifier
    /// together with `signature_key` and `signature`.
    pub encoded_sig_size: usize,
}

/// `ssh-rsa-cert-v01@openssh.com`, `rsa-sha2-256-cert-v01@openssh.com`, and
/// `rsa-sha2-512-cert-v01@openssh.com` all parse to this shape.
#[derive(Clone, Copy, Debug)]
pub struct RsaCertificate<'a> {
    pub magic: Magic,
    pub nonce: &'a [u8],
    pub e: &'a [u8],
    pub n: &'a [u8],
    pub tail: Tail<'a>,
}

#[derive(Clone, Copy, Debug)]
pub struct DsaCertificate<'a> {
    pub magic: Magic,
    pub nonce: &'a [u8],
    pub p: &'a [u8],
    pub q: &'a [u8],
    pub g: &'a [u8],
    pub y: &'a [u8],
    pub tail: Tail<'a>,
}

#[derive(Clone, Copy, Debug)]
pub struct EcdsaCertificate<'a> {
    pub magic: Magic,
    pub nonce: &'a [u8],
    pub curve: &'a [u8],
    pub public_key: &'a [u8],
    pub tail: Tail<'a>,
}

#[derive(Clone, Copy, Debug)]
pub struct Ed25519Certificate<'a> {
    pub magic: Magic,
    pub nonce: &'a [u8],
    pub pk: &'a [u8],
    pub tail: Tail<'a>,
}

/// the public tagged union this crate parses every certificate into.
///
/// every byte-slice field borrows from the blob handed to [`parse`]; the
/// blob must outlive every `Certificate` built from it (see spec §3
/// "Lifecycle").
#[derive(Clone, Copy, Debug)]
pub enum Certificate<'a> {
    Rsa(RsaCertificate<'a>),
    Dsa(DsaCertificate<'a>),
    Ecdsa(EcdsaCertificate<'a>),
    Ed25519(Ed25519Certificate<'a>),
}

impl<'a> Certificate<'a> {
    /// the magic this certificate was parsed under.
    pub fn magic(&self) -> Magic {
        match *self {
            Certificate::Rsa(ref c) => c.magic,
            Certificate::Dsa(ref c) => c.magic,
            Certificate::Ecdsa(ref c) => c.magic,
            Certificate::Ed25519(ref c) => c.magic,
        }
    }

    /// the shared tail fields (serial through signature), regardless of
    /// variant.
    pub fn tail(&self) -> &Tail<'a> {
        match *self {
            Certificate::Rsa(ref c) => &c.tail,
            Certificate::Dsa(ref c) => &c.tail,
            Certificate::Ecdsa(ref c) => &c.tail,
            Certificate::Ed25519(ref c) => &c.tail,
        }
    }

    pub fn serial(&self) -> u64 {
        self.tail().serial
    }

    pub fn kind(&self) -> CertKind {
        self.tail().kind
    }

    pub fn key_id(&self) -> &'a [u8] {
        self.tail().key_id
    }

    pub fn valid_principals(&self) -> Principals<'a> {
        self.tail().valid_principals
    }

    pub fn valid_after(&self) -> u64 {
        self.tail().valid_after
    }

    pub fn valid_before(&self) -> u64 {
        self.tail().valid_before
    }

    pub fn critical_options(&self) -> &'a [u8] {
        self.tail().critical_options
    }

    pub fn extensions(&self) -> &'a [u8] {
        self.tail().extensions
    }

    pub fn reserved(&self) -> &'a [u8] {
        self.tail().reserved
    }

    pub fn signature_key(&self) -> &'a [u8] {
        self.tail().signature_key
    }

    pub fn signature(&self) -> &'a [u8] {
        self.tail().signature
    }

    /// length of the signed prefix of the original blob; pass
    /// `blob[..cert.encoded_sig_size()]` to an external signature
    /// verifier together with `signature_key()` and `signature()`.
    pub fn encoded_sig_size(&self) -> usize {
        self.tail().encoded_sig_size
    }
}

/// parses a binary certificate blob (the bytes you get after base64
/// decoding an OpenSSH certificate's envelope) into a [`Certificate`].
///
/// performs magic dispatch, then runs the field-list routine for that
/// magic's schema. fails fast: on any error, no partial record is ever
/// returned.
pub fn parse(blob: &[u8]) -> Result<Certificate<'_>> {
    let mut reader = Reader::new(blob);
    let magic_bytes = reader.read_string()?;
    let magic = Magic::from_bytes(magic_bytes)?;

    let cert = match magic.schema() {
        Schema::Rsa => Certificate::Rsa(parse_rsa(magic, &mut reader)?),
        Schema::Dsa => Certificate::Dsa(parse_dsa(magic, &mut reader)?),
        Schema::Ecdsa => Certificate::Ecdsa(parse_ecdsa(magic, &mut reader)?),
        Schema::Ed25519 => Certificate::Ed25519(parse_ed25519(magic, &mut reader)?),
    };

    if !reader.is_finished() {
        return Err(ErrorKind::MalformedCertificate.into());
    }

    Ok(cert)
}

fn parse_rsa<'a>(magic: Magic, reader: &mut Reader<'a>) -> Result<RsaCertificate<'a>> {
    let nonce = reader.read_string()?;
    let e = reader.read_mpint()?;
    let n = reader.read_mpint()?;
    let tail = parse_tail(reader)?;
    Ok(RsaCertificate {
        magic,
        nonce,
        e,
        n,
        tail,
    })
}

fn parse_dsa<'a>(magic: Magic, reader: &mut Reader<'a>) -> Result<DsaCertificate<'a>> {
    let nonce = reader.read_string()?;
    let p = reader.read_mpint()?;
    let q = reader.read_mpint()?;
    let g = reader.read_mpint()?;
    let y = reader.read_mpint()?;
    let tail = parse_tail(reader)?;
    Ok(DsaCertificate {
        magic,
        nonce,
        p,
        q,
        g,
        y,
        tail,
    })
}

fn parse_ecdsa<'a>(magic: Magic, reader: &mut Reader<'a>) -> Result<EcdsaCertificate<'a>> {
    let nonce = reader.read_string()?;
    let curve = reader.read_string()?;
    let public_key = reader.read_string()?;
    let tail = parse_tail(reader)?;
    Ok(EcdsaCertificate {
        magic,
        nonce,
        curve,
        public_key,
        tail,
    })
}

fn parse_ed25519<'a>(magic: Magic, reader: &mut Reader<'a>) -> Result<Ed25519Certificate<'a>> {
    let nonce = reader.read_string()?;
    let pk = reader.read_string()?;
    let tail = parse_tail(reader)?;
    Ok(Ed25519Certificate {
        magic,
        nonce,
        pk,
        tail,
    })
}

/// consumes the fields common to every variant: `serial` through
/// `signature`, in that order.
fn parse_tail<'a>(reader: &mut Reader<'a>) -> Result<Tail<'a>> {
    let serial = reader.read_u64()?;
    let kind = CertKind::from_u32(reader.read_u32()?)?;
    let key_id = reader.read_string()?;
    let valid_principals = Principals::new(reader.read_string()?);
    let valid_after = reader.read_u64()?;
    let valid_before = reader.read_u64()?;
    let critical_options = reader.read_string()?;
    let extensions = reader.read_string()?;
    let reserved = reader.read_string()?;
    let signature_key = reader.read_string()?;
    let encoded_sig_size = reader.position();
    let signature = reader.read_string()?;

    Ok(Tail {
        serial,
        kind,
        key_id,
        valid_principals,
        valid_after,
        valid_before,
        critical_options,
        extensions,
        reserved,
        signature_key,
        signature,
        encoded_sig_size,
    })
}
