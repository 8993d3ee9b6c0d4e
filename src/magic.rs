//! the magic string at the front of a certificate blob names both the key
//! family and the wire format version. see
//! https://cvsweb.openbsd.org/src/usr.bin/ssh/PROTOCOL.certkeys for the
//! canonical list this crate supports.

use crate::errors::*;

const SSH_RSA_CERT: &str = "ssh-rsa-cert-v01@openssh.com";
const SSH_DSS_CERT: &str = "ssh-dss-cert-v01@openssh.com";
const ECDSA_P256_CERT: &str = "ecdsa-sha2-nistp256-cert-v01@openssh.com";
const ECDSA_P384_CERT: &str = "ecdsa-sha2-nistp384-cert-v01@openssh.com";
const ECDSA_P521_CERT: &str = "ecdsa-sha2-nistp521-cert-v01@openssh.com";
const SSH_ED25519_CERT: &str = "ssh-ed25519-cert-v01@openssh.com";
const RSA_SHA2_256_CERT: &str = "rsa-sha2-256-cert-v01@openssh.com";
const RSA_SHA2_512_CERT: &str = "rsa-sha2-512-cert-v01@openssh.com";

/// one of the eight known certificate magics. a closed set: anything else
/// is `InvalidMagicString`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Magic {
    SshRsaCert,
    SshDssCert,
    EcdsaP256Cert,
    EcdsaP384Cert,
    EcdsaP521Cert,
    SshEd25519Cert,
    RsaSha2P256Cert,
    RsaSha2P512Cert,
}

/// which of the four field-layout schemas a magic dispatches to. the three
/// RSA-family magics (`ssh-rsa`, `rsa-sha2-256`, `rsa-sha2-512`) all share
/// the `nonce, e, n` head and so share a schema; they differ only in which
/// signature algorithm the CA used to sign, a detail this core doesn't
/// interpret.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Schema {
    Rsa,
    Dsa,
    Ecdsa,
    Ed25519,
}

impl Magic {
    /// maps a magic string exactly as it appears on the wire (or in the
    /// envelope's textual form) to a `Magic`. `InvalidMagicString` for
    /// anything not in the closed set of eight.
    pub fn from_str(s: &str) -> Result<Self> {
        Magic::from_bytes(s.as_bytes())
    }

    /// same as [`Magic::from_str`], but compares raw bytes directly rather
    /// than going through UTF-8 validation first. the blob's leading magic
    /// is untrusted (spec §1) and may not be valid UTF-8 at all; garbage
    /// bytes there are still just an unrecognized magic, not a distinct
    /// decoding failure, so this never surfaces a `Utf8Error`.
    pub fn from_bytes(b: &[u8]) -> Result<Self> {
        Ok(match b {
            _ if b == SSH_RSA_CERT.as_bytes() => Magic::SshRsaCert,
            _ if b == SSH_DSS_CERT.as_bytes() => Magic::SshDssCert,
            _ if b == ECDSA_P256_CERT.as_bytes() => Magic::EcdsaP256Cert,
            _ if b == ECDSA_P384_CERT.as_bytes() => Magic::EcdsaP384Cert,
            _ if b == ECDSA_P521_CERT.as_bytes() => Magic::EcdsaP521Cert,
            _ if b == SSH_ED25519_CERT.as_bytes() => Magic::SshEd25519Cert,
            _ if b == RSA_SHA2_256_CERT.as_bytes() => Magic::RsaSha2P256Cert,
            _ if b == RSA_SHA2_512_CERT.as_bytes() => Magic::RsaSha2P512Cert,
            _ => return Err(ErrorKind::InvalidMagicString.into()),
        })
    }

    /// the wire/textual spelling of this magic.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Magic::SshRsaCert => SSH_RSA_CERT,
            Magic::SshDssCert => SSH_DSS_CERT,
            Magic::EcdsaP256Cert => ECDSA_P256_CERT,
            Magic::EcdsaP384Cert => ECDSA_P384_CERT,
            Magic::EcdsaP521Cert => ECDSA_P521_CERT,
            Magic::SshEd25519Cert => SSH_ED25519_CERT,
            Magic::RsaSha2P256Cert => RSA_SHA2_256_CERT,
            Magic::RsaSha2P512Cert => RSA_SHA2_512_CERT,
        }
    }

    /// which field schema this magic's certificate is parsed with.
    pub fn schema(&self) -> Schema {
        match *self {
            Magic::SshRsaCert | Magic::RsaSha2P256Cert | Magic::RsaSha2P512Cert => Schema::Rsa,
            Magic::SshDssCert => Schema::Dsa,
            Magic::EcdsaP256Cert | Magic::EcdsaP384Cert | Magic::EcdsaP521Cert => Schema::Ecdsa,
            Magic::SshEd25519Cert => Schema::Ed25519,
        }
    }
}

impl ::std::fmt::Display for Magic {
    fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_magics_round_trip() {
        let known = [
            SSH_RSA_CERT,
            SSH_DSS_CERT,
            ECDSA_P256_CERT,
            ECDSA_P384_CERT,
            ECDSA_P521_CERT,
            SSH_ED25519_CERT,
            RSA_SHA2_256_CERT,
            RSA_SHA2_512_CERT,
        ];
        for s in known.iter() {
            let m = Magic::from_str(s).unwrap();
            assert_eq!(&m.as_str(), s);
        }
    }

    #[test]
    fn rsa_family_shares_schema() {
        assert_eq!(Magic::SshRsaCert.schema(), Schema::Rsa);
        assert_eq!(Magic::RsaSha2P256Cert.schema(), Schema::Rsa);
        assert_eq!(Magic::RsaSha2P512Cert.schema(), Schema::Rsa);
    }

    #[test]
    fn unknown_magic_is_rejected() {
        assert!(Magic::from_str("ssh-foo-cert-v01@openssh.com").is_err());
    }

    #[test]
    fn non_utf8_magic_bytes_are_rejected_not_panicked() {
        let garbage = [0xff, 0xfe, 0x00, 0x01];
        assert!(Magic::from_bytes(&garbage).is_err());
    }
}
