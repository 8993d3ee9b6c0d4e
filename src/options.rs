//! two blobs share the same name/value pair shape — `critical_options` and
//! `extensions` — but are consumed differently: critical options are
//! surfaced to the caller as an iterator of raw pairs (the caller decides
//! policy for unrecognized names), while extensions are folded into a
//! bitmask the caller can test with simple bit ops.

use crate::errors::*;
use crate::reader;

/// the three critical option names OpenSSH certificates define
/// (https://cvsweb.openbsd.org/src/usr.bin/ssh/PROTOCOL.certkeys).
pub const FORCE_COMMAND: &str = "force-command";
pub const SOURCE_ADDRESS: &str = "source-address";
pub const VERIFY_REQUIRED: &str = "verify-required";

const KNOWN_CRITICAL_OPTIONS: [&str; 3] = [FORCE_COMMAND, SOURCE_ADDRESS, VERIFY_REQUIRED];

/// a single `(name, value)` pair read out of a certificate's
/// `critical_options` blob. `value` is opaque bytes — often itself a
/// length-prefixed string — and this crate does not interpret it further.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CriticalOption<'a> {
    pub name: &'a [u8],
    pub value: &'a [u8],
}

impl<'a> CriticalOption<'a> {
    /// whether `name` is one of the three option names this spec knows
    /// about. an unknown name is not itself an error; callers that enforce
    /// critical options decide whether to reject unrecognized ones.
    pub fn is_known(&self) -> bool {
        KNOWN_CRITICAL_OPTIONS
            .iter()
            .any(|known| known.as_bytes() == self.name)
    }
}

/// zero-copy iterator over a certificate's `critical_options` payload,
/// alternating a name read and a value read per step.
#[derive(Clone, Debug)]
pub struct CriticalOptionsIter<'a> {
    payload: &'a [u8],
    off: usize,
}

impl<'a> CriticalOptionsIter<'a> {
    /// wraps the raw payload of a `critical_options` field (bytes after its
    /// own length prefix has been stripped).
    pub fn new(payload: &'a [u8]) -> Self {
        CriticalOptionsIter { payload, off: 0 }
    }

    pub fn done(&self) -> bool {
        self.off == self.payload.len()
    }

    fn try_next(&mut self) -> Result<Option<CriticalOption<'a>>> {
        if self.done() {
            return Ok(None);
        }
        let (name_consumed, name) = reader::read_string(&self.payload[self.off..])?;
        self.off += name_consumed;
        let (value_consumed, value) = reader::read_string(&self.payload[self.off..])?;
        self.off += value_consumed;
        Ok(Some(CriticalOption { name, value }))
    }
}

impl<'a> Iterator for CriticalOptionsIter<'a> {
    type Item = Result<CriticalOption<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.try_next() {
            Ok(Some(pair)) => Some(Ok(pair)),
            Ok(None) => None,
            Err(e) => {
                self.off = self.payload.len();
                Some(Err(e))
            }
        }
    }
}

/// the extension flag bits, in the order spec §3 assigns them.
pub const NO_TOUCH_REQUIRED: u32 = 1 << 0;
pub const PERMIT_X11_FORWARDING: u32 = 1 << 1;
pub const PERMIT_AGENT_FORWARDING: u32 = 1 << 2;
pub const PERMIT_PORT_FORWARDING: u32 = 1 << 3;
pub const PERMIT_PTY: u32 = 1 << 4;
pub const PERMIT_USER_RC: u32 = 1 << 5;

fn extension_bit(name: &[u8]) -> Option<u32> {
    Some(match name {
        b"no-touch-required" => NO_TOUCH_REQUIRED,
        b"permit-X11-forwarding" => PERMIT_X11_FORWARDING,
        b"permit-agent-forwarding" => PERMIT_AGENT_FORWARDING,
        b"permit-port-forwarding" => PERMIT_PORT_FORWARDING,
        b"permit-pty" => PERMIT_PTY,
        b"permit-user-rc" => PERMIT_USER_RC,
        _ => return None,
    })
}

/// walks a certificate's `extensions` payload as a sequence of `(name,
/// value)` pairs — the value is always a zero-length string on the wire,
/// but both halves are consumed regardless, matching the wire framing
/// rather than assuming the value is absent. each recognized name ORs its
/// bit into the returned mask.
///
/// fails with [`ErrorKind::RepeatedExtension`] if the same bit is set
/// twice, or [`ErrorKind::UnknownExtension`] for a name outside the known
/// set. order of the names in the blob does not affect the result.
pub fn fold_extensions(payload: &[u8]) -> Result<u32> {
    let mut mask = 0u32;
    let mut off = 0usize;
    while off != payload.len() {
        let (name_consumed, name) = reader::read_string(&payload[off..])?;
        off += name_consumed;
        let (value_consumed, _value) = reader::read_string(&payload[off..])?;
        off += value_consumed;

        let bit = extension_bit(name).ok_or(ErrorKind::UnknownExtension)?;
        if mask & bit != 0 {
            return Err(ErrorKind::RepeatedExtension.into());
        }
        mask |= bit;
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_pairs(names: &[&[u8]]) -> Vec<u8> {
        let mut buf = Vec::new();
        for name in names {
            buf.extend_from_slice(&(name.len() as u32).to_be_bytes());
            buf.extend_from_slice(name);
            // value is always a zero-length string
            buf.extend_from_slice(&0u32.to_be_bytes());
        }
        buf
    }

    #[test]
    fn critical_options_iterate_pairs() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(FORCE_COMMAND.len() as u32).to_be_bytes());
        buf.extend_from_slice(FORCE_COMMAND.as_bytes());
        buf.extend_from_slice(&4u32.to_be_bytes());
        buf.extend_from_slice(b"true");

        let mut it = CriticalOptionsIter::new(&buf);
        let pair = it.next().unwrap().unwrap();
        assert_eq!(pair.name, FORCE_COMMAND.as_bytes());
        assert_eq!(pair.value, b"true");
        assert!(pair.is_known());
        assert!(it.next().is_none());
    }

    #[test]
    fn critical_options_surfaces_unknown_name() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&3u32.to_be_bytes());
        buf.extend_from_slice(b"xyz");
        buf.extend_from_slice(&0u32.to_be_bytes());

        let mut it = CriticalOptionsIter::new(&buf);
        let pair = it.next().unwrap().unwrap();
        assert!(!pair.is_known());
    }

    #[test]
    fn extensions_bitmask_from_scenario_4() {
        let payload = encode_pairs(&[
            b"permit-X11-forwarding",
            b"permit-agent-forwarding",
            b"permit-port-forwarding",
            b"permit-pty",
            b"permit-user-rc",
        ]);
        let mask = fold_extensions(&payload).unwrap();
        assert_eq!(mask, 0b0011_1110);
    }

    #[test]
    fn extensions_fold_is_order_insensitive() {
        let a = encode_pairs(&[b"permit-pty", b"no-touch-required"]);
        let b = encode_pairs(&[b"no-touch-required", b"permit-pty"]);
        assert_eq!(fold_extensions(&a).unwrap(), fold_extensions(&b).unwrap());
    }

    #[test]
    fn extensions_fold_rejects_duplicates() {
        let payload = encode_pairs(&[b"permit-pty", b"permit-pty"]);
        assert!(fold_extensions(&payload).is_err());
    }

    #[test]
    fn extensions_fold_rejects_unknown_name() {
        let payload = encode_pairs(&[b"made-up-extension"]);
        assert!(fold_extensions(&payload).is_err());
    }

    #[test]
    fn extensions_fold_empty_payload_is_zero() {
        assert_eq!(fold_extensions(&[]).unwrap(), 0);
    }
}
