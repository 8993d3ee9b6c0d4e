//! the textual, PEM-like outer layer every OpenSSH certificate file is
//! wrapped in:
//!
//! ```text
//! ssh-ed25519-cert-v01@openssh.com AAAAIHNzaC1lZDI1NTE5... user@example.com
//! ```
//!
//! this module only peels that layer off — splitting the line into its
//! magic, base64 payload, and comment, then base64-decoding the payload.
//! everything past that (the binary wire format) is [`crate::certificate`]'s
//! job.

use crate::errors::*;

/// an OpenSSH certificate's textual envelope, already split into its three
/// parts. `blob` owns the base64-decoded binary certificate; `magic` and
/// `comment` are borrowed from the original text.
pub struct Envelope<'a> {
    pub magic: &'a str,
    pub blob: Vec<u8>,
    pub comment: Option<&'a str>,
}

/// parses the one-line textual form `<magic> <base64-blob> [comment]`.
///
/// `text` may carry leading/trailing whitespace and an optional trailing
/// newline; both are trimmed before splitting. fails with
/// [`ErrorKind::FailToParse`] if there isn't at least a magic token and a
/// payload token.
pub fn decode(text: &str) -> Result<Envelope<'_>> {
    let trimmed = text.trim();
    let mut parts = trimmed.splitn(3, ' ');
    let magic = parts.next().filter(|s| !s.is_empty()).ok_or(ErrorKind::FailToParse)?;
    let payload = parts.next().filter(|s| !s.is_empty()).ok_or(ErrorKind::FailToParse)?;
    let comment = parts.next().filter(|s| !s.is_empty());

    let blob = base64::decode(payload)?;

    Ok(Envelope {
        magic,
        blob,
        comment,
    })
}

/// decodes the base64 payload in place, overwriting `mutable_text`'s bytes
/// with the decoded binary and returning the magic, the decoded subslice,
/// and the comment. useful when the caller already owns a writable buffer
/// and would rather not hand back a second, separately-allocated one.
///
/// the decoded bytes are always shorter than (or the same length as) their
/// base64 encoding, so they fit back into the payload's own byte range
/// without disturbing the magic or comment on either side.
pub fn decode_in_place(mutable_text: &mut [u8]) -> Result<(&str, &[u8], Option<&str>)> {
    let full = ::std::str::from_utf8(mutable_text)?;
    // trim both ends, same as `decode`'s `text.trim()` — the leading edge
    // shifts every offset below by `leading` bytes.
    let leading = full.len() - full.trim_start().len();
    let trimmed_len = leading + full[leading..].trim_end().len();

    let (magic_end, payload_start, payload_end, comment_start) = {
        let text = ::std::str::from_utf8(&mutable_text[leading..trimmed_len])?;
        let magic_len = text.find(' ').ok_or(ErrorKind::FailToParse)?;
        let rest = &text[magic_len + 1..];
        let payload_len = rest.find(' ').unwrap_or(rest.len());
        if payload_len == 0 {
            return Err(ErrorKind::FailToParse.into());
        }
        let magic_end = leading + magic_len;
        let payload_start = magic_end + 1;
        let payload_end = payload_start + payload_len;
        (magic_end, payload_start, payload_end, payload_end + 1)
    };

    // decode into a transient buffer, then copy the (shorter) result back
    // over the payload's own bytes in `mutable_text`.
    let decoded = base64::decode(&mutable_text[payload_start..payload_end])?;
    let blob_end = payload_start + decoded.len();
    mutable_text[payload_start..blob_end].copy_from_slice(&decoded);

    let magic = ::std::str::from_utf8(&mutable_text[leading..magic_end])?;
    let comment = if comment_start < trimmed_len {
        let c = ::std::str::from_utf8(&mutable_text[comment_start..trimmed_len])?;
        if c.is_empty() {
            None
        } else {
            Some(c)
        }
    } else {
        None
    };
    let blob = &mutable_text[payload_start..blob_end];

    Ok((magic, blob, comment))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSA_SAMPLE_MAGIC: &str = "ssh-rsa-cert-v01@openssh.com";

    #[test]
    fn splits_magic_payload_and_comment() {
        let text = format!("{} {} {}", RSA_SAMPLE_MAGIC, base64::encode(b"hello"), "user@host");
        let env = decode(&text).unwrap();
        assert_eq!(env.magic, RSA_SAMPLE_MAGIC);
        assert_eq!(env.blob, b"hello");
        assert_eq!(env.comment, Some("user@host"));
    }

    #[test]
    fn comment_is_optional() {
        let text = format!("{} {}", RSA_SAMPLE_MAGIC, base64::encode(b"hello"));
        let env = decode(&text).unwrap();
        assert_eq!(env.comment, None);
    }

    #[test]
    fn trailing_newline_and_whitespace_are_trimmed() {
        let text = format!("  {} {}  \n", RSA_SAMPLE_MAGIC, base64::encode(b"hello"));
        let env = decode(&text).unwrap();
        assert_eq!(env.magic, RSA_SAMPLE_MAGIC);
        assert_eq!(env.blob, b"hello");
    }

    #[test]
    fn missing_payload_token_fails_to_parse() {
        assert!(decode(RSA_SAMPLE_MAGIC).is_err());
    }

    #[test]
    fn empty_input_fails_to_parse() {
        assert!(decode("").is_err());
    }

    #[test]
    fn decode_in_place_matches_decode() {
        let text = format!("{} {} {}", RSA_SAMPLE_MAGIC, base64::encode(b"hello"), "user@host");
        let owned = decode(&text).unwrap();
        let mut bytes = text.into_bytes();
        let (magic, blob, comment) = decode_in_place(&mut bytes).unwrap();
        assert_eq!(magic, RSA_SAMPLE_MAGIC);
        assert_eq!(blob, owned.blob.as_slice());
        assert_eq!(comment, Some("user@host"));
    }

    #[test]
    fn decode_in_place_trims_leading_whitespace_like_decode() {
        let text = format!("  \n{} {}  \n", RSA_SAMPLE_MAGIC, base64::encode(b"hello"));
        let owned = decode(&text).unwrap();
        let mut bytes = text.into_bytes();
        let (magic, blob, comment) = decode_in_place(&mut bytes).unwrap();
        assert_eq!(magic, RSA_SAMPLE_MAGIC);
        assert_eq!(blob, owned.blob.as_slice());
        assert_eq!(comment, None);
    }
}
