//! error kinds returned by this crate.
//!
//! every fault the decoder can hit is one of the kinds below. none of them
//! carry a payload: the wire layout gives no room for a helpful diagnostic
//! beyond "which rule was violated", so that's what we report.

error_chain! {
    foreign_links {
        Utf8(::std::str::Utf8Error);
        Base64(::base64::DecodeError);
    }

    errors {
        /// the envelope has fewer than two whitespace-separated tokens, so
        /// there's no base64 payload to decode.
        FailToParse {
            description("envelope is missing a payload token")
                display("envelope is missing a payload token")
        }
        /// the blob's leading magic isn't one of the eight known certificate
        /// magics, or it disagrees with the envelope's textual magic.
        InvalidMagicString {
            description("unrecognized or mismatched certificate magic string")
                display("unrecognized or mismatched certificate magic string")
        }
        /// a structural rule was broken after magic dispatch succeeded:
        /// an out-of-range cert_kind, a short blob, or leftover bytes after
        /// the last expected field.
        MalformedCertificate {
            description("certificate structure is invalid")
                display("certificate structure is invalid")
        }
        /// a fixed-width integer field would read past the end of the blob.
        MalformedInteger {
            description("integer field overruns the buffer")
                display("integer field overruns the buffer")
        }
        /// a length-prefixed string's declared length overruns the buffer.
        MalformedString {
            description("string field overruns the buffer")
                display("string field overruns the buffer")
        }
        /// the same extension bit was set twice while folding the
        /// extensions blob.
        RepeatedExtension {
            description("extension appears more than once")
                display("extension appears more than once")
        }
        /// an extension name not in the known set was seen while folding.
        UnknownExtension {
            description("unrecognized extension name")
                display("unrecognized extension name")
        }
    }
}
