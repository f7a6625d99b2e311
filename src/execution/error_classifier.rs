//! # Execution Failure Classification
//!
//! Labels a dial failure as transient (infrastructure-class, likely to
//! succeed on redelivery) or permanent (business/validation-class, where
//! redelivery wastes resources and risks duplicate side effects such as
//! double-dialing).
//!
//! The classification drives the HTTP status returned to the task delivery
//! system: transient maps to 500 (redeliver, subject to the queue's own
//! backoff policy), permanent maps to 200 with `handled:true` (do not
//! redeliver; the failure is terminal and already recorded on the lock).
//!
//! This is a pure function over two explicit inputs, the error message and an
//! optional declared type tag. The substring lists below are the authoritative
//! policy and can be ported verbatim.

use serde::{Deserialize, Serialize};

/// Message substrings that indicate an infrastructure-level failure.
/// Matched against the lowercased message.
const TRANSIENT_MESSAGE_MARKERS: &[&str] = &[
    "econnreset",
    "etimedout",
    "econnrefused",
    "enetunreach",
    "socket hang up",
    "network",
    "timeout",
    "502",
    "503",
    "429",
];

/// Declared error-type tags that indicate a fetch/abort failure.
/// Matched against the lowercased type name.
const TRANSIENT_TYPE_MARKERS: &[&str] = &["fetcherror", "aborterror"];

/// Transient or permanent; everything the delivery system needs to know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Likely to succeed on redelivery.
    Transient,
    /// Guaranteed to fail again; redelivery must not happen.
    Permanent,
}

impl FailureClass {
    pub fn is_transient(&self) -> bool {
        matches!(self, FailureClass::Transient)
    }
}

impl std::fmt::Display for FailureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureClass::Transient => write!(f, "transient"),
            FailureClass::Permanent => write!(f, "permanent"),
        }
    }
}

/// Classify a dial failure from its message and optional declared type tag.
pub fn classify_failure(message: &str, error_type: Option<&str>) -> FailureClass {
    let lowered = message.to_lowercase();
    if TRANSIENT_MESSAGE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        return FailureClass::Transient;
    }

    if let Some(tag) = error_type {
        let tag = tag.to_lowercase();
        if TRANSIENT_TYPE_MARKERS.iter().any(|marker| tag.contains(marker)) {
            return FailureClass::Transient;
        }
    }

    FailureClass::Permanent
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn connection_errors_are_transient() {
        assert_eq!(classify_failure("ETIMEDOUT: connect", None), FailureClass::Transient);
        assert_eq!(classify_failure("ECONNRESET", None), FailureClass::Transient);
        assert_eq!(classify_failure("ECONNREFUSED", None), FailureClass::Transient);
        assert_eq!(classify_failure("ENETUNREACH", None), FailureClass::Transient);
        assert_eq!(classify_failure("socket hang up", None), FailureClass::Transient);
    }

    #[test]
    fn http_status_tokens_are_transient() {
        assert_eq!(
            classify_failure("429 Too Many Requests", None),
            FailureClass::Transient
        );
        assert_eq!(classify_failure("upstream sent 502", None), FailureClass::Transient);
        assert_eq!(
            classify_failure("503 Service Unavailable", None),
            FailureClass::Transient
        );
    }

    #[test]
    fn generic_network_and_timeout_words_are_transient() {
        assert_eq!(
            classify_failure("Network is flapping", None),
            FailureClass::Transient
        );
        assert_eq!(
            classify_failure("request timeout after 30s", None),
            FailureClass::Transient
        );
    }

    #[test]
    fn business_failures_are_permanent() {
        assert_eq!(
            classify_failure("Invalid phone number format", None),
            FailureClass::Permanent
        );
        assert_eq!(
            classify_failure("Session already completed", None),
            FailureClass::Permanent
        );
    }

    #[test]
    fn empty_message_is_permanent() {
        assert_eq!(classify_failure("", None), FailureClass::Permanent);
    }

    #[test]
    fn fetch_and_abort_type_tags_are_transient() {
        assert_eq!(
            classify_failure("opaque failure", Some("FetchError")),
            FailureClass::Transient
        );
        assert_eq!(
            classify_failure("opaque failure", Some("AbortError")),
            FailureClass::Transient
        );
        assert_eq!(
            classify_failure("opaque failure", Some("ValidationError")),
            FailureClass::Permanent
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            classify_failure("Connection TIMEOUT talking upstream", None),
            FailureClass::Transient
        );
        assert_eq!(
            classify_failure("opaque failure", Some("fetcherror")),
            FailureClass::Transient
        );
    }

    proptest! {
        #[test]
        fn any_message_containing_a_marker_is_transient(
            prefix in ".{0,32}",
            suffix in ".{0,32}",
            marker_idx in 0usize..10,
        ) {
            let marker = TRANSIENT_MESSAGE_MARKERS[marker_idx];
            let message = format!("{prefix}{marker}{suffix}");
            prop_assert_eq!(classify_failure(&message, None), FailureClass::Transient);
        }
    }
}
