use crate::client::CallFailure;

pub const USER_REJECTED_MESSAGE: &str = "Transaction was rejected by the user";
pub const INSUFFICIENT_FUNDS_MESSAGE: &str = "Insufficient funds in your wallet";
pub const WOULD_FAIL_MESSAGE: &str = "Transaction would fail - possibly due to contract requirements";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error - please check your connection";

/// Longest raw-message excerpt appended to a fallback.
const MAX_EXCERPT_CHARS: usize = 100;

const REJECTION_PATTERNS: &[&str] = &[
    "User denied transaction",
    "User rejected",
    "denied transaction signature",
];
const FUNDS_PATTERNS: &[&str] = &["insufficient funds", "exceeds balance"];
const GAS_PATTERNS: &[&str] = &["gas required exceeds"];
const NETWORK_PATTERNS: &[&str] = &["network", "disconnected"];

/// Known failure categories, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UserRejected,
    InsufficientFunds,
    WouldFail,
    Network,
    Other,
}

impl FailureKind {
    pub fn of(failure: &CallFailure) -> Self {
        let message = failure.message.as_deref().unwrap_or("");
        let matches_any = |patterns: &[&str]| patterns.iter().any(|p| message.contains(p));

        if failure.reason.as_deref() == Some("rejected") || matches_any(REJECTION_PATTERNS) {
            FailureKind::UserRejected
        } else if matches_any(FUNDS_PATTERNS) {
            FailureKind::InsufficientFunds
        } else if matches_any(GAS_PATTERNS) {
            FailureKind::WouldFail
        } else if matches_any(NETWORK_PATTERNS) {
            FailureKind::Network
        } else {
            FailureKind::Other
        }
    }

    pub fn fixed_message(&self) -> Option<&'static str> {
        match self {
            FailureKind::UserRejected => Some(USER_REJECTED_MESSAGE),
            FailureKind::InsufficientFunds => Some(INSUFFICIENT_FUNDS_MESSAGE),
            FailureKind::WouldFail => Some(WOULD_FAIL_MESSAGE),
            FailureKind::Network => Some(NETWORK_ERROR_MESSAGE),
            FailureKind::Other => None,
        }
    }
}

/// Maps a write failure to the single message shown to the user.
pub fn classify_failure(failure: Option<&CallFailure>, fallback: &str) -> String {
    let Some(failure) = failure else {
        return fallback.to_string();
    };

    if let Some(message) = FailureKind::of(failure).fixed_message() {
        return message.to_string();
    }

    let Some(message) = failure.message.as_deref().filter(|m| !m.is_empty()) else {
        return fallback.to_string();
    };

    if let Some(details) = extract_details(message) {
        return details.to_string();
    }

    if message.chars().count() > MAX_EXCERPT_CHARS {
        let excerpt: String = message.chars().take(MAX_EXCERPT_CHARS).collect();
        return format!("{} - {}...", fallback, excerpt);
    }

    format!("{} - {}", fallback, message)
}

/// Text after `Details: ` up to the first period or line break.
fn extract_details(message: &str) -> Option<&str> {
    let (_, rest) = message.split_once("Details: ")?;
    let end = rest.find(['.', '\n']).unwrap_or(rest.len());
    let details = &rest[..end];
    (!details.is_empty()).then_some(details)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK: &str = "Failed to add liquidity";

    fn classify(message: &str) -> String {
        classify_failure(Some(&CallFailure::message(message)), FALLBACK)
    }

    #[test]
    fn test_absent_failure_returns_fallback() {
        assert_eq!(classify_failure(None, FALLBACK), FALLBACK);
    }

    #[test]
    fn test_rejection_by_reason() {
        let failure = CallFailure::rejected();
        assert_eq!(classify_failure(Some(&failure), FALLBACK), USER_REJECTED_MESSAGE);
    }

    #[test]
    fn test_rejection_by_message() {
        assert_eq!(classify("MetaMask Tx Signature: User denied transaction signature."), USER_REJECTED_MESSAGE);
        assert_eq!(classify("User rejected the request."), USER_REJECTED_MESSAGE);
        assert_eq!(classify("signer: denied transaction signature"), USER_REJECTED_MESSAGE);
    }

    #[test]
    fn test_rejection_takes_priority_over_funds() {
        let message = "User rejected the request (wallet also reported insufficient funds)";
        assert_eq!(classify(message), USER_REJECTED_MESSAGE);
    }

    #[test]
    fn test_insufficient_funds() {
        assert_eq!(classify("insufficient funds for gas * price + value"), INSUFFICIENT_FUNDS_MESSAGE);
        assert_eq!(classify("ERC20: transfer amount exceeds balance"), INSUFFICIENT_FUNDS_MESSAGE);
    }

    #[test]
    fn test_gas_estimation_failure() {
        assert_eq!(classify("gas required exceeds allowance (30000000)"), WOULD_FAIL_MESSAGE);
    }

    #[test]
    fn test_network_failure() {
        assert_eq!(classify("network changed: 1 => 42161"), NETWORK_ERROR_MESSAGE);
        assert_eq!(classify("provider disconnected"), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn test_details_fragment_preferred() {
        let message = "Execution reverted. Details: execution reverted: slippage exceeded. Version: viem@2";
        assert_eq!(classify(message), "execution reverted: slippage exceeded");

        assert_eq!(classify("Request failed\nDetails: nonce too low"), "nonce too low");
    }

    #[test]
    fn test_short_message_appended_to_fallback() {
        assert_eq!(classify("execution reverted"), "Failed to add liquidity - execution reverted");
    }

    #[test]
    fn test_long_message_truncated() {
        let message = "x".repeat(150);
        let classified = classify(&message);

        assert_eq!(classified, format!("{} - {}...", FALLBACK, "x".repeat(100)));
    }

    #[test]
    fn test_exactly_one_hundred_chars_not_truncated() {
        let message = "y".repeat(100);
        assert_eq!(classify(&message), format!("{} - {}", FALLBACK, message));
    }

    #[test]
    fn test_multibyte_excerpt_stays_on_char_boundary() {
        let message = "é".repeat(120);
        let classified = classify(&message);
        assert!(classified.ends_with("..."));
        assert_eq!(classified.chars().filter(|c| *c == 'é').count(), 100);
    }

    #[test]
    fn test_nothing_usable_returns_fallback() {
        assert_eq!(classify_failure(Some(&CallFailure::default()), FALLBACK), FALLBACK);
        assert_eq!(classify(""), FALLBACK);
        assert_eq!(
            classify_failure(Some(&CallFailure::reason("timeout")), FALLBACK),
            FALLBACK
        );
    }

    #[test]
    fn test_failure_kind() {
        assert_eq!(FailureKind::of(&CallFailure::rejected()), FailureKind::UserRejected);
        assert_eq!(FailureKind::of(&CallFailure::message("boom")), FailureKind::Other);
        assert_eq!(FailureKind::Other.fixed_message(), None);
    }
}
