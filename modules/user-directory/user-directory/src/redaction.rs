//! Masking helpers for identifiers that end up in log lines.

const MASK: &str = "***";

/// Number of leading characters kept visible.
const VISIBLE_PREFIX: usize = 2;

/// Mask everything but a short prefix of `value`.
///
/// Values too short to keep a prefix without giving most of them away are
/// masked entirely.
#[must_use]
pub fn redact(value: &str) -> String {
    let len = value.chars().count();
    if len <= VISIBLE_PREFIX * 2 {
        return MASK.to_owned();
    }
    let prefix: String = value.chars().take(VISIBLE_PREFIX).collect();
    format!("{prefix}{MASK}")
}

/// Mask the local part of an email address and keep the domain.
///
/// Input without `@` is treated as an opaque value.
#[must_use]
pub fn redact_email(email: &str) -> String {
    match email.trim().rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {
            format!("{}@{domain}", redact(local))
        }
        _ => redact(email),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn redact_keeps_short_prefix() {
        assert_eq!(redact("auth0|6512abcd"), "au***");
        assert_eq!(redact("alice-smith"), "al***");
    }

    #[test]
    fn redact_masks_short_values_entirely() {
        assert_eq!(redact(""), "***");
        assert_eq!(redact("bob"), "***");
        assert_eq!(redact("carl"), "***");
    }

    #[test]
    fn redact_handles_multibyte_input() {
        assert_eq!(redact("\u{00e9}milie-dupont"), "\u{00e9}m***");
    }

    #[test]
    fn redact_email_keeps_domain() {
        assert_eq!(redact_email("alice.smith@example.com"), "al***@example.com");
        assert_eq!(redact_email(" bob@example.org "), "***@example.org");
    }

    #[test]
    fn redact_email_without_at_sign() {
        assert_eq!(redact_email("not-an-email"), "no***");
        assert_eq!(redact_email("@example.com"), "@e***");
    }
}
