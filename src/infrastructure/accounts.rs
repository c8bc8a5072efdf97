//! Account identifier syntax check.

use crate::port::AccountRules;

/// Accepts identifiers of bounded length made of ASCII alphanumerics and
/// `_ - . :`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPolicy {
    min_len: usize,
    max_len: usize,
}

impl AccountPolicy {
    #[must_use]
    pub const fn new(min_len: usize, max_len: usize) -> Self {
        Self { min_len, max_len }
    }
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self::new(1, 64)
    }
}

impl AccountRules for AccountPolicy {
    fn is_valid_account(&self, raw: &str) -> bool {
        (self.min_len..=self.max_len).contains(&raw.len())
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
    }
}
