//! Email allow-list and static credential checking.
//!
//! Two authentication strategies exist: the canonical one-time email code
//! flow (gated by `AllowList`) and the alternative static username/password
//! login (`CredentialSet`). Both fail closed when unconfigured.

use std::collections::HashSet;

/// Set of lowercase-normalized emails permitted to authenticate.
pub struct AllowList {
    emails: HashSet<String>,
}

impl AllowList {
    /// Parse a comma-separated list. Absent or empty configuration denies
    /// everyone.
    pub fn from_config(raw: Option<&str>) -> Self {
        let emails: HashSet<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        if emails.is_empty() {
            tracing::warn!("allowed_emails is not configured; all emails will be denied");
        }

        Self { emails }
    }

    /// Case-insensitive membership test.
    pub fn is_allowed(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// Static `user:pass` pairs for the alternative login mode.
pub struct CredentialSet {
    entries: Vec<(String, String)>,
}

impl CredentialSet {
    /// Parse `user1:pass1,user2:pass2`. Malformed pairs are skipped, never
    /// fatal. Secret material is not logged.
    pub fn from_config(raw: Option<&str>) -> Self {
        let mut entries = Vec::new();
        let mut skipped = 0usize;

        for pair in raw.unwrap_or_default().split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let parts: Vec<&str> = pair.split(':').collect();
            match parts.as_slice() {
                [user, pass] => entries.push((user.to_string(), pass.to_string())),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "ignored malformed credential entries");
        }

        Self { entries }
    }

    /// Exact-match check. Unconfigured credentials deny everyone.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        self.entries
            .iter()
            .any(|(user, pass)| user == username && pass == password)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowlist_membership() {
        let list = AllowList::from_config(Some("a@b.com, c@d.com"));
        assert!(list.is_allowed("a@b.com"));
        assert!(list.is_allowed("c@d.com"));
        assert!(!list.is_allowed("x@y.com"));
    }

    #[test]
    fn allowlist_is_case_insensitive() {
        let list = AllowList::from_config(Some("user@example.com"));
        assert!(list.is_allowed("User@Example.com"));
        assert!(list.is_allowed("USER@EXAMPLE.COM"));

        let list = AllowList::from_config(Some("MiXeD@Case.Com"));
        assert!(list.is_allowed("mixed@case.com"));
    }

    #[test]
    fn allowlist_trims_whitespace() {
        let list = AllowList::from_config(Some("  a@b.com ,c@d.com  "));
        assert!(list.is_allowed(" a@b.com "));
        assert!(list.is_allowed("c@d.com"));
    }

    #[test]
    fn unconfigured_allowlist_denies_everyone() {
        let none = AllowList::from_config(None);
        assert!(!none.is_allowed("a@b.com"));
        assert!(none.is_empty());

        let empty = AllowList::from_config(Some(""));
        assert!(!empty.is_allowed("a@b.com"));
    }

    #[test]
    fn credentials_match_exact_pairs() {
        let creds = CredentialSet::from_config(Some("alice:p1,bob:p2"));
        assert!(creds.verify("alice", "p1"));
        assert!(creds.verify("bob", "p2"));
        assert!(!creds.verify("alice", "wrong"));
        assert!(!creds.verify("alice", "p2"));
        assert!(!creds.verify("carol", "p1"));
    }

    #[test]
    fn malformed_entries_never_match_never_panic() {
        // "alice" has no colon; "x:y:z" has too many parts
        let creds = CredentialSet::from_config(Some("alice,x:y:z,bob:p2"));
        assert!(!creds.verify("alice", ""));
        assert!(!creds.verify("x", "y"));
        assert!(creds.verify("bob", "p2"));
    }

    #[test]
    fn unconfigured_credentials_deny_everyone() {
        let creds = CredentialSet::from_config(None);
        assert!(!creds.verify("alice", "p1"));
        assert!(creds.is_empty());
    }
}
