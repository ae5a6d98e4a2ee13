use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StudentError {
    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("password cannot be empty")]
    EmptyPassword,

    #[error("{field} must fit on a single line")]
    MultiLine { field: &'static str },
}

//
// ─── ACCOUNT ───────────────────────────────────────────────────────────────────
//

/// A student login with its accumulated score.
///
/// Usernames are not unique; lookups resolve to the first matching account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentAccount {
    username: String,
    password: String,
    score: i32,
}

impl StudentAccount {
    /// Creates a new account with a zero score.
    ///
    /// Credentials are kept verbatim; only blank or multi-line values are rejected.
    ///
    /// # Errors
    ///
    /// Returns `StudentError` if the username or password is blank or contains a line break.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, StudentError> {
        let username = username.into();
        let password = password.into();

        if username.contains(['\n', '\r']) {
            return Err(StudentError::MultiLine { field: "username" });
        }
        if password.contains(['\n', '\r']) {
            return Err(StudentError::MultiLine { field: "password" });
        }
        if username.trim().is_empty() {
            return Err(StudentError::EmptyUsername);
        }
        if password.trim().is_empty() {
            return Err(StudentError::EmptyPassword);
        }

        Ok(Self {
            username,
            password,
            score: 0,
        })
    }

    /// Rebuilds an account from a decoded record without validation.
    #[must_use]
    pub fn from_persisted(
        username: impl Into<String>,
        password: impl Into<String>,
        score: i32,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            score,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Exact, case-sensitive credential comparison.
    #[must_use]
    pub fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }

    pub fn add_score(&mut self, points: i32) {
        self.score = self.score.saturating_add(points);
    }
}

/// Index of the first account matching `username` and `password`.
#[must_use]
pub fn position_by_credentials(
    students: &[StudentAccount],
    username: &str,
    password: &str,
) -> Option<usize> {
    students
        .iter()
        .position(|student| student.matches_credentials(username, password))
}

/// First account matching `username` and `password`, in sequence order.
#[must_use]
pub fn find_by_credentials<'a>(
    students: &'a [StudentAccount],
    username: &str,
    password: &str,
) -> Option<&'a StudentAccount> {
    position_by_credentials(students, username, password).map(|index| &students[index])
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<StudentAccount> {
        vec![
            StudentAccount::from_persisted("alice", "pw1", 3),
            StudentAccount::from_persisted("bob", "hunter2", 0),
            StudentAccount::from_persisted("alice", "pw1", 9),
        ]
    }

    #[test]
    fn new_account_starts_at_zero() {
        let account = StudentAccount::new("carol", "secret").unwrap();
        assert_eq!(account.score(), 0);
        assert_eq!(account.username(), "carol");
    }

    #[test]
    fn new_account_rejects_blank_or_multiline_credentials() {
        assert_eq!(
            StudentAccount::new("  ", "x").unwrap_err(),
            StudentError::EmptyUsername
        );
        assert_eq!(
            StudentAccount::new("carol", "").unwrap_err(),
            StudentError::EmptyPassword
        );
        assert_eq!(
            StudentAccount::new("carol", "a\nb").unwrap_err(),
            StudentError::MultiLine { field: "password" }
        );
    }

    #[test]
    fn lookup_returns_first_duplicate() {
        let students = roster();
        let found = find_by_credentials(&students, "alice", "pw1").unwrap();
        assert_eq!(found.score(), 3);
        assert_eq!(position_by_credentials(&students, "alice", "pw1"), Some(0));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let students = roster();
        assert!(find_by_credentials(&students, "Alice", "pw1").is_none());
        assert!(find_by_credentials(&students, "bob", "Hunter2").is_none());
        assert!(find_by_credentials(&students, "bob", "hunter2").is_some());
    }

    #[test]
    fn lookup_on_empty_roster_is_none() {
        assert!(find_by_credentials(&[], "alice", "pw1").is_none());
    }

    #[test]
    fn add_score_saturates() {
        let mut account = StudentAccount::from_persisted("max", "pw", i32::MAX - 1);
        account.add_score(5);
        assert_eq!(account.score(), i32::MAX);
    }
}
