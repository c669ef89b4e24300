//! [`FieldPolicy`]: which record fields are encrypted, and under which mode.

use std::collections::BTreeMap;

use common::Mode;
use thiserror::Error;

/// Errors from parsing a field policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// An entry has no `:mode` part.
    #[error("policy entry `{0}` must have the form path:mode")]
    MissingMode(String),

    /// An entry has an empty path or an empty path segment.
    #[error("policy entry `{0}` has an empty path segment")]
    InvalidPath(String),

    /// The mode is neither `deterministic` nor `probabilistic`.
    #[error("policy entry `{entry}` has unknown mode `{mode}`")]
    UnknownMode {
        /// The offending entry.
        entry: String,
        /// The unrecognised mode.
        mode: String,
    },
}

/// Dot-notation field paths mapped to the mode they are encrypted with.
///
/// Paths use `.` to descend into objects and a `[]` suffix to expand every
/// element of an array, e.g. `"guardians[].phone"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPolicy {
    fields: BTreeMap<String, Mode>,
}

impl FieldPolicy {
    /// Create an empty policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the mode for `path`.
    pub fn insert(&mut self, path: impl Into<String>, mode: Mode) -> &mut Self {
        self.fields.insert(path.into(), mode);
        self
    }

    /// Parse `path:mode` pairs separated by commas.
    ///
    /// Whitespace around entries is ignored, as are empty entries, so an
    /// empty string yields an empty policy.
    ///
    /// # Errors
    ///
    /// Returns a [`PolicyError`] describing the first malformed entry.
    pub fn parse(raw: &str) -> Result<Self, PolicyError> {
        let mut policy = Self::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (path, mode) = entry
                .rsplit_once(':')
                .ok_or_else(|| PolicyError::MissingMode(entry.to_owned()))?;
            let (path, mode) = (path.trim(), mode.trim());

            if path.split('.').any(|seg| seg.is_empty() || seg == "[]") {
                return Err(PolicyError::InvalidPath(entry.to_owned()));
            }
            let mode = mode.parse::<Mode>().map_err(|_| PolicyError::UnknownMode {
                entry: entry.to_owned(),
                mode: mode.to_owned(),
            })?;
            policy.insert(path, mode);
        }
        Ok(policy)
    }

    /// Iterate over `(path, mode)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Mode)> {
        self.fields.iter().map(|(p, m)| (p.as_str(), *m))
    }

    /// Mode configured for `path`, if any.
    pub fn mode_of(&self, path: &str) -> Option<Mode> {
        self.fields.get(path).copied()
    }

    /// Number of configured paths.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no paths are configured.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_empty_policy() {
        assert!(FieldPolicy::parse("").unwrap().is_empty());
        assert!(FieldPolicy::parse(" , ,").unwrap().is_empty());
    }

    #[test]
    fn parses_entries() {
        let policy = FieldPolicy::parse(
            "email:deterministic, phone : deterministic,notes:probabilistic,guardians[].name:probabilistic",
        )
        .unwrap();
        assert_eq!(policy.len(), 4);
        assert_eq!(policy.mode_of("email"), Some(Mode::Deterministic));
        assert_eq!(policy.mode_of("phone"), Some(Mode::Deterministic));
        assert_eq!(policy.mode_of("guardians[].name"), Some(Mode::Probabilistic));
        assert_eq!(policy.mode_of("name"), None);
    }

    #[test]
    fn later_entry_replaces_earlier() {
        let policy = FieldPolicy::parse("email:probabilistic,email:deterministic").unwrap();
        assert_eq!(policy.len(), 1);
        assert_eq!(policy.mode_of("email"), Some(Mode::Deterministic));
    }

    #[test]
    fn rejects_missing_mode() {
        assert_eq!(
            FieldPolicy::parse("email").unwrap_err(),
            PolicyError::MissingMode("email".into())
        );
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(matches!(
            FieldPolicy::parse(":deterministic"),
            Err(PolicyError::InvalidPath(_))
        ));
        assert!(matches!(
            FieldPolicy::parse("user..email:deterministic"),
            Err(PolicyError::InvalidPath(_))
        ));
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = FieldPolicy::parse("email:random").unwrap_err();
        assert_eq!(
            err,
            PolicyError::UnknownMode {
                entry: "email:random".into(),
                mode: "random".into()
            }
        );
        assert!(err.to_string().contains("random"));
    }

    #[test]
    fn iter_is_ordered() {
        let mut policy = FieldPolicy::new();
        policy
            .insert("b", Mode::Probabilistic)
            .insert("a", Mode::Deterministic);
        let paths: Vec<&str> = policy.iter().map(|(p, _)| p).collect();
        assert_eq!(paths, ["a", "b"]);
    }
}
