use std::fmt::Display;

/// A generated code: an optional literal prefix followed by sampled symbols.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(String);

impl Code {
    /// Creates a `Code` without validation.
    ///
    /// The generator is the only producer of codes, and it guarantees the
    /// length invariant by construction.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the code in characters (not bytes).
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds the namespaced key this code is deduplicated under.
    pub fn key(&self, namespace: &str) -> DedupKey {
        DedupKey::new(namespace, self)
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The existence-check key for a [`Code`], formatted as `<namespace>:<code>`.
///
/// Keeping the namespace in the key lets several independent code
/// populations share one dedup store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn new(namespace: &str, code: &Code) -> Self {
        Self(format!("{}:{}", namespace, code.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DedupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
