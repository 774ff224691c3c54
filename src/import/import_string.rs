use std::fmt;

/// Module holding the interpreter's builtin names
pub const BUILTINS: &str = "builtins";

/// Dotted module path, e.g. `botocore.client`
///
/// Empty segments are dropped on construction, so `"a..b"` and `"a.b"` are the
/// same path. Ordering compares segment by segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportString {
    parts: Vec<String>,
}

impl ImportString {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parts: parts
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Parse a dotted path
    pub fn from_dotted(path: &str) -> Self {
        Self::new(path.split('.'))
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// First segment, the top-level package
    pub fn parent(&self) -> &str {
        self.parts.first().map(String::as_str).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn is_builtins(&self) -> bool {
        self.parent() == BUILTINS
    }

    /// Append `other` below this path
    pub fn join(&self, other: &ImportString) -> ImportString {
        let mut parts = self.parts.clone();
        parts.extend(other.parts.iter().cloned());
        ImportString { parts }
    }
}

impl fmt::Display for ImportString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}
