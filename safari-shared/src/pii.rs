use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wrapper for customer data (emails, phone numbers, names) that hides the
/// value in `Debug`/`Display` output so it never lands in log lines verbatim.
///
/// Serialization passes the real value through: API responses and the
/// confirmation payload need it.
#[derive(Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> Masked<T> {
    /// A log-safe hint of the value: first character plus the email domain
    /// when there is one, e.g. `j***@example.com`.
    pub fn hint(&self) -> String {
        let raw = self.0.as_ref();
        let first = raw.chars().next();
        match (first, raw.find('@')) {
            (Some(c), Some(at)) => format!("{}***{}", c, &raw[at..]),
            (Some(c), None) => format!("{}***", c),
            (None, _) => String::new(),
        }
    }
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Masked({})", self.hint())
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hint())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> Masked<T> {
    pub fn inner(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl From<String> for Masked<String> {
    fn from(value: String) -> Self {
        Masked(value)
    }
}
