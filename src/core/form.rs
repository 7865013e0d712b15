//! Form submissions and the values actions hand back
//!
//! - [`FormData`]: raw field name → text mapping as submitted by the client
//! - [`FieldErrors`]: ordered field name → messages mapping
//! - [`FormState`]: what an action returns when it does not navigate away
//! - [`Outcome`]: either a redirect or a state value

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A submitted form.
///
/// Fields the client did not send are absent. An empty input is kept as an
/// empty string, so "missing" and "blank" stay distinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(IndexMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy in tests and demos
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Value of a field, `None` when it was not submitted
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Field-level validation messages, in schema order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(IndexMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to a field, keeping earlier messages
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of a validation + persistence attempt that did not redirect.
///
/// Built fresh on every call and never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    /// State carrying only a summary message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: None,
            message: Some(message.into()),
        }
    }

    /// State carrying field errors plus a summary message
    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors: Some(errors),
            message: Some(message.into()),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// How an action finished.
///
/// A redirect is a normal outcome, not an error: nothing that handles
/// failures ever sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<S> {
    /// Navigate the client to this path
    Redirect(String),

    /// Stay on the page and render this state
    State(S),
}

impl<S> Outcome<S> {
    pub fn redirect(to: impl Into<String>) -> Self {
        Outcome::Redirect(to.into())
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Outcome::Redirect(_))
    }

    /// Redirect target, if this outcome navigates
    pub fn location(&self) -> Option<&str> {
        match self {
            Outcome::Redirect(to) => Some(to),
            Outcome::State(_) => None,
        }
    }

    pub fn state(&self) -> Option<&S> {
        match self {
            Outcome::Redirect(_) => None,
            Outcome::State(state) => Some(state),
        }
    }

    pub fn into_state(self) -> Option<S> {
        match self {
            Outcome::Redirect(_) => None,
            Outcome::State(state) => Some(state),
        }
    }
}
