//! Path grammar for page operations.
//!
//! Every page request must match `/<action>/<title>` where the action is one
//! of the fixed set below and the title is a non-empty run of ASCII letters
//! and digits. Anything else is rejected before the session gate or any
//! storage code runs, since an invalid path carries no safe title to work
//! with.

use std::fmt;

/// The three page operations reachable over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Save,
}

impl Action {
    /// Match a raw path segment. Case-sensitive: `View` is not an action.
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "view" => Some(Action::View),
            "edit" => Some(Action::Edit),
            "save" => Some(Action::Save),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Edit => "edit",
            Action::Save => "save",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated `(action, title)` pair. Lives for one request only; the title
/// keeps the case the visitor typed (lowercasing happens at the storage
/// boundary, not here).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedRequest {
    pub action: Action,
    pub title: String,
}

/// Path does not match the `/<action>/<title>` grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("path does not match /<action>/<title>")]
pub struct RouteInvalid;

/// Titles are restricted to ASCII letters and digits. This is what keeps a
/// title safe to embed in both a redirect URL and a storage filename.
pub fn is_valid_title(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Parse a request path against the page grammar.
///
/// Rejects empty titles, extra path segments, titles with separators or
/// punctuation, and unknown or wrongly-cased actions.
pub fn parse_path(path: &str) -> Result<RoutedRequest, RouteInvalid> {
    let rest = path.strip_prefix('/').ok_or(RouteInvalid)?;
    let (segment, token) = rest.split_once('/').ok_or(RouteInvalid)?;
    let action = Action::from_segment(segment).ok_or(RouteInvalid)?;

    if !is_valid_title(token) {
        return Err(RouteInvalid);
    }

    Ok(RoutedRequest {
        action,
        title: token.to_string(),
    })
}
