//! Wire types for identity, roles, and role-scoped menus.
//!
//! DESIGN
//! ======
//! The backend is loose about shapes: ids arrive as strings or numbers,
//! `role` is either an inline object or a bare string, and payloads may or
//! may not sit under a `data` envelope. Parsing absorbs that here so the
//! session code sees one shape.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Role record as returned inline on a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A user's role: either the full record or a bare reference string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRole {
    Inline(Role),
    Ref(String),
}

impl UserRole {
    /// Display name: the record's `name`, or the raw reference string.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Inline(role) => &role.name,
            Self::Ref(raw) => raw,
        }
    }
}

/// Authenticated user identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub role_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Node in the role-scoped navigation tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuNode {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permission_list: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<MenuNode>,
}

/// Flatten permission keys from top-level nodes and their direct children.
///
/// Grandchildren are not visited. First occurrence wins; duplicates drop.
#[must_use]
pub fn flatten_permissions(menus: &[MenuNode]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |key: &String| {
        if !out.contains(key) {
            out.push(key.clone());
        }
    };
    for node in menus {
        node.permission_list.iter().for_each(&mut push);
        for child in &node.children {
            child.permission_list.iter().for_each(&mut push);
        }
    }
    out
}

/// Credentials extracted from a login response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginPayload {
    pub token: String,
    pub user: User,
}

/// Unwrap an optional `data` envelope.
#[must_use]
pub fn unwrap_data(body: &Value) -> &Value {
    match body.get("data") {
        Some(inner) if !inner.is_null() => inner,
        _ => body,
    }
}

/// Extract token + user from `{data:{token,user}}` or `{token,user}`.
///
/// `token` may be a string or `{AccessToken: string}`. Returns `None` when
/// either piece is missing, empty, or malformed.
#[must_use]
pub fn parse_login_response(body: &Value) -> Option<LoginPayload> {
    let data = unwrap_data(body);
    let token = match data.get("token")? {
        Value::String(s) => s.clone(),
        Value::Object(obj) => obj.get("AccessToken")?.as_str()?.to_owned(),
        _ => return None,
    };
    if token.is_empty() {
        return None;
    }
    let user_value = data.get("user").filter(|v| !v.is_null())?;
    let user = User::deserialize(user_value).ok()?;
    Some(LoginPayload { token, user })
}

/// Parse a menu list from a bare array or a `data` envelope.
///
/// # Errors
///
/// Returns the serde error if the payload is not a menu list.
pub fn parse_menu_response(body: &Value) -> Result<Vec<MenuNode>, serde_json::Error> {
    let data = unwrap_data(body);
    if data.is_null() {
        return Ok(Vec::new());
    }
    Vec::<MenuNode>::deserialize(data)
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("expected string or number, got {other}"))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
