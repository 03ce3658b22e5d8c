//! Method descriptor records, as produced by `flickr.reflection.getMethodInfo`.
//!
//! Flickr reports flags and permission levels as numbers, numeric strings or
//! names depending on the endpoint and format; all of them are accepted.

use serde::{Deserialize, Deserializer, Serialize};

// == Permission ==
/// Minimum permission a token needs to call a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    None,
    Read,
    Write,
    Delete,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::None => "none",
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Delete => "delete",
        }
    }

    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Permission::None),
            1 => Some(Permission::Read),
            2 => Some(Permission::Write),
            3 => Some(Permission::Delete),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(Permission::None),
            "read" => Some(Permission::Read),
            "write" => Some(Permission::Write),
            "delete" => Some(Permission::Delete),
            other => other.parse().ok().and_then(Self::from_code),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match Raw::deserialize(deserializer)? {
            Raw::Int(code) => Permission::from_code(code),
            Raw::Text(name) => Permission::from_name(&name),
            Raw::Bool(_) => None,
        };
        parsed.ok_or_else(|| serde::de::Error::custom("unexpected permission value"))
    }
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => Ok(b),
        Raw::Int(i) => Ok(i != 0),
        Raw::Text(s) => match s.trim() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(serde::de::Error::custom(format!("unexpected flag value: {}", other))),
        },
    }
}

fn code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Raw::deserialize(deserializer)? {
        Raw::Int(i) => Ok(i),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("unexpected error code: {}", s))),
        Raw::Bool(_) => Err(serde::de::Error::custom("unexpected error code")),
    }
}

// == Argument ==
/// One method argument.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Argument {
    pub name: String,
    #[serde(deserialize_with = "flag", default)]
    pub optional: bool,
    /// Description; `_content` in Flickr's raw JSON
    #[serde(default, alias = "_content")]
    pub text: String,
}

// == Error Code ==
/// A method-specific error.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorCode {
    #[serde(deserialize_with = "code")]
    pub code: i64,
    /// Short description
    pub message: String,
    /// Long description
    #[serde(default, alias = "_content")]
    pub text: String,
}

// == Method Descriptor ==
/// Everything known about one remote method.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MethodDescriptor {
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "flag", default)]
    pub needslogin: bool,
    #[serde(deserialize_with = "flag", default)]
    pub needssigning: bool,
    #[serde(default)]
    pub requiredperms: Permission,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default)]
    pub errors: Vec<ErrorCode>,
    /// Example response payload
    #[serde(default)]
    pub response: Option<String>,
}

impl MethodDescriptor {
    pub fn required_arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter(|a| !a.optional)
    }

    pub fn error(&self, code: i64) -> Option<&ErrorCode> {
        self.errors.iter().find(|e| e.code == code)
    }
}
