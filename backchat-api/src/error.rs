use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde_json::json;
use uuid::Uuid;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Not authenticated")]
    NotLoggedIn,

    #[error("No record with id {0}")]
    NotFound(Uuid),

    #[error("Comment content cannot be empty")]
    EmptyContent,

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Invalid user name {0:?}")]
    InvalidName(String),

    #[error("Uuid already used {0}")]
    UuidAlreadyUsed(Uuid),

    #[error("Name already used {0}")]
    NameAlreadyUsed(String),

    #[error("Reaction {emoji:?} already recorded on comment {comment}")]
    AlreadyReacted { comment: Uuid, emoji: String },
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::NotLoggedIn => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::EmptyContent => StatusCode::BAD_REQUEST,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
            Error::InvalidName(_) => StatusCode::BAD_REQUEST,
            Error::UuidAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::NameAlreadyUsed(_) => StatusCode::CONFLICT,
            Error::AlreadyReacted { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::NotLoggedIn => json!({
                "message": "not authenticated",
                "type": "not-logged-in",
            }),
            Error::NotFound(id) => json!({
                "message": "record not found",
                "type": "not-found",
                "id": id,
            }),
            Error::EmptyContent => json!({
                "message": "comment content cannot be empty",
                "type": "empty-content",
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
            Error::InvalidName(n) => json!({
                "message": "there was an invalid character in a user name",
                "type": "invalid-name",
                "name": n,
            }),
            Error::UuidAlreadyUsed(u) => json!({
                "message": "uuid conflict",
                "type": "conflict-uuid",
                "uuid": u,
            }),
            Error::NameAlreadyUsed(n) => json!({
                "message": "name already used",
                "type": "conflict-name",
                "name": n,
            }),
            Error::AlreadyReacted { comment, emoji } => json!({
                "message": "this user already reacted with this emoji",
                "type": "conflict-reaction",
                "comment": comment,
                "emoji": emoji,
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        let get_str = |field: &str| -> Option<&str> { data.get(field).and_then(|v| v.as_str()) };
        let get_uuid = |field: &str| -> Option<Uuid> {
            get_str(field).and_then(|u| Uuid::from_str(u).ok())
        };
        Ok(
            match get_str("type").ok_or_else(|| anyhow!("error type is not a string"))? {
                "unknown" => Error::Unknown(String::from(get_str("message").unwrap_or(""))),
                "permission-denied" => Error::PermissionDenied,
                "not-logged-in" => Error::NotLoggedIn,
                "not-found" => Error::NotFound(
                    get_uuid("id").ok_or_else(|| anyhow!("not-found error without an id"))?,
                ),
                "empty-content" => Error::EmptyContent,
                "null-byte" => Error::NullByteInString(String::from(get_str("string").ok_or_else(
                    || anyhow!("error is a null-byte-in-string without a string"),
                )?)),
                "invalid-name" => Error::InvalidName(String::from(get_str("name").ok_or_else(
                    || anyhow!("error is about an invalid name but no name was provided"),
                )?)),
                "conflict-uuid" => Error::UuidAlreadyUsed(
                    get_uuid("uuid")
                        .ok_or_else(|| anyhow!("error is a uuid conflict without a proper uuid"))?,
                ),
                "conflict-name" => Error::NameAlreadyUsed(String::from(
                    get_str("name")
                        .ok_or_else(|| anyhow!("error is a name conflict without a name"))?,
                )),
                "conflict-reaction" => Error::AlreadyReacted {
                    comment: get_uuid("comment").ok_or_else(|| {
                        anyhow!("error is a reaction conflict without a comment id")
                    })?,
                    emoji: String::from(get_str("emoji").ok_or_else(|| {
                        anyhow!("error is a reaction conflict without an emoji")
                    })?),
                },
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_round_trip_through_json() {
        let errors = vec![
            Error::Unknown(String::from("boom")),
            Error::PermissionDenied,
            Error::NotLoggedIn,
            Error::NotFound(Uuid::new_v4()),
            Error::EmptyContent,
            Error::NullByteInString(String::from("a\0b")),
            Error::InvalidName(String::from("  ")),
            Error::UuidAlreadyUsed(Uuid::new_v4()),
            Error::NameAlreadyUsed(String::from("alice")),
            Error::AlreadyReacted {
                comment: Uuid::new_v4(),
                emoji: String::from("👍"),
            },
        ];
        for e in errors {
            assert_eq!(Error::parse(&e.contents()).unwrap(), e);
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Error::parse(b"not even json").is_err());
        assert!(Error::parse(br#"{"type": "no-such-type"}"#).is_err());
        assert!(Error::parse(br#"{"message": "typeless"}"#).is_err());
    }
}
