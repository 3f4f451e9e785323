use crate::api::{self, CommentId, Mention, Reaction, SubjectId, Time, UserId};

/// Name shown when the author's profile join was absent from the row.
pub const UNKNOWN_USER: &str = "Unknown User";

/// One node of a comment tree.
///
/// Produced from the flat wire shape by `From<api::Comment>`; `replies` is
/// only ever populated by [`crate::build_forest`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment {
    pub id: CommentId,
    pub subject_id: SubjectId,
    pub author_id: UserId,
    pub parent_id: Option<CommentId>,
    pub content: String,
    pub created_at: Time,
    pub updated_at: Time,
    pub is_edited: bool,
    pub user_name: String,
    pub user_avatar: Option<String>,
    pub mentions: Vec<Mention>,
    pub reactions: Vec<Reaction>,

    /// Child comments in chronological order.
    pub replies: Vec<Comment>,
}

impl From<api::Comment> for Comment {
    fn from(c: api::Comment) -> Comment {
        Comment {
            id: c.id,
            subject_id: c.subject_id,
            author_id: c.author_id,
            parent_id: c.parent_id,
            content: c.content,
            created_at: c.created_at,
            updated_at: c.updated_at,
            is_edited: c.is_edited,
            user_name: c.user_name.unwrap_or_else(|| String::from(UNKNOWN_USER)),
            user_avatar: c.user_avatar,
            mentions: c.mentions,
            reactions: c.reactions,
            replies: Vec::new(),
        }
    }
}

impl Comment {
    /// Looks up a comment anywhere in the forest.
    ///
    /// Walks with an explicit stack: nesting depth is user data and must not
    /// bound the call stack.
    pub fn find_in<'a>(roots: &'a mut Vec<Comment>, id: &CommentId) -> Option<&'a mut Comment> {
        let mut stack: Vec<&'a mut Comment> = roots.iter_mut().collect();
        while let Some(c) = stack.pop() {
            if c.id == *id {
                return Some(c);
            }
            stack.extend(c.replies.iter_mut());
        }
        None
    }

    /// Detaches the comment with this id, subtree included, from the forest.
    /// Returns false when the id was not present.
    pub fn remove_from(roots: &mut Vec<Comment>, id: &CommentId) -> bool {
        if let Some(i) = roots.iter().position(|c| c.id == *id) {
            roots.remove(i);
            return true;
        }
        let mut stack: Vec<&mut Comment> = roots.iter_mut().collect();
        while let Some(c) = stack.pop() {
            if let Some(i) = c.replies.iter().position(|r| r.id == *id) {
                c.replies.remove(i);
                return true;
            }
            stack.extend(c.replies.iter_mut());
        }
        false
    }

    /// Total number of comments in the forest, replies included.
    pub fn count(roots: &[Comment]) -> usize {
        let mut stack: Vec<&Comment> = roots.iter().collect();
        let mut n = 0;
        while let Some(c) = stack.pop() {
            n += 1;
            stack.extend(c.replies.iter());
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Uuid;
    use chrono::{TimeZone, Utc};

    fn row(user_name: Option<&str>) -> api::Comment {
        api::Comment {
            id: CommentId(Uuid::new_v4()),
            subject_id: SubjectId::stub(),
            author_id: UserId::stub(),
            parent_id: None,
            content: String::from("hello"),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            updated_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            is_edited: false,
            deleted_at: None,
            user_name: user_name.map(String::from),
            user_avatar: None,
            mentions: vec![],
            reactions: vec![],
        }
    }

    #[test]
    fn transform_defaults_missing_author_join() {
        let c = Comment::from(row(None));
        assert_eq!(c.user_name, UNKNOWN_USER);
        assert!(c.replies.is_empty());

        let c = Comment::from(row(Some("alice")));
        assert_eq!(c.user_name, "alice");
    }

    #[test]
    fn missing_nested_arrays_deserialize_as_empty() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "subject_id": "00000000-0000-0000-0000-000000000002",
            "author_id": "00000000-0000-0000-0000-000000000003",
            "parent_id": null,
            "content": "hi",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z",
            "is_edited": false,
            "deleted_at": null,
            "user_name": null,
            "user_avatar": null
        }"#;
        let row: api::Comment = serde_json::from_str(json).unwrap();
        assert!(row.mentions.is_empty());
        assert!(row.reactions.is_empty());
    }
}
