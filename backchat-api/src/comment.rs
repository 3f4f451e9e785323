use uuid::Uuid;

use crate::{Error, Time, UserId, STUB_UUID};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct SubjectId(pub Uuid);

impl SubjectId {
    pub fn stub() -> SubjectId {
        SubjectId(STUB_UUID)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct MentionId(pub Uuid);

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct ReactionId(pub Uuid);

/// One comment row as the store returns it: joined with the author profile,
/// its mentions and its reactions. Reply nesting is a client-side concern and
/// never crosses the wire.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub subject_id: SubjectId,
    pub author_id: UserId,
    pub parent_id: Option<CommentId>,
    pub content: String,
    pub created_at: Time,
    pub updated_at: Time,
    pub is_edited: bool,
    pub deleted_at: Option<Time>,

    /// Display name of the author; absent when the profile join found nothing.
    pub user_name: Option<String>,
    pub user_avatar: Option<String>,

    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Mention {
    pub id: MentionId,
    pub comment_id: CommentId,
    pub user_id: UserId,
    pub user_name: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Reaction {
    pub id: ReactionId,
    pub comment_id: CommentId,
    pub user_id: UserId,
    pub emoji: String,
    pub created_at: Time,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub id: CommentId,
    pub subject_id: SubjectId,
    pub parent_id: Option<CommentId>,
    pub content: String,
    pub mentions: Vec<UserId>,
}

impl NewComment {
    pub fn new(
        subject_id: SubjectId,
        parent_id: Option<CommentId>,
        content: String,
        mentions: Vec<UserId>,
    ) -> NewComment {
        NewComment {
            id: CommentId(Uuid::new_v4()),
            subject_id,
            parent_id,
            content,
            mentions,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.content)?;
        if self.content.trim().is_empty() {
            return Err(Error::EmptyContent);
        }
        Ok(())
    }
}

/// Edits a comment's text and replaces its mention set wholesale; the old
/// mentions are dropped, never diffed against the new ones.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EditComment {
    pub comment_id: CommentId,
    pub content: String,
    pub mentions: Vec<UserId>,
}

impl EditComment {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.content)?;
        if self.content.trim().is_empty() {
            return Err(Error::EmptyContent);
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewReaction {
    pub comment_id: CommentId,
    pub emoji: String,
}

impl NewReaction {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.emoji)?;
        if self.emoji.trim().is_empty() {
            return Err(Error::EmptyContent);
        }
        Ok(())
    }
}
