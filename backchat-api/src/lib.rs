use chrono::Utc;

mod auth;
mod comment;
mod error;
mod feed;
mod store;

pub use auth::{AuthToken, NewSession, NewUser};
pub use comment::{
    Comment, CommentId, EditComment, Mention, MentionId, NewComment, NewReaction, Reaction,
    ReactionId, SubjectId,
};
pub use error::Error;
pub use feed::{ChangeKind, FeedMessage};
pub use store::Store;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn stub() -> UserId {
        UserId(STUB_UUID)
    }
}

pub fn validate_string(s: &str) -> Result<(), Error> {
    match s.contains('\0') {
        true => Err(Error::NullByteInString(String::from(s))),
        false => Ok(()),
    }
}
