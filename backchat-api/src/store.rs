use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    AuthToken, Comment, CommentId, EditComment, Error, NewComment, NewReaction, Reaction,
    SubjectId,
};

/// Contract to the backing comment store.
///
/// Every operation carries the bearer token of an active session. The store
/// is the sole arbiter of conflicts; in particular it enforces at most one
/// reaction row per `(comment, user, emoji)` triple.
#[async_trait]
pub trait Store {
    /// All non-deleted comments of one subject, joined with author profile,
    /// mentions and reactions, ordered by creation time ascending.
    async fn list_comments(
        &mut self,
        token: AuthToken,
        subject: SubjectId,
    ) -> Result<Vec<Comment>, Error>;

    /// Inserts a comment; its parent, if any, must already exist. Returns
    /// the created row in the joined shape.
    async fn create_comment(&mut self, token: AuthToken, c: NewComment) -> Result<Comment, Error>;

    /// Rewrites a comment's content and replaces its full mention set.
    async fn edit_comment(&mut self, token: AuthToken, e: EditComment) -> Result<Comment, Error>;

    /// Soft delete: the row is kept and marked with a deletion timestamp,
    /// which excludes it from every read path. Replies are not touched.
    async fn delete_comment(&mut self, token: AuthToken, comment: CommentId) -> Result<(), Error>;

    /// Fails with [`Error::AlreadyReacted`] when this user already has this
    /// emoji on this comment.
    async fn add_reaction(&mut self, token: AuthToken, r: NewReaction) -> Result<Reaction, Error>;

    async fn remove_reaction(&mut self, token: AuthToken, r: NewReaction) -> Result<(), Error>;
}

/// Lets several clients share a single store behind a lock.
#[async_trait]
impl<S: Store + Send> Store for Arc<Mutex<S>> {
    async fn list_comments(
        &mut self,
        token: AuthToken,
        subject: SubjectId,
    ) -> Result<Vec<Comment>, Error> {
        self.lock().await.list_comments(token, subject).await
    }

    async fn create_comment(&mut self, token: AuthToken, c: NewComment) -> Result<Comment, Error> {
        self.lock().await.create_comment(token, c).await
    }

    async fn edit_comment(&mut self, token: AuthToken, e: EditComment) -> Result<Comment, Error> {
        self.lock().await.edit_comment(token, e).await
    }

    async fn delete_comment(&mut self, token: AuthToken, comment: CommentId) -> Result<(), Error> {
        self.lock().await.delete_comment(token, comment).await
    }

    async fn add_reaction(&mut self, token: AuthToken, r: NewReaction) -> Result<Reaction, Error> {
        self.lock().await.add_reaction(token, r).await
    }

    async fn remove_reaction(&mut self, token: AuthToken, r: NewReaction) -> Result<(), Error> {
        self.lock().await.remove_reaction(token, r).await
    }
}
