use crate::{
    api::{
        AuthToken, CommentId, EditComment, Error, NewComment, NewReaction, Store, SubjectId,
        UserId,
    },
    build_forest, Comment, Notification, Notifier,
};

/// Client-side view of one subject's comment thread.
///
/// Owns a read-through cache of the store's rows, optimistically patched on
/// mutation and replaced wholesale on reload. The store handle is injected
/// at construction, never looked up ambiently. All operations take
/// `&mut self`, so at most one mutation per thread is ever in flight.
pub struct Thread<S, N> {
    subject: SubjectId,
    session: Option<AuthToken>,
    store: S,
    notifier: N,
    comments: Vec<Comment>,
    loading: bool,
    submitting: bool,
}

impl<S: Store, N: Notifier> Thread<S, N> {
    pub fn new(subject: SubjectId, store: S, notifier: N) -> Thread<S, N> {
        Thread {
            subject,
            session: None,
            store,
            notifier,
            comments: Vec::new(),
            loading: false,
            submitting: false,
        }
    }

    pub fn with_session(
        subject: SubjectId,
        store: S,
        notifier: N,
        token: AuthToken,
    ) -> Thread<S, N> {
        let mut t = Thread::new(subject, store, notifier);
        t.session = Some(token);
        t
    }

    pub fn set_session(&mut self, token: Option<AuthToken>) {
        self.session = token;
    }

    pub fn subject(&self) -> SubjectId {
        self.subject
    }

    /// The current forest of root comments.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn token(&self) -> Result<AuthToken, Error> {
        self.session.ok_or(Error::NotLoggedIn)
    }

    fn fail(&mut self, action: &str, err: Error) -> Error {
        tracing::error!(?err, action, "comment operation failed");
        self.notifier
            .notify(Notification::error(format!("Failed to {action}: {err}")));
        err
    }

    /// Replaces local state with the store's current truth.
    ///
    /// On failure the previous forest is kept as-is.
    pub async fn load(&mut self) -> Result<(), Error> {
        let token = match self.token() {
            Ok(t) => t,
            Err(e) => return Err(self.fail("load comments", e)),
        };
        self.loading = true;
        let res = self.store.list_comments(token, self.subject).await;
        self.loading = false;
        match res {
            Ok(rows) => {
                self.comments = build_forest(rows.into_iter().map(Comment::from).collect());
                Ok(())
            }
            Err(e) => Err(self.fail("load comments", e)),
        }
    }

    /// Creates a comment, optionally as a reply to `parent_id`.
    ///
    /// The new comment is patched into the local forest on success. When the
    /// parent is not present locally the store write stands anyway; the
    /// local tree catches up on the next [`Thread::load`].
    pub async fn create(
        &mut self,
        content: &str,
        parent_id: Option<CommentId>,
        mentions: Vec<UserId>,
    ) -> Result<CommentId, Error> {
        let content = content.trim();
        if content.is_empty() {
            return Err(self.fail("add comment", Error::EmptyContent));
        }
        let token = match self.token() {
            Ok(t) => t,
            Err(e) => return Err(self.fail("add comment", e)),
        };
        let new = NewComment::new(self.subject, parent_id, String::from(content), mentions);
        if let Err(e) = new.validate() {
            return Err(self.fail("add comment", e));
        }
        self.submitting = true;
        let res = self.store.create_comment(token, new).await;
        self.submitting = false;
        match res {
            Ok(row) => {
                let comment = Comment::from(row);
                let id = comment.id;
                match parent_id {
                    None => self.comments.push(comment),
                    Some(p) => match Comment::find_in(&mut self.comments, &p) {
                        Some(parent) => parent.replies.push(comment),
                        None => {
                            tracing::debug!(parent = ?p, "created reply under a parent not in the local tree");
                        }
                    },
                }
                self.notifier.notify(Notification::success("Comment added"));
                Ok(id)
            }
            Err(e) => Err(self.fail("add comment", e)),
        }
    }

    /// Edits a comment's content and replaces its mention set, then reloads
    /// so `is_edited`, `updated_at` and the mentions reflect store truth.
    pub async fn update(
        &mut self,
        comment_id: CommentId,
        content: &str,
        mentions: Vec<UserId>,
    ) -> Result<(), Error> {
        let content = content.trim();
        if content.is_empty() {
            return Err(self.fail("update comment", Error::EmptyContent));
        }
        let token = match self.token() {
            Ok(t) => t,
            Err(e) => return Err(self.fail("update comment", e)),
        };
        let edit = EditComment {
            comment_id,
            content: String::from(content),
            mentions,
        };
        if let Err(e) = edit.validate() {
            return Err(self.fail("update comment", e));
        }
        self.submitting = true;
        let res = self.store.edit_comment(token, edit).await;
        self.submitting = false;
        if let Err(e) = res {
            return Err(self.fail("update comment", e));
        }
        self.load().await?;
        self.notifier
            .notify(Notification::success("Comment updated"));
        Ok(())
    }

    /// Soft-deletes a comment and drops it from the local forest. Replies
    /// are not deleted; the next reload surfaces them as orphaned roots.
    pub async fn delete(&mut self, comment_id: CommentId) -> Result<(), Error> {
        let token = match self.token() {
            Ok(t) => t,
            Err(e) => return Err(self.fail("delete comment", e)),
        };
        self.submitting = true;
        let res = self.store.delete_comment(token, comment_id).await;
        self.submitting = false;
        match res {
            Ok(()) => {
                Comment::remove_from(&mut self.comments, &comment_id);
                self.notifier
                    .notify(Notification::success("Comment deleted"));
                Ok(())
            }
            Err(e) => Err(self.fail("delete comment", e)),
        }
    }

    /// Toggles this user's `emoji` reaction on a comment.
    ///
    /// The store's conflict answer on a duplicate triple is taken to mean
    /// the user wants the reaction retracted, and a removal is issued
    /// instead; local reaction state is never consulted.
    pub async fn react(&mut self, comment_id: CommentId, emoji: &str) -> Result<(), Error> {
        let token = match self.token() {
            Ok(t) => t,
            Err(e) => return Err(self.fail("add reaction", e)),
        };
        let r = NewReaction {
            comment_id,
            emoji: String::from(emoji),
        };
        match self.store.add_reaction(token, r.clone()).await {
            Ok(_) => (),
            Err(Error::AlreadyReacted { .. }) => {
                if let Err(e) = self.store.remove_reaction(token, r).await {
                    return Err(self.fail("remove reaction", e));
                }
            }
            Err(e) => return Err(self.fail("add reaction", e)),
        }
        self.load().await
    }

    /// Removes this user's `emoji` reaction from a comment, then reloads.
    pub async fn unreact(&mut self, comment_id: CommentId, emoji: &str) -> Result<(), Error> {
        let token = match self.token() {
            Ok(t) => t,
            Err(e) => return Err(self.fail("remove reaction", e)),
        };
        let r = NewReaction {
            comment_id,
            emoji: String::from(emoji),
        };
        if let Err(e) = self.store.remove_reaction(token, r).await {
            return Err(self.fail("remove reaction", e));
        }
        self.load().await
    }
}
