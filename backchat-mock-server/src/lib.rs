use std::collections::{btree_map, BTreeMap, HashMap};

use async_trait::async_trait;
use backchat_api::{
    AuthToken, ChangeKind, Comment, CommentId, EditComment, Error, FeedMessage, Mention,
    MentionId, NewComment, NewReaction, NewSession, NewUser, Reaction, ReactionId, Store,
    SubjectId, Time, UserId, Uuid,
};
use chrono::Utc;
use futures::channel::mpsc;

/// In-memory comment store with the same observable contract as the real
/// one: soft delete, wholesale mention replacement, the reaction triple
/// constraint, and per-subject change feeds.
pub struct MockServer {
    users: BTreeMap<UserId, DbUser>,
    comments: BTreeMap<CommentId, DbComment>,
    mentions: Vec<DbMention>,
    reactions: Vec<DbReaction>,
    feeds: Vec<Feed>,
}

#[derive(Debug)]
struct DbUser {
    name: String,
    avatar: Option<String>,
    pass: String,
    sessions: HashMap<AuthToken, Device>,
}

#[derive(Debug)]
struct Device(String);

#[derive(Clone, Debug)]
struct DbComment {
    id: CommentId,
    subject_id: SubjectId,
    author_id: UserId,
    parent_id: Option<CommentId>,
    content: String,
    created_at: Time,
    updated_at: Time,
    is_edited: bool,
    deleted_at: Option<Time>,
}

#[derive(Debug)]
struct DbMention {
    id: MentionId,
    comment_id: CommentId,
    user_id: UserId,
}

#[derive(Debug)]
struct DbReaction {
    id: ReactionId,
    comment_id: CommentId,
    user_id: UserId,
    emoji: String,
    created_at: Time,
}

struct Feed {
    subject: SubjectId,
    sender: mpsc::UnboundedSender<FeedMessage>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            users: BTreeMap::new(),
            comments: BTreeMap::new(),
            mentions: Vec::new(),
            reactions: Vec::new(),
            feeds: Vec::new(),
        }
    }

    pub fn admin_create_user(&mut self, u: NewUser, password: String) -> Result<(), Error> {
        u.validate()?;
        if self.users.values().any(|db| db.name == u.name) {
            return Err(Error::NameAlreadyUsed(u.name));
        }
        match self.users.entry(u.id) {
            btree_map::Entry::Occupied(_) => Err(Error::UuidAlreadyUsed(u.id.0)),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(DbUser {
                    name: u.name,
                    avatar: u.avatar,
                    pass: password,
                    sessions: HashMap::new(),
                });
                Ok(())
            }
        }
    }

    pub fn auth(&mut self, s: NewSession) -> Result<AuthToken, Error> {
        s.validate()?;
        for u in self.users.values_mut() {
            if u.name == s.user {
                if s.password != u.pass {
                    return Err(Error::PermissionDenied);
                }
                let tok = AuthToken(Uuid::new_v4());
                u.sessions.insert(tok, Device(s.device));
                return Ok(tok);
            }
        }
        Err(Error::PermissionDenied)
    }

    pub fn unauth(&mut self, tok: AuthToken) -> Result<(), Error> {
        let (_, u) = self.resolve_mut(tok)?;
        u.sessions.remove(&tok);
        Ok(())
    }

    pub fn whoami(&self, tok: AuthToken) -> Result<UserId, Error> {
        self.resolve(tok)
    }

    /// Shortcut for tests: create a user and open a session for it.
    pub fn test_user(&mut self, name: &str) -> (UserId, AuthToken) {
        let id = UserId(Uuid::new_v4());
        self.admin_create_user(
            NewUser {
                id,
                name: String::from(name),
                avatar: None,
            },
            String::from("hunter2"),
        )
        .unwrap_or_else(|e| panic!("creating test user {name}: {e}"));
        let tok = self
            .auth(NewSession::new(
                String::from(name),
                String::from("hunter2"),
                String::from("tests"),
            ))
            .unwrap_or_else(|e| panic!("opening test session for {name}: {e}"));
        (id, tok)
    }

    /// Change feed scoped to one subject, in the shape the refresh bridge
    /// consumes. Dropped receivers are pruned on the next relay.
    pub fn change_feed(
        &mut self,
        tok: AuthToken,
        subject: SubjectId,
    ) -> Result<mpsc::UnboundedReceiver<FeedMessage>, Error> {
        self.resolve(tok)?;
        let (sender, receiver) = mpsc::unbounded();
        self.feeds.push(Feed { subject, sender });
        Ok(receiver)
    }

    fn resolve(&self, tok: AuthToken) -> Result<UserId, Error> {
        for (id, u) in self.users.iter() {
            if u.sessions.contains_key(&tok) {
                return Ok(*id);
            }
        }
        Err(Error::PermissionDenied)
    }

    fn resolve_mut(&mut self, tok: AuthToken) -> Result<(UserId, &mut DbUser), Error> {
        for (id, u) in self.users.iter_mut() {
            if u.sessions.contains_key(&tok) {
                return Ok((*id, u));
            }
        }
        Err(Error::PermissionDenied)
    }

    fn relay_change(&mut self, subject: SubjectId, kind: ChangeKind) {
        self.feeds.retain_mut(|f| {
            f.subject != subject || f.sender.unbounded_send(FeedMessage::Changed(kind)).is_ok()
        });
    }

    fn user_name(&self, id: &UserId) -> Option<String> {
        self.users.get(id).map(|u| u.name.clone())
    }

    fn joined(&self, c: &DbComment) -> Comment {
        Comment {
            id: c.id,
            subject_id: c.subject_id,
            author_id: c.author_id,
            parent_id: c.parent_id,
            content: c.content.clone(),
            created_at: c.created_at,
            updated_at: c.updated_at,
            is_edited: c.is_edited,
            deleted_at: c.deleted_at,
            user_name: self.user_name(&c.author_id),
            user_avatar: self.users.get(&c.author_id).and_then(|u| u.avatar.clone()),
            mentions: self
                .mentions
                .iter()
                .filter(|m| m.comment_id == c.id)
                .map(|m| Mention {
                    id: m.id,
                    comment_id: m.comment_id,
                    user_id: m.user_id,
                    user_name: self.user_name(&m.user_id),
                })
                .collect(),
            reactions: self
                .reactions
                .iter()
                .filter(|r| r.comment_id == c.id)
                .map(|r| Reaction {
                    id: r.id,
                    comment_id: r.comment_id,
                    user_id: r.user_id,
                    emoji: r.emoji.clone(),
                    created_at: r.created_at,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Store for MockServer {
    async fn list_comments(
        &mut self,
        token: AuthToken,
        subject: SubjectId,
    ) -> Result<Vec<Comment>, Error> {
        self.resolve(token)?;
        let mut rows: Vec<DbComment> = self
            .comments
            .values()
            .filter(|c| c.subject_id == subject && c.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.created_at);
        Ok(rows.iter().map(|c| self.joined(c)).collect())
    }

    async fn create_comment(&mut self, token: AuthToken, c: NewComment) -> Result<Comment, Error> {
        let author = self.resolve(token)?;
        c.validate()?;
        if self.comments.contains_key(&c.id) {
            return Err(Error::UuidAlreadyUsed(c.id.0));
        }
        if let Some(p) = c.parent_id {
            match self.comments.get(&p) {
                Some(parent) if parent.subject_id == c.subject_id => (),
                _ => return Err(Error::NotFound(p.0)),
            }
        }
        let now = Utc::now();
        let row = DbComment {
            id: c.id,
            subject_id: c.subject_id,
            author_id: author,
            parent_id: c.parent_id,
            content: String::from(c.content.trim()),
            created_at: now,
            updated_at: now,
            is_edited: false,
            deleted_at: None,
        };
        self.comments.insert(row.id, row.clone());
        for user_id in c.mentions {
            self.mentions.push(DbMention {
                id: MentionId(Uuid::new_v4()),
                comment_id: row.id,
                user_id,
            });
        }
        self.relay_change(row.subject_id, ChangeKind::Insert);
        Ok(self.joined(&row))
    }

    async fn edit_comment(&mut self, token: AuthToken, e: EditComment) -> Result<Comment, Error> {
        let user = self.resolve(token)?;
        e.validate()?;
        let row = match self.comments.get_mut(&e.comment_id) {
            Some(c) if c.deleted_at.is_none() => c,
            _ => return Err(Error::NotFound(e.comment_id.0)),
        };
        if row.author_id != user {
            return Err(Error::PermissionDenied);
        }
        row.content = String::from(e.content.trim());
        row.updated_at = Utc::now();
        row.is_edited = true;
        let row = row.clone();
        // Full replacement of the mention set, never a diff.
        self.mentions.retain(|m| m.comment_id != e.comment_id);
        for user_id in e.mentions {
            self.mentions.push(DbMention {
                id: MentionId(Uuid::new_v4()),
                comment_id: e.comment_id,
                user_id,
            });
        }
        self.relay_change(row.subject_id, ChangeKind::Update);
        Ok(self.joined(&row))
    }

    async fn delete_comment(&mut self, token: AuthToken, comment: CommentId) -> Result<(), Error> {
        let user = self.resolve(token)?;
        let row = match self.comments.get_mut(&comment) {
            Some(c) if c.deleted_at.is_none() => c,
            _ => return Err(Error::NotFound(comment.0)),
        };
        if row.author_id != user {
            return Err(Error::PermissionDenied);
        }
        row.deleted_at = Some(Utc::now());
        let subject = row.subject_id;
        self.relay_change(subject, ChangeKind::Delete);
        Ok(())
    }

    async fn add_reaction(&mut self, token: AuthToken, r: NewReaction) -> Result<Reaction, Error> {
        let user = self.resolve(token)?;
        r.validate()?;
        let subject = match self.comments.get(&r.comment_id) {
            Some(c) if c.deleted_at.is_none() => c.subject_id,
            _ => return Err(Error::NotFound(r.comment_id.0)),
        };
        if self
            .reactions
            .iter()
            .any(|row| row.comment_id == r.comment_id && row.user_id == user && row.emoji == r.emoji)
        {
            return Err(Error::AlreadyReacted {
                comment: r.comment_id.0,
                emoji: r.emoji,
            });
        }
        let row = DbReaction {
            id: ReactionId(Uuid::new_v4()),
            comment_id: r.comment_id,
            user_id: user,
            emoji: r.emoji,
            created_at: Utc::now(),
        };
        let reaction = Reaction {
            id: row.id,
            comment_id: row.comment_id,
            user_id: row.user_id,
            emoji: row.emoji.clone(),
            created_at: row.created_at,
        };
        self.reactions.push(row);
        self.relay_change(subject, ChangeKind::Insert);
        Ok(reaction)
    }

    async fn remove_reaction(&mut self, token: AuthToken, r: NewReaction) -> Result<(), Error> {
        let user = self.resolve(token)?;
        let idx = self
            .reactions
            .iter()
            .position(|row| {
                row.comment_id == r.comment_id && row.user_id == user && row.emoji == r.emoji
            })
            .ok_or(Error::NotFound(r.comment_id.0))?;
        self.reactions.remove(idx);
        if let Some(subject) = self.comments.get(&r.comment_id).map(|c| c.subject_id) {
            self.relay_change(subject, ChangeKind::Delete);
        }
        Ok(())
    }
}
