use async_trait::async_trait;

use crate::api::{
    self, AuthToken, CommentId, EditComment, Error, NewComment, NewReaction, NewSession, Store,
    SubjectId,
};

/// [`Store`] implementation over the HTTP routes of the comment service.
#[derive(Clone, Debug)]
pub struct HttpStore {
    host: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(host: String) -> HttpStore {
        HttpStore {
            host,
            client: reqwest::Client::new(),
        }
    }

    pub async fn auth(&self, session: NewSession) -> Result<AuthToken, Error> {
        session.validate()?;
        let resp = self
            .client
            .post(format!("{}/api/auth", self.host))
            .json(&session)
            .send()
            .await
            .map_err(transport)?;
        parse_json(resp).await
    }

    pub async fn unauth(&self, token: AuthToken) -> Result<(), Error> {
        let resp = self
            .client
            .post(format!("{}/api/unauth", self.host))
            .bearer_auth(token.0)
            .send()
            .await
            .map_err(transport)?;
        parse_empty(resp).await
    }
}

fn transport(err: reqwest::Error) -> Error {
    Error::Unknown(format!("transport error: {err}"))
}

async fn parse_error(resp: reqwest::Response) -> Error {
    let body = match resp.bytes().await {
        Ok(b) => b,
        Err(e) => return transport(e),
    };
    Error::parse(&body)
        .unwrap_or_else(|err| Error::Unknown(format!("unparseable error response: {err:?}")))
}

async fn parse_json<R>(resp: reqwest::Response) -> Result<R, Error>
where
    R: for<'de> serde::Deserialize<'de>,
{
    if !resp.status().is_success() {
        return Err(parse_error(resp).await);
    }
    resp.json().await.map_err(transport)
}

async fn parse_empty(resp: reqwest::Response) -> Result<(), Error> {
    if !resp.status().is_success() {
        return Err(parse_error(resp).await);
    }
    Ok(())
}

#[async_trait]
impl Store for HttpStore {
    async fn list_comments(
        &mut self,
        token: AuthToken,
        subject: SubjectId,
    ) -> Result<Vec<api::Comment>, Error> {
        let resp = self
            .client
            .get(format!("{}/api/comments", self.host))
            .query(&[("subject", subject.0)])
            .bearer_auth(token.0)
            .send()
            .await
            .map_err(transport)?;
        parse_json(resp).await
    }

    async fn create_comment(
        &mut self,
        token: AuthToken,
        c: NewComment,
    ) -> Result<api::Comment, Error> {
        let resp = self
            .client
            .post(format!("{}/api/comments", self.host))
            .bearer_auth(token.0)
            .json(&c)
            .send()
            .await
            .map_err(transport)?;
        parse_json(resp).await
    }

    async fn edit_comment(
        &mut self,
        token: AuthToken,
        e: EditComment,
    ) -> Result<api::Comment, Error> {
        let resp = self
            .client
            .patch(format!("{}/api/comments", self.host))
            .bearer_auth(token.0)
            .json(&e)
            .send()
            .await
            .map_err(transport)?;
        parse_json(resp).await
    }

    async fn delete_comment(&mut self, token: AuthToken, comment: CommentId) -> Result<(), Error> {
        let resp = self
            .client
            .delete(format!("{}/api/comments/{}", self.host, comment.0))
            .bearer_auth(token.0)
            .send()
            .await
            .map_err(transport)?;
        parse_empty(resp).await
    }

    async fn add_reaction(
        &mut self,
        token: AuthToken,
        r: NewReaction,
    ) -> Result<api::Reaction, Error> {
        let resp = self
            .client
            .post(format!("{}/api/reactions", self.host))
            .bearer_auth(token.0)
            .json(&r)
            .send()
            .await
            .map_err(transport)?;
        parse_json(resp).await
    }

    async fn remove_reaction(&mut self, token: AuthToken, r: NewReaction) -> Result<(), Error> {
        let resp = self
            .client
            .delete(format!("{}/api/reactions", self.host))
            .bearer_auth(token.0)
            .json(&r)
            .send()
            .await
            .map_err(transport)?;
        parse_empty(resp).await
    }
}
