use uuid::Uuid;

use crate::{Error, UserId, STUB_UUID};

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct NewSession {
    pub user: String,
    pub password: String,
    pub device: String,
}

impl NewSession {
    pub fn new(user: String, password: String, device: String) -> NewSession {
        NewSession {
            user,
            password,
            device,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.user)?;
        crate::validate_string(&self.password)?;
        crate::validate_string(&self.device)?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AuthToken(pub Uuid);

impl AuthToken {
    pub fn stub() -> AuthToken {
        AuthToken(STUB_UUID)
    }
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub avatar: Option<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.name)?;
        if self.name.trim().is_empty() {
            return Err(Error::InvalidName(self.name.clone()));
        }
        if let Some(avatar) = &self.avatar {
            crate::validate_string(avatar)?;
        }
        Ok(())
    }
}
