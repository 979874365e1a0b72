use async_trait::async_trait;
use survey_session_types::{CollaboratorError, Credential, CredentialProvider};

/// A `CredentialProvider` that always hands out the same bearer credential.
///
/// For frontends that receive an owner token up front instead of running an
/// interactive login.
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credential: Credential,
}

impl StaticCredentials {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::new(Credential::bearer(token))
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn obtain_credential(&self) -> Result<Credential, CollaboratorError> {
        Ok(self.credential.clone())
    }
}
