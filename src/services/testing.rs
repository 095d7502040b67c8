//! In-memory stand-ins for the remote service, shared by service and handler tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use crate::domain::entities::{RemoteRepository, UserSession};
use crate::domain::value_objects::AccessToken;
use crate::infrastructure::sqlite::{memory_pool, repository_repo::SqliteMirrorRepository};
use crate::ports::remote::RemoteRepositoryPort;
use crate::shared::error::DashError;
use crate::shared::result::Result;

pub fn remote_repo(name: &str) -> RemoteRepository {
    RemoteRepository {
        name: name.to_string(),
        html_url: format!("https://github.com/alice/{}", name),
        owner: "alice".to_string(),
    }
}

pub fn alice() -> UserSession {
    UserSession {
        access_token: AccessToken::new("tok"),
        username: "alice".to_string(),
    }
}

pub async fn mirror() -> Arc<SqliteMirrorRepository> {
    Arc::new(SqliteMirrorRepository::new(memory_pool().await))
}

pub struct FakeRemote {
    pub repos: Mutex<Vec<RemoteRepository>>,
    pub delete_status: Option<u16>,
    pub rename_status: Option<u16>,
    pub owned: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeRemote {
    pub fn with_repos(names: &[&str]) -> Self {
        Self {
            repos: Mutex::new(names.iter().map(|n| remote_repo(n)).collect()),
            delete_status: None,
            rename_status: None,
            owned: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RemoteRepositoryPort for FakeRemote {
    async fn current_user(&self, _token: &AccessToken) -> Result<String> {
        Ok("alice".to_string())
    }

    async fn list_all(&self, _token: &AccessToken) -> Result<Vec<RemoteRepository>> {
        self.record("list".to_string());
        Ok(self.repos.lock().unwrap().clone())
    }

    async fn delete(&self, _token: &AccessToken, owner: &str, name: &str) -> Result<()> {
        self.record(format!("delete {}/{}", owner, name));
        match self.delete_status {
            Some(status) => Err(DashError::RemoteStatus { action: "delete", status }),
            None => Ok(()),
        }
    }

    async fn rename(
        &self,
        _token: &AccessToken,
        owner: &str,
        name: &str,
        new_name: &str,
    ) -> Result<RemoteRepository> {
        self.record(format!("rename {}/{} -> {}", owner, name, new_name));
        match self.rename_status {
            Some(status) => Err(DashError::RemoteStatus { action: "rename", status }),
            None => Ok(remote_repo(new_name)),
        }
    }

    async fn owner_login(&self, _token: &AccessToken, owner: &str, name: &str) -> Result<String> {
        self.record(format!("owner {}/{}", owner, name));
        let login = if self.owned { "alice" } else { "mallory" };
        Ok(login.to_string())
    }
}
