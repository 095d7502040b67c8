use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::domain::entities::{MirroredRepository, RemoteRepository, SyncReport, UserSession};
use crate::domain::value_objects::{MAX_NAME_LEN, MAX_URL_LEN};
use crate::ports::remote::RemoteRepositoryPort;
use crate::ports::repository::MirrorPort;
use crate::shared::result::Result;

/// 镜像同步 - 以远程列表为准对本地表做集合对账
pub struct MirrorSync {
    mirror: Arc<dyn MirrorPort>,
    remote: Arc<dyn RemoteRepositoryPort>,
}

impl MirrorSync {
    pub fn new(mirror: Arc<dyn MirrorPort>, remote: Arc<dyn RemoteRepositoryPort>) -> Self {
        Self { mirror, remote }
    }

    /// 拉取远程仓库列表并对账
    pub async fn sync(&self, session: &UserSession) -> Result<SyncReport> {
        let remote = self.remote.list_all(&session.access_token).await?;
        let report = self.reconcile(remote).await?;

        if report.is_noop() {
            info!("Mirror for {} is already up to date", session.username);
            return Ok(report);
        }
        info!(
            "Mirror sync for {}: {} inserted, {} updated, {} removed, {} skipped",
            session.username, report.inserted, report.updated, report.removed, report.skipped
        );
        Ok(report)
    }

    /// 远程有而本地没有的插入，地址变化的更新，本地多出的和重名的删除
    pub async fn reconcile(&self, remote: Vec<RemoteRepository>) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        let mut wanted: HashMap<String, String> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        for repo in remote {
            if repo.name.chars().count() > MAX_NAME_LEN || repo.html_url.chars().count() > MAX_URL_LEN {
                warn!("Skipping repository {} with oversized name or url", repo.name);
                report.skipped += 1;
                continue;
            }
            if wanted.contains_key(&repo.name) {
                warn!("Skipping {} because a repository with the same name was already listed", repo.html_url);
                report.skipped += 1;
                continue;
            }
            order.push(repo.name.clone());
            wanted.insert(repo.name, repo.html_url);
        }

        // list_all 按 id 升序，重名时保留最早的一条
        let mut kept: HashSet<String> = HashSet::new();
        for local in self.mirror.list_all().await? {
            match wanted.get(&local.name) {
                Some(url) if !kept.contains(&local.name) => {
                    if *url != local.url {
                        debug!("Updating url of {}", local.name);
                        self.mirror.update(local.id, &local.name, url).await?;
                        report.updated += 1;
                    }
                    kept.insert(local.name);
                }
                _ => {
                    debug!("Removing {} (id {}) from mirror", local.name, local.id);
                    self.mirror.delete(local.id).await?;
                    report.removed += 1;
                }
            }
        }

        for name in order {
            if kept.contains(&name) {
                continue;
            }
            let url = wanted.remove(&name).unwrap_or_default();
            self.mirror.insert(&MirroredRepository::new(name, url)).await?;
            report.inserted += 1;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{alice, mirror, remote_repo, FakeRemote};

    async fn names(store: &Arc<crate::infrastructure::sqlite::repository_repo::SqliteMirrorRepository>) -> Vec<String> {
        store.list_all().await.unwrap().into_iter().map(|r| r.name).collect()
    }

    #[tokio::test]
    async fn second_sync_without_remote_change_is_a_noop() {
        let store = mirror().await;
        let remote = Arc::new(FakeRemote::with_repos(&["a", "b", "c"]));
        let sync = MirrorSync::new(store.clone(), remote.clone());

        let first = sync.sync(&alice()).await.unwrap();
        assert_eq!(first.inserted, 3);

        let second = sync.sync(&alice()).await.unwrap();
        assert!(second.is_noop());
        assert_eq!(names(&store).await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn remote_wins_on_next_sync() {
        let store = mirror().await;
        let remote = Arc::new(FakeRemote::with_repos(&["keep", "moved", "gone"]));
        let sync = MirrorSync::new(store.clone(), remote.clone());
        sync.sync(&alice()).await.unwrap();

        {
            let mut repos = remote.repos.lock().unwrap();
            repos.retain(|r| r.name != "gone");
            for r in repos.iter_mut().filter(|r| r.name == "moved") {
                r.html_url = "https://github.com/alice/moved-elsewhere".to_string();
            }
            repos.push(remote_repo("fresh"));
        }

        let report = sync.sync(&alice()).await.unwrap();
        assert_eq!(report, SyncReport { inserted: 1, updated: 1, removed: 1, skipped: 0 });
        assert_eq!(names(&store).await, vec!["keep", "moved", "fresh"]);

        let moved = store.find_by_name("moved").await.unwrap().unwrap();
        assert_eq!(moved.url, "https://github.com/alice/moved-elsewhere");
    }

    #[tokio::test]
    async fn duplicate_local_names_collapse_to_lowest_id() {
        let store = mirror().await;
        let first = store
            .insert(&MirroredRepository::new("dup".to_string(), "https://github.com/alice/dup".to_string()))
            .await
            .unwrap();
        store
            .insert(&MirroredRepository::new("dup".to_string(), "https://github.com/alice/dup".to_string()))
            .await
            .unwrap();

        let sync = MirrorSync::new(store.clone(), Arc::new(FakeRemote::with_repos(&["dup"])));
        let report = sync.reconcile(vec![remote_repo("dup")]).await.unwrap();

        assert_eq!(report.removed, 1);
        let rows = store.list_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, first);
    }

    #[tokio::test]
    async fn oversized_entries_are_skipped() {
        let store = mirror().await;
        let sync = MirrorSync::new(store.clone(), Arc::new(FakeRemote::with_repos(&[])));
        let long = remote_repo(&"x".repeat(101));

        let report = sync.reconcile(vec![long, remote_repo("ok")]).await.unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.inserted, 1);
        assert_eq!(names(&store).await, vec!["ok"]);
    }

    #[tokio::test]
    async fn repeated_remote_names_are_counted_as_skipped() {
        let store = mirror().await;
        let sync = MirrorSync::new(store.clone(), Arc::new(FakeRemote::with_repos(&[])));
        let mut other = remote_repo("tool");
        other.html_url = "https://github.com/acme/tool".to_string();
        other.owner = "acme".to_string();

        let report = sync.reconcile(vec![other, remote_repo("tool")]).await.unwrap();
        assert_eq!(report, SyncReport { inserted: 1, updated: 0, removed: 0, skipped: 1 });

        let rows = store.list_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, "https://github.com/acme/tool");
    }
}
