//! JSON-file repository.
//!
//! The whole collection lives in memory and is rewritten to disk after every
//! mutation. Writers are serialized by an async mutex, so disk order equals
//! commit order. The snapshot is serialized and written on the blocking pool:
//! first to a temporary file in the same directory, which is then renamed over
//! the target, so a crash leaves either the old or the new snapshot. Readers
//! keep seeing the previous collection until the new snapshot is on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use parking_lot::RwLock;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use crate::contract::model::{Contact, ContactId, ContactPatch};
use crate::domain::repo::ContactsRepository;
use crate::infra::storage::entity::ContactRecord;
use crate::infra::storage::{snapshot, ContactMap};

/// Persisted layout: contact id → record.
type ContactsFile = BTreeMap<String, ContactRecord>;

pub struct FileContactsRepository {
    path: PathBuf,
    contacts: RwLock<ContactMap>,
    writer: Mutex<()>,
}

impl FileContactsRepository {
    /// Load `path`, or start empty if it does not exist yet. The parent
    /// directory is created on demand.
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create data dir {}", parent.display()))?;
        }
        let contacts = load(&path)?;
        Ok(Self {
            path,
            contacts: RwLock::new(contacts),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `f` to a copy of the collection. When `f` reports a change, the
    /// copy is written to disk and then published. `None` means nothing changed.
    async fn mutate<T>(
        &self,
        f: impl FnOnce(&mut ContactMap) -> anyhow::Result<Option<T>> + Send,
    ) -> anyhow::Result<Option<T>> {
        let _writer = self.writer.lock().await;

        let mut next = self.contacts.read().clone();
        let Some(out) = f(&mut next)? else {
            return Ok(None);
        };

        let path = self.path.clone();
        let next = tokio::task::spawn_blocking(move || {
            write_snapshot(&path, &next)?;
            Ok::<_, anyhow::Error>(next)
        })
        .await
        .context("contacts snapshot writer")??;

        *self.contacts.write() = next;
        Ok(Some(out))
    }
}

fn write_snapshot(path: &Path, contacts: &ContactMap) -> anyhow::Result<()> {
    let file: ContactsFile = contacts
        .iter()
        .map(|(id, c)| (id.to_string(), ContactRecord::from(c)))
        .collect();
    let bytes = serde_json::to_vec_pretty(&file).context("serialize contacts")?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(&bytes).context("write contacts snapshot")?;
    tmp.as_file().sync_all().context("sync contacts snapshot")?;
    tmp.persist(path)
        .with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<ContactMap> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ContactMap::new()),
        Err(e) => return Err(e).with_context(|| format!("read {}", path.display())),
    };
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ContactMap::new());
    }

    let file: ContactsFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse contacts file {}", path.display()))?;
    file.into_iter()
        .map(|(key, record)| {
            if key != record.id {
                anyhow::bail!("record under key {key} has id {}", record.id);
            }
            let contact = Contact::from(record);
            Ok((contact.id.clone(), contact))
        })
        .collect()
}

#[async_trait::async_trait]
impl ContactsRepository for FileContactsRepository {
    async fn list(&self, filter: Option<&str>) -> anyhow::Result<Vec<Contact>> {
        Ok(snapshot(&self.contacts.read(), filter))
    }

    async fn find_by_id(&self, id: &ContactId) -> anyhow::Result<Option<Contact>> {
        Ok(self.contacts.read().get(id).cloned())
    }

    async fn insert(&self, contact: Contact) -> anyhow::Result<()> {
        self.mutate(|contacts| {
            if contacts.contains_key(&contact.id) {
                anyhow::bail!("contact {} already exists", contact.id);
            }
            contacts.insert(contact.id.clone(), contact);
            Ok(Some(()))
        })
        .await?;
        Ok(())
    }

    async fn update(
        &self,
        id: &ContactId,
        patch: ContactPatch,
    ) -> anyhow::Result<Option<Contact>> {
        self.mutate(|contacts| {
            Ok(contacts.get_mut(id).map(|current| {
                current.apply(patch);
                current.clone()
            }))
        })
        .await
    }

    async fn delete(&self, id: &ContactId) -> anyhow::Result<bool> {
        let removed = self
            .mutate(|contacts| Ok(contacts.remove(id).map(|_| ())))
            .await?;
        Ok(removed.is_some())
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.contacts.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn contact(id: &str, first: &str, secs: i64) -> Contact {
        Contact {
            id: ContactId::from(id),
            first: first.into(),
            last: "Doe".into(),
            twitter: "@doe".into(),
            avatar: "https://example.com/a.png".into(),
            notes: String::new(),
            favorite: false,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn missing_file_opens_empty_and_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/contacts.json");
        let repo = FileContactsRepository::open(&path).unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(dir.path().join("nested").is_dir());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn reopen_returns_same_records_in_same_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");

        let repo = FileContactsRepository::open(&path).unwrap();
        repo.insert(contact("b", "Bea", 2)).await.unwrap();
        repo.insert(contact("a", "Amy", 3)).await.unwrap();
        repo.insert(contact("c", "Cal", 1)).await.unwrap();
        repo.update(&"a".into(), ContactPatch::favorite(true))
            .await
            .unwrap();
        let before = repo.list(None).await.unwrap();
        drop(repo);

        let reopened = FileContactsRepository::open(&path).unwrap();
        assert_eq!(reopened.list(None).await.unwrap(), before);
        assert!(reopened.find_by_id(&"a".into()).await.unwrap().unwrap().favorite);
    }

    #[tokio::test]
    async fn file_is_a_json_object_keyed_by_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        let repo = FileContactsRepository::open(&path).unwrap();
        repo.insert(contact("abc", "Amy", 1)).await.unwrap();

        let v: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(v["abc"]["first"], "Amy");
        assert_eq!(v["abc"]["createdAt"], "1970-01-01T00:00:01Z");
    }

    #[tokio::test]
    async fn delete_is_persisted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        let repo = FileContactsRepository::open(&path).unwrap();
        repo.insert(contact("a", "Amy", 1)).await.unwrap();
        assert!(repo.delete(&"a".into()).await.unwrap());
        assert!(!repo.delete(&"a".into()).await.unwrap());

        let reopened = FileContactsRepository::open(&path).unwrap();
        assert_eq!(reopened.count().await.unwrap(), 0);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        fs::write(&path, b"{ not json").unwrap();

        let err = FileContactsRepository::open(&path).err().unwrap();
        assert!(format!("{err:#}").contains("parse contacts file"));
    }

    #[tokio::test]
    async fn failed_write_leaves_collection_unchanged() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let path = data_dir.join("contacts.json");
        let repo = FileContactsRepository::open(&path).unwrap();
        repo.insert(contact("a", "Amy", 1)).await.unwrap();

        fs::remove_dir_all(&data_dir).unwrap();

        assert!(repo.insert(contact("b", "Bea", 2)).await.is_err());
        assert!(repo
            .update(&"a".into(), ContactPatch::favorite(true))
            .await
            .is_err());
        assert!(repo.delete(&"a".into()).await.is_err());

        let left = repo.list(None).await.unwrap();
        assert_eq!(left.len(), 1);
        assert!(!left[0].favorite);
    }

    #[tokio::test]
    async fn unknown_ids_do_not_touch_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        let repo = FileContactsRepository::open(&path).unwrap();

        assert!(repo
            .update(&"nope".into(), ContactPatch::favorite(true))
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete(&"nope".into()).await.unwrap());
        assert!(!path.exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_all_reach_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        let repo = std::sync::Arc::new(FileContactsRepository::open(&path).unwrap());

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.insert(contact(&format!("id-{i:02}"), "Amy", i)).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let reopened = FileContactsRepository::open(&path).unwrap();
        assert_eq!(reopened.count().await.unwrap(), 16);
        assert_eq!(
            reopened.list(None).await.unwrap(),
            repo.list(None).await.unwrap()
        );
    }

    #[test]
    fn blank_file_opens_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        fs::write(&path, b"\n").unwrap();
        assert!(FileContactsRepository::open(&path).is_ok());
    }
}
