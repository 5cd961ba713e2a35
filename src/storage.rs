use crate::error::Result;
use crate::types::{MeetingXml, Member, Motion, VoteBlock};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Output sink for scraped records. Paths are relative to the data directory;
/// writes overwrite and create parent directories on demand.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn write(&self, path: &Path, contents: Vec<u8>) -> Result<()>;
}

/// Writes under a root directory on disk
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl Storage for FsStorage {
    async fn write(&self, path: &Path, contents: Vec<u8>) -> Result<()> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        debug!("saving to {}", full.display());
        tokio::fs::write(&full, contents).await?;
        Ok(())
    }
}

/// In-memory storage implementation for development/testing
#[derive(Default)]
pub struct InMemoryStorage {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn get_json(&self, path: impl AsRef<Path>) -> Option<serde_json::Value> {
        self.get(path).and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn write(&self, path: &Path, contents: Vec<u8>) -> Result<()> {
        self.files.lock().unwrap().insert(path.to_path_buf(), contents);
        Ok(())
    }
}

/// Relative locations of every persisted record
pub mod layout {
    use std::path::PathBuf;

    pub const MEMBER_DIR: &str = "member-json";
    pub const ALL_MEMBERS_FILE: &str = "all.json";
    pub const VOTING_RAW_DIR: &str = "voting-raw";
    pub const VOTING_JSON_DIR: &str = "voting-json";
    pub const VOTING_MOTION_DIR: &str = "voting-motion-json";

    pub fn member(id: &str) -> PathBuf {
        PathBuf::from(MEMBER_DIR).join(format!("{}.json", id))
    }

    pub fn all_members() -> PathBuf {
        PathBuf::from(MEMBER_DIR).join(ALL_MEMBERS_FILE)
    }

    pub fn raw_xml(year: &str, stem: &str) -> PathBuf {
        PathBuf::from(VOTING_RAW_DIR).join(year).join(format!("{}.xml", stem))
    }

    pub fn meeting_json(year: &str, stem: &str) -> PathBuf {
        PathBuf::from(VOTING_JSON_DIR).join(year).join(format!("{}.json", stem))
    }

    pub fn motion(year: &str, id: &str) -> PathBuf {
        PathBuf::from(VOTING_MOTION_DIR).join(year).join(format!("{}.json", id))
    }
}

/// Saves `all.json` and one file per member, completing only when every write has.
pub async fn save_members(storage: &dyn Storage, members: &[Member]) -> Result<()> {
    let all = async {
        let json = serde_json::to_vec_pretty(members)?;
        storage.write(&layout::all_members(), json).await
    };
    let each = try_join_all(members.iter().map(|member| async move {
        let json = serde_json::to_vec_pretty(member)?;
        storage.write(&layout::member(&member.id), json).await
    }));
    futures::try_join!(all, each)?;
    Ok(())
}

/// Reads a JSON array of members such as a previously written `all.json`.
pub fn read_members(path: &Path) -> Result<Vec<Member>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub async fn save_raw_xmls(storage: &dyn Storage, year: &str, xmls: &[MeetingXml]) -> Result<()> {
    try_join_all(xmls.iter().map(|xml| async move {
        storage
            .write(&layout::raw_xml(year, xml.stem()), xml.body.clone().into_bytes())
            .await
    }))
    .await?;
    Ok(())
}

/// Writes each meeting's vote blocks next to the name of the XML they came from.
pub async fn save_meeting_jsons(
    storage: &dyn Storage,
    year: &str,
    xmls: &[MeetingXml],
    meetings: &[Vec<VoteBlock>],
) -> Result<()> {
    try_join_all(xmls.iter().zip(meetings).map(|(xml, blocks)| async move {
        let json = serde_json::to_vec(blocks)?;
        storage.write(&layout::meeting_json(year, xml.stem()), json).await
    }))
    .await?;
    Ok(())
}

pub async fn save_motions(storage: &dyn Storage, year: &str, motions: &[Motion]) -> Result<()> {
    try_join_all(motions.iter().map(|motion| async move {
        let json = serde_json::to_vec(motion)?;
        storage.write(&layout::motion(year, &motion.id), json).await
    }))
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str) -> Member {
        Member {
            id: id.into(),
            name_en: Some(format!("Member {}", id)),
            ..Default::default()
        }
    }

    #[test]
    fn test_layout_paths() {
        assert_eq!(layout::member("A01"), PathBuf::from("member-json/A01.json"));
        assert_eq!(layout::all_members(), PathBuf::from("member-json/all.json"));
        assert_eq!(
            layout::raw_xml("1314", "cm_vote_20131009"),
            PathBuf::from("voting-raw/1314/cm_vote_20131009.xml")
        );
        assert_eq!(
            layout::meeting_json("1314", "cm_vote_20131009"),
            PathBuf::from("voting-json/1314/cm_vote_20131009.json")
        );
        assert_eq!(layout::motion("1314", "13140"), PathBuf::from("voting-motion-json/1314/13140.json"));
    }

    #[tokio::test]
    async fn test_save_members_writes_aggregate_and_each() {
        let storage = InMemoryStorage::new();
        save_members(&storage, &[member("A01"), member("B02")]).await.unwrap();

        let all = storage.get_json("member-json/all.json").unwrap();
        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(storage.get_json("member-json/B02.json").unwrap()["name_en"], "Member B02");
        assert_eq!(storage.paths().len(), 3);
    }

    #[tokio::test]
    async fn test_fs_storage_creates_directories_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        let path = layout::motion("1314", "13140");

        storage.write(&path, b"first".to_vec()).await.unwrap();
        storage.write(&path, b"second".to_vec()).await.unwrap();

        let written = std::fs::read_to_string(dir.path().join(&path)).unwrap();
        assert_eq!(written, "second");
    }

    #[tokio::test]
    async fn test_read_members_round_trips_all_json() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        save_members(&storage, &[member("A01"), member("B02")]).await.unwrap();

        let members = read_members(&dir.path().join("member-json/all.json")).unwrap();
        assert_eq!(members, vec![member("A01"), member("B02")]);
    }

    #[tokio::test]
    async fn test_member_json_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());
        save_members(&storage, &[member("A01")]).await.unwrap();

        let text = std::fs::read_to_string(dir.path().join("member-json/A01.json")).unwrap();
        assert!(text.contains("\n  \"id\": \"A01\""));
    }
}
