use crate::constants::NOT_FOUND_ID;
use crate::types::{Member, Motion, VoteBlock};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Chinese name -> member id lookup used to tag ballots
#[derive(Debug, Clone, Default)]
pub struct MemberDirectory {
    ids_by_name: HashMap<String, String>,
}

impl MemberDirectory {
    /// On a name collision the first member keeps the name.
    pub fn from_members(members: &[Member]) -> Self {
        let mut ids_by_name = HashMap::new();
        for member in members {
            let Some(name) = &member.name_ch else { continue };
            if let Some(existing) = ids_by_name.get(name) {
                warn!("duplicate member name {}: keeping {}, ignoring {}", name, existing, member.id);
                continue;
            }
            ids_by_name.insert(name.clone(), member.id.clone());
        }
        Self { ids_by_name }
    }

    pub fn lookup(&self, name_ch: &str) -> Option<&str> {
        self.ids_by_name.get(name_ch).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids_by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids_by_name.is_empty()
    }
}

/// Flattens per-meeting blocks in meeting order and numbers them `<year><index>`.
pub fn group_motions(year: &str, meetings: Vec<Vec<VoteBlock>>) -> Vec<Motion> {
    meetings
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(i, block)| {
            let id = format!("{}{}", year, i);
            debug!("{}", id);
            Motion { id, block }
        })
        .collect()
}

/// Sets every ballot's member id, using the sentinel when the name is unknown.
/// Returns how many ballots stayed unresolved.
pub fn attach_member_ids(motions: &mut [Motion], directory: &MemberDirectory) -> usize {
    let mut unresolved = 0;
    for motion in motions.iter_mut() {
        for vote in motion.block.votes.iter_mut() {
            let id = match directory.lookup(&vote.name_ch) {
                Some(id) => id.to_string(),
                None => {
                    debug!("no member named {} (motion {})", vote.name_ch, motion.id);
                    unresolved += 1;
                    NOT_FOUND_ID.to_string()
                }
            };
            vote.id = Some(id);
        }
    }
    unresolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Summaries, Vote};
    use crate::voting::normalize::normalize_ch_name;

    fn block(names: &[&str]) -> VoteBlock {
        VoteBlock {
            motion_ch: String::new(),
            motion_en: String::new(),
            mover_ch: String::new(),
            mover_en: String::new(),
            mover_type: String::new(),
            amendment: false,
            date: String::new(),
            time: String::new(),
            separate_mechanism: false,
            summary: Summaries::default(),
            votes: names
                .iter()
                .map(|n| Vote {
                    vote: "Yes".into(),
                    name_ch: n.to_string(),
                    name_en: String::new(),
                    constituency: String::new(),
                    id: None,
                })
                .collect(),
        }
    }

    fn member(id: &str, name_ch: &str) -> Member {
        Member {
            id: id.into(),
            name_ch: Some(name_ch.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_group_ids_are_sequential_across_meetings() {
        let motions = group_motions("1314", vec![vec![block(&[]), block(&[])], vec![], vec![block(&[])]]);
        let ids: Vec<&str> = motions.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["13140", "13141", "13142"]);
    }

    #[test]
    fn test_attach_resolves_and_marks_missing() {
        let directory = MemberDirectory::from_members(&[member("A01", "譚耀宗"), member("B02", "强世功")]);
        let raw = normalize_ch_name("強世功");
        let mut motions = group_motions("1213", vec![vec![block(&["譚耀宗", raw.as_str(), "無名氏"])]]);

        let unresolved = attach_member_ids(&mut motions, &directory);

        let ids: Vec<Option<&str>> = motions[0].block.votes.iter().map(|v| v.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("A01"), Some("B02"), Some(NOT_FOUND_ID)]);
        assert_eq!(unresolved, 1);
    }

    #[test]
    fn test_empty_directory_marks_everything() {
        let mut motions = group_motions("1213", vec![vec![block(&["甲", "乙"])]]);
        let directory = MemberDirectory::from_members(&[]);
        assert!(directory.is_empty());
        assert_eq!(attach_member_ids(&mut motions, &directory), 2);
        assert!(motions[0].block.votes.iter().all(|v| v.id.as_deref() == Some(NOT_FOUND_ID)));
    }

    #[test]
    fn test_directory_first_name_wins() {
        let directory = MemberDirectory::from_members(&[member("A01", "陳偉業"), member("Z99", "陳偉業")]);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.lookup("陳偉業"), Some("A01"));
    }
}
