use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Page languages published by the council website
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ch,
    En,
}

impl Language {
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Ch => "ch",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One member page URL as found on a single-language listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberLink {
    pub language: Language,
    pub url: String,
}

/// Per-language URLs of the same member's biography
pub type MemberUrls = BTreeMap<Language, String>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Constituency {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

/// Fields scraped from one language variant of a biography page
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberDetail {
    pub id: String,
    pub img: String,
    pub name: String,
    pub constituency: Constituency,
    pub educations: Vec<String>,
    pub occupations: Vec<String>,
    pub parties: Vec<String>,
    pub email: String,
    pub homepage: String,
}

/// Bilingual member record, language-specific fields suffixed by language tag
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub img: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub homepage: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constituency_ch: Option<Constituency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educations_ch: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupations_ch: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parties_ch: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constituency_en: Option<Constituency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub educations_en: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupations_en: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parties_en: Option<Vec<String>>,
}

/// Scraped output of one configured biography listing
#[derive(Debug, Clone, Default)]
pub struct BiographyPage {
    pub year: String,
    pub member_urls: Vec<MemberUrls>,
    pub members: Vec<Member>,
}

/// Individual ballot cast on a motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub vote: String,
    pub name_ch: String,
    pub name_en: String,
    pub constituency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Tally for one constituency category. Counts are integers when the source parses as one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VoteSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub present: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstain: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Summaries {
    pub fc: VoteSummary,
    pub gc: VoteSummary,
    pub overall: String,
}

/// One recorded vote of a meeting, as normalized from the XML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteBlock {
    pub motion_ch: String,
    pub motion_en: String,
    pub mover_ch: String,
    pub mover_en: String,
    pub mover_type: String,
    pub amendment: bool,
    pub date: String,
    pub time: String,
    pub separate_mechanism: bool,
    pub summary: Summaries,
    pub votes: Vec<Vote>,
}

/// A vote block with its session-scoped id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub id: String,
    #[serde(flatten)]
    pub block: VoteBlock,
}

/// Raw XML document of one meeting
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingXml {
    pub url: String,
    pub body: String,
}

impl MeetingXml {
    /// File stem of the resource URL, e.g. `cm_vote_20121024`
    pub fn stem(&self) -> &str {
        let name = self.url.rsplit('/').next().unwrap_or(&self.url);
        name.strip_suffix(".xml").unwrap_or(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_stem() {
        let xml = MeetingXml {
            url: "http://www.legco.gov.hk/yr12-13/chinese/counmtg/voting/cm_vote_20121024.xml".into(),
            body: String::new(),
        };
        assert_eq!(xml.stem(), "cm_vote_20121024");
    }

    #[test]
    fn test_motion_serializes_flat() {
        let motion = Motion {
            id: "13140".into(),
            block: VoteBlock {
                motion_ch: "議案".into(),
                motion_en: "MOTION".into(),
                mover_ch: "甲".into(),
                mover_en: "A".into(),
                mover_type: "Member".into(),
                amendment: false,
                date: "24/10/2012".into(),
                time: "12:00".into(),
                separate_mechanism: true,
                summary: Summaries::default(),
                votes: vec![],
            },
        };
        let json = serde_json::to_value(&motion).unwrap();
        assert_eq!(json["id"], "13140");
        assert_eq!(json["motion_en"], "MOTION");
        assert_eq!(json["separate_mechanism"], true);
        assert!(json.get("block").is_none());
    }

    #[test]
    fn test_member_omits_missing_language() {
        let member = Member {
            id: "A01".into(),
            name_en: Some("Tam".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["name_en"], "Tam");
        assert!(json.get("name_ch").is_none());
    }
}
