/// Site constants shared by the extractors.
/// Selectors and URL templates describe the markup of the council website as it stands.

// Default biography listings (2012-2016 term)
pub const DEFAULT_BIOGRAPHY_YEAR: &str = "1216";
pub const DEFAULT_BIOGRAPHY_URL_CH: &str =
    "http://www.legco.gov.hk/general/chinese/members/yr12-16/biographies.htm";
pub const DEFAULT_BIOGRAPHY_URL_EN: &str =
    "http://www.legco.gov.hk/general/english/members/yr12-16/biographies.htm";

// Default meeting listings
pub const DEFAULT_SESSIONS: &[(&str, &str)] = &[
    ("1314", "http://www.legco.gov.hk/general/english/counmtg/yr12-16/mtg_1314.htm"),
    ("1213", "http://www.legco.gov.hk/general/english/counmtg/yr12-16/mtg_1213.htm"),
];

pub const DEFAULT_DATA_DIR: &str = "data";

// Biography pages
pub const MEMBER_LIST_SELECTOR: &str = ".bio-member-info a";
pub const MEMBER_INFO_SELECTOR: &str = "#container > div";
pub const NAME_CHILD: usize = 1;
pub const CONSTITUENCY_CHILD: usize = 3;
pub const EDUCATION_CHILD: usize = 5;
pub const OCCUPATION_CHILD: usize = 7;
pub const PARTY_CHILD: usize = 9;

/// Removed from member names in this order, first every `", "` separator.
pub const NAME_SEPARATOR: &str = ", ";
pub const NAME_TITLES: &[&str] = &[
    "Hon ", "GBS", "SBS", "BBS", "MH", "JP", "PhDRN", "SC", "議員", "大紫荊勳賢",
];

pub const CONSTITUENCY_SEPARATORS: &[&str] = &[" - ", " – "];

// Meeting listings
pub const MEETING_ANCHOR_SELECTOR: &str = "a[name^=cm]";
pub const MEETING_ANCHOR_PREFIX: &str = "cm";
pub const VOTING_XML_HOST: &str = "http://www.legco.gov.hk";

// Voting records
pub const AMENDMENT_MARKER: &str = "AMENDMENT BY";
pub const SEPARATE_MECHANISM_YES: &str = "Yes";
pub const NOT_FOUND_ID: &str = "not found";

/// Builds the per-meeting XML URL for a year pair such as `12`/`13` and a `YYYYMMDD` date.
pub fn voting_xml_url(yy1: &str, yy2: &str, date: &str) -> String {
    format!(
        "{}/yr{}-{}/chinese/counmtg/voting/cm_vote_{}.xml",
        VOTING_XML_HOST, yy1, yy2, date
    )
}
