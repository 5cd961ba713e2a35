pub mod motions;
pub mod normalize;
pub mod sessions;
pub mod xml;

pub use motions::{attach_member_ids, group_motions, MemberDirectory};
pub use normalize::{normalize_ch_name, normalize_meeting};
pub use sessions::extract_xml_urls;
pub use xml::{try_parse_int, unwrap_array, XmlElement};
