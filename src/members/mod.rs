pub mod detail;
pub mod list;
pub mod merge;

pub use detail::{extract_member, parse_member_page, strip_titles};
pub use list::{extract_list, pair_member_urls};
pub use merge::merge_member;
