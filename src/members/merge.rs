use crate::types::{Language, Member, MemberDetail};
use tracing::warn;

/// Folds per-language details into one member.
///
/// Language-specific fields land in their suffixed slot. Shared fields (id, img, email,
/// homepage) are overwritten by each later language, so the last one processed wins.
pub fn merge_member(details: Vec<(Language, MemberDetail)>) -> Member {
    let mut member = Member::default();

    for (language, detail) in details {
        if !member.id.is_empty() && member.id != detail.id {
            warn!(
                "member id differs across languages: {} vs {} ({})",
                member.id, detail.id, language
            );
        }
        member.id = detail.id;
        member.img = detail.img;
        member.email = detail.email;
        member.homepage = detail.homepage;

        match language {
            Language::Ch => {
                member.name_ch = Some(detail.name);
                member.constituency_ch = Some(detail.constituency);
                member.educations_ch = Some(detail.educations);
                member.occupations_ch = Some(detail.occupations);
                member.parties_ch = Some(detail.parties);
            }
            Language::En => {
                member.name_en = Some(detail.name);
                member.constituency_en = Some(detail.constituency);
                member.educations_en = Some(detail.educations);
                member.occupations_en = Some(detail.occupations);
                member.parties_en = Some(detail.parties);
            }
        }
    }

    member
}
