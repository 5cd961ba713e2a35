use crate::constants::{AMENDMENT_MARKER, SEPARATE_MECHANISM_YES};
use crate::error::Result;
use crate::types::{Summaries, Vote, VoteBlock, VoteSummary};
use crate::voting::xml::{try_parse_int, unwrap_array, XmlElement};
use serde_json::Value;

/// Known spelling variant in the published Chinese names
pub fn normalize_ch_name(name: &str) -> String {
    name.replace('強', "强")
}

/// Turns one parsed meeting document into its vote blocks, in document order.
pub fn normalize_meeting(root: &XmlElement) -> Result<Vec<VoteBlock>> {
    let meeting = root.require_child("meeting")?;
    meeting.children_named("vote").map(normalize_vote).collect()
}

fn normalize_vote(voting: &XmlElement) -> Result<VoteBlock> {
    let votes = voting
        .require_child("individual-votes")?
        .children_named("member")
        .map(|member| -> Result<Vote> {
            Ok(Vote {
                vote: member.child_text("vote")?,
                name_ch: normalize_ch_name(member.require_attr("name-ch")?),
                name_en: member.require_attr("name-en")?.to_string(),
                constituency: member.attr("constituency").unwrap_or_default().to_string(),
                id: None,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let summary = voting.require_child("vote-summary")?;
    let motion_en = voting.child_text("motion-en")?;

    Ok(VoteBlock {
        motion_ch: voting.child_text("motion-ch")?,
        amendment: motion_en.contains(AMENDMENT_MARKER),
        motion_en,
        mover_ch: voting.child_text("mover-ch")?,
        mover_en: voting.child_text("mover-en")?,
        mover_type: voting.child_text("mover-type")?,
        date: voting.child_text("vote-date")?,
        time: voting.child_text("vote-time")?,
        separate_mechanism: voting.child_text("vote-separate-mechanism")? == SEPARATE_MECHANISM_YES,
        summary: Summaries {
            fc: normalize_summary(summary.child("functional-constituency")),
            gc: normalize_summary(summary.child("geographical-constituency")),
            overall: summary.require_child("overall")?.child_text("result")?,
        },
        votes,
    })
}

/// Unwraps a constituency tally, coerces its fields to integers where possible and
/// maps the source field names (including the misspelt `preset-count`).
pub fn normalize_summary(block: Option<&XmlElement>) -> VoteSummary {
    let fields = block.map(|b| unwrap_array(b.to_value())).unwrap_or(Value::Null);
    let field = |name: &str| fields.get(name).cloned().map(try_parse_int);

    VoteSummary {
        present: field("preset-count"),
        vote: field("vote-count"),
        yes: field("yes-count"),
        no: field("no-count"),
        abstain: field("abstain-count"),
        result: field("result"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScraperError;
    use serde_json::json;

    const MEETING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <legcohk-vote>
          <meeting type="Council" start-date="09/10/2013">
            <vote number="1">
              <vote-date>09/10/2013</vote-date>
              <vote-time>19:20:06</vote-time>
              <motion-ch>何俊仁議員就議案提出的修正案</motion-ch>
              <motion-en>AMENDMENT BY HON ALBERT HO TO THE MOTION</motion-en>
              <mover-ch>何俊仁</mover-ch>
              <mover-en>Albert HO</mover-en>
              <mover-type>Member</mover-type>
              <vote-separate-mechanism>Yes</vote-separate-mechanism>
              <vote-summary>
                <functional-constituency>
                  <preset-count>30</preset-count>
                  <vote-count>29</vote-count>
                  <yes-count>10</yes-count>
                  <no-count>17</no-count>
                  <abstain-count>2</abstain-count>
                  <result>Negatived</result>
                </functional-constituency>
                <geographical-constituency>
                  <preset-count>33</preset-count>
                  <vote-count>32</vote-count>
                  <yes-count>18</yes-count>
                  <no-count>14</no-count>
                  <abstain-count>0</abstain-count>
                  <result>Passed</result>
                </geographical-constituency>
                <overall><result>Negatived</result></overall>
              </vote-summary>
              <individual-votes>
                <member name-ch="葉劉淑儀" name-en="Mrs Regina IP" constituency="Geographical"><vote>No</vote></member>
                <member name-ch="強世功" name-en="KEUNG Sai-kung" constituency="Functional"><vote>Yes</vote></member>
              </individual-votes>
            </vote>
            <vote number="2">
              <vote-date>09/10/2013</vote-date>
              <vote-time>19:40:00</vote-time>
              <motion-ch>議案</motion-ch>
              <motion-en>MOTION ON ELDERLY CARE</motion-en>
              <mover-ch>甲</mover-ch>
              <mover-en>A</mover-en>
              <mover-type>Public Officer</mover-type>
              <vote-separate-mechanism>No</vote-separate-mechanism>
              <vote-summary>
                <overall><preset-count>63</preset-count><result>Passed</result></overall>
              </vote-summary>
              <individual-votes>
                <member name-ch="乙" name-en="B" constituency="Functional"><vote>Absent</vote></member>
              </individual-votes>
            </vote>
          </meeting>
        </legcohk-vote>"#;

    fn blocks() -> Vec<VoteBlock> {
        normalize_meeting(&XmlElement::parse(MEETING).unwrap()).unwrap()
    }

    #[test]
    fn test_normalize_fields_and_flags() {
        let blocks = blocks();
        assert_eq!(blocks.len(), 2);

        let first = &blocks[0];
        assert!(first.amendment);
        assert!(first.separate_mechanism);
        assert_eq!(first.mover_en, "Albert HO");
        assert_eq!(first.time, "19:20:06");
        assert_eq!(first.summary.overall, "Negatived");

        let second = &blocks[1];
        assert!(!second.amendment);
        assert!(!second.separate_mechanism);
        assert_eq!(second.mover_type, "Public Officer");
    }

    #[test]
    fn test_summary_remap_and_coercion() {
        let fc = &blocks()[0].summary.fc;
        assert_eq!(fc.present, Some(json!(30)));
        assert_eq!(fc.vote, Some(json!(29)));
        assert_eq!(fc.abstain, Some(json!(2)));
        assert_eq!(fc.result, Some(json!("Negatived")));

        let json = serde_json::to_value(fc).unwrap();
        assert!(json.get("preset-count").is_none());
        assert_eq!(json["present"], 30);
    }

    #[test]
    fn test_missing_constituency_summary_is_empty() {
        assert_eq!(blocks()[1].summary.fc, VoteSummary::default());
        assert_eq!(blocks()[1].summary.gc, VoteSummary::default());
    }

    #[test]
    fn test_votes_normalize_chinese_name() {
        let votes = &blocks()[0].votes;
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[1].name_ch, "强世功");
        assert_eq!(votes[1].vote, "Yes");
        assert_eq!(votes[1].constituency, "Functional");
        assert_eq!(votes[1].id, None);
    }

    #[test]
    fn test_missing_field_fails() {
        let xml = r#"<legcohk-vote><meeting><vote><motion-ch>x</motion-ch></vote></meeting></legcohk-vote>"#;
        let err = normalize_meeting(&XmlElement::parse(xml).unwrap()).unwrap_err();
        assert!(matches!(err, ScraperError::MissingField(_)));
    }

    #[test]
    fn test_normalize_ch_name() {
        assert_eq!(normalize_ch_name("強世功"), "强世功");
        assert_eq!(normalize_ch_name("梁國雄"), "梁國雄");
    }
}
