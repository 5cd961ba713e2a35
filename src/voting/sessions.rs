use crate::app::ports::HttpClientPort;
use crate::constants::{voting_xml_url, MEETING_ANCHOR_PREFIX, MEETING_ANCHOR_SELECTOR};
use crate::error::Result;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

static MEETING_ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(MEETING_ANCHOR_SELECTOR).unwrap());

/// Fetches a yearly meeting listing and builds one voting XML URL per meeting date.
#[instrument(skip(http))]
pub async fn extract_xml_urls(http: &dyn HttpClientPort, year: &str, url: &str) -> Result<Vec<String>> {
    let body = http.fetch_text(url).await?;
    let dates = parse_meeting_dates(&body);
    let urls = xml_urls_for_dates(&dates);
    debug!("extracted {} urls for yr {}", urls.len(), year);
    Ok(urls)
}

/// `<a name="cm20121024">` -> `20121024`. Anchors without a valid date suffix are skipped.
pub fn parse_meeting_dates(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&MEETING_ANCHOR)
        .filter_map(|a| a.value().attr("name"))
        .filter_map(|name| name.strip_prefix(MEETING_ANCHOR_PREFIX))
        .filter(|suffix| {
            let valid = suffix.len() == 8 && NaiveDate::parse_from_str(suffix, "%Y%m%d").is_ok();
            if !valid {
                debug!("ignoring meeting anchor suffix {:?}", suffix);
            }
            valid
        })
        .map(str::to_string)
        .collect()
}

/// The legislative year pair is taken from the first date: `20121024` -> `12-13`.
pub fn xml_urls_for_dates(dates: &[String]) -> Vec<String> {
    let Some(first) = dates.first() else {
        warn!("no meeting dates found");
        return Vec::new();
    };
    let yy1: u32 = first[2..4].parse().unwrap_or_default();
    let yy1_str = format!("{:02}", yy1);
    let yy2_str = format!("{:02}", (yy1 + 1) % 100);

    dates
        .iter()
        .map(|date| voting_xml_url(&yy1_str, &yy2_str, date))
        .collect()
}
