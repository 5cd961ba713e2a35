use crate::app::ports::HttpClientPort;
use crate::constants::MEMBER_LIST_SELECTOR;
use crate::error::{Result, ScraperError};
use crate::types::{Language, MemberLink, MemberUrls};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashMap;
use tracing::{debug, instrument};
use url::Url;

static MEMBER_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse(MEMBER_LIST_SELECTOR).unwrap());

/// Fetches one language's biography listing and returns its member page URLs in page order.
#[instrument(skip(http))]
pub async fn extract_list(
    http: &dyn HttpClientPort,
    year: &str,
    language: Language,
    url: &str,
) -> Result<Vec<MemberLink>> {
    let body = http.fetch_text(url).await?;
    let links = parse_member_links(&body, url, language)?;
    debug!("found {} members for {} from the main list", links.len(), year);
    Ok(links)
}

/// Resolves every member-info anchor against the listing page's own directory.
pub fn parse_member_links(html: &str, page_url: &str, language: Language) -> Result<Vec<MemberLink>> {
    let base = Url::parse(page_url)?;
    let document = Html::parse_document(html);

    document
        .select(&MEMBER_LINK)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| -> Result<MemberLink> {
            Ok(MemberLink {
                language,
                url: base.join(href.trim())?.to_string(),
            })
        })
        .collect()
}

/// Key shared by all language variants of a member page: the page file stem.
pub fn member_key(url: &str) -> String {
    let path = Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string());
    let file = path.rsplit('/').next().unwrap_or(&path);
    match file.rfind('.') {
        Some(dot) if dot > 0 => file[..dot].to_string(),
        _ => file.to_string(),
    }
}

/// Joins the per-language lists into one URL set per member.
///
/// Lists must be the same length, and every member key must appear in each of them.
/// Output follows the order of the first list.
pub fn pair_member_urls(year: &str, lists: &[Vec<MemberLink>]) -> Result<Vec<MemberUrls>> {
    let Some(first) = lists.first() else {
        return Ok(Vec::new());
    };

    let counts: Vec<usize> = lists.iter().map(Vec::len).collect();
    if counts.iter().any(|&c| c != first.len()) {
        return Err(ScraperError::FieldCountMismatch {
            year: year.to_string(),
            counts,
        });
    }

    let others: Vec<HashMap<String, &MemberLink>> = lists[1..]
        .iter()
        .map(|list| list.iter().map(|link| (member_key(&link.url), link)).collect())
        .collect();

    first
        .iter()
        .map(|link| {
            let key = member_key(&link.url);
            let mut urls = MemberUrls::new();
            urls.insert(link.language, link.url.clone());
            for other in &others {
                let matched = other.get(&key).ok_or_else(|| ScraperError::UnpairedMember {
                    year: year.to_string(),
                    key: key.clone(),
                })?;
                urls.insert(matched.language, matched.url.clone());
            }
            Ok(urls)
        })
        .collect()
}
