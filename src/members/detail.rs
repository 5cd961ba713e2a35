use crate::app::ports::HttpClientPort;
use crate::constants::{
    CONSTITUENCY_CHILD, CONSTITUENCY_SEPARATORS, EDUCATION_CHILD, MEMBER_INFO_SELECTOR, NAME_CHILD,
    NAME_SEPARATOR, NAME_TITLES, OCCUPATION_CHILD, PARTY_CHILD,
};
use crate::error::{Result, ScraperError};
use crate::types::{Constituency, Language, MemberDetail, MemberUrls};
use futures::future::try_join_all;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

static INFO: Lazy<Selector> = Lazy::new(|| Selector::parse(MEMBER_INFO_SELECTOR).unwrap());
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").unwrap());
static LI: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());
static MAILTO: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"a[href^="mailto:"]"#).unwrap());
static HOMEPAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a:not([href^="mailto:"])"#).unwrap());
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static PORTRAIT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Za-z0-9]+)\.jpg").unwrap());

/// Fetches every language variant of one member concurrently.
/// Results come back in language order; the first failure fails the member.
pub async fn extract_member(
    http: &dyn HttpClientPort,
    urls: &MemberUrls,
) -> Result<Vec<(Language, MemberDetail)>> {
    try_join_all(urls.iter().map(|(language, url)| async move {
        let body = http.fetch_text(url).await?;
        let detail = parse_member_page(&body, url)?;
        debug!(language = %language, "{}", detail.name);
        Ok::<_, ScraperError>((*language, detail))
    }))
    .await
}

/// Extracts one biography page. Fields are addressed by their position in the info block.
pub fn parse_member_page(html: &str, page_url: &str) -> Result<MemberDetail> {
    let document = Html::parse_document(html);
    let info: Vec<ElementRef> = document.select(&INFO).collect();
    let children: Vec<ElementRef> = info
        .iter()
        .flat_map(|div| div.children().filter_map(ElementRef::wrap))
        .filter(|el| el.value().name() != "br")
        .collect();

    let src = info
        .iter()
        .find_map(|div| div.select(&IMG).next())
        .and_then(|img| img.value().attr("src"))
        .ok_or_else(|| ScraperError::MissingField(format!("portrait image in {}", page_url)))?;
    let id = portrait_id(src)
        .ok_or_else(|| ScraperError::MissingField(format!("member id in image '{}'", src)))?;
    let img = Url::parse(page_url)?.join(src)?.to_string();

    let name = children
        .get(NAME_CHILD)
        .map(|el| strip_titles(&el.text().collect::<String>()))
        .unwrap_or_default();

    let constituency_text: String = children
        .get(CONSTITUENCY_CHILD)
        .map(|el| el.select(&LI).flat_map(|li| li.text()).collect())
        .unwrap_or_default();

    Ok(MemberDetail {
        id,
        img,
        name,
        constituency: parse_constituency(&constituency_text),
        educations: list_items(children.get(EDUCATION_CHILD)),
        occupations: list_items(children.get(OCCUPATION_CHILD)),
        parties: list_items(children.get(PARTY_CHILD)),
        email: anchor_text(&info, &MAILTO),
        homepage: anchor_text(&info, &HOMEPAGE),
    })
}

/// `.../photo_A01.jpg` -> `A01`
pub fn portrait_id(src: &str) -> Option<String> {
    PORTRAIT_ID
        .captures(src)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Removes honorifics from a displayed name. Applying it again changes nothing.
pub fn strip_titles(raw: &str) -> String {
    let mut name = raw.to_string();
    loop {
        let mut next = name.replace(NAME_SEPARATOR, "");
        for title in NAME_TITLES {
            next = next.replace(title, "");
        }
        let next = next.trim().to_string();
        if next == name {
            return name;
        }
        name = next;
    }
}

/// Splits `"<type> - <area>"`, trying the hyphen before the en-dash.
pub fn parse_constituency(text: &str) -> Constituency {
    let mut parts: Vec<&str> = Vec::new();
    for separator in CONSTITUENCY_SEPARATORS {
        parts = text.split(separator).collect();
        if parts.len() > 1 {
            break;
        }
    }
    Constituency {
        kind: parts.first().map(|s| s.to_string()).unwrap_or_default(),
        area: parts.get(1).map(|s| s.to_string()),
    }
}

fn list_items(section: Option<&ElementRef>) -> Vec<String> {
    section
        .map(|el| {
            el.select(&LI)
                .map(|li| LINE_BREAK.replace_all(&li.inner_html(), "").into_owned())
                .collect()
        })
        .unwrap_or_default()
}

fn anchor_text(info: &[ElementRef], selector: &Selector) -> String {
    info.iter()
        .flat_map(|div| div.select(selector))
        .flat_map(|a| a.text())
        .collect::<String>()
        .trim()
        .to_string()
}
