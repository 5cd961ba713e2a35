use crate::app::ports::HttpClientPort;
use crate::config::{BiographyPageConfig, SessionConfig};
use crate::error::{Result, ScraperError};
use crate::members::{extract_list, extract_member, merge_member, pair_member_urls};
use crate::metrics::{
    self as run_metrics, MEETINGS_DOWNLOADED, MEETINGS_SKIPPED, MEMBERS_SCRAPED, MOTIONS, VOTES_UNRESOLVED,
};
use crate::storage::{self, Storage};
use crate::types::{BiographyPage, MeetingXml, Member, Motion};
use crate::voting::{
    attach_member_ids, extract_xml_urls, group_motions, normalize_meeting, MemberDirectory, XmlElement,
};
use futures::future::{join_all, try_join_all};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// One legislative year's voting run, with the directory used to resolve ballots
#[derive(Debug, Clone)]
pub struct Session {
    pub year: String,
    pub url: String,
    pub directory: MemberDirectory,
}

impl Session {
    /// Uses the session's own `members_file` when configured, otherwise `fallback`.
    pub fn from_config(config: &SessionConfig, fallback: &[Member]) -> Result<Self> {
        let directory = match &config.members_file {
            Some(path) => MemberDirectory::from_members(&storage::read_members(path)?),
            None => MemberDirectory::from_members(fallback),
        };
        if directory.is_empty() {
            warn!("no members to resolve votes against for yr {}", config.year);
        }
        Ok(Self {
            year: config.year.clone(),
            url: config.url.clone(),
            directory,
        })
    }
}

/// Result of a complete voting run for one session
#[derive(Debug)]
pub struct SessionResult {
    pub year: String,
    pub xml_urls: Vec<String>,
    pub meetings: usize,
    pub motions: Vec<Motion>,
    pub unresolved_votes: usize,
}

pub struct Pipeline {
    http: Arc<dyn HttpClientPort>,
    storage: Arc<dyn Storage>,
}

impl Pipeline {
    pub fn new(http: Arc<dyn HttpClientPort>, storage: Arc<dyn Storage>) -> Self {
        Self { http, storage }
    }

    /// Runs every biography page independently. Results are positional; one page
    /// failing does not stop the others.
    pub async fn run_biography_pages(&self, pages: &[BiographyPageConfig]) -> Vec<Result<BiographyPage>> {
        let started = Instant::now();
        let results = join_all(pages.iter().map(|page| self.run_biography_page(page))).await;
        run_metrics::record_duration("members", started.elapsed().as_secs_f64());
        results
    }

    /// List -> detail -> merge -> save for one configured year.
    #[instrument(skip(self, page), fields(year = %page.year))]
    pub async fn run_biography_page(&self, page: &BiographyPageConfig) -> Result<BiographyPage> {
        let http = self.http.as_ref();

        let lists = try_join_all(
            page.urls
                .iter()
                .map(|entry| extract_list(http, &page.year, entry.language, &entry.url)),
        )
        .await?;
        let member_urls = pair_member_urls(&page.year, &lists)?;
        info!("Found {} members for {}", member_urls.len(), page.year);

        let members = try_join_all(member_urls.iter().map(|urls| async move {
            let details = extract_member(http, urls).await?;
            Ok::<_, ScraperError>(merge_member(details))
        }))
        .await?;
        run_metrics::record_count(MEMBERS_SCRAPED, &page.year, members.len());

        storage::save_members(self.storage.as_ref(), &members).await?;
        info!("Saved {} members for {}", members.len(), page.year);

        Ok(BiographyPage {
            year: page.year.clone(),
            member_urls,
            members,
        })
    }

    /// Runs every session independently, reporting results positionally.
    pub async fn run_sessions(&self, sessions: &[Session]) -> Vec<Result<SessionResult>> {
        let started = Instant::now();
        let results = join_all(sessions.iter().map(|session| self.run_session(session))).await;
        run_metrics::record_duration("voting", started.elapsed().as_secs_f64());
        results
    }

    /// Listing -> XML download -> raw save -> parse -> normalize -> JSON save ->
    /// group -> id attach -> motion save, for one session.
    #[instrument(skip(self, session), fields(year = %session.year))]
    pub async fn run_session(&self, session: &Session) -> Result<SessionResult> {
        let http = self.http.as_ref();
        let storage = self.storage.as_ref();
        let year = session.year.as_str();

        let xml_urls = extract_xml_urls(http, year, &session.url).await?;

        let downloads = try_join_all(xml_urls.iter().map(|url| async move {
            let body = http.fetch_optional_text(url).await?;
            Ok::<_, ScraperError>(body.map(|body| MeetingXml {
                url: url.clone(),
                body,
            }))
        }))
        .await?;
        let xmls: Vec<MeetingXml> = downloads
            .into_iter()
            .flatten()
            .filter(|xml| !xml.body.is_empty())
            .collect();
        let skipped = xml_urls.len() - xmls.len();
        if skipped > 0 {
            warn!("{} of {} meeting XMLs unavailable for yr {}", skipped, xml_urls.len(), year);
        }
        info!("downloaded {} xml for yr {}", xmls.len(), year);
        run_metrics::record_count(MEETINGS_DOWNLOADED, year, xmls.len());
        run_metrics::record_count(MEETINGS_SKIPPED, year, skipped);

        storage::save_raw_xmls(storage, year, &xmls).await?;

        let meetings = xmls
            .iter()
            .map(|xml| normalize_meeting(&XmlElement::parse(&xml.body)?))
            .collect::<Result<Vec<_>>>()?;

        storage::save_meeting_jsons(storage, year, &xmls, &meetings).await?;

        let mut motions = group_motions(year, meetings);
        info!("found {} motions for yr {}", motions.len(), year);
        run_metrics::record_count(MOTIONS, year, motions.len());

        let unresolved_votes = attach_member_ids(&mut motions, &session.directory);
        if unresolved_votes > 0 {
            warn!("{} votes in yr {} matched no member", unresolved_votes, year);
        }
        run_metrics::record_count(VOTES_UNRESOLVED, year, unresolved_votes);

        storage::save_motions(storage, year, &motions).await?;
        info!("saved {} motions for yr {}", motions.len(), year);

        Ok(SessionResult {
            year: year.to_string(),
            xml_urls,
            meetings: xmls.len(),
            motions,
            unresolved_votes,
        })
    }
}
