pub mod card_page;
mod scrape_writer;
pub mod scraper_types;

use crate::{MANUAL_CARDS, SCRAPER_HEADING};
use const_format::formatcp;
use hstd::card::CardRecord;
use hstd::config::ScrapeConfig;
use indicatif::ProgressBar;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use scraper_types::ScrapeError;
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

const SITE_PREFIX: &str = "https://www.hearthstonetopdecks.com/";

/// Every result page of a card query starts with this root; the page number
/// is spliced in between the root and the query string.
const CARDS_ROOT: &str = formatcp!("{}cards/", SITE_PREFIX);

const USER_AGENT: &str = "Mozilla/5.0";

lazy_static! {
    static ref WHITESPACE_RUNS: Regex =
        Regex::new(r"\s\s+").expect("hardcoded regex, shouldn't fail");
}

/// Flattens page text into a single readable line.
pub fn clean_text(text: &str) -> String {
    let text = text
        .replace('\n', " ")
        .replace('\r', " ")
        .replace('\u{a0}', " ");

    String::from(WHITESPACE_RUNS.replace_all(text.as_str(), " ").trim())
}

/// Fetches and parses pages of the card site, one request at a time.
pub struct Scraper {
    client: Client,
    delay: Duration,
}

impl Scraper {
    pub fn new(sleep_seconds: f64) -> Scraper {
        Scraper {
            client: Client::new(),
            delay: Duration::from_secs_f64(sleep_seconds),
        }
    }

    fn fetch_document(&self, url: &str) -> Result<Html, ScrapeError> {
        let response = self
            .client
            .get(url)
            .header("user-agent", USER_AGENT)
            .send()?
            .error_for_status()?;

        Ok(Html::parse_document(response.text()?.as_str()))
    }

    /// Walks every result page of the query and collects the card links.
    /// Any page that does not parse aborts the whole run; there is no
    /// partial recovery at this stage.
    pub fn discover(&self, query_url: &str) -> Result<Vec<String>, ScrapeError> {
        let first_page = self.fetch_document(query_url)?;
        let num_pages = query_page_count(&first_page)?;
        eprintln!("{}Query spans {} result pages", SCRAPER_HEADING, num_pages);

        let mut links = Vec::new();
        let progress = ProgressBar::new(u64::from(num_pages));
        for page_number in 1..=num_pages {
            let page_url = page_url_at(query_url, page_number)?;
            let document = self.fetch_document(page_url.as_str())?;
            links.append(&mut page_card_links(&document));

            progress.inc(1);
            thread::sleep(self.delay);
        }
        progress.finish();

        Ok(dedup_links(links))
    }

    pub fn extract_one(
        &self,
        url: &str,
        images_dir: Option<&Path>,
    ) -> Result<CardRecord, ScrapeError> {
        let document = self.fetch_document(url)?;
        let card = card_page::parse_card(&document)?;

        if let Some(directory) = images_dir {
            self.save_card_image(&document, directory, card.title.as_str());
        }

        Ok(card)
    }

    /// Extracts every URL in the batch, diverting the ones that fail to the
    /// second list instead of aborting. The fixed delay applies after
    /// successful extractions only.
    pub fn extract_many(
        &self,
        urls: &[String],
        images_dir: Option<&Path>,
    ) -> (Vec<CardRecord>, Vec<String>) {
        collect_cards(urls, |url| self.extract_one(url, images_dir), self.delay)
    }

    /// Same pipeline as [`Scraper::extract_one`], with the type and stats
    /// supplied by the caller for pages whose markup omits them.
    pub fn extract_one_manual(
        &self,
        url: &str,
        type_name: &str,
        attack: f64,
        health: f64,
        images_dir: Option<&Path>,
    ) -> Result<CardRecord, ScrapeError> {
        let document = self.fetch_document(url)?;
        let card = card_page::parse_card_with_overrides(&document, type_name, attack, health)?;

        if let Some(directory) = images_dir {
            self.save_card_image(&document, directory, card.title.as_str());
        }

        Ok(card)
    }

    // Card art is a bonus; a failed download must not divert the card to
    // the failure list.
    fn save_card_image(&self, document: &Html, directory: &Path, title: &str) {
        let Some(image_url) = card_page::image_url(document) else {
            eprintln!("{}No card art found for {}", SCRAPER_HEADING, title);
            return;
        };

        if let Err(err) = self.download_image(image_url.as_str(), directory) {
            eprintln!(
                "{}Card art download failed for {}: {}",
                SCRAPER_HEADING, title, err
            );
        }
    }

    fn download_image(&self, image_url: &str, directory: &Path) -> Result<(), ScrapeError> {
        let file_name = image_url
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or("card.png");

        let mut response = self
            .client
            .get(image_url)
            .header("user-agent", USER_AGENT)
            .send()?
            .error_for_status()?;

        let mut file = File::create(directory.join(file_name))?;
        response.copy_to(&mut file)?;

        Ok(())
    }
}

/// Reads the total page count out of the pagination indicator, whose text
/// ends in "... N".
fn query_page_count(document: &Html) -> Result<u32, ScrapeError> {
    let indicator =
        Selector::parse("span.page-link").expect("hardcoded selector, shouldn't fail");
    let element = document
        .select(&indicator)
        .next()
        .ok_or(ScrapeError::MissingElement("span.page-link"))?;

    let text = clean_text(element.text().collect::<String>().as_str());
    match text.split(' ').nth(2).and_then(|token| token.parse().ok()) {
        Some(count) => Ok(count),
        None => Err(ScrapeError::Pagination(text)),
    }
}

/// Splices `page/{n}/` in between the cards root and the query suffix.
/// This is a plain string splice; a base URL outside the cards root has no
/// page variant and is refused.
fn page_url_at(query_url: &str, page_number: u32) -> Result<String, ScrapeError> {
    let query_suffix = query_url
        .strip_prefix(CARDS_ROOT)
        .ok_or_else(|| ScrapeError::QueryUrl(String::from(query_url)))?;

    Ok(format!(
        "{}page/{}/{}",
        CARDS_ROOT, page_number, query_suffix
    ))
}

/// Collects the card detail links of one result page, hrefs kept verbatim.
fn page_card_links(document: &Html) -> Vec<String> {
    let link = Selector::parse("a.card-link").expect("hardcoded selector, shouldn't fail");

    document
        .select(&link)
        .filter_map(|element| element.value().attr("href"))
        .map(String::from)
        .collect()
}

/// Drops repeated links, keeping first occurrences in order.
fn dedup_links(links: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

// The per-URL failure boundary: a failed card is reported, recorded and
// skipped; everything else keeps going.
fn collect_cards<F>(
    urls: &[String],
    mut extract: F,
    delay: Duration,
) -> (Vec<CardRecord>, Vec<String>)
where
    F: FnMut(&str) -> Result<CardRecord, ScrapeError>,
{
    let mut cards = Vec::new();
    let mut failed = Vec::new();

    let progress = ProgressBar::new(urls.len() as u64);
    for url in urls {
        match extract(url.as_str()) {
            Ok(card) => {
                cards.push(card);
                thread::sleep(delay);
            }
            Err(err) => {
                progress.println(format!(
                    "{}Scrape failed at URL {}: {}",
                    SCRAPER_HEADING, url, err
                ));
                failed.push(url.clone());
            }
        }
        progress.inc(1);
    }
    progress.finish();

    (cards, failed)
}

fn images_dir(config: &ScrapeConfig, with_images: bool) -> Result<Option<PathBuf>, ScrapeError> {
    if !with_images {
        return Ok(None);
    }

    let directory = PathBuf::from(config.require_images_path()?);
    fs::create_dir_all(&directory)?;
    Ok(Some(directory))
}

/// Discovers every card link behind the configured query and persists the
/// deduplicated list.
pub fn run_discover(config: &ScrapeConfig) -> Result<(), ScrapeError> {
    let main_url = config.require_main_url()?;
    let output_path = config.require_output_path()?;
    let scraper = Scraper::new(config.require_sleep_time()?);

    eprintln!("{}Extracting links to cards...", SCRAPER_HEADING);
    let links = scraper.discover(main_url)?;

    eprintln!(
        "{}Saving list of {} scraped URLs...",
        SCRAPER_HEADING,
        links.len()
    );
    scrape_writer::write_url_list(links.as_slice(), output_path)
}

/// Extracts every card in the persisted link list, writing successes to the
/// dataset and failures to the manual-review list.
pub fn run_extract(config: &ScrapeConfig, with_images: bool) -> Result<(), ScrapeError> {
    let input_path = config.require_input_path()?;
    let output_path = config.require_output_path()?;
    let failed_output_path = config.require_failed_output_path()?;
    let scraper = Scraper::new(config.require_sleep_time()?);
    let images_dir = images_dir(config, with_images)?;

    let urls = scrape_writer::read_url_list(input_path)?;
    eprintln!(
        "{}Extracting card information from {} URLs...",
        SCRAPER_HEADING,
        urls.len()
    );

    let (cards, failed) = scraper.extract_many(urls.as_slice(), images_dir.as_deref());
    eprintln!(
        "{}Extracted {} cards, {} failures",
        SCRAPER_HEADING,
        cards.len(),
        failed.len()
    );

    scrape_writer::write_records(cards.as_slice(), output_path)?;
    if !failed.is_empty() {
        scrape_writer::write_failed_urls(failed.as_slice(), failed_output_path)?;
    }

    Ok(())
}

/// Re-extracts the hand-maintained list of cards whose pages omit the type
/// and stat fields. Unlike the batch extractor there is no failure
/// boundary; these URLs are curated and an error here means the list needs
/// maintenance.
pub fn run_manual(config: &ScrapeConfig, with_images: bool) -> Result<(), ScrapeError> {
    let output_path = config.require_output_path()?;
    let scraper = Scraper::new(config.sleep_time.unwrap_or(0.0));
    let images_dir = images_dir(config, with_images)?;

    eprintln!("{}Extracting failed card information...", SCRAPER_HEADING);
    let mut cards = Vec::with_capacity(MANUAL_CARDS.len());
    for (url, type_name, attack, health) in MANUAL_CARDS {
        cards.push(scraper.extract_one_manual(
            url,
            type_name,
            attack,
            health,
            images_dir.as_deref(),
        )?);
    }

    scrape_writer::write_records(cards.as_slice(), output_path)
}

/// Joins the batch dataset with the manually extracted one and writes the
/// merged dataset. Pure data plumbing; no network.
pub fn run_merge(config: &ScrapeConfig) -> Result<(), ScrapeError> {
    let input_path = config.require_input_path()?;
    let manual_path = config.require_failed_dataframe_filepath()?;
    let output_path = config.require_output_path()?;

    let scraped = scrape_writer::read_records(input_path)?;
    let manual = scrape_writer::read_records(manual_path)?;
    eprintln!(
        "{}Merging {} scraped and {} manually extracted cards",
        SCRAPER_HEADING,
        scraped.len(),
        manual.len()
    );

    let merged = scrape_writer::merge_records(scraped, manual);
    eprintln!("{}Merged dataset holds {} cards", SCRAPER_HEADING, merged.len());

    scrape_writer::write_records(merged.as_slice(), output_path)
}
