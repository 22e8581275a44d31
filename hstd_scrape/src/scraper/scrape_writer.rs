//! Persists everything the pipeline produces: the discovered link list,
//! the card dataset as CSV, and the list of URLs waiting for manual
//! review. Reading tolerates datasets written by older runs in the legacy
//! encoding.

use super::scraper_types::ScrapeError;
use hstd::card::{CardRecord, CardRow};
use hstd::encoding;
use std::fs::{self, File};
use std::path::Path;

// Message to print before all writer logs
const WRITER_HEADING: &str = "[WRITER] ";

fn ensure_parent_dir(path: &str) -> Result<(), ScrapeError> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    Ok(())
}

/// Writes the dataset with one row per card and the full column set on
/// every row, whatever the card types involved.
pub fn write_records(records: &[CardRecord], path: &str) -> Result<(), ScrapeError> {
    eprintln!("{}Saving {} cards to {}", WRITER_HEADING, records.len(), path);
    ensure_parent_dir(path)?;

    let mut writer = csv::Writer::from_writer(File::create(path)?);
    for record in records {
        writer.serialize(CardRow::from(record))?;
    }
    writer.flush()?;

    eprintln!("{}Cards recorded successfully", WRITER_HEADING);
    Ok(())
}

pub fn read_records(path: &str) -> Result<Vec<CardRecord>, ScrapeError> {
    let text = encoding::decode_text(fs::read(path)?.as_slice())?;

    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut records = Vec::new();
    for row in reader.deserialize::<CardRow>() {
        records.push(CardRecord::try_from(row?)?);
    }

    Ok(records)
}

pub fn write_url_list(urls: &[String], path: &str) -> Result<(), ScrapeError> {
    ensure_parent_dir(path)?;
    fs::write(path, serde_json::to_string_pretty(urls)?)?;

    Ok(())
}

pub fn read_url_list(path: &str) -> Result<Vec<String>, ScrapeError> {
    let text = encoding::decode_text(fs::read(path)?.as_slice())?;

    Ok(serde_json::from_str(text.as_str())?)
}

/// Only called with a non-empty list; a clean run leaves no file behind.
pub fn write_failed_urls(urls: &[String], path: &str) -> Result<(), ScrapeError> {
    eprintln!(
        "{}Recording {} failed URLs for manual review",
        WRITER_HEADING,
        urls.len()
    );

    write_url_list(urls, path)
}

/// Set union of the batch run and the manual run. Exact duplicates
/// collapse; everything else is kept in arrival order.
pub fn merge_records(scraped: Vec<CardRecord>, manual: Vec<CardRecord>) -> Vec<CardRecord> {
    let mut merged: Vec<CardRecord> = Vec::with_capacity(scraped.len() + manual.len());
    for record in scraped.into_iter().chain(manual) {
        if !merged.contains(&record) {
            merged.push(record);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use hstd::card::{CardType, TypeFields, NOT_SPELL};
    use std::env;

    fn temp_path(name: &str) -> String {
        let mut path = env::temp_dir();
        path.push(name);
        path.to_str().expect("temp dir should be UTF-8").to_owned()
    }

    // Create fake data
    fn get_test_data() -> Vec<CardRecord> {
        vec![
            CardRecord {
                title: String::from("Siegebreaker"),
                summary: String::from("Siegebreaker is a demon."),
                text: String::from("Taunt. Your other Demons have +1 Attack."),
                card_type: CardType::Minion,
                cost: 7.0,
                rarity: String::from("Rare"),
                classes: vec![String::from("Warlock")],
                set_name: String::from("Rise of Shadows"),
                mechanics: vec![String::from("Taunt")],
                rating: Some(3.5),
                num_comments: 2,
                comments: vec![
                    String::from("Decent arena card."),
                    String::from("Too slow for constructed."),
                ],
                type_fields: TypeFields::Minion {
                    attack: 5.0,
                    health: 8.0,
                },
            },
            CardRecord {
                title: String::from("Breath of the Infinite"),
                summary: String::from("Breath of the Infinite is a dragon spell."),
                text: String::from("Deal 2 damage to all minions."),
                card_type: CardType::Spell,
                cost: 3.0,
                rarity: String::from("Rare"),
                classes: vec![String::from("Priest"), String::from("Shaman")],
                set_name: String::from("Descent of Dragons"),
                mechanics: Vec::new(),
                rating: None,
                num_comments: 0,
                comments: Vec::new(),
                type_fields: TypeFields::Spell {
                    school: String::from("No spell type"),
                },
            },
        ]
    }

    #[test]
    fn dataset_round_trips() {
        let records = get_test_data();
        let path = temp_path("hstd_roundtrip_cards.csv");

        write_records(records.as_slice(), path.as_str()).expect("dataset should write");
        let back = read_records(path.as_str()).expect("dataset should read back");

        assert_eq!(records, back);
    }

    #[test]
    fn written_minion_row_spells_out_the_school_sentinel() {
        let records = get_test_data();
        let path = temp_path("hstd_sentinel_cards.csv");

        write_records(records.as_slice(), path.as_str()).expect("dataset should write");
        let raw = fs::read_to_string(path.as_str()).expect("dataset should be readable");

        let minion_line = raw
            .lines()
            .find(|line| line.starts_with("Siegebreaker"))
            .expect("minion row should be present");
        assert!(minion_line.contains(NOT_SPELL));
    }

    #[test]
    fn legacy_encoded_dataset_still_reads() {
        let mut records = get_test_data();
        records.truncate(1);
        records[0].title = String::from("Faêrie Dragon");

        let path = temp_path("hstd_legacy_cards.csv");
        write_records(records.as_slice(), path.as_str()).expect("dataset should write");

        // Re-encode the file the way the legacy tooling wrote it
        let text = fs::read_to_string(path.as_str()).expect("dataset should be readable");
        let legacy: Vec<u8> = text.chars().map(|c| c as u8).collect();
        fs::write(path.as_str(), legacy).expect("dataset should be writable");

        let back = read_records(path.as_str()).expect("legacy encoding should decode");
        assert_eq!(records, back);
    }

    #[test]
    fn url_list_round_trips() {
        let urls = vec![
            String::from("https://www.hearthstonetopdecks.com/cards/bloodlust/"),
            String::from("https://www.hearthstonetopdecks.com/cards/subject-9/"),
        ];
        let path = temp_path("hstd_roundtrip_urls.json");

        write_url_list(urls.as_slice(), path.as_str()).expect("url list should write");
        let back = read_url_list(path.as_str()).expect("url list should read back");

        assert_eq!(urls, back);
    }

    #[test]
    fn merge_is_a_set_union() {
        let records = get_test_data();
        let scraped = records.clone();
        // The manual run re-extracted the second card identically and adds
        // nothing else
        let manual = vec![records[1].clone()];

        let merged = merge_records(scraped, manual);

        assert_eq!(merged, records);
    }

    #[test]
    fn unwritable_destination_is_an_error() {
        // Let's hope you don't have a file named this in the temp directory
        let path = temp_path("7XLrFH2oGy5e7C5BYXZeVVvwQjaDIe7dMReaLinD47h5R6O4D8SWZUfiod6VF0aN/cards.csv");

        // The parent cannot be created because a regular file sits there
        fs::write(
            temp_path("7XLrFH2oGy5e7C5BYXZeVVvwQjaDIe7dMReaLinD47h5R6O4D8SWZUfiod6VF0aN"),
            "occupied",
        )
        .expect("marker file should be writable");

        assert!(write_records(get_test_data().as_slice(), path.as_str()).is_err());
    }
}
