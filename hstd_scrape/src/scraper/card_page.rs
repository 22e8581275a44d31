//! Turns one card detail page into a [`CardRecord`].
//!
//! The site describes a card with a loosely structured details list, a
//! content block split by a literal "Card Text" marker, and a handful of
//! optional widgets (rating, comment count, comment section). All of the
//! `key: value` parsing funnels through [`CardDetails`] so the type
//! dispatch below can be tested against synthetic dictionaries instead of
//! live pages.

use super::{clean_text, scraper_types::ScrapeError};
use hstd::card::{CardRecord, CardType, TypeFields, NO_SPELL_TYPE};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};

lazy_static! {
    static ref RATING_PATTERN: Regex =
        Regex::new(r"Rating:\s*(\d+(?:\.\d+)?)\s*/").expect("hardcoded regex, shouldn't fail");
}

/// The key/value pairs of the card details list.
pub struct CardDetails {
    fields: HashMap<String, String>,
}

impl CardDetails {
    /// Parses the details list out of the page. The page repeats the
    /// details container; the last one wins.
    ///
    /// Each list item must look like `key: value`; only the segment right
    /// after the first `": "` is kept as the value.
    pub fn from_document(document: &Html) -> Result<CardDetails, ScrapeError> {
        let container =
            Selector::parse("div.col-md-14").expect("hardcoded selector, shouldn't fail");
        let item = Selector::parse("li").expect("hardcoded selector, shouldn't fail");

        let mut cells: Option<Vec<String>> = None;
        for row in document.select(&container) {
            cells = Some(row.select(&item).map(element_text).collect());
        }
        let cells = cells.ok_or(ScrapeError::MissingElement("div.col-md-14"))?;

        let mut fields = HashMap::new();
        for cell in cells {
            let mut parts = cell.split(": ");
            let key = String::from(parts.next().unwrap_or_default());
            let value = parts.next().map(String::from);

            match value {
                Some(value) => {
                    fields.insert(key, value);
                }
                None => return Err(ScrapeError::DetailLayout(cell)),
            }
        }

        Ok(CardDetails { fields })
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> CardDetails {
        CardDetails {
            fields: pairs
                .iter()
                .map(|(key, value)| (String::from(*key), String::from(*value)))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str, ScrapeError> {
        self.get(key)
            .ok_or_else(|| ScrapeError::MissingField(String::from(key)))
    }

    fn require_number(&self, key: &'static str) -> Result<f64, ScrapeError> {
        let value = self.require(key)?;
        value.parse().map_err(|_| ScrapeError::InvalidNumber {
            field: key,
            value: String::from(value),
        })
    }
}

/// Extracts the full record from a detail page, with every field parsed
/// from the markup.
pub fn parse_card(document: &Html) -> Result<CardRecord, ScrapeError> {
    let details = CardDetails::from_document(document)?;
    let card_type = CardType::from_name(details.require("Type")?);
    let type_fields = type_fields(&card_type, &details)?;

    assemble(document, &details, card_type, type_fields)
}

/// Extraction for the hand-curated fallback list: the type and stats come
/// from the caller because these pages omit them, everything else is
/// parsed as usual.
pub fn parse_card_with_overrides(
    document: &Html,
    type_name: &str,
    attack: f64,
    health: f64,
) -> Result<CardRecord, ScrapeError> {
    let details = CardDetails::from_document(document)?;
    let card_type = CardType::from_name(type_name);
    let type_fields = type_fields_with_overrides(&card_type, &details, attack, health)?;

    assemble(document, &details, card_type, type_fields)
}

fn assemble(
    document: &Html,
    details: &CardDetails,
    card_type: CardType,
    type_fields: TypeFields,
) -> Result<CardRecord, ScrapeError> {
    let title_selector =
        Selector::parse("h1.entry-title").expect("hardcoded selector, shouldn't fail");
    let content_selector =
        Selector::parse("div.card-content").expect("hardcoded selector, shouldn't fail");

    let title = element_text(
        document
            .select(&title_selector)
            .next()
            .ok_or(ScrapeError::MissingElement("h1.entry-title"))?,
    );

    // The content block reads "<summary> Card Text <text>"; cards without
    // card text just have no marker
    let content = element_text(
        document
            .select(&content_selector)
            .next()
            .ok_or(ScrapeError::MissingElement("div.card-content"))?,
    );
    let sections: Vec<&str> = content.split("Card Text").collect();
    let summary = clean_text(sections[0]);
    let text = if sections.len() > 1 {
        clean_text(sections[1])
    } else {
        String::new()
    };

    let cost = details.require_number("Mana Cost")?;

    Ok(CardRecord {
        title,
        summary,
        text,
        card_type,
        cost,
        rarity: String::from(details.require("Rarity")?),
        classes: card_classes(details)?,
        set_name: String::from(details.require("Set")?),
        mechanics: card_mechanics(details),
        rating: card_rating(document)?,
        num_comments: comment_count(document)?,
        comments: card_comments(document)?,
        type_fields,
    })
}

/// A card normally lists a singular "Class"; dual-class cards list both
/// under "Classes" instead.
fn card_classes(details: &CardDetails) -> Result<Vec<String>, ScrapeError> {
    if let Some(class) = details.get("Class") {
        return Ok(vec![String::from(class)]);
    }

    Ok(details
        .require("Classes")?
        .split(',')
        .map(|entry| String::from(entry.trim()))
        .collect())
}

fn card_mechanics(details: &CardDetails) -> Vec<String> {
    match details.get("Mechanics") {
        Some(mechanics) => mechanics.split(", ").map(String::from).collect(),
        None => Vec::new(),
    }
}

/// Not all cards have a rating; a card with a rating widget whose text has
/// drifted from "Rating: X/Y" fails loudly rather than scoring silently.
fn card_rating(document: &Html) -> Result<Option<f64>, ScrapeError> {
    let widget =
        Selector::parse("div.gdrts-rating-text").expect("hardcoded selector, shouldn't fail");
    let Some(element) = document.select(&widget).next() else {
        return Ok(None);
    };

    let text = element_text(element);
    let rating = RATING_PATTERN
        .captures(text.as_str())
        .and_then(|captures| captures.get(1))
        .and_then(|figure| figure.as_str().parse().ok());

    match rating {
        Some(rating) => Ok(Some(rating)),
        None => Err(ScrapeError::RatingLayout(text)),
    }
}

/// The comment count hides in the section heading, e.g. "14 Comments on
/// ...". The site spells a count of one as the word "One".
fn comment_count(document: &Html) -> Result<u32, ScrapeError> {
    let widget =
        Selector::parse("div.comments-title-wrap").expect("hardcoded selector, shouldn't fail");
    let Some(element) = document.select(&widget).next() else {
        return Ok(0);
    };

    let text = clean_text(element_text(element).as_str());
    let token = text.split(' ').next().unwrap_or_default();
    if token == "One" {
        return Ok(1);
    }

    token.parse().map_err(|_| ScrapeError::InvalidNumber {
        field: "comment count",
        value: String::from(token),
    })
}

/// Each comment item flattens to text in double-newline-separated segments
/// with the body at index 5. Fewer segments means the layout changed, and
/// the card must fail instead of quietly picking up the wrong segment.
/// Repeated comment bodies collapse to the first occurrence.
fn card_comments(document: &Html) -> Result<Vec<String>, ScrapeError> {
    let item = Selector::parse(r#"li[itemtype="//schema.org/Comment"]"#)
        .expect("hardcoded selector, shouldn't fail");

    let mut seen = HashSet::new();
    let mut comments = Vec::new();
    for element in document.select(&item) {
        let raw = element_text(element);
        let segments: Vec<&str> = raw.split("\n\n").collect();
        let body = segments
            .get(5)
            .ok_or(ScrapeError::CommentLayout(segments.len()))?;

        let comment = clean_text(body);
        if seen.insert(comment.clone()) {
            comments.push(comment);
        }
    }

    Ok(comments)
}

fn type_fields(card_type: &CardType, details: &CardDetails) -> Result<TypeFields, ScrapeError> {
    let fields = match card_type {
        CardType::Minion => TypeFields::Minion {
            attack: details.require_number("Attack")?,
            health: details.require_number("Health")?,
        },
        CardType::Spell => TypeFields::Spell {
            school: spell_school(details),
        },
        CardType::Hero => TypeFields::Hero,
        CardType::Weapon => TypeFields::Weapon {
            attack: details.require_number("Attack")?,
            durability: details.require_number("Durability")?,
        },
        // Technically shouldn't get these
        CardType::Other(_) => TypeFields::Other,
    };

    Ok(fields)
}

/// Override variant of [`type_fields`]: the caller-supplied stats replace
/// the parsed ones where the type carries stats; a weapon's durability is
/// still read from the page.
fn type_fields_with_overrides(
    card_type: &CardType,
    details: &CardDetails,
    attack: f64,
    health: f64,
) -> Result<TypeFields, ScrapeError> {
    let fields = match card_type {
        CardType::Minion => TypeFields::Minion { attack, health },
        CardType::Spell => TypeFields::Spell {
            school: spell_school(details),
        },
        CardType::Hero => TypeFields::Hero,
        CardType::Weapon => TypeFields::Weapon {
            attack,
            durability: details.require_number("Durability")?,
        },
        CardType::Other(_) => TypeFields::Other,
    };

    Ok(fields)
}

// Some spells have no school at all
fn spell_school(details: &CardDetails) -> String {
    match details.get("School") {
        Some(school) => String::from(school),
        None => String::from(NO_SPELL_TYPE),
    }
}

/// The card art URL the page advertises for sharing, if any.
pub fn image_url(document: &Html) -> Option<String> {
    let meta =
        Selector::parse(r#"meta[property="og:image"]"#).expect("hardcoded selector, shouldn't fail");

    document
        .select(&meta)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(String::from)
}

fn element_text(element: ElementRef) -> String {
    element.text().collect()
}
