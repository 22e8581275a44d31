use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Sentinel written to the `school` column of every card that is not a spell.
pub const NOT_SPELL: &str = "Not Spell";

/// Sentinel used for spells whose page lists no spell school.
pub const NO_SPELL_TYPE: &str = "No spell type";

/// The card types the site knows about. Anything else is kept verbatim so
/// the original string survives a round trip through the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum CardType {
    Minion,
    Spell,
    Hero,
    Weapon,
    Other(String),
}

impl CardType {
    pub fn from_name(name: &str) -> CardType {
        match name {
            "Minion" => CardType::Minion,
            "Spell" => CardType::Spell,
            "Hero" => CardType::Hero,
            "Weapon" => CardType::Weapon,
            other => CardType::Other(String::from(other)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CardType::Minion => "Minion",
            CardType::Spell => "Spell",
            CardType::Hero => "Hero",
            CardType::Weapon => "Weapon",
            CardType::Other(name) => name.as_str(),
        }
    }
}

impl Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The payload that only exists for certain card types. Keeping these in a
/// variant means a spell can never accidentally carry an attack value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeFields {
    Minion { attack: f64, health: f64 },
    Spell { school: String },
    Hero,
    Weapon { attack: f64, durability: f64 },
    Other,
}

impl TypeFields {
    pub fn attack(&self) -> Option<f64> {
        match self {
            TypeFields::Minion { attack, .. } | TypeFields::Weapon { attack, .. } => Some(*attack),
            _ => None,
        }
    }

    pub fn health(&self) -> Option<f64> {
        match self {
            TypeFields::Minion { health, .. } => Some(*health),
            _ => None,
        }
    }

    /// The school column is always populated; non-spells get the sentinel.
    pub fn school(&self) -> &str {
        match self {
            TypeFields::Spell { school } => school.as_str(),
            _ => NOT_SPELL,
        }
    }

    pub fn durability(&self) -> Option<f64> {
        match self {
            TypeFields::Weapon { durability, .. } => Some(*durability),
            _ => None,
        }
    }
}

/// One fully extracted card page.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRecord {
    pub title: String,
    /// Prose before the "Card Text" marker on the page
    pub summary: String,
    /// Prose after the marker, empty when the page has none
    pub text: String,
    pub card_type: CardType,
    pub cost: f64,
    pub rarity: String,
    /// One entry normally, two for dual-class cards
    pub classes: Vec<String>,
    pub set_name: String,
    pub mechanics: Vec<String>,
    pub rating: Option<f64>,
    pub num_comments: u32,
    pub comments: Vec<String>,
    pub type_fields: TypeFields,
}

impl CardRecord {
    /// A card is dual-class exactly when it carries two class tags. The
    /// record is not split into per-class rows; consumers decide that.
    pub fn dual_class(&self) -> bool {
        self.classes.len() > 1
    }
}

/// Flat row shape used for the CSV dataset. Every column is present for
/// every card; type-conditional columns hold explicit sentinels instead of
/// being omitted, so the tabular output always aligns.
///
/// List-valued columns (`class`, `mechanics`, `comments`) hold a JSON array
/// in the cell so their contents survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRow {
    pub title: String,
    pub summary: String,
    pub text: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub cost: f64,
    pub rarity: String,
    pub class: String,
    pub dual_class: bool,
    #[serde(rename = "set")]
    pub set_name: String,
    pub mechanics: String,
    pub rating: Option<f64>,
    pub num_comments: u32,
    pub comments: String,
    pub attack: Option<f64>,
    pub health: Option<f64>,
    pub school: String,
    pub durability: Option<f64>,
}

/// Why a CSV row could not be turned back into a record.
#[derive(Debug)]
pub enum CardRowError {
    Json(serde_json::Error),
    MissingColumn(&'static str),
}

impl From<serde_json::Error> for CardRowError {
    fn from(err: serde_json::Error) -> Self {
        CardRowError::Json(err)
    }
}

impl Display for CardRowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardRowError::Json(err) => write!(f, "bad list cell in row: {}", err),
            CardRowError::MissingColumn(column) => {
                write!(f, "row is missing a value for the {} column", column)
            }
        }
    }
}

impl From<&CardRecord> for CardRow {
    fn from(record: &CardRecord) -> Self {
        let encode = |list: &Vec<String>| {
            serde_json::to_string(list).expect("a list of strings always encodes")
        };

        CardRow {
            title: record.title.clone(),
            summary: record.summary.clone(),
            text: record.text.clone(),
            card_type: record.card_type.name().to_owned(),
            cost: record.cost,
            rarity: record.rarity.clone(),
            class: encode(&record.classes),
            dual_class: record.dual_class(),
            set_name: record.set_name.clone(),
            mechanics: encode(&record.mechanics),
            rating: record.rating,
            num_comments: record.num_comments,
            comments: encode(&record.comments),
            attack: record.type_fields.attack(),
            health: record.type_fields.health(),
            school: record.type_fields.school().to_owned(),
            durability: record.type_fields.durability(),
        }
    }
}

impl TryFrom<CardRow> for CardRecord {
    type Error = CardRowError;

    fn try_from(row: CardRow) -> Result<Self, Self::Error> {
        let classes: Vec<String> = serde_json::from_str(row.class.as_str())?;
        let mechanics: Vec<String> = serde_json::from_str(row.mechanics.as_str())?;
        let comments: Vec<String> = serde_json::from_str(row.comments.as_str())?;

        let card_type = CardType::from_name(row.card_type.as_str());
        let type_fields = match card_type {
            CardType::Minion => TypeFields::Minion {
                attack: row.attack.ok_or(CardRowError::MissingColumn("attack"))?,
                health: row.health.ok_or(CardRowError::MissingColumn("health"))?,
            },
            CardType::Spell => TypeFields::Spell { school: row.school },
            CardType::Hero => TypeFields::Hero,
            CardType::Weapon => TypeFields::Weapon {
                attack: row.attack.ok_or(CardRowError::MissingColumn("attack"))?,
                durability: row
                    .durability
                    .ok_or(CardRowError::MissingColumn("durability"))?,
            },
            CardType::Other(_) => TypeFields::Other,
        };

        Ok(CardRecord {
            title: row.title,
            summary: row.summary,
            text: row.text,
            card_type,
            cost: row.cost,
            rarity: row.rarity,
            classes,
            set_name: row.set_name,
            mechanics,
            rating: row.rating,
            num_comments: row.num_comments,
            comments,
            type_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minion() -> CardRecord {
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
            comments: vec![String::from("Decent arena card.")],
            type_fields: TypeFields::Minion {
                attack: 5.0,
                health: 8.0,
            },
        }
    }

    #[test]
    fn minion_round_trips_through_row() {
        let record = minion();
        let row = CardRow::from(&record);
        let back = CardRecord::try_from(row).expect("row should convert back");

        assert_eq!(record, back);
    }

    #[test]
    fn minion_school_is_the_sentinel() {
        let row = CardRow::from(&minion());

        assert_eq!(row.school, NOT_SPELL);
        assert_eq!(row.attack, Some(5.0));
        assert_eq!(row.health, Some(8.0));
        assert_eq!(row.durability, None);
    }

    #[test]
    fn spell_row_carries_only_school() {
        let mut record = minion();
        record.card_type = CardType::Spell;
        record.type_fields = TypeFields::Spell {
            school: String::from(NO_SPELL_TYPE),
        };

        let row = CardRow::from(&record);

        assert_eq!(row.attack, None);
        assert_eq!(row.health, None);
        assert_eq!(row.durability, None);
        assert_eq!(row.school, NO_SPELL_TYPE);
    }

    #[test]
    fn unknown_type_keeps_its_name_and_no_payload() {
        let mut record = minion();
        record.card_type = CardType::Other(String::from("Location"));
        record.type_fields = TypeFields::Other;

        let row = CardRow::from(&record);
        assert_eq!(row.card_type, "Location");

        let back = CardRecord::try_from(row).expect("row should convert back");
        assert_eq!(back.card_type, CardType::Other(String::from("Location")));
        assert_eq!(back.type_fields, TypeFields::Other);
    }

    #[test]
    fn dual_class_is_flagged() {
        let mut record = minion();
        assert!(!record.dual_class());

        record.classes.push(String::from("Priest"));
        assert!(record.dual_class());
        assert!(CardRow::from(&record).dual_class);
    }

    #[test]
    fn minion_row_without_attack_is_rejected() {
        let mut row = CardRow::from(&minion());
        row.attack = None;

        assert!(matches!(
            CardRecord::try_from(row),
            Err(CardRowError::MissingColumn("attack"))
        ));
    }
}
