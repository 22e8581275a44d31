pub mod scraper;

/// Message to print before any scraper logs
pub const SCRAPER_HEADING: &str = "[SCRAPER] ";

/// Options file read when the command line names none
pub const DEFAULT_CONFIG_PATH: &str = "config/scraper_config.json";

/// A manual fallback entry: card URL, its type, attack and health. These
/// pages omit the type and stat fields entirely, so the values are supplied
/// by hand instead of parsed.
pub type ManualCard = (&'static str, &'static str, f64, f64);

/// The hand-maintained list of cards whose pages cannot be extracted the
/// normal way. Spell entries carry zeroes; their stats are ignored anyway.
pub const MANUAL_CARDS: [ManualCard; 3] = [
    (
        "https://www.hearthstonetopdecks.com/cards/siegebreaker/",
        "Minion",
        5.0,
        8.0,
    ),
    (
        "https://www.hearthstonetopdecks.com/cards/subject-9/",
        "Minion",
        4.0,
        4.0,
    ),
    (
        "https://www.hearthstonetopdecks.com/cards/breath-of-the-infinite/",
        "Spell",
        0.0,
        0.0,
    ),
];
