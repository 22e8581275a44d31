pub mod card;
pub mod config;
pub mod encoding;

use const_format::formatcp;

// Directory where pipeline outputs land unless the config says otherwise
pub const DATA_DIR: &str = "./data";

// Conventional output locations for each pipeline stage
pub const URL_LIST_OUTPUT: &str = formatcp!("{}/hstd_card_urls.json", DATA_DIR);
pub const CARDS_OUTPUT: &str = formatcp!("{}/hstd_all_cards.csv", DATA_DIR);
pub const FAILED_URLS_OUTPUT: &str = formatcp!("{}/hstd_failed_urls.json", DATA_DIR);
pub const MANUAL_CARDS_OUTPUT: &str = formatcp!("{}/hstd_failed_cards.csv", DATA_DIR);
pub const MERGED_OUTPUT: &str = formatcp!("{}/hstd_all_cards_merged.csv", DATA_DIR);
