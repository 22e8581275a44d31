use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::fs;
use std::path::Path;

/// The recognized configuration options. Every pipeline stage reads the
/// same shape and validates the keys it actually needs before touching the
/// network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Root query URL handed to the link discoverer
    #[serde(rename = "MAIN_URL", default)]
    pub main_url: Option<String>,
    /// Where the current stage reads its input from
    #[serde(rename = "INPUT_PATH", default)]
    pub input_path: Option<String>,
    /// Where the current stage writes its output
    #[serde(rename = "OUTPUT_PATH", default)]
    pub output_path: Option<String>,
    /// Destination for the list of URLs that failed extraction
    #[serde(rename = "FAILED_OUTPUT_PATH", default)]
    pub failed_output_path: Option<String>,
    /// The manually re-extracted card dataset, consumed by the merge stage
    #[serde(rename = "FAILED_DATAFRAME_FILEPATH", default)]
    pub failed_dataframe_filepath: Option<String>,
    /// Seconds to wait between successful requests
    #[serde(rename = "SLEEP_TIME", default)]
    pub sleep_time: Option<f64>,
    /// Directory for card art downloads, only needed with --images
    #[serde(rename = "IMAGES_PATH", default)]
    pub images_path: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    /// Missing or wrongly named options file
    Missing(String),
    Unreadable(serde_json::Error),
    /// The file parsed but holds no options at all
    Empty,
    /// A stage asked for an option the file does not carry
    MissingOption(&'static str),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Unreadable(err)
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(path) => {
                write!(f, "missing or wrongly named options file: {}", path)
            }
            ConfigError::Unreadable(err) => write!(f, "options file is not valid JSON: {}", err),
            ConfigError::Empty => write!(f, "empty options file"),
            ConfigError::MissingOption(key) => {
                write!(f, "options file has no value for {}", key)
            }
        }
    }
}

impl ScrapeConfig {
    /// Loads the options file, refusing to continue when it is missing or
    /// empty. The whole run aborts on any of these before any network
    /// activity happens.
    pub fn load(path: &str) -> Result<ScrapeConfig, ConfigError> {
        if !Path::new(path).is_file() {
            return Err(ConfigError::Missing(String::from(path)));
        }

        let raw = fs::read_to_string(path).map_err(|_| ConfigError::Missing(String::from(path)))?;
        let value: serde_json::Value = serde_json::from_str(raw.as_str())?;

        match value.as_object() {
            Some(map) if !map.is_empty() => {}
            _ => return Err(ConfigError::Empty),
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Echoes every option that was set, the way the run log has always
    /// listed them.
    pub fn echo(&self) {
        println!("\nFetching options from configuration file: ");
        println!("# -------------------------------------- #");
        let print_option = |key: &str, value: &str| println!("\t* {}: {}", key, value);

        if let Some(url) = &self.main_url {
            print_option("MAIN_URL", url);
        }
        if let Some(path) = &self.input_path {
            print_option("INPUT_PATH", path);
        }
        if let Some(path) = &self.output_path {
            print_option("OUTPUT_PATH", path);
        }
        if let Some(path) = &self.failed_output_path {
            print_option("FAILED_OUTPUT_PATH", path);
        }
        if let Some(path) = &self.failed_dataframe_filepath {
            print_option("FAILED_DATAFRAME_FILEPATH", path);
        }
        if let Some(seconds) = self.sleep_time {
            print_option("SLEEP_TIME", format!("{}", seconds).as_str());
        }
        if let Some(path) = &self.images_path {
            print_option("IMAGES_PATH", path);
        }
        println!();
    }

    pub fn require_main_url(&self) -> Result<&str, ConfigError> {
        self.main_url
            .as_deref()
            .ok_or(ConfigError::MissingOption("MAIN_URL"))
    }

    pub fn require_input_path(&self) -> Result<&str, ConfigError> {
        self.input_path
            .as_deref()
            .ok_or(ConfigError::MissingOption("INPUT_PATH"))
    }

    pub fn require_output_path(&self) -> Result<&str, ConfigError> {
        self.output_path
            .as_deref()
            .ok_or(ConfigError::MissingOption("OUTPUT_PATH"))
    }

    pub fn require_failed_output_path(&self) -> Result<&str, ConfigError> {
        self.failed_output_path
            .as_deref()
            .ok_or(ConfigError::MissingOption("FAILED_OUTPUT_PATH"))
    }

    pub fn require_failed_dataframe_filepath(&self) -> Result<&str, ConfigError> {
        self.failed_dataframe_filepath
            .as_deref()
            .ok_or(ConfigError::MissingOption("FAILED_DATAFRAME_FILEPATH"))
    }

    pub fn require_sleep_time(&self) -> Result<f64, ConfigError> {
        self.sleep_time
            .ok_or(ConfigError::MissingOption("SLEEP_TIME"))
    }

    pub fn require_images_path(&self) -> Result<&str, ConfigError> {
        self.images_path
            .as_deref()
            .ok_or(ConfigError::MissingOption("IMAGES_PATH"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn write_temp_config(name: &str, contents: &str) -> String {
        let mut path = env::temp_dir();
        path.push(name);
        fs::write(&path, contents).expect("test config should be writable");
        path.to_str().expect("temp dir should be UTF-8").to_owned()
    }

    #[test]
    fn missing_file_is_fatal() {
        let result = ScrapeConfig::load("no/such/options_file.json");

        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn empty_options_are_fatal() {
        let path = write_temp_config("hstd_empty_config.json", "{}");

        assert!(matches!(
            ScrapeConfig::load(path.as_str()),
            Err(ConfigError::Empty)
        ));
    }

    #[test]
    fn options_unpack() {
        let path = write_temp_config(
            "hstd_full_config.json",
            r#"{
                "MAIN_URL": "https://www.hearthstonetopdecks.com/cards/?st=&manaCost=",
                "OUTPUT_PATH": "data/hstd_card_urls.json",
                "SLEEP_TIME": 1.5
            }"#,
        );

        let config = ScrapeConfig::load(path.as_str()).expect("config should load");

        assert_eq!(
            config.require_main_url().expect("url is set"),
            "https://www.hearthstonetopdecks.com/cards/?st=&manaCost="
        );
        assert_eq!(
            config.require_output_path().expect("path is set"),
            "data/hstd_card_urls.json"
        );
        assert_eq!(config.require_sleep_time().expect("sleep is set"), 1.5);
    }

    #[test]
    fn absent_options_are_reported_by_name() {
        let path = write_temp_config("hstd_partial_config.json", r#"{"SLEEP_TIME": 1}"#);
        let config = ScrapeConfig::load(path.as_str()).expect("config should load");

        assert!(matches!(
            config.require_main_url(),
            Err(ConfigError::MissingOption("MAIN_URL"))
        ));
        assert!(matches!(
            config.require_failed_output_path(),
            Err(ConfigError::MissingOption("FAILED_OUTPUT_PATH"))
        ));
    }
}
