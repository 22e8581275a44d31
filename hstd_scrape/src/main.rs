use const_format::formatcp;
use hstd::config::ScrapeConfig;
use hstd_scrape::{scraper, DEFAULT_CONFIG_PATH, SCRAPER_HEADING};
use std::{env, process, time::Instant};

const USAGE: &str = formatcp!(
    "Usage: hstd_scrape <command> [args]

  Commands:
    discover    Walk the configured card query and save the list of card URLs.
                Needs MAIN_URL, OUTPUT_PATH and SLEEP_TIME.
    extract     Scrape every card in the saved URL list into the CSV dataset.
                Needs INPUT_PATH, OUTPUT_PATH, FAILED_OUTPUT_PATH and SLEEP_TIME.
    manual      Re-scrape the hand-maintained list of cards whose pages omit
                type and stats. Needs OUTPUT_PATH.
    merge       Concatenate the scraped and manually scraped datasets.
                Needs INPUT_PATH, FAILED_DATAFRAME_FILEPATH and OUTPUT_PATH.

  Options:
    Path of the JSON options file.
    --config or -c    Default: {}

    Also download each card's art into IMAGES_PATH.
    --images or -i

    Display this message instead of running the system.
    --help   or -h

  Conventional dataset locations, for the options file:
    {}
    {}
    {}
    {}",
    DEFAULT_CONFIG_PATH,
    hstd::URL_LIST_OUTPUT,
    hstd::CARDS_OUTPUT,
    hstd::MANUAL_CARDS_OUTPUT,
    hstd::MERGED_OUTPUT,
);

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut command: Option<String> = None;
    let mut config_path = String::from(DEFAULT_CONFIG_PATH);
    let mut with_images = false;

    let mut index = 1;
    let length = args.len();

    while index < length {
        match args[index].as_str() {
            "--config" | "-c" => {
                let path = args.get(index + 1).unwrap_or_else(|| {
                    eprintln!("No configuration file specified");
                    process::exit(1)
                });
                index += 1;
                config_path = path.clone();
            }
            "--images" | "-i" => with_images = true,
            "--help" | "-h" => {
                eprintln!("{}", USAGE);
                process::exit(1)
            }
            other if command.is_none() && !other.starts_with('-') => {
                command = Some(String::from(other));
            }
            other => {
                eprintln!(
                    "Unknown command line option: {}.\nRun with --help (or -h) for valid commands.",
                    other
                );
                process::exit(1)
            }
        };

        index += 1;
    }

    let Some(command) = command else {
        eprintln!("{}", USAGE);
        process::exit(1)
    };

    // Bad or empty options end the run before any network activity
    let config = match ScrapeConfig::load(config_path.as_str()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}.\nProgram will terminate.", err);
            process::exit(1)
        }
    };
    config.echo();

    // Keep track of runtime
    let runtime_start = Instant::now();

    let result = match command.as_str() {
        "discover" => {
            eprintln!("{}Commencing url scraper...", SCRAPER_HEADING);
            scraper::run_discover(&config)
        }
        "extract" => {
            eprintln!("{}Commencing card scraper...", SCRAPER_HEADING);
            scraper::run_extract(&config, with_images)
        }
        "manual" => {
            eprintln!("{}Commencing manual card scraper...", SCRAPER_HEADING);
            scraper::run_manual(&config, with_images)
        }
        "merge" => {
            eprintln!("{}Merging card datasets...", SCRAPER_HEADING);
            scraper::run_merge(&config)
        }
        other => {
            eprintln!(
                "Unknown command: {}.\nRun with --help (or -h) for valid commands.",
                other
            );
            process::exit(1)
        }
    };

    match result {
        Ok(_) => eprintln!(
            "{}Finished in {:.2}s",
            SCRAPER_HEADING,
            runtime_start.elapsed().as_secs_f64()
        ),
        Err(err) => {
            eprintln!(
                "{}Something went wrong! Specifically, this: {}",
                SCRAPER_HEADING, err
            );
            process::exit(1)
        }
    }
}
