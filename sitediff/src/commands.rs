use crate::CLAP_STYLING;
use clap::{arg, command};
use std::path::PathBuf;
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitediff")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitediff")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("createbase")
                .about("Crawls and screenshots the website, as a base for future comparisons")
                .arg(
                    arg!(<BASE_URL>)
                        .help("The base url of the website to crawl, e.g. https://typo3.org/")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"screenshot-dir" <DIR>)
                        .required(false)
                        .help("Directory to store created screenshots in")
                        .default_value("output/base"),
                )
                .arg(
                    arg!(--"screenshot-width" <PIXELS>)
                        .required(false)
                        .help("The width for screen resolution and screenshots")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("3840"),
                )
                .arg(
                    arg!(--"recover-file" <PATH>)
                        .required(false)
                        .help("JSON snapshot of a stopped crawl, used to resume it")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"root" <DIR>)
                        .required(false)
                        .help("Root that relative directory options are resolved against")
                        .default_value("."),
                )
                .arg(
                    arg!(--"browser" <BIN>)
                        .required(false)
                        .help("Headless browser binary used to take screenshots")
                        .default_value("chromium-browser"),
                )
                .arg(arg!(-v --"verbose" "Report every created screenshot").required(false)),
        )
        .subcommand(
            command!("comparetobase")
                .about("Crawls the website again and compares every screenshot against the saved base")
                .arg(
                    arg!(<BASE_URL>)
                        .help("The base url of the website to crawl, e.g. https://typo3.org/")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(--"screenshot-dir" <DIR>)
                        .required(false)
                        .help("Directory containing the base screenshots to compare against")
                        .default_value("output/base"),
                )
                .arg(
                    arg!(--"compare-dir" <DIR>)
                        .required(false)
                        .help("Directory to store the freshly created screenshots in")
                        .default_value("output/compare"),
                )
                .arg(
                    arg!(--"diff-result-dir" <DIR>)
                        .required(false)
                        .help("Directory to store created diffs in")
                        .default_value("output/diffResult"),
                )
                .arg(
                    arg!(--"screenshot-width" <PIXELS>)
                        .required(false)
                        .help("The width for screen resolution and screenshots")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("3840"),
                )
                .arg(
                    arg!(--"root" <DIR>)
                        .required(false)
                        .help("Root that relative directory options are resolved against")
                        .default_value("."),
                )
                .arg(
                    arg!(--"browser" <BIN>)
                        .required(false)
                        .help("Headless browser binary used to take screenshots")
                        .default_value("chromium-browser"),
                )
                .arg(arg!(-v --"verbose" "Also report screenshots that match the base").required(false)),
        )
}
