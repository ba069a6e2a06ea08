use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitediff_compare::{DiffEngine, DiffOutcome};
use sitediff_crawler::crawler::{Crawler, ScreenshotCreatedCallback, normalize_base_url};
use sitediff_crawler::paths;
use sitediff_crawler::{
    BrowserDriver, ChromiumDriver, HeadlessChromeCapturer, ScreenshotService, UrlFrontier,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::warn;
use url::Url;

// Helper functions shared by both subcommands

/// Resolve the `--root` option once at startup. Relative directory options
/// are joined onto this, never onto the location of the binary.
pub fn resolve_root(root: &str) -> PathBuf {
    let expanded = shellexpand::tilde(root);
    let path = Path::new(expanded.as_ref());
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().expect("current directory is not accessible");
        if path == Path::new(".") {
            cwd
        } else {
            cwd.join(path)
        }
    }
}

/// Resolve a directory option: absolute paths win, everything else lands
/// below the resolved root.
pub fn resolve_dir(root: &Path, dir: &str) -> PathBuf {
    let expanded = shellexpand::tilde(dir);
    let path = Path::new(expanded.as_ref());
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Where an aborted crawl of `base_url` leaves its frontier snapshot.
pub fn recovery_file_path(
    screenshot_dir: &Path,
    base_url: &str,
) -> sitediff_crawler::error::Result<PathBuf> {
    Ok(screenshot_dir.join(paths::target_path(base_url, "json")?))
}

struct CrawlSetup {
    base_url: Url,
    width: u32,
    root: PathBuf,
    browser: String,
    verbose: bool,
}

impl CrawlSetup {
    fn from_args(args: &ArgMatches) -> Self {
        Self {
            base_url: args
                .get_one::<Url>("BASE_URL")
                .expect("BASE_URL is required")
                .clone(),
            width: *args
                .get_one::<u32>("screenshot-width")
                .expect("screenshot-width has a default"),
            root: resolve_root(args.get_one::<String>("root").expect("root has a default")),
            browser: args
                .get_one::<String>("browser")
                .expect("browser has a default")
                .clone(),
            verbose: args.get_flag("verbose"),
        }
    }

    fn dir(&self, args: &ArgMatches, option: &str) -> PathBuf {
        resolve_dir(
            &self.root,
            args.get_one::<String>(option)
                .expect("directory options have defaults"),
        )
    }
}

fn progress_spinner(quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Starting crawl...");
    Some(spinner)
}

/// Print a line without tearing the spinner, if there is one.
fn report(spinner: &Option<ProgressBar>, line: String) {
    match spinner {
        Some(spinner) => spinner.println(line),
        None => println!("{line}"),
    }
}

// createbase

pub async fn handle_createbase(args: &ArgMatches, quiet: bool) {
    tracing_subscriber::fmt::init();

    if let Err(error) = run_createbase(args, quiet).await {
        eprintln!("{} {error:#}", "✗".red().bold());
        std::process::exit(1);
    }
}

async fn run_createbase(args: &ArgMatches, quiet: bool) -> Result<()> {
    let setup = CrawlSetup::from_args(args);
    let screenshot_dir = setup.dir(args, "screenshot-dir");

    // Resume from a snapshot when one is given, otherwise start fresh.
    let mut frontier = match args.get_one::<PathBuf>("recover-file") {
        Some(recover_file) => UrlFrontier::load(recover_file).with_context(|| {
            format!("could not read recover file \"{}\"", recover_file.display())
        })?,
        None => UrlFrontier::seeded(&normalize_base_url(setup.base_url.as_str())),
    };

    let driver = Arc::new(
        ChromiumDriver::launch(setup.width)
            .await
            .context("could not launch the browser")?,
    );
    let screenshots = ScreenshotService::new(
        Arc::new(HeadlessChromeCapturer::new(&setup.browser)),
        screenshot_dir.clone(),
        setup.width,
    );

    let spinner = progress_spinner(quiet);
    let crawler = Crawler::new(driver.clone(), screenshots, setup.base_url.as_str())
        .with_screenshot_callback(created_callback(spinner.clone(), setup.verbose));

    let crawled = crawler.crawl(&mut frontier).await;

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    if let Err(error) = driver.close().await {
        warn!("browser did not shut down cleanly: {error}");
    }

    if let Err(error) = crawled {
        checkpoint(&frontier, &screenshot_dir, crawler.base_url());
        return Err(error).context("crawl aborted");
    }

    println!(
        "{} Created base of {} screenshots under \"{}\".",
        "✓".green().bold(),
        frontier.visited().len(),
        screenshot_dir.display()
    );
    Ok(())
}

fn created_callback(spinner: Option<ProgressBar>, verbose: bool) -> ScreenshotCreatedCallback {
    Arc::new(move |url, screenshot| {
        if let Some(spinner) = &spinner {
            spinner.set_message(format!("Captured {url}"));
        }
        if verbose {
            report(
                &spinner,
                format!(
                    "{} Created screenshot \"{}\" for url \"{}\".",
                    "✓".green(),
                    screenshot.display(),
                    url
                ),
            );
        }
    })
}

/// Persist the frontier next to the screenshots so a later invocation can
/// pick the crawl up with `--recover-file`.
fn checkpoint(frontier: &UrlFrontier, screenshot_dir: &Path, base_url: &str) {
    let snapshot = match recovery_file_path(screenshot_dir, base_url) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            eprintln!("{} Could not derive a recovery file path: {error}", "✗".red());
            return;
        }
    };
    match frontier.save(&snapshot) {
        Ok(()) => println!(
            "{}",
            format!(
                "Saved current state for recovering in \"{}\".",
                snapshot.display()
            )
            .yellow()
        ),
        Err(error) => eprintln!("{} Could not save the recovery snapshot: {error}", "✗".red()),
    }
}

// comparetobase

/// Exit code signalling "the site looks different", distinct from ordinary
/// failures so CI can tell a regression from a broken run.
pub const DEVIATION_EXIT_CODE: i32 = 255;

pub async fn handle_comparetobase(args: &ArgMatches, quiet: bool) {
    tracing_subscriber::fmt::init();

    match run_comparetobase(args, quiet).await {
        Ok(false) => {}
        Ok(true) => std::process::exit(DEVIATION_EXIT_CODE),
        Err(error) => {
            eprintln!("{} {error:#}", "✗".red().bold());
            std::process::exit(1);
        }
    }
}

/// Returns whether any comparison deviated (differences and compare errors
/// both count).
async fn run_comparetobase(args: &ArgMatches, quiet: bool) -> Result<bool> {
    let setup = CrawlSetup::from_args(args);
    let baseline_dir = setup.dir(args, "screenshot-dir");
    let compare_dir = setup.dir(args, "compare-dir");
    let diff_result_dir = setup.dir(args, "diff-result-dir");

    let engine = Arc::new(DiffEngine::new(
        compare_dir.clone(),
        baseline_dir,
        diff_result_dir,
    ));
    let deviations = Arc::new(AtomicBool::new(false));

    let driver = Arc::new(
        ChromiumDriver::launch(setup.width)
            .await
            .context("could not launch the browser")?,
    );
    let screenshots = ScreenshotService::new(
        Arc::new(HeadlessChromeCapturer::new(&setup.browser)),
        compare_dir,
        setup.width,
    );

    let spinner = progress_spinner(quiet);
    let crawler = Crawler::new(driver.clone(), screenshots, setup.base_url.as_str())
        .with_screenshot_callback(compare_callback(
            engine,
            deviations.clone(),
            spinner.clone(),
            setup.verbose,
        ));

    let mut frontier = crawler.seeded_frontier();
    let crawled = crawler.crawl(&mut frontier).await;

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    if let Err(error) = driver.close().await {
        warn!("browser did not shut down cleanly: {error}");
    }
    crawled.context("crawl aborted")?;

    if deviations.load(Ordering::Relaxed) {
        eprintln!(
            "{} The site deviates from the saved base.",
            "✗".red().bold()
        );
    } else {
        println!(
            "{} All {} screenshots match the saved base.",
            "✓".green().bold(),
            frontier.visited().len()
        );
    }
    Ok(deviations.load(Ordering::Relaxed))
}

/// Chained into the crawler so every screenshot is compared right after it
/// is captured, before the next page is visited.
fn compare_callback(
    engine: Arc<DiffEngine>,
    deviations: Arc<AtomicBool>,
    spinner: Option<ProgressBar>,
    verbose: bool,
) -> ScreenshotCreatedCallback {
    Arc::new(move |url, screenshot| {
        if let Some(spinner) = &spinner {
            spinner.set_message(format!("Comparing {url}"));
        }
        match engine.compare(screenshot) {
            Ok(DiffOutcome::Identical) => {
                if verbose {
                    report(
                        &spinner,
                        format!(
                            "{} Screenshot \"{}\" is as expected.",
                            "✓".green(),
                            screenshot.display()
                        ),
                    );
                }
            }
            Ok(DiffOutcome::Different {
                metric,
                diff_artifact,
            }) => {
                deviations.store(true, Ordering::Relaxed);
                report(
                    &spinner,
                    format!(
                        "{} Screenshot \"{}\" is different (rmse {metric:.6}), created diff at \"{}\".",
                        "✗".red().bold(),
                        screenshot.display(),
                        diff_artifact.display()
                    ),
                );
            }
            Err(error) => {
                deviations.store(true, Ordering::Relaxed);
                report(&spinner, format!("{} {error}", "✗".red().bold()));
            }
        }
    })
}
