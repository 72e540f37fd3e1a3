//! `scrape` command: launch the browser, run the driver, export.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tilescrape_core::{AppConfig, ProductType, RunConfiguration, TriggerInput};
use tilescrape_scraper::{
    export_json, run_scrape, ChromiumBrowser, DriverTiming, LaunchOptions, ScrapeReport,
};

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Listing URL to scrape
    #[arg(long, required_unless_present = "job", conflicts_with = "job")]
    pub base_url: Option<String>,

    /// YAML job file describing the run instead of the listing flags
    #[arg(long)]
    pub job: Option<PathBuf>,

    /// First page to visit
    #[arg(long, default_value_t = 1)]
    pub start_page: u32,

    /// Last page to visit (defaults to the start page)
    #[arg(long)]
    pub end_page: Option<u32>,

    /// Treat the listing as infinite-scroll instead of paged
    #[arg(long)]
    pub infinite: bool,

    /// Scroll passes in infinite mode (upper bound with --until-stable)
    #[arg(long, default_value_t = 10)]
    pub scroll_passes: u32,

    /// Pause after each infinite-mode scroll pass, in milliseconds
    #[arg(long, default_value_t = 1500)]
    pub scroll_delay_ms: u64,

    /// Stop scrolling once the tile count stops growing
    #[arg(long, requires = "infinite")]
    pub until_stable: bool,

    /// Passes without growth before --until-stable stops
    #[arg(long, default_value_t = 2)]
    pub stable_passes: u32,

    /// Only keep these product types (comma-separated, e.g. hoodie,shirt)
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<ProductType>,

    /// Export path (defaults to TILESCRAPE_OUTPUT_PATH)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl ScrapeArgs {
    /// Builds the validated run from the job file or the listing flags.
    ///
    /// `--types` overrides a job file's allow-list when given.
    pub fn run_configuration(&self) -> anyhow::Result<RunConfiguration> {
        if let Some(path) = &self.job {
            let mut run = tilescrape_core::load_job(path)
                .with_context(|| format!("failed to load job {}", path.display()))?;
            if !self.types.is_empty() {
                run.allow_list = self.types.iter().copied().collect();
            }
            return Ok(run);
        }

        let trigger = TriggerInput {
            base_url: self.base_url.clone().unwrap_or_default(),
            start_page: self.start_page,
            end_page: self.end_page.unwrap_or(self.start_page),
            infinite_mode: self.infinite,
            scroll_passes: self.scroll_passes,
            scroll_delay: self.scroll_delay_ms,
            selected_types: self.types.clone(),
            until_stable: self.until_stable,
            stable_passes: self.stable_passes,
        };
        Ok(trigger.into_run_configuration()?)
    }
}

/// Run one scrape and write the export.
///
/// # Errors
///
/// Returns an error if the run configuration is invalid, the browser cannot
/// be launched, the tab cannot be opened, or the export cannot be written.
/// Per-page failures only show up in the summary.
pub(crate) async fn run_scrape_command(config: &AppConfig, args: &ScrapeArgs) -> anyhow::Result<()> {
    let run = args.run_configuration()?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_path.clone());

    let browser = ChromiumBrowser::launch(&LaunchOptions {
        executable: config.chromium_path.clone(),
        headless: config.headless,
        user_data_dir: config.user_data_dir.clone(),
    })
    .await?;

    let timing = DriverTiming::from_app_config(config);
    let result = run_scrape(&browser, &run, &timing).await;
    browser.shutdown().await;
    let report = result?;

    print_summary(&report);
    export_json(&output, &report.records).context("export failed")?;
    println!("wrote {} products to {}", report.merged_count(), output.display());
    Ok(())
}

fn print_summary(report: &ScrapeReport) {
    for page in &report.pages {
        match &page.error {
            Some(error) => println!("{}: failed ({error})", page.label()),
            None => println!(
                "{}: {} tiles, {} kept{}",
                page.label(),
                page.tiles_seen,
                page.records_kept,
                if page.content_ready { "" } else { " (content wait timed out)" }
            ),
        }
    }
    let failed = report.failed_pages().count();
    println!(
        "scraped {} products ({} before dedup) from {} pages, {failed} failed",
        report.merged_count(),
        report.raw_count,
        report.pages.len()
    );
}
