//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::error::{Error, Result};
use crate::extract::JsonPathExtractor;
use crate::loader::{load_listing, ListingDefinition};
use crate::navigation::LocationHistory;
use crate::pagination::{PageState, PaginationController};
use crate::query::HttpQueryClient;
use crate::template;
use crate::types::JsonValue;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Outcome of a paging run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// Listing name
    pub listing: String,
    /// Location after the last navigation
    pub location: Option<String>,
    /// Number of pages fetched
    pub pages_fetched: u32,
    /// Accumulated state
    #[serde(flatten)]
    pub state: PageState<JsonValue>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Page { page } => {
                let def = self.load_listing()?;
                let report = run_page(&def, *page).await?;
                self.print(&report)
            }
            Commands::More { from, pages } => {
                let def = self.load_listing()?;
                let report = run_more(&def, *from, *pages).await?;
                self.print(&report)
            }
            Commands::Validate => self.validate(),
        }
    }

    /// Load listing definition, applying `--var` overrides
    fn load_listing(&self) -> Result<ListingDefinition> {
        let path = self
            .cli
            .listing
            .as_ref()
            .ok_or_else(|| Error::config("Listing file not specified (use -l flag)"))?;
        let mut def = load_listing(path)?;

        for (key, value) in &self.cli.vars {
            let parsed = serde_json::from_str(value).unwrap_or(JsonValue::String(value.clone()));
            def.variables.insert(key.clone(), parsed);
        }

        Ok(def)
    }

    fn validate(&self) -> Result<()> {
        let def = self.load_listing()?;
        match self.cli.format {
            OutputFormat::Json => {
                let out = serde_json::json!({
                    "status": "VALID",
                    "listing": def.name,
                    "endpoint": def.endpoint,
                    "first_page": template::render_page_url(&def.page_url, 1, &def.variables_value())?,
                });
                println!("{out}");
            }
            OutputFormat::Pretty => {
                println!("Listing '{}' is valid", def.name);
                println!("  Endpoint: {}", def.endpoint);
                println!("  Items:    {}", def.items_path);
            }
        }
        Ok(())
    }

    fn print(&self, report: &RunReport) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(report)?);
            }
            OutputFormat::Pretty => {
                let info = &report.state.paginator_info;
                println!("Listing:  {}", report.listing);
                if let Some(location) = &report.location {
                    println!("Location: {location}");
                }
                println!(
                    "Page {} of {} ({} total, more pages: {})",
                    info.current_page,
                    info.last_page,
                    info.total,
                    if info.has_more_pages { "yes" } else { "no" }
                );
                for (index, item) in report.state.items.iter().enumerate() {
                    println!("  {:>4}. {}", index + 1, item);
                }
            }
        }
        Ok(())
    }
}

/// Build a controller for a listing, publishing into `history`
pub fn build_controller(
    def: &ListingDefinition,
    history: &LocationHistory,
) -> Result<PaginationController<JsonValue>> {
    let client = HttpQueryClient::with_config(def.http_config())?;

    PaginationController::builder(Arc::new(client), def.document.clone())
        .variables(def.variables.clone())
        .page_variable(def.page_variable.clone())
        .extractor(JsonPathExtractor::<JsonValue>::new(def.items_path.clone()))
        .navigator(history.clone())
        .navigate_on_page_ops(def.navigate_on_page_ops)
        .concurrency(def.concurrency)
        .build()
}

/// Jump to a single page
pub async fn run_page(def: &ListingDefinition, page: u32) -> Result<RunReport> {
    let history = LocationHistory::new();
    let controller = build_controller(def, &history)?;
    let vars = def.variables_value();

    let url = template::render_page_url(&def.page_url, page, &vars)?;
    info!("Fetching page {} of '{}'", page, def.name);
    controller.go_to_page(page, &url).await?;

    Ok(RunReport {
        listing: def.name.clone(),
        location: history.current(),
        pages_fetched: 1,
        state: controller.snapshot(),
    })
}

/// Jump to `from`, then load up to `pages` further pages onto it
///
/// Stops early when the listing reports no more pages.
pub async fn run_more(def: &ListingDefinition, from: u32, pages: u32) -> Result<RunReport> {
    let history = LocationHistory::new();
    let controller = build_controller(def, &history)?;
    let vars = def.variables_value();

    let url = template::render_page_url(&def.page_url, from, &vars)?;
    info!("Fetching page {} of '{}'", from, def.name);
    controller.go_to_page(from, &url).await?;
    let mut pages_fetched = 1;

    for _ in 0..pages {
        let Some(next) = controller.paginator_info().next_page() else {
            info!("No more pages after {}", controller.paginator_info().current_page);
            break;
        };
        let url = template::render_page_url(&def.page_url, next, &vars)?;
        info!("Loading more: page {} of '{}'", next, def.name);
        controller.load_more(next, &url).await?;
        pages_fetched += 1;
    }

    Ok(RunReport {
        listing: def.name.clone(),
        location: history.current(),
        pages_fetched,
        state: controller.snapshot(),
    })
}
