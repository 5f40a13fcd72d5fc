pub mod cli;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetcher;
pub mod model;
pub mod normalize;

use log::{debug, error};
use scraper::Html;

pub use crate::config::ScraperConfig;
pub use crate::error::ScrapeError;
pub use crate::model::Recipe;

use crate::extractors::{Extractor, JsonLdExtractor, MicroDataExtractor, PageMeta, ParsingContext};
use crate::fetcher::RequestFetcher;

/// Scrape a recipe out of an already fetched page.
///
/// `org_url` is the address the HTML came from; it provides the host and the
/// base for relative links. Extractors are tried in order (JSON-LD, then
/// microdata) and the first one that finds a recipe wins.
pub fn scrape_html(html: &str, org_url: &str) -> Result<Recipe, ScrapeError> {
    let context = ParsingContext {
        url: org_url.to_string(),
        document: Html::parse_document(html),
    };

    // Validate the URL before doing any extraction work
    let page = PageMeta::from_context(&context)?;

    let extractors: Vec<Box<dyn Extractor>> =
        vec![Box::new(JsonLdExtractor), Box::new(MicroDataExtractor)];

    for extractor in extractors {
        match extractor.parse(&context) {
            Ok(mut recipe) => {
                page.apply(&mut recipe);
                debug!("{:#?}", recipe);
                return Ok(recipe);
            }
            Err(e) => debug!("Extractor failed: {}", e),
        }
    }

    error!("No extractor found to parse the recipe from this webpage.");
    Err(ScrapeError::NoRecipeFound)
}

/// Fetch `url` and scrape the recipe it contains.
pub fn scrape_url(url: &str, config: &ScraperConfig) -> Result<Recipe, ScrapeError> {
    let html = RequestFetcher::new(config)?.fetch(url)?;
    scrape_html(&html, url)
}
