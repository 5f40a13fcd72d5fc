use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::normalize::normalize_recipe;
use crate::scrape_url;

/// Parsed command line: `recipe-scrape [--normalize] <URL>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub url: String,
    pub normalize: bool,
}

impl Args {
    /// Parse arguments, not including the program name.
    ///
    /// The first positional argument is the URL; anything after it is ignored.
    pub fn parse<I>(args: I) -> Result<Self, ScrapeError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut normalize = false;
        let mut url = None;

        for arg in args {
            if url.is_some() {
                break;
            }
            if arg == "--normalize" {
                normalize = true;
            } else if arg.starts_with("--") {
                return Err(ScrapeError::UnknownFlag(arg));
            } else {
                url = Some(arg);
            }
        }

        Ok(Args {
            url: url.ok_or(ScrapeError::MissingUrl)?,
            normalize,
        })
    }
}

/// Fetch, scrape and render the recipe as a single line of JSON.
pub fn run(args: &Args, config: &ScraperConfig) -> Result<String, ScrapeError> {
    let recipe = scrape_url(&args.url, config)?;

    let json = if args.normalize {
        serde_json::to_string(&normalize_recipe(&recipe))?
    } else {
        recipe.to_json()?
    };

    Ok(json)
}
