use thiserror::Error;

/// Errors that can occur while fetching and scraping a recipe
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// No URL was given on the command line
    #[error("Please provide a URL as an argument")]
    MissingUrl,

    /// A command-line flag that is not recognized
    #[error("Unknown flag: {0}")]
    UnknownFlag(String),

    /// The source URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to fetch the page
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The response body is not valid UTF-8
    #[error("Response body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// An extractor found recipe data but could not read it
    #[error("Failed to parse recipe: {0}")]
    ParseError(String),

    /// No extractor could find a recipe in the page
    #[error("No extractor could parse the recipe from this webpage")]
    NoRecipeFound,

    /// Failed to serialize the scraped recipe
    #[error("Failed to serialize recipe: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
