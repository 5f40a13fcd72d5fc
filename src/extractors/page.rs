use super::{non_empty, normalize_text, ParsingContext};
use crate::error::ScrapeError;
use crate::model::Recipe;
use reqwest::Url;
use scraper::{Html, Selector};

/// Page-level fields that don't live inside the recipe markup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    pub canonical_url: String,
    pub host: String,
    pub site_name: Option<String>,
    pub language: Option<String>,
    pub image: Option<String>,
    /// Page URL, the base for relative image links
    pub base: Option<Url>,
}

fn first_attr(document: &Html, selector: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr(attr))
        .map(normalize_text)
        .find(|value| !value.is_empty())
}

impl PageMeta {
    pub fn from_context(context: &ParsingContext) -> Result<Self, ScrapeError> {
        let url = Url::parse(&context.url)
            .map_err(|e| ScrapeError::InvalidUrl(format!("{}: {}", context.url, e)))?;
        let document = &context.document;

        let host = url
            .host_str()
            .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
            .ok_or_else(|| ScrapeError::InvalidUrl(format!("{}: missing host", context.url)))?;

        // Relative canonical links resolve against the page URL
        let canonical_url = first_attr(document, "link[rel='canonical']", "href")
            .and_then(|href| url.join(&href).ok())
            .map(|canonical| canonical.to_string())
            .unwrap_or_else(|| context.url.clone());

        let site_name = first_attr(document, "meta[property='og:site_name']", "content");

        let language = first_attr(document, "html", "lang").or_else(|| {
            first_attr(document, "meta[http-equiv='content-language']", "content")
                .and_then(|value| value.split(',').next().map(|lang| lang.trim().to_string()))
                .and_then(non_empty)
        });

        let image = first_attr(document, "meta[property='og:image']", "content")
            .and_then(|src| url.join(&src).ok())
            .map(|image| image.to_string());

        Ok(PageMeta {
            canonical_url,
            host,
            site_name,
            language,
            image,
            base: Some(url),
        })
    }

    /// Fill the page-level fields into a recipe an extractor produced.
    pub fn apply(self, recipe: &mut Recipe) {
        recipe.canonical_url = self.canonical_url;
        recipe.host = self.host;
        recipe.site_name = self.site_name;
        if self.language.is_some() {
            recipe.language = self.language;
        }
        let resolved = match (&self.base, recipe.image.as_deref()) {
            (Some(base), Some(image)) => base.join(image).ok().map(|url| url.to_string()),
            _ => None,
        };
        if resolved.is_some() {
            recipe.image = resolved;
        }
        if recipe.image.is_none() {
            recipe.image = self.image;
        }
    }
}
