use super::{
    format_yields, non_empty, normalize_text, parse_minutes, split_keywords, Extractor,
    ParsingContext,
};
use crate::error::ScrapeError;
use crate::model::Recipe;
use log::debug;
use scraper::{ElementRef, Html, Selector};

pub struct MicroDataExtractor;

fn itemprop_selector(prop: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(&format!("[itemprop='{}']", prop))
        .map_err(|e| ScrapeError::ParseError(e.to_string()))
}

/// True when `el` is a property of `root` itself and not of an item nested
/// inside it (author Person, Review, AggregateRating...).
fn in_scope(root: ElementRef, el: &ElementRef) -> bool {
    for node in el.ancestors() {
        if node.id() == root.id() {
            return true;
        }
        if node
            .value()
            .as_element()
            .is_some_and(|parent| parent.attr("itemscope").is_some())
        {
            return false;
        }
    }
    false
}

/// Matches of `selector` that belong directly to `root`.
fn scoped<'a>(
    root: ElementRef<'a>,
    selector: &'a Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    root.select(selector).filter(move |el| in_scope(root, el))
}

fn element_text(el: ElementRef) -> String {
    normalize_text(&el.text().collect::<Vec<_>>().join(" "))
}

impl MicroDataExtractor {
    fn find_recipe_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        // Look for elements with itemscope and itemtype containing "Recipe"
        let selector = Selector::parse("[itemscope]").ok()?;
        document.select(&selector).find(|element| {
            element.value().attr("itemtype").is_some_and(|itemtype| {
                itemtype.contains("schema.org/Recipe")
                    || itemtype.contains("data-vocabulary.org/Recipe")
            })
        })
    }

    fn get_itemprop(&self, root: ElementRef, prop: &str) -> Result<Option<String>, ScrapeError> {
        let selector = itemprop_selector(prop)?;
        let text = scoped(root, &selector)
            .map(element_text)
            .find(|text| !text.is_empty());
        Ok(text)
    }

    fn get_itemprop_list(&self, root: ElementRef, prop: &str) -> Result<Vec<String>, ScrapeError> {
        let selector = itemprop_selector(prop)?;
        Ok(scoped(root, &selector)
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect())
    }

    /// Machine-readable value first: `<time datetime>`, `<meta content>`,
    /// then the element text.
    fn get_itemprop_value(
        &self,
        root: ElementRef,
        prop: &str,
    ) -> Result<Option<String>, ScrapeError> {
        let selector = itemprop_selector(prop)?;
        let value = scoped(root, &selector).find_map(|el| {
            let value = el
                .value()
                .attr("datetime")
                .or_else(|| el.value().attr("content"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| element_text(el));
            non_empty(value)
        });
        Ok(value)
    }

    fn get_minutes(&self, root: ElementRef, prop: &str) -> Result<Option<u32>, ScrapeError> {
        let selector = itemprop_selector(prop)?;
        // The attribute may hold ISO 8601 while the text says "1 hour"
        let minutes = scoped(root, &selector).find_map(|el| {
            el.value()
                .attr("datetime")
                .or_else(|| el.value().attr("content"))
                .and_then(parse_minutes)
                .or_else(|| parse_minutes(&element_text(el)))
        });
        Ok(minutes)
    }
}

impl Extractor for MicroDataExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<Recipe, ScrapeError> {
        debug!("Attempting to extract recipe using MicroData extractor");

        // We strictly enforce finding a Recipe container to avoid false positives.
        // Global searches for 'itemprop' (like "name" or "description") often pick up
        // unrelated page content (site title, author bio, ads, etc.) if not scoped
        // to a specific Schema.org Recipe item.
        let container = self
            .find_recipe_container(&context.document)
            .ok_or_else(|| ScrapeError::ParseError("No MicroData Recipe container found".into()))?;

        let title = self
            .get_itemprop(container, "name")?
            .ok_or_else(|| ScrapeError::ParseError("Could not extract recipe name".into()))?;

        let mut recipe = Recipe {
            title,
            ..Default::default()
        };

        recipe.description = self.get_itemprop(container, "description")?;

        // Image: src for <img>, content for <meta>, otherwise the text
        let image_selector = itemprop_selector("image")?;
        recipe.image = scoped(container, &image_selector).next().and_then(|img_el| {
            img_el
                .value()
                .attr("src")
                .or_else(|| img_el.value().attr("content"))
                .or_else(|| img_el.value().attr("href"))
                .map(normalize_text)
                .or_else(|| Some(element_text(img_el)))
                .and_then(non_empty)
        });

        // Author can be a string or a Person object
        let author_selector = itemprop_selector("author")?;
        let name_selector = itemprop_selector("name")?;
        recipe.author = scoped(container, &author_selector).next().and_then(|author_el| {
            // Check if it has nested name, otherwise use the author element itself
            let target_el = author_el
                .select(&name_selector)
                .next()
                .unwrap_or(author_el);
            non_empty(element_text(target_el))
        });

        recipe.prep_time = self.get_minutes(container, "prepTime")?;
        recipe.cook_time = self.get_minutes(container, "cookTime")?;
        recipe.total_time = self.get_minutes(container, "totalTime")?;
        recipe.fill_total_time();

        recipe.yields = self
            .get_itemprop_value(container, "recipeYield")?
            .and_then(|value| format_yields(&value));

        recipe.category = self.get_itemprop(container, "recipeCategory")?;
        recipe.cuisine = self.get_itemprop(container, "recipeCuisine")?;

        recipe.keywords = self
            .get_itemprop_value(container, "keywords")?
            .map(|keywords| split_keywords([keywords.as_str()]))
            .filter(|keywords| !keywords.is_empty());

        // Try 'recipeIngredient' and the older 'ingredients'
        let mut ingredients = self.get_itemprop_list(container, "recipeIngredient")?;
        if ingredients.is_empty() {
            ingredients = self.get_itemprop_list(container, "ingredients")?;
        }

        let mut instructions = self.get_itemprop_list(container, "recipeInstructions")?;
        if instructions.is_empty() {
            instructions = self.get_itemprop_list(container, "instructions")?;
        }

        if ingredients.is_empty() && instructions.is_empty() {
            return Err(ScrapeError::ParseError(
                "Could not extract recipe content".into(),
            ));
        }

        recipe.ingredients = ingredients;
        recipe.set_instructions(instructions);

        // Ratings usually sit in a nested AggregateRating item
        let rating_selector = itemprop_selector("aggregateRating")?;
        let rating_root = scoped(container, &rating_selector)
            .find(|el| el.value().attr("itemscope").is_some())
            .unwrap_or(container);

        if let Some(rating) = self.get_itemprop_value(rating_root, "ratingValue")? {
            recipe.ratings = rating
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| (v * 100.0).round() / 100.0);
        }
        let count = match self.get_itemprop_value(rating_root, "ratingCount")? {
            Some(count) => Some(count),
            None => self.get_itemprop_value(rating_root, "reviewCount")?,
        };
        recipe.ratings_count = count.and_then(|c| c.replace(',', "").parse::<u64>().ok());

        Ok(recipe)
    }
}
