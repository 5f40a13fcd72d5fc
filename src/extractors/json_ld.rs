use super::{
    format_yields, non_empty, normalize_text, parse_minutes, split_keywords, Extractor,
    ParsingContext,
};
use crate::error::ScrapeError;
use crate::model::Recipe;
use log::debug;
use scraper::Selector;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

pub struct JsonLdExtractor;

impl JsonLdExtractor {
    fn convert_to_recipe(&self, json_ld_recipe: JsonLdRecipe) -> Recipe {
        let mut recipe = Recipe {
            title: normalize_text(&json_ld_recipe.name),
            ..Default::default()
        };

        if let Some(author) = json_ld_recipe.author {
            let mut names = Vec::new();
            author.collect_names(&mut names);
            recipe.author = non_empty(names.join(", "));
        }

        recipe.description = json_ld_recipe.description.and_then(|desc| {
            let text = match desc {
                DescriptionType::String(d) => d,
                DescriptionType::Object(d) => d.text,
            };
            non_empty(normalize_text(&text))
        });

        recipe.image = json_ld_recipe.image.and_then(|img| img.first_url());

        recipe.category = json_ld_recipe
            .recipe_category
            .and_then(|category| non_empty(category.joined()));
        recipe.cuisine = json_ld_recipe
            .recipe_cuisine
            .and_then(|cuisine| non_empty(cuisine.joined()));

        recipe.keywords = json_ld_recipe
            .keywords
            .map(|keywords| split_keywords(keywords.values().iter().map(String::as_str)))
            .filter(|keywords| !keywords.is_empty());

        // Older markup uses `ingredients` instead of `recipeIngredient`
        recipe.ingredients = json_ld_recipe
            .recipe_ingredient
            .or(json_ld_recipe.ingredients)
            .map(RecipeIngredients::into_lines)
            .unwrap_or_default();

        let mut steps = Vec::new();
        if let Some(instructions) = &json_ld_recipe.recipe_instructions {
            collect_steps(instructions, &mut steps);
        }
        recipe.set_instructions(steps);

        recipe.yields = json_ld_recipe.recipe_yield.and_then(|yield_val| match yield_val {
            RecipeYield::Single(value) => format_yields(&value.as_text()),
            RecipeYield::Array(values) => {
                let values: Vec<String> = values.iter().map(Scalar::as_text).collect();
                // Prefer the descriptive version (e.g., "15 Stück") over just the number
                values
                    .iter()
                    .find(|s| s.contains(char::is_alphabetic))
                    .or_else(|| values.first())
                    .and_then(|s| format_yields(s))
            }
        });

        recipe.prep_time = json_ld_recipe
            .prep_time
            .and_then(|t| parse_minutes(&t.as_text()));
        recipe.cook_time = json_ld_recipe
            .cook_time
            .and_then(|t| parse_minutes(&t.as_text()));
        recipe.total_time = json_ld_recipe
            .total_time
            .and_then(|t| parse_minutes(&t.as_text()));
        recipe.fill_total_time();

        if let Some(rating) = json_ld_recipe.aggregate_rating {
            recipe.ratings = rating
                .rating_value
                .and_then(|v| v.as_f64())
                .map(|v| (v * 100.0).round() / 100.0);
            recipe.ratings_count = rating
                .rating_count
                .or(rating.review_count)
                .and_then(|v| v.as_f64())
                .filter(|v| *v >= 0.0)
                .map(|v| v as u64);
        }

        recipe.nutrients = json_ld_recipe
            .nutrition
            .as_ref()
            .and_then(nutrients_from)
            .filter(|nutrients| !nutrients.is_empty());

        recipe.language = json_ld_recipe
            .in_language
            .and_then(|lang| non_empty(lang.trim().to_string()));

        recipe
    }
}

#[derive(Debug, Deserialize)]
struct JsonLdRecipe {
    name: String,
    #[serde(default, deserialize_with = "lenient")]
    description: Option<DescriptionType>,
    #[serde(default, deserialize_with = "lenient")]
    image: Option<ImageType>,
    #[serde(rename = "recipeIngredient", default, deserialize_with = "lenient")]
    recipe_ingredient: Option<RecipeIngredients>,
    #[serde(default, deserialize_with = "lenient")]
    ingredients: Option<RecipeIngredients>,
    #[serde(rename = "recipeInstructions", default)]
    recipe_instructions: Option<Value>,
    #[serde(rename = "recipeYield", default, deserialize_with = "lenient")]
    recipe_yield: Option<RecipeYield>,
    #[serde(rename = "prepTime", default, deserialize_with = "lenient")]
    prep_time: Option<Scalar>,
    #[serde(rename = "cookTime", default, deserialize_with = "lenient")]
    cook_time: Option<Scalar>,
    #[serde(rename = "totalTime", default, deserialize_with = "lenient")]
    total_time: Option<Scalar>,
    #[serde(rename = "recipeCategory", default, deserialize_with = "lenient")]
    recipe_category: Option<TextList>,
    #[serde(rename = "recipeCuisine", default, deserialize_with = "lenient")]
    recipe_cuisine: Option<TextList>,
    #[serde(default, deserialize_with = "lenient")]
    keywords: Option<TextList>,
    #[serde(default, deserialize_with = "lenient")]
    author: Option<Author>,
    #[serde(rename = "aggregateRating", default, deserialize_with = "lenient")]
    aggregate_rating: Option<AggregateRating>,
    #[serde(default)]
    nutrition: Option<Value>,
    #[serde(rename = "inLanguage", default, deserialize_with = "lenient")]
    in_language: Option<String>,
}

/// Optional fields come in every shape imaginable; one we don't understand
/// is dropped instead of failing the whole recipe.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Deserialize)]
struct ImageObject {
    url: Option<String>,
    #[serde(rename = "contentUrl")]
    content_url: Option<String>,
}

impl ImageObject {
    fn url(&self) -> Option<String> {
        self.url
            .as_deref()
            .or(self.content_url.as_deref())
            .map(normalize_text)
            .and_then(non_empty)
    }
}

#[derive(Debug, Deserialize)]
struct TextObject {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DescriptionType {
    String(String),
    Object(TextObject),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageType {
    String(String),
    MultipleStrings(Vec<String>),
    MultipleObjects(Vec<ImageObject>),
    Object(ImageObject),
}

impl ImageType {
    fn first_url(self) -> Option<String> {
        match self {
            ImageType::String(url) => non_empty(normalize_text(&url)),
            ImageType::Object(obj) => obj.url(),
            ImageType::MultipleStrings(urls) => urls
                .iter()
                .map(|url| normalize_text(url))
                .find(|url| !url.is_empty()),
            ImageType::MultipleObjects(objs) => objs.iter().find_map(ImageObject::url),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeIngredients {
    Strings(Vec<String>),
    Objects(Vec<IngredientObject>),
    Single(String),
}

impl RecipeIngredients {
    fn into_lines(self) -> Vec<String> {
        let lines: Vec<String> = match self {
            RecipeIngredients::Strings(ingredients) => ingredients
                .iter()
                .map(|ing| normalize_text(ing))
                .collect(),
            RecipeIngredients::Objects(ingredients) => ingredients
                .iter()
                .map(|ing| {
                    let amount = ing.amount.as_deref().unwrap_or("").trim();
                    let name = normalize_text(&ing.name);
                    if amount.is_empty() {
                        name
                    } else {
                        format!("{amount} {name}")
                    }
                })
                .collect(),
            RecipeIngredients::Single(text) => text.lines().map(normalize_text).collect(),
        };

        lines.into_iter().filter(|line| !line.is_empty()).collect()
    }
}

#[derive(Debug, Deserialize)]
struct IngredientObject {
    name: String,
    amount: Option<String>,
}

/// A value sites write either as a JSON string or as a number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    String(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn as_text(&self) -> String {
        match self {
            Scalar::String(s) => s.clone(),
            Scalar::Number(n) => n.to_string(),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Scalar::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
            Scalar::Number(n) => n.as_f64(),
        };
        value.filter(|v| v.is_finite())
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecipeYield {
    Single(Scalar),
    Array(Vec<Scalar>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextList {
    String(String),
    Multiple(Vec<String>),
}

impl TextList {
    fn values(&self) -> Vec<String> {
        match self {
            TextList::String(s) => vec![s.clone()],
            TextList::Multiple(v) => v.clone(),
        }
    }

    fn joined(&self) -> String {
        self.values()
            .iter()
            .map(|s| normalize_text(s))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Author {
    String(String),
    Multiple(Vec<Author>),
    Object(AuthorObject),
}

impl Author {
    fn collect_names(&self, names: &mut Vec<String>) {
        match self {
            Author::String(name) => names.push(normalize_text(name)),
            Author::Object(obj) => {
                // Some sites only link the author by @id
                if let Some(name) = &obj.name {
                    names.push(normalize_text(name));
                }
            }
            Author::Multiple(authors) => {
                for author in authors {
                    author.collect_names(names);
                }
            }
        }
        names.retain(|name| !name.is_empty());
    }
}

#[derive(Debug, Deserialize)]
struct AuthorObject {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AggregateRating {
    #[serde(rename = "ratingValue", default, deserialize_with = "lenient")]
    rating_value: Option<Scalar>,
    #[serde(rename = "ratingCount", default, deserialize_with = "lenient")]
    rating_count: Option<Scalar>,
    #[serde(rename = "reviewCount", default, deserialize_with = "lenient")]
    review_count: Option<Scalar>,
}

/// Flatten `recipeInstructions` into plain steps.
///
/// Accepts a single string (one step per line), arrays of strings,
/// `HowToStep` objects and `HowToSection`s nested to any depth.
fn collect_steps(value: &Value, steps: &mut Vec<String>) {
    match value {
        Value::String(text) => {
            for line in text.lines() {
                let step = normalize_text(line);
                if !step.is_empty() {
                    steps.push(step);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_steps(item, steps);
            }
        }
        Value::Object(map) => {
            if let Some(items) = map.get("itemListElement") {
                collect_steps(items, steps);
                return;
            }
            // Prefer text over name
            let text = ["text", "name", "description"]
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_str))
                .map(normalize_text)
                .find(|text| !text.is_empty());
            if let Some(text) = text {
                steps.push(text);
            }
        }
        _ => {}
    }
}

fn nutrients_from(nutrition: &Value) -> Option<BTreeMap<String, String>> {
    let map = nutrition.as_object()?;
    let nutrients = map
        .iter()
        .filter(|(key, _)| !key.starts_with('@'))
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => normalize_text(s),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            non_empty(text).map(|text| (key.clone(), text))
        })
        .collect();
    Some(nutrients)
}

fn is_recipe_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(type_str)) => type_str.eq_ignore_ascii_case("recipe"),
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .any(|t| t.eq_ignore_ascii_case("recipe")),
        _ => false,
    }
}

/// Locate the recipe node at the root, in a top-level array or in `@graph`.
fn find_recipe(json_ld: &Value) -> Option<&Value> {
    if let Some(items) = json_ld.as_array() {
        debug!("JsonLdExtractor: JSON-LD is an array");
        return items
            .iter()
            .find_map(find_recipe)
            .or_else(|| items.iter().find(|item| item.get("recipeInstructions").is_some()));
    }

    if is_recipe_type(json_ld) {
        debug!("JsonLdExtractor: Found Recipe type in root");
        return Some(json_ld);
    }

    if let Some(graph) = json_ld.get("@graph") {
        debug!("JsonLdExtractor: Found @graph");
        return find_recipe(graph);
    }

    None
}

impl Extractor for JsonLdExtractor {
    fn parse(&self, context: &ParsingContext) -> Result<Recipe, ScrapeError> {
        debug!("JsonLdExtractor: Starting parse for URL: {}", context.url);
        let selector = Selector::parse("script[type='application/ld+json']")
            .map_err(|e| ScrapeError::ParseError(e.to_string()))?;

        let scripts: Vec<_> = context.document.select(&selector).collect();
        debug!(
            "JsonLdExtractor: Found {} JSON-LD script tags",
            scripts.len()
        );

        // Try each script element until we find a valid recipe
        for (index, script) in scripts.iter().enumerate() {
            let raw_json = script.text().collect::<String>();

            let json_ld = match serde_json::from_str::<Value>(raw_json.trim()) {
                Ok(json_ld) => json_ld,
                Err(_) => match serde_json::from_str::<Value>(&sanitize_json(&raw_json)) {
                    Ok(json_ld) => json_ld,
                    Err(e) => {
                        debug!("JsonLdExtractor: Failed to parse JSON-LD {}: {}", index, e);
                        continue;
                    }
                },
            };

            let Some(recipe_json) = find_recipe(&json_ld) else {
                debug!("JsonLdExtractor: No recipe found in JSON-LD {}", index);
                continue;
            };

            match JsonLdRecipe::deserialize(recipe_json) {
                Ok(recipe) => {
                    debug!("JsonLdExtractor: Successfully converted to JsonLdRecipe");
                    return Ok(self.convert_to_recipe(recipe));
                }
                Err(e) => {
                    debug!("JsonLdExtractor: Failed to convert to JsonLdRecipe: {}", e);
                }
            }
        }

        Err(ScrapeError::ParseError(
            "No valid recipe found in any JSON-LD script".to_string(),
        ))
    }
}

/// Repair the usual hand-written JSON-LD mistakes: HTML comments around the
/// payload, raw newlines inside strings, trailing commas and missing commas
/// between members.
fn sanitize_json(json_str: &str) -> String {
    let trimmed = json_str
        .trim()
        .trim_start_matches("<!--")
        .trim_end_matches("-->")
        .trim()
        .trim_start_matches("<![CDATA[")
        .trim_end_matches("]]>");

    let chars: Vec<char> = trimmed.chars().collect();
    let mut cleaned = String::with_capacity(trimmed.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut depth = 0usize;

    let next_significant = |from: usize| chars[from..].iter().copied().find(|c| !c.is_whitespace());

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => {
                    escaped = false;
                    cleaned.push(c);
                }
                '\\' => {
                    escaped = true;
                    cleaned.push(c);
                }
                '"' => {
                    in_string = false;
                    cleaned.push(c);
                    if depth > 0 && matches!(next_significant(i + 1), Some('"' | '{' | '[')) {
                        debug!("Adding missing comma after string");
                        cleaned.push(',');
                    }
                }
                '\n' | '\r' | '\t' => cleaned.push(' '),
                _ => cleaned.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                cleaned.push(c);
            }
            '{' | '[' => {
                depth += 1;
                cleaned.push(c);
            }
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                cleaned.push(c);
                if depth > 0 && matches!(next_significant(i + 1), Some('"' | '{' | '[')) {
                    debug!("Adding missing comma after array/object closing");
                    cleaned.push(',');
                }
            }
            ',' => {
                // Drop trailing and duplicate commas
                if !matches!(next_significant(i + 1), Some(',' | '}' | ']') | None) {
                    cleaned.push(c);
                }
            }
            c if c.is_whitespace() => {}
            _ => cleaned.push(c),
        }
    }

    cleaned
}
