//! Meal-planner shaped view of a scraped recipe.
//!
//! Ingredient lines of the form `<amount> <unit> <name...>` are split into a
//! typed [`Amount`] and a name; lines that don't fit are dropped with a warning.

use crate::model::Recipe;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Units {
    #[default]
    Count,
    Cup,
    Ounce,
    Tablespoon,
    Teaspoon,
    Milliliters,
}

impl TryFrom<&str> for Units {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "unit" | "units" => Ok(Units::Count),
            "cup" | "cups" => Ok(Units::Cup),
            "ounce" | "ounces" | "oz" => Ok(Units::Ounce),
            "thumb" | "tablespoon" | "tablespoons" | "tbsp" => Ok(Units::Tablespoon),
            "clove" | "teaspoon" | "teaspoons" | "tsp" => Ok(Units::Teaspoon),
            "milliliters" | "millilitres" | "ml" => Ok(Units::Milliliters),
            _ => Err(()),
        }
    }
}

impl Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Units::Count => f.write_str(""),
            Units::Cup => f.write_str("cup"),
            Units::Ounce => f.write_str("oz"),
            Units::Tablespoon => f.write_str("tbsp"),
            Units::Teaspoon => f.write_str("tsp"),
            Units::Milliliters => f.write_str("ml"),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Amount {
    pub units: Units,
    pub value: f32,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Ingredient {
    pub amount: Amount,
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RecipeStep {
    pub description: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct NormalizedRecipe {
    pub image: String,
    pub ingredients: Vec<Ingredient>,
    pub name: String,
    pub recipe: Vec<RecipeStep>,
}

/// Parse a quantity: `2`, `0.5`, `1/2` or a single vulgar fraction like `½`.
pub fn parse_amount(amount: &str) -> Option<f32> {
    if let Ok(amount) = amount.parse::<f32>() {
        return Some(amount);
    }

    if let Some((numerator, denominator)) = amount.split_once('/') {
        let numerator = numerator.parse::<f32>().ok()?;
        let denominator = denominator.parse::<f32>().ok()?;
        return (denominator != 0.0).then(|| numerator / denominator);
    }

    let value = match amount {
        "½" => 1.0 / 2.0,
        "⅓" => 1.0 / 3.0,
        "⅔" => 2.0 / 3.0,
        "¼" => 1.0 / 4.0,
        "¾" => 3.0 / 4.0,
        "⅕" => 1.0 / 5.0,
        "⅖" => 2.0 / 5.0,
        "⅗" => 3.0 / 5.0,
        "⅘" => 4.0 / 5.0,
        "⅙" => 1.0 / 6.0,
        "⅚" => 5.0 / 6.0,
        "⅐" => 1.0 / 7.0,
        "⅛" => 1.0 / 8.0,
        "⅜" => 3.0 / 8.0,
        "⅝" => 5.0 / 8.0,
        "⅞" => 7.0 / 8.0,
        "⅑" => 1.0 / 9.0,
        "⅒" => 1.0 / 10.0,
        _ => return None,
    };

    Some(value)
}

pub fn cleanup_recipe_step(step: &str) -> String {
    step.replace("\u{2022} ", "").trim().into()
}

fn parse_ingredient(line: &str) -> Option<Ingredient> {
    let split = line.split(' ').collect::<Vec<&str>>();
    if split.len() <= 2 {
        return None;
    }

    let units = Units::try_from(split[1]).ok()?;
    let value = parse_amount(split[0])?;

    Some(Ingredient {
        amount: Amount { units, value },
        name: split[2..].join(" "),
    })
}

pub fn normalize_recipe(recipe: &Recipe) -> NormalizedRecipe {
    let mut ingredients = Vec::new();
    for line in &recipe.ingredients {
        match parse_ingredient(line) {
            Some(ingredient) => ingredients.push(ingredient),
            None => warn!("Could not parse ingredient '{}'", line),
        }
    }

    let steps = recipe
        .instructions_list
        .iter()
        .map(|step| RecipeStep {
            description: cleanup_recipe_step(step),
        })
        .collect();

    NormalizedRecipe {
        image: recipe.image.clone().unwrap_or_default(),
        ingredients,
        name: recipe.title.clone(),
        recipe: steps,
    }
}
