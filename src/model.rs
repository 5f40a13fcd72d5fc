use serde::Serialize;
use std::collections::BTreeMap;

/// A scraped recipe.
///
/// Fields serialize in declaration order and optional fields are skipped when
/// absent, so the same page always produces the same JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recipe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub canonical_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub instructions_list: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrients: Option<BTreeMap<String, String>>,
    /// Minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    pub title: String,
    /// Minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yields: Option<String>,
}

impl Recipe {
    /// Sets the instruction list and keeps the joined `instructions` text in sync.
    pub fn set_instructions(&mut self, steps: Vec<String>) {
        self.instructions = steps.join("\n");
        self.instructions_list = steps;
    }

    /// Fills `total_time` from prep + cook when the page only gave the parts.
    pub fn fill_total_time(&mut self) {
        if self.total_time.is_none() {
            if let (Some(prep), Some(cook)) = (self.prep_time, self.cook_time) {
                self.total_time = Some(prep + cook);
            }
        }
    }

    /// Single-line JSON representation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
