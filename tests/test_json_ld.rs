use recipe_scrape::{scrape_html, ScrapeError};

fn create_recipe_html(json_ld: &str) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Recipe Page</title>
            <script type="application/ld+json">
                {json_ld}
            </script>
        </head>
        <body>
            <h1>Recipe</h1>
        </body>
        </html>
        "#
    )
}

#[test]
fn test_german_recipe_with_sections_and_array_yield() {
    let json_ld = r#"
    {
        "@id": "https://biancazapatka.com/de/brookies-chocolate-chip-cookie-brownies/#recipe",
        "@type": "Recipe",
        "author": {
            "@type": "Person",
            "name": "Bianca Zapatka"
        },
        "cookTime": "PT25M",
        "description": "Saftige Schokoladen-Brownies treffen auf knusprige Chocolate Chip Cookies",
        "image": [
            "https://biancazapatka.com/wp-content/uploads/2022/09/cookie-brownies.jpg",
            "https://biancazapatka.com/wp-content/uploads/2022/09/cookie-brownies-500x500.jpg"
        ],
        "keywords": "Brookies, Brownies, Chocolate Chip Cookies, Cookie Bars, Cookies, Kekse",
        "name": "Vegane Brookies - Chocolate Chip Cookie Brownies",
        "prepTime": "PT20M",
        "recipeCategory": ["Dessert", "Kuchen", "Snack"],
        "recipeCuisine": ["Amerikanisch"],
        "recipeIngredient": [
            "160 g Mehl (Weizen-, Dinkel oder glutenfreies Mehl, gesiebt)",
            "30 g Kakaopulver",
            "1  Prise Salz"
        ],
        "recipeInstructions": [
            {
                "@type": "HowToSection",
                "name": "Brownie-Teig",
                "itemListElement": [
                    {
                        "@type": "HowToStep",
                        "name": "Den Backofen vorheizen",
                        "text": "Den Backofen auf 180 °C Ober-/Unterhitze vorheizen."
                    },
                    {
                        "@type": "HowToStep",
                        "text": "Vegane Butter mit der Schokolade schmelzen."
                    }
                ]
            },
            {
                "@type": "HowToSection",
                "name": "Cookie-Teig",
                "itemListElement": [
                    {
                        "@type": "HowToStep",
                        "text": "Den Cookie-Teig auf dem Brownie-Teig verteilen."
                    }
                ]
            }
        ],
        "recipeYield": ["15", "15 Stück"]
    }
    "#;

    let recipe = scrape_html(
        &create_recipe_html(json_ld),
        "https://biancazapatka.com/de/brookies-chocolate-chip-cookie-brownies/",
    )
    .unwrap();

    assert_eq!(
        recipe.title,
        "Vegane Brookies - Chocolate Chip Cookie Brownies"
    );
    assert_eq!(recipe.author.as_deref(), Some("Bianca Zapatka"));
    assert_eq!(recipe.host, "biancazapatka.com");
    assert_eq!(recipe.category.as_deref(), Some("Dessert, Kuchen, Snack"));
    assert_eq!(recipe.cuisine.as_deref(), Some("Amerikanisch"));
    assert_eq!(
        recipe.image.as_deref(),
        Some("https://biancazapatka.com/wp-content/uploads/2022/09/cookie-brownies.jpg")
    );
    // The descriptive yield wins over the bare number
    assert_eq!(recipe.yields.as_deref(), Some("15 Stück"));
    assert_eq!(recipe.prep_time, Some(20));
    assert_eq!(recipe.cook_time, Some(25));
    assert_eq!(recipe.total_time, Some(45));
    assert_eq!(recipe.ingredients[2], "1 Prise Salz");
    assert_eq!(
        recipe.instructions_list,
        vec![
            "Den Backofen auf 180 °C Ober-/Unterhitze vorheizen.",
            "Vegane Butter mit der Schokolade schmelzen.",
            "Den Cookie-Teig auf dem Brownie-Teig verteilen.",
        ]
    );
    assert_eq!(
        recipe.keywords.unwrap(),
        vec![
            "Brookies",
            "Brownies",
            "Chocolate Chip Cookies",
            "Cookie Bars",
            "Cookies",
            "Kekse"
        ]
    );
}

#[test]
fn test_array_fields_and_empty_strings() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@type": "Recipe",
        "author": {"@type": "Person", "name": "amateurprochef"},
        "cookTime": "PT30M",
        "description": "",
        "image": [
            "https://example.com/image1.jpg",
            "https://example.com/image2.jpg"
        ],
        "keywords": "",
        "name": "Shahi Paneer",
        "prepTime": "",
        "recipeCategory": ["All", "All Things Indian"],
        "recipeCuisine": [],
        "recipeIngredient": ["300g paneer", "4 roma tomatoes", "", "2 red onion"],
        "recipeInstructions": [
            {"@type": "HowToStep", "text": "Step 1: Chop vegetables"},
            {"@type": "HowToStep", "text": "Step 2: Cook the dish"}
        ],
        "recipeYield": "",
        "totalTime": ""
    }
    "#;

    let recipe = scrape_html(
        &create_recipe_html(json_ld),
        "https://amateurprochef.com/2024/09/07/shahi-paneer-2/",
    )
    .unwrap();

    assert_eq!(recipe.title, "Shahi Paneer");
    assert_eq!(recipe.description, None);
    assert_eq!(recipe.keywords, None);
    assert_eq!(recipe.cuisine, None);
    assert_eq!(recipe.yields, None);
    assert_eq!(recipe.prep_time, None);
    assert_eq!(recipe.total_time, None);
    assert_eq!(recipe.cook_time, Some(30));
    assert_eq!(recipe.category.as_deref(), Some("All, All Things Indian"));
    assert_eq!(
        recipe.ingredients,
        vec!["300g paneer", "4 roma tomatoes", "2 red onion"]
    );
    assert_eq!(
        recipe.instructions,
        "Step 1: Chop vegetables\nStep 2: Cook the dish"
    );

    // Empty optional fields never reach the JSON
    let json = recipe.to_json().unwrap();
    assert!(!json.contains("\"description\""));
    assert!(!json.contains("\"yields\""));
}

#[test]
fn test_lowercase_recipe_type_in_graph() {
    let json_ld = r#"
    {
        "@context": "https://schema.org",
        "@graph": [
            {"@type": "WebSite", "name": "Cheese Blog"},
            {
                "@type": "recipe",
                "name": "Grilled Cheese",
                "author": [
                    {"@type": "Person", "name": "Chef One"},
                    {"@type": "Person", "name": "Chef Two"}
                ],
                "recipeIngredient": ["2 slices bread", "1 slice cheese"],
                "recipeInstructions": "Butter the bread.\nGrill until golden."
            }
        ]
    }
    "#;

    let recipe = scrape_html(&create_recipe_html(json_ld), "https://example.com/grilled").unwrap();

    assert_eq!(recipe.title, "Grilled Cheese");
    assert_eq!(recipe.author.as_deref(), Some("Chef One, Chef Two"));
    assert_eq!(
        recipe.instructions_list,
        vec!["Butter the bread.", "Grill until golden."]
    );
}

#[test]
fn test_array_with_mixed_case_types() {
    let json_ld = r#"
    [
        {"@type": "WEBSITE", "name": "Site"},
        {
            "@type": "ReCiPe",
            "name": "Mixed Case Recipe",
            "recipeIngredient": ["ingredient"],
            "recipeInstructions": [{"text": "Instructions here"}]
        }
    ]
    "#;

    let recipe = scrape_html(&create_recipe_html(json_ld), "https://example.com/mixed").unwrap();
    assert_eq!(recipe.title, "Mixed Case Recipe");
    assert_eq!(recipe.instructions, "Instructions here");
}

#[test]
fn test_author_with_only_id() {
    let json_ld = r##"
    {
        "@type": "Recipe",
        "name": "Anonymous Stew",
        "author": {"@id": "https://example.com/#/schema/person/abc"},
        "recipeIngredient": ["1 potato"],
        "recipeInstructions": "Stew it."
    }
    "##;

    let recipe = scrape_html(&create_recipe_html(json_ld), "https://example.com/stew").unwrap();
    assert_eq!(recipe.title, "Anonymous Stew");
    assert_eq!(recipe.author, None);
}

#[test]
fn test_ratings_nutrition_and_entities() {
    let json_ld = r#"
    {
        "@type": "Recipe",
        "name": "Mac &amp;amp; Cheese",
        "description": "<p>Creamy &amp; <em>cheesy</em>.</p>",
        "recipeYield": 4,
        "totalTime": "PT1H5M",
        "aggregateRating": {"@type": "AggregateRating", "ratingValue": 4.8571, "ratingCount": 321},
        "nutrition": {"@type": "NutritionInformation", "calories": "540 kcal", "proteinContent": "21 g"},
        "recipeIngredient": ["8 oz macaroni", "2 cups cheddar"],
        "recipeInstructions": ["Boil the pasta.", "Stir in the cheese."]
    }
    "#;

    let recipe = scrape_html(&create_recipe_html(json_ld), "https://www.example.com/mac").unwrap();

    assert_eq!(recipe.title, "Mac & Cheese");
    assert_eq!(recipe.description.as_deref(), Some("Creamy & cheesy ."));
    assert_eq!(recipe.yields.as_deref(), Some("4 servings"));
    assert_eq!(recipe.total_time, Some(65));
    assert_eq!(recipe.ratings, Some(4.86));
    assert_eq!(recipe.ratings_count, Some(321));
    let nutrients = recipe.nutrients.unwrap();
    assert_eq!(nutrients.len(), 2);
    assert_eq!(nutrients["calories"], "540 kcal");
    assert_eq!(nutrients["proteinContent"], "21 g");
}

#[test]
fn test_malformed_json_is_repaired() {
    let json_ld = r#"
    {
        "@type": "Recipe",
        "name": "Sloppy Joes",
        "recipeIngredient": ["1 lb beef", "1 cup sauce",],
        "recipeInstructions": "Brown the beef, add sauce.",
    }
    "#;

    let recipe = scrape_html(&create_recipe_html(json_ld), "https://example.com/joes").unwrap();
    assert_eq!(recipe.title, "Sloppy Joes");
    assert_eq!(recipe.ingredients, vec!["1 lb beef", "1 cup sauce"]);
}

#[test]
fn test_first_valid_script_wins() {
    let html = r#"
        <html><head>
        <script type="application/ld+json">{"@type": "Organization", "name": "Blog"}</script>
        <script type="application/ld+json">this is not json at all</script>
        <script type="application/ld+json">
            {"@type": "Recipe", "name": "Second Script", "recipeIngredient": ["x"]}
        </script>
        </head><body></body></html>
    "#;

    let recipe = scrape_html(html, "https://example.com/second").unwrap();
    assert_eq!(recipe.title, "Second Script");
}

#[test]
fn test_unsupported_page() {
    let html = "<html><head><title>Just a blog post</title></head><body><p>Hello</p></body></html>";
    let result = scrape_html(html, "https://example.com/post");
    assert!(matches!(result, Err(ScrapeError::NoRecipeFound)));
}

#[test]
fn test_invalid_source_url() {
    let json_ld = r#"{"@type": "Recipe", "name": "Soup", "recipeIngredient": ["water"]}"#;
    let result = scrape_html(&create_recipe_html(json_ld), "not a url");
    assert!(matches!(result, Err(ScrapeError::InvalidUrl(_))));
}

#[test]
fn test_output_is_deterministic() {
    let json_ld = r#"
    {
        "@type": "Recipe",
        "name": "Stable",
        "nutrition": {"sodiumContent": "1 mg", "calories": "10", "fatContent": "0 g"},
        "recipeIngredient": ["a", "b"],
        "recipeInstructions": "c"
    }
    "#;
    let html = create_recipe_html(json_ld);

    let first = scrape_html(&html, "https://example.com/stable").unwrap().to_json().unwrap();
    let second = scrape_html(&html, "https://example.com/stable").unwrap().to_json().unwrap();

    assert_eq!(first, second);
    assert!(!first.contains('\n'));
    // Nutrients come out sorted by key
    let calories = first.find("calories").unwrap();
    let fat = first.find("fatContent").unwrap();
    let sodium = first.find("sodiumContent").unwrap();
    assert!(calories < fat && fat < sodium);
}
