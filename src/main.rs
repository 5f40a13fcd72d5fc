use recipe_scrape::cli::{self, Args};
use recipe_scrape::ScraperConfig;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Get the URL from command-line arguments
    let args = Args::parse(env::args().skip(1))?;
    let config = ScraperConfig::load()?;

    let json = cli::run(&args, &config)?;
    println!("{}", json);

    Ok(())
}
