//! Platform listing

use adforge_core::domain::platform::Platform;
use anyhow::Result;
use colored::*;

pub fn list_platforms() -> Result<()> {
    println!("{}", "Ad platforms:".bold());
    println!();

    for platform in Platform::by_recommendation() {
        let badge = if platform.is_recommended() {
            " Recommended".green().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {} ({}){}",
            "▸".cyan(),
            platform.display_name().bold(),
            platform.slug().dimmed(),
            badge
        );
        println!("    {}", platform.description());
    }

    Ok(())
}
