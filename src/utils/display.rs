use crate::scenario::ScenarioSummary;
use colored::*;
use std::io::Write;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.chars().count()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

/// Prompt without a newline; flushed so it shows before input is read
pub fn print_prompt(text: &str) {
    print!("{}", text.yellow().bold());
    let _ = std::io::stdout().flush();
}

pub fn print_scenario(scenario: &ScenarioSummary, active: bool) {
    let marker = if active { "*" } else { " " };
    println!(
        "{} {} - {}",
        marker.green().bold(),
        scenario.name.bold(),
        scenario.description.dimmed()
    );
}
