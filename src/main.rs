use anyhow::{Context, Result};
use altnet::cli::{
    Cli, Commands, ReplCommand, ScenarioCommands, DESCRIBE_USAGE, SCENARIO_USAGE,
};
use altnet::core::FalImageClient;
use altnet::scenario::FileScenarioStore;
use altnet::{utils, AssetCache, BrowseOutcome, Browser, ScenarioStore, ScenarioTemplate, Settings};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::new().context("Failed to load settings")?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Browse { path, scenario, prefetch, concurrency } => {
            handle_browse(&settings, path, scenario, prefetch, concurrency).await
        }
        Commands::Interactive { scenario } => handle_interactive(&settings, scenario).await,
        Commands::Scenarios { command } => handle_scenarios(&settings, command).await,
        Commands::Image { identifier, inline } => handle_image(&settings, identifier, inline).await,
    }
}

async fn handle_browse(
    settings: &Settings,
    path: String,
    scenario: Option<String>,
    prefetch: bool,
    concurrency: usize,
) -> Result<()> {
    let mut browser = Browser::open(settings, scenario.as_deref()).await?;
    utils::print_info(&format!(
        "Browsing {} in scenario '{}'...",
        path,
        browser.current_scenario().await.name
    ));

    if prefetch {
        let (html, assets) = browser.browse_with_prefetch(&path, concurrency).await?;
        println!("\n{}", html);
        for (id, result) in assets {
            match result {
                Ok(cached) => utils::print_success(&format!("Image {} -> {}", id, cached.display())),
                Err(e) => utils::print_error(&format!("Image {} failed: {}", id, e)),
            }
        }
        return Ok(());
    }

    match browser.browse(&path).await? {
        BrowseOutcome::Page(html) => println!("\n{}", html),
        BrowseOutcome::Asset(cached) => utils::print_success(&format!("Image at {}", cached.display())),
    }
    Ok(())
}

async fn handle_interactive(settings: &Settings, scenario: Option<String>) -> Result<()> {
    let mut browser = Browser::open(settings, scenario.as_deref()).await?;

    utils::print_header("Interactive Browsing");
    utils::print_info(&format!("Scenario: {}", browser.current_scenario().await.name));
    utils::print_info("Type a path like /com/news/main (/help for commands, Ctrl+C to exit)\n");

    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin);

    loop {
        utils::print_prompt("Path: ");
        let mut input = String::new();
        if reader.read_line(&mut input).await? == 0 {
            return Ok(());
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match ReplCommand::parse(input) {
            ReplCommand::Describe(text) => {
                if browser.use_description(text).await {
                    utils::print_success("Changed to custom scenario");
                } else {
                    utils::print_error("Scenario description is empty");
                }
            }
            ReplCommand::Scenario(name) => {
                if browser.select_scenario(name).await {
                    utils::print_success(&format!("Changed to scenario: {}", name));
                } else {
                    utils::print_error(&format!("Scenario not found: {}", name));
                }
            }
            ReplCommand::Scenarios => {
                let current = browser.current_scenario().await;
                for s in browser.list_scenarios().await {
                    let active = s.name == current.name;
                    utils::print_scenario(&s, active);
                }
            }
            ReplCommand::Current => {
                let current = browser.current_scenario().await;
                utils::print_info(&format!("{} - {}", current.name, current.description));
            }
            ReplCommand::Count => {
                utils::print_info(&format!(
                    "Pages in this session: {}",
                    browser.engine().pages_generated()
                ));
            }
            ReplCommand::Help => {
                println!("Special commands:");
                println!("  {}", SCENARIO_USAGE);
                println!("  {}", DESCRIBE_USAGE);
                println!("  /scenarios      - List scenarios");
                println!("  /current        - Show active scenario");
                println!("  /count          - Show pages generated this session");
                println!("  /help           - Show this help");
                println!("  Ctrl+C          - Exit\n");
            }
            ReplCommand::Usage(usage) => utils::print_error(&format!("Usage: {}", usage)),
            ReplCommand::Navigate(path) => match browser.browse(path).await {
                Ok(BrowseOutcome::Page(html)) => println!("{}\n", html),
                Ok(BrowseOutcome::Asset(cached)) => {
                    utils::print_success(&format!("Image at {}\n", cached.display()))
                }
                Err(e) => utils::print_error(&format!("Failed to load {}: {}\n", path, e)),
            },
        }
    }
}

async fn handle_scenarios(settings: &Settings, command: ScenarioCommands) -> Result<()> {
    let store = FileScenarioStore::open(&settings.storage.scenarios_dir)
        .await
        .context("Failed to open scenario store")?;

    match command {
        ScenarioCommands::List => {
            utils::print_header("Scenarios");
            for s in store.list_all().await {
                utils::print_scenario(&s.summary(), false);
            }
        }
        ScenarioCommands::Show { name } => match store.get(&name).await {
            Some(s) => {
                utils::print_header(&s.name);
                utils::print_info(&s.description);
                println!("\n{}", s.scenario);
            }
            None => anyhow::bail!("Scenario not found: {}", name),
        },
        ScenarioCommands::Add { name, description, scenario } => {
            store
                .add(ScenarioTemplate::new(name.clone(), description, scenario))
                .await?;
            utils::print_success(&format!("Saved scenario: {}", name));
        }
    }
    Ok(())
}

async fn handle_image(settings: &Settings, identifier: String, inline: bool) -> Result<()> {
    let client = FalImageClient::new(Settings::image_api_key()?, settings.image.clone());
    let cache = AssetCache::new(
        &settings.storage.cache_dir,
        Arc::new(client),
        settings.image.quality_suffix.clone(),
    )
    .await?;

    if inline {
        println!("{}", cache.as_inline_data(&identifier).await?);
    } else {
        let cached = cache.get_or_generate(&identifier).await?;
        utils::print_success(&cached.display().to_string());
    }
    Ok(())
}
