use budget_forecasting_tool::llm::{CommentaryDispatcher, GeminiConfig};
use budget_forecasting_tool::{format_amount, BudgetDashboard, Category};
use dotenv::dotenv;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let config = GeminiConfig::from_env()?;
    println!("🤖 Using model {}", config.model);

    let mut dashboard = BudgetDashboard::seeded();
    if let Some(year) = std::env::args().nth(1) {
        dashboard.select_year(&year);
    }

    println!("\n📊 Fiscal year {}", dashboard.active_year());
    println!("{}", "-".repeat(60));
    for card in dashboard.summary_cards() {
        println!(
            "{:<16} actual £{:>12}  budget £{:>12}  {:>6}% ({:?})",
            card.title,
            format_amount(card.actual),
            format_amount(card.budget),
            card.variance.percent,
            card.variance.favorability
        );
    }

    println!("\n⏳ Requesting commentary for {} categories...", Category::ALL.len());
    let dispatcher = CommentaryDispatcher::from_config(config);
    let applied = dispatcher
        .generate_many(&mut dashboard, &Category::ALL)
        .await;
    println!("✅ {} commentaries received\n", applied);

    for category in Category::ALL {
        println!("## {}", category.title());
        println!("{}\n", dashboard.commentary_text(category));
    }

    let snapshot = serde_json::to_string_pretty(&dashboard.snapshot())?;
    let output = std::env::temp_dir().join("budget_dashboard_snapshot.json");
    std::fs::write(&output, snapshot)?;
    println!("💾 Snapshot written to {}", output.display());

    Ok(())
}
