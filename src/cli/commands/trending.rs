//! Trending list command handler

use crate::config::Config;
use crate::constants::limits::TRENDING_LIMIT;
use crate::db::Store;

pub async fn cmd_trending(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let trending = store.top_searches(TRENDING_LIMIT).await?;

    if trending.is_empty() {
        println!("No searches recorded yet.");
        return Ok(());
    }

    println!("Trending Movies (top {})", trending.len());
    println!("{:-<70}", "");

    for (rank, record) in trending.iter().enumerate() {
        println!(
            "{:>2}. {} [{} searches]",
            rank + 1,
            record.search_term,
            record.count
        );
        println!(
            "    Movie ID: {} | Last searched: {}",
            record.movie_id,
            record
                .updated_at
                .unwrap_or(record.created_at)
                .format("%Y-%m-%d %H:%M UTC")
        );
    }

    Ok(())
}
