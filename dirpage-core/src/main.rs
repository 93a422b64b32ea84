//! src/main.rs
//! Line-oriented front end for the paged directory listing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use dirpage_core::{
    Config, Entry, PagingClient, PagingProvider,
    logging::init_logging,
};

const HELP: &str = "commands: n = next page, s = show from start, c = count, h <index> = sha256, q = quit";

#[tokio::main]
async fn main() -> Result<()> {
    let mut config = Config::load().await.context("Failed to load configuration")?;

    if let Some(dir) = std::env::args_os().nth(1) {
        config.backing_dir = Some(PathBuf::from(dir));
    }

    let _log_guard = init_logging(&config.logging)
        .await
        .context("Failed to initialize logging")?;

    let provider = PagingProvider::open(&config)
        .await
        .context("Failed to open backing store")?;

    println!("Listing {}", provider.store().root().display());
    println!("{HELP}");

    let mut client = PagingClient::new(provider, config.page_size);
    run(&mut client).await?;

    info!("Exited cleanly");
    Ok(())
}

async fn run(client: &mut PagingClient<PagingProvider>) -> Result<()> {
    let first = client.show().await.context("Initial page query failed")?;
    print_items(client.items(), 0, first);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("n") => {
                let start = client.len();
                let last_visible = start.saturating_sub(1);
                let fetched = client
                    .on_scroll(last_visible)
                    .await
                    .context("Page query failed")?;

                if fetched == 0 {
                    println!("-- end of listing ({} total) --", client.len());
                } else {
                    print_items(client.items(), start, fetched);
                }
            }

            Some("s") => {
                let fetched = client.show().await.context("Page query failed")?;
                print_items(client.items(), 0, fetched);
            }

            Some("c") => {
                let count = client.source().count().await?;
                println!("{count} entries in store, {} loaded", client.len());
            }

            Some("h") => {
                let index = parts.next().and_then(|s| s.parse::<usize>().ok());
                match index.and_then(|i| client.items().get(i)) {
                    Some(entry) => match entry.sha256().await {
                        Ok(digest) => println!("{digest}  {}", entry.display_name),
                        Err(e) => {
                            error!("Hash failed for {:?}: {}", entry.absolute_path, e);
                            println!("error: {e}");
                        }
                    },
                    None => println!("usage: h <index of a loaded item>"),
                }
            }

            Some("q") => break,

            Some(_) => println!("{HELP}"),

            None => {}
        }
    }

    Ok(())
}

fn print_items(items: &[Entry], start: usize, count: usize) {
    for (index, entry) in items.iter().enumerate().skip(start).take(count) {
        let marker = if entry.is_dir { "/" } else { "" };
        println!(
            "{index:>5}  {:>10}  {}{marker}",
            entry.human_size(),
            entry.display_name
        );
    }
}
