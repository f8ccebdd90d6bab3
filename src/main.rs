use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use newsfeed::api::FeedApi;
use newsfeed::cache::TtlCache;
use newsfeed::clock::Clock;
use newsfeed::config::{Config, DurationOpt, PathOpt, StrOpt, USizeOpt};
use newsfeed::fs::Fs;
use newsfeed::log::Log;
use newsfeed::net::Net;
use newsfeed::server::Server;
use newsfeed::service::ArticleService;
use newsfeed::{ArcPath, ArcStr};

const SCOPE: &str = "main";

#[derive(Parser)]
#[command(name = "newsfeed")]
#[command(about = "Serves the articles of RSS and Atom feeds, newest first")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to listen on, overrides the configured one
        #[arg(short, long)]
        address: Option<String>,
    },
    /// Print the newest articles of a feed
    Articles {
        /// URL of an RSS or Atom feed
        #[arg(required = true)]
        feed_url: String,
        /// Number of articles to print
        #[arg(short, long, default_value = "10")]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let fs = Fs::spawn();

    let home = std::env::var("HOME").context("Reading the HOME environment variable")?;
    let config_path = Path::new(&home)
        .join(".config")
        .join("newsfeed")
        .join("config.toml");
    let config_path = ArcPath::from(&config_path);

    let config = Config::spawn(fs.clone(), config_path);
    if config.load().await.is_err() {
        config.save().await?;
    }

    let log = Log::spawn(
        fs.clone(),
        config.log_level().await,
        config.usize(USizeOpt::MaxAge).await,
        config.path(PathOpt::LogDir).await,
    )
    .await?;
    log.collect_garbage().await;

    let net = Net::spawn(config.clone(), log.clone()).await?;
    let feeds = FeedApi::spawn(net, log.clone());
    let cache = TtlCache::spawn(
        config.duration(DurationOpt::CacheTtl).await,
        config.duration(DurationOpt::SweepInterval).await,
        Clock::system(),
        log.clone(),
    )?;
    let service = ArticleService::new(feeds, cache.clone(), log.clone());

    log.info(SCOPE, "Starting newsfeed");

    let result = match cli.command {
        Commands::Serve { address } => {
            let address = match address {
                Some(address) => ArcStr::from(address),
                None => config.string(StrOpt::BindAddress).await,
            };
            let timeout = config.usize(USizeOpt::Timeout).await;
            let timeout = Duration::from_secs(timeout as u64);
            handle_serve_command(address, timeout, service, log.clone()).await
        }
        Commands::Articles { feed_url, count } => {
            handle_articles_command(&service, feed_url, count).await
        }
    };

    cache.stop().await;
    let result = log.error_on_error(SCOPE, result);
    let _ = log.flush().await;

    result
}

/// Handle the serve command by running the HTTP server until Ctrl-C
async fn handle_serve_command(
    address: ArcStr,
    timeout: Duration,
    service: ArticleService,
    log: Log,
) -> anyhow::Result<()> {
    println!("Listening on http://{}/articles/feed", address);
    Server::new(address, timeout, service, log).start().await
}

/// Handle the articles command to display the newest articles of a feed
async fn handle_articles_command(
    service: &ArticleService,
    feed_url: String,
    count: usize,
) -> anyhow::Result<()> {
    println!("Fetching articles from {}...", feed_url);

    let articles = service.get_articles(ArcStr::from(feed_url)).await?;
    if articles.is_empty() {
        println!("The feed has no articles");
        return Ok(());
    }

    println!(
        "Showing {} of {} articles:",
        count.min(articles.len()),
        articles.len()
    );
    println!();

    for (i, article) in articles.iter().take(count).enumerate() {
        println!("{}. {}", i + 1, article.title);
        match article.published {
            Some(date) => println!("   Date: {}", date.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("   Date: unknown"),
        }
        if !article.url.is_empty() {
            println!("   Link: {}", article.url);
        }
        if !article.image.url.is_empty() {
            println!("   Image: {}", article.image.url);
        }
        println!();
    }

    Ok(())
}
