use clap::Parser;
use inbox_sync::{InboxSync, SyncConfig, SyncError, progress};
use std::process::ExitCode;

mod args;
use args::{Args, Command, select_articles};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            ::log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode, SyncError> {
    if args.command == Command::Init {
        init(&args)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = args.resolve_config()?;
    ::log::debug!(
        "Using endpoint {} and directory {}",
        config.endpoint,
        config.directory.display()
    );

    // Progress events are only logged here
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<progress::Progress>();
    let reporter = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            ::log::info!("{}", event);
        }
    });

    let sync = InboxSync::new(config)?.with_progress(tx);
    let result = execute(&sync, &args.command).await;

    // Close the channel so the reporter drains and exits
    drop(sync);
    let _ = reporter.await;
    result
}

async fn execute(sync: &InboxSync, command: &Command) -> Result<ExitCode, SyncError> {
    match command {
        Command::List => {
            let articles = sync.list().await?;
            for (i, article) in articles.iter().enumerate() {
                println!(
                    "{}. {} ({}) [{}]",
                    i + 1,
                    article.title,
                    article.author.as_deref().unwrap_or("Unknown"),
                    article.slug
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Download { articles: selectors } => {
            let articles = sync.list().await?;
            let selected = select_articles(&articles, selectors).map_err(SyncError::Config)?;

            for article in &selected {
                let path = sync.download(article).await?;
                println!("{}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Sync => {
            let articles = sync.list().await?;
            let report = sync.download_all(&articles).await;

            println!(
                "Saved {} of {} articles to {}",
                report.saved.len(),
                articles.len(),
                sync.config().directory.display()
            );
            for (slug, error) in &report.failed {
                println!("  failed {}: {}", slug, error);
            }

            if report.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        // Written before a session exists
        Command::Init => Ok(ExitCode::SUCCESS),
    }
}

/// Persist the options given on the command line as a configuration file
fn init(args: &Args) -> Result<(), SyncError> {
    let path = args
        .config
        .as_ref()
        .ok_or_else(|| SyncError::Config("init needs --config <file>".to_string()))?;
    let directory = args
        .directory
        .as_ref()
        .ok_or_else(|| SyncError::Config("init needs --directory <dir>".to_string()))?;

    let mut config = SyncConfig::new(args.api_key.as_deref().unwrap_or_default(), directory);
    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }
    config.save(path)?;

    println!("Wrote {}", path.display());
    Ok(())
}
