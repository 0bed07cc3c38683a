

use anyhow::{Context, bail};
use taxonomist::{ClassificationQuery, TaxonomistConfig, TaxonomyRegistry};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage: taxonomist [--tree LANG | --stats | LANG KEYWORD[,KEYWORD...]]\n\
                     with no arguments, reads `LANG KEYWORD[,KEYWORD...]` lines from stdin";

const DEFAULT_LOG_FILTER: &str = "warn,taxonomist=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return Ok(());
    }

    let config = TaxonomistConfig::from_env().context("loading configuration")?;
    let registry = TaxonomyRegistry::bootstrap(&config)
        .await
        .with_context(|| format!("building taxonomy from {}", config.taxonomy_path.display()))?;

    match args.first().map(String::as_str) {
        Some("--tree") => {
            let tag = args.get(1).map(String::as_str).unwrap_or(config.source_language.code());
            print!("{}", registry.variant(tag)?.render_tree());
        }
        Some("--stats") => {
            for language in registry.languages() {
                let stats = registry.variant(language.code())?.stats();
                println!("{}", serde_json::to_string(&stats)?);
            }
        }
        Some(_) => {
            if args.len() < 2 {
                bail!("{USAGE}");
            }
            let line = args.join(" ");
            println!("{}", classify_line(&registry, &line)?);
        }
        None => {
            info!("Reading queries from stdin");
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                if line.trim().is_empty() {
                    continue;
                }
                match classify_line(&registry, &line) {
                    Ok(output) => println!("{output}"),
                    Err(e) => warn!("Skipping '{}': {}", line.trim(), e),
                }
            }
        }
    }

    Ok(())
}

/// `RUST_LOG` when set and valid, otherwise `DEFAULT_LOG_FILTER`.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|spec| !spec.trim().is_empty())
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// `LANG kw1,kw2 kw3` -> JSON classification result.
fn classify_line(registry: &TaxonomyRegistry, line: &str) -> anyhow::Result<String> {
    let (language, rest) = line
        .trim()
        .split_once(char::is_whitespace)
        .context("expected `LANG KEYWORD[,KEYWORD...]`")?;

    let keywords: Vec<&str> = rest
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect();

    let result = registry.classify(&ClassificationQuery::new(keywords, language))?;
    Ok(serde_json::to_string(&result)?)
}
