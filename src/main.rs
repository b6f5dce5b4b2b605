//! Webmark main entry point
//!
//! This is the command-line interface for converting web pages to Markdown.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use webmark::config::{load_config, resolve_llm_config, CrawlPolicy, CrawlPolicyBuilder, FileConfig};
use webmark::crawler::{
    build_http_client, Converter, CrawlResult, Crawler, PageConverter, PostProcess,
};
use webmark::llm::LlmClient;
use webmark::output::print_crawl_summary;

/// Webmark: web pages to Markdown
///
/// Converts a single page, a list of pages, or a whole documentation site
/// into Markdown files with YAML front matter. Converted documents can
/// optionally be cleaned up or translated by an OpenAI-compatible model.
#[derive(Parser, Debug)]
#[command(name = "webmark")]
#[command(version)]
#[command(about = "Convert web pages to Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to TOML configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Clean up converted Markdown with the LLM
    #[arg(long, global = true)]
    llm_refine: bool,

    /// Translate converted Markdown into LANG with the LLM
    #[arg(long, global = true, value_name = "LANG")]
    llm_translate: Option<String>,

    /// Print the crawl result as JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a single page
    Convert {
        /// Page URL
        url: String,

        /// Write the Markdown to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Crawl a site breadth-first from a start URL
    Crawl {
        /// Start URL
        url: String,

        #[command(flatten)]
        crawl: CrawlArgs,

        /// Link hops to follow from the start URL
        #[arg(long, value_name = "N")]
        link_depth: Option<u32>,

        /// Path segments allowed below the scope prefix
        #[arg(long, value_name = "N", conflicts_with = "unbounded_path_depth")]
        path_depth: Option<u32>,

        /// Do not limit path depth below the scope prefix
        #[arg(long)]
        unbounded_path_depth: bool,

        /// Directory levels above the start page that stay in scope
        #[arg(long, value_name = "N")]
        scope: Option<u32>,

        /// List out-of-scope URLs in the summary
        #[arg(long)]
        list_skipped: bool,
    },

    /// Convert a fixed list of pages without following links
    Batch {
        /// Page URLs
        #[arg(required_unless_present = "urls_file")]
        urls: Vec<String>,

        /// Read URLs from FILE, one per line (`#` starts a comment)
        #[arg(long, value_name = "FILE")]
        urls_file: Option<PathBuf>,

        #[command(flatten)]
        crawl: CrawlArgs,
    },
}

/// Options shared by `crawl` and `batch`
#[derive(Args, Debug)]
struct CrawlArgs {
    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Maximum pages converted at the same time
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let file_config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).map_err(|e| {
                tracing::error!("Failed to load configuration: {}", e);
                e
            })?
        }
        None => FileConfig::default(),
    };

    let converter = build_converter(&cli, &file_config)?;

    match &cli.command {
        Command::Convert { url, output } => {
            handle_convert(&converter, url, output.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Crawl {
            url,
            crawl,
            link_depth,
            path_depth,
            unbounded_path_depth,
            scope,
            list_skipped,
        } => {
            let mut builder = policy_builder(&file_config, crawl)?;
            if let Some(depth) = link_depth {
                builder = builder.max_link_depth(*depth);
            }
            if let Some(levels) = scope {
                builder = builder.scope_levels(*levels);
            }
            if *unbounded_path_depth {
                builder = builder.max_path_depth(None);
            } else if path_depth.is_some() {
                builder = builder.max_path_depth(*path_depth);
            }
            let crawler = Crawler::new(converter, builder.build()?);

            tracing::info!(
                "Crawling {} into {}",
                url,
                crawler.policy().output_dir().display()
            );
            let result = crawler.crawl(url).await?;
            report(&result, cli.json, *list_skipped)
        }
        Command::Batch {
            urls,
            urls_file,
            crawl,
        } => {
            let mut targets = urls.clone();
            if let Some(path) = urls_file {
                let content = std::fs::read_to_string(path)?;
                targets.extend(parse_url_list(&content));
            }
            if targets.is_empty() {
                return Err("no URLs to convert".into());
            }

            let crawler = Crawler::new(converter, policy_builder(&file_config, crawl)?.build()?);
            tracing::info!(
                "Converting {} URLs into {}",
                targets.len(),
                crawler.policy().output_dir().display()
            );
            let result = crawler.crawl_urls(&targets).await;
            report(&result, cli.json, false)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webmark=info,warn"),
            1 => EnvFilter::new("webmark=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the page converter, wiring in the LLM when post-processing is requested
fn build_converter(
    cli: &Cli,
    file_config: &FileConfig,
) -> Result<PageConverter, Box<dyn std::error::Error>> {
    let http = build_http_client(&file_config.fetch_config())?;
    let converter = PageConverter::new(http);

    let post = PostProcess {
        refine: cli.llm_refine,
        translate_to: cli.llm_translate.clone(),
    };
    if post.is_empty() {
        return Ok(converter);
    }

    let llm = LlmClient::new(
        resolve_llm_config(&file_config.llm)?,
        file_config.retry_policy(),
    );
    tracing::info!(
        "LLM post-processing enabled (model: {}, refine: {}, translate: {})",
        llm.config().model,
        post.refine,
        post.translate_to.as_deref().unwrap_or("no")
    );

    Ok(converter.with_llm(llm, post))
}

/// Starts a policy from the `[crawl]` section with CLI overrides for the shared options
fn policy_builder(
    file_config: &FileConfig,
    args: &CrawlArgs,
) -> Result<CrawlPolicyBuilder, Box<dyn std::error::Error>> {
    let section = &file_config.crawl;

    let output_dir = args
        .output
        .clone()
        .or_else(|| section.output_dir.clone())
        .ok_or("an output directory is required (-o DIR or [crawl] output-dir)")?;

    let mut builder = CrawlPolicy::builder(output_dir);
    if let Some(depth) = section.max_link_depth {
        builder = builder.max_link_depth(depth);
    }
    if section.unbounded_path_depth {
        builder = builder.max_path_depth(None);
    } else if section.max_path_depth.is_some() {
        builder = builder.max_path_depth(section.max_path_depth);
    }
    if let Some(levels) = section.scope_levels {
        builder = builder.scope_levels(levels);
    }
    if let Some(concurrency) = args.concurrency.or(section.concurrency) {
        builder = builder.concurrency(concurrency);
    }

    Ok(builder)
}

/// Handles the `convert` command: one page to stdout or a file
async fn handle_convert(
    converter: &PageConverter,
    url: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Converting {}", url);
    let page = converter.convert(url).await.map_err(|e| {
        tracing::error!("Conversion failed: {:#}", e);
        format!("{:#}", e)
    })?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, &page.markdown).await?;
            tracing::info!("Saved {}", path.display());
        }
        None => print!("{}", page.markdown),
    }

    Ok(())
}

/// Prints the result and maps failures to a non-zero exit status
fn report(
    result: &CrawlResult,
    json: bool,
    list_skipped: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_crawl_summary(result, list_skipped);
    }

    if result.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Parses a URL list file: one URL per line, blank lines and `#` comments skipped
fn parse_url_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_list() {
        let content = "\
# docs
https://example.com/a

  https://example.com/b
#https://example.com/skipped
";
        assert_eq!(
            parse_url_list(content),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn test_cli_parses_crawl() {
        let cli = Cli::try_parse_from([
            "webmark",
            "crawl",
            "https://example.com/docs/intro",
            "-o",
            "out",
            "--link-depth",
            "2",
            "--scope",
            "1",
            "--llm-refine",
        ])
        .unwrap();

        assert!(cli.llm_refine);
        match cli.command {
            Command::Crawl {
                url,
                crawl,
                link_depth,
                scope,
                ..
            } => {
                assert_eq!(url, "https://example.com/docs/intro");
                assert_eq!(crawl.output, Some(PathBuf::from("out")));
                assert_eq!(link_depth, Some(2));
                assert_eq!(scope, Some(1));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_batch_requires_urls() {
        assert!(Cli::try_parse_from(["webmark", "batch", "-o", "out"]).is_err());
        assert!(Cli::try_parse_from(["webmark", "batch", "--urls-file", "urls.txt", "-o", "out"]).is_ok());
    }

    #[test]
    fn test_policy_builder_prefers_cli_over_file() {
        let file_config = webmark::config::parse_config(
            r#"
            [crawl]
            output-dir = "from-file"
            concurrency = 5
            max-link-depth = 1
            "#,
        )
        .unwrap();
        let args = CrawlArgs {
            output: Some(PathBuf::from("from-cli")),
            concurrency: None,
        };

        let policy = policy_builder(&file_config, &args).unwrap().build().unwrap();
        assert_eq!(policy.output_dir(), Path::new("from-cli"));
        assert_eq!(policy.concurrency(), 5);
        assert_eq!(policy.max_link_depth(), 1);
    }

    #[test]
    fn test_policy_builder_requires_output_dir() {
        let args = CrawlArgs {
            output: None,
            concurrency: None,
        };
        assert!(policy_builder(&FileConfig::default(), &args).is_err());
    }
}
