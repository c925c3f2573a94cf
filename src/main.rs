//! CLI entry point for folio

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::commands::list::ListOptions;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Load, inspect and serve portfolio and blog content", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Fetch content from this base URL instead of the local content directory
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts, projects or tags
    #[command(alias = "ls")]
    List {
        /// Type of content to list (post, project, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only posts whose title or excerpt contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only posts carrying this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a post by slug, rendered to HTML
    Post {
        slug: String,

        #[arg(long)]
        json: bool,
    },

    /// Show a portfolio project by id
    Project {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Render a local markdown file to HTML
    Render {
        file: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,
    },

    /// Serve the content directory and its JSON views
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,tower_http=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let folio = folio::Folio::new(&base_dir)?;
    let url = cli.url.as_deref();
    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::List {
            r#type,
            search,
            tag,
            json,
        } => {
            let loader = folio.loader(url);
            let options = ListOptions { search, tag, json };
            folio::commands::list::run(&loader, &r#type, &options, &mut stdout).await?;
        }

        Commands::Post { slug, json } => {
            let loader = folio.loader(url);
            folio::commands::show::post(&loader, &folio.renderer(), &slug, json, &mut stdout)
                .await?;
        }

        Commands::Project { id, json } => {
            let loader = folio.loader(url);
            folio::commands::show::project(&loader, &folio.renderer(), &id, json, &mut stdout)
                .await?;
        }

        Commands::Render { file } => {
            let file = if file.is_absolute() {
                file
            } else {
                base_dir.join(file)
            };
            folio::commands::render::run(&folio.renderer(), &file, &mut stdout)?;
        }

        Commands::New { title } => {
            let path = folio.new_post(&title)?;
            println!("Created {:?}", path);
        }

        Commands::Serve { port, ip } => {
            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio::server::start(&folio, &ip, port).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
