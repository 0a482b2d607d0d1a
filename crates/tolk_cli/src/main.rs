use std::sync::Arc;

use clap::{Parser, Subcommand};
use tolk_extract::{ArticleExtractor, Fetcher, RenderProxy};
use tolk_inference::{GeminiModel, SessionStore};
use tolk_web::{create_app, AppState};
use tracing::info;

/// Environment variable holding the optional rendering-proxy token for
/// challenge-protected sites.
const RENDER_PROXY_TOKEN_VAR: &str = "TOLK_RENDER_PROXY_TOKEN";

#[derive(Parser, Debug)]
#[command(author, version, about = "News article extraction and Estonian translation service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8080)]
        port: u16,
        /// Override the text-generation service base URL
        #[arg(long)]
        model_url: Option<String>,
    },
    /// Extract a single article and print its markdown content
    Scrape {
        url: String,
        /// Use this title instead of the page's own heading
        #[arg(long)]
        estonian_title: Option<String>,
    },
}

fn build_fetcher() -> Fetcher {
    let mut fetcher = Fetcher::new();
    if let Ok(token) = std::env::var(RENDER_PROXY_TOKEN_VAR) {
        if !token.trim().is_empty() {
            info!("🌐 Rendering proxy enabled");
            fetcher = fetcher.with_render_proxy(RenderProxy::new(token));
        }
    }
    fetcher
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            model_url,
        } => {
            let extractor = ArticleExtractor::new(build_fetcher());
            let mut model = GeminiModel::new();
            if let Some(url) = model_url {
                model = model.with_base_url(url);
            }
            let state = AppState {
                store: SessionStore::new(),
                extractor,
                model: Arc::new(model),
            };
            let app = create_app(state);

            let addr = format!("{host}:{port}");
            info!("🚀 tolk listening on {}", addr);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await?;
        }
        Commands::Scrape {
            url,
            estonian_title,
        } => {
            let extractor = ArticleExtractor::new(build_fetcher());
            let article = extractor.extract(&url, estonian_title.as_deref()).await?;
            println!("# {}\n", article.title);
            println!("{}", article.content);
        }
    }

    Ok(())
}
