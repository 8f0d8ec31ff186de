use clap::{Parser, Subcommand, ValueEnum};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "content-cli")]
#[command(about = "Inspect a running content aggregator", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Sent as x-request-id so the call can be found in the server logs
    #[arg(short, long)]
    request_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sitemap XML
    Sitemap {
        /// Print the JSON entries instead
        #[arg(long)]
        json: bool,
    },
    /// Load a composite page
    Page {
        #[arg(value_enum)]
        page: Page,
    },
    /// Show cached footer settings
    Footer,
    /// Check service health
    Health,
}

#[derive(Clone, Copy, ValueEnum)]
enum Page {
    About,
    InterviewQuestions,
    TermsGeneral,
    TermsInstructor,
}

impl Page {
    fn path(self) -> &'static str {
        match self {
            Page::About => "/api/pages/about",
            Page::InterviewQuestions => "/api/pages/interview-questions",
            Page::TermsGeneral => "/api/pages/terms/general",
            Page::TermsInstructor => "/api/pages/terms/instructor",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if let Some(id) = &cli.request_id {
        headers.insert("x-request-id", HeaderValue::from_str(id)?);
    }

    match cli.command {
        Commands::Sitemap { json: false } => {
            let res = client.get(format!("{}/sitemap.xml", base)).headers(headers).send().await?;
            print_text(res).await?;
        }
        Commands::Sitemap { json: true } => {
            let res = client.get(format!("{}/sitemap.json", base)).headers(headers).send().await?;
            print_response(res).await?;
        }
        Commands::Page { page } => {
            let res = client.get(format!("{}{}", base, page.path())).headers(headers).send().await?;
            print_response(res).await?;
        }
        Commands::Footer => {
            let res = client.get(format!("{}/api/footer-settings", base)).headers(headers).send().await?;
            if res.status() == reqwest::StatusCode::NO_CONTENT {
                println!("Footer settings not available yet");
                return Ok(());
            }
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/healthz", base)).headers(headers).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_text(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        eprintln!("Response: {}", text);
        return Ok(());
    }
    println!("{}", text);
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
