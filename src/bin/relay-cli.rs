use clap::{Args, Parser, Subcommand};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Command-line client for the course-selection relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CallArgs {
    /// Session cookie copied from a logged-in browser.
    #[arg(short, long, env = "XSXK_COOKIE")]
    cookie: String,

    /// Course-selection category.
    #[arg(short, long, default_value = "07")]
    xklx: String,

    /// Payload field as key=value; repeatable.
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the selection round configuration
    Config(CallArgs),
    /// Search course groups
    Hzkc(CallArgs),
    /// List courses of one group (needs -p kcptdm=...)
    Kxkc(CallArgs),
    /// Search groups and list the courses of the first match
    Search(CallArgs),
    /// Register for a course (needs -p kcrwdm=...)
    Add(CallArgs),
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (endpoint, args) = match &cli.command {
        Commands::Config(a) => ("config", a),
        Commands::Hzkc(a) => ("hzkc", a),
        Commands::Kxkc(a) => ("kxkc", a),
        Commands::Search(a) => ("search", a),
        Commands::Add(a) => ("add", a),
    };

    let payload: Map<String, Value> = args
        .params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    let body = json!({
        "cookie": args.cookie,
        "xklx": args.xklx,
        "payload": payload,
    });

    let res = reqwest::Client::new()
        .post(format!("{}/api/{}", cli.url.trim_end_matches('/'), endpoint))
        .json(&body)
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
