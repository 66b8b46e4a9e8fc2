use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Send relay requests to a running cors-relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    relay: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Target {
    /// Target URL the relay should call
    url: String,

    /// Bearer token for the target
    #[arg(short = 't', long)]
    token: String,

    /// Optional TenantID header
    #[arg(long)]
    tenant: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the relay's externally visible base URL
    Reachable,
    /// GET the target through the relay
    Get {
        #[command(flatten)]
        target: Target,
        /// Return response headers as well
        #[arg(long)]
        with_headers: bool,
    },
    /// POST a raw JSON body to the target
    Post {
        #[command(flatten)]
        target: Target,
        #[arg(short, long)]
        data: Option<String>,
    },
    /// DELETE the target
    Delete {
        #[command(flatten)]
        target: Target,
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Exchange a refresh token at {base_url}/oauth2/token
    Refresh {
        base_url: String,
        #[arg(long)]
        client_id: String,
        #[arg(long)]
        client_secret: String,
        #[arg(long)]
        access_token: String,
        #[arg(long)]
        refresh_token: String,
    },
}

fn command_body(target: &Target, data: Option<&str>) -> Value {
    let mut body = json!({ "url": target.url, "access_token": target.token });
    if let Some(tenant) = &target.tenant {
        body["tenantID"] = json!(tenant);
    }
    if let Some(data) = data {
        body["data"] = json!(data);
    }
    body
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.relay.trim_end_matches('/');

    let (path, body) = match &cli.command {
        Commands::Reachable => {
            let text = client.get(format!("{}/reachable", base)).send().await?.text().await?;
            println!("{}", text);
            return Ok(());
        }
        Commands::Get { target, with_headers } => {
            let path = if *with_headers { "/tools/getCommandwHeaders" } else { "/tools/getCommand" };
            (path, command_body(target, None))
        }
        Commands::Post { target, data } => ("/tools/postCommand", command_body(target, data.as_deref())),
        Commands::Delete { target, data } => ("/tools/deleteCommand", command_body(target, data.as_deref())),
        Commands::Refresh {
            base_url,
            client_id,
            client_secret,
            access_token,
            refresh_token,
        } => (
            "/auth/refresh",
            json!({
                "base_url": base_url,
                "client_id": client_id,
                "client_secret": client_secret,
                "access_token": access_token,
                "refresh_token": refresh_token,
            }),
        ),
    };

    let res = client.post(format!("{}{}", base, path)).json(&body).send().await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Relay returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
