use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use reseller_gateway::dashboard::format::{session_seconds, ProxyFormat, ProxyOptions, SessionMode, SessionUnit};
use reseller_gateway::dashboard::catalog::offer;
use reseller_gateway::dashboard::{
    ClientError, Dashboard, GatewayClient, Plan, PLAN_CATALOG, PLAN_FEATURES, View,
};

#[derive(Parser)]
#[command(name = "reseller-cli")]
#[command(about = "Terminal dashboard for the IPv6 proxy reseller gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the plans on offer
    Plans,
    /// Purchase a plan
    Purchase {
        /// Plan size in GB; must match a card from `plans`
        #[arg(short, long, value_parser = catalog_bandwidth)]
        bandwidth: u64,
    },
    /// Show plan status, credentials and whitelist
    Show {
        #[arg(short, long)]
        plan_id: String,
    },
    /// Print connection strings for one country
    Proxies {
        #[arg(short, long)]
        plan_id: String,
        /// Country code; defaults to the first one returned
        #[arg(short, long)]
        country: Option<String>,
        #[arg(long, value_enum, default_value_t = FormatArg::HostPortUserPass)]
        format: FormatArg,
        /// Scheme prefix, e.g. http or socks5
        #[arg(long)]
        scheme: Option<String>,
        /// Print IP-whitelisted endpoints instead of credentialed strings
        #[arg(long)]
        whitelisted: bool,
        /// Sticky session length; rotating when omitted
        #[arg(long)]
        sticky: Option<String>,
        #[arg(long, value_enum, default_value_t = UnitArg::Min)]
        unit: UnitArg,
    },
    /// Add the fixed bandwidth increment to a plan
    AddBandwidth {
        #[arg(short, long)]
        plan_id: String,
    },
    /// Manage the plan's IP whitelist
    Whitelist {
        #[command(subcommand)]
        action: WhitelistCommand,
    },
}

#[derive(Subcommand)]
enum WhitelistCommand {
    Add {
        #[arg(short, long)]
        plan_id: String,
        #[arg(long)]
        ip: String,
    },
    Remove {
        #[arg(short, long)]
        plan_id: String,
        #[arg(long)]
        ip: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    /// host:port:user:pass
    HostPortUserPass,
    /// user:pass@host:port
    UserPassAtHostPort,
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitArg {
    Sec,
    Min,
    Hour,
}

impl From<FormatArg> for ProxyFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::HostPortUserPass => ProxyFormat::HostPortUserPass,
            FormatArg::UserPassAtHostPort => ProxyFormat::UserPassAtHostPort,
        }
    }
}

impl From<UnitArg> for SessionUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Sec => SessionUnit::Sec,
            UnitArg::Min => SessionUnit::Min,
            UnitArg::Hour => SessionUnit::Hour,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reseller_gateway=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = GatewayClient::new(&cli.url);

    let result = run(cli.command, client).await;
    if let Err(e) = result {
        eprintln!("Error: {}", e.display_message());
        std::process::exit(1);
    }
    Ok(())
}

fn catalog_bandwidth(value: &str) -> Result<u64, String> {
    let gb: u64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a whole number of GB", value))?;
    match offer(gb) {
        Some(plan) => Ok(plan.bandwidth_gb),
        None => {
            let sizes: Vec<String> = PLAN_CATALOG
                .iter()
                .map(|o| o.bandwidth_gb.to_string())
                .collect();
            Err(format!("no {}GB plan; choose one of {}", gb, sizes.join(", ")))
        }
    }
}

fn session(client: GatewayClient, plan_id: String) -> Dashboard {
    Dashboard::with_plan(
        client,
        Plan {
            plan_id,
            bandwidth_gb: None,
        },
    )
}

async fn run(command: Commands, client: GatewayClient) -> Result<(), ClientError> {
    match command {
        Commands::Plans => {
            for offer in PLAN_CATALOG.iter() {
                println!("{:<12} {}", offer.title(), offer.price_label());
            }
            for feature in PLAN_FEATURES {
                println!("  - {}", feature);
            }
        }
        Commands::Purchase { bandwidth } => {
            let mut dashboard = Dashboard::new(client);
            let plan = dashboard.purchase(bandwidth).await?;
            println!("Purchased {}GB plan: {}", bandwidth, plan.plan_id);
        }
        Commands::Show { plan_id } => {
            let body = client.read_plan(&plan_id).await?;
            print_json(&body);
        }
        Commands::Proxies {
            plan_id,
            country,
            format,
            scheme,
            whitelisted,
            sticky,
            unit,
        } => {
            let session_mode = match sticky {
                None => SessionMode::Rotating,
                Some(value) => {
                    let seconds = session_seconds(unit.into(), &value).ok_or_else(|| {
                        ClientError::InvalidInput(format!("'{}' is not a valid session length", value))
                    })?;
                    SessionMode::sticky(seconds)
                }
            };

            let mut dashboard = session(client, plan_id);
            dashboard.generate_proxy().await?;
            if let Some(country) = country {
                if !dashboard.select_country(&country) {
                    return Err(ClientError::InvalidInput(format!(
                        "No proxies for country '{}'",
                        country
                    )));
                }
            }
            if whitelisted {
                dashboard.set_view(View::Whitelist);
            }

            let options = ProxyOptions {
                format: format.into(),
                scheme,
                session: session_mode,
            };
            for line in dashboard.proxy_lines(&options) {
                println!("{}", line);
            }
        }
        Commands::AddBandwidth { plan_id } => {
            let mut dashboard = session(client, plan_id);
            let info = dashboard.add_bandwidth().await?;
            println!(
                "Bandwidth left: {}",
                info.proxies
                    .bandwidth_left
                    .as_ref()
                    .map(display_value)
                    .unwrap_or_else(|| "unknown".to_string())
            );
        }
        Commands::Whitelist { action } => {
            let info = match action {
                WhitelistCommand::Add { plan_id, ip } => {
                    let mut dashboard = session(client, plan_id);
                    dashboard.add_whitelist_ip(&ip).await?.clone()
                }
                WhitelistCommand::Remove { plan_id, ip } => {
                    let mut dashboard = session(client, plan_id);
                    dashboard.remove_whitelist_ip(&ip).await?.clone()
                }
            };
            println!("Whitelisted IPs:");
            for ip in info.whitelist() {
                println!("  {}", ip);
            }
        }
    }

    Ok(())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}
