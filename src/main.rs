//! `kalshi`: command-line access to the Kalshi trade API.
//!
//! Public market data works without credentials. Portfolio commands need an
//! API key id and RSA private key, from flags, the environment
//! (`KALSHI_API_KEY`, `KALSHI_PRIVATE_KEY`), `.env`, or `kalshi.toml`.

mod config;
mod render;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing::{error, info};

use common::{Action, Error, OrderRequest, OrderType, Side};
use kalshi_client::KalshiRestClient;

use crate::config::ConfigFlags;

/// Kalshi trade API client
#[derive(Parser)]
#[command(name = "kalshi", about = "Kalshi trade API client")]
struct Cli {
    /// Use the demo environment.
    #[arg(long, global = true)]
    demo: bool,

    /// Override the REST base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// API key id (falls back to KALSHI_API_KEY).
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Path to the PEM private key (falls back to KALSHI_PRIVATE_KEY).
    #[arg(long, global = true)]
    private_key_file: Option<PathBuf>,

    /// Config file (default: ./kalshi.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print raw JSON for every command.
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List markets
    Markets {
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value = "open")]
        status: String,
        #[arg(long)]
        cursor: Option<String>,
        #[arg(long)]
        event_ticker: Option<String>,
    },
    /// Get market details
    Market { ticker: String },
    /// Get orderbook
    Orderbook {
        ticker: String,
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Recent trades for a market
    Trades {
        ticker: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        cursor: Option<String>,
    },
    /// List events
    Events {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        cursor: Option<String>,
    },
    /// Get event details
    Event { event_ticker: String },
    /// Get account balance (requires auth)
    Balance,
    /// Get positions (requires auth)
    Positions {
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        settlement_status: Option<String>,
    },
    /// List orders (requires auth)
    Orders {
        #[arg(long)]
        ticker: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Place an order (requires auth)
    Order {
        ticker: String,
        #[arg(long)]
        side: Side,
        #[arg(long)]
        action: Action,
        #[arg(long)]
        count: u32,
        /// Limit price in cents (1-99); ignored for market orders.
        #[arg(long, default_value_t = 0)]
        price: u32,
        #[arg(long = "type", default_value = "limit")]
        order_type: OrderType,
        #[arg(long)]
        client_order_id: Option<String>,
    },
    /// Cancel an order (requires auth)
    Cancel { order_id: String },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "kalshi=debug,kalshi_client=debug"
    } else {
        "kalshi=warn,kalshi_client=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

async fn run(cli: Cli, command: Command) -> Result<String, Error> {
    let flags = ConfigFlags {
        api_key: cli.api_key,
        private_key_file: cli.private_key_file,
        base_url: cli.base_url,
        demo: cli.demo,
        config_file: cli.config,
    };
    let cfg = config::load_config(&flags)?;
    info!("Using {} (authenticated={})", cfg.base_url, cfg.has_credentials());

    let client = KalshiRestClient::new(&cfg)?;
    let as_json = cli.json;

    let output = match command {
        Command::Markets {
            limit,
            status,
            cursor,
            event_ticker,
        } => {
            let markets = client
                .get_markets(
                    Some(limit),
                    Some(status.as_str()),
                    cursor.as_deref(),
                    event_ticker.as_deref(),
                )
                .await?;
            if as_json {
                render::json(&markets)
            } else {
                render::markets(&markets)
            }
        }
        Command::Market { ticker } => render::json(&client.get_market(&ticker).await?),
        Command::Orderbook { ticker, depth } => {
            render::json(&client.get_orderbook(&ticker, depth).await?)
        }
        Command::Trades {
            ticker,
            limit,
            cursor,
        } => render::json(&client.get_trades(&ticker, limit, cursor.as_deref()).await?),
        Command::Events {
            limit,
            status,
            cursor,
        } => render::json(
            &client
                .get_events(limit, status.as_deref(), cursor.as_deref())
                .await?,
        ),
        Command::Event { event_ticker } => render::json(&client.get_event(&event_ticker).await?),
        Command::Balance => {
            let balance = client.get_balance().await?;
            if as_json {
                render::json(&balance)
            } else {
                render::balance(&balance)
            }
        }
        Command::Positions {
            ticker,
            settlement_status,
        } => {
            let positions = client
                .get_positions(ticker.as_deref(), settlement_status.as_deref())
                .await?;
            if as_json {
                render::json(&positions)
            } else {
                render::positions(&positions)
            }
        }
        Command::Orders { ticker, status } => render::json(
            &client
                .get_orders(ticker.as_deref(), status.as_deref())
                .await?,
        ),
        Command::Order {
            ticker,
            side,
            action,
            count,
            price,
            order_type,
            client_order_id,
        } => {
            let order = OrderRequest {
                ticker,
                side,
                action,
                count,
                price,
                order_type,
                client_order_id,
            };
            render::json(&client.create_order(&order).await?)
        }
        Command::Cancel { order_id } => render::json(&client.cancel_order(&order_id).await?),
    };

    Ok(output)
}

#[tokio::main]
async fn main() {
    let mut cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command.take() else {
        if let Err(e) = Cli::command().print_help() {
            error!("Failed to print help: {}", e);
        }
        println!();
        return;
    };

    match run(cli, command).await {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["kalshi"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_markets_defaults() {
        let cli = Cli::try_parse_from(["kalshi", "markets"]).unwrap();
        match cli.command {
            Some(Command::Markets {
                limit,
                status,
                cursor,
                event_ticker,
            }) => {
                assert_eq!(limit, 10);
                assert_eq!(status, "open");
                assert!(cursor.is_none());
                assert!(event_ticker.is_none());
            }
            _ => panic!("expected markets"),
        }
    }

    #[test]
    fn test_order_parsing() {
        let cli = Cli::try_parse_from([
            "kalshi", "--demo", "order", "X", "--side", "no", "--action", "buy", "--count", "5",
            "--price", "42",
        ])
        .unwrap();
        assert!(cli.demo);
        match cli.command {
            Some(Command::Order {
                side,
                action,
                order_type,
                price,
                ..
            }) => {
                assert_eq!(side, Side::No);
                assert_eq!(action, Action::Buy);
                assert_eq!(order_type, OrderType::Limit);
                assert_eq!(price, 42);
            }
            _ => panic!("expected order"),
        }
    }

    #[test]
    fn test_bad_side_rejected() {
        assert!(Cli::try_parse_from([
            "kalshi", "order", "X", "--side", "maybe", "--action", "buy", "--count", "1",
        ])
        .is_err());
    }
}
