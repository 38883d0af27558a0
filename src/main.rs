use clap::{Parser, Subcommand};
use finplan::api::{
    BuyBorrowDieArgs, InvestmentArgs, RetirementArgs, buy_borrow_die_response,
    investment_response, retirement_response, run_http_server,
};
use finplan::core::CalcResult;
use serde::Serialize;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "finplan",
    about = "Savings, retirement and buy-borrow-die calculators with a JSON HTTP API"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the calculators over HTTP.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Solve one investment calculator mode and print the JSON result.
    Investment(InvestmentArgs),
    /// Plan a retirement nest egg and print the JSON result.
    Retirement(RetirementArgs),
    /// Compare buy-borrow-die against withdrawal strategies.
    BuyBorrowDie(BuyBorrowDieArgs),
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = run_http_server(port).await {
                error!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Investment(args) => print_json(investment_response(&args)),
        Command::Retirement(args) => print_json(retirement_response(&args)),
        Command::BuyBorrowDie(args) => print_json(buy_borrow_die_response(&args)),
    }
}

fn print_json<T: Serialize>(result: CalcResult<T>) {
    let rendered = result
        .map_err(|e| e.to_string())
        .and_then(|body| serde_json::to_string_pretty(&body).map_err(|e| e.to_string()));
    match rendered {
        Ok(json) => println!("{json}"),
        Err(msg) => {
            error!("{msg}");
            std::process::exit(1);
        }
    }
}
