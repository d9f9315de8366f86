use clap::Parser;
use codlayout_cli::{run, Cli, Config};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // RUST_LOG wins over CODLAYOUT_LOG; logs go to stderr to keep stdout clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = run(cli, &config)?;
    println!("{}", output.text);

    if !output.success {
        std::process::exit(1);
    }
    Ok(())
}
