use basket_recs::{config::Config, services::run_all};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only carries reports
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("basket_recs=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let source = config.data_source()?;
    let params = config.run_parameters()?;

    let reports = run_all(&source, &params).await?;
    for report in &reports {
        println!("\n{}", report.render(config.output_format)?);
    }

    Ok(())
}
