use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = itinera::Args::parse();

	itinera::run(args).await
}
