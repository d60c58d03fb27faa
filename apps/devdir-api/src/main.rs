use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = devdir_api::Args::parse();

	devdir_api::run(args).await
}
