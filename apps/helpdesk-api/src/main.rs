use clap::Parser;

use helpdesk_api::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	helpdesk_api::run(args).await
}
