use clap::Parser;

use helpdesk_worker::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = Args::parse();

	helpdesk_worker::run(args).await
}
