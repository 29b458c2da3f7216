use clap::Parser;

use meridian_catalogd::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	meridian_catalogd::run(Args::parse()).await?;

	Ok(())
}
