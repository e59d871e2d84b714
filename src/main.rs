//! `idp-gateway` server binary: load configuration, bind, and serve until Ctrl-C.

// crates.io
use color_eyre::Result;
use tokio::net::TcpListener;
// self
use idp_gateway::{api, config::GatewayConfig, gateway::Gateway};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	#[cfg(feature = "tracing")]
	idp_gateway::obs::init_tracing();

	let config = GatewayConfig::load()?;
	let gateway = Gateway::new(&config)?;
	let listener = TcpListener::bind(config.listen_addr).await?;

	api::serve(listener, gateway).await?;

	Ok(())
}
