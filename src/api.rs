//! HTTP surface: the axum router, body decoding, and the response envelope.
//!
//! Every response, including method and path fallbacks, is an [`Envelope`]. Flow errors
//! choose their status code through [`Failure`].

pub mod envelope;
pub mod failure;
pub mod handlers;

pub use envelope::*;
pub use failure::*;

// crates.io
use axum::{Router, routing::post};
use tokio::net::TcpListener;
// self
use crate::{_prelude::*, gateway::Gateway};

/// Builds the gateway router over a shared [`Gateway`].
pub fn router(gateway: Arc<Gateway>) -> Router {
	Router::new()
		.route("/register", post(handlers::register).fallback(handlers::method_not_allowed))
		.route("/login", post(handlers::login).fallback(handlers::method_not_allowed))
		.route("/refresh", post(handlers::refresh).fallback(handlers::method_not_allowed))
		.fallback(handlers::not_found)
		.with_state(gateway)
}

/// Serves the gateway on `listener` until Ctrl-C, then drains in-flight requests.
pub async fn serve(listener: TcpListener, gateway: Gateway) -> std::io::Result<()> {
	#[cfg(feature = "tracing")]
	{
		let addr = listener.local_addr()?;

		tracing::info!(%addr, "Gateway listening.");
	}

	axum::serve(listener, router(Arc::new(gateway)))
		.with_graceful_shutdown(shutdown_signal())
		.await
}

async fn shutdown_signal() {
	// Without a signal handler the server simply runs until killed.
	if tokio::signal::ctrl_c().await.is_err() {
		std::future::pending::<()>().await;
	}

	#[cfg(feature = "tracing")]
	tracing::info!("Shutdown signal received.");
}
