//! Server startup: tracing configuration and the stdio serve loop.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for an MCP server.
///
/// Logs go to stderr because stdout carries the MCP protocol. The default
/// level is `info` for the given crate; `RUST_LOG` overrides it. Setting
/// `LOG_FORMAT=json` switches to structured JSON output.
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let directive = format!("{}=info", crate_name);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }

    Ok(())
}

/// Expands to a complete `main` for a stdio MCP server: tracing init,
/// server construction via `new()`, stdio transport, graceful shutdown.
///
/// ```rust,ignore
/// mcp_common::serve_stdio!(MyMcpServer, "my_mcp");
/// ```
#[macro_export]
macro_rules! serve_stdio {
    ($server_type:ty, $crate_name:expr) => {
        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            use rmcp::ServiceExt;

            $crate::init_tracing($crate_name)?;

            tracing::info!(concat!("Starting ", $crate_name, " MCP server"));

            let server = <$server_type>::new()?;
            let service = server.serve(rmcp::transport::stdio()).await?;

            tracing::info!("Server running, waiting for requests");

            service.waiting().await?;

            tracing::info!("Server shutting down");
            Ok(())
        }
    };
}
