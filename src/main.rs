use clap::Parser;

/// Bizdash - insight service for the local business dashboard
#[derive(Parser, Debug)]
#[command(name = "bizdash")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to bind the service to
    #[arg(long, env = "PORT", default_value = "3001")]
    port: u16,

    /// Address to bind the service to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Deployment environment; "production" switches CORS to permissive
    #[arg(long, env = "APP_ENV", default_value = "development")]
    environment: String,

    /// Allowed CORS origin (repeatable); defaults to the local dev frontend
    #[arg(long = "cors-origin")]
    cors_origins: Vec<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

    rt.block_on(async {
        let state = bizdash::server::ServerAppState::new(cli.environment.clone());

        if let Err(e) = bizdash::shutdown::register_signal_handlers(state.shutdown_state.clone()) {
            log::warn!("Failed to register signal handlers: {}", e);
        }

        let cors_origins = if cli.environment == "production" {
            // Deployed behind a known frontend; allow any origin
            None
        } else if cli.cors_origins.is_empty() {
            Some(vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ])
        } else {
            Some(cli.cors_origins.clone())
        };

        if let Err(e) = bizdash::server::run_server(cli.port, &cli.bind, state, cors_origins).await
        {
            log::error!("Server failed: {}", e);
            std::process::exit(1);
        }
    });
}
