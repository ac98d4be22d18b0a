use chirp::{init_tracing, run_app, Config};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {:#}", error);
            std::process::exit(1);
        }
    };
    init_tracing(&config);
    match run_app(config).await {
        Ok(_) => (),
        Err(error) => {
            tracing::error!("Error: {:#}", error);
            std::process::exit(1);
        }
    }
}
