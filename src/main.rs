mod config;
mod data_receiver;
mod data_sender;
mod data_types;
mod error;
mod store;
mod web_server;

#[cfg(test)]
mod test_support;

use clap::Parser;
use config::{Args, Config};
use data_receiver::DataReceiver;
use data_sender::DataSender;
use store::Store;
use web_server::WebServer;

#[tokio::main]
async fn main() -> error::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from(Args::parse());
    config.prepare()?;

    // Create UDP collector
    let receiver = DataReceiver::new(config.udp_addr, Store::new(config.store_path())).await?;

    // Create web server; it forwards submissions to the collector
    let sender = DataSender::new(config.udp_addr).await?;
    let server = WebServer::new(config, sender);

    log::info!("The server has been successfully started!");

    tokio::select! {
        receiver_result = receiver.start() => {
            if let Err(e) = receiver_result {
                log::error!("UDP collector error: {}", e);
            }
        }
        server_result = server.start() => {
            if let Err(e) = server_result {
                log::error!("Web server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            log::info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}
