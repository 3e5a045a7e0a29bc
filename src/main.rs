mod api;
mod config;
mod error;
mod page;
mod paginate;
mod post;
mod prismic;
mod reader;
mod render;

#[cfg(test)]
mod test;

use std::error::Error;

use api::prismic::PrismicClient;
use config::{Command, Config};
use log::info;
use page::PageStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::parse();
    config.init_logger();

    let client = PrismicClient::new(&config.cms())?;
    let store = PageStore::new(config.output());

    match config.command() {
        Command::Build => {
            info!("# Space Traveling #");
            info!("Output: {}", config.output().display());
            page::build_site(&client, &store).await?;
            info!("All done!");
        }
        Command::List => reader::list(&config, &client, &store).await?,
        Command::Post { uid } => reader::post(&client, &store, uid).await?,
    }

    Ok(())
}
