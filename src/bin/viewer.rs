use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ribbit::client::ContentClient;
use ribbit::models::{Image, Message};
use ribbit::selector::{reveal_delay, Pair, Presenter};

const DEFAULT_URL: &str = "http://127.0.0.1:5000";

struct Pools {
    images: Option<Vec<Image>>,
    messages: Vec<Message>,
}

async fn load_pools(client: &ContentClient) -> Pools {
    let images = match client.fetch_all_images().await {
        Ok(images) => Some(images),
        Err(e) => {
            tracing::warn!("Failed to load images: {}", e);
            None
        }
    };
    let messages = client.fetch_messages().await.unwrap_or_else(|e| {
        tracing::warn!("Failed to load messages: {}", e);
        Vec::new()
    });

    Pools { images, messages }
}

fn print_pair(pair: Option<&Pair>) {
    match pair {
        Some(pair) => {
            match &pair.image {
                Some(image) => println!("[{}] {} ({} bytes)", image.id, image.filename, image.decoded_len()),
                None => println!("[no photo yet]"),
            }
            println!("  {}", pair.message.text);
        }
        None => println!("Nothing to show yet. Add a message first."),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ribbit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url = std::env::var("RIBBIT_VIEWER_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let client = ContentClient::new(&base_url);
    let mut presenter = Presenter::new(StdRng::from_entropy());
    let mut pools = load_pools(&client).await;

    println!("Connected to {}. Enter: show a pair, r: reload, q: quit", base_url);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "q" => break,
            "r" => {
                pools = load_pools(&client).await;
                println!(
                    "Reloaded: {} images, {} messages",
                    pools.images.as_ref().map_or(0, Vec::len),
                    pools.messages.len()
                );
            }
            _ => {
                let images = pools.images.as_deref();
                println!("Loading for {:?}...", reveal_delay(images.is_some()));
                let pair = if presenter.is_visible() {
                    presenter.show_another(images, &pools.messages).await
                } else {
                    presenter.generate(images, &pools.messages).await
                };
                print_pair(pair);
            }
        }
    }

    Ok(())
}
