use argh::FromArgs;
use reqwest::multipart::{Form, Part};
use std::path::PathBuf;

// defaults for the client
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 3000;

#[derive(FromArgs)]
/// kornia-vqa client for asking questions about images
struct ClientArgs {
    /// the host to connect to
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to connect to
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// command to execute: "ask" or "status"
    #[argh(subcommand)]
    command: ClientCommands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum ClientCommands {
    Ask(AskCommand),
    Status(StatusCommand),
}

#[derive(FromArgs)]
/// Upload an image and ask a question about it
#[argh(subcommand, name = "ask")]
struct AskCommand {
    /// the path to the image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// the question to ask
    #[argh(option, short = 'q')]
    question: String,
}

#[derive(FromArgs)]
/// Check the engine status
#[argh(subcommand, name = "status")]
struct StatusCommand {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: ClientArgs = argh::from_env();

    let client = reqwest::Client::new();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    let response = match args.command {
        ClientCommands::Ask(ask) => {
            let file_name = ask
                .image_path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("image")
                .to_string();
            let bytes = tokio::fs::read(&ask.image_path).await?;

            let form = Form::new()
                .part("image", Part::bytes(bytes).file_name(file_name))
                .text("question", ask.question);

            client
                .post(format!("http://{}/vqa/", addr))
                .multipart(form)
                .send()
                .await?
        }
        ClientCommands::Status(_) => {
            client
                .get(format!("http://{}/status", addr))
                .send()
                .await?
        }
    };

    let status = response.status();
    let result = response.json::<serde_json::Value>().await?;
    println!("{}: {}", status, serde_json::to_string_pretty(&result)?);

    Ok(())
}
