use clap::{Parser, Subcommand};

mod reader;
mod send;

#[tokio::main]
pub async fn main() {
    env_logger::init();

    if let Err(e) = Cli::parse().run().await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}

#[derive(Debug, Parser)]
#[command(name = "sqsw")]
#[command(about = "write newline-delimited messages to an aws sqs queue in batches", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    aws: send::AwsArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Read messages from a file or stdin and send them to a queue
    Send(send::SendArgs),
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Send(args) => args.run(&self.aws).await,
        }
    }
}
