use animatix_client::{
    api::{ContactApi, RestContactApi},
    ContactFields,
};
use anyhow::ensure;
use clap::Subcommand;
use url::Url;

#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Submit a contact message through a running relay
    Send {
        /// Origin the relay is served under, e.g. https://animatix.studio/
        #[arg(long)]
        url: Url,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
}

impl ContactCommand {
    pub async fn invoke(self) -> anyhow::Result<()> {
        match self {
            ContactCommand::Send {
                url,
                name,
                email,
                message,
            } => {
                send(
                    url,
                    ContactFields {
                        name,
                        email,
                        message,
                    },
                )
                .await
            }
        }
    }
}

async fn send(url: Url, fields: ContactFields) -> anyhow::Result<()> {
    let api = RestContactApi::new(&url)?;
    let result = api.submit(fields).await?;

    ensure!(result.success, "Relay rejected the submission: {}", result.message);
    println!("{}", result.message);

    Ok(())
}
