use clap::Subcommand;
use mindfocus_core::ChatTurn;

use super::common::{backend_client, open_context, runtime, CliError};

#[derive(Subcommand)]
pub enum TutorAction {
    /// Send one message to the tutor
    Chat {
        /// The message
        message: String,
        /// Stress level to report (low, medium, high)
        #[arg(long, default_value = "low")]
        stress_level: String,
        /// Prior conversation as a JSON array of {role, content} turns
        #[arg(long)]
        history: Option<String>,
    },
}

pub fn run(action: TutorAction) -> Result<(), CliError> {
    let ctx = open_context()?;
    let client = backend_client(&ctx);
    let rt = runtime()?;

    match action {
        TutorAction::Chat {
            message,
            stress_level,
            history,
        } => {
            let history: Vec<ChatTurn> = match history {
                Some(raw) => serde_json::from_str(&raw)?,
                None => Vec::new(),
            };
            let reply = rt.block_on(client.tutor_chat(&message, &stress_level, &history))?;
            println!("{reply}");
        }
    }
    Ok(())
}
