use std::path::PathBuf;

use clap::Subcommand;
use mindfocus_core::ApiError;

use super::common::{backend_client, open_context, runtime, CliError};

#[derive(Subcommand)]
pub enum QuizAction {
    /// Upload study material and print generated questions
    Generate {
        /// File to upload (PDF or text)
        file: PathBuf,
        /// Number of questions
        #[arg(long, default_value = "5")]
        num: u32,
        #[arg(long, default_value = "general")]
        subject: String,
        #[arg(long, default_value = "")]
        title: String,
        /// Comma-separated topic hints
        #[arg(long, default_value = "")]
        topics: String,
    },
    /// Submit answers with the stress readings taken while answering
    Submit {
        /// Comma-separated 1/0 flags, one per question (1 = correct)
        #[arg(long)]
        answers: String,
        /// Comma-separated stress scores
        #[arg(long, default_value = "")]
        stress: String,
    },
}

pub fn run(action: QuizAction) -> Result<(), CliError> {
    let ctx = open_context()?;
    let client = backend_client(&ctx);
    let rt = runtime()?;

    match action {
        QuizAction::Generate {
            file,
            num,
            subject,
            title,
            topics,
        } => {
            let bytes = std::fs::read(&file)?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload".to_string());
            let result = rt.block_on(client.generate_quiz(
                &name, bytes, num, &subject, &title, &topics,
            ));
            match result {
                Ok(questions) => {
                    println!("{}", serde_json::to_string_pretty(&questions)?);
                }
                Err(ApiError::NoQuestions) => {
                    println!("no questions generated - try a richer document");
                }
                Err(e) => return Err(e.into()),
            }
        }
        QuizAction::Submit { answers, stress } => {
            let answers = parse_answers(&answers)?;
            let stress = parse_scores(&stress)?;
            let result = rt.block_on(client.submit_quiz(&answers, &stress))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

fn parse_answers(s: &str) -> Result<Vec<bool>, CliError> {
    s.split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|p| match p.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            other => Err(format!("cannot parse answer flag: {other}").into()),
        })
        .collect()
}

fn parse_scores(s: &str) -> Result<Vec<f64>, CliError> {
    s.split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .map_err(|_| format!("cannot parse stress score: {p}").into())
        })
        .collect()
}
