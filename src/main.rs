//! askcache - cached question answering for the analysis gateway
//!
//! Runs an interactive chat over stdin by default. Repeated questions are
//! answered from an in-memory cache that lives as long as the process.

use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use askcache::cache::AnswerCache;
use askcache::cli::{Cli, Command, StartupConfig};
use askcache::logging::init_logging;
use askcache::remote::{validate_url_input, AnswerClient, ApiConfig, UrlSubmitter};
use askcache::session::{render_answer, Author, ChatSession, SessionAction, HELP_MESSAGE};

/// Reads lines from stdin and prints the transcript as it grows
async fn run_chat(api: &ApiConfig) -> std::io::Result<()> {
    let mut session = ChatSession::connect(api);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", HELP_MESSAGE);

    while let Some(line) = lines.next_line().await? {
        let before = session.messages().len();
        let action = session.handle_line(&line).await;

        for message in session.messages().iter().skip(before) {
            // The user already sees what they typed
            if message.author != Author::User {
                println!("{}", message);
            }
        }

        if action == SessionAction::Quit {
            break;
        }
    }

    Ok(())
}

/// Asks each question in turn through one cache
async fn run_ask(api: &ApiConfig, questions: &[String]) -> ExitCode {
    let cache = AnswerCache::new(AnswerClient::with_config(api.clone()));
    let mut failed = false;

    for question in questions {
        match cache.get_answer(question).await {
            Ok(outcome) if outcome.from_cache => {
                println!("(cached) {}", render_answer(&outcome.answer));
            }
            Ok(outcome) => println!("{}", render_answer(&outcome.answer)),
            Err(err) => {
                eprintln!("{}: {}", question, err);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Validates and submits a single URL
async fn run_submit(api: &ApiConfig, url: &str) -> ExitCode {
    if let Err(err) = validate_url_input(url) {
        eprintln!("Error: {}", err);
        return ExitCode::FAILURE;
    }

    match UrlSubmitter::with_config(api.clone()).submit_url(url.trim()).await {
        Ok(submission) => {
            println!("{}", submission.message);
            if let Some(data) = submission.data {
                println!("{}", data);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {}", err);
            return Ok(ExitCode::from(2));
        }
    };

    init_logging(&config.log_level);

    let code = match &config.command {
        Command::Chat => {
            run_chat(&config.api).await?;
            ExitCode::SUCCESS
        }
        Command::Ask { questions } => run_ask(&config.api, questions).await,
        Command::Submit { url } => run_submit(&config.api, url).await,
    };

    Ok(code)
}
