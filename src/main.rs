use anyhow::{Result, bail};
use askclient::{Config, RequestClient, runtime::RealRuntime};
use clap::Parser;

/// askclient - ask questions to an answer-generation service
///
/// Configuration is read from ASK_API_BASE_URL, ASK_API_KEY, ASK_API_KEY_HEADER,
/// ASK_MAX_RETRIES, ASK_RETRY_DELAY_MS and ASK_MAX_QUESTION_LENGTH.
///
/// Examples:
///   askclient ask "What are the visiting hours?"
///   askclient health
#[derive(Parser, Debug)]
#[command(author, version = env!("ASKCLIENT_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Service root URL (also via ASK_API_BASE_URL)
    #[arg(
        long = "base-url",
        env = "ASK_API_BASE_URL",
        value_name = "URL",
        global = true
    )]
    pub base_url: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Ask a question through the generation endpoint
    Ask(QuestionArgs),

    /// Ask a question through the chat endpoint
    Chat(QuestionArgs),

    /// Check whether the service is reachable
    Health,
}

#[derive(clap::Args, Debug)]
pub struct QuestionArgs {
    /// The question to send
    #[arg(value_name = "QUESTION")]
    pub question: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = Config::load(&RealRuntime)?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(base_url);
    }
    let max_len = config.max_question_length;
    let client = RequestClient::from_config(config)?;

    match cli.command {
        Commands::Ask(args) => {
            let question = validate_question(&args.question, max_len)?;
            println!("{}", client.ask(question).await?);
        }
        Commands::Chat(args) => {
            let question = validate_question(&args.question, max_len)?;
            println!("{}", client.chat(question).await?);
        }
        Commands::Health => {
            if !client.check_health().await {
                bail!("Service at {} is not reachable", client.config().base_url);
            }
            println!("healthy");
        }
    }
    Ok(())
}

/// Trims the question and applies the advisory length limit.
fn validate_question(question: &str, max_len: usize) -> Result<&str> {
    let question = question.trim();
    if question.is_empty() {
        bail!("Question cannot be empty");
    }
    let len = question.chars().count();
    if len > max_len {
        bail!(
            "Question is too long ({} characters, maximum {})",
            len,
            max_len
        );
    }
    Ok(question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn test_cli_ask_parsing() {
        let cli = Cli::try_parse_from(["askclient", "ask", "Where is the clinic?"]).unwrap();
        match cli.command {
            Commands::Ask(args) => assert_eq!(args.question, "Where is the clinic?"),
            _ => panic!("Expected Ask command"),
        }
        assert_eq!(cli.base_url, None);
    }

    #[test]
    fn test_cli_chat_parsing() {
        let cli = Cli::try_parse_from(["askclient", "chat", "hello"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat(_)));
    }

    #[test]
    fn test_cli_global_base_url_parsing() {
        let cli =
            Cli::try_parse_from(["askclient", "--base-url", "http://qa:9000", "health"]).unwrap();
        assert!(matches!(cli.command, Commands::Health));
        assert_eq!(cli.base_url.as_deref(), Some("http://qa:9000"));

        let cli =
            Cli::try_parse_from(["askclient", "health", "--base-url", "http://qa:9000"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://qa:9000"));
    }

    #[test]
    fn test_cli_base_url_bound_to_env() {
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "base_url")
            .unwrap();
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new("ASK_API_BASE_URL")));
    }

    #[test]
    fn test_cli_ask_requires_question() {
        assert!(Cli::try_parse_from(["askclient", "ask"]).is_err());
    }

    #[test]
    fn test_cli_no_subcommand_fails() {
        assert!(Cli::try_parse_from(["askclient"]).is_err());
    }

    #[test]
    fn test_validate_question_trims() {
        assert_eq!(validate_question("  hi there \n", 500).unwrap(), "hi there");
    }

    #[test]
    fn test_validate_question_rejects_empty() {
        assert!(validate_question("   ", 500).is_err());
    }

    #[test]
    fn test_validate_question_counts_characters() {
        assert!(validate_question("ééééé", 5).is_ok());

        let err = validate_question("abcdef", 5).unwrap_err();
        assert!(err.to_string().contains("maximum 5"));
    }
}
