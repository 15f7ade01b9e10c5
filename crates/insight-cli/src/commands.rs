//! REPL command parsing

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Missing stock code for /select")]
    MissingCode,

    #[error("Unknown command: /{0} (try /help)")]
    Unknown(String),
}

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List records, optionally filtered
    List { query: String },
    /// Show a record in the panel
    Select { code: String },
    /// Enter the API key without echo
    Key,
    /// Forget the API key
    ForgetKey,
    /// Start the analysis of the shown record
    Analyze,
    /// Re-render the panel
    Show,
    /// Hide the panel
    Close,
    Help,
    Exit,
}

impl Command {
    /// Parse a line of input
    ///
    /// A bare stock code without a leading slash selects that record.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(CommandError::Empty);
        }

        let Some(rest) = input.strip_prefix('/') else {
            return Ok(Command::Select {
                code: input.to_string(),
            });
        };

        let mut parts = rest.split_whitespace();
        let cmd = parts.next().ok_or(CommandError::Empty)?.to_lowercase();
        let args: Vec<&str> = parts.collect();

        match cmd.as_str() {
            "list" | "ls" | "l" | "목록" => Ok(Command::List {
                query: args.join(" "),
            }),
            "select" | "s" | "선택" => {
                let code = args.first().ok_or(CommandError::MissingCode)?;
                Ok(Command::Select {
                    code: (*code).to_string(),
                })
            }
            "key" | "k" | "키" => Ok(Command::Key),
            "forget" | "forget-key" => Ok(Command::ForgetKey),
            "analyze" | "a" | "분석" => Ok(Command::Analyze),
            "show" | "view" => Ok(Command::Show),
            "close" | "c" | "닫기" => Ok(Command::Close),
            "help" | "h" | "?" | "도움말" => Ok(Command::Help),
            "exit" | "quit" | "q" | "종료" => Ok(Command::Exit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    pub fn help() -> &'static str {
        "Commands:\n\
        /list [query]   - List companies (name or code filter)\n\
        /select <code>  - Show a company (or type the code directly)\n\
        /key            - Enter the Gemini API key (hidden, memory only)\n\
        /forget         - Forget the API key\n\
        /analyze        - Run the Gemini business analysis\n\
        /show           - Show the panel again\n\
        /close          - Close the panel\n\
        /help           - Show help\n\
        /exit           - Exit"
    }
}
