#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,            // /help
    Stop,            // /stop
    Quit,            // /quit or /exit
    Unknown(String),
}

pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with('/')
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();
    let verb = trimmed.split_whitespace().next().unwrap_or_default();

    match verb {
        "/help" | "/?" => Command::Help,
        "/stop" => Command::Stop,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}
