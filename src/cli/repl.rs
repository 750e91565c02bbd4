/// One line typed at the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    /// `/scenario NAME`
    Scenario(&'a str),
    /// `/describe TEXT`
    Describe(&'a str),
    Scenarios,
    Current,
    Count,
    Help,
    /// A known command typed without its required argument; carries the usage line
    Usage(&'static str),
    /// Anything else is a path to browse
    Navigate(&'a str),
}

pub const SCENARIO_USAGE: &str = "/scenario NAME  - Switch scenario (clears session history)";
pub const DESCRIBE_USAGE: &str = "/describe TEXT  - Switch to a free-text scenario";

impl<'a> ReplCommand<'a> {
    /// Parse a trimmed, non-empty input line
    pub fn parse(input: &'a str) -> Self {
        let (command, argument) = match input.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (input, ""),
        };

        match (command, argument) {
            ("/scenario", "") => Self::Usage(SCENARIO_USAGE),
            ("/scenario", name) => Self::Scenario(name),
            ("/describe", "") => Self::Usage(DESCRIBE_USAGE),
            ("/describe", text) => Self::Describe(text),
            ("/scenarios", "") => Self::Scenarios,
            ("/current", "") => Self::Current,
            ("/count", "") => Self::Count,
            ("/help", "") => Self::Help,
            _ => Self::Navigate(input),
        }
    }
}
