use std::fmt;

/// One line of terminal input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pick an option, by its 1-based position or by its id.
    Choose(Choice),
    Next,
    Previous,
    /// Jump to a question by its 1-based number.
    GoTo(usize),
    Submit,
    Retry,
    /// Discard the session and fetch a new question set for a topic.
    Topic(String),
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Position(usize),
    Id(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Empty,
    MissingValue { command: &'static str },
    InvalidNumber { raw: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Empty => write!(f, "type a command, or `h` for help"),
            InputError::MissingValue { command } => write!(f, "{command} requires a value"),
            InputError::InvalidNumber { raw } => write!(f, "not a question number: {raw}"),
        }
    }
}

impl std::error::Error for InputError {}

pub const HELP: &str = "\
Commands:
  <n> | <id>      choose option n (1-based) or the option with that id
  o <id>          choose by id; needed when the id is a command letter
  n, next         next question
  p, prev         previous question
  g <n>           go to question n
  s, submit       submit answers
  r, retry        start another attempt with the same questions
  t <topic>       start over with a new topic
  v, view         show the current question again
  h, help         this help
  q, quit         exit";

impl Command {
    /// Interpret a line of input.
    ///
    /// # Errors
    ///
    /// Returns `InputError` for blank lines and malformed arguments.
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head.to_ascii_lowercase().as_str() {
            "" => Err(InputError::Empty),
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" | "previous" => Ok(Self::Previous),
            "s" | "submit" => Ok(Self::Submit),
            "r" | "retry" => Ok(Self::Retry),
            "v" | "view" => Ok(Self::Show),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            "g" | "goto" => {
                if rest.is_empty() {
                    return Err(InputError::MissingValue { command: "g" });
                }
                match rest.parse::<usize>() {
                    Ok(number) if number > 0 => Ok(Self::GoTo(number)),
                    _ => Err(InputError::InvalidNumber { raw: rest.into() }),
                }
            }
            "o" | "option" if !rest.is_empty() => Ok(Self::Choose(Choice::Id(rest.into()))),
            "t" | "topic" => {
                if rest.is_empty() {
                    Err(InputError::MissingValue { command: "t" })
                } else {
                    Ok(Self::Topic(rest.into()))
                }
            }
            _ => Ok(Self::Choose(Choice::parse(line))),
        }
    }
}

impl Choice {
    fn parse(raw: &str) -> Self {
        match raw.parse::<usize>() {
            Ok(position) if position > 0 => Self::Position(position),
            _ => Self::Id(raw.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation_words() {
        assert_eq!(Command::parse("n"), Ok(Command::Next));
        assert_eq!(Command::parse("  Prev "), Ok(Command::Previous));
        assert_eq!(Command::parse("submit"), Ok(Command::Submit));
        assert_eq!(Command::parse("r"), Ok(Command::Retry));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn numbers_choose_by_position() {
        assert_eq!(
            Command::parse("2"),
            Ok(Command::Choose(Choice::Position(2)))
        );
    }

    #[test]
    fn other_words_choose_by_id() {
        assert_eq!(
            Command::parse("c"),
            Ok(Command::Choose(Choice::Id("c".into())))
        );
        assert_eq!(
            Command::parse("0"),
            Ok(Command::Choose(Choice::Id("0".into())))
        );
    }

    #[test]
    fn option_prefix_reaches_ids_shadowed_by_commands() {
        assert_eq!(
            Command::parse("o n"),
            Ok(Command::Choose(Choice::Id("n".into())))
        );
        assert_eq!(
            Command::parse("option 2"),
            Ok(Command::Choose(Choice::Id("2".into())))
        );
        assert_eq!(
            Command::parse("o"),
            Ok(Command::Choose(Choice::Id("o".into())))
        );
    }

    #[test]
    fn goto_needs_a_positive_number() {
        assert_eq!(Command::parse("g 3"), Ok(Command::GoTo(3)));
        assert_eq!(
            Command::parse("g"),
            Err(InputError::MissingValue { command: "g" })
        );
        assert_eq!(
            Command::parse("g zero"),
            Err(InputError::InvalidNumber { raw: "zero".into() })
        );
        assert_eq!(
            Command::parse("g 0"),
            Err(InputError::InvalidNumber { raw: "0".into() })
        );
    }

    #[test]
    fn topic_keeps_the_rest_of_the_line() {
        assert_eq!(
            Command::parse("t  Wave Interference "),
            Ok(Command::Topic("Wave Interference".into()))
        );
    }

    #[test]
    fn blank_line_is_an_error() {
        assert_eq!(Command::parse("   "), Err(InputError::Empty));
    }
}
