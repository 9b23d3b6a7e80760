use std::fmt;

use lms_core::model::{CourseId, ModuleId};

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register {
        username: String,
        password: String,
        confirm: String,
        email: Option<String>,
    },
    Login {
        username: String,
        password: String,
    },
    Logout,
    Whoami,
    Dashboard,
    Courses,
    Modules(CourseId),
    Open(CourseId, ModuleId),
    Complete(CourseId, ModuleId),
    Quiz(CourseId, ModuleId),
    /// Question number as typed, counted from 1.
    Answer {
        question: usize,
        option: String,
    },
    Submit,
    Time,
    Notes,
    Note {
        course: String,
        content: String,
    },
    Profile(Option<String>),
    AddCourse {
        name: String,
        description: String,
    },
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    Usage(&'static str),
    InvalidNumber { what: &'static str, raw: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::Unknown(word) => {
                write!(f, "unknown command: {word} (type `help` for a list)")
            }
            CommandError::Usage(usage) => write!(f, "usage: {usage}"),
            CommandError::InvalidNumber { what, raw } => write!(f, "invalid {what}: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

pub const HELP: &str = "\
Commands:
  register <username>|<password>|<confirm>[|<email>]
  login <username>|<password>
  logout
  whoami
  dashboard
  courses
  modules <course>
  open <course> <module>
  complete <course> <module>
  quiz <course> <module>
  answer <question> <option>
  submit
  time
  notes
  note <course name>|<content>
  profile [<email>]
  add-course <name>|<description>
  help
  quit";

/// Split `|`-separated text arguments, trimming each piece.
fn text_args(rest: &str) -> Vec<String> {
    if rest.trim().is_empty() {
        return Vec::new();
    }
    rest.split('|').map(|part| part.trim().to_string()).collect()
}

fn parse_num<T: std::str::FromStr>(what: &'static str, raw: &str) -> Result<T, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidNumber {
        what,
        raw: raw.to_string(),
    })
}

fn course_module(rest: &str, usage: &'static str) -> Result<(CourseId, ModuleId), CommandError> {
    let mut words = rest.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some(course), Some(module), None) => Ok((
            parse_num("course id", course)?,
            parse_num("module id", module)?,
        )),
        _ => Err(CommandError::Usage(usage)),
    }
}

impl Command {
    /// Parse a single input line.
    ///
    /// # Errors
    ///
    /// Returns `CommandError` for blank lines, unknown words, or missing and
    /// malformed arguments.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word {
            "" => Err(CommandError::Empty),
            "register" => match text_args(rest).as_slice() {
                [username, password, confirm] => Ok(Self::Register {
                    username: username.clone(),
                    password: password.clone(),
                    confirm: confirm.clone(),
                    email: None,
                }),
                [username, password, confirm, email] => Ok(Self::Register {
                    username: username.clone(),
                    password: password.clone(),
                    confirm: confirm.clone(),
                    email: Some(email.clone()),
                }),
                _ => Err(CommandError::Usage(
                    "register <username>|<password>|<confirm>[|<email>]",
                )),
            },
            "login" => match text_args(rest).as_slice() {
                [username, password] => Ok(Self::Login {
                    username: username.clone(),
                    password: password.clone(),
                }),
                _ => Err(CommandError::Usage("login <username>|<password>")),
            },
            "logout" => Ok(Self::Logout),
            "whoami" => Ok(Self::Whoami),
            "dashboard" => Ok(Self::Dashboard),
            "courses" => Ok(Self::Courses),
            "modules" => {
                if rest.is_empty() {
                    return Err(CommandError::Usage("modules <course>"));
                }
                Ok(Self::Modules(parse_num("course id", rest)?))
            }
            "open" => {
                let (course, module) = course_module(rest, "open <course> <module>")?;
                Ok(Self::Open(course, module))
            }
            "complete" => {
                let (course, module) = course_module(rest, "complete <course> <module>")?;
                Ok(Self::Complete(course, module))
            }
            "quiz" => {
                let (course, module) = course_module(rest, "quiz <course> <module>")?;
                Ok(Self::Quiz(course, module))
            }
            "answer" => {
                let usage = "answer <question> <option>";
                let (number, option) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage(usage))?;
                let question: usize = parse_num("question number", number)?;
                if question == 0 {
                    return Err(CommandError::InvalidNumber {
                        what: "question number",
                        raw: number.to_string(),
                    });
                }
                Ok(Self::Answer {
                    question,
                    option: option.trim().to_string(),
                })
            }
            "submit" => Ok(Self::Submit),
            "time" => Ok(Self::Time),
            "notes" => Ok(Self::Notes),
            "note" => match rest.split_once('|') {
                Some((course, content)) => Ok(Self::Note {
                    course: course.trim().to_string(),
                    content: content.trim().to_string(),
                }),
                None => Err(CommandError::Usage("note <course name>|<content>")),
            },
            "profile" => Ok(Self::Profile(
                Some(rest.to_string()).filter(|email| !email.is_empty()),
            )),
            "add-course" => match rest.split_once('|') {
                Some((name, description)) => Ok(Self::AddCourse {
                    name: name.trim().to_string(),
                    description: description.trim().to_string(),
                }),
                None => Err(CommandError::Usage("add-course <name>|<description>")),
            },
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
