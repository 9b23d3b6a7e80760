//! Line-oriented front end over [`AppServices`].

use std::fmt::Write as _;
use std::io::{self, Write};
use std::time::Duration;

use lms_core::model::{CourseId, ModuleId};
use services::{AppServices, FinishReason, QuizError, QuizOutcome, Registration, SessionError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::command::{Command, HELP};

const PREVIEW_CHARS: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

enum Event {
    Line(Option<String>),
    Expired(QuizOutcome),
}

/// Remaining time as `MM:SS`, rounding partial seconds up.
#[must_use]
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn describe_outcome(outcome: &QuizOutcome) -> String {
    let mut line = match outcome.reason {
        FinishReason::Submitted => format!("Quiz submitted. Score: {}", outcome.score),
        FinishReason::Expired => format!("Time is up! Score: {}", outcome.score),
    };
    if outcome.score.is_perfect() {
        line.push_str(" Perfect score!");
    }
    line
}

pub struct Repl {
    app: AppServices,
}

impl Repl {
    #[must_use]
    pub fn new(app: AppServices) -> Self {
        Self { app }
    }

    #[cfg(test)]
    fn app(&self) -> &AppServices {
        &self.app
    }

    /// Read commands until `quit` or end of input.
    ///
    /// A quiz that runs out of time while waiting for input is scored and
    /// reported right away.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if reading input or writing output fails.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        writeln!(out, "Learning portal. Type `help` for commands.")?;
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let event = tokio::select! {
                line = lines.next_line() => Event::Line(line?),
                outcome = self.app.quiz_expired() => Event::Expired(outcome),
            };

            match event {
                Event::Line(None) => break,
                Event::Line(Some(line)) => {
                    if self.handle_line(&line, out).await? == Flow::Quit {
                        break;
                    }
                }
                Event::Expired(outcome) => writeln!(out, "\n{}", describe_outcome(&outcome))?,
            }
        }
        Ok(())
    }

    async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(crate::command::CommandError::Empty) => return Ok(Flow::Continue),
            Err(err) => {
                writeln!(out, "error: {err}")?;
                return Ok(Flow::Continue);
            }
        };
        if command == Command::Quit {
            writeln!(out, "Bye.")?;
            return Ok(Flow::Quit);
        }

        match self.execute(command).await {
            Ok(reply) => writeln!(out, "{reply}")?,
            Err(err) => writeln!(out, "error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    /// Run one command and render its reply.
    ///
    /// # Errors
    ///
    /// Returns the service error for rejected operations.
    pub async fn execute(&mut self, command: Command) -> Result<String, SessionError> {
        match command {
            Command::Register {
                username,
                password,
                confirm,
                email,
            } => {
                let user = self
                    .app
                    .register(Registration::new(username, password, confirm, email))
                    .await?;
                Ok(format!("Registered and logged in as {}.", user.username()))
            }
            Command::Login { username, password } => {
                let user = self.app.login(&username, &password)?;
                Ok(format!("Welcome back, {}.", user.username()))
            }
            Command::Logout => {
                self.app.logout();
                Ok("Logged out.".to_string())
            }
            Command::Whoami => {
                let user = self.app.current_user()?;
                Ok(match user.email() {
                    Some(email) => format!("{} <{email}>", user.username()),
                    None => user.username().to_string(),
                })
            }
            Command::Dashboard => self.dashboard(),
            Command::Courses => Ok(self.courses()),
            Command::Modules(course_id) => self.modules(course_id),
            Command::Open(course_id, module_id) => self.open(course_id, module_id),
            Command::Complete(course_id, module_id) => {
                let changed = self.app.complete_module(course_id, module_id).await?;
                let percent = self.app.progress_percent(course_id)?;
                Ok(if changed {
                    format!("Module marked complete. Course progress: {percent:.0}%")
                } else {
                    format!("Module was already complete. Course progress: {percent:.0}%")
                })
            }
            Command::Quiz(course_id, module_id) => self.start_quiz(course_id, module_id),
            Command::Answer { question, option } => {
                self.app.answer(question - 1, &option)?;
                Ok(format!("Question {question}: {option}"))
            }
            Command::Submit => {
                let outcome = self.app.submit_quiz()?;
                Ok(describe_outcome(&outcome))
            }
            Command::Time => {
                let run = self.app.active_quiz().ok_or(QuizError::NoActiveQuiz)?;
                Ok(format!("{} left", format_remaining(run.remaining())))
            }
            Command::Notes => {
                let mut reply = String::new();
                for note in self.app.notes()? {
                    let _ = writeln!(reply, "[{}] {}", note.course(), note.content());
                }
                if reply.is_empty() {
                    reply.push_str("No notes yet.\n");
                }
                let courses: Vec<&str> = self.app.course_names().collect();
                let _ = write!(reply, "Courses: {}", courses.join(", "));
                Ok(reply)
            }
            Command::Note { course, content } => {
                self.app.add_note(&course, &content).await?;
                Ok("Note saved.".to_string())
            }
            Command::Profile(email) => {
                let user = self.app.update_profile(email.as_deref()).await?;
                Ok(match user.email() {
                    Some(email) => format!("Email set to {email}."),
                    None => "Email cleared.".to_string(),
                })
            }
            Command::AddCourse { name, description } => {
                let id = self.app.add_course(&name, &description).await?;
                Ok(format!("Added course {id}."))
            }
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    fn dashboard(&self) -> Result<String, SessionError> {
        let user = self.app.current_user()?;
        let mut reply = format!("Dashboard for {}", user.username());
        for row in self.app.dashboard()? {
            let _ = write!(
                reply,
                "\n  [{}] {}: {}/{} modules ({:.0}%)",
                row.course_id, row.name, row.completed, row.total, row.percent
            );
        }
        Ok(reply)
    }

    fn courses(&self) -> String {
        let courses = self.app.courses();
        if courses.is_empty() {
            return "No courses.".to_string();
        }
        let mut reply = String::new();
        for course in courses {
            let _ = writeln!(
                reply,
                "[{}] {} - {}",
                course.id(),
                course.name(),
                course.description()
            );
        }
        reply.trim_end().to_string()
    }

    fn modules(&self, course_id: CourseId) -> Result<String, SessionError> {
        let course = self.app.find_course(course_id)?;
        let mut reply = course.name().to_string();
        for module in course.modules() {
            let done = self
                .app
                .is_module_complete(course_id, module.id())
                .unwrap_or(false);
            let _ = write!(
                reply,
                "\n  [{}] {}. {}: {}",
                if done { "x" } else { " " },
                module.id(),
                module.name(),
                module.preview(PREVIEW_CHARS)
            );
        }
        Ok(reply)
    }

    fn open(&self, course_id: CourseId, module_id: ModuleId) -> Result<String, SessionError> {
        let module = self.app.find_module(course_id, module_id)?;
        let mut reply = format!("{}\n\n{}", module.name(), module.content());
        if !module.quiz().is_empty() {
            let _ = write!(
                reply,
                "\n\nQuiz: {} questions (`quiz {course_id} {module_id}`)",
                module.quiz().len()
            );
        }
        Ok(reply)
    }

    fn start_quiz(&mut self, course_id: CourseId, module_id: ModuleId) -> Result<String, SessionError> {
        let run = self.app.start_quiz(course_id, module_id)?;
        let mut reply = format!("{} ({} left)", run.title(), format_remaining(run.remaining()));
        for (idx, question) in run.questions().iter().enumerate() {
            let _ = write!(
                reply,
                "\n  {}. {}\n     {}",
                idx + 1,
                question.text(),
                question.options().join(" | ")
            );
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_core::time::fixed_clock;
    use services::QuizSettings;
    use tokio::io::AsyncWriteExt;

    async fn repl() -> Repl {
        Repl::new(
            AppServices::in_memory(fixed_clock(), QuizSettings::default())
                .await
                .unwrap(),
        )
    }

    async fn transcript(repl: &mut Repl, script: &str) -> String {
        let mut out = Vec::new();
        repl.run(script.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn remaining_time_is_minutes_and_seconds() {
        assert_eq!(format_remaining(Duration::from_secs(300)), "05:00");
        assert_eq!(format_remaining(Duration::from_secs(59)), "00:59");
        assert_eq!(format_remaining(Duration::from_millis(61_200)), "01:02");
        assert_eq!(format_remaining(Duration::ZERO), "00:00");
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_quiz_scores_full_marks() {
        let mut repl = repl().await;
        let out = transcript(
            &mut repl,
            "login student|pass123\nquiz 1 1\nanswer 1 12\nanswer 2 12\nsubmit\nquit\n",
        )
        .await;

        assert!(out.contains("Welcome back, student."));
        assert!(out.contains("Mathematics 101 - Basic Algebra (05:00 left)"));
        assert!(out.contains("Quiz submitted. Score: 2/2 Perfect score!"));
        assert!(out.contains("Bye."));
        assert!(repl.app().active_quiz().is_none());
    }

    #[tokio::test]
    async fn errors_are_reported_inline() {
        let mut repl = repl().await;
        let out = transcript(
            &mut repl,
            "dashboard\nlogin student|wrong\nfly away\nlogin student|pass123\nnote Mathematics 101|\nnotes\n",
        )
        .await;

        assert!(out.contains("error: please log in first"));
        assert!(out.contains("error: invalid username or password"));
        assert!(out.contains("error: unknown command: fly"));
        assert!(out.contains("No notes yet.\nCourses: Mathematics 101"));
        assert_eq!(repl.app().document().notes().len(), 0);
    }

    #[tokio::test]
    async fn unknown_catalog_entries_are_reported() {
        let mut repl = repl().await;
        let err = repl.execute(Command::Modules(CourseId::new(4))).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Catalog(services::CatalogError::UnknownCourse(_))
        ));
        let err = repl
            .execute(Command::Open(CourseId::new(1), ModuleId::new(3)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "course 1 has no module 3");
    }

    #[tokio::test]
    async fn completing_a_module_updates_the_dashboard() {
        let mut repl = repl().await;
        let out = transcript(
            &mut repl,
            "login student|pass123\ncomplete 1 1\ncomplete 1 1\ndashboard\n",
        )
        .await;

        assert!(out.contains("Module marked complete. Course progress: 50%"));
        assert!(out.contains("Module was already complete."));
        assert!(out.contains("[1] Mathematics 101: 1/2 modules (50%)"));
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_is_reported_while_waiting_for_input() {
        let mut repl = repl().await;
        let (mut client, server) = tokio::io::duplex(1024);
        let typist = tokio::spawn(async move {
            client
                .write_all(b"login student|pass123\nquiz 1 1\nanswer 1 12\n")
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_secs(301)).await;
            client.write_all(b"answer 2 12\nquit\n").await.unwrap();
        });

        let mut out = Vec::new();
        repl.run(tokio::io::BufReader::new(server), &mut out)
            .await
            .unwrap();
        typist.await.unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("Time is up! Score: 1/2"));
        assert!(out.contains("error: no quiz in progress"));
        assert!(repl.app().active_quiz().is_none());
    }
}
