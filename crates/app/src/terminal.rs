//! Line-oriented quiz presentation over any reader/writer pair.

use std::io::{self, BufRead, Write};

use quiz_core::model::{
    BOOLEAN_CHOICES, QuestionKind, RecordedAnswer, ScoreEntry, Topic, TopicFilter,
};
use services::{QuestionReview, QuizSession, SelectedQuestion, SessionState, SubmitOutcome};

/// How a pass over the session's questions ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    /// The last question is answered and the session can be submitted.
    Ready,
    /// The user asked for a fresh quiz.
    Restart,
    /// Input ran out or the session could not continue.
    Stopped,
}

enum Reply {
    Answer(RecordedAnswer),
    Restart,
}

pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one line; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    /// Walk the session to its last question with every question answered.
    ///
    /// Entering `r` at any prompt stops early with [`QuizStep::Restart`].
    pub fn answer_all(&mut self, session: &mut QuizSession) -> io::Result<QuizStep> {
        if session.state() == SessionState::Empty {
            writeln!(self.output, "No questions available.")?;
            return Ok(QuizStep::Stopped);
        }

        loop {
            let label = session.progress().label();
            let Some(question) = session.current_question().cloned() else {
                return Ok(QuizStep::Stopped);
            };
            writeln!(self.output)?;
            writeln!(self.output, "{label}  (r to restart)")?;
            let answer = match self.ask(&question)? {
                Some(Reply::Answer(answer)) => answer,
                Some(Reply::Restart) => return Ok(QuizStep::Restart),
                None => return Ok(QuizStep::Stopped),
            };
            if session.record_current(answer).is_err() {
                return Ok(QuizStep::Stopped);
            }
            if session.can_submit() {
                return Ok(QuizStep::Ready);
            }
            if let Err(err) = session.advance() {
                tracing::debug!(error = %err, "could not advance");
                return Ok(QuizStep::Stopped);
            }
        }
    }

    fn ask(&mut self, selected: &SelectedQuestion) -> io::Result<Option<Reply>> {
        let question = selected.question();
        writeln!(self.output, "[{}] {}", question.topic(), question.prompt())?;

        let options: Vec<&str> = match question.kind() {
            QuestionKind::MultipleChoice { choices, .. } => {
                choices.iter().map(String::as_str).collect()
            }
            QuestionKind::Boolean { .. } => {
                BOOLEAN_CHOICES.iter().map(|(label, _)| *label).collect()
            }
            QuestionKind::Fill { .. } => Vec::new(),
        };
        for (idx, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {option}", idx + 1)?;
        }

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if line.trim().eq_ignore_ascii_case("r") {
                return Ok(Some(Reply::Restart));
            }

            if options.is_empty() {
                let answer = RecordedAnswer::Text(line).normalized();
                if answer.is_answered() {
                    return Ok(Some(Reply::Answer(answer)));
                }
                writeln!(self.output, "Please enter an answer.")?;
                continue;
            }

            match line.trim().parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => {
                    return Ok(Some(Reply::Answer(RecordedAnswer::Choice(n - 1))));
                }
                _ => writeln!(self.output, "Enter a number from 1 to {}.", options.len())?,
            }
        }
    }

    pub fn show_outcome(
        &mut self,
        outcome: &SubmitOutcome,
        review: &[QuestionReview],
    ) -> io::Result<()> {
        let topics = if outcome.entry.topics == "all" {
            String::new()
        } else {
            format!(" (Topics: {})", outcome.entry.topics.replace(',', ", "))
        };
        writeln!(self.output)?;
        writeln!(
            self.output,
            "You scored {}/{} ({}%){topics}",
            outcome.score, outcome.total, outcome.percent
        )?;
        if let Some(rank) = outcome.rank {
            writeln!(self.output, "Ranked #{rank} in your high scores.")?;
        }

        writeln!(self.output)?;
        writeln!(self.output, "Review:")?;
        for (idx, row) in review.iter().enumerate() {
            let mark = if row.correct { "correct" } else { "wrong" };
            writeln!(self.output, "{}. {} ({mark})", idx + 1, row.prompt)?;
            writeln!(
                self.output,
                "   Your answer: {}",
                row.your_answer.as_deref().unwrap_or("(no answer)")
            )?;
            if !row.correct {
                writeln!(self.output, "   Correct answer: {}", row.correct_answer)?;
            }
            if !row.explanation.is_empty() {
                writeln!(self.output, "   {}", row.explanation)?;
            }
        }
        Ok(())
    }

    /// Yes/no prompt; anything but `y`/`yes` is no.
    pub fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        write!(self.output, "{prompt} [y/N] ")?;
        self.output.flush()?;
        let answer = self.read_line()?.unwrap_or_default().trim().to_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }

    pub fn show_scores(&mut self, entries: &[ScoreEntry]) -> io::Result<()> {
        if entries.is_empty() {
            writeln!(self.output, "No high scores yet.")?;
            return Ok(());
        }
        for (idx, entry) in entries.iter().enumerate() {
            writeln!(
                self.output,
                "{:>2}. {:>3}%  {}/{}  {}  {}",
                idx + 1,
                entry.percent,
                entry.correct,
                entry.total,
                entry.topics,
                entry.date.format("%Y-%m-%d %H:%M"),
            )?;
        }
        Ok(())
    }

    pub fn show_topics(&mut self, available: &[Topic], saved: &TopicFilter) -> io::Result<()> {
        writeln!(self.output, "Saved topics: {}", saved.label())?;
        writeln!(self.output, "Available topics:")?;
        for topic in available {
            let mark = if !saved.is_unrestricted() && saved.contains(topic) {
                "*"
            } else {
                " "
            };
            writeln!(self.output, " {mark} {topic}")?;
        }
        Ok(())
    }

    pub fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, QuestionBank, QuestionId, QuizSettings};
    use quiz_core::time::fixed_now;
    use services::{AppServices, Clock};
    use std::io::Cursor;

    fn question(id: u64, kind: QuestionKind) -> Question {
        let topic = if id % 2 == 0 { "music" } else { "science" };
        Question::new(
            QuestionId::new(id),
            Topic::new(topic).unwrap(),
            format!("Q{id}"),
            format!("Because {id}."),
            kind,
        )
        .unwrap()
    }

    fn app(questions: Vec<Question>) -> AppServices {
        AppServices::in_memory(
            Clock::fixed(fixed_now()),
            QuestionBank::new(questions).unwrap(),
            QuizSettings::default(),
        )
    }

    #[tokio::test]
    async fn scripted_session_reprompts_and_scores() {
        let app = app(vec![
            question(1, QuestionKind::Boolean { answer: true }),
            question(2, QuestionKind::Boolean { answer: true }),
        ]);
        let quiz = app.quiz_loop();
        let mut session = quiz.start_session().await;

        let input = Cursor::new("7\nabc\n1\n1\n");
        let mut terminal = Terminal::new(input, Vec::new());
        assert_eq!(terminal.answer_all(&mut session).unwrap(), QuizStep::Ready);

        let outcome = quiz.submit(&mut session).await.unwrap();
        terminal
            .show_outcome(&outcome, &session.review().unwrap())
            .unwrap();

        let text = String::from_utf8(terminal.into_output()).unwrap();
        assert!(text.contains("Question 1 of 2"));
        assert!(text.contains("Question 2 of 2"));
        assert_eq!(text.matches("Enter a number from 1 to 2.").count(), 2);
        assert!(text.contains("You scored 2/2 (100%)\n"));
        assert!(text.contains("Ranked #1"));
    }

    #[tokio::test]
    async fn outcome_lists_chosen_topics() {
        let app = app(vec![
            question(1, QuestionKind::Boolean { answer: true }),
            question(2, QuestionKind::Boolean { answer: true }),
            question(3, QuestionKind::Boolean { answer: true }),
        ]);
        app.preferences()
            .save(&TopicFilter::parse_list("science,music"))
            .await;
        let quiz = app.quiz_loop();
        let mut session = quiz.start_session().await;

        let mut terminal = Terminal::new(Cursor::new("1\n1\n2\n"), Vec::new());
        assert_eq!(terminal.answer_all(&mut session).unwrap(), QuizStep::Ready);
        let outcome = quiz.submit(&mut session).await.unwrap();
        terminal.show_outcome(&outcome, &[]).unwrap();

        let text = String::from_utf8(terminal.into_output()).unwrap();
        assert!(text.contains("2/3 (67%) (Topics: science, music)\n"));
    }

    #[tokio::test]
    async fn r_asks_for_a_restart() {
        let app = app(vec![
            question(1, QuestionKind::Boolean { answer: true }),
            question(2, QuestionKind::Boolean { answer: true }),
        ]);
        let mut session = app.quiz_loop().start_session().await;

        let mut terminal = Terminal::new(Cursor::new("1\n R \n"), Vec::new());
        assert_eq!(
            terminal.answer_all(&mut session).unwrap(),
            QuizStep::Restart
        );
        assert_eq!(session.answers().len(), 1);
        assert!(!session.is_complete());
    }

    #[tokio::test]
    async fn blank_fill_answer_is_rejected_and_text_is_trimmed() {
        let fill = QuestionKind::Fill {
            answer: "China".into(),
        };
        let app = app(vec![question(1, fill)]);
        let quiz = app.quiz_loop();
        let mut session = quiz.start_session().await;

        let mut terminal = Terminal::new(Cursor::new("   \n  china \n"), Vec::new());
        assert_eq!(terminal.answer_all(&mut session).unwrap(), QuizStep::Ready);
        assert_eq!(
            session.answer_for(QuestionId::new(1)),
            Some(&RecordedAnswer::Text("china".into()))
        );

        let outcome = quiz.submit(&mut session).await.unwrap();
        assert_eq!(outcome.score, 1);
        let text = String::from_utf8(terminal.into_output()).unwrap();
        assert!(text.contains("Please enter an answer."));
    }

    #[tokio::test]
    async fn end_of_input_leaves_session_open() {
        let app = app(vec![
            question(1, QuestionKind::Boolean { answer: true }),
            question(2, QuestionKind::Boolean { answer: false }),
        ]);
        let mut session = app.quiz_loop().start_session().await;

        let mut terminal = Terminal::new(Cursor::new("2\n"), Vec::new());
        assert_eq!(
            terminal.answer_all(&mut session).unwrap(),
            QuizStep::Stopped
        );
        assert!(!session.is_complete());
        assert_eq!(session.current_index(), 1);
    }

    #[tokio::test]
    async fn empty_session_says_so() {
        let app = app(Vec::new());
        let mut session = app.quiz_loop().start_session().await;
        let mut terminal = Terminal::new(Cursor::new(""), Vec::new());
        assert_eq!(
            terminal.answer_all(&mut session).unwrap(),
            QuizStep::Stopped
        );
        let text = String::from_utf8(terminal.into_output()).unwrap();
        assert_eq!(text.trim(), "No questions available.");
    }

    #[test]
    fn scores_and_topics_render() {
        let mut terminal = Terminal::new(Cursor::new(""), Vec::new());
        terminal.show_scores(&[]).unwrap();
        let entry = ScoreEntry::new(3, 4, &TopicFilter::parse_list("music"), fixed_now());
        terminal.show_scores(&[entry]).unwrap();
        terminal
            .show_topics(
                &[Topic::new("music").unwrap(), Topic::new("maths").unwrap()],
                &TopicFilter::parse_list("music"),
            )
            .unwrap();

        let text = String::from_utf8(terminal.into_output()).unwrap();
        assert!(text.contains("No high scores yet."));
        assert!(text.contains(" 1.  75%  3/4  music"));
        assert!(text.contains("Saved topics: music"));
        assert!(text.contains(" * music"));
        assert!(text.contains("   maths"));
    }
}
