//! Menu-driven terminal session.
//!
//! # Responsibility
//! - Render the menu, read choices and field values, dispatch to `NoteService`.
//! - Act as the single boundary that turns errors into user-visible messages.
//!
//! # Invariants
//! - Not-found, invalid-number and non-UTF-8 input are reported and the menu
//!   continues.
//! - A storage failure ends the session with `SessionOutcome::Failed`.
//! - Only the offending line is consumed on invalid input.

use log::{error, info, warn};
use notes_core::{Note, NoteId, NoteRepository, NoteService, NoteServiceError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

const MENU: &str = "1. Listar notas\n\
                    2. Adicionar nota\n\
                    3. Atualizar nota\n\
                    4. Deletar nota\n\
                    5. Sair\n";
const CHOICE_PROMPT: &str = "Escolha uma opção: ";
const INVALID_OPTION: &str = "Opção inválida.";
const INVALID_NUMBER: &str = "Entrada inválida: informe um número inteiro.";
const INVALID_TEXT: &str = "Entrada inválida: texto não está em UTF-8.";
const EMPTY_LIST: &str = "Nenhuma nota cadastrada.";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The user picked the exit option.
    Exited,
    /// Input reached end-of-file before the exit option.
    InputClosed,
    /// The note store failed; the message was already shown.
    Failed,
}

#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "terminal i/o failed: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    List,
    Add,
    Update,
    Delete,
    Exit,
}

impl MenuChoice {
    fn from_number(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::List),
            2 => Some(Self::Add),
            3 => Some(Self::Update),
            4 => Some(Self::Delete),
            5 => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Failure of a single menu action, resolved inside `Session::run`.
#[derive(Debug)]
enum ActionError {
    InvalidNumber,
    InvalidText,
    InputClosed,
    Service(NoteServiceError),
    Io(io::Error),
}

impl From<io::Error> for ActionError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<NoteServiceError> for ActionError {
    fn from(value: NoteServiceError) -> Self {
        Self::Service(value)
    }
}

/// Read paths have no target note, so every repository error is a storage failure.
impl From<notes_core::RepoError> for ActionError {
    fn from(value: notes_core::RepoError) -> Self {
        Self::Service(NoteServiceError::Repo(value))
    }
}

type ActionResult<T> = Result<T, ActionError>;

/// Interactive session state: terminal handles plus the note service.
pub struct Session<I, O, R: NoteRepository> {
    input: I,
    output: O,
    service: NoteService<R>,
}

impl<I: BufRead, O: Write, R: NoteRepository> Session<I, O, R> {
    pub fn new(input: I, output: O, service: NoteService<R>) -> Self {
        Self {
            input,
            output,
            service,
        }
    }

    /// Runs the menu loop until exit, end of input or a storage failure.
    ///
    /// # Errors
    /// - `SessionError::Io` when the terminal handles cannot be read or written.
    pub fn run(&mut self) -> Result<SessionOutcome, SessionError> {
        info!("event=session_start module=session status=ok");
        loop {
            let result = self.step();
            match result {
                Ok(Some(outcome)) => {
                    info!("event=session_end module=session status=ok outcome={outcome:?}");
                    return Ok(outcome);
                }
                Ok(None) => {}
                Err(ActionError::InvalidNumber) => {
                    warn!("event=input_parse module=session status=error");
                    writeln!(self.output, "{INVALID_NUMBER}")?;
                }
                Err(ActionError::InvalidText) => {
                    warn!("event=input_decode module=session status=error");
                    writeln!(self.output, "{INVALID_TEXT}")?;
                }
                Err(ActionError::Service(NoteServiceError::NoteNotFound(id))) => {
                    writeln!(self.output, "Nota não encontrada: {id}")?;
                }
                Err(ActionError::Service(NoteServiceError::Repo(err))) => {
                    error!("event=session_end module=session status=error error={err}");
                    writeln!(self.output, "Erro de armazenamento: {err}")?;
                    self.output.flush()?;
                    return Ok(SessionOutcome::Failed);
                }
                Err(ActionError::InputClosed) => {
                    info!("event=session_end module=session status=ok outcome=InputClosed");
                    writeln!(self.output)?;
                    self.output.flush()?;
                    return Ok(SessionOutcome::InputClosed);
                }
                Err(ActionError::Io(err)) => return Err(err.into()),
            }
        }
    }

    /// Shows the menu and performs one choice. `Some` ends the session.
    fn step(&mut self) -> ActionResult<Option<SessionOutcome>> {
        write!(self.output, "{MENU}")?;
        let choice = self.prompt_number(CHOICE_PROMPT)?;

        match MenuChoice::from_number(choice) {
            Some(MenuChoice::List) => self.list_notes()?,
            Some(MenuChoice::Add) => self.add_note()?,
            Some(MenuChoice::Update) => self.update_note()?,
            Some(MenuChoice::Delete) => self.delete_note()?,
            Some(MenuChoice::Exit) => return Ok(Some(SessionOutcome::Exited)),
            None => writeln!(self.output, "{INVALID_OPTION}")?,
        }

        Ok(None)
    }

    fn list_notes(&mut self) -> ActionResult<()> {
        let notes = self.service.get_all_notes()?;
        if notes.is_empty() {
            writeln!(self.output, "{EMPTY_LIST}")?;
            return Ok(());
        }

        for note in notes {
            writeln!(
                self.output,
                "{}: {} - {}",
                note.id.unwrap_or_default(),
                note.title,
                note.content
            )?;
        }
        Ok(())
    }

    fn add_note(&mut self) -> ActionResult<()> {
        let title = self.prompt_line("Título da nota: ")?;
        let content = self.prompt_line("Conteúdo da nota: ")?;

        let created = self.service.create_note(Note::new(title, content))?;
        writeln!(self.output, "Nota {} criada.", created.id.unwrap_or_default())?;
        Ok(())
    }

    fn update_note(&mut self) -> ActionResult<()> {
        let id: NoteId = self.prompt_number("ID da nota: ")?;
        let title = self.prompt_line("Novo título da nota: ")?;
        let content = self.prompt_line("Novo conteúdo da nota: ")?;

        self.service.update_note(id, &Note::new(title, content))?;
        writeln!(self.output, "Nota {id} atualizada.")?;
        Ok(())
    }

    fn delete_note(&mut self) -> ActionResult<()> {
        let id: NoteId = self.prompt_number("ID da nota: ")?;

        self.service.delete_note(id)?;
        writeln!(self.output, "Nota {id} removida.")?;
        Ok(())
    }

    fn prompt_number(&mut self, prompt: &str) -> ActionResult<i64> {
        let line = self.prompt_line(prompt)?;
        parse_number(&line).ok_or(ActionError::InvalidNumber)
    }

    fn prompt_line(&mut self, prompt: &str) -> ActionResult<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Reads one line without its terminator.
    ///
    /// The whole line is consumed even when it is not valid UTF-8.
    fn read_line(&mut self) -> ActionResult<String> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Err(ActionError::InputClosed);
        }
        let line = String::from_utf8(buf).map_err(|_| ActionError::InvalidText)?;
        Ok(strip_line_ending(line))
    }
}

fn parse_number(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::{parse_number, strip_line_ending, Session, SessionOutcome};
    use notes_core::db::open_db_in_memory;
    use notes_core::{
        Note, NoteId, NoteRepository, NoteService, RepoError, RepoResult, SqliteNoteRepository,
    };
    use rusqlite::Connection;
    use std::io::Cursor;

    struct Transcript {
        outcome: SessionOutcome,
        output: String,
        notes: Vec<Note>,
    }

    fn run_with(conn: &Connection, input: &str) -> Transcript {
        run_bytes_with(conn, input.as_bytes())
    }

    fn run_bytes_with(conn: &Connection, input: &[u8]) -> Transcript {
        let repo = SqliteNoteRepository::try_new(conn).unwrap();
        let mut output = Vec::new();
        let outcome = Session::new(
            Cursor::new(input),
            &mut output,
            NoteService::new(repo),
        )
        .run()
        .unwrap();

        let notes = NoteService::new(SqliteNoteRepository::try_new(conn).unwrap())
            .get_all_notes()
            .unwrap_or_default();
        Transcript {
            outcome,
            output: String::from_utf8(output).unwrap(),
            notes,
        }
    }

    fn run(input: &str) -> Transcript {
        let conn = open_db_in_memory().unwrap();
        run_with(&conn, input)
    }

    #[test]
    fn exit_option_ends_session() {
        let transcript = run("5\n");

        assert_eq!(transcript.outcome, SessionOutcome::Exited);
        assert!(transcript.output.starts_with("1. Listar notas\n"));
        assert!(transcript.output.contains("5. Sair\n"));
        assert!(transcript.output.ends_with("Escolha uma opção: "));
    }

    #[test]
    fn add_then_list_prints_id_title_and_content() {
        let transcript = run("2\nGroceries\nMilk, eggs\n1\n5\n");

        assert_eq!(transcript.outcome, SessionOutcome::Exited);
        assert!(transcript.output.contains("Título da nota: "));
        assert!(transcript.output.contains("Conteúdo da nota: "));
        assert!(transcript.output.contains("Nota 1 criada.\n"));
        assert!(transcript.output.contains("Escolha uma opção: 1: Groceries - Milk, eggs\n"));
        assert_eq!(
            transcript.notes,
            vec![Note::with_id(1, "Groceries", "Milk, eggs")]
        );
    }

    #[test]
    fn update_replaces_fields_and_delete_empties_store() {
        let conn = open_db_in_memory().unwrap();
        let transcript = run_with(
            &conn,
            "2\nGroceries\nMilk, eggs\n3\n1\nGroceries\nMilk, eggs, bread\n1\n",
        );
        assert_eq!(transcript.outcome, SessionOutcome::InputClosed);
        assert!(transcript.output.contains("Nota 1 atualizada.\n"));
        assert!(transcript
            .output
            .contains("Escolha uma opção: 1: Groceries - Milk, eggs, bread\n"));

        let transcript = run_with(&conn, "4\n1\n1\n5\n");
        assert_eq!(transcript.outcome, SessionOutcome::Exited);
        assert!(transcript.output.contains("ID da nota: "));
        assert!(transcript.output.contains("Nota 1 removida.\n"));
        assert!(transcript.output.contains("Nenhuma nota cadastrada.\n"));
        assert!(transcript.notes.is_empty());
    }

    #[test]
    fn missing_note_is_reported_and_loop_continues() {
        let transcript = run("2\nGroceries\nMilk, eggs\n3\n99\nX\nY\n4\n99\n5\n");

        assert_eq!(transcript.outcome, SessionOutcome::Exited);
        assert_eq!(
            transcript.output.matches("Nota não encontrada: 99\n").count(),
            2
        );
        assert_eq!(
            transcript.notes,
            vec![Note::with_id(1, "Groceries", "Milk, eggs")]
        );
    }

    #[test]
    fn invalid_option_redisplays_menu_without_mutation() {
        let transcript = run("7\n5\n");

        assert_eq!(transcript.outcome, SessionOutcome::Exited);
        assert!(transcript.output.contains("Opção inválida.\n"));
        assert_eq!(transcript.output.matches("1. Listar notas").count(), 2);
        assert!(transcript.notes.is_empty());
    }

    #[test]
    fn non_numeric_input_is_reported_and_loop_continues() {
        let transcript = run("abc\n3\nxyz\n5\n");

        assert_eq!(transcript.outcome, SessionOutcome::Exited);
        assert_eq!(
            transcript
                .output
                .matches("Entrada inválida: informe um número inteiro.\n")
                .count(),
            2
        );
        assert!(!transcript.output.contains("Novo título da nota: "));
        assert_eq!(transcript.output.matches("1. Listar notas").count(), 3);
    }

    #[test]
    fn end_of_input_mid_prompt_creates_nothing() {
        let transcript = run("2\nonly a title");

        assert_eq!(transcript.outcome, SessionOutcome::InputClosed);
        assert!(transcript.notes.is_empty());
    }

    #[test]
    fn empty_and_crlf_fields_are_accepted() {
        let transcript = run("2\r\n\r\n\r\n2\r\n  padded  \r\nbody\r\n5\r\n");

        assert_eq!(transcript.outcome, SessionOutcome::Exited);
        assert_eq!(
            transcript.notes,
            vec![
                Note::with_id(1, "", ""),
                Note::with_id(2, "  padded  ", "body"),
            ]
        );
    }

    #[test]
    fn storage_failure_ends_session_as_failed() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();
        conn.execute_batch("DROP TABLE notes;").unwrap();

        let mut output = Vec::new();
        let outcome = Session::new(
            Cursor::new("1\n5\n".as_bytes()),
            &mut output,
            NoteService::new(repo),
        )
        .run()
        .unwrap();

        assert_eq!(outcome, SessionOutcome::Failed);
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Erro de armazenamento: "));
        assert_eq!(output.matches("1. Listar notas").count(), 1);
    }

    #[test]
    fn latin1_input_is_reported_and_loop_continues() {
        let conn = open_db_in_memory().unwrap();
        let transcript = run_bytes_with(&conn, b"2\nT\xedtulo\nbody\n\xff\n5\n");

        assert_eq!(transcript.outcome, SessionOutcome::Exited);
        assert_eq!(
            transcript
                .output
                .matches("Entrada inválida: texto não está em UTF-8.\n")
                .count(),
            2
        );
        // "body" lands on the menu prompt after the rejected title.
        assert_eq!(
            transcript
                .output
                .matches("Entrada inválida: informe um número inteiro.\n")
                .count(),
            1
        );
        assert!(transcript.notes.is_empty());
    }

    /// Store whose listing fails with a repository-level `NotFound`.
    struct NotFoundListingRepository;

    impl NoteRepository for NotFoundListingRepository {
        fn find_all(&self) -> RepoResult<Vec<Note>> {
            Err(RepoError::NotFound(3))
        }

        fn find_by_id(&self, _id: NoteId) -> RepoResult<Option<Note>> {
            Ok(None)
        }

        fn save(&self, note: &Note) -> RepoResult<Note> {
            Ok(note.clone())
        }

        fn delete_by_id(&self, id: NoteId) -> RepoResult<()> {
            Err(RepoError::NotFound(id))
        }

        fn count(&self) -> RepoResult<u64> {
            Ok(0)
        }
    }

    #[test]
    fn listing_errors_are_reported_as_storage_failures() {
        let mut output = Vec::new();
        let outcome = Session::new(
            Cursor::new("1\n5\n".as_bytes()),
            &mut output,
            NoteService::new(NotFoundListingRepository),
        )
        .run()
        .unwrap();

        assert_eq!(outcome, SessionOutcome::Failed);
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Erro de armazenamento: note not found: 3\n"));
        assert!(!output.contains("Nota não encontrada"));
    }

    #[test]
    fn parse_number_trims_and_rejects_text() {
        assert_eq!(parse_number(" 42 "), Some(42));
        assert_eq!(parse_number("-3"), Some(-3));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("4a"), None);
    }

    #[test]
    fn strip_line_ending_keeps_inner_whitespace() {
        assert_eq!(strip_line_ending(" a b \r\n".to_string()), " a b ");
        assert_eq!(strip_line_ending("tail".to_string()), "tail");
    }
}
