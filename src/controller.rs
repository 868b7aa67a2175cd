//! Interactive front end: reads menu choices, validates ids and drives the store.

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Result};
use log::{debug, error};

use crate::book::{Book, BookField};
use crate::error::{InputError, StoreError};
use crate::menu::{Confirmation, MenuEvent, MenuState, Requirement, UpdateChoice};
use crate::sqlite::BookStore;

const MAIN_MENU: &str = "What would you like to do?\n\
                         1. Enter book\n\
                         2. Update book\n\
                         3. Delete book\n\
                         4. Search books\n\
                         0. Exit\n\
                         Enter option number here: ";

const UPDATE_MENU: &str = "What would you like to update?\n\
                           1. Title\n\
                           2. Author\n\
                           3. Quantity\n\
                           0. Exit\n\
                           Enter option number: ";

/// Menu-driven session over a borrowed [`BookStore`].
///
/// Input and output are injected so a session can be scripted in tests.
/// Only console I/O failures escape [`Controller::run`]; store and input
/// errors are printed and the loop carries on.
pub struct Controller<'a, R, W> {
    store: &'a BookStore,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Controller<'a, R, W> {
    pub fn new(store: &'a BookStore, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
        }
    }

    /// Run the main menu until the operator chooses `0`.
    pub fn run(&mut self) -> Result<()> {
        let mut state = MenuState::MainMenu;
        while !state.is_terminal() {
            let event = match state {
                MenuState::MainMenu => {
                    let choice = self.prompt_int(MAIN_MENU)?;
                    writeln!(self.output)?;
                    match MenuEvent::from_choice(choice) {
                        Ok(event) => event,
                        Err(_) => {
                            writeln!(self.output, "Invalid menu selection. Please try again.\n")?;
                            continue;
                        }
                    }
                }
                MenuState::AddBook => {
                    self.add_book()?;
                    MenuEvent::FlowFinished
                }
                MenuState::UpdateBook => {
                    self.update_book()?;
                    MenuEvent::FlowFinished
                }
                MenuState::DeleteBook => {
                    self.delete_book()?;
                    MenuEvent::FlowFinished
                }
                MenuState::SearchBook => {
                    self.search_book()?;
                    MenuEvent::FlowFinished
                }
                MenuState::Exit => break,
            };
            let next = state
                .next(event)
                .ok_or_else(|| anyhow!("no transition from {state:?} on {event:?}"))?;
            debug!("{state:?} --({event:?})--> {next:?}");
            state = next;
        }
        writeln!(self.output, "Goodbye")?;
        self.output.flush()?;
        Ok(())
    }

    fn add_book(&mut self) -> Result<()> {
        let Some(id) = self.collect_id(Requirement::MustNotExist)? else {
            writeln!(self.output)?;
            return Ok(());
        };
        let title = self.prompt_line("Enter book title: ")?;
        let author = self.prompt_line("Enter book author: ")?;
        let quantity = self.prompt_checked("Enter number of copies: ", non_negative)?;

        match self.store.insert(&Book::new(id, title, author, quantity)) {
            Ok(()) => writeln!(self.output, "Book added\n")?,
            Err(e) => self.report(&e)?,
        }
        Ok(())
    }

    fn update_book(&mut self) -> Result<()> {
        writeln!(self.output, "Enter the ID number of the book you want to update below")?;
        let Some(id) = self.collect_id(Requirement::MustExist)? else {
            writeln!(self.output)?;
            return Ok(());
        };
        if !self.show_book(id)? {
            return Ok(());
        }

        loop {
            let choice = self.prompt_checked(UPDATE_MENU, UpdateChoice::from_choice)?;
            writeln!(self.output)?;
            let field = match choice {
                UpdateChoice::Done => break,
                UpdateChoice::Title => BookField::Title(self.prompt_line("Enter new book title: ")?),
                UpdateChoice::Author => {
                    BookField::Author(self.prompt_line("Enter new author name: ")?)
                }
                UpdateChoice::Quantity => BookField::Quantity(
                    self.prompt_checked("Enter new book quantity: ", non_negative)?,
                ),
            };
            match self.store.update_field(id, &field) {
                Ok(()) => writeln!(
                    self.output,
                    "Book updated\n\
                     You can choose to update another detail or return to the main menu\n"
                )?,
                Err(e) => self.report(&e)?,
            }
        }
        Ok(())
    }

    fn delete_book(&mut self) -> Result<()> {
        writeln!(self.output, "Enter the ID number of the book you want to delete below")?;
        let Some(id) = self.collect_id(Requirement::MustExist)? else {
            writeln!(self.output)?;
            return Ok(());
        };
        if !self.show_book(id)? {
            return Ok(());
        }

        writeln!(
            self.output,
            "Are you sure you want to delete this book?\n1. Yes\n2. No\n"
        )?;
        match self.prompt_checked("Enter option number: ", Confirmation::from_choice)? {
            Confirmation::Yes => match self.store.delete(id) {
                Ok(()) => writeln!(self.output, "Book deleted\n")?,
                Err(e) => self.report(&e)?,
            },
            Confirmation::No => writeln!(self.output)?,
        }
        Ok(())
    }

    fn search_book(&mut self) -> Result<()> {
        writeln!(self.output, "Enter the ID number of the book you want to search below")?;
        match self.collect_id(Requirement::MustExist)? {
            Some(id) => {
                self.show_book(id)?;
            }
            None => writeln!(self.output)?,
        }
        Ok(())
    }

    /// Identifier validation protocol shared by every flow.
    ///
    /// Returns `None` when the operator gives up after a mismatch, or when the
    /// existence check itself fails.
    fn collect_id(&mut self, requirement: Requirement) -> Result<Option<i64>> {
        loop {
            let id = self.prompt_checked("ID Number: ", positive)?;
            let exists = match self.store.contains(id) {
                Ok(exists) => exists,
                Err(e) => {
                    self.report(&e)?;
                    return Ok(None);
                }
            };
            if requirement.is_met(exists) {
                return Ok(Some(id));
            }

            let status = if exists { "already exists" } else { "does not exist" };
            let prompt = format!(
                "\nID number {status}. Would you like to try again?\n\
                 1. Yes\n\
                 2. No\n\
                 Enter selection number: "
            );
            match self.prompt_checked(&prompt, Confirmation::from_choice)? {
                Confirmation::Yes => writeln!(self.output)?,
                Confirmation::No => return Ok(None),
            }
        }
    }

    /// Print the record for `id`. Returns `false` if it could not be read.
    fn show_book(&mut self, id: i64) -> Result<bool> {
        match self.store.find(id) {
            Ok(book) => {
                writeln!(self.output, "\n{book}\n")?;
                Ok(true)
            }
            Err(e) => {
                self.report(&e)?;
                Ok(false)
            }
        }
    }

    fn report(&mut self, err: &StoreError) -> Result<()> {
        if let StoreError::Write(source) = err {
            error!("storage write failed: {source}");
        }
        writeln!(self.output, "{err}\n")?;
        Ok(())
    }

    /// Repeat `prompt` until the answer parses and `validate` accepts it.
    fn prompt_checked<T>(
        &mut self,
        prompt: &str,
        validate: impl Fn(i64) -> Result<T, InputError>,
    ) -> Result<T> {
        loop {
            let value = self.prompt_int(prompt)?;
            match validate(value) {
                Ok(v) => return Ok(v),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    /// Repeat `prompt` until the operator enters an integer.
    fn prompt_int(&mut self, prompt: &str) -> Result<i64> {
        loop {
            let line = self.prompt_line(prompt)?;
            match parse_int(&line) {
                Ok(n) => return Ok(n),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        // Bytes that are not UTF-8 are replaced rather than rejected, so a bad
        // line fails validation and re-prompts instead of ending the session.
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(line.trim_end_matches(['\n', '\r']).to_string())
    }
}

fn parse_int(raw: &str) -> Result<i64, InputError> {
    raw.trim()
        .parse()
        .map_err(|_| InputError::NotANumber(raw.to_string()))
}

fn positive(n: i64) -> Result<i64, InputError> {
    if n > 0 {
        Ok(n)
    } else {
        Err(InputError::NonPositive(n))
    }
}

fn non_negative(n: i64) -> Result<i64, InputError> {
    if n >= 0 {
        Ok(n)
    } else {
        Err(InputError::Negative(n))
    }
}
