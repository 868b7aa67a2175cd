//! Menu navigation as an explicit finite state machine.
//!
//! The controller feeds [`MenuEvent`]s into [`MenuState::next`]; the legal
//! moves are exactly the rows of [`TRANSITIONS`].

use crate::error::InputError;

/// Where the operator currently is in the menu tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MenuState {
    #[default]
    MainMenu,
    AddBook,
    UpdateBook,
    DeleteBook,
    SearchBook,
    /// Terminal state; the store is closed on entry.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuEvent {
    ChooseAdd,
    ChooseUpdate,
    ChooseDelete,
    ChooseSearch,
    ChooseExit,
    /// A sub-flow completed or was aborted.
    FlowFinished,
}

impl MenuEvent {
    /// Map a top-level menu number to an event.
    pub fn from_choice(choice: i64) -> Result<Self, InputError> {
        match choice {
            1 => Ok(Self::ChooseAdd),
            2 => Ok(Self::ChooseUpdate),
            3 => Ok(Self::ChooseDelete),
            4 => Ok(Self::ChooseSearch),
            0 => Ok(Self::ChooseExit),
            other => Err(InputError::OutOfRange(other)),
        }
    }
}

pub const TRANSITIONS: &[(MenuState, MenuEvent, MenuState)] = &[
    (MenuState::MainMenu, MenuEvent::ChooseAdd, MenuState::AddBook),
    (MenuState::MainMenu, MenuEvent::ChooseUpdate, MenuState::UpdateBook),
    (MenuState::MainMenu, MenuEvent::ChooseDelete, MenuState::DeleteBook),
    (MenuState::MainMenu, MenuEvent::ChooseSearch, MenuState::SearchBook),
    (MenuState::MainMenu, MenuEvent::ChooseExit, MenuState::Exit),
    (MenuState::AddBook, MenuEvent::FlowFinished, MenuState::MainMenu),
    (MenuState::UpdateBook, MenuEvent::FlowFinished, MenuState::MainMenu),
    (MenuState::DeleteBook, MenuEvent::FlowFinished, MenuState::MainMenu),
    (MenuState::SearchBook, MenuEvent::FlowFinished, MenuState::MainMenu),
];

impl MenuState {
    /// Look up the successor state, or `None` if `event` is not valid here.
    pub fn next(self, event: MenuEvent) -> Option<Self> {
        TRANSITIONS
            .iter()
            .find(|(from, on, _)| *from == self && *on == event)
            .map(|(_, _, to)| *to)
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Exit
    }
}

/// What a flow needs to be true of the id it collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    MustExist,
    MustNotExist,
}

impl Requirement {
    pub fn is_met(self, exists: bool) -> bool {
        match self {
            Self::MustExist => exists,
            Self::MustNotExist => !exists,
        }
    }
}

/// Entries of the update sub-menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateChoice {
    Title,
    Author,
    Quantity,
    Done,
}

impl UpdateChoice {
    pub fn from_choice(choice: i64) -> Result<Self, InputError> {
        match choice {
            1 => Ok(Self::Title),
            2 => Ok(Self::Author),
            3 => Ok(Self::Quantity),
            0 => Ok(Self::Done),
            other => Err(InputError::OutOfRange(other)),
        }
    }
}

/// A 1 = Yes / 2 = No answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

impl Confirmation {
    pub fn from_choice(choice: i64) -> Result<Self, InputError> {
        match choice {
            1 => Ok(Self::Yes),
            2 => Ok(Self::No),
            other => Err(InputError::OutOfRange(other)),
        }
    }
}
