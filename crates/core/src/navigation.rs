//! Screen and selection state for browsing the catalog.
//!
//! Transitions are pure: each takes the current state by reference and
//! returns the next one, leaving side effects (fetching lessons, recording
//! progress) to the caller.

use thiserror::Error;

use crate::catalog::Arcana;
use crate::model::CardName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Home,
    CategoryGrid,
    CardDetail,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("cannot {action} from {from:?}")]
    InvalidTransition { from: Screen, action: &'static str },
}

/// Which screen is showing and what is selected on it.
///
/// `selected_card` is only ever set while on `Screen::CardDetail`, and
/// `selected_category` only while on the grid or detail screens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    screen: Screen,
    selected_category: Option<Arcana>,
    selected_card: Option<CardName>,
}

impl NavigationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn selected_category(&self) -> Option<Arcana> {
        self.selected_category
    }

    #[must_use]
    pub fn selected_card(&self) -> Option<&CardName> {
        self.selected_card.as_ref()
    }

    /// Home → CategoryGrid.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` unless on `Screen::Home`.
    pub fn select_category(&self, category: Arcana) -> Result<Self, NavigationError> {
        if self.screen != Screen::Home {
            return Err(self.invalid("select a category"));
        }
        Ok(Self {
            screen: Screen::CategoryGrid,
            selected_category: Some(category),
            selected_card: None,
        })
    }

    /// CategoryGrid → CardDetail, keeping the category.
    ///
    /// Also accepted while already on `Screen::CardDetail`, where it replaces
    /// the selected card.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::InvalidTransition` from `Screen::Home`.
    pub fn select_card(&self, card: CardName) -> Result<Self, NavigationError> {
        match self.screen {
            Screen::CategoryGrid | Screen::CardDetail => Ok(Self {
                screen: Screen::CardDetail,
                selected_category: self.selected_category,
                selected_card: Some(card),
            }),
            Screen::Home => Err(self.invalid("select a card")),
        }
    }

    /// One step up: CardDetail → CategoryGrid → Home. A no-op on Home.
    #[must_use]
    pub fn back(&self) -> Self {
        match self.screen {
            Screen::CardDetail => Self {
                screen: Screen::CategoryGrid,
                selected_category: self.selected_category,
                selected_card: None,
            },
            Screen::CategoryGrid | Screen::Home => Self::new(),
        }
    }

    /// Jump straight to Home, clearing every selection.
    #[must_use]
    pub fn home(&self) -> Self {
        Self::new()
    }

    fn invalid(&self, action: &'static str) -> NavigationError {
        NavigationError::InvalidTransition {
            from: self.screen,
            action,
        }
    }
}
