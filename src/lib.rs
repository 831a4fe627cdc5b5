//! Terminal snake.
//!
//! The game rules live in [`state`] and [`snake`] and know nothing about the
//! terminal. [`game`] drives them at a fixed cadence through the
//! [`game::Renderer`] and [`game::InputSource`] traits, which [`term`]
//! implements on top of crossterm.

pub mod config;
pub mod error;
pub mod game;
pub mod snake;
pub mod state;
pub mod term;

/// Terminal coordinate type used by crossterm.
pub type TermInt = u16;

/// A grid cell, `(x, y)`.
pub type Coords = (i32, i32);
