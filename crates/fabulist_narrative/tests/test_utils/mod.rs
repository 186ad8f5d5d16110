//! Test utilities for Fabulist narrative tests.
//!
//! This module provides mock collaborators and story fixtures.

pub mod fixtures;
pub mod mock_drivers;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_drivers::{MockImage, MockImageDriver, MockReply, MockTextDriver};
