//! Venture network explorer.
//!
//! [`vc`] turns a wide CSV export of people into people, funds and sub-funds.
//! [`layout`] places them on a fixed canvas with a bounded force simulation,
//! and [`interaction`] maps pointer events onto the placed nodes. [`query`]
//! holds the filter, search and statistics helpers used by the viewer, and
//! [`summary`] is the headless counterpart of the viewer.

pub mod interaction;
pub mod layout;
pub mod query;
pub mod summary;
pub mod util;
pub mod vc;
