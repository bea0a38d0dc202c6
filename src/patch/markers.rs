// src/patch/markers.rs

//! Literal delimiter tokens the model is prompted to emit. These appear
//! verbatim in the system prompts, so they must match byte-for-byte.
//! Always treat them as literal substrings when scanning; escape them with
//! `regex::escape` before embedding in a pattern.

pub const SEARCH_START: &str = "<<<<<<< SEARCH";
pub const DIVIDER: &str = "=======";
pub const REPLACE_END: &str = ">>>>>>> REPLACE";

pub const TITLE_PAGE_START: &str = "<<<<<<< START_TITLE ";
pub const TITLE_PAGE_END: &str = " >>>>>>> END_TITLE";

pub const NEW_PAGE_START: &str = "<<<<<<< NEW_PAGE_START ";
pub const NEW_PAGE_END: &str = " >>>>>>> NEW_PAGE_END";

pub const UPDATE_PAGE_START: &str = "<<<<<<< UPDATE_PAGE_START ";
pub const UPDATE_PAGE_END: &str = " >>>>>>> UPDATE_PAGE_END";

pub const PROJECT_NAME_START: &str = "<<<<<<< PROJECT_NAME_START ";
pub const PROJECT_NAME_END: &str = " >>>>>>> PROJECT_NAME_END";
