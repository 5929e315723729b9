//! Data model shared by the editor front end and the mail server: the component tree,
//! its editing operations and history, template records and job payloads.

pub mod editor;
pub mod jobs;
pub mod model;
pub mod requests;
