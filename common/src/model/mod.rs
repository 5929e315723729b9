pub mod component;
pub mod dashboard;
pub mod delivery;
pub mod image;
pub mod recipient;
pub mod template;
