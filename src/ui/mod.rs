pub mod components;
pub mod edit_field;
pub mod layout;
pub mod theme;
