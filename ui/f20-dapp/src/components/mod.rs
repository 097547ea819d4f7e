pub mod admin_panel;
pub mod connection_status;
pub mod layout;
pub mod sale;
