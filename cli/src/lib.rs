pub mod clap_app;
pub mod claim;
pub mod cli;
pub mod clipboard;
pub mod config_command;
pub mod console_presenter;
pub mod purchase;
pub mod query;
pub mod referral_link;
pub mod watch;
