pub mod args;
pub mod drivers;
pub mod wizard;

pub use args::{Cli, Command, RunArgs};
pub use drivers::{InquireDriver, PromptDriver};
pub use wizard::prompt_config;
