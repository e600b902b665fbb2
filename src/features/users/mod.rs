pub mod models;
pub mod services;

pub use models::{PageTarget, ReportedIdentity};
pub use services::{
    DirectoryError, InMemoryPageDirectory, InMemoryUserDirectory, PageDirectory, UserDirectory,
};
