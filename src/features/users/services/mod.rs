mod page_directory;
mod user_directory;

pub use page_directory::{InMemoryPageDirectory, PageDirectory};
pub use user_directory::{DirectoryError, InMemoryUserDirectory, UserDirectory};
