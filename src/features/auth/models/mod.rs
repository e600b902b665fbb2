mod reporter;

pub use reporter::{Reporter, ReporterAccount};
