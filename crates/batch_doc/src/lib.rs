//! Documentation of batch commands.
//!
//! A [`CommandRegistry`] holds the known [`BatchCommand`]s. Their documentation can be rendered
//! as HTML either directly through [`generate_documentation`], or from a RunParm file through a
//! [`Dispatcher`] with a [`BatchDocumentationHandler`].

mod command;
mod error;
mod render;
mod runparm;

pub use command::{BatchCommand, CommandRegistry};
pub use error::{DocError, Result};
pub use render::{generate_documentation, write_documentation, Layout};
pub use runparm::{
    BatchDocumentationHandler, Dispatcher, RunParm, RunParmFile, RunParmHandler, COMMENT_CHARS,
    DELIMITER, GENERATE_BATCH_DOCUMENTATION, QUOTER,
};
