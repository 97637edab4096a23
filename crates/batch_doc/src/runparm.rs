use std::path::{Path, PathBuf};

use crate::{
    command::fold_case, generate_documentation, CommandRegistry, DocError, Layout, Result,
};

/// Name of the RunParm that writes the documentation of every registered command.
pub const GENERATE_BATCH_DOCUMENTATION: &str = "GenerateBatchDocumentation";

/// A line whose first character is one of these is a comment.
pub const COMMENT_CHARS: &[char] = &['*', ' ', '/'];
pub const DELIMITER: char = ',';
pub const QUOTER: char = '"';

/// One command line of a RunParm file, e.g. `GenerateBatchDocumentation,docs.html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParm {
    pub name: String,
    pub values: Vec<String>,
    /// 1-based line in the RunParm file.
    pub line: usize,
}

impl RunParm {
    pub fn is(&self, name: &str) -> bool {
        fold_case(&self.name) == fold_case(name)
    }

    /// Fails if fewer than `expected` values were given. Extra values are ignored.
    pub fn require_values(&self, expected: usize) -> Result<()> {
        if self.values.len() >= expected {
            Ok(())
        } else {
            Err(DocError::InvalidRunParm {
                name: self.name.clone(),
                expected,
                actual: self.values.len(),
            })
        }
    }
}

/// Parsed contents of a RunParm file.
#[derive(Debug, Default)]
pub struct RunParmFile {
    pub parms: Vec<RunParm>,
}

impl RunParmFile {
    /// Parses one RunParm per line.
    ///
    /// Empty lines and lines starting with one of [`COMMENT_CHARS`] are skipped.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut parms = vec![];
        for (i, line) in contents.lines().enumerate() {
            let line_number = i + 1;
            let line = line.trim_end();
            if line.is_empty() || line.starts_with(COMMENT_CHARS) {
                continue;
            }

            let mut fields = split_fields(line, line_number)?.into_iter();
            let name = fields.next().unwrap_or_default();
            if name.is_empty() {
                return Err(DocError::EmptyRunParmName { line: line_number });
            }
            parms.push(RunParm {
                name,
                values: fields.collect(),
                line: line_number,
            });
        }
        Ok(Self { parms })
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }
}

/// Splits `line` on [`DELIMITER`].
///
/// A field starting with [`QUOTER`] runs up to the next quoter and is kept verbatim; it must be
/// followed by a delimiter or the end of the line. Other fields are trimmed.
fn split_fields(line: &str, line_number: usize) -> Result<Vec<String>> {
    let mut fields = vec![];
    let mut rest = line;
    loop {
        if let Some(quoted) = rest.strip_prefix(QUOTER) {
            let end = quoted
                .find(QUOTER)
                .ok_or(DocError::UnmatchedQuote { line: line_number })?;
            fields.push(quoted[..end].to_string());

            let after = &quoted[end + QUOTER.len_utf8()..];
            if after.is_empty() {
                return Ok(fields);
            }
            rest = after
                .strip_prefix(DELIMITER)
                .ok_or(DocError::MissingDelimiter { line: line_number })?;
        } else {
            match rest.split_once(DELIMITER) {
                Some((field, after)) => {
                    fields.push(field.trim().to_string());
                    rest = after;
                }
                None => {
                    fields.push(rest.trim().to_string());
                    return Ok(fields);
                }
            }
        }
    }
}

pub trait RunParmHandler {
    /// Executes `parm` if it is one of this handler's commands.
    ///
    /// Returns whether `parm` was consumed.
    fn handle(&mut self, parm: &RunParm) -> Result<bool>;
}

/// Offers each RunParm to its handlers in order until one consumes it.
#[derive(Default)]
pub struct Dispatcher<'a> {
    handlers: Vec<Box<dyn RunParmHandler + 'a>>,
}

impl<'a> Dispatcher<'a> {
    pub fn new() -> Self {
        Self { handlers: vec![] }
    }

    pub fn with_handler(mut self, handler: impl RunParmHandler + 'a) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Runs every RunParm and returns the ones no handler consumed.
    pub fn run(&mut self, file: &RunParmFile) -> Result<Vec<RunParm>> {
        let mut unconsumed = vec![];
        for parm in &file.parms {
            if !self.dispatch(parm)? {
                tracing::warn!("Unknown RunParm `{}` at line {}", parm.name, parm.line);
                unconsumed.push(parm.clone());
            }
        }
        Ok(unconsumed)
    }

    fn dispatch(&mut self, parm: &RunParm) -> Result<bool> {
        for handler in &mut self.handlers {
            if handler.handle(parm)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Handles [`GENERATE_BATCH_DOCUMENTATION`] with the output file as its first value.
pub struct BatchDocumentationHandler<'a> {
    registry: &'a CommandRegistry,
    written: Vec<PathBuf>,
}

impl<'a> BatchDocumentationHandler<'a> {
    pub fn new(registry: &'a CommandRegistry) -> Self {
        Self {
            registry,
            written: vec![],
        }
    }

    /// Files written so far.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl RunParmHandler for BatchDocumentationHandler<'_> {
    fn handle(&mut self, parm: &RunParm) -> Result<bool> {
        if !parm.is(GENERATE_BATCH_DOCUMENTATION) {
            return Ok(false);
        }
        parm.require_values(1)?;

        let path = PathBuf::from(&parm.values[0]);
        generate_documentation(self.registry, Layout::Plain, &path)?;
        self.written.push(path);
        Ok(true)
    }
}

impl<T: RunParmHandler + ?Sized> RunParmHandler for &mut T {
    fn handle(&mut self, parm: &RunParm) -> Result<bool> {
        (**self).handle(parm)
    }
}
