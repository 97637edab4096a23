use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    io,
    path::Path,
    sync::Arc,
};

use intern_pool::InterningPool;
use serde::Deserialize;

use crate::{DocError, Result};

/// Case folding used to compare command and RunParm names.
pub(crate) fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// A batch command name and its documentation.
///
/// Commands are identified by their name regardless of case.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "CommandEntry")]
pub struct BatchCommand {
    name: String,
    name_lower: String,
    documentation: Option<String>,
}

/// One entry of the JSON registry file.
#[derive(Deserialize)]
struct CommandEntry {
    name: String,
    #[serde(default)]
    documentation: Option<String>,
}

impl From<CommandEntry> for BatchCommand {
    fn from(entry: CommandEntry) -> Self {
        Self::build(entry.name, entry.documentation)
    }
}

impl BatchCommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self::build(name.into(), None)
    }

    pub fn with_documentation(name: impl Into<String>, documentation: impl Into<String>) -> Self {
        Self::build(name.into(), Some(documentation.into()))
    }

    fn build(name: String, documentation: Option<String>) -> Self {
        Self {
            name_lower: fold_case(&name),
            name,
            documentation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name as used for equality, hashing and ordering.
    pub fn name_lower(&self) -> &str {
        &self.name_lower
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }
}

impl PartialEq for BatchCommand {
    fn eq(&self, other: &Self) -> bool {
        self.name_lower == other.name_lower
    }
}

impl Eq for BatchCommand {}

impl Hash for BatchCommand {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name_lower.hash(state);
    }
}

impl PartialOrd for BatchCommand {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BatchCommand {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name_lower.cmp(&other.name_lower)
    }
}

impl fmt::Display for BatchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The known batch commands, in registration order.
///
/// A command registered twice (in any letter case) is kept only once; the first registration
/// stays canonical.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    pool: InterningPool<BatchCommand>,
    commands: Vec<Arc<BatchCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON array of `{"name": ..., "documentation": ...}` objects.
    pub fn from_reader(reader: impl io::Read) -> Result<Self> {
        let commands: Vec<BatchCommand> = serde_json::from_reader(reader)?;
        let mut registry = Self::new();
        for command in commands {
            registry.register(command)?;
        }
        Ok(registry)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading command registry from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Registers `command` and returns its canonical record.
    pub fn register(&mut self, command: BatchCommand) -> Result<Arc<BatchCommand>> {
        if command.name.trim().is_empty() {
            return Err(DocError::EmptyCommandName);
        }

        let command = Arc::new(command);
        let canonical = self.pool.intern_arc(Arc::clone(&command));
        if Arc::ptr_eq(&command, &canonical) {
            tracing::debug!("Registered command {}", canonical.name);
            self.commands.push(Arc::clone(&canonical));
        } else {
            tracing::warn!(
                "Command {} is already registered as {}",
                command.name,
                canonical.name
            );
        }
        Ok(canonical)
    }

    pub fn get(&self, name: &str) -> Option<Arc<BatchCommand>> {
        self.pool.get(&BatchCommand::new(name))
    }

    pub fn commands(&self) -> &[Arc<BatchCommand>] {
        &self.commands
    }

    /// Commands sorted by name, ignoring case.
    pub fn sorted(&self) -> Vec<Arc<BatchCommand>> {
        let mut commands = self.commands.clone();
        commands.sort();
        commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_compare_ignoring_case() {
        let upper = BatchCommand::new("LoadFile");
        let lower = BatchCommand::with_documentation("loadfile", "docs");

        assert_eq!(upper, lower);
        assert_eq!(upper.cmp(&BatchCommand::new("Parse")), Ordering::Less);
        assert_eq!(upper.to_string(), "LoadFile");
    }

    #[test]
    fn non_ascii_names_compare_ignoring_case() {
        let upper = BatchCommand::new("ÉTAPE");
        let lower = BatchCommand::new("étape");

        assert_eq!(upper, lower);
        assert_eq!(upper.name_lower(), "étape");
        assert_ne!(upper, BatchCommand::new("etape"));
    }

    #[test]
    fn json_entries_fold_case_once() {
        let json = r#"[{"name": "ÉTAPE"}, {"name": "étape", "documentation": "second"}]"#;

        let registry = CommandRegistry::from_reader(json.as_bytes()).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.commands()[0].name_lower(), "étape");
        assert_eq!(registry.get("Étape").unwrap().name(), "ÉTAPE");
    }

    #[test]
    fn first_registration_stays_canonical() {
        let mut registry = CommandRegistry::new();

        let first = registry
            .register(BatchCommand::with_documentation("LoadFile", "first"))
            .unwrap();
        let second = registry
            .register(BatchCommand::with_documentation("LOADFILE", "second"))
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.documentation(), Some("first"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn get_ignores_case() {
        let mut registry = CommandRegistry::new();
        let registered = registry.register(BatchCommand::new("VerifyProof")).unwrap();

        let found = registry.get("verifyproof").unwrap();

        assert!(Arc::ptr_eq(&registered, &found));
        assert!(registry.get("Parse").is_none());
    }

    #[test]
    fn sorted_ignores_case() {
        let mut registry = CommandRegistry::new();
        for name in ["verify", "Clear", "alpha", "Beta"] {
            registry.register(BatchCommand::new(name)).unwrap();
        }

        let names: Vec<_> = registry.sorted().iter().map(|c| c.to_string()).collect();

        assert_eq!(names, vec!["alpha", "Beta", "Clear", "verify"]);
        assert_eq!(registry.commands()[0].name(), "verify");
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut registry = CommandRegistry::new();

        let result = registry.register(BatchCommand::new("  "));

        assert!(matches!(result, Err(DocError::EmptyCommandName)));
        assert!(registry.is_empty());
    }

    #[test]
    fn reads_json() {
        let json = r#"[
            {"name": "LoadFile", "documentation": "<p>Loads a file.</p>"},
            {"name": "Clear"}
        ]"#;

        let registry = CommandRegistry::from_reader(json.as_bytes()).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("loadfile").unwrap().documentation(),
            Some("<p>Loads a file.</p>")
        );
        assert_eq!(registry.get("clear").unwrap().documentation(), None);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let result = CommandRegistry::from_reader("{".as_bytes());

        assert!(matches!(result, Err(DocError::Json(_))));
    }
}
