//! In-memory command runner for tests
//!
//! Records every command it is asked to run and answers with registered handlers.
//! Commands without a handler succeed with empty output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{CommandIntent, CommandRunner, CommandSpec, RunError};

type Handler = Arc<dyn Fn(&CommandSpec) -> Result<String, RunError> + Send + Sync>;

#[derive(Debug, Clone)]
enum Matcher {
    Argv(Vec<String>),
    Intent(CommandIntent),
    IntentIn(CommandIntent, PathBuf),
}

impl Matcher {
    fn matches(&self, spec: &CommandSpec) -> bool {
        match self {
            Matcher::Argv(argv) => spec.argv() == argv.iter().map(String::as_str).collect::<Vec<_>>(),
            Matcher::Intent(intent) => spec.intent == *intent,
            Matcher::IntentIn(intent, dir) => spec.intent == *intent && spec.dir == *dir,
        }
    }
}

/// Records commands instead of running them
#[derive(Default)]
pub struct FakeCommandRunner {
    executed: Mutex<Vec<CommandSpec>>,
    handlers: Mutex<Vec<(Matcher, Handler)>>,
}

impl FakeCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands whose program and arguments equal `argv`
    pub fn when_running<F>(&self, argv: &[&str], handler: F) -> &Self
    where
        F: Fn(&CommandSpec) -> Result<String, RunError> + Send + Sync + 'static,
    {
        let argv = argv.iter().map(ToString::to_string).collect();
        self.register(Matcher::Argv(argv), handler)
    }

    /// Answer every command with the given intent
    pub fn when_intent<F>(&self, intent: CommandIntent, handler: F) -> &Self
    where
        F: Fn(&CommandSpec) -> Result<String, RunError> + Send + Sync + 'static,
    {
        self.register(Matcher::Intent(intent), handler)
    }

    /// Answer commands with the given intent run in `dir`
    pub fn when_intent_in<F>(&self, intent: CommandIntent, dir: &Path, handler: F) -> &Self
    where
        F: Fn(&CommandSpec) -> Result<String, RunError> + Send + Sync + 'static,
    {
        self.register(Matcher::IntentIn(intent, dir.to_path_buf()), handler)
    }

    /// Make downloads create their destination with a `marker` directory (e.g. `.git`)
    ///
    /// The destination is taken from the command's last argument.
    pub fn simulate_downloads(&self, marker: &'static str) -> &Self {
        self.when_intent(CommandIntent::Download, move |spec| {
            let dest = spec
                .args
                .last()
                .map(|last| spec.dir.join(last))
                .unwrap_or_else(|| spec.dir.clone());
            std::fs::create_dir_all(dest.join(marker)).map_err(|e| RunError::Io {
                command: spec.to_string(),
                message: e.to_string(),
            })?;
            Ok(String::new())
        })
    }

    /// Make current-version commands run in `dir` print `revision`
    pub fn report_revision(&self, dir: &Path, revision: &str) -> &Self {
        let line = format!("{revision}\n");
        self.when_intent_in(CommandIntent::CurrentVersion, dir, move |_| Ok(line.clone()))
    }

    fn register<F>(&self, matcher: Matcher, handler: F) -> &Self
    where
        F: Fn(&CommandSpec) -> Result<String, RunError> + Send + Sync + 'static,
    {
        self.handlers.lock().push((matcher, Arc::new(handler)));
        self
    }

    /// Commands run so far, in order
    pub fn executed_commands(&self) -> Vec<CommandSpec> {
        self.executed.lock().clone()
    }

    /// How many commands with `intent` ran in `dir`
    pub fn count(&self, intent: CommandIntent, dir: &Path) -> usize {
        self.executed
            .lock()
            .iter()
            .filter(|spec| spec.intent == intent && spec.dir == dir)
            .count()
    }

    /// How many downloads targeted `dest`
    pub fn download_count(&self, dest: &Path) -> usize {
        self.executed
            .lock()
            .iter()
            .filter(|spec| spec.intent == CommandIntent::Download)
            .filter(|spec| spec.args.last().is_some_and(|last| spec.dir.join(last) == dest))
            .count()
    }
}

impl CommandRunner for FakeCommandRunner {
    fn run(&self, spec: &CommandSpec) -> Result<String, RunError> {
        self.executed.lock().push(spec.clone());

        // Later registrations override earlier ones
        let handler = self
            .handlers
            .lock()
            .iter()
            .rev()
            .find(|(matcher, _)| matcher.matches(spec))
            .map(|(_, handler)| Arc::clone(handler));

        match handler {
            Some(handler) => handler(spec),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn spec(intent: CommandIntent, argv: &[&str], dir: &Path) -> CommandSpec {
        CommandSpec::new(intent, argv[0], argv[1..].iter().copied(), dir)
    }

    #[test]
    fn test_records_commands_in_order() {
        let runner = FakeCommandRunner::new();
        let dir = Path::new("/work");
        runner.run(&spec(CommandIntent::Checkout, &["git", "checkout", "v1"], dir)).unwrap();
        runner.run(&spec(CommandIntent::CurrentVersion, &["git", "rev-parse", "HEAD"], dir)).unwrap();

        let executed = runner.executed_commands();
        assert_eq!(executed.len(), 2);
        assert_eq!(executed[0].args, vec!["checkout", "v1"]);
        assert_eq!(runner.count(CommandIntent::CurrentVersion, dir), 1);
    }

    #[test]
    fn test_argv_handler_and_override_order() {
        let runner = FakeCommandRunner::new();
        runner.when_intent(CommandIntent::CurrentVersion, |_| Ok("generic\n".to_string()));
        runner.when_running(&["git", "rev-parse", "HEAD"], |_| Ok("some-sha\n".to_string()));

        let out = runner
            .run(&spec(CommandIntent::CurrentVersion, &["git", "rev-parse", "HEAD"], Path::new("/w")))
            .unwrap();
        assert_eq!(out, "some-sha\n");

        let out = runner
            .run(&spec(CommandIntent::CurrentVersion, &["hg", "id", "-i"], Path::new("/w")))
            .unwrap();
        assert_eq!(out, "generic\n");
    }

    #[test]
    fn test_simulated_download_creates_marker() {
        let temp = TempDir::new().unwrap();
        let runner = FakeCommandRunner::new();
        runner.simulate_downloads(".hg");

        let dest = temp.path().join("proj");
        runner
            .run(&spec(
                CommandIntent::Download,
                &["hg", "clone", "https://example.org/proj", "proj"],
                temp.path(),
            ))
            .unwrap();

        assert!(dest.join(".hg").is_dir());
        assert_eq!(runner.download_count(&dest), 1);
    }
}
