//! Interactive expansion loop.
//!
//! The REPL reads template lines, expands them against a wildcard store,
//! and prints the per-instance results. Colon commands adjust the instance
//! count, seed, and consistency scope between expansions.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use wildcard_engine::{ConsistencyScope, ExpandConfig, Expander};
use wildcard_foundation::{Error, Result};

use crate::store::WildcardStore;

/// The interactive REPL.
pub struct Repl {
    /// The line editor for input.
    editor: DefaultEditor,
    /// The wildcard store backing expansions.
    store: WildcardStore,
    /// Resolution configuration.
    config: ExpandConfig,
    /// Instances per expansion.
    count: usize,
    /// Consistency scope for batches.
    scope: ConsistencyScope,
    /// Fixed base seed, if any.
    seed: Option<u64>,
    /// Whether to show the welcome banner.
    show_banner: bool,
    /// Primary prompt.
    prompt: String,
}

impl Repl {
    /// Creates a new REPL over the given store.
    ///
    /// # Errors
    /// Returns an error if the line editor fails to initialize.
    pub fn new(store: WildcardStore) -> Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| Error::internal(e.to_string()))?;
        Ok(Self {
            editor,
            store,
            config: ExpandConfig::default(),
            count: 1,
            scope: ConsistencyScope::default(),
            seed: None,
            show_banner: true,
            prompt: "wild> ".to_string(),
        })
    }

    /// Sets the instances per expansion.
    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count.max(1);
        self
    }

    /// Sets the consistency scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: ConsistencyScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets a fixed base seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Disables the welcome banner.
    #[must_use]
    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Runs the REPL loop.
    ///
    /// # Errors
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            match self.editor.readline(&self.prompt) {
                Ok(line) => {
                    let trimmed = line.trim().to_string();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(&trimmed);
                    if !self.handle_line(&trimmed) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => return Err(Error::internal(e.to_string())),
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    /// Handles one input line. Returns false to exit.
    fn handle_line(&mut self, line: &str) -> bool {
        match line {
            ":quit" | ":exit" => return false,
            ":help" => self.print_help(),
            ":reload" => {
                self.store.clear_cache();
                println!("wildcard cache cleared");
            }
            ":wildcards" => {
                for name in self.store.names() {
                    println!("{name}");
                }
            }
            _ if line.starts_with(":count") => self.set_count(line),
            _ if line.starts_with(":seed") => self.set_seed(line),
            _ if line.starts_with(":scope") => self.set_scope(line),
            template => self.expand_line(template),
        }
        true
    }

    /// Expands one template line and prints the results.
    fn expand_line(&self, template: &str) {
        let expander = Expander::new(&self.store).with_config(self.config.clone());
        match expander.expand(template, self.count, self.scope, self.seed) {
            Ok(batch) => {
                for (i, outcome) in batch.instances.iter().enumerate() {
                    match outcome {
                        Ok(resolved) => println!("{}", resolved.text),
                        Err(e) => eprintln!("\x1b[31minstance {}: {e}\x1b[0m", i + 1),
                    }
                }
            }
            Err(e) => eprintln!("\x1b[31mError: {e}\x1b[0m"),
        }
    }

    fn set_count(&mut self, line: &str) {
        match line[":count".len()..].trim().parse::<usize>() {
            Ok(count) if count > 0 => {
                self.count = count;
                println!("instances: {count}");
            }
            _ => eprintln!("usage: :count <positive integer>"),
        }
    }

    fn set_seed(&mut self, line: &str) {
        let arg = line[":seed".len()..].trim();
        if arg == "none" {
            self.seed = None;
            println!("seed: fresh entropy per run");
            return;
        }
        match arg.parse::<u64>() {
            Ok(seed) => {
                self.seed = Some(seed);
                println!("seed: {seed}");
            }
            Err(_) => eprintln!("usage: :seed <u64> | :seed none"),
        }
    }

    fn set_scope(&mut self, line: &str) {
        match line[":scope".len()..].trim() {
            "instance" => {
                self.scope = ConsistencyScope::PerInstance;
                println!("scope: per-instance");
            }
            "batch" => {
                self.scope = ConsistencyScope::AcrossBatch;
                println!("scope: across-batch");
            }
            _ => eprintln!("usage: :scope instance | :scope batch"),
        }
    }

    fn print_banner(&self) {
        println!("wildcard {}", env!("CARGO_PKG_VERSION"));
        println!(
            "wildcards dir: {} | type a template, :help for commands",
            self.store.base_dir().display()
        );
    }

    #[allow(clippy::unused_self)]
    fn print_help(&self) {
        println!("  <template>        expand a template, e.g. a [color] {{animal}}");
        println!("  :count <n>        instances per expansion");
        println!("  :seed <n>|none    fix or release the base seed");
        println!("  :scope instance|batch   consistency scope");
        println!("  :wildcards        list available wildcard names");
        println!("  :reload           drop the wildcard file cache");
        println!("  :quit             exit");
    }
}
