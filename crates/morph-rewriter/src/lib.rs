//! Objective-C header to Swift intention rewriting.
//!
//! [`Rewriter`] drives the pipeline: each header is parsed and turned into a
//! [`FileIntention`](morph_intentions::FileIntention); [`Rewriter::run`] then
//! applies the intention passes, folds `#define` constants into typed global
//! constants and types every global initializer.
//!
//! The pieces are usable on their own:
//! - [`IntentionCollectionTypeSystem`] merges declarations of one type;
//! - [`DefaultTypeResolverInvoker`] types expressions against the program;
//! - [`PreprocessorDirectiveConverter`] folds a single directive.

pub mod config;
pub mod definitions;
pub mod generation;
pub mod invoker;
pub mod passes;
pub mod preprocessor;
pub mod reader;
pub mod resolver;
pub mod type_mapper;
pub mod type_system;

use std::fmt;
use std::sync::Arc;

use morph_common::diagnostics::Diagnostics;
use morph_common::span::LineIndex;
use morph_intentions::{GlobalVariableIntention, IntentionCollection};
use morph_types::ValueStorage;
use parking_lot::RwLock;

pub use config::{ConfigError, PassesConfig, RewriterConfig};
pub use definitions::{ArrayDefinitionsSource, CodeDefinition, CodeDefinitionKind, DefinitionsSource};
pub use generation::IntentionGenerator;
pub use invoker::DefaultTypeResolverInvoker;
pub use passes::{IntentionPass, PropertyMergePass, RemoveEmptyExtensionsPass};
pub use preprocessor::{DirectiveConversion, PreprocessorDirectiveConverter};
pub use reader::SwiftExprReader;
pub use resolver::ExpressionTypeResolver;
pub use type_mapper::TypeMapper;
pub use type_system::IntentionCollectionTypeSystem;

pub const DIRECTIVE_TAG: &str = "PreprocessorDirectiveConverter";

/// A directive waiting to be folded, with its one-based source line.
struct PendingDirective {
    path: String,
    text: String,
    line: u32,
}

/// What a [`Rewriter::run`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    pub files: usize,
    pub merged_accessors: usize,
    pub removed_extensions: usize,
    pub converted_directives: usize,
    pub typed_initializers: usize,
    /// Every intention's history, when `print_intention_history` is set.
    pub history: Option<String>,
}

impl fmt::Display for RewriteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s): {} accessor(s) merged, {} empty extension(s) removed, {} directive(s) converted, {} initializer(s) typed",
            self.files,
            self.merged_accessors,
            self.removed_extensions,
            self.converted_directives,
            self.typed_initializers
        )?;
        if let Some(history) = &self.history {
            write!(f, "\n{history}")?;
        }
        Ok(())
    }
}

pub struct Rewriter {
    config: RewriterConfig,
    intentions: Arc<RwLock<IntentionCollection>>,
    invoker: Arc<DefaultTypeResolverInvoker>,
    diagnostics: Diagnostics,
    directives: Vec<PendingDirective>,
}

impl Rewriter {
    pub fn new(config: RewriterConfig) -> Self {
        Self::with_globals(config, Arc::new(ArrayDefinitionsSource::default()))
    }

    /// A rewriter whose expressions may also refer to `globals`.
    pub fn with_globals(config: RewriterConfig, globals: Arc<dyn DefinitionsSource>) -> Self {
        let intentions = Arc::new(RwLock::new(IntentionCollection::new()));
        let type_system = Arc::new(IntentionCollectionTypeSystem::new(Arc::clone(&intentions)));
        let invoker = Arc::new(DefaultTypeResolverInvoker::new(globals, type_system, config.num_threads));
        Self {
            config,
            intentions,
            invoker,
            diagnostics: Diagnostics::new(),
            directives: Vec::new(),
        }
    }

    /// Parse one header into the collection. Syntax errors are recorded in
    /// [`diagnostics`](Self::diagnostics) under `path`; whatever parsed is
    /// kept. Returns whether the header parsed without errors.
    pub fn add_header(&mut self, path: &str, source: &str) -> bool {
        let _span = tracing::debug_span!("add_header", path).entered();
        let parse = morph_parser::parse_with_diagnostics(source, &self.diagnostics.with_origin(path));
        let file = IntentionGenerator::new(path, source).generate(parse.root());

        let lines = LineIndex::new(source);
        self.directives.extend(parse.directives().iter().map(|directive| PendingDirective {
            path: path.to_string(),
            text: directive.text.clone(),
            line: lines.line_col(directive.span.start).0,
        }));
        self.intentions.write().add_intention(file);
        parse.ok()
    }

    pub fn run(&mut self) -> RewriteSummary {
        let _span = tracing::debug_span!("rewrite").entered();
        let mut summary = RewriteSummary::default();
        {
            let mut intentions = self.intentions.write();
            summary.files = intentions.file_intentions().len();
            if self.config.passes.property_merge {
                summary.merged_accessors = PropertyMergePass.apply(&mut intentions);
            }
            if self.config.passes.remove_empty_extensions {
                summary.removed_extensions = RemoveEmptyExtensionsPass.apply(&mut intentions);
            }
        }

        self.invoker.refresh_intention_globals();
        summary.converted_directives = self.convert_directives();
        self.invoker.refresh_intention_globals();
        summary.typed_initializers = self.invoker.resolve_all_expression_types();

        if self.config.print_intention_history {
            summary.history = Some(history_report(&self.intentions.read()));
        }
        tracing::debug!(%summary, "rewrite finished");
        summary
    }

    /// Fold pending directives in source order, each one seeing the
    /// constants folded before it.
    fn convert_directives(&mut self) -> usize {
        let converter = PreprocessorDirectiveConverter::new(Arc::clone(&self.invoker));
        let mut converted = 0;
        for pending in std::mem::take(&mut self.directives) {
            let conversion = {
                let intentions = self.intentions.read();
                let Some(file) = intentions.intention_for(&pending.path) else {
                    continue;
                };
                converter.convert(&pending.text, file)
            };
            let Some(conversion) = conversion else {
                continue;
            };

            let mut constant =
                GlobalVariableIntention::new(conversion.name.as_str(), ValueStorage::constant(conversion.ty))
                    .with_initial_value(conversion.expression);
            constant.history.record(
                DIRECTIVE_TAG,
                format!(
                    "Converted from directive `{}` at {} line {}",
                    pending.text.trim(),
                    pending.path,
                    pending.line
                ),
            );
            if let Some(file) = self.intentions.write().intention_for_mut(&pending.path) {
                file.add_global_variable(constant);
                converted += 1;
            }
            self.invoker.refresh_intention_globals();
        }
        converted
    }

    pub fn intentions(&self) -> &Arc<RwLock<IntentionCollection>> {
        &self.intentions
    }

    pub fn invoker(&self) -> &Arc<DefaultTypeResolverInvoker> {
        &self.invoker
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn config(&self) -> &RewriterConfig {
        &self.config
    }
}

/// One block per file: the file's own history, then each type and member.
fn history_report(intentions: &IntentionCollection) -> String {
    let mut out = String::new();
    for file in intentions.file_intentions() {
        out.push_str(&format!("{}:\n", file.target_path));
        push_history(&mut out, 1, &file.history.summary());
        for ty in file.type_intentions() {
            out.push_str(&format!("  {}:\n", ty.type_name));
            push_history(&mut out, 2, &ty.history.summary());
            for property in &ty.properties {
                push_history(&mut out, 2, &property.history.summary());
            }
            for method in &ty.methods {
                push_history(&mut out, 2, &method.history.summary());
            }
        }
        for var in file.global_variables() {
            push_history(&mut out, 1, &var.history.summary());
        }
    }
    out
}

fn push_history(out: &mut String, depth: usize, summary: &str) {
    for line in summary.lines() {
        out.push_str(&"  ".repeat(depth));
        out.push_str(line);
        out.push('\n');
    }
}
