//! Runs the expression type resolver over intentions, in parallel.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::unbounded;
use morph_ast::{Expression, SwiftType};
use morph_intentions::FileIntention;
use parking_lot::RwLock;

use crate::definitions::{
    ArrayDefinitionsSource, CompoundDefinitionsSource, DefinitionsSource, IntentionGlobals,
};
use crate::resolver::ExpressionTypeResolver;
use crate::type_system::IntentionCollectionTypeSystem;

/// Resolved types for the initializers of one file, keyed by global
/// variable index.
type FileResults = (usize, Vec<(usize, Option<SwiftType>)>);

/// Types expressions against the intention collection of its type system.
///
/// Identifiers are looked up, in order, in the file's own globals, in the
/// globals of every file (as of the last [`refresh_intention_globals`]),
/// and in the configured `globals`.
///
/// [`refresh_intention_globals`]: DefaultTypeResolverInvoker::refresh_intention_globals
pub struct DefaultTypeResolverInvoker {
    globals: Arc<dyn DefinitionsSource>,
    type_system: Arc<IntentionCollectionTypeSystem>,
    num_threads: usize,
    intention_globals: RwLock<IntentionGlobals>,
}

impl DefaultTypeResolverInvoker {
    pub fn new(
        globals: Arc<dyn DefinitionsSource>,
        type_system: Arc<IntentionCollectionTypeSystem>,
        num_threads: usize,
    ) -> Self {
        Self {
            globals,
            type_system,
            num_threads: num_threads.max(1),
            intention_globals: RwLock::new(IntentionGlobals::default()),
        }
    }

    pub fn type_system(&self) -> &Arc<IntentionCollectionTypeSystem> {
        &self.type_system
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Re-index the globals declared across the intention collection.
    pub fn refresh_intention_globals(&self) {
        let globals = {
            let intentions = self.type_system.intentions().read_recursive();
            IntentionGlobals::index(&intentions)
        };
        tracing::debug!(definitions = globals.len(), "refreshed intention globals");
        *self.intention_globals.write() = globals;
    }

    pub fn resolve_expression_type(&self, exp: &Expression, in_file: &FileIntention) -> Option<SwiftType> {
        let file_scope = ArrayDefinitionsSource::from_file(in_file);
        let intention_globals = self.intention_globals.read_recursive();
        let scopes = CompoundDefinitionsSource::new(vec![
            &file_scope as &dyn DefinitionsSource,
            &*intention_globals,
            self.globals.as_ref(),
        ]);
        ExpressionTypeResolver::new(self.type_system.as_ref(), &scopes).resolve_type(exp)
    }

    /// Type the initial value of every global variable of every file.
    ///
    /// Workers type files independently while holding a shared lock on the
    /// collection; the results are then written back under the exclusive
    /// lock. Returns how many initializers received a type.
    pub fn resolve_all_expression_types(&self) -> usize {
        let results = self.resolve_files();

        let mut intentions = self.type_system.intentions().write();
        let files = intentions.file_intentions_mut();
        let mut resolved = 0;
        for (file_index, types) in results {
            let Some(file) = files.get_mut(file_index) else {
                continue;
            };
            let variables = file.global_variables_mut();
            for (var_index, ty) in types {
                if let Some(var) = variables.get_mut(var_index) {
                    resolved += usize::from(ty.is_some());
                    var.initial_value_type = ty;
                }
            }
        }
        tracing::debug!(resolved, "applied resolved initializer types");
        resolved
    }

    fn resolve_files(&self) -> Vec<FileResults> {
        let intentions = self.type_system.intentions().read_recursive();
        let files = intentions.file_intentions();
        if files.is_empty() {
            return Vec::new();
        }

        let (job_tx, job_rx) = unbounded::<usize>();
        for index in 0..files.len() {
            if job_tx.send(index).is_err() {
                tracing::warn!(index, files = files.len(), "resolver job queue closed early");
                break;
            }
        }
        drop(job_tx);

        let (result_tx, result_rx) = unbounded::<FileResults>();
        let workers = self.num_threads.min(files.len());
        thread::scope(|scope| {
            for worker in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    let _worker = tracing::debug_span!("resolver_worker", worker).entered();
                    for index in job_rx.iter() {
                        let file = &files[index];
                        let _file = tracing::trace_span!("resolve_file", path = %file.source_path).entered();
                        let types = file
                            .global_variables()
                            .iter()
                            .enumerate()
                            .filter_map(|(var_index, var)| {
                                let exp = var.initial_value.as_ref()?;
                                Some((var_index, self.resolve_expression_type(exp, file)))
                            })
                            .collect();
                        if result_tx.send((index, types)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);
        result_rx.try_iter().collect()
    }
}
