//! Function resolution for runs

use crate::project::{Function, FunctionRegistry};

/// Resolve function names to descriptors.
///
/// No names means every function in registry order. Unknown names are skipped
/// with a warning; the result may be empty.
pub fn resolve_functions(registry: &dyn FunctionRegistry, names: &[String]) -> Vec<Function> {
    if names.is_empty() {
        return registry.all_functions();
    }

    names
        .iter()
        .filter_map(|name| {
            let found = registry.get_function(name);
            if found.is_none() {
                tracing::warn!("could not find function '{}'", name);
            }
            found
        })
        .collect()
}
