//! Catalog compilation - builds instances in parallel
//!
//! Building one instance is a pure function of the registry and its request,
//! so requests are built on a worker pool and the catalog is assembled
//! afterwards, in request order.

use crate::catalog::Catalog;
use crate::context::{NoProgress, ProgressCallback};
use crate::error::{Error, Result};
use crate::instance::ResourceInstance;
use crate::registry::Registry;
use crate::types::{CompileOptions, ResourceRequest};
use rayon::prelude::*;

/// Result of compiling a set of requests
#[derive(Debug, Default)]
pub struct CompileOutcome {
    /// Every instance that built and was unique
    pub catalog: Catalog,
    /// Every request that failed, in request order
    pub failures: Vec<Error>,
}

impl CompileOutcome {
    /// Check if every request compiled
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of requests handled
    pub fn total(&self) -> usize {
        self.catalog.len() + self.failures.len()
    }
}

/// Compile requests into a catalog
///
/// A failing request never stops the others; its error is recorded in the
/// outcome. Only failure to start the worker pool is returned as an error.
pub fn compile<P: ProgressCallback>(
    registry: &Registry,
    requests: &[ResourceRequest],
    opts: &CompileOptions,
    progress: &mut P,
) -> Result<CompileOutcome> {
    progress.on_start(requests.len());

    let built = if opts.jobs <= 1 || requests.len() <= 1 {
        build_sequential(registry, requests, opts)
    } else {
        build_parallel(registry, requests, opts)?
    };

    let mut outcome = CompileOutcome::default();
    for (request, result) in requests.iter().zip(built) {
        let resource = request.resource_ref();
        match result.and_then(|instance| outcome.catalog.add(instance)) {
            Ok(()) => progress.on_resource_complete(&resource, None),
            Err(e) => {
                progress.on_resource_complete(&resource, Some(&e));
                outcome.failures.push(e);
            }
        }
    }

    progress.on_complete(outcome.catalog.len(), outcome.failures.len());
    Ok(outcome)
}

fn build_sequential(
    registry: &Registry,
    requests: &[ResourceRequest],
    opts: &CompileOptions,
) -> Vec<Result<ResourceInstance>> {
    requests
        .iter()
        .map(|request| registry.build(request, opts.mode))
        .collect()
}

/// Build requests in parallel using rayon
fn build_parallel(
    registry: &Registry,
    requests: &[ResourceRequest],
    opts: &CompileOptions,
) -> Result<Vec<Result<ResourceInstance>>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.jobs)
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))?;

    // par_iter().map().collect() preserves request order
    Ok(pool.install(|| {
        requests
            .par_iter()
            .map(|request| registry.build(request, opts.mode))
            .collect()
    }))
}

/// Simple compilation without callbacks
pub fn compile_simple(
    registry: &Registry,
    requests: &[ResourceRequest],
    opts: &CompileOptions,
) -> Result<CompileOutcome> {
    compile(registry, requests, opts, &mut NoProgress)
}
