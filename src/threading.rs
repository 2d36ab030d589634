// Copyright 2024 vectorbench authors
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Running independent kernel instances side by side.
//!
//! The kernels themselves are single threaded. With the `threading`
//! feature a process wide thread tree is created on first use, sized by the
//! `VECTORBENCH_NUM_THREADS` environment variable or else the number of
//! physical cores.

use std::str::FromStr;

use once_cell::sync::Lazy;

#[cfg(feature="threading")]
use thread_tree::ThreadTree as ThreadPool;
#[cfg(feature="threading")]
use thread_tree::ThreadTreeCtx as ThreadPoolCtx;

/// Dummy threadpool
#[cfg(not(feature="threading"))]
struct ThreadPool;

#[cfg(not(feature="threading"))]
type ThreadPoolCtx<'a> = &'a ();

#[cfg(not(feature="threading"))]
impl ThreadPool {
    /// Get top dummy thread pool context
    fn top(&self) -> ThreadPoolCtx<'_> { &() }
}

const NUM_THREADS_VAR: &str = "VECTORBENCH_NUM_THREADS";

struct Registry {
    nthreads: usize,
    #[cfg(feature="threading")]
    thread_pool: Box<ThreadPool>,
}

impl Registry {
    fn thread_pool(&self) -> &ThreadPool {
        #[cfg(feature="threading")]
        return &self.thread_pool;
        #[cfg(not(feature="threading"))]
        return &ThreadPool;
    }
}

/// Parse a thread count setting; empty or missing means `default`
fn parse_num_threads(var: Option<&str>, default: usize) -> usize {
    match var {
        Some(s) if !s.is_empty() => {
            match usize::from_str(s) {
                Ok(nt) => 1.max(nt),
                Err(_) => {
                    log::warn!("Failed to parse {}={:?}, using 1 thread", NUM_THREADS_VAR, s);
                    1
                }
            }
        }
        _otherwise => default,
    }
}

#[cfg(feature="threading")]
fn default_num_threads() -> usize {
    num_cpus::get_physical()
}

#[cfg(not(feature="threading"))]
fn default_num_threads() -> usize {
    1
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let var = std::env::var(NUM_THREADS_VAR).ok();
    let threads = parse_num_threads(var.as_deref(), default_num_threads());

    #[cfg(feature="threading")]
    let registry = {
        let tp = if threads <= 1 {
            Box::new(ThreadPool::new_level0())
        } else if threads <= 3 {
            ThreadPool::new_with_level(1)
        } else {
            ThreadPool::new_with_level(2)
        };
        Registry { nthreads: threads, thread_pool: tp }
    };
    #[cfg(not(feature="threading"))]
    let registry = {
        if threads > 1 {
            log::debug!("{}={} has no effect without the threading feature",
                        NUM_THREADS_VAR, threads);
        }
        Registry { nthreads: 1 }
    };

    log::debug!("thread pool with {} threads", registry.nthreads);
    registry
});

/// Number of threads [`for_each_parallel`] spreads work over.
///
/// Always 1 without the `threading` feature.
pub fn num_threads() -> usize {
    REGISTRY.nthreads
}

/// Call `f` on every element of `states`, spread over the thread pool.
///
/// Each state should own the buffers of one kernel instance, so that no
/// two threads touch the same output. Without the `threading` feature the
/// calls run in order on the current thread.
///
/// ```
/// let mut outputs = vec![vec![0f64; 64]; 4];
/// let data = vec![1f64; 64];
/// vectorbench::for_each_parallel(&mut outputs, |out| {
///     vectorbench::axpy_simd_fma(2., &data, out).unwrap();
/// });
/// assert!(outputs.iter().flatten().all(|&x| x == 2.));
/// ```
pub fn for_each_parallel<S, F>(states: &mut [S], f: F)
    where S: Send,
          F: Fn(&mut S) + Sync,
{
    let pool = REGISTRY.thread_pool();
    split_join(pool.top(), states, &f)
}

#[cfg(feature="threading")]
fn split_join<S, F>(ctx: ThreadPoolCtx<'_>, states: &mut [S], f: &F)
    where S: Send,
          F: Fn(&mut S) + Sync,
{
    match states.len() {
        0 => {}
        1 => f(&mut states[0]),
        len => {
            let (a, b) = states.split_at_mut(len / 2);
            ctx.join(|ctx| split_join(ctx, a, f), |ctx| split_join(ctx, b, f));
        }
    }
}

#[cfg(not(feature="threading"))]
fn split_join<S, F>(_ctx: ThreadPoolCtx<'_>, states: &mut [S], f: &F)
    where F: Fn(&mut S),
{
    for state in states {
        f(state)
    }
}
