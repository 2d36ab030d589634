//! Run this executable to time one kernel at an arbitrary size.
//! See --help for usage examples.  Remember to run in release mode.

extern crate rand;
extern crate vectorbench;

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rand::distributions::{Distribution, Standard};
use rand::rngs::StdRng;
use rand::SeedableRng;

use vectorbench::{for_each_parallel, num_threads, random, Real};

#[derive(Copy, Clone, Debug, PartialEq)]
enum Kernel {
    Axpy,
    AxpySimd,
    AxpySimdFma,
    GemmTiled,
    GemmBuffered,
    GemmNaive,
}

impl Kernel {
    const ALL: [Kernel; 6] = [Kernel::Axpy, Kernel::AxpySimd, Kernel::AxpySimdFma,
                              Kernel::GemmTiled, Kernel::GemmBuffered, Kernel::GemmNaive];

    fn name(self) -> &'static str {
        match self {
            Kernel::Axpy => "axpy",
            Kernel::AxpySimd => "axpy-simd",
            Kernel::AxpySimdFma => "axpy-simd-fma",
            Kernel::GemmTiled => "gemm-tiled",
            Kernel::GemmBuffered => "gemm-buffered",
            Kernel::GemmNaive => "gemm-naive",
        }
    }

    fn is_gemm(self) -> bool {
        match self {
            Kernel::Axpy | Kernel::AxpySimd | Kernel::AxpySimdFma => false,
            _ => true,
        }
    }
}

impl FromStr for Kernel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, String> {
        Kernel::ALL.iter().copied().find(|k| k.name() == s)
            .ok_or_else(|| format!("Unknown kernel {}", s))
    }
}

#[derive(Debug, Clone)]
struct Options {
    kernel: Kernel,
    size: usize,
    use_f32: bool,
    instances: usize,
}

fn parse_args() -> Result<Options, String> {
    let mut args = std::env::args();
    let _ = args.next();
    let kernel = args.next().ok_or("Expected argument".to_string())?
        .parse::<Kernel>()?;
    let size = args.next().ok_or("Expected argument".to_string())?
        .parse::<usize>().map_err(|e| e.to_string())?;
    let mut opts = Options { kernel, size, use_f32: false, instances: 1 };
    if let Some(arg) = args.next() {
        if arg == "f32" {
            opts.use_f32 = true;
        } else if arg == "f64" {
            //
        } else {
            Err(format!("Unknown argument {}", arg))?;
        }
        // parallel instances
        if let Some(arg) = args.next() {
            opts.instances = arg.parse::<usize>().map_err(|e| e.to_string())?.max(1);
        }
    }
    Ok(opts)
}

fn main() -> Result<(), String> {
    #[cfg(debug_assertions)]
    eprintln!("Warning: running benchmark with debug assertions");

    let opts = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Usage: <command> kernel size [float-type [instances]]");
            eprintln!("Kernels: {}",
                      Kernel::ALL.iter().map(|k| k.name()).collect::<Vec<_>>().join(", "));
            eprintln!("Example: <command> gemm-tiled 1024 f32");
            eprintln!();
            return Err(format!("Error parsing arguments: {}", e));
        }
    };

    if opts.use_f32 {
        run::<f32>(&opts)
    } else {
        run::<f64>(&opts)
    }
}

/// Input and output buffers of one kernel instance
struct Instance<F> {
    a: Vec<F>,
    b: Vec<F>,
    out: Vec<F>,
}

impl<F> Instance<F> where F: Real, Standard: Distribution<F> {
    fn new(kernel: Kernel, size: usize, seed: u64) -> vectorbench::Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        if kernel.is_gemm() {
            Ok(Instance {
                a: random::matrix(&mut rng, size)?,
                b: random::matrix(&mut rng, size)?,
                out: vec![F::zero(); size * size],
            })
        } else {
            Ok(Instance {
                a: Vec::new(),
                b: random::vector(&mut rng, size),
                out: random::vector(&mut rng, size),
            })
        }
    }

    fn run(&mut self, kernel: Kernel, size: usize) -> vectorbench::Result<()> {
        let s = F::from_f64(0.5);
        let Instance { a, b, out } = self;
        match kernel {
            Kernel::Axpy => vectorbench::axpy(s, b, out),
            Kernel::AxpySimd => vectorbench::axpy_simd(s, b, out),
            Kernel::AxpySimdFma => vectorbench::axpy_simd_fma(s, b, out),
            Kernel::GemmTiled => vectorbench::gemm_tiled(a, b, out, size),
            Kernel::GemmBuffered => vectorbench::gemm_buffered(a, b, out, size),
            Kernel::GemmNaive => vectorbench::gemm_naive(a, b, out, size),
        }
    }
}

fn run<F>(opts: &Options) -> Result<(), String>
    where F: Real, Standard: Distribution<F>
{
    let Options { kernel, size, instances, .. } = *opts;
    let mut states = (0..instances)
        .map(|i| Instance::<F>::new(kernel, size, i as u64))
        .collect::<vectorbench::Result<Vec<_>>>()
        .map_err(|e| e.to_string())?;

    // fail early on a bad shape
    states[0].run(kernel, size).map_err(|e| e.to_string())?;

    println!("{} {} size {} instances {} threads {}",
             kernel.name(), std::any::type_name::<F>(), size, instances, num_threads());

    let mut failures = 0;
    let timing = time_runs(10, Duration::from_secs(1), || {
        failures += run_all(&mut states, kernel, size);
    });
    if failures != 0 {
        return Err(format!("{} kernel runs failed", failures));
    }

    println!("{} {} .. mean {} ns, fastest {} ns, median {} ns over {} runs",
             kernel.name(), std::any::type_name::<F>(),
             group_digits(timing.mean), group_digits(timing.fastest),
             group_digits(timing.median), timing.runs);
    // 2 N (axpy) or 2 N³ (gemm) flop per instance
    let flop_per_instance = if kernel.is_gemm() { 2 * size * size * size } else { 2 * size };
    let gflop = (flop_per_instance * instances) as f64 / timing.mean.max(1) as f64;
    println!("    {:.2} Gflop/s", gflop);
    let checksum: f64 = states.iter().flat_map(|s| &s.out).map(|x| x.to_f64()).sum();
    println!("checksum {}", checksum);
    Ok(())
}

/// Run every instance once, spread over the thread pool, and return the
/// number of failed runs
fn run_all<F>(states: &mut [Instance<F>], kernel: Kernel, size: usize) -> usize
    where F: Real, Standard: Distribution<F>
{
    let failures = AtomicUsize::new(0);
    for_each_parallel(states, |state| {
        if state.run(kernel, size).is_err() {
            failures.fetch_add(1, Ordering::Relaxed);
        }
    });
    failures.into_inner()
}

/// Nanosecond timings of repeated runs
struct Timing {
    runs: usize,
    mean: u64,
    median: u64,
    fastest: u64,
}

/// Time `f` at least `min_runs` times and until `budget` has passed, after
/// one untimed warm up run.
fn time_runs(min_runs: usize, budget: Duration, mut f: impl FnMut()) -> Timing {
    f();
    let start = Instant::now();
    let mut samples = Vec::with_capacity(min_runs);
    while samples.len() < min_runs.max(1) || start.elapsed() < budget {
        let t = Instant::now();
        f();
        samples.push(t.elapsed().as_nanos() as u64);
    }
    samples.sort_unstable();
    Timing {
        runs: samples.len(),
        mean: samples.iter().sum::<u64>() / samples.len() as u64,
        median: samples[samples.len() / 2],
        fastest: samples[0],
    }
}

/// `1234567` as `"1 234 567"`
fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kernel_names() {
        for &k in &Kernel::ALL {
            assert_eq!(k.name().parse::<Kernel>(), Ok(k));
        }
        assert!("gemm".parse::<Kernel>().is_err());
    }

    #[test]
    fn failed_runs_are_counted() {
        let mut states = (0..3).map(|i| Instance::<f32>::new(Kernel::GemmTiled, 64, i))
            .collect::<vectorbench::Result<Vec<_>>>().unwrap();
        assert_eq!(run_all(&mut states, Kernel::GemmTiled, 64), 0);
        // 64 × 64 buffers do not hold a 32 × 32 problem
        assert_eq!(run_all(&mut states, Kernel::GemmTiled, 32), 3);
    }

    #[test]
    fn timing_order() {
        let mut calls = 0;
        let t = time_runs(5, Duration::from_millis(0), || calls += 1);
        assert_eq!(t.runs, 5);
        assert_eq!(calls, 6);
        assert!(t.fastest <= t.median);
    }

    #[test]
    fn digit_groups() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1 000");
        assert_eq!(group_digits(1234567), "1 234 567");
    }
}
