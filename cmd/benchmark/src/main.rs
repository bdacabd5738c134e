//! Recursive propagation benchmark
//!
//! Times a chain of `depth` nested calls where the innermost (or an early)
//! level fails, propagated four ways:
//!
//! - composed Eithers (`scope.compose(..).await`)
//! - panic + `catch_unwind`
//! - tuple returns checked by hand at every level
//! - `Result` with `?`
//!
//! Usage: `benchmark [iterations]` (default 20000)

use std::hint::black_box;
use std::panic;
use std::thread;
use std::time::{Duration, Instant};

use railway::{kinfo, Either};

const DEPTHS: [i32; 5] = [10, 50, 100, 200, 300];

fn recursive_compose(depth: i32, error_at: i32) -> Either<i32, String> {
    Either::produce(move |scope| async move {
        if error_at == 0 {
            return Either::failure(format!("Error at depth {}", depth));
        }
        if depth == 0 {
            return Either::success(depth);
        }
        let result = scope.compose(recursive_compose(depth - 1, error_at - 1)).await;
        Either::success(result)
    })
}

#[inline(never)]
fn recursive_panic(depth: i32, error_at: i32) -> i32 {
    if error_at == 0 {
        panic::panic_any(format!("Error at depth {}", depth));
    }
    if depth == 0 {
        return depth;
    }
    recursive_panic(depth - 1, error_at - 1)
}

#[inline(never)]
fn recursive_tuple(depth: i32, error_at: i32) -> (i32, String) {
    if error_at == 0 {
        return (-1, format!("Error at depth {}", depth));
    }
    if depth == 0 {
        return (depth, String::new());
    }
    let result = recursive_tuple(depth - 1, error_at - 1);
    if result.0 < 0 {
        return (-1, result.1);
    }
    result
}

#[inline(never)]
fn recursive_result(depth: i32, error_at: i32) -> Result<i32, String> {
    if error_at == 0 {
        return Err(format!("Error at depth {}", depth));
    }
    if depth == 0 {
        return Ok(depth);
    }
    let result = recursive_result(depth - 1, error_at - 1)?;
    Ok(result)
}

fn time<F: FnMut()>(iterations: u32, mut f: F) -> Duration {
    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    start.elapsed() / iterations
}

fn run_case(label: &str, iterations: u32, depth: i32, error_at: i32) {
    let compose = time(iterations, || {
        let _ = black_box(recursive_compose(black_box(depth), black_box(error_at)));
    });
    let unwind = time(iterations, || {
        let _ = black_box(panic::catch_unwind(|| recursive_panic(black_box(depth), black_box(error_at))));
    });
    let tuple = time(iterations, || {
        let _ = black_box(recursive_tuple(black_box(depth), black_box(error_at)));
    });
    let result = time(iterations, || {
        let _ = black_box(recursive_result(black_box(depth), black_box(error_at)));
    });

    let fmt = |d: Duration| format!("{:.3?}", d);
    println!(
        "{:<12} depth={:<4} compose={:>10}  panic={:>10}  tuple={:>10}  result={:>10}",
        label,
        depth,
        fmt(compose),
        fmt(unwind),
        fmt(tuple),
        fmt(result)
    );
}

fn main() {
    let iterations: u32 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(20_000);

    println!("=== Railway Recursive Benchmark ===\n");
    println!("Iterations per case: {}\n", iterations);

    // Unwinding benchmarks would print a message per iteration.
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));

    // Nested productions recurse on the native stack.
    let worker = thread::Builder::new()
        .name("railway-bench".into())
        .stack_size(256 * 1024 * 1024)
        .spawn(move || {
            for depth in DEPTHS {
                run_case("success", iterations, depth, depth + 100);
            }
            println!();
            for depth in DEPTHS {
                run_case("early-error", iterations, depth, depth / 10);
            }
        });

    let joined = match worker {
        Ok(handle) => handle.join().is_ok(),
        Err(e) => {
            eprintln!("failed to spawn benchmark thread: {}", e);
            false
        }
    };

    panic::set_hook(default_hook);
    kinfo!("benchmark finished (ok={})", joined);
    println!("\n=== Benchmark Complete ===");
}
