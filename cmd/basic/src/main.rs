//! Basic railway example
//!
//! Walks through value and unit outcomes, nested composition, awaiting
//! Eithers from plain async code, an iterator of outcomes, and Eithers
//! suspended on simulated remote fetches.
//!
//! # Environment Variables
//!
//! - `RAILWAY_FLUSH_EPRINT=1` - Flush debug output immediately
//! - `RAILWAY_LOG_LEVEL=trace` - Show short-circuits and task lifecycle

mod ops;

use railway::{block_on, kinfo, Either, Error, Outcome, Runtime, RuntimeConfig};

use ops::*;

// RAILWAY_LOG_LEVEL=debug cargo run -p railway-basic
fn main() {
    println!("=== Testing Railway Oriented Programming ===\n");

    basic_division();
    unit_validation();
    values_using_units();
    units_using_values();
    complex_composition();
    task_integration();
    iterator_integration();

    if let Err(e) = async_integration() {
        eprintln!("async section skipped: {}", e);
    }

    println!("=== All tests completed ===");
}

fn print_success(msg: &str) {
    println!("[OK] {}", msg);
}

fn print_error(err: &Error) {
    println!("[FAIL] {} (tag: {})", err.message(), err.tag());
}

fn report<T>(outcome: &Outcome<T>, describe: impl FnOnce(&T) -> String) {
    if let Some(err) = outcome.error().get() {
        print_error(err);
    } else if let Some(value) = outcome.value().get() {
        print_success(&describe(value));
    }
    println!();
}

fn basic_division() {
    println!("--- Basic Outcome<f64> ---");

    println!("Test 1: divide_str(\"10.2\", \"5\") - success case");
    report(&divide_str("10.2", "5"), |v| format!("Result = {}", v));

    println!("Test 2: divide_str(\".2\", \"0\") - division by zero");
    report(&divide_str(".2", "0"), |v| format!("Result = {}", v));

    println!("Test 3: divide_str(\"abc\", \"5\") - parse error");
    report(&divide_str("abc", "5"), |v| format!("Result = {}", v));
}

fn unit_validation() {
    println!("--- Outcome<()> Validation ---");

    println!("Test 4: validate_positive(5.0) - success");
    report(&validate_positive(5.0), |_| "Validation passed".into());

    println!("Test 5: validate_positive(-3.0) - failure");
    report(&validate_positive(-3.0), |_| "Validation passed".into());

    println!("Test 6: validate_not_empty(\"\") - failure");
    report(&validate_not_empty(""), |_| "Validation passed".into());
}

fn values_using_units() {
    println!("--- Outcome<f64> using Outcome<()> ---");

    println!("Test 7: safe_sqrt(16.0) - success");
    report(&safe_sqrt(16.0), |v| format!("sqrt(16) = {}", v));

    println!("Test 8: safe_sqrt(-4.0) - validation fails");
    report(&safe_sqrt(-4.0), |v| format!("sqrt(-4) = {}", v));

    println!("Test 9: parse_positive_double(\"3.14\") - success");
    report(&parse_positive_double("3.14"), |v| format!("Parsed: {}", v));

    println!("Test 10: parse_positive_double(\"-5\") - validation fails");
    report(&parse_positive_double("-5"), |v| format!("Parsed: {}", v));
}

fn units_using_values() {
    println!("--- Outcome<()> using Outcome<f64> ---");

    println!("Test 11: process_and_save(\"10\", \"2\", \"output.txt\")");
    report(&process_and_save("10", "2", "output.txt"), |_| "Process and save completed".into());

    println!("Test 12: process_and_save(\"10\", \"0\", \"output.txt\")");
    report(&process_and_save("10", "0", "output.txt"), |_| "Process and save completed".into());

    println!("Test 13: process_and_save(\"10\", \"2\", \"\")");
    report(&process_and_save("10", "2", ""), |_| "Process and save completed".into());

    println!("Test 14: validate_computable(4.0, 2.0) - success");
    report(&validate_computable(4.0, 2.0), |_| "Expression is computable".into());

    println!("Test 15: validate_computable(-1.0, 2.0) - sqrt fails");
    report(&validate_computable(-1.0, 2.0), |_| "Expression is computable".into());
}

fn complex_composition() {
    println!("--- Complex Composition ---");

    println!("Test 16: weighted_average");
    report(&weighted_average(&["10", "20", "30"], &[1.0, 2.0, 3.0]), |v| {
        format!("Weighted average = {}", v)
    });

    println!("Test 17: weighted_average - parse error");
    report(&weighted_average(&["10", "abc", "30"], &[1.0, 2.0, 3.0]), |v| {
        format!("Weighted average = {}", v)
    });

    println!("Test 18: weighted_average - negative weight");
    report(&weighted_average(&["10", "20"], &[1.0, -2.0]), |v| {
        format!("Weighted average = {}", v)
    });

    println!("Test 19: batch_process - all succeed");
    report(&batch_process(&[("10", "2"), ("20", "4"), ("30", "6")]), |_| "Batch completed".into());

    println!("Test 20: batch_process - second fails");
    report(&batch_process(&[("10", "2"), ("20", "0"), ("30", "6")]), |_| "Batch completed".into());
}

/// Plain async code awaiting Eithers: no unwrapping, the caller inspects.
async fn compute_in_task(a: String, b: String) -> f64 {
    const MULTIPLIER: f64 = 500.0;
    const ERROR_SENTINEL: f64 = -1.0;

    let result1 = divide_str(&a, &b).await;

    let mut task2 = divide_str(&b, &a);
    let result2 = (&mut task2).await; // borrows task2

    if !result1.completed() || !result2.completed() {
        return ERROR_SENTINEL;
    }
    match (result1.value().get(), result2.value().get()) {
        (Some(x), Some(y)) => x * MULTIPLIER * y,
        _ => ERROR_SENTINEL,
    }
}

fn task_integration() {
    println!("--- Task Integration ---");
    println!("Demonstrates awaiting Either-returning producers from plain async code\n");

    println!("Test 21: task calling divide_str(\"10\", \"2\") - success");
    let value = block_on(compute_in_task("10".into(), "2".into()));
    if value < 0.0 {
        println!("[INFO] Task detected error from Either");
    } else {
        print_success(&format!("Task result = {}", value));
    }
    println!();

    println!("Test 22: task calling divide_str(\"10\", \"0\") - error");
    let value = block_on(compute_in_task("10".into(), "0".into()));
    if value < 0.0 {
        println!("[INFO] Task detected error from Either");
    } else {
        print_success(&format!("Task result = {}", value));
    }
    println!();
}

fn iterator_integration() {
    println!("--- Iterator Integration ---");
    println!("Demonstrates an iterator yielding Either values\n");

    println!("Test 23: iterator yielding outcomes from batch operations");
    let inputs = [("10", "2"), ("abc", "1"), ("9", "0"), ("7", "7")];
    let outcomes = inputs.iter().map(|(n, d)| divide_str(n, d));
    for (idx, outcome) in outcomes.enumerate() {
        print!("  Item {}: ", idx);
        report(&outcome, |v| format!("Result = {}", v));
    }
}

fn async_integration() -> railway::RuntimeResult<()> {
    println!("--- Async Either Integration ---");
    println!("Demonstrates foreign futures awaited inside an Either");
    println!("Each task simulates an async fetch (200-1000 ms) then divides\n");

    let runtime = Runtime::new(RuntimeConfig::from_env())?;

    let launches = [(" 42", "7"), ("100", "0"), ("abc", "5"), ("50", "2")];
    for (numerator, denominator) in launches {
        println!("Launching: async_divide_str({:?}, {:?})", numerator, denominator);
        let pending = async_divide_str(numerator, denominator);
        runtime.spawn(async move {
            let done: Either<f64, Error> = pending.await;
            print!("Task completed: ");
            report(&done, |v| format!("Result = {}", v));
        })?;
    }

    println!("\nRunning tasks until all complete...\n");
    runtime.run();
    kinfo!("{} live tasks left", runtime.live_tasks());
    println!("All async tasks completed.\n");
    Ok(())
}
