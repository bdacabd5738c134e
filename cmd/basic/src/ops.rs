//! Business operations built from composed Outcomes

use std::time::Duration;

use railway::{foreign, sleep, Either, Error, Outcome};

pub fn parse_double(s: &str) -> Outcome<f64> {
    match s.trim().parse::<f64>() {
        Ok(v) => Either::success(v),
        Err(_) => Either::failure(Error::validation(format!("Cannot parse '{}' to double", s))),
    }
}

pub fn divide(numerator: f64, denominator: f64) -> Outcome<f64> {
    if denominator == 0.0 {
        return Either::failure(Error::validation("Cannot divide by 0"));
    }
    Either::success(numerator / denominator)
}

/// Parse both operands and divide; the first failure wins.
pub fn divide_str(numerator: &str, denominator: &str) -> Outcome<f64> {
    let numerator = numerator.to_string();
    let denominator = denominator.to_string();
    Either::produce(move |scope| async move {
        let x = scope.compose(parse_double(&numerator)).await;

        // Explicit branch instead of propagation.
        let y = parse_double(&denominator);
        if y.error().is_present() {
            return y;
        }
        let y = *y.value();

        let result = scope.compose(divide(x, y)).await;
        println!("x = {}, y = {}, result = {}", x, y, result);
        Either::success(result)
    })
}

// ── Unit outcomes ────────────────────────────────────────────────

pub fn validate_positive(value: f64) -> Outcome<()> {
    if value <= 0.0 {
        return Either::failure(Error::validation(format!("Value must be positive, got: {:.6}", value)));
    }
    Either::ok()
}

pub fn validate_not_empty(s: &str) -> Outcome<()> {
    if s.is_empty() {
        return Either::failure(Error::validation("String cannot be empty"));
    }
    Either::ok()
}

pub fn save_to_storage(filename: &str, data: f64) -> Outcome<()> {
    let filename = filename.to_string();
    Either::produce(move |scope| async move {
        scope.compose(validate_not_empty(&filename)).await;
        if filename.contains("..") {
            return Either::failure(Error::validation("Invalid filename: path traversal detected"));
        }
        println!("Saved {} to {}", data, filename);
        Either::ok()
    })
}

// ── Value outcomes gated by unit outcomes ────────────────────────

pub fn safe_sqrt(value: f64) -> Outcome<f64> {
    Either::produce(move |scope| async move {
        scope.compose(validate_positive(value)).await;
        Either::success(value.sqrt())
    })
}

pub fn safe_log(value: f64) -> Outcome<f64> {
    Either::produce(move |scope| async move {
        scope.compose(validate_positive(value)).await;
        Either::success(value.ln())
    })
}

pub fn parse_positive_double(s: &str) -> Outcome<f64> {
    let s = s.to_string();
    Either::produce(move |scope| async move {
        let value = scope.compose(parse_double(&s)).await;
        scope.compose(validate_positive(value)).await;
        Either::success(value)
    })
}

// ── Unit outcomes built from value outcomes ──────────────────────

pub fn process_and_save(numerator: &str, denominator: &str, filename: &str) -> Outcome<()> {
    let (numerator, denominator, filename) =
        (numerator.to_string(), denominator.to_string(), filename.to_string());
    Either::produce(move |scope| async move {
        let result = scope.compose(divide_str(&numerator, &denominator)).await;
        scope.compose(save_to_storage(&filename, result)).await;
        Either::ok()
    })
}

pub fn validate_computable(base: f64, exponent: f64) -> Outcome<()> {
    Either::produce(move |scope| async move {
        scope.compose(safe_sqrt(base)).await;
        scope.compose(safe_log(exponent)).await;
        scope.compose(divide(base, exponent)).await;
        Either::ok()
    })
}

pub fn weighted_average(values: &[&str], weights: &[f64]) -> Outcome<f64> {
    let values: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    let weights = weights.to_vec();
    Either::produce(move |scope| async move {
        if values.len() != weights.len() {
            return Either::failure(Error::validation("Values and weights must have same size"));
        }
        if values.is_empty() {
            return Either::failure(Error::validation("Cannot compute average of empty list"));
        }

        let mut sum = 0.0;
        let mut weight_sum = 0.0;
        for (value, &weight) in values.iter().zip(&weights) {
            scope.compose(validate_positive(weight)).await;
            let v = scope.compose(parse_double(value)).await;
            sum += v * weight;
            weight_sum += weight;
        }
        divide(sum, weight_sum)
    })
}

pub fn batch_process(inputs: &[(&str, &str)]) -> Outcome<()> {
    let inputs: Vec<(String, String)> =
        inputs.iter().map(|(n, d)| (n.to_string(), d.to_string())).collect();
    Either::produce(move |scope| async move {
        for (numerator, denominator) in &inputs {
            scope.compose(divide_str(numerator, denominator)).await;
        }
        println!("Successfully processed {} calculations", inputs.len());
        Either::ok()
    })
}

// ── Foreign producers ────────────────────────────────────────────

/// Simulated remote fetch: echoes `data` after 200-1000 ms
pub async fn fetch(data: String) -> String {
    let jitter = data.bytes().fold(17u64, |h, b| h.wrapping_mul(31).wrapping_add(u64::from(b)));
    sleep(Duration::from_millis(200 + jitter % 800)).await;
    data
}

/// `divide_str` behind two simulated fetches
pub fn async_divide_str(numerator: &str, denominator: &str) -> Outcome<f64> {
    let (numerator, denominator) = (numerator.to_string(), denominator.to_string());
    Either::produce(move |scope| async move {
        let n = scope.compose(foreign(fetch(numerator))).await;
        let d = scope.compose(foreign(fetch(denominator))).await;
        divide_str(&n, &d)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide_str() {
        assert!((*divide_str("10.2", "5").value() - 2.04).abs() < 1e-9);
        assert_eq!(divide_str(".2", "0").error().message(), "Cannot divide by 0");
        assert_eq!(divide_str("abc", "5").error().message(), "Cannot parse 'abc' to double");
    }

    #[test]
    fn test_unit_validations() {
        assert!(validate_positive(5.0).error().is_absent());
        assert_eq!(
            validate_positive(-3.0).error().message(),
            "Value must be positive, got: -3.000000"
        );
        assert_eq!(validate_not_empty("").error().message(), "String cannot be empty");
    }

    #[test]
    fn test_values_gated_by_validation() {
        assert_eq!(*safe_sqrt(16.0).value(), 4.0);
        assert!(safe_sqrt(-4.0).error().is_present());
        assert_eq!(*parse_positive_double("3.14").value(), 3.14);
        assert!(parse_positive_double("-5").error().is_present());
    }

    #[test]
    fn test_process_and_save() {
        assert!(process_and_save("10", "2", "output.txt").completed());
        assert!(process_and_save("10", "2", "output.txt").error().is_absent());
        assert_eq!(process_and_save("10", "0", "output.txt").error().message(), "Cannot divide by 0");
        assert_eq!(process_and_save("10", "2", "").error().message(), "String cannot be empty");
        assert_eq!(
            process_and_save("1", "1", "../etc").error().message(),
            "Invalid filename: path traversal detected"
        );
    }

    #[test]
    fn test_validate_computable() {
        assert!(validate_computable(4.0, 2.0).error().is_absent());
        assert!(validate_computable(-1.0, 2.0).error().is_present());
    }

    #[test]
    fn test_weighted_average() {
        let avg = weighted_average(&["10", "20", "30"], &[1.0, 2.0, 3.0]);
        assert!((*avg.value() - 140.0 / 6.0).abs() < 1e-9);
        assert_eq!(
            weighted_average(&["10", "abc"], &[1.0, 1.0]).error().message(),
            "Cannot parse 'abc' to double"
        );
        assert!(weighted_average(&["10"], &[-1.0]).error().is_present());
        assert!(weighted_average(&[], &[]).error().is_present());
        assert!(weighted_average(&["1"], &[1.0, 2.0]).error().is_present());
    }

    #[test]
    fn test_batch_stops_at_first_failure() {
        assert!(batch_process(&[("10", "2"), ("20", "4")]).error().is_absent());
        assert_eq!(
            batch_process(&[("10", "2"), ("5", "0"), ("x", "1")]).error().message(),
            "Cannot divide by 0"
        );
    }

    #[test]
    fn test_async_divide_is_pending_until_driven() {
        let pending = async_divide_str("50", "2");
        assert!(!pending.completed());
        let done = railway::block_on(pending);
        assert_eq!(*done.value(), 25.0);
    }
}
