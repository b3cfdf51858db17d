//! Tests for error types

use guaranteed_numerics::Error;

#[test]
fn test_numeric_convergence_error() {
    let error = Error::NumericConvergence {
        solver: "berry-esseen sample size",
        reason: "no sign change after 200 expansions".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("did not converge"));
    assert!(error_str.contains("berry-esseen sample size"));
    assert!(error_str.contains("200 expansions"));
}

#[test]
fn test_malformed_samples_error() {
    let error = Error::MalformedSamples {
        requested: 10,
        returned: 7,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("returned 7 samples"));
    assert!(error_str.contains("10 were requested"));
    assert!(error_str.contains("exactly n values"));
}

#[test]
fn test_invalid_sample_error() {
    let error = Error::InvalidSample {
        value: 0.5,
        reason: "Bernoulli samples must be 0 or 1",
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid sample 0.5"));
    assert!(error_str.contains("0 or 1"));
}

#[test]
fn test_malformed_function_output_error() {
    let error = Error::MalformedFunctionOutput {
        expected: 100,
        returned: 1,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("returned 1 values for 100 points"));
    assert!(error_str.contains("vectorized"));
}

#[test]
fn test_non_finite_value_error() {
    let error = Error::NonFiniteValue {
        x: 0.0,
        y: f64::NEG_INFINITY,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("x = 0"));
    assert!(error_str.contains("-inf"));
}

#[test]
fn test_sample_ceiling_error() {
    let error = Error::SampleCeilingExceeded {
        required: 5_000_000,
        ceiling: 1_000_000,
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("5000000"));
    assert!(error_str.contains("ceiling of 1000000"));
    assert!(error_str.contains("Loosen the tolerance"));
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("alpha must lie in (0, 1)".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("alpha must lie in (0, 1)"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: Error = json_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("Configuration error"));
}

#[test]
fn test_other_error() {
    let error = Error::Other("custom error message".to_string());
    let error_str = format!("{error}");
    assert_eq!(error_str, "custom error message");
}

#[test]
fn test_error_debug() {
    let error = Error::MalformedSamples {
        requested: 1,
        returned: 0,
    };
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("MalformedSamples"));
}

#[test]
fn test_result_type_alias() {
    #[allow(clippy::unnecessary_wraps)]
    fn returns_result() -> guaranteed_numerics::Result<i32> {
        Ok(42)
    }

    let result = returns_result();
    assert!(result.is_ok());
    assert_eq!(result.unwrap(), 42);
}

#[test]
fn test_result_type_alias_error() {
    fn returns_error() -> guaranteed_numerics::Result<i32> {
        Err(Error::Other("test error".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
}
