use std::time::{SystemTime, UNIX_EPOCH};

use crate::value::{make_number_value, Value};

/// Seconds since the epoch as a double, for wall-clock benchmarks.
pub fn clock(_arg_count: usize, _args: &[Value]) -> Value {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    make_number_value(elapsed.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{as_number, is_number};

    #[test]
    fn clock_returns_a_positive_number() {
        let value = clock(0, &[]);
        assert!(is_number(&value));
        assert!(as_number(&value) > 0.0);
    }
}
