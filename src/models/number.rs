//! Lenient numeric fields
//!
//! Amounts typed into forms reach storage either as JSON numbers or as
//! numeric strings. Both are accepted on input; output is always a number.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use tracing::warn;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn into_f64(self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n).filter(|n| n.is_finite()),
            Self::Text(s) => {
                let parsed = parse_number(&s);
                if parsed.is_none() && !s.trim().is_empty() {
                    warn!(value = %s, "discarding non-numeric value");
                }
                parsed
            }
        }
    }
}

/// Parse a trimmed numeric string, treating blank as absent
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a number without a trailing `.0` for whole values
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Number or numeric string; null, blank or garbage become `0`
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(value.and_then(NumberOrText::into_f64).unwrap_or(0.0))
}

/// Number or numeric string; null, blank or garbage become `None`
pub fn lenient_option_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(value.and_then(NumberOrText::into_f64))
}

/// Map of numbers or numeric strings; entries that are not numeric are dropped
pub fn lenient_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, NumberOrText>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value.into_f64().map(|n| (key, n)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "lenient_f64")]
        amount: f64,
    }

    #[derive(Deserialize)]
    struct Limits {
        #[serde(deserialize_with = "lenient_map")]
        limits: BTreeMap<String, f64>,
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("2500"), Some(2500.0));
        assert_eq!(parse_number(" 1500.5 "), Some(1500.5));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(2500.0), "2500");
        assert_eq!(format_number(12.75), "12.75");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_lenient_f64_accepts_strings() {
        let h: Holder = serde_json::from_value(json!({"amount": "42.5"})).unwrap();
        assert_eq!(h.amount, 42.5);

        let h: Holder = serde_json::from_value(json!({"amount": 7})).unwrap();
        assert_eq!(h.amount, 7.0);

        let h: Holder = serde_json::from_value(json!({"amount": null})).unwrap();
        assert_eq!(h.amount, 0.0);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn logs_while<T>(f: impl FnOnce() -> T) -> (T, String) {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        (result, output)
    }

    #[test]
    fn test_non_numeric_amount_is_logged() {
        let (h, output) = logs_while(|| {
            serde_json::from_value::<Holder>(json!({"amount": "12,50"})).unwrap()
        });
        assert_eq!(h.amount, 0.0);
        assert!(output.contains("discarding non-numeric value"));
        assert!(output.contains("12,50"));
    }

    #[test]
    fn test_blank_amount_is_not_logged() {
        let (h, output) = logs_while(|| {
            serde_json::from_value::<Holder>(json!({"amount": "  "})).unwrap()
        });
        assert_eq!(h.amount, 0.0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_lenient_map_drops_garbage() {
        let l: Limits = serde_json::from_value(json!({
            "limits": {"market": 500, "fatura": "750", "bad": "n/a"}
        }))
        .unwrap();

        assert_eq!(l.limits.len(), 2);
        assert_eq!(l.limits["market"], 500.0);
        assert_eq!(l.limits["fatura"], 750.0);
    }
}
