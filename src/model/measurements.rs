use std::collections::HashSet;

use crate::model::error::LogError;

/// A value with a canonical, deterministic string form that parses back to the same number.
///
/// Floats use the shortest string that round-trips in their own precision, so `0.1f32` is
/// written as `0.1` rather than the widened `0.10000000149011612`. Reading the log back yields
/// the `f64` nearest to that decimal, which narrows to the original `f32` again.
pub trait Scalar {
    fn to_field(&self) -> String;
}

macro_rules! impl_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                fn to_field(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_scalar!(f64, f32, i32, i64, u32, u64, usize);

/// The named values recorded at one iteration, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurements {
    fields: Vec<(String, String)>,
}

impl Measurements {
    pub fn new() -> Self {
        Measurements { fields: Vec::new() }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Scalar) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Scalar) {
        self.fields.push((name.into(), value.to_field()));
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Checks that the set can be written as an unquoted header row.
    pub fn validate(&self) -> Result<(), LogError> {
        if self.fields.is_empty() {
            return Err(LogError::InvalidField(
                "measurement set is empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in self.names() {
            if name.is_empty() {
                return Err(LogError::InvalidField("empty field name".to_string()));
            }
            if name.contains([',', '"', '\r', '\n']) {
                return Err(LogError::InvalidField(format!(
                    "field name {:?} contains a delimiter, quote or line break",
                    name
                )));
            }
            if !seen.insert(name) {
                return Err(LogError::InvalidField(format!(
                    "field name {:?} appears more than once",
                    name
                )));
            }
        }

        Ok(())
    }
}

impl<K: Into<String>, V: Scalar> FromIterator<(K, V)> for Measurements {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut measurements = Measurements::new();
        for (name, value) in iter {
            measurements.insert(name, value);
        }
        measurements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_insertion_order() {
        let m = Measurements::new().with("loss", 0.9).with("acc", 0.1);
        assert_eq!(m.names().collect::<Vec<_>>(), vec!["loss", "acc"]);
        assert_eq!(m.values().collect::<Vec<_>>(), vec!["0.9", "0.1"]);
    }

    #[test]
    fn test_scalar_formatting_round_trips() {
        let m = Measurements::new()
            .with("a", 1.0f64)
            .with("b", 42u64)
            .with("c", -3i32)
            .with("d", 0.1f64 + 0.2f64);
        let values: Vec<&str> = m.values().collect();
        assert_eq!(values[0], "1");
        assert_eq!(values[1], "42");
        assert_eq!(values[2], "-3");
        assert_eq!(values[3].parse::<f64>().unwrap(), 0.1 + 0.2);
    }

    #[test]
    fn test_f32_written_in_shortest_form() {
        let m = Measurements::new().with("lr", 0.1f32).with("eps", 1e-7f32);
        let values: Vec<&str> = m.values().collect();
        assert_eq!(values, vec!["0.1", "0.0000001"]);
        assert_eq!(values[0].parse::<f64>().unwrap() as f32, 0.1f32);
        assert_eq!(values[1].parse::<f64>().unwrap() as f32, 1e-7f32);
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let m = Measurements::new().with("loss", 1.0).with("loss", 2.0);
        assert!(matches!(m.validate(), Err(LogError::InvalidField(_))));
    }

    #[test]
    fn test_rejects_delimiters_in_names() {
        let m = Measurements::new().with("a,b", 1.0);
        assert!(m.validate().is_err());
        let m = Measurements::new().with("a\nb", 1.0);
        assert!(m.validate().is_err());
        let m = Measurements::new().with("", 1.0);
        assert!(m.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_set() {
        assert!(Measurements::new().validate().is_err());
    }

    #[test]
    fn test_from_iterator() {
        let m: Measurements = vec![("x", 1.5), ("y", 2.5)].into_iter().collect();
        assert_eq!(m.len(), 2);
        assert!(m.validate().is_ok());
    }
}
