use serde::{Deserialize, Serialize};

/// One entry of the data-source catalog: a column reference and its human label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceOption {
    pub value: String,

    #[serde(default)]
    pub label: String,
}

impl DataSourceOption {
    pub fn new<V: Into<String>, L: Into<String>>(value: V, label: L) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Read-only lookup from data-source reference to display label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataSourceOptions {
    options: Vec<DataSourceOption>,
}

impl DataSourceOptions {
    pub fn new(options: Vec<DataSourceOption>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[DataSourceOption] {
        &self.options
    }

    /// Label of the first entry for `reference`, if that entry has a non-empty label
    pub fn label_for(&self, reference: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|opt| opt.value == reference)
            .map(|opt| opt.label.as_str())
            .filter(|label| !label.is_empty())
    }
}

impl FromIterator<DataSourceOption> for DataSourceOptions {
    fn from_iter<T: IntoIterator<Item = DataSourceOption>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins_and_blank_labels_are_ignored() {
        let options: DataSourceOptions = vec![
            DataSourceOption::new("col1", ""),
            DataSourceOption::new("col2", "Revenue"),
            DataSourceOption::new("col2", "Shadowed"),
        ]
        .into_iter()
        .collect();

        assert_eq!(options.label_for("col1"), None);
        assert_eq!(options.label_for("col2"), Some("Revenue"));
        assert_eq!(options.label_for("col9"), None);
    }
}
