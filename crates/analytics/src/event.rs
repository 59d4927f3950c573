use serde::{Deserialize, Serialize};

/// Category attached to every layer analytics event.
pub const DATA_SOURCE_CATEGORY: &str = "dataSource";

/// What happened to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnalyticsAction {
    #[serde(rename = "added")]
    Added,
    #[serde(rename = "removed")]
    Removed,
    #[serde(rename = "shown")]
    Shown,
    #[serde(rename = "hidden")]
    Hidden,
    #[serde(rename = "zoomTo")]
    ZoomTo,
}

impl AnalyticsAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Shown => "shown",
            Self::Hidden => "hidden",
            Self::ZoomTo => "zoomTo",
        }
    }
}

impl std::fmt::Display for AnalyticsAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single analytics record: `(category, action, label, value?)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub category: String,
    pub action: AnalyticsAction,
    /// Layer name.
    pub label: String,
    /// Elapsed seconds, for `removed` and `hidden`.
    pub value: Option<f64>,
}

impl AnalyticsEvent {
    /// A `dataSource` event for the named layer.
    pub fn data_source(action: AnalyticsAction, label: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            category: DATA_SOURCE_CATEGORY.to_string(),
            action,
            label: label.into(),
            value,
        }
    }
}

impl std::fmt::Display for AnalyticsEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} \"{}\"", self.category, self.action, self.label)?;
        if let Some(v) = self.value {
            write!(f, " value={v:.3}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_source_event_fields() {
        let e = AnalyticsEvent::data_source(AnalyticsAction::Removed, "Rivers", Some(1.5));
        assert_eq!(e.category, "dataSource");
        assert_eq!(e.action, AnalyticsAction::Removed);
        assert_eq!(e.label, "Rivers");
        assert_eq!(e.value, Some(1.5));
    }

    #[test]
    fn action_names_match_wire_form() {
        assert_eq!(AnalyticsAction::ZoomTo.as_str(), "zoomTo");
        let json = serde_json::to_string(&AnalyticsAction::ZoomTo).unwrap();
        assert_eq!(json, "\"zoomTo\"");
    }

    #[test]
    fn display_includes_value_when_present() {
        let with = AnalyticsEvent::data_source(AnalyticsAction::Hidden, "A", Some(2.0));
        let without = AnalyticsEvent::data_source(AnalyticsAction::Shown, "A", None);
        assert_eq!(with.to_string(), "dataSource/hidden \"A\" value=2.000");
        assert_eq!(without.to_string(), "dataSource/shown \"A\"");
    }
}
