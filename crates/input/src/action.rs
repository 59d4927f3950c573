use std::str::FromStr;

/// A UI action addressed to a single layer.
///
/// Toggle buttons, checkboxes and scripted commands all reduce to these; the
/// catalog consumes actions, never raw UI events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerAction {
    Enable,
    Disable,
    ToggleEnabled,
    Show,
    Hide,
    ToggleShown,
    ToggleLegend,
    /// Fly the active camera(s) to the layer's extent.
    ZoomTo,
}

impl LayerAction {
    /// Canonical verb used in the text form.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::ToggleEnabled => "toggle-enabled",
            Self::Show => "show",
            Self::Hide => "hide",
            Self::ToggleShown => "toggle-shown",
            Self::ToggleLegend => "toggle-legend",
            Self::ZoomTo => "zoom",
        }
    }
}

/// Errors from parsing actions and commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseActionError {
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error("command `{0}` has no layer name (expected `action:Layer Name`)")]
    MissingTarget(String),
}

impl FromStr for LayerAction {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.trim().to_ascii_lowercase().as_str() {
            "enable" | "add" => Self::Enable,
            "disable" | "remove" => Self::Disable,
            "toggle-enabled" | "toggle" => Self::ToggleEnabled,
            "show" => Self::Show,
            "hide" => Self::Hide,
            "toggle-shown" => Self::ToggleShown,
            "toggle-legend" | "legend" => Self::ToggleLegend,
            "zoom" | "zoom-to" => Self::ZoomTo,
            other => return Err(ParseActionError::UnknownAction(other.to_string())),
        };
        Ok(action)
    }
}

impl std::fmt::Display for LayerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// An action plus the name of the layer it targets, e.g. `enable:Coastline`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerCommand {
    pub action: LayerAction,
    pub target: String,
}

impl FromStr for LayerCommand {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((verb, target)) = s.split_once(':') else {
            return Err(ParseActionError::MissingTarget(s.to_string()));
        };
        let target = target.trim();
        if target.is_empty() {
            return Err(ParseActionError::MissingTarget(s.to_string()));
        }
        Ok(Self {
            action: verb.parse()?,
            target: target.to_string(),
        })
    }
}

impl std::fmt::Display for LayerCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.action, self.target)
    }
}
