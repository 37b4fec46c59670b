use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Propulsion {
    Conventional,
    Electric,
    PluginHybrid,
}

impl Propulsion {
    /// Resolves the two propulsion flags carried by a vehicle record.
    ///
    /// The flags are meant to be mutually exclusive. When both are set the
    /// vehicle is treated as electric.
    pub fn from_flags(
        is_electric: bool,
        is_plugin_hybrid: bool,
    ) -> Self {
        if is_electric {
            Self::Electric
        } else if is_plugin_hybrid {
            Self::PluginHybrid
        } else {
            Self::Conventional
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Conventional => "conventional",
            Self::Electric => "electric",
            Self::PluginHybrid => "plugin_hybrid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "conventional" => Some(Self::Conventional),
            "electric" => Some(Self::Electric),
            "plugin_hybrid" => Some(Self::PluginHybrid),
            _ => None,
        }
    }

    pub fn is_electric(&self) -> bool {
        matches!(self, Self::Electric)
    }

    pub fn is_plugin_hybrid(&self) -> bool {
        matches!(self, Self::PluginHybrid)
    }
}
