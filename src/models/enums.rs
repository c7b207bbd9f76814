//! Shared enums

use serde::{Deserialize, Serialize};

/// Subscription tier. Ordered: Free < Basic < Premium < Vip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    Free,
    Basic,
    Premium,
    #[serde(rename = "VIP")]
    Vip,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Free, Tier::Basic, Tier::Premium, Tier::Vip];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Free => "Free",
            Tier::Basic => "Basic",
            Tier::Premium => "Premium",
            Tier::Vip => "VIP",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "free" => Some(Tier::Free),
            "basic" => Some(Tier::Basic),
            "premium" => Some(Tier::Premium),
            "vip" => Some(Tier::Vip),
            _ => None,
        }
    }
}

/// Sound stem category. A sound palette holds one stem per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StemCategory {
    Drums,
    Bass,
    Melody,
    Pads,
    #[serde(rename = "FX")]
    Fx,
}

impl StemCategory {
    pub const ALL: [StemCategory; 5] = [
        StemCategory::Drums,
        StemCategory::Bass,
        StemCategory::Melody,
        StemCategory::Pads,
        StemCategory::Fx,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StemCategory::Drums => "Drums",
            StemCategory::Bass => "Bass",
            StemCategory::Melody => "Melody",
            StemCategory::Pads => "Pads",
            StemCategory::Fx => "FX",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "drums" => Some(StemCategory::Drums),
            "bass" => Some(StemCategory::Bass),
            "melody" => Some(StemCategory::Melody),
            "pads" => Some(StemCategory::Pads),
            "fx" => Some(StemCategory::Fx),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order() {
        assert!(Tier::Free < Tier::Basic);
        assert!(Tier::Basic < Tier::Premium);
        assert!(Tier::Premium < Tier::Vip);
        assert_eq!(Tier::ALL.iter().max(), Some(&Tier::Vip));
    }

    #[test]
    fn test_parsing() {
        assert_eq!(Tier::from_str("VIP"), Some(Tier::Vip));
        assert_eq!(Tier::from_str("gold"), None);
        assert_eq!(StemCategory::from_str(" fx "), Some(StemCategory::Fx));
        assert_eq!(serde_json::to_string(&StemCategory::Fx).unwrap(), "\"FX\"");
    }
}
