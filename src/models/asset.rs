//! Asset vault entries

use serde::{Deserialize, Serialize};

use super::StemCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    Image,
    Audio,
    Video,
}

/// A file in the asset vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub url: String,
    /// Only meaningful for audio stems
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stem_category: Option<StemCategory>,
}

impl Asset {
    /// Stem category of an audio asset; other asset types never have one
    pub fn stem(&self) -> Option<StemCategory> {
        match self.asset_type {
            AssetType::Audio => self.stem_category,
            _ => None,
        }
    }
}
