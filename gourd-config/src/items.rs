use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;

use crate::ConfigError;

/// Which key carries the tag payload when items are written as interchange records.
#[derive(Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum NbtEncoding {
    /// `nbt_b64`
    #[default]
    Base64,
    /// `nbt_hex`, easier to eyeball while debugging
    Hex,
}

#[serde_inline_default]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemConfig {
    /// JSON table of item kinds. The table bundled with the server is used when unset.
    #[serde(default)]
    pub item_table: Option<PathBuf>,
    /// JSON list of creative inventory records. The bundled list is used when unset.
    #[serde(default)]
    pub creative_items: Option<PathBuf>,
    #[serde_inline_default(NbtEncoding::Base64)]
    pub interchange_nbt: NbtEncoding,
}

impl ItemConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.item_table, &self.creative_items].into_iter().flatten() {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(
                    "item data paths must not be empty, remove the key to use the bundled data"
                        .to_string(),
                ));
            }
        }
        Ok(())
    }
}
