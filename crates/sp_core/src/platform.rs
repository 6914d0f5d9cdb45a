use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The mod-loader (or plain game) that a server
/// executable runs on, or that a package targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    Minecraft,
    Fabric,
    Forge,
    Neoforge,
    /// MCDReforged, a Python server wrapper with its own plugins.
    Mcdr,
    Unknown,
}

impl Platform {
    /// The platform a dependency id refers to, when the id names
    /// the game or a loader itself. Any other id belongs to
    /// `declaring`, the platform of the package declaring it.
    #[must_use]
    pub fn of_dependency(id: &str, declaring: Platform) -> Platform {
        match id {
            "minecraft" => Platform::Minecraft,
            "forge" => Platform::Forge,
            "neoforge" => Platform::Neoforge,
            "fabricloader" | "fabric" => Platform::Fabric,
            "mcdreforged" => Platform::Mcdr,
            _ => declaring,
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Platform::Minecraft => "Minecraft",
                Platform::Fabric => "Fabric",
                Platform::Forge => "Forge",
                Platform::Neoforge => "NeoForge",
                Platform::Mcdr => "MCDReforged",
                Platform::Unknown => "Unknown",
            }
        )
    }
}
