use std::path::Path;

use sp_core::IntoIoError;

use super::EnvironmentDetector;
use crate::{text::parse_properties, DetectError, EnvironmentInfo, ServerProperties};

const SERVER_PROPERTIES: &str = "server.properties";

/// Reads `server.properties` from the server's working
/// directory (which MCDR may have moved elsewhere).
pub struct ServerPropertiesDetector;

impl EnvironmentDetector for ServerPropertiesDetector {
    fn name(&self) -> &'static str {
        SERVER_PROPERTIES
    }

    fn detect(&self, _dir: &Path, env: &mut EnvironmentInfo) -> Result<bool, DetectError> {
        let path = env.working_directory().join(SERVER_PROPERTIES);
        if !path.is_file() {
            return Ok(false);
        }
        let text = std::fs::read_to_string(&path).path(&path)?;
        env.server_properties = Some(ServerProperties {
            entries: parse_properties(&text),
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::McdrEnvironment;

    const PROPERTIES: &str = "#Minecraft server properties\n#Sat Jan 01 00:00:00 UTC 2024\nlevel-name=world\nserver-port=25565\nmotd=A Minecraft Server\n";

    #[test]
    fn reads_properties() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SERVER_PROPERTIES), PROPERTIES).unwrap();

        let mut env = EnvironmentInfo::new(dir.path());
        assert!(ServerPropertiesDetector.detect(dir.path(), &mut env).unwrap());
        let properties = env.server_properties.unwrap();
        assert_eq!(properties.level_name(), Some("world"));
        assert_eq!(properties.server_port(), Some(25565));
        assert_eq!(properties.get("motd"), Some("A Minecraft Server"));
    }

    #[test]
    fn follows_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let server = dir.path().join("server");
        std::fs::create_dir(&server).unwrap();
        std::fs::write(server.join(SERVER_PROPERTIES), PROPERTIES).unwrap();

        let mut env = EnvironmentInfo::new(dir.path());
        assert!(!ServerPropertiesDetector.detect(dir.path(), &mut env).unwrap());

        env.mcdr = Some(McdrEnvironment {
            config_path: dir.path().join("config.yml"),
            working_directory: server,
            plugin_directories: Vec::new(),
            handler: None,
            language: None,
        });
        assert!(ServerPropertiesDetector.detect(dir.path(), &mut env).unwrap());
        assert!(env.server_properties.is_some());
    }
}
