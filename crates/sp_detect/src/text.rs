//! Line oriented formats: `.properties` files and jar manifests.

use std::collections::BTreeMap;

/// Reads `key=value` lines, skipping blank lines
/// and `#`/`!` comments. Later keys overwrite earlier ones.
#[must_use]
pub fn parse_properties(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|n| !n.is_empty() && !n.starts_with('#') && !n.starts_with('!'))
        .filter_map(|n| n.split_once('='))
        .map(|(a, b)| (a.trim().to_owned(), b.trim().to_owned()))
        .collect()
}

/// Splits a `META-INF/MANIFEST.MF` into logical lines.
///
/// Physical lines are wrapped at 72 bytes, a line
/// starting with a single space continues the previous one.
#[must_use]
pub fn manifest_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let (Some(rest), Some(last)) = (line.strip_prefix(' '), lines.last_mut()) {
            last.push_str(rest);
        } else {
            lines.push(line.to_owned());
        }
    }
    lines
}

/// The value of the first `key: value` line.
#[must_use]
pub fn manifest_attribute<'a>(lines: &'a [String], key: &str) -> Option<&'a str> {
    lines.iter().find_map(|line| attribute_value(line, key))
}

fn attribute_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let (k, v) = line.split_once(':')?;
    (k.trim() == key).then(|| v.trim())
}

/// Finds the line `marker_key: marker_value` and reads
/// `key` from the line exactly `offset` lines below it.
///
/// Forge manifests group attributes into per-package sections
/// in a fixed order, so e.g. `Specification-Version` sits
/// two lines under `Specification-Title: Minecraft`.
///
/// `None` if the marker is missing, appears more than once,
/// or the line at `offset` isn't `key`.
#[must_use]
pub fn value_after_marker<'a>(
    lines: &'a [String],
    (marker_key, marker_value): (&str, &str),
    offset: usize,
    key: &str,
) -> Option<&'a str> {
    let mut markers = lines.iter().enumerate().filter(|(_, line)| {
        attribute_value(line, marker_key).is_some_and(|n| n.eq_ignore_ascii_case(marker_value))
    });
    let (index, _) = markers.next()?;
    if markers.next().is_some() {
        return None;
    }
    attribute_value(lines.get(index + offset)?, key)
}

/// Finds `<name>/<version>/` in a maven-style library path
/// (like `libraries/net/fabricmc/fabric-loader/0.14.21/fabric-loader-0.14.21.jar`)
/// and returns the version.
#[must_use]
pub fn maven_path_version<'a>(path: &'a str, name: &str) -> Option<&'a str> {
    let segments: Vec<&str> = path.split('/').collect();
    segments
        .windows(3)
        .find(|n| n[0] == name && !n[1].is_empty())
        .map(|n| n[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORGE_MANIFEST: &str = "Manifest-Version: 1.0\r\n\
        Automatic-Module-Name: net.minecraftforge.forge\r\n\
        \r\n\
        Name: net/minecraftforge/versions/forge/\r\n\
        Specification-Title: Forge\r\n\
        Specification-Vendor: Forge Development LLC\r\n\
        Specification-Version: 47\r\n\
        Implementation-Title: Forge\r\n\
        Implementation-Version: 47.2.0\r\n\
        Implementation-Vendor: Forge Development LLC\r\n\
        \r\n\
        Name: net/minecraftforge/versions/mcp/\r\n\
        Specification-Title: Minecraft\r\n\
        Specification-Vendor: Mojang\r\n\
        Specification-Version: 1.20.1\r\n\
        Implementation-Title: MCP\r\n\
        Implementation-Version: 20230612.114412\r\n";

    #[test]
    fn properties() {
        let props = parse_properties(
            "#Comment\nfabric-loader-version=0.15.7\n\ngame-version = 1.20.4\n! other\nbroken line\n",
        );
        assert_eq!(props.len(), 2);
        assert_eq!(props["fabric-loader-version"], "0.15.7");
        assert_eq!(props["game-version"], "1.20.4");
    }

    #[test]
    fn continuation_lines() {
        let lines = manifest_lines(
            "Manifest-Version: 1.0\r\nClass-Path: libraries/a.jar lib\r\n raries/b.jar\r\nMain-Class: x.Y\r\n",
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(
            manifest_attribute(&lines, "Class-Path"),
            Some("libraries/a.jar libraries/b.jar")
        );
        assert_eq!(manifest_attribute(&lines, "Main-Class"), Some("x.Y"));
    }

    #[test]
    fn marker_offset() {
        let lines = manifest_lines(FORGE_MANIFEST);
        assert_eq!(
            value_after_marker(
                &lines,
                ("Specification-Title", "Minecraft"),
                2,
                "Specification-Version"
            ),
            Some("1.20.1")
        );
        assert_eq!(
            value_after_marker(
                &lines,
                ("Implementation-Title", "forge"),
                1,
                "Implementation-Version"
            ),
            Some("47.2.0")
        );
        // Wrong offset lands on a different key
        assert_eq!(
            value_after_marker(
                &lines,
                ("Specification-Title", "Minecraft"),
                1,
                "Specification-Version"
            ),
            None
        );
    }

    #[test]
    fn duplicate_marker() {
        let text = format!(
            "{FORGE_MANIFEST}\r\nName: again/\r\nImplementation-Title: Forge\r\nImplementation-Version: 1.0\r\n"
        );
        let lines = manifest_lines(&text);
        assert_eq!(
            value_after_marker(
                &lines,
                ("Implementation-Title", "Forge"),
                1,
                "Implementation-Version"
            ),
            None
        );
    }

    #[test]
    fn library_paths() {
        let path = "libraries/net/fabricmc/fabric-loader/0.14.21/fabric-loader-0.14.21.jar";
        assert_eq!(maven_path_version(path, "fabric-loader"), Some("0.14.21"));
        assert_eq!(maven_path_version(path, "intermediary"), None);
        assert_eq!(maven_path_version("fabric-loader/0.1", "fabric-loader"), None);
    }
}
