//! Stable per-nick display colors.
//!
//! A nick's color is taken from a hex digest of the nick plus an
//! installation salt, so the same person keeps the same color across runs on
//! one machine while different machines shuffle the palette.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Width of the digest window that becomes an `rrggbb` color
const WINDOW: usize = 6;

/// Channels brighter than this are hard to read on a light background
const BRIGHT_CHANNEL: u8 = 144;

/// A display color in `#rrggbb` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split the color back into its red, green and blue components
    pub fn rgb(&self) -> Option<[u8; 3]> {
        let mut rgb = [0u8; 3];
        let hex = self.0.strip_prefix('#')?;
        hex::decode_to_slice(hex, &mut rgb).ok()?;
        Some(rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True if at most one of the three channels is bright
pub fn is_readable(rgb: &[u8; 3]) -> bool {
    rgb.iter().filter(|c| **c > BRIGHT_CHANNEL).count() < 2
}

/// Slide a six-character window along `digest` until it names a readable
/// color. If none does, the last window tried is used anyway.
pub fn color_for_digest(digest: &str) -> Color {
    let mut rgb = [255u8; 3];
    let mut window = "";
    let mut pos = 0;

    while !is_readable(&rgb) && pos + WINDOW <= digest.len() {
        window = &digest[pos..pos + WINDOW];
        if hex::decode_to_slice(window, &mut rgb).is_err() {
            // Not a hex digest; keep the window but stop scanning
            break;
        }
        pos += 1;
    }

    Color(format!("#{}", window))
}

/// Assigns and remembers nick colors for the lifetime of the process.
#[derive(Debug)]
pub struct NickColorAssigner {
    salt: String,
    cache: HashMap<String, Color>,
}

impl NickColorAssigner {
    /// Create an assigner salted with this machine's hardware address
    pub fn new() -> Self {
        Self::with_salt(hardware_salt())
    }

    pub fn with_salt(salt: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            cache: HashMap::new(),
        }
    }

    /// Look up the color for `nick`, computing and caching it on first use
    pub fn get(&mut self, nick: &str) -> Color {
        if let Some(color) = self.cache.get(nick) {
            return color.clone();
        }

        let digest = hex::encode(Sha1::digest(format!("{}{}", nick, self.salt).as_bytes()));
        let color = color_for_digest(&digest);

        tracing::trace!(nick, %color, "Assigned nick color");

        self.cache.insert(nick.to_string(), color.clone());
        color
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

impl Default for NickColorAssigner {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the installation salt from the first non-loopback network
/// interface's hardware address. Any lookup failure gives an empty salt.
///
/// Addresses are read from `/sys/class/net`, so only Linux hosts get a
/// hardware salt; everywhere else colors are computed with an empty one.
pub fn hardware_salt() -> String {
    match first_hardware_address(Path::new("/sys/class/net")) {
        Ok(Some(addr)) => addr,
        Ok(None) => {
            tracing::warn!("No hardware address found; nick colors use an empty salt");
            String::new()
        }
        Err(e) => {
            tracing::warn!("Couldn't read hardware address ({}); nick colors use an empty salt", e);
            String::new()
        }
    }
}

fn first_hardware_address(net_dir: &Path) -> std::io::Result<Option<String>> {
    let mut interfaces: Vec<_> = std::fs::read_dir(net_dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .collect();
    interfaces.sort();

    for iface in interfaces {
        if iface.file_name().map_or(true, |name| name == "lo") {
            continue;
        }
        let addr = match std::fs::read_to_string(iface.join("address")) {
            Ok(addr) => addr.trim().to_string(),
            Err(_) => continue,
        };
        if !addr.is_empty() && addr.chars().any(|c| c != '0' && c != ':') {
            return Ok(Some(addr));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_are_idempotent() {
        let mut colors = NickColorAssigner::with_salt("00:11:22:33:44:55");
        let first = colors.get("alice");
        let second = colors.get("alice");

        assert_eq!(first, second);
        assert_eq!(colors.cached(), 1);
    }

    #[test]
    fn colors_are_deterministic_for_a_salt() {
        let mut a = NickColorAssigner::with_salt("salt");
        let mut b = NickColorAssigner::with_salt("salt");

        for nick in ["alice", "bob", "Charlie", "d[a]ve", "eve_"] {
            assert_eq!(a.get(nick), b.get(nick));
        }
    }

    #[test]
    fn colors_are_well_formed_and_readable() {
        let mut colors = NickColorAssigner::with_salt("");

        for i in 0..500 {
            let nick = format!("nick{}", i);
            let color = colors.get(&nick);
            assert_eq!(color.as_str().len(), 7);
            let rgb = color.rgb().unwrap();

            let digest = hex::encode(Sha1::digest(nick.as_bytes()));
            let any_readable = (0..=digest.len() - WINDOW).any(|pos| {
                let mut window = [0u8; 3];
                hex::decode_to_slice(&digest[pos..pos + WINDOW], &mut window).unwrap();
                is_readable(&window)
            });
            if any_readable {
                assert!(is_readable(&rgb), "{} is too bright for {}", color, nick);
            }
        }
    }

    #[test]
    fn boundary_channel_counts_as_dark() {
        assert_eq!(color_for_digest("ff9090ff").as_str(), "#ff9090");
    }

    #[test]
    fn window_advances_one_character_at_a_time() {
        // fffff0, ffff00 and fff000 all have two bright channels
        assert_eq!(color_for_digest("fffff00000").as_str(), "#ff0000");
    }

    #[test]
    fn falls_back_to_last_window() {
        assert_eq!(color_for_digest("ffffffffff").as_str(), "#ffffff");
        assert_eq!(color_for_digest("fffffffffe").as_str(), "#fffffe");
    }

    #[test]
    fn salt_reads_first_real_interface() {
        let dir = std::env::temp_dir().join(format!("chatmaster-salt-{}", std::process::id()));
        for (iface, addr) in [("lo", "00:00:00:00:00:00"), ("eth0", "52:54:00:12:34:56\n"), ("wlan0", "aa:bb:cc:dd:ee:ff")] {
            std::fs::create_dir_all(dir.join(iface)).unwrap();
            std::fs::write(dir.join(iface).join("address"), addr).unwrap();
        }

        let found = first_hardware_address(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(found.as_deref(), Some("52:54:00:12:34:56"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(first_hardware_address(Path::new("/nonexistent/chatmaster")).is_err());
    }
}
