//! gitbot-shepherd: pick a reviewer for a repository checkout
//!
//! A repository may carry a launch manifest at
//! `<checkout>/launch/<checkout-dir-name>.yml` listing its shepherds:
//!
//! ```yaml
//! shepherds:
//!   - alice
//!   - bob
//! ```
//!
//! [`get_shepherd`] returns one of them chosen uniformly at random, or `None`
//! when the repository has no manifest or the list is empty.

pub mod error;

pub use error::{Result, ShepherdError};

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::debug;

/// Directory inside a checkout holding launch manifests.
pub const LAUNCH_DIR: &str = "launch";

#[derive(Debug, Default, Deserialize)]
struct ShepherdManifest {
    #[serde(default)]
    shepherds: Option<Vec<String>>,
}

/// Manifest location for the checkout at `checkout`, if the path has a final
/// component to name it by.
pub fn manifest_path(checkout: &Path) -> Option<PathBuf> {
    let repo = checkout.file_name()?;
    let mut file = repo.to_os_string();
    file.push(".yml");
    Some(checkout.join(LAUNCH_DIR).join(file))
}

/// Pick a shepherd for the checkout at `checkout`, seeding from the clock.
///
/// An empty `checkout` means the current directory.
pub fn get_shepherd(checkout: &Path) -> Result<Option<String>> {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let mut rng = StdRng::seed_from_u64(seed);
    select_shepherd(checkout, &mut rng)
}

/// Pick a shepherd for the checkout at `checkout` using `rng`.
pub fn select_shepherd<R: Rng>(checkout: &Path, rng: &mut R) -> Result<Option<String>> {
    let checkout = if checkout.as_os_str().is_empty() {
        std::env::current_dir().map_err(ShepherdError::CurrentDir)?
    } else {
        checkout.to_path_buf()
    };

    let Some(path) = manifest_path(&checkout) else {
        debug!(checkout = %checkout.display(), "checkout path has no name; no manifest");
        return Ok(None);
    };

    match std::fs::metadata(&path) {
        Ok(_) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(manifest = %path.display(), "no launch manifest");
            return Ok(None);
        }
        Err(source) => return Err(ShepherdError::Stat { path, source }),
    }

    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(source) => return Err(ShepherdError::Read { path, source }),
    };
    let shepherds = parse_shepherds(&text).map_err(|source| ShepherdError::Parse {
        path: path.clone(),
        source,
    })?;

    if shepherds.is_empty() {
        debug!(manifest = %path.display(), "manifest lists no shepherds");
        return Ok(None);
    }
    let index = rng.gen_range(0..shepherds.len());
    Ok(shepherds.into_iter().nth(index))
}

fn parse_shepherds(text: &str) -> std::result::Result<Vec<String>, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let manifest: Option<ShepherdManifest> = serde_yaml::from_str(text)?;
    Ok(manifest.and_then(|m| m.shepherds).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_path_uses_checkout_name() {
        assert_eq!(
            manifest_path(Path::new("/src/service-a")),
            Some(PathBuf::from("/src/service-a/launch/service-a.yml"))
        );
        assert_eq!(
            manifest_path(Path::new("/src/service-a/")),
            Some(PathBuf::from("/src/service-a/launch/service-a.yml"))
        );
        assert_eq!(manifest_path(Path::new("/")), None);
    }

    #[test]
    fn test_parse_shepherds() {
        assert_eq!(
            parse_shepherds("shepherds:\n  - a\n  - b\n").unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(parse_shepherds("").unwrap().is_empty());
        assert!(parse_shepherds("shepherds:\n").unwrap().is_empty());
        assert!(parse_shepherds("shepherds: []\n").unwrap().is_empty());
        assert!(parse_shepherds("owner: team-x\n").unwrap().is_empty());
        assert!(parse_shepherds("shepherds: {a: b}\n").is_err());
    }
}
