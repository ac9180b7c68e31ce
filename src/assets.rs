// ABOUTME: Default placeholder content for a freshly created webroot.
// ABOUTME: The files are embedded in the binary so the unit needs no charm directory lookup.

use std::io;
use std::path::Path;

/// Files written into a webroot that did not exist before.
pub const DEFAULT_ASSETS: [(&str, &[u8]); 2] = [
    ("index.html", include_bytes!("../assets/index.html")),
    ("logo.png", include_bytes!("../assets/logo.png")),
];

/// Make sure `webroot` exists. Only a directory created by this call is
/// populated; existing content is never touched.
///
/// Returns whether the directory was created.
pub fn ensure_webroot(webroot: &Path) -> io::Result<bool> {
    if webroot.exists() {
        return Ok(false);
    }

    std::fs::create_dir_all(webroot)?;
    for (name, content) in DEFAULT_ASSETS {
        std::fs::write(webroot.join(name), content)?;
    }

    tracing::info!("Placed default content in {}", webroot.display());
    Ok(true)
}
