//! Extension-to-loader tables shared by the configuration matrix.

use std::collections::BTreeMap;

use super::types::Loader;

const BASE: &[(&str, Loader)] = &[
  (".js", Loader::Js),
  (".jsx", Loader::Jsx),
  (".ts", Loader::Ts),
  (".tsx", Loader::Tsx),
  (".json", Loader::Json),
];

/// Asset extensions handled with the `File` loader in client builds and the
/// `Empty` loader in server builds.
const ASSET_EXTENSIONS: &[&str] = &[
  ".png", ".svg", ".jpg", ".jpeg", ".gif", ".webp", ".woff", ".woff2",
];

/// Standard loaders for source code files.
pub fn base_loaders() -> BTreeMap<String, Loader> {
  BASE
    .iter()
    .map(|(ext, loader)| (ext.to_string(), *loader))
    .collect()
}

/// Loaders for stylesheets and static assets, used in client builds so that
/// CSS is processed and media files are emitted to the output directory.
pub fn asset_loaders() -> BTreeMap<String, Loader> {
  let mut loaders = BTreeMap::new();
  loaders.insert(".css".to_string(), Loader::Css);
  for ext in ASSET_EXTENSIONS {
    loaders.insert(ext.to_string(), Loader::File);
  }
  loaders
}

/// No-op loaders for server builds: asset imports still resolve, so the
/// module graph stays intact, but nothing is emitted for them. The client
/// build owns asset emission.
pub fn no_asset_loaders() -> BTreeMap<String, Loader> {
  let mut loaders = BTreeMap::new();
  loaders.insert(".css".to_string(), Loader::Empty);
  for ext in ASSET_EXTENSIONS {
    loaders.insert(ext.to_string(), Loader::Empty);
  }
  loaders
}
