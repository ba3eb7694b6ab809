//! Domain types: variants, assets, hashes, manifests and collaborator ports

pub mod asset;
pub mod hash;
pub mod manifest;
pub mod namespace;
pub mod ports;
pub mod variant;

pub use asset::{to_asset_path, AssetItem, AssetKind};
pub use hash::ContentHash;
pub use manifest::{fingerprinted_name, FingerprintManifest};
pub use namespace::Namespace;
pub use ports::{ScriptMinifier, StyleMinifier, TemplateCompiler};
pub use variant::{Assembly, Variant, VariantPolicy, TARGET_TAGS};
