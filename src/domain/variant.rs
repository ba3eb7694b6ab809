//! Build variant value object - defines which environment a bundle is built for

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Target tags understood by environment blocks in index pages.
pub const TARGET_TAGS: [&str; 3] = ["dev", "live", "e2e"];

/// One build target with its own output policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variant {
    /// Verbatim copy, mocked backend
    #[serde(rename = "dev")]
    Development,
    /// Verbatim copy, no mocking
    #[serde(rename = "debug")]
    Debug,
    /// Verbatim copy, mock libraries and fixtures kept for scenarios
    #[serde(rename = "e2e")]
    EndToEnd,
    /// Concatenated and fingerprinted
    #[serde(rename = "concat")]
    Concatenated,
    /// Concatenated, minified and fingerprinted
    #[serde(rename = "dist")]
    Distribution,
}

/// How a variant turns the resolved file set into output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assembly {
    /// Copy every resolved file as-is
    Copy,
    /// Merge declared scripts and styles into fingerprinted bundles
    Concatenate,
}

/// Explicit policy record for a variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantPolicy {
    /// Environment block tag kept in the index page
    pub index_target: &'static str,
    pub assembly: Assembly,
    pub minify: bool,
    /// Output directory used when the layout does not name one
    pub default_output: &'static str,
    /// Whether `--dest` redirects this variant
    pub accepts_dest_override: bool,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::Development,
        Variant::Debug,
        Variant::EndToEnd,
        Variant::Concatenated,
        Variant::Distribution,
    ];

    /// Variants run by the `build` aggregate
    pub const BUILD: [Variant; 4] = [
        Variant::Development,
        Variant::Debug,
        Variant::EndToEnd,
        Variant::Concatenated,
    ];

    pub fn policy(self) -> VariantPolicy {
        match self {
            Variant::Development => VariantPolicy {
                index_target: "dev",
                assembly: Assembly::Copy,
                minify: false,
                default_output: "build-dev",
                accepts_dest_override: false,
            },
            Variant::Debug => VariantPolicy {
                index_target: "live",
                assembly: Assembly::Copy,
                minify: false,
                default_output: "build-debug",
                accepts_dest_override: false,
            },
            Variant::EndToEnd => VariantPolicy {
                index_target: "e2e",
                assembly: Assembly::Copy,
                minify: false,
                default_output: "build-e2e",
                accepts_dest_override: false,
            },
            Variant::Concatenated => VariantPolicy {
                index_target: "live",
                assembly: Assembly::Concatenate,
                minify: false,
                default_output: "build",
                accepts_dest_override: true,
            },
            Variant::Distribution => VariantPolicy {
                index_target: "live",
                assembly: Assembly::Concatenate,
                minify: true,
                default_output: "dist",
                accepts_dest_override: true,
            },
        }
    }

    /// Short name used on the command line and in task names
    pub fn name(self) -> &'static str {
        match self {
            Variant::Development => "dev",
            Variant::Debug => "debug",
            Variant::EndToEnd => "e2e",
            Variant::Concatenated => "concat",
            Variant::Distribution => "dist",
        }
    }

    pub fn is_copy(self) -> bool {
        self.policy().assembly == Assembly::Copy
    }

    /// Name of the per-application task, e.g. `build:concat-alpha` or `dist:alpha`
    pub fn task_name(self, app: &str) -> String {
        match self {
            Variant::Distribution => format!("dist:{app}"),
            other => format!("build:{}-{app}", other.name()),
        }
    }

    /// Output root for this variant, honouring the destination override
    /// only where the policy allows it.
    pub fn output_root<'a>(self, configured: &'a Path, dest: Option<&'a Path>) -> &'a Path {
        match dest {
            Some(dest) if self.policy().accepts_dest_override => dest,
            _ => configured,
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
