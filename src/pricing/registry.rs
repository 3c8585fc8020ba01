use std::path::{Path, PathBuf};

/// A supported vehicle brand. The slug doubles as the route segment
/// and the artifact directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandSpec {
    pub slug: &'static str,
    pub display_name: &'static str,
}

/// Brand registry. Adding a brand is a data change here plus a trained
/// artifact on disk; no handler changes.
pub const BRANDS: &[BrandSpec] = &[
    BrandSpec { slug: "audi", display_name: "Audi" },
    BrandSpec { slug: "bmw", display_name: "BMW" },
    BrandSpec { slug: "focus", display_name: "Ford Focus" },
    BrandSpec { slug: "ford", display_name: "Ford" },
    BrandSpec { slug: "skoda", display_name: "Skoda" },
    BrandSpec { slug: "merc", display_name: "Mercedes-Benz" },
    BrandSpec { slug: "toyota", display_name: "Toyota" },
    BrandSpec { slug: "vauxhall", display_name: "Vauxhall" },
    BrandSpec { slug: "volkswagen", display_name: "Volkswagen" },
    BrandSpec { slug: "hyundi", display_name: "Hyundai" },
];

pub fn find(slug: &str) -> Option<&'static BrandSpec> {
    BRANDS.iter().find(|b| b.slug == slug)
}

/// `<models_dir>/<slug>/price_model.json`
pub fn artifact_path(models_dir: &Path, slug: &str) -> PathBuf {
    models_dir.join(slug).join("price_model.json")
}
