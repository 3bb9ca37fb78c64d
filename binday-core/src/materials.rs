//! A-Z "Which Bin?" guide over the council materials list.

use std::fmt;

use crate::model::Material;

/// Most results returned by one search.
pub const MAX_RESULTS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Disposal route named by a material's `bin_type`.
pub enum BinKind {
    /// Yellow-lid recycling bin.
    Recycle,
    /// Green FOGO bin.
    Organic,
    /// Red-lid landfill bin.
    Waste,
    /// Community Recycling Centre drop-off.
    CommunityRecycling,
    /// Booked council clean-up.
    CleanUp,
    /// Special disposal arrangement.
    Special,
    /// Waste facility drop-off.
    DropOff,
    /// Missing or unrecognised category.
    Other,
}

impl BinKind {
    /// Parse the service's category slug.
    #[must_use]
    pub fn from_slug(slug: Option<&str>) -> Self {
        match slug.map(str::trim) {
            Some("recycle") => Self::Recycle,
            Some("organic") => Self::Organic,
            Some("waste") => Self::Waste,
            Some("crc") => Self::CommunityRecycling,
            Some("clean_up") => Self::CleanUp,
            Some("special") => Self::Special,
            Some("waste_drop_off") => Self::DropOff,
            _ => Self::Other,
        }
    }

    /// Human-readable name of the bin or service.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Recycle => "Yellow Recycling Bin",
            Self::Organic => "Green FOGO Bin",
            Self::Waste => "Red Landfill Bin",
            Self::CommunityRecycling => "Community Recycling Centre",
            Self::CleanUp => "Council Clean-up",
            Self::Special => "Special Disposal",
            Self::DropOff => "Waste Drop-off",
            Self::Other => "Unknown",
        }
    }
}

impl fmt::Display for BinKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Label for a raw `bin_type`.
#[must_use]
pub fn bin_label(bin_type: Option<&str>) -> &'static str {
    BinKind::from_slug(bin_type).label()
}

/// Materials sorted by title, searchable by title and keywords.
#[derive(Debug, Clone, Default)]
pub struct MaterialsGuide {
    materials: Vec<Material>,
}

impl MaterialsGuide {
    /// Build the guide, sorting entries by title.
    #[must_use]
    pub fn new(mut materials: Vec<Material>) -> Self {
        materials.sort_by_key(|material| material.title.to_lowercase());
        Self { materials }
    }

    /// Entries whose title or keywords contain `query`, ignoring case, capped at [`MAX_RESULTS`].
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Material> {
        let needle = query.trim().to_lowercase();
        self.materials
            .iter()
            .filter(|material| needle.is_empty() || matches_query(material, &needle))
            .take(MAX_RESULTS)
            .collect()
    }

    /// Number of materials loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the guide has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

fn matches_query(material: &Material, needle: &str) -> bool {
    material.title.to_lowercase().contains(needle)
        || material
            .keywords
            .as_deref()
            .is_some_and(|keywords| keywords.to_lowercase().contains(needle))
}
