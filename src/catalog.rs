//! # Resource Catalog Module
//!
//! Builds the three read-only lookup tables the bot serves from:
//!
//! - city lists: city name → list image path, from a directory scan
//! - ads: ad name → (media path, text path), from two parallel directory scans
//! - provinces: province name → sorted member cities, from the relation CSV
//!
//! Loading is lenient by rule, not by accident. Each rule is a named function below:
//!
//! - [`pair_ads`]: an ad missing its media or its text is dropped
//! - [`resolve_provinces`]: unknown cities are dropped from a province, and a
//!   province left without cities is dropped entirely
//! - [`resolve_promoted`]: promoted cities that have no list are dropped
//!
//! Individual resource files are not opened here; unreadable files surface at
//! delivery time as [`ShoraError::ResourceUnavailable`].

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::AppPaths;
use crate::errors::{Result, ShoraError};
use crate::text_processing::normalize;

/// A paired promotional resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ad {
    pub name: String,
    pub media: PathBuf,
    pub text: PathBuf,
}

/// One row of the province relation file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProvinceCity {
    #[serde(rename = "Province")]
    pub province: String,
    #[serde(rename = "City")]
    pub city: String,
}

/// Immutable lookup tables, built once at startup
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    city_lists: HashMap<String, PathBuf>,
    provinces: BTreeMap<String, Vec<String>>,
    ads: Vec<Ad>,
}

impl Catalog {
    /// Load every table from the configured locations
    pub fn load(paths: &AppPaths) -> Result<Self> {
        let city_lists = scan_resource_dir(&paths.lists_dir)?;
        let relations = read_province_relations(&paths.province_map)?;
        let ads_media = scan_resource_dir(&paths.ads_media_dir)?;
        let ads_texts = scan_resource_dir(&paths.ads_text_dir)?;

        let catalog = Self::from_parts(city_lists, relations, &ads_media, &ads_texts);
        info!(
            cities = catalog.city_lists.len(),
            provinces = catalog.provinces.len(),
            ads = catalog.ads.len(),
            "Resource catalog loaded"
        );
        Ok(catalog)
    }

    /// Build the catalog from already scanned entries
    pub fn from_parts(
        city_lists: Vec<(String, PathBuf)>,
        relations: Vec<ProvinceCity>,
        ads_media: &[(String, PathBuf)],
        ads_texts: &[(String, PathBuf)],
    ) -> Self {
        let city_lists: HashMap<String, PathBuf> = city_lists.into_iter().collect();
        let cities: HashSet<&str> = city_lists.keys().map(String::as_str).collect();
        let provinces = resolve_provinces(&relations, &cities);
        let ads = pair_ads(ads_media, ads_texts);

        Self {
            city_lists,
            provinces,
            ads,
        }
    }

    pub fn city_list(&self, city: &str) -> Option<&Path> {
        self.city_lists.get(city).map(PathBuf::as_path)
    }

    pub fn has_city(&self, city: &str) -> bool {
        self.city_lists.contains_key(city)
    }

    /// Cities of a province, sorted ascending
    pub fn province_cities(&self, province: &str) -> Option<&[String]> {
        self.provinces.get(province).map(Vec::as_slice)
    }

    pub fn has_province(&self, province: &str) -> bool {
        self.provinces.contains_key(province)
    }

    /// Province names in ascending order
    pub fn provinces(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.provinces
            .iter()
            .map(|(name, cities)| (name.as_str(), cities.as_slice()))
    }

    pub fn ad(&self, name: &str) -> Option<&Ad> {
        self.ads.iter().find(|ad| ad.name == name)
    }

    /// Ads in directory scan order
    pub fn ads(&self) -> &[Ad] {
        &self.ads
    }

    /// Keep only the promoted cities this catalog can serve
    pub fn promoted(&self, promoted: &[String]) -> Vec<String> {
        let cities: HashSet<&str> = self.city_lists.keys().map(String::as_str).collect();
        resolve_promoted(promoted, &cities)
    }
}

/// Identifier of a resource file: its name without the last extension.
///
/// Files without an extension are not resources.
pub fn resource_name(path: &Path) -> Option<String> {
    path.extension()?;
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() {
        return None;
    }
    Some(normalize(stem))
}

/// List `<name>.<ext>` files directly inside `dir`, sorted by file name.
pub fn scan_resource_dir(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ShoraError::config(format!("cannot scan {}: {e}", dir.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if let Some(name) = resource_name(&path) {
            files.push((name, path));
        }
    }
    files.sort_by(|a, b| a.1.file_name().cmp(&b.1.file_name()));

    debug!(dir = %dir.display(), count = files.len(), "Scanned resource directory");
    Ok(files)
}

/// Read `(Province, City)` rows; other columns are ignored.
pub fn read_province_relations(path: &Path) -> Result<Vec<ProvinceCity>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| ShoraError::config(format!("cannot read {}: {e}", path.display())))?;
    parse_province_relations(reader)
}

/// Parse relation rows from any CSV reader with a header line
pub fn parse_province_relations<R: std::io::Read>(
    mut reader: csv::Reader<R>,
) -> Result<Vec<ProvinceCity>> {
    let mut relations = Vec::new();
    for row in reader.deserialize::<ProvinceCity>() {
        let row = row?;
        relations.push(ProvinceCity {
            province: normalize(&row.province),
            city: normalize(&row.city),
        });
    }
    Ok(relations)
}

/// Ad pairing rule: an ad is served only when both its media and its text exist.
///
/// Order follows the text listing. Unpaired names are dropped without error.
pub fn pair_ads(media: &[(String, PathBuf)], texts: &[(String, PathBuf)]) -> Vec<Ad> {
    let media: HashMap<&str, &PathBuf> = media.iter().map(|(n, p)| (n.as_str(), p)).collect();
    let mut seen = HashSet::new();

    let ads: Vec<Ad> = texts
        .iter()
        .filter_map(|(name, text)| {
            let media = media.get(name.as_str())?;
            seen.insert(name.as_str()).then(|| Ad {
                name: name.clone(),
                media: (*media).clone(),
                text: text.clone(),
            })
        })
        .collect();

    let dropped = media.len() + texts.len() - 2 * ads.len();
    if dropped > 0 {
        debug!(dropped, "Dropped unpaired ad resources");
    }
    ads
}

/// Province filtering rule: keep only known cities, sorted and deduplicated,
/// and drop provinces left empty.
pub fn resolve_provinces(
    relations: &[ProvinceCity],
    cities: &HashSet<&str>,
) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for relation in relations {
        let members = grouped.entry(relation.province.clone()).or_default();
        if cities.contains(relation.city.as_str()) {
            members.insert(relation.city.clone());
        }
    }

    grouped
        .into_iter()
        .filter(|(_, members)| !members.is_empty())
        .map(|(province, members)| (province, members.into_iter().collect()))
        .collect()
}

/// Promoted city rule: keep configured order, drop cities without a list.
pub fn resolve_promoted(promoted: &[String], cities: &HashSet<&str>) -> Vec<String> {
    promoted
        .iter()
        .map(|city| normalize(city))
        .filter(|city| cities.contains(city.as_str()))
        .collect()
}
