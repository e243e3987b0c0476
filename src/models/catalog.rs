//! Service catalog models: categories, services, requirements and SOP steps

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::collections::BTreeMap;

/// Service category (kategori)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Kategori {
    pub id: i64,
    pub kode: String,
    pub nama: String,
    pub icon: Option<String>,
    pub urutan: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category with the number of services it holds
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct KategoriSummary {
    pub id: i64,
    pub kode: String,
    pub nama: String,
    pub icon: Option<String>,
    pub urutan: i32,
    pub is_active: bool,
    pub layanan_count: i64,
}

/// A service (layanan). `layanan_id` is the public ID used in menu replies.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Layanan {
    pub id: i64,
    pub layanan_id: String,
    pub kategori_id: i64,
    pub judul: String,
    pub jangka_waktu: Option<String>,
    pub biaya: Option<String>,
    pub qrcode: Option<String>,
    pub urutan: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Requirement line of a service
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Persyaratan {
    pub id: i64,
    pub layanan_id: i64,
    pub teks: String,
    pub urutan: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Procedure step of a service
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sop {
    pub id: i64,
    pub layanan_id: i64,
    pub teks: String,
    pub urutan: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Everything the bot shows about one service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayananDetail {
    pub layanan: Layanan,
    pub kategori_kode: String,
    pub kategori_nama: String,
    pub persyaratan: Vec<String>,
    pub sop: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKategoriRequest {
    pub kode: String,
    pub nama: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub urutan: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Category edit; the code is immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateKategoriRequest {
    pub nama: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub urutan: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Service create/edit form. Requirement and SOP lists replace the stored ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayananForm {
    pub kategori_id: i64,
    pub judul: String,
    pub jangka_waktu: Option<String>,
    pub biaya: Option<String>,
    pub qrcode: Option<String>,
    #[serde(default)]
    pub urutan: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub persyaratan: Vec<String>,
    #[serde(default)]
    pub sop: Vec<String>,
}

/// Admin listing filters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LayananFilter {
    pub kategori_id: Option<i64>,
    pub search: Option<String>,
}

/// Catalog file accepted by the `import-catalog` command
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogImport {
    pub kategori: BTreeMap<String, ImportKategori>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportKategori {
    pub nama: String,
    pub icon: Option<String>,
    pub urutan: Option<i32>,
    #[serde(default)]
    pub layanan: Vec<ImportLayanan>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportLayanan {
    pub id: String,
    pub judul: String,
    #[serde(rename = "Jangka Waktu Pelayanan")]
    pub jangka_waktu: Option<String>,
    #[serde(rename = "Biaya/Tarif")]
    pub biaya: Option<String>,
    pub qrcode: Option<String>,
    #[serde(rename = "PERSYARATAN", default)]
    pub persyaratan: Vec<String>,
    #[serde(rename = "SOP", default)]
    pub sop: Vec<String>,
}

/// Rows written by one catalog import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub kategori: usize,
    pub layanan: usize,
}

fn default_active() -> bool {
    true
}

/// Next free public service ID for a category code.
///
/// IDs look like `{kode}_{n}`; numbering continues after the highest existing
/// numeric suffix. Existing IDs that belong to other codes sharing the prefix
/// (e.g. `umum_x_3` for `umum`) or have non-numeric suffixes are ignored.
pub fn next_layanan_id<'a, I>(kode: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = format!("{}_", kode);
    let max = existing
        .into_iter()
        .filter_map(|id| id.strip_prefix(&prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("{}{}", prefix, max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_empty_category() {
        assert_eq!(next_layanan_id("kepeg", Vec::<&str>::new()), "kepeg_1");
    }

    #[test]
    fn test_next_id_uses_numeric_max() {
        let existing = vec!["kepeg_1", "kepeg_9", "kepeg_10", "kepeg_2"];
        assert_eq!(next_layanan_id("kepeg", existing), "kepeg_11");
    }

    #[test]
    fn test_next_id_ignores_foreign_ids() {
        let existing = vec!["umum_3", "umum_x", "umumku_9", "haji_20"];
        assert_eq!(next_layanan_id("umum", existing), "umum_4");
    }

    #[test]
    fn test_form_defaults() {
        let form: LayananForm = serde_json::from_value(serde_json::json!({
            "kategori_id": 1,
            "judul": "Legalisir Ijazah",
        }))
        .unwrap();
        assert!(form.is_active);
        assert_eq!(form.urutan, 0);
        assert!(form.persyaratan.is_empty());
    }

    #[test]
    fn test_import_file_shape() {
        let import: CatalogImport = serde_json::from_value(serde_json::json!({
            "kategori": {
                "umum": {
                    "nama": "Layanan Umum",
                    "icon": "📋",
                    "layanan": [{
                        "id": "umum_1",
                        "judul": "Legalisir Ijazah",
                        "Jangka Waktu Pelayanan": "1 hari",
                        "Biaya/Tarif": "Gratis",
                        "PERSYARATAN": ["Fotokopi ijazah", " "],
                        "SOP": ["Serahkan berkas"]
                    }]
                }
            }
        }))
        .unwrap();

        let umum = &import.kategori["umum"];
        assert_eq!(umum.layanan[0].jangka_waktu.as_deref(), Some("1 hari"));
        assert_eq!(umum.layanan[0].persyaratan.len(), 2);
        assert!(umum.layanan[0].qrcode.is_none());
        assert!(umum.urutan.is_none());
    }
}
