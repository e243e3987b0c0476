//! Service catalog administration

use serde::Serialize;
use tracing::info;
use crate::bot::MenuAction;
use crate::database::DatabaseService;
use crate::models::{
    next_layanan_id, AdminActor, CatalogImport, CreateKategoriRequest, ImportSummary, Kategori, KategoriSummary,
    Layanan, LayananFilter, LayananForm, Persyaratan, Sop, UpdateKategoriRequest,
};
use crate::utils::errors::{BotError, Result};
use crate::utils::helpers::char_len;

// Column widths of the catalog tables
const MAX_KODE: usize = 50;
const MAX_NAMA: usize = 100;
const MAX_ICON: usize = 10;
const MAX_JUDUL: usize = 500;
const MAX_DETAIL_FIELD: usize = 200;
const MAX_LINK: usize = 500;

/// A service with every requirement and SOP row, active or not
#[derive(Debug, Clone, Serialize)]
pub struct LayananAdminView {
    pub layanan: Layanan,
    pub kategori: Kategori,
    pub persyaratan: Vec<Persyaratan>,
    pub sop: Vec<Sop>,
}

#[derive(Clone, Debug)]
pub struct CatalogService {
    db: DatabaseService,
}

impl CatalogService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    pub async fn list_kategori(&self) -> Result<Vec<KategoriSummary>> {
        self.db.catalog.list_kategori().await
    }

    pub async fn get_kategori(&self, id: i64) -> Result<Kategori> {
        self.db
            .catalog
            .find_kategori(id)
            .await?
            .ok_or_else(|| BotError::not_found("Kategori", id))
    }

    pub async fn create_kategori(&self, actor: &AdminActor, request: &CreateKategoriRequest) -> Result<Kategori> {
        let kode = request.kode.trim().to_lowercase();
        check_kode(&kode)?;
        check_kategori_fields(&request.nama, request.icon.as_deref())?;

        if self.db.catalog.find_kategori_by_kode(&kode).await?.is_some() {
            return Err(BotError::Conflict(format!("Kode kategori {} sudah digunakan", kode)));
        }

        let request = CreateKategoriRequest {
            kode,
            nama: request.nama.trim().to_string(),
            ..request.clone()
        };
        let kategori = self
            .db
            .catalog
            .create_kategori(&request)
            .await
            .map_err(|e| conflict_on_unique(e, "Kode kategori sudah digunakan"))?;

        self.db
            .log_activity(actor.activity(
                "create_kategori",
                Some(("kategori", kategori.id)),
                format!("Menambahkan kategori {}", kategori.kode),
            ))
            .await;
        info!(admin_id = actor.id(), kode = %kategori.kode, "Category created");

        Ok(kategori)
    }

    pub async fn update_kategori(&self, actor: &AdminActor, id: i64, request: &UpdateKategoriRequest) -> Result<Kategori> {
        check_kategori_fields(&request.nama, request.icon.as_deref())?;

        let request = UpdateKategoriRequest {
            nama: request.nama.trim().to_string(),
            ..request.clone()
        };
        let kategori = self
            .db
            .catalog
            .update_kategori(id, &request)
            .await?
            .ok_or_else(|| BotError::not_found("Kategori", id))?;

        self.db
            .log_activity(actor.activity(
                "update_kategori",
                Some(("kategori", id)),
                format!("Mengubah kategori {}", kategori.kode),
            ))
            .await;

        Ok(kategori)
    }

    /// Delete an empty category
    pub async fn delete_kategori(&self, actor: &AdminActor, id: i64) -> Result<()> {
        let kategori = self.get_kategori(id).await?;

        let count = self.db.catalog.count_layanan_in(id).await?;
        if count > 0 {
            return Err(BotError::Conflict(format!(
                "Kategori {} masih memiliki {} layanan",
                kategori.kode, count
            )));
        }

        self.db.catalog.delete_kategori(id).await?;
        self.db
            .log_activity(actor.activity(
                "delete_kategori",
                Some(("kategori", id)),
                format!("Menghapus kategori {}", kategori.kode),
            ))
            .await;
        info!(admin_id = actor.id(), kode = %kategori.kode, "Category deleted");

        Ok(())
    }

    pub async fn list_layanan(&self, filter: &LayananFilter) -> Result<Vec<Layanan>> {
        self.db.catalog.list_layanan(filter).await
    }

    pub async fn get_layanan(&self, id: i64) -> Result<LayananAdminView> {
        let layanan = self
            .db
            .catalog
            .find_layanan(id)
            .await?
            .ok_or_else(|| BotError::not_found("Layanan", id))?;
        let kategori = self.get_kategori(layanan.kategori_id).await?;
        let persyaratan = self.db.catalog.persyaratan_of(id).await?;
        let sop = self.db.catalog.sop_of(id).await?;

        Ok(LayananAdminView {
            layanan,
            kategori,
            persyaratan,
            sop,
        })
    }

    /// Create a service under `{kode}_{n}`, n one past the highest existing number
    pub async fn create_layanan(&self, actor: &AdminActor, form: &LayananForm) -> Result<Layanan> {
        check_layanan_fields(&form.judul, form.jangka_waktu.as_deref(), form.biaya.as_deref(), form.qrcode.as_deref())?;
        let kategori = self.get_kategori(form.kategori_id).await?;

        let existing = self.db.catalog.layanan_ids_with_prefix(&kategori.kode).await?;
        let public_id = next_layanan_id(&kategori.kode, existing.iter().map(String::as_str));

        let layanan = self
            .db
            .catalog
            .create_layanan(&public_id, form)
            .await
            .map_err(|e| conflict_on_unique(e, "ID layanan sudah digunakan, silakan coba lagi"))?;

        self.db
            .log_activity(actor.activity(
                "create_layanan",
                Some(("layanan", layanan.id)),
                format!("Menambahkan layanan {}", layanan.layanan_id),
            ))
            .await;
        info!(admin_id = actor.id(), layanan_id = %layanan.layanan_id, "Service created");

        Ok(layanan)
    }

    /// Update a service; its public ID never changes
    pub async fn update_layanan(&self, actor: &AdminActor, id: i64, form: &LayananForm) -> Result<Layanan> {
        check_layanan_fields(&form.judul, form.jangka_waktu.as_deref(), form.biaya.as_deref(), form.qrcode.as_deref())?;
        self.get_kategori(form.kategori_id).await?;

        let layanan = self
            .db
            .catalog
            .update_layanan(id, form)
            .await?
            .ok_or_else(|| BotError::not_found("Layanan", id))?;

        self.db
            .log_activity(actor.activity(
                "update_layanan",
                Some(("layanan", id)),
                format!("Mengubah layanan {}", layanan.layanan_id),
            ))
            .await;

        Ok(layanan)
    }

    pub async fn delete_layanan(&self, actor: &AdminActor, id: i64) -> Result<()> {
        let layanan = self
            .db
            .catalog
            .find_layanan(id)
            .await?
            .ok_or_else(|| BotError::not_found("Layanan", id))?;

        self.db.catalog.delete_layanan(id).await?;
        self.db
            .log_activity(actor.activity(
                "delete_layanan",
                Some(("layanan", id)),
                format!("Menghapus layanan {}", layanan.layanan_id),
            ))
            .await;
        info!(admin_id = actor.id(), layanan_id = %layanan.layanan_id, "Service deleted");

        Ok(())
    }

    pub async fn toggle_layanan(&self, actor: &AdminActor, id: i64) -> Result<Layanan> {
        let layanan = self
            .db
            .catalog
            .toggle_layanan(id)
            .await?
            .ok_or_else(|| BotError::not_found("Layanan", id))?;

        let verb = if layanan.is_active { "Mengaktifkan" } else { "Menonaktifkan" };
        self.db
            .log_activity(actor.activity(
                "toggle_layanan",
                Some(("layanan", id)),
                format!("{} layanan {}", verb, layanan.layanan_id),
            ))
            .await;

        Ok(layanan)
    }

    /// Upsert a catalog file
    pub async fn import(&self, catalog: &CatalogImport) -> Result<ImportSummary> {
        for (kode, kategori) in &catalog.kategori {
            check_kode(kode)?;
            check_kategori_fields(&kategori.nama, kategori.icon.as_deref())?;
            for layanan in &kategori.layanan {
                check_public_id(&layanan.id)?;
                check_layanan_fields(
                    &layanan.judul,
                    layanan.jangka_waktu.as_deref(),
                    layanan.biaya.as_deref(),
                    layanan.qrcode.as_deref(),
                )?;
            }
        }

        let summary = self.db.catalog.import(catalog).await?;
        info!(kategori = summary.kategori, layanan = summary.layanan, "Catalog imported");
        Ok(summary)
    }
}

/// Category codes end up inside reply ids such as `kat_{kode}`, and the
/// services generated under them (`{kode}_{n}`) must still route as services.
pub fn is_valid_kode(kode: &str) -> bool {
    (1..=MAX_KODE).contains(&kode.len())
        && kode.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && routes_as_service(&format!("{}_1", kode))
}

fn routes_as_service(public_id: &str) -> bool {
    matches!(MenuAction::parse(public_id), MenuAction::Service(_))
}

fn check_kode(kode: &str) -> Result<()> {
    if !is_valid_kode(kode) {
        return Err(BotError::InvalidInput(format!(
            "Kode kategori tidak valid: {} (huruf kecil, angka dan garis bawah; tidak boleh diawali kat_, btn_sop_ atau btn_back_)",
            kode
        )));
    }
    Ok(())
}

/// Public IDs given in a catalog file
fn check_public_id(public_id: &str) -> Result<()> {
    if public_id.trim().is_empty() || public_id.len() > MAX_KODE || !routes_as_service(public_id) {
        return Err(BotError::InvalidInput(format!("ID layanan tidak valid: {}", public_id)));
    }
    Ok(())
}

fn check_kategori_fields(nama: &str, icon: Option<&str>) -> Result<()> {
    require_text(nama, "Nama kategori")?;
    check_length(nama.trim(), MAX_NAMA, "Nama kategori")?;
    check_length(icon.unwrap_or(""), MAX_ICON, "Icon")
}

fn check_layanan_fields(judul: &str, jangka_waktu: Option<&str>, biaya: Option<&str>, qrcode: Option<&str>) -> Result<()> {
    require_text(judul, "Judul layanan")?;
    check_length(judul, MAX_JUDUL, "Judul layanan")?;
    check_length(jangka_waktu.unwrap_or(""), MAX_DETAIL_FIELD, "Jangka waktu")?;
    check_length(biaya.unwrap_or(""), MAX_DETAIL_FIELD, "Biaya")?;
    check_length(qrcode.unwrap_or(""), MAX_LINK, "Link pendukung")
}

fn check_length(value: &str, max_chars: usize, field: &str) -> Result<()> {
    if char_len(value) > max_chars {
        return Err(BotError::InvalidInput(format!("{} maksimal {} karakter", field, max_chars)));
    }
    Ok(())
}

fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BotError::InvalidInput(format!("{} harus diisi", field)));
    }
    Ok(())
}

/// Unique-constraint violations become 409 responses
fn conflict_on_unique(error: BotError, message: &str) -> BotError {
    match &error {
        BotError::Database(sqlx::Error::Database(db_error)) if db_error.is_unique_violation() => {
            BotError::Conflict(message.to_string())
        }
        _ => error,
    }
}
