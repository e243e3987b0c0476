//! Service catalog repository implementation
//!
//! Bot-facing queries only ever see active rows; the admin queries see everything.

use sqlx::{FromRow, PgPool, Postgres, Transaction};
use crate::models::catalog::{
    Kategori, KategoriSummary, Layanan, Persyaratan, Sop, CreateKategoriRequest, UpdateKategoriRequest,
    LayananForm, LayananFilter, CatalogImport, ImportSummary,
};
use crate::utils::errors::BotError;
use crate::utils::helpers::clean_lines;

const KATEGORI_COLUMNS: &str = "id, kode, nama, icon, urutan, is_active, created_at, updated_at";

const LAYANAN_COLUMNS: &str = "l.id, l.layanan_id, l.kategori_id, l.judul, l.jangka_waktu, l.biaya, l.qrcode, \
     l.urutan, l.is_active, l.created_at, l.updated_at";

/// Active service together with its category
#[derive(Debug, Clone, FromRow)]
pub struct ActiveLayanan {
    #[sqlx(flatten)]
    pub layanan: Layanan,
    pub kategori_kode: String,
    pub kategori_nama: String,
}

/// Child tables holding ordered text lines of a service
#[derive(Debug, Clone, Copy)]
enum LineTable {
    Persyaratan,
    Sop,
}

impl LineTable {
    fn name(self) -> &'static str {
        match self {
            LineTable::Persyaratan => "persyaratan",
            LineTable::Sop => "sop",
        }
    }
}

#[derive(Clone, Debug)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Bot-facing queries

    /// Active categories in menu order
    pub async fn active_kategori(&self) -> Result<Vec<Kategori>, BotError> {
        let kategori = sqlx::query_as::<_, Kategori>(&format!(
            "SELECT {} FROM kategori WHERE is_active = TRUE ORDER BY urutan ASC, id ASC",
            KATEGORI_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(kategori)
    }

    pub async fn find_active_kategori(&self, kode: &str) -> Result<Option<Kategori>, BotError> {
        let kategori = sqlx::query_as::<_, Kategori>(&format!(
            "SELECT {} FROM kategori WHERE kode = $1 AND is_active = TRUE",
            KATEGORI_COLUMNS
        ))
        .bind(kode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(kategori)
    }

    /// Active services of a category in menu order
    pub async fn active_layanan(&self, kategori_id: i64, limit: i64) -> Result<Vec<Layanan>, BotError> {
        let layanan = sqlx::query_as::<_, Layanan>(&format!(
            r#"
            SELECT {} FROM layanan l
            WHERE l.kategori_id = $1 AND l.is_active = TRUE
            ORDER BY l.urutan ASC, l.id ASC
            LIMIT $2
            "#,
            LAYANAN_COLUMNS
        ))
        .bind(kategori_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(layanan)
    }

    /// Active service by public ID; its category must be active too
    pub async fn find_active_layanan(&self, public_id: &str) -> Result<Option<ActiveLayanan>, BotError> {
        let row = sqlx::query_as::<_, ActiveLayanan>(&format!(
            r#"
            SELECT {}, k.kode AS kategori_kode, k.nama AS kategori_nama
            FROM layanan l
            JOIN kategori k ON k.id = l.kategori_id
            WHERE l.layanan_id = $1 AND l.is_active = TRUE AND k.is_active = TRUE
            "#,
            LAYANAN_COLUMNS
        ))
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Active requirement texts of a service in order
    pub async fn active_persyaratan(&self, layanan_id: i64) -> Result<Vec<String>, BotError> {
        self.active_lines(LineTable::Persyaratan, layanan_id).await
    }

    /// Active SOP step texts of a service in order
    pub async fn active_sop(&self, layanan_id: i64) -> Result<Vec<String>, BotError> {
        self.active_lines(LineTable::Sop, layanan_id).await
    }

    async fn active_lines(&self, table: LineTable, layanan_id: i64) -> Result<Vec<String>, BotError> {
        let rows: Vec<(String,)> = sqlx::query_as(&format!(
            "SELECT teks FROM {} WHERE layanan_id = $1 AND is_active = TRUE ORDER BY urutan ASC, id ASC",
            table.name()
        ))
        .bind(layanan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(teks,)| teks).collect())
    }

    pub async fn count_active_kategori(&self) -> Result<i64, BotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kategori WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    pub async fn count_active_layanan(&self) -> Result<i64, BotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM layanan WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Whether any category exists, active or not
    pub async fn has_catalog(&self) -> Result<bool, BotError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM kategori)")
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }

    // Category administration

    pub async fn list_kategori(&self) -> Result<Vec<KategoriSummary>, BotError> {
        let kategori = sqlx::query_as::<_, KategoriSummary>(
            r#"
            SELECT k.id, k.kode, k.nama, k.icon, k.urutan, k.is_active, COUNT(l.id) AS layanan_count
            FROM kategori k
            LEFT JOIN layanan l ON l.kategori_id = k.id
            GROUP BY k.id
            ORDER BY k.urutan ASC, k.id ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(kategori)
    }

    pub async fn find_kategori(&self, id: i64) -> Result<Option<Kategori>, BotError> {
        let kategori = sqlx::query_as::<_, Kategori>(&format!("SELECT {} FROM kategori WHERE id = $1", KATEGORI_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(kategori)
    }

    pub async fn find_kategori_by_kode(&self, kode: &str) -> Result<Option<Kategori>, BotError> {
        let kategori = sqlx::query_as::<_, Kategori>(&format!("SELECT {} FROM kategori WHERE kode = $1", KATEGORI_COLUMNS))
            .bind(kode)
            .fetch_optional(&self.pool)
            .await?;

        Ok(kategori)
    }

    pub async fn create_kategori(&self, request: &CreateKategoriRequest) -> Result<Kategori, BotError> {
        let kategori = sqlx::query_as::<_, Kategori>(&format!(
            r#"
            INSERT INTO kategori (kode, nama, icon, urutan, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            KATEGORI_COLUMNS
        ))
        .bind(&request.kode)
        .bind(&request.nama)
        .bind(&request.icon)
        .bind(request.urutan)
        .bind(request.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(kategori)
    }

    pub async fn update_kategori(&self, id: i64, request: &UpdateKategoriRequest) -> Result<Option<Kategori>, BotError> {
        let kategori = sqlx::query_as::<_, Kategori>(&format!(
            r#"
            UPDATE kategori
            SET nama = $2, icon = $3, urutan = $4, is_active = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            KATEGORI_COLUMNS
        ))
        .bind(id)
        .bind(&request.nama)
        .bind(&request.icon)
        .bind(request.urutan)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(kategori)
    }

    /// Delete a category; returns false when it did not exist
    pub async fn delete_kategori(&self, id: i64) -> Result<bool, BotError> {
        let result = sqlx::query("DELETE FROM kategori WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of services (active or not) in a category
    pub async fn count_layanan_in(&self, kategori_id: i64) -> Result<i64, BotError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM layanan WHERE kategori_id = $1")
            .bind(kategori_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    // Service administration

    /// Services ordered by category then display order
    pub async fn list_layanan(&self, filter: &LayananFilter) -> Result<Vec<Layanan>, BotError> {
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let layanan = sqlx::query_as::<_, Layanan>(&format!(
            r#"
            SELECT {} FROM layanan l
            JOIN kategori k ON k.id = l.kategori_id
            WHERE ($1::BIGINT IS NULL OR l.kategori_id = $1)
              AND ($2::TEXT IS NULL OR l.judul ILIKE '%' || $2 || '%')
            ORDER BY k.urutan ASC, k.id ASC, l.urutan ASC, l.id ASC
            "#,
            LAYANAN_COLUMNS
        ))
        .bind(filter.kategori_id)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(layanan)
    }

    pub async fn find_layanan(&self, id: i64) -> Result<Option<Layanan>, BotError> {
        let layanan = sqlx::query_as::<_, Layanan>(&format!("SELECT {} FROM layanan l WHERE l.id = $1", LAYANAN_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(layanan)
    }

    /// All requirement rows of a service in order
    pub async fn persyaratan_of(&self, layanan_id: i64) -> Result<Vec<Persyaratan>, BotError> {
        let rows = sqlx::query_as::<_, Persyaratan>(
            "SELECT id, layanan_id, teks, urutan, is_active, created_at FROM persyaratan WHERE layanan_id = $1 ORDER BY urutan ASC, id ASC"
        )
        .bind(layanan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// All SOP rows of a service in order
    pub async fn sop_of(&self, layanan_id: i64) -> Result<Vec<Sop>, BotError> {
        let rows = sqlx::query_as::<_, Sop>(
            "SELECT id, layanan_id, teks, urutan, is_active, created_at FROM sop WHERE layanan_id = $1 ORDER BY urutan ASC, id ASC"
        )
        .bind(layanan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Public IDs that start with `{kode}_`
    pub async fn layanan_ids_with_prefix(&self, kode: &str) -> Result<Vec<String>, BotError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT layanan_id FROM layanan WHERE starts_with(layanan_id, $1)")
            .bind(format!("{}_", kode))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Insert a service and its requirement and SOP lines in one transaction
    pub async fn create_layanan(&self, public_id: &str, form: &LayananForm) -> Result<Layanan, BotError> {
        let mut tx = self.pool.begin().await?;

        let layanan = sqlx::query_as::<_, Layanan>(&format!(
            r#"
            INSERT INTO layanan AS l (layanan_id, kategori_id, judul, jangka_waktu, biaya, qrcode, urutan, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            LAYANAN_COLUMNS
        ))
        .bind(public_id)
        .bind(form.kategori_id)
        .bind(form.judul.trim())
        .bind(&form.jangka_waktu)
        .bind(&form.biaya)
        .bind(&form.qrcode)
        .bind(form.urutan)
        .bind(form.is_active)
        .fetch_one(&mut *tx)
        .await?;

        replace_lines(&mut tx, LineTable::Persyaratan, layanan.id, &form.persyaratan).await?;
        replace_lines(&mut tx, LineTable::Sop, layanan.id, &form.sop).await?;

        tx.commit().await?;
        Ok(layanan)
    }

    /// Update a service and replace its lines in one transaction
    pub async fn update_layanan(&self, id: i64, form: &LayananForm) -> Result<Option<Layanan>, BotError> {
        let mut tx = self.pool.begin().await?;

        let layanan = sqlx::query_as::<_, Layanan>(&format!(
            r#"
            UPDATE layanan AS l
            SET kategori_id = $2, judul = $3, jangka_waktu = $4, biaya = $5, qrcode = $6,
                urutan = $7, is_active = $8, updated_at = NOW()
            WHERE l.id = $1
            RETURNING {}
            "#,
            LAYANAN_COLUMNS
        ))
        .bind(id)
        .bind(form.kategori_id)
        .bind(form.judul.trim())
        .bind(&form.jangka_waktu)
        .bind(&form.biaya)
        .bind(&form.qrcode)
        .bind(form.urutan)
        .bind(form.is_active)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(layanan) = layanan else {
            tx.rollback().await?;
            return Ok(None);
        };

        replace_lines(&mut tx, LineTable::Persyaratan, layanan.id, &form.persyaratan).await?;
        replace_lines(&mut tx, LineTable::Sop, layanan.id, &form.sop).await?;

        tx.commit().await?;
        Ok(Some(layanan))
    }

    /// Delete a service with its lines; returns false when it did not exist
    pub async fn delete_layanan(&self, id: i64) -> Result<bool, BotError> {
        let result = sqlx::query("DELETE FROM layanan WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip the active flag of a service
    pub async fn toggle_layanan(&self, id: i64) -> Result<Option<Layanan>, BotError> {
        let layanan = sqlx::query_as::<_, Layanan>(&format!(
            "UPDATE layanan AS l SET is_active = NOT l.is_active, updated_at = NOW() WHERE l.id = $1 RETURNING {}",
            LAYANAN_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(layanan)
    }

    /// Upsert a whole catalog file in one transaction.
    ///
    /// Categories match on `kode`, services on their public ID; requirement and
    /// SOP lines of every imported service are replaced.
    pub async fn import(&self, catalog: &CatalogImport) -> Result<ImportSummary, BotError> {
        let mut tx = self.pool.begin().await?;
        let mut summary = ImportSummary::default();

        for (position, (kode, kategori)) in catalog.kategori.iter().enumerate() {
            let urutan = kategori.urutan.unwrap_or(position as i32 + 1);
            let (kategori_id,): (i64,) = sqlx::query_as(
                r#"
                INSERT INTO kategori (kode, nama, icon, urutan)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (kode) DO UPDATE
                SET nama = EXCLUDED.nama, icon = EXCLUDED.icon, urutan = EXCLUDED.urutan, updated_at = NOW()
                RETURNING id
                "#
            )
            .bind(kode)
            .bind(&kategori.nama)
            .bind(&kategori.icon)
            .bind(urutan)
            .fetch_one(&mut *tx)
            .await?;
            summary.kategori += 1;

            for (index, item) in kategori.layanan.iter().enumerate() {
                let (layanan_id,): (i64,) = sqlx::query_as(
                    r#"
                    INSERT INTO layanan (layanan_id, kategori_id, judul, jangka_waktu, biaya, qrcode, urutan)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    ON CONFLICT (layanan_id) DO UPDATE
                    SET kategori_id = EXCLUDED.kategori_id, judul = EXCLUDED.judul,
                        jangka_waktu = EXCLUDED.jangka_waktu, biaya = EXCLUDED.biaya,
                        qrcode = EXCLUDED.qrcode, urutan = EXCLUDED.urutan, updated_at = NOW()
                    RETURNING id
                    "#
                )
                .bind(&item.id)
                .bind(kategori_id)
                .bind(item.judul.trim())
                .bind(&item.jangka_waktu)
                .bind(&item.biaya)
                .bind(&item.qrcode)
                .bind(index as i32 + 1)
                .fetch_one(&mut *tx)
                .await?;

                replace_lines(&mut tx, LineTable::Persyaratan, layanan_id, &item.persyaratan).await?;
                replace_lines(&mut tx, LineTable::Sop, layanan_id, &item.sop).await?;
                summary.layanan += 1;
            }
        }

        tx.commit().await?;
        Ok(summary)
    }
}

/// Replace the lines of a service, trimmed, without blanks, numbered from 1
async fn replace_lines(
    tx: &mut Transaction<'_, Postgres>,
    table: LineTable,
    layanan_id: i64,
    lines: &[String],
) -> Result<(), BotError> {
    sqlx::query(&format!("DELETE FROM {} WHERE layanan_id = $1", table.name()))
        .bind(layanan_id)
        .execute(&mut **tx)
        .await?;

    for (index, teks) in clean_lines(lines).into_iter().enumerate() {
        sqlx::query(&format!("INSERT INTO {} (layanan_id, teks, urutan) VALUES ($1, $2, $3)", table.name()))
            .bind(layanan_id)
            .bind(teks)
            .bind(index as i32 + 1)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}
