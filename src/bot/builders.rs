//! Outgoing message builders
//!
//! Pure functions from catalog rows to WhatsApp payloads. Every length limit
//! counts characters, not bytes.

use crate::config::BotConfig;
use crate::models::{Kategori, Layanan, LayananDetail};
use crate::utils::helpers::{char_len, slice_chars, truncate_chars};
use crate::whatsapp::message::{
    BodyText, Button, ButtonAction, Header, Interactive, ListAction, OutgoingMessage, Row, Section,
};
use super::menu::{back_reply_id, category_reply_id, sop_reply_id, MAIN_MENU_ID, NO_SERVICES_ID};

/// WhatsApp limit on rows of a list message
pub const MAX_LIST_ROWS: usize = 10;
/// WhatsApp limit on list row titles
pub const MAX_ROW_TITLE: usize = 24;
const MAX_ROW_DESCRIPTION: usize = 72;
const MAX_DETAIL_REQUIREMENTS: usize = 5;
const MAX_REQUIREMENT_CHARS: usize = 100;
const MAX_INTERACTIVE_BODY: usize = 1024;
const MAX_SOP_STEPS: usize = 10;
const MAX_SOP_STEP_CHARS: usize = 150;
const MAX_SOP_TITLE: usize = 50;
const MAX_TEXT_BODY: usize = 4096;

const MAIN_MENU_BODY: &str = "Assalamualaikum! Selamat datang di layanan informasi Kemenag Kabupaten Madiun.\n\nSilakan pilih kategori layanan:";
const SERVICE_LIST_BODY: &str = "Pilih layanan yang Anda butuhkan untuk melihat persyaratan dan prosedur:";
pub const HELP_TEXT: &str = "Ketik *menu* untuk melihat layanan yang tersedia.";
pub const NO_SERVICES_TEXT: &str = "Maaf, belum ada layanan tersedia untuk kategori ini. Ketik *menu* untuk kembali.";
pub const SOP_NOT_FOUND_TEXT: &str = "SOP tidak ditemukan";

/// Category list sent on greeting and `btn_menu`
pub fn main_menu(config: &BotConfig, kategori: &[Kategori]) -> OutgoingMessage {
    let rows = kategori
        .iter()
        .take(MAX_LIST_ROWS)
        .map(|k| Row {
            id: category_reply_id(&k.kode),
            title: truncate_chars(&labelled(k.icon.as_deref(), &k.nama), MAX_ROW_TITLE).to_string(),
            description: None,
        })
        .collect();

    list_message(
        Some(&config.office_name),
        MAIN_MENU_BODY,
        &config.footer,
        "Pilih Kategori",
        "Kategori Layanan",
        rows,
    )
}

/// Services of one category. Long titles continue in the row description.
pub fn service_list(config: &BotConfig, kategori: &Kategori, layanan: &[Layanan]) -> OutgoingMessage {
    let mut rows: Vec<Row> = layanan
        .iter()
        .take(MAX_LIST_ROWS)
        .map(|l| {
            let description = if char_len(&l.judul) > MAX_ROW_TITLE {
                slice_chars(&l.judul, MAX_ROW_TITLE, MAX_ROW_DESCRIPTION).to_string()
            } else {
                "Klik untuk detail".to_string()
            };
            Row {
                id: l.layanan_id.clone(),
                title: truncate_chars(&l.judul, MAX_ROW_TITLE).to_string(),
                description: Some(description),
            }
        })
        .collect();

    if rows.is_empty() {
        rows.push(Row {
            id: NO_SERVICES_ID.to_string(),
            title: "Tidak ada layanan".to_string(),
            description: Some("Belum ada layanan tersedia".to_string()),
        });
    }

    let header = labelled(kategori.icon.as_deref(), &kategori.nama);
    list_message(
        Some(&header),
        SERVICE_LIST_BODY,
        &config.footer,
        "Pilih Layanan",
        "Layanan Tersedia",
        rows,
    )
}

/// Requirements, duration and fee of a service with navigation buttons
pub fn service_detail(config: &BotConfig, detail: &LayananDetail, video_link: Option<&str>) -> OutgoingMessage {
    let layanan = &detail.layanan;
    let mut body = format!("*{}*\n\n*📋 PERSYARATAN:*\n", layanan.judul);

    for (i, requirement) in detail.persyaratan.iter().take(MAX_DETAIL_REQUIREMENTS).enumerate() {
        body.push_str(&format!("{}. {}\n", i + 1, truncate_chars(requirement, MAX_REQUIREMENT_CHARS)));
    }
    if detail.persyaratan.len() > MAX_DETAIL_REQUIREMENTS {
        body.push_str(&format!(
            "... dan {} persyaratan lainnya\n",
            detail.persyaratan.len() - MAX_DETAIL_REQUIREMENTS
        ));
    }

    body.push_str(&format!("\n*⏱️ WAKTU:* {}\n", or_dash(layanan.jangka_waktu.as_deref())));
    body.push_str(&format!("*💰 BIAYA:* {}\n", or_dash(layanan.biaya.as_deref())));

    if let Some(link) = non_blank(layanan.qrcode.as_deref()) {
        body.push_str(&format!("\n*🔗 Link Pendukung:*\n{}\n", link));
    }
    if let Some(link) = non_blank(video_link) {
        body.push_str(&format!("\n📹 Tutorial: {}", link));
    }

    OutgoingMessage::Interactive {
        interactive: Interactive::Button {
            body: BodyText {
                text: truncate_chars(&body, MAX_INTERACTIVE_BODY).to_string(),
            },
            footer: Some(BodyText { text: config.footer.clone() }),
            action: ButtonAction {
                buttons: vec![
                    Button::reply(sop_reply_id(&layanan.layanan_id), "📄 Lihat SOP"),
                    Button::reply(back_reply_id(&detail.kategori_kode), "⬅️ Kembali"),
                    Button::reply(MAIN_MENU_ID, "🏠 Menu"),
                ],
            },
        },
    }
}

/// Procedure steps of a service, or a not-found note
pub fn sop_detail(detail: Option<&LayananDetail>) -> OutgoingMessage {
    let Some(detail) = detail else {
        return OutgoingMessage::text(SOP_NOT_FOUND_TEXT);
    };
    let layanan = &detail.layanan;

    let mut body = format!("*ALUR SOP*\n{}...\n\n", truncate_chars(&layanan.judul, MAX_SOP_TITLE));

    if detail.sop.is_empty() {
        body.push_str("SOP untuk layanan ini sedang dalam proses penyusunan.\n\n");
    } else {
        for (i, step) in detail.sop.iter().take(MAX_SOP_STEPS).enumerate() {
            body.push_str(&format!("*Langkah {}:*\n{}\n\n", i + 1, truncate_chars(step, MAX_SOP_STEP_CHARS)));
        }
    }

    body.push_str(&format!("*⏱️ Total Waktu:* {}\n", or_dash(layanan.jangka_waktu.as_deref())));
    body.push_str(&format!("*💰 Biaya:* {}", or_dash(layanan.biaya.as_deref())));

    OutgoingMessage::text(truncate_chars(&body, MAX_TEXT_BODY))
}

/// Link to chat with a human operator
pub fn contact_admin(config: &BotConfig) -> OutgoingMessage {
    OutgoingMessage::text(format!(
        "*Ingin langsung menghubungi admin?*\n\n\
         Klik tautan di bawah untuk menghubungi kami melalui WhatsApp:\n\
         https://wa.me/{}?text={}\n\n\
         Tim support kami siap membantu Anda sesuai jam pelayanan 🙏",
        config.contact_number,
        urlencoding::encode(&config.contact_message)
    ))
}

pub fn help() -> OutgoingMessage {
    OutgoingMessage::text(HELP_TEXT)
}

pub fn no_services() -> OutgoingMessage {
    OutgoingMessage::text(NO_SERVICES_TEXT)
}

fn list_message(
    header: Option<&str>,
    body: &str,
    footer: &str,
    button: &str,
    section_title: &str,
    rows: Vec<Row>,
) -> OutgoingMessage {
    OutgoingMessage::Interactive {
        interactive: Interactive::List {
            header: header.map(|text| Header::Text { text: text.to_string() }),
            body: BodyText { text: body.to_string() },
            footer: Some(BodyText { text: footer.to_string() }),
            action: ListAction {
                button: button.to_string(),
                sections: vec![Section {
                    title: section_title.to_string(),
                    rows,
                }],
            },
        },
    }
}

fn labelled(icon: Option<&str>, nama: &str) -> String {
    match non_blank(icon) {
        Some(icon) => format!("{} {}", icon, nama),
        None => nama.to_string(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn or_dash(value: Option<&str>) -> &str {
    non_blank(value).unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use chrono::Utc;
    use proptest::prelude::*;
    use serde_json::Value;

    fn config() -> BotConfig {
        Settings::default().bot
    }

    fn kategori(kode: &str, nama: &str) -> Kategori {
        Kategori {
            id: 1,
            kode: kode.to_string(),
            nama: nama.to_string(),
            icon: Some("📋".to_string()),
            urutan: 1,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn layanan(public_id: &str, judul: &str) -> Layanan {
        Layanan {
            id: 10,
            layanan_id: public_id.to_string(),
            kategori_id: 1,
            judul: judul.to_string(),
            jangka_waktu: Some("3 hari kerja".to_string()),
            biaya: Some("Gratis".to_string()),
            qrcode: None,
            urutan: 1,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn detail(persyaratan: usize, sop: usize) -> LayananDetail {
        LayananDetail {
            layanan: layanan("umum_1", "Legalisir Ijazah Madrasah"),
            kategori_kode: "umum".to_string(),
            kategori_nama: "Layanan Umum".to_string(),
            persyaratan: (1..=persyaratan).map(|i| format!("Syarat {}", i)).collect(),
            sop: (1..=sop).map(|i| format!("Langkah nomor {}", i)).collect(),
        }
    }

    fn json(message: &OutgoingMessage) -> Value {
        serde_json::to_value(message).unwrap()
    }

    fn rows(message: &OutgoingMessage) -> Vec<Value> {
        json(message)["interactive"]["action"]["sections"][0]["rows"]
            .as_array()
            .unwrap()
            .clone()
    }

    fn body(message: &OutgoingMessage) -> String {
        message.preview_text().to_string()
    }

    #[test]
    fn test_main_menu_rows() {
        let mut long = kategori("bimas", "Bimbingan Masyarakat Islam dan Penyuluhan");
        long.icon = Some("🕌".to_string());
        let message = main_menu(&config(), &[kategori("umum", "Layanan Umum"), long]);

        let value = json(&message);
        assert_eq!(value["interactive"]["header"]["text"], "Kemenag Kab. Madiun");
        assert_eq!(value["interactive"]["action"]["button"], "Pilih Kategori");
        assert_eq!(value["interactive"]["footer"]["text"], "PTSP Kemenag Kab. Madiun");

        let rows = rows(&message);
        assert_eq!(rows[0]["id"], "kat_umum");
        assert_eq!(rows[0]["title"], "📋 Layanan Umum");
        assert_eq!(rows[1]["id"], "kat_bimas");
        assert_eq!(rows[1]["title"].as_str().unwrap().chars().count(), MAX_ROW_TITLE);
    }

    #[test]
    fn test_main_menu_caps_rows() {
        let kategori: Vec<Kategori> = (0..14).map(|i| kategori(&format!("k{}", i), "Kategori")).collect();
        assert_eq!(rows(&main_menu(&config(), &kategori)).len(), MAX_LIST_ROWS);
    }

    #[test]
    fn test_service_list_titles_and_descriptions() {
        let message = service_list(
            &config(),
            &kategori("pendidikan", "Pendidikan"),
            &[
                layanan("pendidikan_1", "Pengajuan Rekomendasi Ijin Operasional Madrasah"),
                layanan("pendidikan_2", "Legalisir"),
            ],
        );

        assert_eq!(json(&message)["interactive"]["header"]["text"], "📋 Pendidikan");
        let rows = rows(&message);
        assert_eq!(rows[0]["id"], "pendidikan_1");
        assert_eq!(rows[0]["title"], "Pengajuan Rekomendasi Ij");
        assert_eq!(rows[0]["description"], "in Operasional Madrasah");
        assert_eq!(rows[1]["description"], "Klik untuk detail");
    }

    #[test]
    fn test_empty_service_list() {
        let message = service_list(&config(), &kategori("haji", "Haji"), &[]);
        let rows = rows(&message);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "none");
        assert_eq!(rows[0]["title"], "Tidak ada layanan");
    }

    #[test]
    fn test_service_detail_requirements() {
        let message = service_detail(&config(), &detail(7, 2), None);
        let text = body(&message);
        assert!(text.starts_with("*Legalisir Ijazah Madrasah*\n\n*📋 PERSYARATAN:*\n1. Syarat 1\n"));
        assert!(text.contains("5. Syarat 5\n"));
        assert!(!text.contains("6. Syarat 6"));
        assert!(text.contains("... dan 2 persyaratan lainnya\n"));
        assert!(text.contains("*⏱️ WAKTU:* 3 hari kerja\n"));
        assert!(text.contains("*💰 BIAYA:* Gratis\n"));
        assert!(!text.contains("Tutorial"));

        let buttons = json(&message)["interactive"]["action"]["buttons"].clone();
        assert_eq!(buttons[0]["reply"]["id"], "btn_sop_umum_1");
        assert_eq!(buttons[1]["reply"]["id"], "btn_back_umum");
        assert_eq!(buttons[2]["reply"]["id"], "btn_menu");
    }

    #[test]
    fn test_service_detail_links_and_limit() {
        let mut detail = detail(5, 0);
        detail.layanan.qrcode = Some("https://s.id/ptsp".to_string());
        detail.layanan.biaya = None;
        detail.persyaratan = vec!["x".repeat(400); 5];

        let text = body(&service_detail(&config(), &detail, Some("https://youtu.be/abc")));
        assert!(text.contains("*💰 BIAYA:* -\n"));
        assert!(text.chars().count() <= MAX_INTERACTIVE_BODY);
        assert!(!text.contains(&"x".repeat(101)));

        let short = body(&service_detail(&config(), &self::detail(1, 0), Some("https://youtu.be/abc")));
        assert!(short.ends_with("\n📹 Tutorial: https://youtu.be/abc"));
    }

    #[test]
    fn test_sop_detail() {
        let text = body(&sop_detail(Some(&detail(0, 12))));
        assert!(text.starts_with("*ALUR SOP*\nLegalisir Ijazah Madrasah...\n\n*Langkah 1:*\nLangkah nomor 1\n\n"));
        assert!(text.contains("*Langkah 10:*"));
        assert!(!text.contains("*Langkah 11:*"));
        assert!(text.ends_with("*⏱️ Total Waktu:* 3 hari kerja\n*💰 Biaya:* Gratis"));

        let empty = body(&sop_detail(Some(&detail(0, 0))));
        assert!(empty.contains("SOP untuk layanan ini sedang dalam proses penyusunan."));

        assert_eq!(body(&sop_detail(None)), SOP_NOT_FOUND_TEXT);
    }

    #[test]
    fn test_contact_admin_link() {
        let text = body(&contact_admin(&config()));
        assert!(text.contains("https://wa.me/6282245552687?text=Assalamualaikum%2C%20saya%20butuh%20bantuan"));
    }

    proptest! {
        #[test]
        fn sop_text_respects_limit(step in ".{0,400}", count in 0usize..20) {
            let mut detail = detail(0, 0);
            detail.sop = vec![step; count];
            let text = body(&sop_detail(Some(&detail)));
            prop_assert!(text.chars().count() <= MAX_TEXT_BODY);
        }

        #[test]
        fn row_titles_fit(judul in "\\PC{0,80}") {
            let message = service_list(&config(), &kategori("umum", "Umum"), &[layanan("umum_1", &judul)]);
            let title = rows(&message)[0]["title"].as_str().unwrap().to_string();
            prop_assert!(title.chars().count() <= MAX_ROW_TITLE);
        }
    }
}
