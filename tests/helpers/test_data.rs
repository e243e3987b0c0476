//! Test data helpers
//!
//! Webhook deliveries as the Cloud API sends them, and a small catalog file.

use serde_json::{json, Value};

pub const TEST_PHONE: &str = "6281234567890";

/// Delivery carrying one text message
pub fn text_delivery(message_id: &str, from: &str, body: &str) -> Value {
    delivery(json!({
        "messaging_product": "whatsapp",
        "metadata": { "display_phone_number": "15550000000", "phone_number_id": "1234567890" },
        "contacts": [{ "profile": { "name": "Budi" }, "wa_id": from }],
        "messages": [{
            "from": from,
            "id": message_id,
            "timestamp": "1700000000",
            "type": "text",
            "text": { "body": body }
        }]
    }))
}

/// Delivery carrying one list reply
pub fn list_reply_delivery(message_id: &str, from: &str, reply_id: &str) -> Value {
    delivery(json!({
        "messaging_product": "whatsapp",
        "contacts": [{ "profile": { "name": "Budi" }, "wa_id": from }],
        "messages": [{
            "from": from,
            "id": message_id,
            "timestamp": "1700000000",
            "type": "interactive",
            "interactive": {
                "type": "list_reply",
                "list_reply": { "id": reply_id, "title": "Pilihan" }
            }
        }]
    }))
}

/// Delivery carrying one button reply
pub fn button_reply_delivery(message_id: &str, from: &str, reply_id: &str) -> Value {
    delivery(json!({
        "messaging_product": "whatsapp",
        "messages": [{
            "from": from,
            "id": message_id,
            "timestamp": "1700000000",
            "type": "interactive",
            "interactive": {
                "type": "button_reply",
                "button_reply": { "id": reply_id, "title": "Tombol" }
            }
        }]
    }))
}

/// Delivery with only a delivery receipt
pub fn status_delivery() -> Value {
    delivery(json!({
        "messaging_product": "whatsapp",
        "statuses": [{ "id": "wamid.OUT", "status": "delivered", "timestamp": "1700000001" }]
    }))
}

fn delivery(value: Value) -> Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "id": "WABA_ID",
            "changes": [{ "field": "messages", "value": value }]
        }]
    })
}

/// Two categories, three services
pub fn sample_catalog() -> Value {
    json!({
        "kategori": {
            "umum": {
                "nama": "Layanan Umum",
                "icon": "📋",
                "urutan": 1,
                "layanan": [
                    {
                        "id": "umum_1",
                        "judul": "Legalisir Dokumen",
                        "Jangka Waktu Pelayanan": "1 hari kerja",
                        "Biaya/Tarif": "Gratis",
                        "PERSYARATAN": ["Fotokopi dokumen", "  ", "Dokumen asli"],
                        "SOP": ["Serahkan berkas", "Verifikasi petugas", "Legalisir diterbitkan"]
                    },
                    {
                        "id": "umum_2",
                        "judul": "Surat Keterangan",
                        "PERSYARATAN": ["KTP"],
                        "SOP": []
                    }
                ]
            },
            "haji": {
                "nama": "Haji dan Umrah",
                "icon": "🕋",
                "urutan": 2,
                "layanan": [
                    {
                        "id": "haji_1",
                        "judul": "Pendaftaran Haji Reguler",
                        "Jangka Waktu Pelayanan": "30 menit",
                        "Biaya/Tarif": "Rp 25.000.000 setoran awal",
                        "PERSYARATAN": ["KTP", "KK", "Buku tabungan"],
                        "SOP": ["Buka rekening", "Setor awal", "Daftar ke Kemenag"]
                    }
                ]
            }
        }
    })
}
