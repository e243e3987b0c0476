//! Routing of interactive reply ids

/// What a list or button reply asks the bot to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction<'a> {
    /// `kat_{kode}`: services of a category
    Category(&'a str),
    /// `btn_sop_{layanan_id}`: procedure steps of a service
    Sop(&'a str),
    /// `btn_back_{kode}`: back to the services of a category
    Back(&'a str),
    /// `btn_menu`: main menu plus the contact message
    MainMenu,
    /// `none`: placeholder row of an empty category
    NoServices,
    /// Anything else is a service public ID
    Service(&'a str),
}

pub const CATEGORY_PREFIX: &str = "kat_";
pub const SOP_PREFIX: &str = "btn_sop_";
pub const BACK_PREFIX: &str = "btn_back_";
pub const MAIN_MENU_ID: &str = "btn_menu";
pub const NO_SERVICES_ID: &str = "none";

impl<'a> MenuAction<'a> {
    /// Map a reply id onto an action. Every string maps to exactly one action.
    pub fn parse(reply_id: &'a str) -> Self {
        if let Some(kode) = reply_id.strip_prefix(CATEGORY_PREFIX) {
            MenuAction::Category(kode)
        } else if let Some(layanan_id) = reply_id.strip_prefix(SOP_PREFIX) {
            MenuAction::Sop(layanan_id)
        } else if let Some(kode) = reply_id.strip_prefix(BACK_PREFIX) {
            MenuAction::Back(kode)
        } else if reply_id == MAIN_MENU_ID {
            MenuAction::MainMenu
        } else if reply_id == NO_SERVICES_ID {
            MenuAction::NoServices
        } else {
            MenuAction::Service(reply_id)
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            MenuAction::Category(_) => "category",
            MenuAction::Sop(_) => "sop",
            MenuAction::Back(_) => "back",
            MenuAction::MainMenu => "main_menu",
            MenuAction::NoServices => "no_services",
            MenuAction::Service(_) => "service",
        }
    }
}

pub fn category_reply_id(kode: &str) -> String {
    format!("{}{}", CATEGORY_PREFIX, kode)
}

pub fn sop_reply_id(layanan_id: &str) -> String {
    format!("{}{}", SOP_PREFIX, layanan_id)
}

pub fn back_reply_id(kode: &str) -> String {
    format!("{}{}", BACK_PREFIX, kode)
}
