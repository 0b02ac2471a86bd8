use crate::catalog::domain::catalog_entry::FrameCatalogEntry;
use crate::classification::domain::face_shape::FrameStyle;
use crate::shared::constants::DEFAULT_STORE_URL;

/// Built-in frames shown when the store cannot be reached.
pub fn fallback_entries() -> Vec<FrameCatalogEntry> {
    vec![
        FrameCatalogEntry::new(
            "Dutz 2270",
            "https://via.placeholder.com/200x100/0066CC/FFFFFF?text=Dutz",
            "189",
            DEFAULT_STORE_URL,
            FrameStyle::Rond,
        ),
        FrameCatalogEntry::new(
            "BBIG 243",
            "https://via.placeholder.com/200x100/FF6600/FFFFFF?text=BBIG",
            "149",
            DEFAULT_STORE_URL,
            FrameStyle::Rechthoekig,
        ),
    ]
}
