use crate::catalog::domain::catalog_entry::FrameCatalogEntry;
use crate::classification::domain::face_shape::FaceShapeLabel;

/// Orders frames for a face: styles that suit `shape` first, everything else
/// after. Catalog order is kept within both groups.
pub fn rank_frames(entries: &[FrameCatalogEntry], shape: FaceShapeLabel) -> Vec<FrameCatalogEntry> {
    let mut ranked = entries.to_vec();
    ranked.sort_by_key(|entry| !entry.style.suits(shape));
    ranked
}
