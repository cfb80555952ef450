//! The closed set of symbologies this crate knows the name of (spec §6).

/// A barcode format tag. Not every variant has a fully wired-up `Reader` —
/// see `MultiFormatReader` and `DESIGN.md` for which ones `decode` can
/// actually produce; the enum itself names the whole surface callers may
/// reference in `DecodeHints::formats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BarcodeFormat {
    Aztec,
    Codabar,
    Code39,
    Code93,
    Code128,
    DataMatrix,
    Ean8,
    Ean13,
    Itf,
    MaxiCode,
    Pdf417,
    QrCode,
    Rss14,
    RssExpanded,
    UpcA,
    UpcE,
    UpcEanExtension,
}

impl BarcodeFormat {
    /// Formats `MultiFormatReader` dispatches to when `DecodeHints::formats`
    /// is empty (spec §6: "Empty set = try all default 1D and 2D").
    pub const fn default_2d() -> [BarcodeFormat; 4] {
        [
            BarcodeFormat::QrCode,
            BarcodeFormat::DataMatrix,
            BarcodeFormat::Aztec,
            BarcodeFormat::Pdf417,
        ]
    }

    pub const fn default_1d() -> [BarcodeFormat; 9] {
        [
            BarcodeFormat::UpcA,
            BarcodeFormat::UpcE,
            BarcodeFormat::Ean8,
            BarcodeFormat::Ean13,
            BarcodeFormat::Code39,
            BarcodeFormat::Code93,
            BarcodeFormat::Code128,
            BarcodeFormat::Itf,
            BarcodeFormat::Codabar,
        ]
    }

    pub const fn is_2d(self) -> bool {
        matches!(
            self,
            BarcodeFormat::Aztec
                | BarcodeFormat::DataMatrix
                | BarcodeFormat::Pdf417
                | BarcodeFormat::QrCode
                | BarcodeFormat::MaxiCode
        )
    }
}

impl std::fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
