//! The output of a symbol decoder: decoded text plus the metadata needed to
//! build an [`crate::result::RXingResult`] (spec §4.7, §6).

#[derive(Debug, Clone, Default)]
pub struct DecoderResult {
    raw_bytes: Vec<u8>,
    text: String,
    byte_segments: Vec<Vec<u8>>,
    ec_level: Option<String>,
    error_correction_level: Option<String>,
    num_bits: usize,
    other: Option<String>,
    structured_append_parity: i32,
    structured_append_sequence_number: i32,
    symbology_modifier: u32,
}

impl DecoderResult {
    pub fn new(raw_bytes: Vec<u8>, text: String) -> Self {
        let num_bits = raw_bytes.len() * 8;
        Self {
            raw_bytes,
            text,
            num_bits,
            structured_append_parity: -1,
            structured_append_sequence_number: -1,
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw_bytes
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    pub fn with_num_bits(mut self, num_bits: usize) -> Self {
        self.num_bits = num_bits;
        self
    }

    pub fn byte_segments(&self) -> &[Vec<u8>] {
        &self.byte_segments
    }

    pub fn with_byte_segments(mut self, byte_segments: Vec<Vec<u8>>) -> Self {
        self.byte_segments = byte_segments;
        self
    }

    pub fn ec_level(&self) -> Option<&str> {
        self.ec_level.as_deref()
    }

    pub fn with_ec_level(mut self, ec_level: impl Into<String>) -> Self {
        self.ec_level = Some(ec_level.into());
        self
    }

    pub fn error_correction_level(&self) -> Option<&str> {
        self.error_correction_level.as_deref()
    }

    pub fn with_error_correction_level(mut self, level: impl Into<String>) -> Self {
        self.error_correction_level = Some(level.into());
        self
    }

    pub fn has_structured_append(&self) -> bool {
        self.structured_append_parity >= 0 && self.structured_append_sequence_number >= 0
    }

    pub fn structured_append_parity(&self) -> i32 {
        self.structured_append_parity
    }

    pub fn structured_append_sequence_number(&self) -> i32 {
        self.structured_append_sequence_number
    }

    pub fn with_structured_append(mut self, sequence_number: i32, parity: i32) -> Self {
        self.structured_append_sequence_number = sequence_number;
        self.structured_append_parity = parity;
        self
    }

    pub fn symbology_modifier(&self) -> u32 {
        self.symbology_modifier
    }

    pub fn with_symbology_modifier(mut self, modifier: u32) -> Self {
        self.symbology_modifier = modifier;
        self
    }

    pub fn other(&self) -> Option<&str> {
        self.other.as_deref()
    }

    pub fn with_other(mut self, other: impl Into<String>) -> Self {
        self.other = Some(other.into());
        self
    }
}
