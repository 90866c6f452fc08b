//! Constants used in `.AUD` files

/// Size of the stream header in bytes
pub const HEADER_SIZE: usize = 12;

/// Size of a chunk header in bytes
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Signature carried by every chunk header
pub const CHUNK_SIGNATURE: u32 = 0x0000_DEAF;

/// Lowest accepted sample rate in Hz
pub const MIN_SAMPLE_RATE: u16 = 4000;

/// Highest accepted sample rate in Hz
pub const MAX_SAMPLE_RATE: u16 = 48000;

/// Largest accepted decoded size in bytes
pub const MAX_OUTPUT_SIZE: u32 = 64 * 1024 * 1024;

/// Header flag: two interleaved channels
pub const FLAG_STEREO: u8 = 0x01;

/// Header flag: 16-bit samples
pub const FLAG_16BIT: u8 = 0x02;

/// Codec tag for Westwood ADPCM
pub const CODEC_WS_ADPCM: u8 = 1;

/// Codec tag for IMA ADPCM
pub const CODEC_IMA_ADPCM: u8 = 99;

/// Initial sample value of the Westwood decoder
pub const WS_MIDPOINT: u8 = 128;

/// Number of entries in the IMA ADPCM step table
pub const STEP_TABLE_ENTRIES: usize = 89;
