#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `tiberium-rs` converts the MIX, SHP and AUD assets of 1990s Westwood games
//! into PNG sprite sheets, WAV files and JSON metadata.
//!
pub use tiberium_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use tiberium_dylib;
