//! Filename hashing for `.MIX` archives.
//!
//! MIX archives never store filenames; each entry is keyed by a 32-bit hash of
//! the upper-cased name. The hash folds the name four bytes at a time:
//!
//! ```text
//! key = 0
//! for each little-endian u32 word of NAME (NUL-padded to a multiple of 4):
//!     key = key.rotate_left(1) + word      (wrapping)
//! ```
//!
//! Recovering names therefore needs a dictionary of candidates. A read-only
//! reverse index over [`KNOWN_NAMES`] is built once per process; extra names
//! can be layered on top with [`NameIndex::with_extra`].

use std::{collections::HashMap, sync::LazyLock};

/// Computes the archive key for `name`.
///
/// The name is upper-cased (ASCII) before hashing, so the result is
/// case-insensitive.
pub fn hash(name: &str) -> u32 {
	let upper = name.to_ascii_uppercase();
	let bytes = upper.as_bytes();

	let mut key = 0u32;
	for chunk in bytes.chunks(4) {
		let mut word = [0u8; 4];
		word[..chunk.len()].copy_from_slice(chunk);
		key = key.rotate_left(1).wrapping_add(u32::from_le_bytes(word));
	}
	key
}

/// Placeholder name for a key with no dictionary match.
pub fn placeholder_name(key: u32) -> String {
	format!("{key:08X}.bin")
}

/// Filenames known to appear in the game's archives.
pub const KNOWN_NAMES: &[&str] = &[
	// archives
	"CONQUER.MIX",
	"GENERAL.MIX",
	"LOCAL.MIX",
	"MAIN.MIX",
	"REDALERT.MIX",
	"HIRES.MIX",
	"LORES.MIX",
	"NCHIRES.MIX",
	"INTERIOR.MIX",
	"SNOW.MIX",
	"TEMPERAT.MIX",
	"DESERT.MIX",
	"WINTER.MIX",
	"SOUNDS.MIX",
	"SPEECH.MIX",
	"ALLIES.MIX",
	"RUSSIAN.MIX",
	"SCORES.MIX",
	"MOVIES.MIX",
	"TRANSIT.MIX",
	"UPDATE.MIX",
	"EXPAND.MIX",
	"EXPAND2.MIX",
	// palettes
	"TEMPERAT.PAL",
	"SNOW.PAL",
	"INTERIOR.PAL",
	"DESERT.PAL",
	"WINTER.PAL",
	"PALETTE.PAL",
	"SCORE.PAL",
	// interface sprites
	"MOUSE.SHP",
	"SIDEBAR.SHP",
	"SIDE1.SHP",
	"SIDE2.SHP",
	"SIDE3.SHP",
	"STRIP.SHP",
	"STRIPNA.SHP",
	"POWER.SHP",
	"POWERBAR.SHP",
	"REPAIR.SHP",
	"SELL.SHP",
	"MAP.SHP",
	"CLOCK.SHP",
	"PIPS.SHP",
	"TABS.SHP",
	"OPTIONS.SHP",
	"HPIPS.SHP",
	"BTN-UP.SHP",
	"BTN-DN.SHP",
	"BTN-ST.SHP",
	"BTN-PL.SHP",
	"SCROLL.SHP",
	// infantry
	"E1.SHP",
	"E2.SHP",
	"E3.SHP",
	"E4.SHP",
	"E6.SHP",
	"E7.SHP",
	"MEDI.SHP",
	"SPY.SHP",
	"THF.SHP",
	"DOG.SHP",
	"C1.SHP",
	"C2.SHP",
	"EINSTEIN.SHP",
	// vehicles
	"1TNK.SHP",
	"2TNK.SHP",
	"3TNK.SHP",
	"4TNK.SHP",
	"APC.SHP",
	"ARTY.SHP",
	"HARV.SHP",
	"MCV.SHP",
	"JEEP.SHP",
	"TRUK.SHP",
	"V2RL.SHP",
	"MNLY.SHP",
	"MRJ.SHP",
	"MGG.SHP",
	"TTNK.SHP",
	"CTNK.SHP",
	"QTNK.SHP",
	"DTRK.SHP",
	// aircraft and ships
	"HELI.SHP",
	"HIND.SHP",
	"TRAN.SHP",
	"MIG.SHP",
	"YAK.SHP",
	"BADR.SHP",
	"U2.SHP",
	"SS.SHP",
	"DD.SHP",
	"CA.SHP",
	"LST.SHP",
	"PT.SHP",
	// structures
	"FACT.SHP",
	"POWR.SHP",
	"APWR.SHP",
	"PROC.SHP",
	"SILO.SHP",
	"BARR.SHP",
	"TENT.SHP",
	"WEAP.SHP",
	"DOME.SHP",
	"FIX.SHP",
	"HPAD.SHP",
	"AFLD.SHP",
	"SPEN.SHP",
	"SYRD.SHP",
	"ATEK.SHP",
	"STEK.SHP",
	"GUN.SHP",
	"AGUN.SHP",
	"SAM.SHP",
	"TSLA.SHP",
	"GAP.SHP",
	"IRON.SHP",
	"PDOX.SHP",
	"MSLO.SHP",
	"PBOX.SHP",
	"HBOX.SHP",
	"FTUR.SHP",
	"KENN.SHP",
	// effects
	"FIRE1.SHP",
	"FIRE2.SHP",
	"FIRE3.SHP",
	"FIRE4.SHP",
	"SMOKE_M.SHP",
	"PIFF.SHP",
	"PIFFPIFF.SHP",
	"FBALL1.SHP",
	"NAPALM1.SHP",
	"NAPALM2.SHP",
	"NAPALM3.SHP",
	"VEH-HIT1.SHP",
	"VEH-HIT2.SHP",
	"VEH-HIT3.SHP",
	"ATOMSFX.SHP",
	"H2O_EXP1.SHP",
	"H2O_EXP2.SHP",
	"H2O_EXP3.SHP",
	"MINIGUN.SHP",
	"GUNFIRE.SHP",
	// sounds
	"BLEEP9.AUD",
	"CLICK.AUD",
	"CASHTURN.AUD",
	"BUILD5.AUD",
	"KABOOM1.AUD",
	"KABOOM12.AUD",
	"KABOOM15.AUD",
	"KABOOM22.AUD",
	"CANNON1.AUD",
	"CANNON2.AUD",
	"GUN13.AUD",
	"GUN27.AUD",
	"MGUN2.AUD",
	"MISSILE6.AUD",
	"TESLA1.AUD",
	"RADARON2.AUD",
	"RADARDN1.AUD",
	"SELLBLDG.AUD",
	"SPLASH9.AUD",
	"DOGW3PX.AUD",
	// speech
	"AFFIRM1.AUD",
	"ACKNO.AUD",
	"AWAIT1.AUD",
	"READY.AUD",
	"REPORT1.AUD",
	"ROGER.AUD",
	"UGOTIT.AUD",
	"VEHIC1.AUD",
	"YESSIR1.AUD",
	"BLDGING1.AUD",
	"CONSCMP1.AUD",
	"UNITREDY.AUD",
	"NOFUNDS1.AUD",
	"LOPOWER1.AUD",
	"BASEATK1.AUD",
	"MISNWON1.AUD",
	"MISNLST1.AUD",
	// music
	"BIGF226M.AUD",
	"CRUS226M.AUD",
	"FAC1226M.AUD",
	"HELL226M.AUD",
	"RUN1226M.AUD",
	"SMSH226M.AUD",
	"TREN226M.AUD",
	"WORK226M.AUD",
];

static GLOBAL_INDEX: LazyLock<NameIndex> = LazyLock::new(NameIndex::known);

/// Reverse index from archive key to filename.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
	names: HashMap<u32, String>,
}

impl NameIndex {
	/// Builds an index over [`KNOWN_NAMES`] only.
	pub fn known() -> Self {
		let mut index = Self::default();
		index.extend(KNOWN_NAMES.iter().copied());
		index
	}

	/// Returns the process-wide read-only index over [`KNOWN_NAMES`].
	pub fn global() -> &'static NameIndex {
		&GLOBAL_INDEX
	}

	/// Builds an index over [`KNOWN_NAMES`] plus `extra`.
	pub fn with_extra<I, S>(extra: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut index = Self::global().clone();
		index.extend(extra);
		index
	}

	/// Adds names to the index. The first name registered for a key wins.
	pub fn extend<I, S>(&mut self, names: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		for name in names {
			let name = name.as_ref().trim();
			if name.is_empty() {
				continue;
			}
			let upper = name.to_ascii_uppercase();
			self.names.entry(hash(&upper)).or_insert(upper);
		}
	}

	/// Looks up the name registered for `key`.
	pub fn get(&self, key: u32) -> Option<&str> {
		self.names.get(&key).map(String::as_str)
	}

	/// Returns the registered name or a placeholder derived from the key.
	pub fn name_for(&self, key: u32) -> String {
		self.get(key).map_or_else(|| placeholder_name(key), str::to_owned)
	}

	/// Number of names in the index.
	pub fn len(&self) -> usize {
		self.names.len()
	}

	/// Returns `true` if the index holds no names.
	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}
