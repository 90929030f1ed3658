//! Random style selection for "surprise me" generations.

use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

const SUBJECTS: &[&str] = &[
    "a confident girl taking a mirror selfie",
    "a pop star on a glitter stage",
    "a fluffy kitten in a tiny tiara",
    "a pastel flip phone on a vanity",
    "a best-friends duo at the mall",
];

const HAIR: &[&str] = &[
    "zig-zag headband with crimped hair",
    "space buns with butterfly clips",
    "sleek ponytail with chunky pink streaks",
    "bubble braids with rhinestone pins",
    "flipped bob with a satin scrunchie",
];

const MAKEUP: &[&str] = &[
    "frosted lip gloss and glitter eyeliner",
    "shimmery lilac eyeshadow and body glitter",
    "rhinestone face gems and glossy cheeks",
    "baby blue liner and clear lip gloss",
];

const OUTFITS: &[&str] = &[
    "metallic halter crop top and low-rise cargo skirt",
    "velour tracksuit with a bedazzled logo",
    "holographic puffer jacket over a slip dress",
    "baby tee with a butterfly print and flared jeans",
    "pink faux-fur bolero and mini skirt",
];

const ACCESSORIES: &[&str] = &[
    "chunky hoop earrings",
    "a tiny shoulder baguette bag",
    "tinted rimless sunglasses",
    "a beaded phone charm",
    "a choker with a heart pendant",
];

const BACKGROUNDS: &[&str] = &[
    "a gradient mesh sky full of stars",
    "a sparkly bedroom with lava lamps",
    "a holographic photo booth",
    "a dreamy mall food court at dusk",
    "floating chrome butterflies and hearts",
];

const PALETTES: &[&str] = &[
    "bubblegum pink and lilac",
    "baby blue and silver",
    "hot pink and chrome",
    "iridescent pastel rainbow",
];

/// One concrete choice from every style table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePick {
    pub subject: String,
    pub hair: String,
    pub makeup: String,
    pub outfit: String,
    pub accessory: String,
    pub background: String,
    pub palette: String,
}

impl StylePick {
    /// Render the pick as an image-generation prompt.
    pub fn prompt(&self) -> String {
        format!(
            "Y2K girly glam illustration of {subject}. Hair: {hair}. Makeup: {makeup}. \
Outfit: {outfit}, accessorized with {accessory}. Background: {background}. \
Color palette: {palette}. Dreamy soft lighting with pink/purple glow, magical sparkles, \
subtle holographic effects, maximum glitter and shine, high quality and detailed.",
            subject = self.subject,
            hair = self.hair,
            makeup = self.makeup,
            outfit = self.outfit,
            accessory = self.accessory,
            background = self.background,
            palette = self.palette,
        )
    }
}

/// Uniform picker over the fixed style tables.
pub struct StylePicker {
    rng: Mutex<StdRng>,
}

impl std::fmt::Debug for StylePicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StylePicker").finish_non_exhaustive()
    }
}

impl Default for StylePicker {
    fn default() -> Self {
        Self::new(None)
    }
}

impl StylePicker {
    /// Seeded picker when `seed` is set, OS-seeded otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Draw the next pick from the shared generator.
    pub fn pick(&self) -> StylePick {
        let mut rng = self.rng.lock();
        pick_with(&mut rng)
    }

    /// Draw a pick from a one-off generator seeded with `seed`.
    pub fn pick_seeded(seed: u64) -> StylePick {
        pick_with(&mut StdRng::seed_from_u64(seed))
    }
}

fn pick_with(rng: &mut StdRng) -> StylePick {
    let mut choose = |table: &[&str]| -> String {
        table
            .choose(&mut *rng)
            .copied()
            .unwrap_or_default()
            .to_string()
    };
    StylePick {
        subject: choose(SUBJECTS),
        hair: choose(HAIR),
        makeup: choose(MAKEUP),
        outfit: choose(OUTFITS),
        accessory: choose(ACCESSORIES),
        background: choose(BACKGROUNDS),
        palette: choose(PALETTES),
    }
}
