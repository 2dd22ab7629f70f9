//! Declarative asset manifest for the portfolio experience.
//!
//! Pure data: an ordered list of descriptors grouped by scene. The loading
//! driver walks it and picks a loader per kind. Names are trusted to be
//! unique and nothing here is validated beyond what the types encode.

use atelier_core::AssetKind;
use serde::{Deserialize, Serialize};

/// One loadable resource: its manifest name, source path, and kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub name: String,
    pub source: String,
    pub kind: AssetKind,
}

/// A named group of descriptors loaded together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetGroup {
    pub name: String,
    pub items: Vec<AssetDescriptor>,
}

use AssetKind::{Model, Texture};

#[rustfmt::skip]
const BASE_ITEMS: &[(&str, &str, AssetKind)] = &[
    ("collision",                   "/assets/models/scene.glb",                            Model),
    ("door",                        "/assets/models/door.glb",                             Model),
    ("vaseAnimation",               "/assets/models/vase.glb",                             Model),
    ("vase",                        "/assets/models/vase_idle.glb",                        Model),
    ("baked",                       "/assets/baked/baked.ktx2",                            Texture),
    ("starduster",                  "/assets/paintings/starduster.ktx2",                   Texture),
    ("ghostlyFootsteps",            "/assets/paintings/ghostly-footsteps.ktx2",            Texture),
    ("apocalypseNow",               "/assets/paintings/apocalypse-now.ktx2",               Texture),
    ("tfg",                         "/assets/paintings/tfg.ktx2",                          Texture),
    ("saveTheCrew",                 "/assets/paintings/save-the-crew.ktx2",                Texture),
    ("breakIn",                     "/assets/paintings/break-in.ktx2",                     Texture),
    ("cobayaUnchained",             "/assets/paintings/cobayaunchained.ktx2",              Texture),
    ("qomp",                        "/assets/paintings/qomp.ktx2",                         Texture),
    ("portfolio",                   "/assets/paintings/portfolio.ktx2",                    Texture),
    ("stardusterNote",              "/assets/notes/starduster-note.ktx2",                  Texture),
    ("qompNote",                    "/assets/notes/qomp-note.ktx2",                        Texture),
    ("ghostlyFootstepsNote",        "/assets/notes/ghostlyFootsteps-note.ktx2",            Texture),
    ("cobayaUnchainedNote",         "/assets/notes/cobayaUnchained-note.ktx2",             Texture),
    ("breakInNote",                 "/assets/notes/breakIn-note.ktx2",                     Texture),
    ("portfolioNote",               "/assets/notes/portfolio-note.ktx2",                   Texture),
    ("nextButton",                  "/assets/descriptionButtons/next-button.ktx2",         Texture),
    ("prevButton",                  "/assets/descriptionButtons/prev-button.ktx2",         Texture),
    ("liveDemo",                    "/assets/descriptionButtons/live-demo.ktx2",           Texture),
    ("sourceCode",                  "/assets/descriptionButtons/source-code.ktx2",         Texture),
    ("joanArtGallery",              "/assets/paintings/joan-art-gallery.ktx2",             Texture),
    ("joanArcadeMachine",           "/assets/paintings/joan-arcade-machine.ktx2",          Texture),
    ("joanOS",                      "/assets/paintings/joan-os.ktx2",                      Texture),
    ("vaseTexture",                 "/assets/vase/vaseTexture.ktx2",                       Texture),
    ("portfolioDescription",        "/assets/descriptions/portfolio-description.png",      Texture),
    ("stardusterDescription",       "/assets/descriptions/starduster-description.png",     Texture),
    ("cobayaunchainedDescription",  "/assets/descriptions/cobayaunchained-description.png", Texture),
    ("ghostlyFootstepsDescription", "/assets/descriptions/ghostly-footsteps-description.png", Texture),
    ("breakInDescription",          "/assets/descriptions/break-in-description.png",       Texture),
    ("qompDescription",             "/assets/descriptions/qomp-description.png",           Texture),
    ("trophyGold",                  "/assets/trophyLogos/trophy-gold.png",                 Texture),
    ("trophySilver",                "/assets/trophyLogos/trophy-silver.png",               Texture),
    ("trophyBronze",                "/assets/trophyLogos/trophy-bronze.png",               Texture),
    ("trophyPlatinum",              "/assets/trophyLogos/trophy-platinum.png",             Texture),
    ("joanArtGalleryDescription",   "/assets/descriptions/joan-art-gallery-description.png", Texture),
    ("joanArcadeMachineDescription", "/assets/descriptions/joan-arcade-machine-description.png", Texture),
    ("joanOSDescription",           "/assets/descriptions/joan-os-description.png",        Texture),
    ("doNotTouchTrophy",            "/assets/trophies/do-not-touch-trophy.png",            Texture),
    ("doNotTouch",                  "/assets/notes/do-not-touch.png",                      Texture),
    ("doorTrophy",                  "/assets/trophies/door-trophy.png",                    Texture),
    ("sourceCodeTrophy",            "/assets/trophies/source-code-trophy.png",             Texture),
    ("liveDemoTrophy",              "/assets/trophies/live-demo-trophy.png",               Texture),
    ("nextTrophy",                  "/assets/trophies/next-trophy.png",                    Texture),
    ("prevTrophy",                  "/assets/trophies/prev-trophy.png",                    Texture),
    ("canvasTrophy",                "/assets/trophies/canvas-trophy.png",                  Texture),
    ("platinumTrophy",              "/assets/trophies/platinum-trophy.png",                Texture),
];

/// The "base" scene: every asset the experience needs at startup, in load
/// order.
pub fn base_manifest() -> AssetGroup {
    AssetGroup {
        name: "base".to_string(),
        items: BASE_ITEMS
            .iter()
            .map(|&(name, source, kind)| AssetDescriptor {
                name: name.to_string(),
                source: source.to_string(),
                kind,
            })
            .collect(),
    }
}
