//! Themes and the asset provider seam
//!
//! A theme resolves to a [`ThemeAssets`] bundle of URLs once; everything
//! downstream consumes the bundle and never looks at the theme again.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::renderer::{FrameImages, ImageHandle};

/// Image drawn for path hazards, shared by every theme
pub const HAZARD_IMAGE: &str = "/images/bhau.png";

/// Selectable theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Bachan,
    Gandi,
    Custom,
}

impl ThemeKind {
    pub const ALL: [ThemeKind; 3] = [ThemeKind::Bachan, ThemeKind::Gandi, ThemeKind::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeKind::Bachan => "bachan",
            ThemeKind::Gandi => "gandi",
            ThemeKind::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bachan" => Some(ThemeKind::Bachan),
            "gandi" => Some(ThemeKind::Gandi),
            "custom" => Some(ThemeKind::Custom),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemeKind::Bachan => ThemeKind::Gandi,
            ThemeKind::Gandi => ThemeKind::Custom,
            ThemeKind::Custom => ThemeKind::Bachan,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("custom theme needs an uploaded {missing}")]
    IncompleteCustomTheme { missing: &'static str },
}

/// Player-uploaded media for the custom theme, stored as data URLs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomTheme {
    pub avatar_image: Option<String>,
    pub termination_sound: Option<String>,
}

impl CustomTheme {
    /// LocalStorage keys (used only in wasm32)
    #[allow(dead_code)]
    const IMAGE_KEY: &'static str = "customBirdImage";
    #[allow(dead_code)]
    const SOUND_KEY: &'static str = "customSound";

    pub fn is_complete(&self) -> bool {
        self.avatar_image.is_some() && self.termination_sound.is_some()
    }

    /// Load cached uploads from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        let Some(storage) = storage else {
            return Self::default();
        };
        Self {
            avatar_image: storage.get_item(Self::IMAGE_KEY).ok().flatten(),
            termination_sound: storage.get_item(Self::SOUND_KEY).ok().flatten(),
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

/// Every asset URL a run needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeAssets {
    pub avatar_image: String,
    /// Only some themes draw obstacles from an image; the rest use bricks
    pub obstacle_image: Option<String>,
    pub hazard_image: String,
    pub jump_cue: String,
    pub termination_cue: String,
    /// Loops on the start screen
    pub intro_cue: String,
}

/// The default theme's bundle
impl Default for ThemeAssets {
    fn default() -> Self {
        Self {
            avatar_image: "/images/bachan.png".into(),
            obstacle_image: None,
            hazard_image: HAZARD_IMAGE.into(),
            jump_cue: "/sound/JumpAag.m4a".into(),
            termination_cue: "/sound/mkcAag.m4a".into(),
            intro_cue: "/sound/intro.m4a".into(),
        }
    }
}

/// Resolve a theme to its asset bundle
pub fn resolve_theme(kind: ThemeKind, custom: Option<&CustomTheme>) -> Result<ThemeAssets, ThemeError> {
    let assets = match kind {
        ThemeKind::Bachan => ThemeAssets::default(),
        ThemeKind::Gandi => ThemeAssets {
            avatar_image: "/images/gandi.png".into(),
            obstacle_image: Some("/images/modi.png".into()),
            hazard_image: HAZARD_IMAGE.into(),
            jump_cue: "/sound/playGandi.m4a".into(),
            termination_cue: "/sound/khatam.m4a".into(),
            intro_cue: "/sound/intoGandi.m4a".into(),
        },
        ThemeKind::Custom => {
            let custom = custom.cloned().unwrap_or_default();
            let avatar_image = custom
                .avatar_image
                .ok_or(ThemeError::IncompleteCustomTheme { missing: "image" })?;
            let termination_cue = custom
                .termination_sound
                .ok_or(ThemeError::IncompleteCustomTheme { missing: "sound" })?;
            ThemeAssets {
                avatar_image,
                obstacle_image: None,
                hazard_image: HAZARD_IMAGE.into(),
                jump_cue: "/sound/JumpAag.m4a".into(),
                termination_cue,
                intro_cue: "/sound/intro.m4a".into(),
            }
        }
    };
    Ok(assets)
}

/// Images and sound cues for the current theme.
///
/// All calls are best effort: a missing image yields `None` and the renderer
/// draws a fallback shape, a missing or failing cue is silent.
pub trait AssetProvider {
    fn avatar_image(&self) -> Option<ImageHandle>;
    fn obstacle_image(&self) -> Option<ImageHandle>;
    fn hazard_image(&self) -> Option<ImageHandle>;

    fn play_jump_cue(&mut self);
    /// Stops every other cue first
    fn play_termination_cue(&mut self);
    /// Stops every other cue first
    fn play_intro_cue(&mut self);
    fn stop_all_cues(&mut self);

    fn frame_images(&self) -> FrameImages {
        FrameImages {
            avatar: self.avatar_image(),
            obstacle: self.obstacle_image(),
            hazard: self.hazard_image(),
        }
    }
}

/// No images, no sound. Used natively and before a theme is loaded
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAssets;

impl AssetProvider for SilentAssets {
    fn avatar_image(&self) -> Option<ImageHandle> {
        None
    }

    fn obstacle_image(&self) -> Option<ImageHandle> {
        None
    }

    fn hazard_image(&self) -> Option<ImageHandle> {
        None
    }

    fn play_jump_cue(&mut self) {}
    fn play_termination_cue(&mut self) {}
    fn play_intro_cue(&mut self) {}
    fn stop_all_cues(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_kind_strings() {
        for kind in ThemeKind::ALL {
            assert_eq!(ThemeKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(ThemeKind::from_str("GANDI"), Some(ThemeKind::Gandi));
        assert_eq!(ThemeKind::from_str("modi"), None);
        assert_eq!(ThemeKind::Custom.next(), ThemeKind::Bachan);
        assert_eq!(serde_json::to_string(&ThemeKind::Custom).unwrap(), "\"custom\"");
    }

    #[test]
    fn test_only_gandi_has_obstacle_image() {
        let custom = CustomTheme {
            avatar_image: Some("data:image/png;base64,AAAA".into()),
            termination_sound: Some("data:audio/webm;base64,BBBB".into()),
        };
        for kind in ThemeKind::ALL {
            let assets = resolve_theme(kind, Some(&custom)).unwrap();
            assert_eq!(assets.obstacle_image.is_some(), kind == ThemeKind::Gandi);
            assert_eq!(assets.hazard_image, HAZARD_IMAGE);
        }
    }

    #[test]
    fn test_custom_theme_uses_uploads() {
        let custom = CustomTheme {
            avatar_image: Some("data:image/png;base64,AAAA".into()),
            termination_sound: Some("data:audio/webm;base64,BBBB".into()),
        };
        let assets = resolve_theme(ThemeKind::Custom, Some(&custom)).unwrap();
        assert_eq!(assets.avatar_image, "data:image/png;base64,AAAA");
        assert_eq!(assets.termination_cue, "data:audio/webm;base64,BBBB");
        assert_eq!(assets.jump_cue, "/sound/JumpAag.m4a");
    }

    #[test]
    fn test_incomplete_custom_theme() {
        assert_eq!(
            resolve_theme(ThemeKind::Custom, None),
            Err(ThemeError::IncompleteCustomTheme { missing: "image" })
        );
        let only_image = CustomTheme {
            avatar_image: Some("data:image/png;base64,AAAA".into()),
            termination_sound: None,
        };
        assert!(!only_image.is_complete());
        assert_eq!(
            resolve_theme(ThemeKind::Custom, Some(&only_image)),
            Err(ThemeError::IncompleteCustomTheme { missing: "sound" })
        );
        // Built-in themes ignore the uploads entirely
        assert!(resolve_theme(ThemeKind::Bachan, None).is_ok());
    }

    #[test]
    fn test_silent_assets_have_no_images() {
        let mut assets = SilentAssets;
        assets.play_jump_cue();
        assert_eq!(assets.frame_images(), FrameImages::default());
    }
}
