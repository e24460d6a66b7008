//! Browser asset provider using `HtmlImageElement` and `HtmlAudioElement`
//!
//! Images load asynchronously; until the browser has decoded one the
//! renderer keeps drawing the fallback shape. Cue playback never blocks the
//! frame: a rejected `play()` promise is only logged.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{HtmlAudioElement, HtmlImageElement};

use crate::renderer::{ImageBank, ImageHandle, ImageSlot};
use crate::theme::{AssetProvider, ThemeAssets};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Jump,
    Termination,
    Intro,
}

impl Cue {
    const ALL: [Cue; 3] = [Cue::Jump, Cue::Termination, Cue::Intro];
}

/// Theme images and cues for the browser
pub struct BrowserAssets {
    images: Rc<RefCell<ImageBank>>,
    cues: HashMap<Cue, HtmlAudioElement>,
    /// Already includes mute
    volume: f32,
}

impl BrowserAssets {
    pub fn new(images: Rc<RefCell<ImageBank>>) -> Self {
        Self {
            images,
            cues: HashMap::new(),
            volume: 0.8,
        }
    }

    /// Replace every image and cue with the given theme's
    pub fn load_theme(&mut self, assets: &ThemeAssets) {
        self.stop_all_cues();

        {
            let mut bank = self.images.borrow_mut();
            for (slot, src) in [
                (ImageSlot::Avatar, Some(&assets.avatar_image)),
                (ImageSlot::Obstacle, assets.obstacle_image.as_ref()),
                (ImageSlot::Hazard, Some(&assets.hazard_image)),
            ] {
                match src.and_then(|src| load_image(src)) {
                    Some(image) => bank.insert(slot, image),
                    None => bank.remove(slot),
                }
            }
        }

        self.cues.clear();
        for (cue, src) in [
            (Cue::Jump, &assets.jump_cue),
            (Cue::Termination, &assets.termination_cue),
            (Cue::Intro, &assets.intro_cue),
        ] {
            match HtmlAudioElement::new_with_src(src) {
                Ok(audio) => {
                    audio.set_loop(cue == Cue::Intro);
                    self.cues.insert(cue, audio);
                }
                Err(e) => log::warn!("Could not create {cue:?} cue: {e:?}"),
            }
        }
        self.apply_volume();
        log::info!("Theme assets loading ({} cues)", self.cues.len());
    }

    /// Set playback volume (0.0 - 1.0); 0 silences every cue
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
        self.apply_volume();
    }

    fn apply_volume(&self) {
        let vol = self.volume as f64;
        for audio in self.cues.values() {
            audio.set_volume(vol);
        }
    }

    /// Rewind and play a cue
    fn play(&self, cue: Cue) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(audio) = self.cues.get(&cue) else {
            return;
        };
        audio.set_current_time(0.0);
        match audio.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    // Autoplay policy rejects cues before the first gesture
                    log::debug!("{cue:?} cue play failed: {e:?}");
                }
            }),
            Err(e) => log::debug!("{cue:?} cue play failed: {e:?}"),
        }
    }

    fn stop(&self, cue: Cue) {
        if let Some(audio) = self.cues.get(&cue) {
            audio.pause().ok();
            audio.set_current_time(0.0);
        }
    }
}

fn load_image(src: &str) -> Option<HtmlImageElement> {
    match HtmlImageElement::new() {
        Ok(image) => {
            image.set_src(src);
            Some(image)
        }
        Err(e) => {
            log::warn!("Could not create image element: {e:?}");
            None
        }
    }
}

impl AssetProvider for BrowserAssets {
    fn avatar_image(&self) -> Option<ImageHandle> {
        self.images.borrow().handle(ImageSlot::Avatar)
    }

    fn obstacle_image(&self) -> Option<ImageHandle> {
        self.images.borrow().handle(ImageSlot::Obstacle)
    }

    fn hazard_image(&self) -> Option<ImageHandle> {
        self.images.borrow().handle(ImageSlot::Hazard)
    }

    fn play_jump_cue(&mut self) {
        self.play(Cue::Jump);
    }

    fn play_termination_cue(&mut self) {
        self.stop_all_cues();
        self.play(Cue::Termination);
    }

    fn play_intro_cue(&mut self) {
        self.stop_all_cues();
        self.play(Cue::Intro);
    }

    fn stop_all_cues(&mut self) {
        for cue in Cue::ALL {
            self.stop(cue);
        }
    }
}
