use engine::{InputSnapshot, Scene, SceneCommand, SceneKey};
use tracing::info;

/// Menu placeholder. Confirm or jump starts the game; everything else
/// idles.
pub(crate) struct TitleScene;

impl TitleScene {
    pub(crate) fn new() -> Self {
        Self
    }
}

impl Scene for TitleScene {
    fn load(&mut self) {
        info!("title_ready");
    }

    fn update(&mut self, _fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.confirm_pressed() || input.jump_pressed() {
            return SceneCommand::SwitchTo(SceneKey::Game);
        }
        SceneCommand::None
    }

    fn unload(&mut self) {}

    fn debug_title(&self) -> Option<String> {
        Some("Platcore | Title".to_string())
    }
}
