use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Keys that act for as long as they're held down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub up: bool,
    pub down: bool,
    pub forward: bool,
    pub backward: bool,
}

impl Controls {
    /// Record a press or release, returns `false` if `key` isn't a held control.
    pub fn apply(&mut self, key: KeyCode, pressed: bool) -> bool {
        let flag = match key {
            KeyCode::ArrowUp => &mut self.up,
            KeyCode::ArrowDown => &mut self.down,
            KeyCode::PageUp => &mut self.forward,
            KeyCode::PageDown => &mut self.backward,
            _ => return false,
        };
        *flag = pressed;
        true
    }
}

/// One-shot actions bound to a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleWireframe,
    ToggleFullscreen,
    ToggleEnvironment,
    ToggleFog,
    ToggleMountainTexture,
    StartRoll,
    ToggleCrazyRoll,
    Quit,
}

#[must_use]
pub fn action_for(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::KeyW => Some(Action::ToggleWireframe),
        KeyCode::KeyF => Some(Action::ToggleFullscreen),
        KeyCode::KeyS => Some(Action::ToggleEnvironment),
        KeyCode::KeyB => Some(Action::ToggleFog),
        KeyCode::KeyT => Some(Action::ToggleMountainTexture),
        KeyCode::KeyR => Some(Action::StartRoll),
        KeyCode::KeyC => Some(Action::ToggleCrazyRoll),
        KeyCode::KeyQ => Some(Action::Quit),
        _ => None,
    }
}

/// Held keys go straight into `controls`, a fresh press of an action key is handed back.
pub fn process_input(event: &KeyEvent, controls: &mut Controls) -> Option<Action> {
    let PhysicalKey::Code(key) = event.physical_key else {
        return None;
    };
    let pressed = event.state == ElementState::Pressed;

    if controls.apply(key, pressed) || !pressed || event.repeat {
        return None;
    }
    action_for(key)
}

pub const CONTROLS_HELP: &str = "\
Scene Controls
--------------
w: toggle wireframe
f: toggle fullscreen
s: toggle sea & sky
b: toggle fog
t: toggle mountain texture
r: barrel roll
c: toggle crazy roll
q: quit

Flight Controls
---------------
Up    Arrow: climb
Down  Arrow: dive
PAGE  UP   : faster
PAGE  DOWN : slower
Mouse left/right: turn
";

/// Horizontal pointer position over a window of a given width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub window_width: f32,
}

impl Pointer {
    /// Starts centred, so the plane flies straight until the pointer moves.
    #[must_use]
    pub fn centred(window_width: f32) -> Self {
        Self {
            x: window_width / 2.0,
            window_width,
        }
    }

    #[must_use]
    pub fn turn_ratio(&self) -> f32 {
        turn_ratio(self.x, self.window_width)
    }
}

/// Offset of `x` from the middle of the window in `[-1, 1]`, negative to the left.
#[must_use]
pub fn turn_ratio(x: f32, window_width: f32) -> f32 {
    if window_width <= 0.0 {
        return 0.0;
    }
    let half = window_width / 2.0;
    ((x - half) / half).clamp(-1.0, 1.0)
}
