// Pointer coordinates shared between the event handlers and the update
// step. Absent is the normal state whenever the pointer is outside the
// window, not an error.

#[derive(Copy, Clone, Debug, Default)]
pub struct PointerState {
    pos: Option<[f64; 2]>,
}

impl PointerState {
    pub fn new() -> PointerState {
        PointerState { pos: None }
    }

    pub fn set(&mut self, x: f64, y: f64) {
        self.pos = Some([x, y]);
    }

    pub fn clear(&mut self) {
        self.pos = None;
    }

    pub fn position(&self) -> Option<[f64; 2]> {
        self.pos
    }
}
