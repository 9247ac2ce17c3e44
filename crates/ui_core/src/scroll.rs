//! Back-to-top control driven by the scroll offset.

pub const BACK_TO_TOP_THRESHOLD: f32 = 300.0;

#[derive(Debug, Default, Clone, Copy)]
pub struct BackToTop {
    visible: bool,
    jump_requested: bool,
}

impl BackToTop {
    /// Feed the current vertical offset each frame; the control shows once
    /// the view is scrolled past the threshold.
    pub fn update_offset(&mut self, offset: f32) {
        self.visible = offset > BACK_TO_TOP_THRESHOLD;
    }

    pub fn is_visible(self) -> bool {
        self.visible
    }

    pub fn request_jump(&mut self) {
        self.jump_requested = true;
    }

    /// Consumed by the shell to perform the smooth scroll, once per click.
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }
}
