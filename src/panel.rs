use crate::constants::PANEL_HIDE_DELAY;

/// Control panel visibility with idle auto-hide.
#[derive(Debug, Clone)]
pub struct PanelVisibility {
    idle: f32,
    hide_after: f32,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self::new(PANEL_HIDE_DELAY)
    }
}

impl PanelVisibility {
    pub fn new(hide_after: f32) -> Self {
        Self { idle: 0.0, hide_after }
    }

    /// Any key press or pointer movement.
    pub fn wake(&mut self) {
        self.idle = 0.0;
    }

    pub fn update(&mut self, dt: f32) {
        self.idle += dt;
    }

    pub fn is_visible(&self) -> bool {
        self.idle < self.hide_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_after_idle_delay_and_wakes_on_activity() {
        let mut panel = PanelVisibility::new(3.0);
        assert!(panel.is_visible());
        panel.update(2.9);
        assert!(panel.is_visible());
        panel.update(0.2);
        assert!(!panel.is_visible());
        panel.wake();
        assert!(panel.is_visible());
    }
}
