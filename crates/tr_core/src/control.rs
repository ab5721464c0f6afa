/// Main-loop run flag. Owned by the app state and handed to the event and
/// update steps instead of living in a global.
#[derive(Debug)]
pub struct LoopControl {
    running: bool,
}

impl LoopControl {
    pub fn new() -> Self {
        Self { running: true }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn request_exit(&mut self, reason: &str) {
        if self.running {
            log::info!("Exit requested: {}", reason);
            self.running = false;
        }
    }
}

impl Default for LoopControl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_running_and_stops_once() {
        let mut control = LoopControl::new();
        assert!(control.is_running());
        control.request_exit("escape");
        assert!(!control.is_running());
        control.request_exit("window closed");
        assert!(!control.is_running());
    }
}
