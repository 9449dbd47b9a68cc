#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FadeStatus {
    None,
    FadeIn,
    FadeOut,
}

/// Screen fade timer. Alpha ramps 1 -> 0 while fading in and 0 -> 1
/// while fading out; an idle fade is transparent and always finished.
#[derive(Debug, Clone)]
pub(crate) struct Fade {
    status: FadeStatus,
    duration_seconds: f32,
    counter_seconds: f32,
}

impl Fade {
    pub(crate) fn new() -> Self {
        Self {
            status: FadeStatus::None,
            duration_seconds: 0.0,
            counter_seconds: 0.0,
        }
    }

    pub(crate) fn start(&mut self, status: FadeStatus, duration_seconds: f32) {
        self.status = status;
        self.duration_seconds = duration_seconds.max(f32::EPSILON);
        self.counter_seconds = 0.0;
    }

    pub(crate) fn stop(&mut self) {
        self.status = FadeStatus::None;
        self.counter_seconds = 0.0;
    }

    pub(crate) fn tick(&mut self, dt_seconds: f32) {
        if self.status == FadeStatus::None {
            return;
        }
        self.counter_seconds = (self.counter_seconds + dt_seconds).min(self.duration_seconds);
    }

    pub(crate) fn status(&self) -> FadeStatus {
        self.status
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.status == FadeStatus::None || self.counter_seconds >= self.duration_seconds
    }

    pub(crate) fn alpha(&self) -> f32 {
        let progress = self.counter_seconds / self.duration_seconds;
        match self.status {
            FadeStatus::None => 0.0,
            FadeStatus::FadeIn => 1.0 - progress,
            FadeStatus::FadeOut => progress,
        }
    }
}
