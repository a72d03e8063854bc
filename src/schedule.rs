/// Source of the exploration probability at a given point in training.
///
/// Schedules are stateful: each query returns the current epsilon and
/// advances the schedule's internal step counter.
pub trait DecaySchedule {
    fn epsilon(&mut self) -> f32;
}

/// Adapter for using a zero-argument closure as a decay schedule.
pub struct ScheduleFn<F>(pub F);

impl<F: FnMut() -> f32> DecaySchedule for ScheduleFn<F> {
    fn epsilon(&mut self) -> f32 {
        (self.0)()
    }
}

/// A constant exploration probability.
pub struct ConstantDecay(pub f32);

impl DecaySchedule for ConstantDecay {
    fn epsilon(&mut self) -> f32 {
        self.0
    }
}

/// Linear interpolation from `start` to `end` over `steps` queries, constant
/// at `end` afterwards.
#[derive(Clone, Debug)]
pub struct LinearDecay {
    start: f32,
    end: f32,
    steps: u32,
    step: u32,
}

impl LinearDecay {
    pub fn new(start: f32, end: f32, steps: u32) -> Self {
        LinearDecay {
            start,
            end,
            steps: steps.max(1),
            step: 0,
        }
    }

    pub fn value(&self) -> f32 {
        let progress = (self.step as f32 / self.steps as f32).clamp(0.0, 1.0);
        self.start + (self.end - self.start) * progress
    }

    pub fn step(&self) -> u32 {
        self.step
    }
}

impl DecaySchedule for LinearDecay {
    fn epsilon(&mut self) -> f32 {
        let value = self.value();
        self.step = self.step.saturating_add(1);
        value
    }
}

/// Multiplicative decay from `start` toward the `end` floor.
#[derive(Clone, Debug)]
pub struct ExponentialDecay {
    value: f32,
    end: f32,
    rate: f32,
}

impl ExponentialDecay {
    pub fn new(start: f32, end: f32, rate: f32) -> Self {
        ExponentialDecay {
            value: start,
            end,
            rate,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

impl DecaySchedule for ExponentialDecay {
    fn epsilon(&mut self) -> f32 {
        let value = self.value;
        self.value = (self.value * self.rate).max(self.end);
        value
    }
}
