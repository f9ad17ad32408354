use crate::components::types::StepInfo;

/// A simulation clock that walks fixed-length steps from the start of the year.
///
/// Each tick yields the step's index together with the simulated time at its
/// end, which is what schedule lookups and components expect.
///
/// # Examples
///
/// ```
/// use tou_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(3, 3600.0);
/// let mut ends = Vec::new();
///
/// clock.run(|step| ends.push(step.time_end_s));
/// assert_eq!(ends, vec![3600.0, 7200.0, 10800.0]);
/// ```
pub struct Clock {
    /// Next step to yield
    current: usize,
    /// Total steps to run in the simulation
    total: usize,
    /// Step duration (s)
    step_s: f64,
}

impl Clock {
    /// Creates a new clock.
    ///
    /// # Arguments
    ///
    /// * `total` - The total number of steps the clock will run
    /// * `step_s` - Duration of each step in seconds
    pub fn new(total: usize, step_s: f64) -> Self {
        Self {
            current: 0,
            total,
            step_s,
        }
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some(step)` - Timing of the step just entered
    /// * `None` - If the clock has reached its total steps
    pub fn tick(&mut self) -> Option<StepInfo> {
        if self.current < self.total {
            let index = self.current;
            self.current += 1;
            Some(StepInfo::new(
                index,
                (index + 1) as f64 * self.step_s,
                self.step_s,
            ))
        } else {
            None
        }
    }

    /// Runs a function for each remaining step in the clock.
    pub fn run(&mut self, mut f: impl FnMut(StepInfo)) {
        while let Some(step) = self.tick() {
            f(step);
        }
    }
}
