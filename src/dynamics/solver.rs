use crate::{
    config::DEFAULT_SOLVER_ITERATIONS,
    core::rigidbody::BodySet,
    error::Result,
    utils::logging::ScopedTimer,
};

/// Anything the solver loop can prestep, warm start and iterate.
pub trait SolverUpdateable {
    /// Prestep: recomputes Jacobians, effective masses and coefficients.
    fn update(&mut self, dt: f32, bodies: &BodySet) -> Result<()>;

    /// Warm start: reapplies last step's accumulated impulses.
    fn exclusive_update(&mut self, bodies: &mut BodySet);

    /// Applies one round of corrective impulses and returns their total magnitude.
    fn solve_iteration(&mut self, bodies: &mut BodySet) -> f32;

    /// `false` once every constraint inside has converged or run out of iterations.
    fn is_active_in_solver(&self) -> bool;
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SolverStepMetrics {
    pub updateables: usize,
    pub warm_started: usize,
    pub iterations: u32,
    pub impulse_sum: f32,
    /// Every updateable went quiet before the iteration limit.
    pub converged_early: bool,
}

/// Sequential-impulse loop over a set of updateables sharing one body set.
#[derive(Debug, Clone)]
pub struct ConstraintSolver {
    pub iteration_limit: u32,
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new(DEFAULT_SOLVER_ITERATIONS)
    }
}

impl ConstraintSolver {
    pub fn new(iteration_limit: u32) -> Self {
        Self { iteration_limit }
    }

    /// Runs prestep, warm start and up to `iteration_limit` passes.
    ///
    /// A failing prestep aborts the step before any velocity is touched.
    pub fn step(
        &self,
        dt: f32,
        bodies: &mut BodySet,
        items: &mut [&mut dyn SolverUpdateable],
    ) -> Result<SolverStepMetrics> {
        let _timer = ScopedTimer::new("constraint_solver.step");
        let mut metrics = SolverStepMetrics {
            updateables: items.len(),
            ..SolverStepMetrics::default()
        };

        for (index, item) in items.iter_mut().enumerate() {
            if let Err(err) = item.update(dt, bodies) {
                log::error!("prestep of updateable {index} failed: {err}");
                return Err(err);
            }
        }

        for item in items.iter_mut() {
            if item.is_active_in_solver() {
                item.exclusive_update(bodies);
                metrics.warm_started += 1;
            }
        }

        for _ in 0..self.iteration_limit {
            let mut any_active = false;
            for item in items.iter_mut() {
                if item.is_active_in_solver() {
                    any_active = true;
                    metrics.impulse_sum += item.solve_iteration(bodies);
                }
            }
            if !any_active {
                metrics.converged_early = true;
                break;
            }
            metrics.iterations += 1;
        }

        log::debug!(
            "solved {} updateables in {} iterations (impulse {:.4}, early exit: {})",
            metrics.updateables,
            metrics.iterations,
            metrics.impulse_sum,
            metrics.converged_early
        );
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SolverError;

    struct Countdown {
        remaining: u32,
        solved: u32,
        warm_started: bool,
    }

    impl SolverUpdateable for Countdown {
        fn update(&mut self, _dt: f32, _bodies: &BodySet) -> Result<()> {
            Ok(())
        }

        fn exclusive_update(&mut self, _bodies: &mut BodySet) {
            self.warm_started = true;
        }

        fn solve_iteration(&mut self, _bodies: &mut BodySet) -> f32 {
            self.remaining -= 1;
            self.solved += 1;
            1.0
        }

        fn is_active_in_solver(&self) -> bool {
            self.remaining > 0
        }
    }

    struct Broken;

    impl SolverUpdateable for Broken {
        fn update(&mut self, _dt: f32, _bodies: &BodySet) -> Result<()> {
            Err(SolverError::DegenerateSpring)
        }

        fn exclusive_update(&mut self, _bodies: &mut BodySet) {}

        fn solve_iteration(&mut self, _bodies: &mut BodySet) -> f32 {
            0.0
        }

        fn is_active_in_solver(&self) -> bool {
            true
        }
    }

    #[test]
    fn stops_when_every_updateable_is_done() {
        let mut bodies = BodySet::new();
        let mut short = Countdown { remaining: 2, solved: 0, warm_started: false };
        let mut long = Countdown { remaining: 4, solved: 0, warm_started: false };

        let metrics = ConstraintSolver::new(10)
            .step(1.0 / 60.0, &mut bodies, &mut [&mut short, &mut long])
            .unwrap();

        assert_eq!(metrics.iterations, 4);
        assert_eq!(metrics.impulse_sum, 6.0);
        assert!(metrics.converged_early);
        assert!(short.warm_started && long.warm_started);
        assert_eq!((short.solved, long.solved), (2, 4));
    }

    #[test]
    fn iteration_limit_bounds_the_loop() {
        let mut bodies = BodySet::new();
        let mut item = Countdown { remaining: 100, solved: 0, warm_started: false };

        let metrics = ConstraintSolver::new(3)
            .step(1.0 / 60.0, &mut bodies, &mut [&mut item])
            .unwrap();

        assert_eq!(metrics.iterations, 3);
        assert!(!metrics.converged_early);
        assert_eq!(item.solved, 3);
    }

    #[test]
    fn prestep_failure_aborts_before_solving() {
        let mut bodies = BodySet::new();
        let mut item = Countdown { remaining: 5, solved: 0, warm_started: false };
        let mut broken = Broken;

        let result = ConstraintSolver::default().step(
            1.0 / 60.0,
            &mut bodies,
            &mut [&mut item, &mut broken],
        );

        assert_eq!(result, Err(SolverError::DegenerateSpring));
        assert!(!item.warm_started);
        assert_eq!(item.solved, 0);
    }
}
