use std::sync::Arc;

use tracing::Span;

use crate::domain::clock::clock::{Clock, SystemClock};
use crate::domain::cluster::cluster_model::ClusterModel;
use crate::domain::datasource::datasource_trait::Datasource;
use crate::domain::solution::solution::Solution;
use crate::domain::strategy::config::ConfigSchema;
use crate::error::{ClusterError, StrategyError};

/// Collaborators injected into a strategy when it is built.
#[derive(Debug, Clone)]
pub struct StrategyDependencies {
    pub datasource: Arc<dyn Datasource>,
    pub clock: Arc<dyn Clock>,
    /// Parent span for everything the strategy logs.
    pub span: Span,
}

impl StrategyDependencies {
    pub fn new(datasource: Arc<dyn Datasource>) -> Self {
        Self { datasource, clock: Arc::new(SystemClock), span: Span::current() }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// State every strategy carries between its phases.
#[derive(Debug)]
pub struct StrategyBase {
    pub name: &'static str,
    pub cluster_model: Option<ClusterModel>,
    pub solution: Solution,
    pub span: Span,
}

impl StrategyBase {
    pub fn new(name: &'static str, parent: &Span) -> Self {
        let span = tracing::info_span!(parent: parent, "strategy", strategy = name);
        Self { name, cluster_model: None, solution: Solution::new(name), span }
    }

    pub fn cluster_model(&self) -> Result<&ClusterModel, StrategyError> {
        self.cluster_model.as_ref().ok_or(StrategyError::ClusterStateNotDefined)
    }

    pub fn cluster_model_mut(&mut self) -> Result<&mut ClusterModel, StrategyError> {
        self.cluster_model.as_mut().ok_or(StrategyError::ClusterStateNotDefined)
    }

    /// Starts a new run on the given model with an empty solution.
    fn reset(&mut self, cluster_model: Option<ClusterModel>) {
        self.cluster_model = cluster_model;
        self.solution = Solution::new(self.name);
    }

    /// Hands out the solution of the finished run, leaving an empty one behind.
    fn take_solution(&mut self) -> Solution {
        std::mem::replace(&mut self.solution, Solution::new(self.name))
    }
}

/// Precondition shared by all strategies: a model is present and not stale.
pub fn check_cluster_model(base: &mut StrategyBase) -> Result<(), StrategyError> {
    let model = base.cluster_model_mut()?;
    match model.ensure_fresh() {
        Ok(()) => {}
        Err(ClusterError::Stale) => return Err(StrategyError::ClusterStateStale),
        Err(e) => return Err(e.into()),
    }
    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!("{}", model.snapshot());
    }
    Ok(())
}

/// Freezes the solution with the effective placement the run ended on.
pub fn attach_final_model(base: &mut StrategyBase) -> Result<(), StrategyError> {
    let snapshot = base.cluster_model()?.snapshot();
    tracing::debug!("{}", snapshot);
    base.solution.attach_model(snapshot)?;
    Ok(())
}

pub trait Strategy: std::fmt::Debug + Send {
    fn get_base(&self) -> &StrategyBase;

    fn get_base_mut(&mut self) -> &mut StrategyBase;

    fn get_name(&self) -> &'static str {
        self.get_base().name
    }

    fn get_display_name(&self) -> &'static str;

    fn get_schema(&self) -> ConfigSchema;

    fn pre_execute(&mut self) -> Result<(), StrategyError> {
        check_cluster_model(self.get_base_mut())
    }

    /// Reads telemetry, plans moves and appends actions. The only phase that touches the solution.
    fn do_execute(&mut self) -> Result<(), StrategyError>;

    fn post_execute(&mut self) -> Result<(), StrategyError> {
        attach_final_model(self.get_base_mut())
    }

    /// Runs all three phases against `cluster_model`.
    ///
    /// Returns the solution of this run, possibly without actions. If any phase fails the
    /// partial solution is dropped and only the error is returned.
    fn execute(&mut self, cluster_model: Option<ClusterModel>) -> Result<Solution, StrategyError> {
        let span = self.get_base().span.clone();
        let _entered = span.enter();

        self.get_base_mut().reset(cluster_model);
        let outcome = run_phases(self);
        let solution = self.get_base_mut().take_solution();
        self.get_base_mut().cluster_model = None;

        match outcome {
            Ok(()) => {
                tracing::info!("{} finished with {} action(s)", self.get_display_name(), solution.len());
                Ok(solution)
            }
            Err(e) => {
                tracing::error!("{} failed: {}", self.get_display_name(), e);
                Err(e)
            }
        }
    }
}

fn run_phases<S: Strategy + ?Sized>(strategy: &mut S) -> Result<(), StrategyError> {
    strategy.pre_execute()?;
    strategy.do_execute()?;
    strategy.post_execute()
}
