/// Tracing target for structured decision records. Subscribers can route it to a separate sink.
pub const ANALYTICS_TARGET: &str = "decision_analytics";

/// Counters of one strategy run, emitted as a single decision record.
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    pub eligible_hosts: usize,
    pub hosts_without_data: usize,
    pub overloaded_hosts: usize,
    pub target_hosts: usize,
}

impl RunStatistics {
    /// Emits the record on the analytics target.
    pub fn log(&self, strategy_name: &str, number_of_actions: usize) {
        tracing::info!(
            target: ANALYTICS_TARGET,
            StrategyName = strategy_name,
            EligibleHosts = self.eligible_hosts,
            HostsWithoutData = self.hosts_without_data,
            OverloadedHosts = self.overloaded_hosts,
            TargetHosts = self.target_hosts,
            NumberOfActions = number_of_actions,
        );
    }
}
