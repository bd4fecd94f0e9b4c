use gridphys::engine::config::SimulationConfig;
use gridphys::workflows::scenes::Scene;

/// Everything the `run` command needs, after file, flags and defaults are merged.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub simulation: SimulationConfig,
    pub ticks: u64,
    pub seed: u64,
    pub scene: Scene,
    pub render_every: u64,
    pub check: bool,
}
