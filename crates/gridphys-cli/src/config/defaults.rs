use gridphys::core::models::topology::Neighborhood;
use gridphys::engine::config::MovementStrategy;
use gridphys::workflows::scenes::Scene;

pub struct DefaultsConfig {
    pub width: usize,
    pub height: usize,
    pub strategy: MovementStrategy,
    pub movement_neighborhood: Neighborhood,
    pub ticks: u64,
    pub scene: Scene,
    pub render_every: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 60,
            strategy: MovementStrategy::MoleculeBlocks,
            movement_neighborhood: Neighborhood::VonNeumann,
            ticks: 1000,
            scene: Scene::Demo,
            render_every: 0,
        }
    }
}
