use crate::error::Result;
use gridphys::workflows::scenes::Scene;

pub fn run() -> Result<()> {
    println!("Available scenes:");
    for scene in Scene::ALL {
        let (width, height) = scene.min_dimensions();
        println!(
            "  {:<14} {} (needs at least {}x{})",
            scene.name(),
            scene.description(),
            width,
            height
        );
    }
    Ok(())
}
