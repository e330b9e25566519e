pub use blobworld_core::{SimConfig, Simulation};
pub mod arena {
    pub use blobworld_core::arena::*;
}
pub mod config {
    pub use blobworld_core::config::*;
}
pub mod physics {
    pub use blobworld_core::physics::*;
}
pub mod organism {
    pub use blobworld_core::organism::*;
}
pub mod fruit {
    pub use blobworld_core::fruit::*;
}
pub mod snake_proxy {
    pub use blobworld_core::snake_proxy::*;
}
pub mod simulation {
    pub use blobworld_core::simulation::*;
}

pub mod state {
    pub use blobworld_data::*;
}
pub mod lifecycle {
    pub use blobworld_core::lifecycle::*;
}
pub mod systems {
    pub use blobworld_core::systems::*;
}
pub mod collision {
    pub use blobworld_core::collision::*;
}
