// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod error;
pub mod grid;
pub mod ids;
pub mod model;
pub mod settings;
pub mod state;

pub use error::*;
pub use grid::*;
pub use ids::*;
pub use model::*;
pub use settings::*;
pub use state::*;
