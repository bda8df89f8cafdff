// Domain-layer modules and shared errors/models
pub mod kinds {
    pub use crate::kinds::*;
}

pub mod batcher {
    pub use crate::batcher::*;
}

pub mod flattener {
    pub use crate::flattener::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod services {
    pub use crate::services::*;
}

pub mod errors {
    pub use crate::errors::*;
}
