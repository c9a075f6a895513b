//! Layer visibility state.

/// State for toggling overlay layers.
#[derive(Debug, Clone, Default)]
pub struct LayerState {
    /// Show country names at shape centroids
    pub labels: bool,
}
